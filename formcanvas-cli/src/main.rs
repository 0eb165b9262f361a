use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, WrapErr, eyre};

use formcanvas::domain::Form;
use formcanvas::engine::steps;
use formcanvas::io::{self, DocumentFormat, OutputDestination, OutputOptions};
use formcanvas::publish;
use formcanvas::store::{FormStore, MemoryStore};
use formcanvas::{FormBuilder, FormFiller, UiOptions};

#[derive(Debug, Parser)]
#[command(
    name = "formcanvas",
    version,
    about = "Build, fill and publish multi-step forms from the terminal"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Create a new empty form document
    New {
        /// Name of the new form
        #[arg(long, default_value = "Untitled Form")]
        name: String,
        /// Where to write the form document
        #[arg(short = 'o', long = "output", value_name = "PATH")]
        output: PathBuf,
        /// Overwrite the output file if it already exists
        #[arg(short = 'f', long = "force")]
        force: bool,
    },
    /// Print a summary of a form document
    Inspect {
        /// Form document to read
        form: PathBuf,
    },
    /// Open the builder UI on a form document
    Edit {
        /// Form document to edit
        form: PathBuf,
        /// Write the edited form here instead of back to the input file
        #[arg(short = 'o', long = "output", value_name = "PATH")]
        output: Option<PathBuf>,
    },
    /// Fill a form in the terminal and write the submission
    Fill {
        /// Form document to fill
        form: PathBuf,
        /// Where to write the submission ("-" or omitted writes to stdout)
        #[arg(short = 'o', long = "output", value_name = "PATH")]
        output: Option<PathBuf>,
        /// Drop answers of fields hidden by their show condition
        #[arg(long = "clear-hidden")]
        clear_hidden: bool,
    },
    /// Render a standalone HTML page for a form
    Publish {
        /// Form document to publish
        form: PathBuf,
        /// Where to write the HTML page
        #[arg(short = 'o', long = "output", value_name = "PATH")]
        output: PathBuf,
        /// Base URL recorded as the share link
        #[arg(long = "base-url", default_value = "https://forms.local")]
        base_url: String,
        /// Overwrite the output file if it already exists
        #[arg(short = 'f', long = "force")]
        force: bool,
    },
}

fn main() -> Result<()> {
    color_eyre::install()?;
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    match Cli::parse().command {
        Command::New {
            name,
            output,
            force,
        } => cmd_new(&name, &output, force),
        Command::Inspect { form } => cmd_inspect(&form),
        Command::Edit { form, output } => cmd_edit(&form, output.as_deref()),
        Command::Fill {
            form,
            output,
            clear_hidden,
        } => cmd_fill(&form, output.as_deref(), clear_hidden),
        Command::Publish {
            form,
            output,
            base_url,
            force,
        } => cmd_publish(&form, &output, &base_url, force),
    }
}

fn cmd_new(name: &str, output: &Path, force: bool) -> Result<()> {
    ensure_writable(output, force)?;
    let form = Form::new(name);
    write_form(&form, output)?;
    println!("Created {} ({})", output.display(), form.id);
    Ok(())
}

fn cmd_inspect(path: &Path) -> Result<()> {
    let form = io::load_form(path).map_err(|err| eyre!("{err:#}"))?;
    println!("{} ({})", form.name, form.id);
    println!(
        "  fields: {} • published: {} • submissions: {}",
        form.fields.len(),
        if form.is_published { "yes" } else { "no" },
        form.submission_count
    );
    if let Some(url) = &form.publish_url {
        println!("  share url: {url}");
    }
    for step in steps::partition(&form.fields) {
        println!("  {} ({} fields)", step.display_title(), step.fields.len());
        for field in &step.fields {
            let mut notes = Vec::new();
            if field.required {
                notes.push("required".to_string());
            }
            if field.show_condition.enabled {
                notes.push("conditional".to_string());
            }
            let suffix = if notes.is_empty() {
                String::new()
            } else {
                format!(" [{}]", notes.join(", "))
            };
            println!("    {} · {}{}", field.label, field.field_type, suffix);
        }
    }
    Ok(())
}

fn cmd_edit(path: &Path, output: Option<&Path>) -> Result<()> {
    let form = io::load_form(path).map_err(|err| eyre!("{err:#}"))?;
    let edited = FormBuilder::new(form).run().map_err(|err| eyre!("{err:#}"))?;
    let destination = output.unwrap_or(path);
    write_form(&edited, destination)?;
    println!("Saved {}", destination.display());
    Ok(())
}

fn cmd_fill(path: &Path, output: Option<&Path>, clear_hidden: bool) -> Result<()> {
    let form = io::load_form(path).map_err(|err| eyre!("{err:#}"))?;
    let mut options = UiOptions::default();
    if clear_hidden {
        options = options.with_hidden_answers(formcanvas::engine::HiddenAnswerPolicy::Clear);
    }
    let submission = FormFiller::new(form)
        .with_options(options)
        .run()
        .map_err(|err| eyre!("{err:#}"))?;

    let destination = match output {
        Some(path) if path != Path::new("-") => OutputDestination::file(path),
        _ => OutputDestination::Stdout,
    };
    let format = match &destination {
        OutputDestination::File(path) => {
            DocumentFormat::from_extension(path).unwrap_or_default()
        }
        OutputDestination::Stdout => DocumentFormat::default(),
    };
    let options = OutputOptions::new(format).with_destinations(vec![destination]);
    io::emit(&submission, &options).map_err(|err| eyre!("{err:#}"))?;
    Ok(())
}

fn cmd_publish(path: &Path, output: &Path, base_url: &str, force: bool) -> Result<()> {
    ensure_writable(output, force)?;
    let form = io::load_form(path).map_err(|err| eyre!("{err:#}"))?;

    let mut store = MemoryStore::new().with_base_url(base_url);
    let created = store.create(form).map_err(|err| eyre!("{err:#}"))?;
    let published = store.publish(created.id).map_err(|err| eyre!("{err:#}"))?;

    let document = publish::render_document(&published);
    fs::write(output, document)
        .wrap_err_with(|| format!("failed to write {}", output.display()))?;
    // Persist the minted publish id/url back into the source document.
    write_form(&published, path)?;

    println!("Published {} -> {}", published.name, output.display());
    if let Some(url) = &published.publish_url {
        println!("Share url: {url}");
    }
    Ok(())
}

fn write_form(form: &Form, path: &Path) -> Result<()> {
    let format = DocumentFormat::from_extension(path).unwrap_or_default();
    let options = OutputOptions::new(format)
        .with_destinations(vec![OutputDestination::file(path)]);
    io::emit(form, &options).map_err(|err| eyre!("{err:#}"))
}

fn ensure_writable(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        return Err(eyre!(
            "file {} already exists (pass --force to overwrite)",
            path.display()
        ));
    }
    Ok(())
}
