use formcanvas::domain::{ConditionOperator, FieldConfig, ShowCondition};
use formcanvas::engine::steps;
use formcanvas::prelude::*;

type AppResult<T> = Result<T, Box<dyn std::error::Error>>;

/// Assemble a small multi-step form through the editing session, then walk it
/// with the fill flow and print the resulting submission.
fn main() -> AppResult<()> {
    let mut editor = EditorSession::open(Form::new("Event RSVP"));

    let name = editor.add_field(FieldType::Text, 0)?;
    editor.update_field(name, |field| {
        field.label = "Full name".to_string();
        field.required = true;
    })?;

    let attending = editor.add_field(FieldType::Radio, 1)?;
    editor.update_field(attending, |field| {
        field.label = "Attending?".to_string();
        field.config = FieldConfig::Choice {
            options: vec!["Yes".to_string(), "No".to_string()],
        };
    })?;

    let page_break = editor.add_field(FieldType::PageBreak, 2)?;
    editor.update_field(page_break, |field| {
        field.config = FieldConfig::PageBreak {
            step_title: "Details".to_string(),
        };
    })?;

    let diet = editor.add_field(FieldType::Textarea, 3)?;
    editor.update_field(diet, |field| {
        field.label = "Dietary notes".to_string();
        field.show_condition = ShowCondition::when(attending, ConditionOperator::Equals, "Yes");
    })?;

    let form = editor.into_form();
    for step in steps::partition(&form.fields) {
        println!("{} — {} fields", step.display_title(), step.fields.len());
    }

    let mut flow = FillFlow::start(form);
    flow.set_answer(name, "Ada Lovelace");
    flow.set_answer(attending, "Yes");
    assert!(matches!(flow.next(), StepOutcome::Advanced));
    flow.set_answer(diet, "vegetarian");
    let StepOutcome::Submitted(submission) = flow.next() else {
        return Err("expected a submission".into());
    };

    println!("submitted {} answers", submission.answers.len());
    Ok(())
}
