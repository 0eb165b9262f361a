mod format;
mod input;
mod output;

pub use format::DocumentFormat;
pub use input::{form_from_str, load_form, parse_document_str};
pub use output::{OutputDestination, OutputOptions, emit};
