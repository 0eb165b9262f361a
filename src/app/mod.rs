mod builder;
mod filler;
mod options;
mod status;
mod terminal;

pub use builder::FormBuilder;
pub use filler::FormFiller;
pub use options::UiOptions;
pub use status::StatusLine;
