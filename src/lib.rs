#![deny(rust_2018_idioms)]

pub mod app;
pub mod domain;
pub mod engine;
pub mod io;
pub mod presentation;
pub mod publish;
pub mod store;

pub use app::{FormBuilder, FormFiller, UiOptions};

pub mod prelude {
    pub use crate::app::{FormBuilder, FormFiller, UiOptions};
    pub use crate::domain::{Field, FieldId, FieldType, Form, Submission};
    pub use crate::engine::{
        EditorSession, FillFlow, HiddenAnswerPolicy, HistoryStack, StepOutcome,
    };
    pub use crate::store::{FormStore, MemoryStore};
}
