pub mod condition;
pub mod drag;
mod editor;
mod flow;
mod history;
pub mod steps;
pub mod validation;

pub use drag::{CardBounds, DragController, DragPayload, TransferError, insertion_index};
pub use editor::{DropOutcome, EditorError, EditorSession};
pub use flow::{FillFlow, HiddenAnswerPolicy, StepOutcome};
pub use history::{HistoryStack, MAX_ENTRIES, Snapshot};
pub use steps::{FormStep, partition};
pub use condition::{evaluate, evaluate_for, visible_fields};
pub use validation::{FieldIssue, validate_answer, validate_fields};
