mod field;
mod form;
pub mod registry;

pub use field::{
    ConditionOperator, Field, FieldConfig, FieldId, FieldLayout, FieldType, LayoutWidth,
    ShowCondition, TextAlignment, UnknownFieldType,
};
pub use form::{AnswerMap, Form, FormStyle, NotificationSettings, Submission, ThankYouSettings};
pub use registry::{DraftError, FieldTypeInfo, PaletteGroup};
