use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::field::{Field, FieldId};

/// Ordered answer set collected by the filler. Keys are field ids; values are
/// plain strings (checkbox selections are comma-joined).
pub type AnswerMap = IndexMap<FieldId, String>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NotificationSettings {
    pub enabled: bool,
    pub recipients: Vec<String>,
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            recipients: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ThankYouSettings {
    pub use_custom: bool,
    pub message: String,
    pub redirect_url: String,
    pub show_create_form_button: bool,
}

impl Default for ThankYouSettings {
    fn default() -> Self {
        Self {
            use_custom: false,
            message: "Thank you! Your response has been recorded.".to_string(),
            redirect_url: String::new(),
            show_create_form_button: true,
        }
    }
}

/// Minimal style record carried by the document and inlined at publish time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FormStyle {
    pub background_color: String,
    pub accent_color: String,
    pub text_color: String,
    pub font_family: String,
}

impl Default for FormStyle {
    fn default() -> Self {
        Self {
            background_color: "#f6f7f9".to_string(),
            accent_color: "#4f46e5".to_string(),
            text_color: "#1f2430".to_string(),
            font_family: "system-ui, sans-serif".to_string(),
        }
    }
}

/// A form definition: the field list plus its surrounding settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Form {
    pub id: Uuid,
    pub name: String,
    pub fields: Vec<Field>,
    #[serde(default)]
    pub style: FormStyle,
    #[serde(default)]
    pub notifications: NotificationSettings,
    #[serde(default)]
    pub thank_you: ThankYouSettings,
    #[serde(default)]
    pub is_published: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publish_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publish_url: Option<String>,
    #[serde(default)]
    pub submission_count: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Form {
    pub fn new(name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            fields: Vec::new(),
            style: FormStyle::default(),
            notifications: NotificationSettings::default(),
            thank_you: ThankYouSettings::default(),
            is_published: false,
            publish_id: None,
            publish_url: None,
            submission_count: 0,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn field(&self, id: FieldId) -> Option<&Field> {
        self.fields.iter().find(|field| field.id == id)
    }

    pub fn field_mut(&mut self, id: FieldId) -> Option<&mut Field> {
        self.fields.iter_mut().find(|field| field.id == id)
    }

    pub fn field_index(&self, id: FieldId) -> Option<usize> {
        self.fields.iter().position(|field| field.id == id)
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

/// One collected response; immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    pub form_id: Uuid,
    pub answers: AnswerMap,
    pub submitted_at: DateTime<Utc>,
}

impl Submission {
    pub fn new(form_id: Uuid, answers: AnswerMap) -> Self {
        Self {
            form_id,
            answers,
            submitted_at: Utc::now(),
        }
    }
}
