use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Stable identity of a field within one form. Join key for show conditions.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
#[serde(transparent)]
pub struct FieldId(pub u64);

impl fmt::Display for FieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FieldType {
    Text,
    Email,
    Number,
    Tel,
    Url,
    Password,
    Textarea,
    Select,
    Radio,
    Checkbox,
    Date,
    Time,
    #[serde(rename = "datetime")]
    DateTime,
    Week,
    Month,
    Currency,
    Slider,
    Range,
    Color,
    File,
    Rating,
    Heading,
    Paragraph,
    Divider,
    Image,
    Html,
    PageBreak,
}

impl FieldType {
    pub const ALL: [FieldType; 27] = [
        FieldType::Text,
        FieldType::Email,
        FieldType::Number,
        FieldType::Tel,
        FieldType::Url,
        FieldType::Password,
        FieldType::Textarea,
        FieldType::Select,
        FieldType::Radio,
        FieldType::Checkbox,
        FieldType::Date,
        FieldType::Time,
        FieldType::DateTime,
        FieldType::Week,
        FieldType::Month,
        FieldType::Currency,
        FieldType::Slider,
        FieldType::Range,
        FieldType::Color,
        FieldType::File,
        FieldType::Rating,
        FieldType::Heading,
        FieldType::Paragraph,
        FieldType::Divider,
        FieldType::Image,
        FieldType::Html,
        FieldType::PageBreak,
    ];

    /// Wire tag, matching the serialized form.
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::Text => "text",
            FieldType::Email => "email",
            FieldType::Number => "number",
            FieldType::Tel => "tel",
            FieldType::Url => "url",
            FieldType::Password => "password",
            FieldType::Textarea => "textarea",
            FieldType::Select => "select",
            FieldType::Radio => "radio",
            FieldType::Checkbox => "checkbox",
            FieldType::Date => "date",
            FieldType::Time => "time",
            FieldType::DateTime => "datetime",
            FieldType::Week => "week",
            FieldType::Month => "month",
            FieldType::Currency => "currency",
            FieldType::Slider => "slider",
            FieldType::Range => "range",
            FieldType::Color => "color",
            FieldType::File => "file",
            FieldType::Rating => "rating",
            FieldType::Heading => "heading",
            FieldType::Paragraph => "paragraph",
            FieldType::Divider => "divider",
            FieldType::Image => "image",
            FieldType::Html => "html",
            FieldType::PageBreak => "page-break",
        }
    }

    /// Content blocks render static markup and never collect an answer.
    pub fn is_input(&self) -> bool {
        !matches!(
            self,
            FieldType::Heading
                | FieldType::Paragraph
                | FieldType::Divider
                | FieldType::Image
                | FieldType::Html
                | FieldType::PageBreak
        )
    }

    pub fn is_page_break(&self) -> bool {
        matches!(self, FieldType::PageBreak)
    }

    /// Answer must parse as a number and respect declared bounds.
    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            FieldType::Number | FieldType::Currency | FieldType::Slider | FieldType::Range
        )
    }

    /// Options-backed controls (select/radio/checkbox).
    pub fn has_options(&self) -> bool {
        matches!(
            self,
            FieldType::Select | FieldType::Radio | FieldType::Checkbox
        )
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FieldType {
    type Err = UnknownFieldType;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        FieldType::ALL
            .iter()
            .find(|kind| kind.as_str() == raw)
            .copied()
            .ok_or_else(|| UnknownFieldType {
                tag: raw.to_string(),
            })
    }
}

#[derive(Debug, Clone, thiserror::Error)]
#[error("unknown field type '{tag}'")]
pub struct UnknownFieldType {
    pub tag: String,
}

/// Type-specific configuration payload, one variant per field family.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum FieldConfig {
    /// Plain inputs (text, email, date variants, color, ...) need no extra config.
    Plain,
    #[serde(rename_all = "camelCase")]
    Choice { options: Vec<String> },
    #[serde(rename_all = "camelCase")]
    Numeric {
        min: Option<f64>,
        max: Option<f64>,
        step: f64,
        default_value: Option<f64>,
    },
    #[serde(rename_all = "camelCase")]
    Currency {
        symbol: String,
        code: String,
        min: Option<f64>,
        max: Option<f64>,
    },
    #[serde(rename_all = "camelCase")]
    Rating { max_rating: u8 },
    #[serde(rename_all = "camelCase")]
    File {
        accepted_types: Vec<String>,
        allow_multiple: bool,
    },
    #[serde(rename_all = "camelCase")]
    Heading {
        text: String,
        level: u8,
        alignment: TextAlignment,
    },
    #[serde(rename_all = "camelCase")]
    Paragraph {
        text: String,
        alignment: TextAlignment,
    },
    #[serde(rename_all = "camelCase")]
    Image { src: String, alt: String },
    #[serde(rename_all = "camelCase")]
    Html { markup: String },
    Divider,
    #[serde(rename_all = "camelCase")]
    PageBreak { step_title: String },
}

impl FieldConfig {
    pub fn options(&self) -> Option<&[String]> {
        match self {
            FieldConfig::Choice { options } => Some(options),
            _ => None,
        }
    }

    pub fn numeric_bounds(&self) -> Option<(Option<f64>, Option<f64>)> {
        match self {
            FieldConfig::Numeric { min, max, .. } | FieldConfig::Currency { min, max, .. } => {
                Some((*min, *max))
            }
            _ => None,
        }
    }

    pub fn step_title(&self) -> Option<&str> {
        match self {
            FieldConfig::PageBreak { step_title } => Some(step_title),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TextAlignment {
    #[default]
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LayoutWidth {
    #[default]
    Full,
    Half,
    Third,
    Quarter,
}

/// Layout hints consumed by the canvas and the published page grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FieldLayout {
    pub column_span: u8,
    pub width: LayoutWidth,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grid_column: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grid_row: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub align_self: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub justify_self: Option<String>,
}

impl Default for FieldLayout {
    fn default() -> Self {
        Self {
            column_span: 1,
            width: LayoutWidth::Full,
            grid_column: None,
            grid_row: None,
            align_self: None,
            justify_self: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConditionOperator {
    #[default]
    Equals,
    NotEquals,
    Contains,
    IsEmpty,
    IsNotEmpty,
}

/// Visibility rule tying one field to another field's current answer.
///
/// A rule that references a field no longer on the form degrades to
/// always-visible rather than erroring.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ShowCondition {
    pub enabled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field_id: Option<FieldId>,
    pub operator: ConditionOperator,
    pub value: String,
}

impl ShowCondition {
    pub fn always() -> Self {
        Self::default()
    }

    pub fn when(field_id: FieldId, operator: ConditionOperator, value: impl Into<String>) -> Self {
        Self {
            enabled: true,
            field_id: Some(field_id),
            operator,
            value: value.into(),
        }
    }
}

/// One configurable unit on a form: an input control or a static content block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Field {
    pub id: FieldId,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    pub label: String,
    #[serde(default)]
    pub placeholder: String,
    #[serde(default)]
    pub help_text: String,
    #[serde(default)]
    pub required: bool,
    pub config: FieldConfig,
    #[serde(default)]
    pub layout: FieldLayout,
    #[serde(default)]
    pub show_condition: ShowCondition,
    #[serde(default)]
    pub position: usize,
}

impl Field {
    /// Label with the required marker, as shown on cards and rendered pages.
    pub fn display_label(&self) -> String {
        if self.required {
            format!("{} *", self.label)
        } else {
            self.label.clone()
        }
    }
}
