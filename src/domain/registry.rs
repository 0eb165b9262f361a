use super::field::{
    Field, FieldConfig, FieldId, FieldLayout, FieldType, ShowCondition, TextAlignment,
};

/// Palette grouping used by the builder's left pane.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaletteGroup {
    Basic,
    Choice,
    DateTime,
    Advanced,
    Content,
}

impl PaletteGroup {
    pub fn title(&self) -> &'static str {
        match self {
            PaletteGroup::Basic => "Basic",
            PaletteGroup::Choice => "Choice",
            PaletteGroup::DateTime => "Date & Time",
            PaletteGroup::Advanced => "Advanced",
            PaletteGroup::Content => "Content",
        }
    }
}

/// Static catalog entry for one field type.
#[derive(Debug, Clone, Copy)]
pub struct FieldTypeInfo {
    pub field_type: FieldType,
    pub label: &'static str,
    pub description: &'static str,
    pub group: PaletteGroup,
}

static CATALOG: [FieldTypeInfo; 27] = [
    FieldTypeInfo {
        field_type: FieldType::Text,
        label: "Text Field",
        description: "Single-line text input",
        group: PaletteGroup::Basic,
    },
    FieldTypeInfo {
        field_type: FieldType::Email,
        label: "Email",
        description: "Email address with format validation",
        group: PaletteGroup::Basic,
    },
    FieldTypeInfo {
        field_type: FieldType::Number,
        label: "Number",
        description: "Numeric input with optional bounds",
        group: PaletteGroup::Basic,
    },
    FieldTypeInfo {
        field_type: FieldType::Tel,
        label: "Phone",
        description: "Telephone number",
        group: PaletteGroup::Basic,
    },
    FieldTypeInfo {
        field_type: FieldType::Url,
        label: "Website",
        description: "URL input",
        group: PaletteGroup::Basic,
    },
    FieldTypeInfo {
        field_type: FieldType::Password,
        label: "Password",
        description: "Masked text input",
        group: PaletteGroup::Basic,
    },
    FieldTypeInfo {
        field_type: FieldType::Textarea,
        label: "Long Text",
        description: "Multi-line text area",
        group: PaletteGroup::Basic,
    },
    FieldTypeInfo {
        field_type: FieldType::Select,
        label: "Dropdown",
        description: "Pick one option from a list",
        group: PaletteGroup::Choice,
    },
    FieldTypeInfo {
        field_type: FieldType::Radio,
        label: "Radio Group",
        description: "Pick exactly one option",
        group: PaletteGroup::Choice,
    },
    FieldTypeInfo {
        field_type: FieldType::Checkbox,
        label: "Checkboxes",
        description: "Pick any number of options",
        group: PaletteGroup::Choice,
    },
    FieldTypeInfo {
        field_type: FieldType::Date,
        label: "Date",
        description: "Calendar date",
        group: PaletteGroup::DateTime,
    },
    FieldTypeInfo {
        field_type: FieldType::Time,
        label: "Time",
        description: "Time of day",
        group: PaletteGroup::DateTime,
    },
    FieldTypeInfo {
        field_type: FieldType::DateTime,
        label: "Date & Time",
        description: "Combined date and time",
        group: PaletteGroup::DateTime,
    },
    FieldTypeInfo {
        field_type: FieldType::Week,
        label: "Week",
        description: "ISO week picker",
        group: PaletteGroup::DateTime,
    },
    FieldTypeInfo {
        field_type: FieldType::Month,
        label: "Month",
        description: "Month picker",
        group: PaletteGroup::DateTime,
    },
    FieldTypeInfo {
        field_type: FieldType::Currency,
        label: "Currency",
        description: "Amount with a currency symbol",
        group: PaletteGroup::Advanced,
    },
    FieldTypeInfo {
        field_type: FieldType::Slider,
        label: "Slider",
        description: "Value chosen on a sliding scale",
        group: PaletteGroup::Advanced,
    },
    FieldTypeInfo {
        field_type: FieldType::Range,
        label: "Range",
        description: "Bounded numeric range control",
        group: PaletteGroup::Advanced,
    },
    FieldTypeInfo {
        field_type: FieldType::Color,
        label: "Color",
        description: "Color swatch picker",
        group: PaletteGroup::Advanced,
    },
    FieldTypeInfo {
        field_type: FieldType::File,
        label: "File Upload",
        description: "Attach one or more files",
        group: PaletteGroup::Advanced,
    },
    FieldTypeInfo {
        field_type: FieldType::Rating,
        label: "Rating",
        description: "Star rating",
        group: PaletteGroup::Advanced,
    },
    FieldTypeInfo {
        field_type: FieldType::Heading,
        label: "Heading",
        description: "Section heading text",
        group: PaletteGroup::Content,
    },
    FieldTypeInfo {
        field_type: FieldType::Paragraph,
        label: "Paragraph",
        description: "Static body text",
        group: PaletteGroup::Content,
    },
    FieldTypeInfo {
        field_type: FieldType::Divider,
        label: "Divider",
        description: "Horizontal rule",
        group: PaletteGroup::Content,
    },
    FieldTypeInfo {
        field_type: FieldType::Image,
        label: "Image",
        description: "Embedded image",
        group: PaletteGroup::Content,
    },
    FieldTypeInfo {
        field_type: FieldType::Html,
        label: "HTML Block",
        description: "Raw markup block",
        group: PaletteGroup::Content,
    },
    FieldTypeInfo {
        field_type: FieldType::PageBreak,
        label: "Page Break",
        description: "Split the form into steps",
        group: PaletteGroup::Content,
    },
];

/// The full palette catalog, in display order.
pub fn catalog() -> &'static [FieldTypeInfo] {
    &CATALOG
}

pub fn info(field_type: FieldType) -> &'static FieldTypeInfo {
    CATALOG
        .iter()
        .find(|entry| entry.field_type == field_type)
        .expect("catalog covers every field type")
}

/// Default display label for a freshly created field of this type.
pub fn default_label(field_type: FieldType) -> &'static str {
    info(field_type).label
}

/// Type-appropriate default configuration; no required key is ever left unset.
pub fn default_config(field_type: FieldType) -> FieldConfig {
    match field_type {
        FieldType::Select | FieldType::Radio | FieldType::Checkbox => FieldConfig::Choice {
            options: vec!["Option 1".to_string(), "Option 2".to_string()],
        },
        FieldType::Number => FieldConfig::Numeric {
            min: None,
            max: None,
            step: 1.0,
            default_value: None,
        },
        FieldType::Slider | FieldType::Range => FieldConfig::Numeric {
            min: Some(0.0),
            max: Some(100.0),
            step: 1.0,
            default_value: Some(50.0),
        },
        FieldType::Currency => FieldConfig::Currency {
            symbol: "$".to_string(),
            code: "USD".to_string(),
            min: None,
            max: None,
        },
        FieldType::Rating => FieldConfig::Rating { max_rating: 5 },
        FieldType::File => FieldConfig::File {
            accepted_types: Vec::new(),
            allow_multiple: false,
        },
        FieldType::Heading => FieldConfig::Heading {
            text: "Heading".to_string(),
            level: 2,
            alignment: TextAlignment::Left,
        },
        FieldType::Paragraph => FieldConfig::Paragraph {
            text: "Paragraph text".to_string(),
            alignment: TextAlignment::Left,
        },
        FieldType::Image => FieldConfig::Image {
            src: String::new(),
            alt: String::new(),
        },
        FieldType::Html => FieldConfig::Html {
            markup: String::new(),
        },
        FieldType::Divider => FieldConfig::Divider,
        FieldType::PageBreak => FieldConfig::PageBreak {
            step_title: String::new(),
        },
        _ => FieldConfig::Plain,
    }
}

fn default_placeholder(field_type: FieldType) -> String {
    match field_type {
        FieldType::Text => "Enter text".to_string(),
        FieldType::Email => "name@example.com".to_string(),
        FieldType::Tel => "+1 555 000 0000".to_string(),
        FieldType::Url => "https://".to_string(),
        FieldType::Textarea => "Enter a longer answer".to_string(),
        _ => String::new(),
    }
}

/// Instantiate a field of the given type with registry defaults applied.
pub fn create_field(field_type: FieldType, id: FieldId) -> Field {
    Field {
        id,
        field_type,
        label: default_label(field_type).to_string(),
        placeholder: default_placeholder(field_type),
        help_text: String::new(),
        required: false,
        config: default_config(field_type),
        layout: FieldLayout::default(),
        show_condition: ShowCondition::always(),
        position: 0,
    }
}

/// Rejection reasons for a field draft, reported before the field joins the list.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DraftError {
    #[error("{0} fields need at least one option")]
    NoOptions(FieldType),
    #[error("minimum {min} is greater than maximum {max}")]
    InvertedBounds { min: f64, max: f64 },
    #[error("max rating {0} is outside 1..=10")]
    RatingOutOfRange(u8),
    #[error("config kind does not match field type {0}")]
    ConfigMismatch(FieldType),
}

/// Validate a field draft against the registry rules.
///
/// Runs on every admission path: palette drops, duplication and programmatic
/// insertion all pass through here before the list is touched.
pub fn validate_draft(field: &Field) -> Result<(), DraftError> {
    if field.field_type.has_options() != matches!(field.config, FieldConfig::Choice { .. }) {
        return Err(DraftError::ConfigMismatch(field.field_type));
    }
    match &field.config {
        FieldConfig::Choice { options } => {
            if options.is_empty() {
                return Err(DraftError::NoOptions(field.field_type));
            }
        }
        FieldConfig::Numeric { min, max, .. } | FieldConfig::Currency { min, max, .. } => {
            if let (Some(min), Some(max)) = (min, max)
                && min > max
            {
                return Err(DraftError::InvertedBounds {
                    min: *min,
                    max: *max,
                });
            }
        }
        FieldConfig::Rating { max_rating } => {
            if !(1..=10).contains(max_rating) {
                return Err(DraftError::RatingOutOfRange(*max_rating));
            }
        }
        _ => {}
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_type_gets_a_complete_default_config() {
        for (idx, kind) in FieldType::ALL.iter().enumerate() {
            let field = create_field(*kind, FieldId(idx as u64));
            validate_draft(&field).expect("registry defaults must be admissible");
            if kind.has_options() {
                let options = field.config.options().expect("choice config");
                assert!(!options.is_empty(), "{kind} must default to options");
            }
        }
    }

    #[test]
    fn catalog_covers_every_type_once() {
        assert_eq!(catalog().len(), FieldType::ALL.len());
        for kind in FieldType::ALL {
            assert_eq!(info(kind).field_type, kind);
        }
    }

    #[test]
    fn rejects_empty_choice_options() {
        let mut field = create_field(FieldType::Select, FieldId(1));
        field.config = FieldConfig::Choice {
            options: Vec::new(),
        };
        assert_eq!(
            validate_draft(&field),
            Err(DraftError::NoOptions(FieldType::Select))
        );
    }

    #[test]
    fn rejects_inverted_numeric_bounds() {
        let mut field = create_field(FieldType::Number, FieldId(1));
        field.config = FieldConfig::Numeric {
            min: Some(10.0),
            max: Some(2.0),
            step: 1.0,
            default_value: None,
        };
        assert!(matches!(
            validate_draft(&field),
            Err(DraftError::InvertedBounds { .. })
        ));
    }

    #[test]
    fn rejects_rating_outside_range() {
        let mut field = create_field(FieldType::Rating, FieldId(1));
        field.config = FieldConfig::Rating { max_rating: 11 };
        assert_eq!(
            validate_draft(&field),
            Err(DraftError::RatingOutOfRange(11))
        );
        field.config = FieldConfig::Rating { max_rating: 0 };
        assert_eq!(validate_draft(&field), Err(DraftError::RatingOutOfRange(0)));
    }

    #[test]
    fn unknown_wire_tags_fail_to_parse() {
        assert!("telepathy".parse::<FieldType>().is_err());
        assert_eq!(
            "page-break".parse::<FieldType>().unwrap(),
            FieldType::PageBreak
        );
        assert_eq!(
            "datetime".parse::<FieldType>().unwrap(),
            FieldType::DateTime
        );
    }
}
