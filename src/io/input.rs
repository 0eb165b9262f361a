use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde_json::Value;

use crate::domain::Form;

use super::DocumentFormat;

/// Parse structured data in any supported format into a `serde_json::Value`.
pub fn parse_document_str(contents: &str, format: DocumentFormat) -> Result<Value> {
    match format {
        DocumentFormat::Json => {
            serde_json::from_str::<Value>(contents).context("failed to parse JSON document")
        }
        #[cfg(feature = "yaml")]
        DocumentFormat::Yaml => {
            serde_yaml::from_str::<Value>(contents).context("failed to parse YAML document")
        }
        #[cfg(feature = "toml")]
        DocumentFormat::Toml => contents
            .parse::<toml::Value>()
            .context("failed to parse TOML document")
            .and_then(|value| serde_json::to_value(value).context("failed to convert TOML to JSON")),
    }
}

/// Deserialize a form definition from document text.
pub fn form_from_str(contents: &str, format: DocumentFormat) -> Result<Form> {
    let value = parse_document_str(contents, format)?;
    serde_json::from_value(value).context("document is not a valid form definition")
}

/// Load a form definition file, inferring the format from its extension.
pub fn load_form(path: &Path) -> Result<Form> {
    let format = DocumentFormat::from_extension(path).unwrap_or_default();
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read form file {}", path.display()))?;
    form_from_str(&contents, format)
        .with_context(|| format!("failed to load form from {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::registry::create_field;
    use crate::domain::{FieldId, FieldType};

    #[test]
    fn form_documents_round_trip_through_json() {
        let mut form = Form::new("Round trip");
        form.fields
            .push(create_field(FieldType::Select, FieldId(1)));
        let text = serde_json::to_string_pretty(&form).unwrap();
        let loaded = form_from_str(&text, DocumentFormat::Json).unwrap();
        assert_eq!(loaded, form);
    }

    #[test]
    fn field_type_tags_use_the_wire_names() {
        let mut form = Form::new("tags");
        form.fields
            .push(create_field(FieldType::PageBreak, FieldId(1)));
        form.fields
            .push(create_field(FieldType::DateTime, FieldId(2)));
        let text = serde_json::to_string(&form).unwrap();
        assert!(text.contains("\"page-break\""));
        assert!(text.contains("\"datetime\""));
    }

    #[test]
    fn invalid_documents_are_rejected_with_context() {
        let err = form_from_str("{\"name\": 12}", DocumentFormat::Json).unwrap_err();
        assert!(err.to_string().contains("form definition"));
    }

    #[cfg(feature = "yaml")]
    #[test]
    fn yaml_documents_parse_when_enabled() {
        let raw = "name: demo\nenabled: true";
        let parsed = parse_document_str(raw, DocumentFormat::Yaml).unwrap();
        assert_eq!(parsed["name"], serde_json::json!("demo"));
    }
}
