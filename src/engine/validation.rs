use std::sync::LazyLock;

use regex::Regex;

use crate::domain::{AnswerMap, Field, FieldId, FieldType};

use super::condition;

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is a valid regex")
});

/// One user-visible validation failure, addressed to a field.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldIssue {
    pub field_id: FieldId,
    pub message: String,
}

/// Validate a single answer against a field's rules.
///
/// Callers are expected to have filtered to visible fields first; hidden
/// fields are exempt from every rule here.
pub fn validate_answer(field: &Field, answer: &str) -> Option<String> {
    if !field.field_type.is_input() {
        return None;
    }
    let trimmed = answer.trim();
    if trimmed.is_empty() {
        if field.required {
            return Some(format!("{} is required", field.label));
        }
        return None;
    }
    if field.field_type == FieldType::Email && !EMAIL_PATTERN.is_match(trimmed) {
        return Some(format!("{} must be a valid email address", field.label));
    }
    if field.field_type.is_numeric() {
        let Ok(value) = trimmed.parse::<f64>() else {
            return Some(format!("{} must be a number", field.label));
        };
        if let Some((min, max)) = field.config.numeric_bounds() {
            if let Some(min) = min
                && value < min
            {
                return Some(format!("{} must be at least {min}", field.label));
            }
            if let Some(max) = max
                && value > max
            {
                return Some(format!("{} must be at most {max}", field.label));
            }
        }
    }
    None
}

/// Validate the currently visible subset of `candidates` against `answers`.
///
/// `form_fields` is the whole field list, used as visibility context (a rule
/// referencing a deleted field degrades to always-visible). Fields hidden by
/// their show condition are skipped entirely, so a required field that is not
/// visible never blocks progress.
pub fn validate_fields<'a>(
    form_fields: &[Field],
    candidates: impl IntoIterator<Item = &'a Field>,
    answers: &AnswerMap,
) -> Vec<FieldIssue> {
    candidates
        .into_iter()
        .filter(|field| condition::evaluate_for(form_fields, &field.show_condition, answers))
        .filter_map(|field| {
            let answer = answers.get(&field.id).map(String::as_str).unwrap_or("");
            validate_answer(field, answer).map(|message| FieldIssue {
                field_id: field.id,
                message,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::registry::create_field;
    use crate::domain::{ConditionOperator, FieldConfig, ShowCondition};

    fn answers(pairs: &[(u64, &str)]) -> AnswerMap {
        pairs
            .iter()
            .map(|(id, value)| (FieldId(*id), value.to_string()))
            .collect()
    }

    #[test]
    fn required_and_empty_is_an_error() {
        let mut field = create_field(FieldType::Email, FieldId(1));
        field.label = "Email".to_string();
        field.required = true;
        assert_eq!(
            validate_answer(&field, ""),
            Some("Email is required".to_string())
        );
        assert_eq!(validate_answer(&field, "   "), Some("Email is required".to_string()));
    }

    #[test]
    fn optional_and_empty_passes() {
        let field = create_field(FieldType::Text, FieldId(1));
        assert_eq!(validate_answer(&field, ""), None);
    }

    #[test]
    fn email_pattern_is_enforced_on_non_empty_values() {
        let mut field = create_field(FieldType::Email, FieldId(1));
        field.label = "Email".to_string();
        assert!(validate_answer(&field, "not-an-email").is_some());
        assert!(validate_answer(&field, "name@host").is_some());
        assert_eq!(validate_answer(&field, "name@example.com"), None);
    }

    #[test]
    fn numeric_values_respect_declared_bounds() {
        let mut field = create_field(FieldType::Number, FieldId(1));
        field.label = "Age".to_string();
        field.config = FieldConfig::Numeric {
            min: Some(1.0),
            max: Some(120.0),
            step: 1.0,
            default_value: None,
        };
        assert_eq!(
            validate_answer(&field, "abc"),
            Some("Age must be a number".to_string())
        );
        assert_eq!(
            validate_answer(&field, "0"),
            Some("Age must be at least 1".to_string())
        );
        assert_eq!(
            validate_answer(&field, "500"),
            Some("Age must be at most 120".to_string())
        );
        assert_eq!(validate_answer(&field, "42"), None);
    }

    #[test]
    fn content_blocks_never_produce_issues() {
        let mut field = create_field(FieldType::Heading, FieldId(1));
        field.required = true;
        assert_eq!(validate_answer(&field, ""), None);
    }

    #[test]
    fn hidden_required_fields_are_exempt() {
        let mut gate = create_field(FieldType::Radio, FieldId(1));
        gate.label = "Ships internationally".to_string();
        let mut country = create_field(FieldType::Select, FieldId(2));
        country.label = "Country".to_string();
        country.required = true;
        country.show_condition = ShowCondition::when(FieldId(1), ConditionOperator::Equals, "true");
        let fields = vec![gate, country];

        let issues = validate_fields(&fields, &fields, &answers(&[(1, "false")]));
        assert!(issues.is_empty());

        let issues = validate_fields(&fields, &fields, &answers(&[(1, "true")]));
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].field_id, FieldId(2));
    }

    #[test]
    fn required_field_with_a_dangling_condition_is_validated() {
        let mut orphan = create_field(FieldType::Text, FieldId(2));
        orphan.label = "Orphan".to_string();
        orphan.required = true;
        orphan.show_condition = ShowCondition::when(FieldId(99), ConditionOperator::Equals, "x");
        let fields = vec![orphan];

        // Degrades to visible, so the required rule applies again.
        let issues = validate_fields(&fields, &fields, &answers(&[]));
        assert_eq!(issues.len(), 1);
    }
}
