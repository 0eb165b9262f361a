use crate::domain::{AnswerMap, ConditionOperator, Field, ShowCondition};

/// Evaluate a show condition against the current answers.
///
/// Total over every condition/answer combination: a disabled rule, an unset
/// reference or a reference to a field absent from the answers all resolve
/// without error. An absent answer behaves as the empty string.
pub fn evaluate(condition: &ShowCondition, answers: &AnswerMap) -> bool {
    if !condition.enabled {
        return true;
    }
    let Some(field_id) = condition.field_id else {
        return true;
    };
    let answer = answers.get(&field_id).map(String::as_str).unwrap_or("");
    match condition.operator {
        ConditionOperator::Equals => answer == condition.value,
        ConditionOperator::NotEquals => answer != condition.value,
        ConditionOperator::Contains => {
            !answer.is_empty()
                && answer
                    .to_lowercase()
                    .contains(&condition.value.to_lowercase())
        }
        ConditionOperator::IsEmpty => answer.is_empty(),
        ConditionOperator::IsNotEmpty => !answer.is_empty(),
    }
}

/// Evaluate a condition with the field list as integrity context.
///
/// A rule referencing a field that is no longer on the form degrades to
/// always-visible (treated as disabled) instead of hiding its owner forever;
/// `evaluate` alone keeps the pure empty-answer semantics.
pub fn evaluate_for(fields: &[Field], condition: &ShowCondition, answers: &AnswerMap) -> bool {
    if condition.enabled
        && let Some(field_id) = condition.field_id
        && !fields.iter().any(|field| field.id == field_id)
    {
        return true;
    }
    evaluate(condition, answers)
}

/// Fields whose show condition currently holds, in list order.
pub fn visible_fields<'a>(fields: &'a [Field], answers: &AnswerMap) -> Vec<&'a Field> {
    fields
        .iter()
        .filter(|field| evaluate_for(fields, &field.show_condition, answers))
        .collect()
}

/// Human-readable summary of a rule, shown in the properties pane.
pub fn describe(condition: &ShowCondition, fields: &[Field]) -> String {
    if !condition.enabled {
        return "Always visible".to_string();
    }
    let Some(field_id) = condition.field_id else {
        return "Always visible".to_string();
    };
    let target = fields
        .iter()
        .find(|field| field.id == field_id)
        .map(|field| field.label.clone())
        .unwrap_or_else(|| format!("deleted field #{field_id}"));
    let clause = match condition.operator {
        ConditionOperator::Equals => format!("equals \"{}\"", condition.value),
        ConditionOperator::NotEquals => format!("does not equal \"{}\"", condition.value),
        ConditionOperator::Contains => format!("contains \"{}\"", condition.value),
        ConditionOperator::IsEmpty => "is empty".to_string(),
        ConditionOperator::IsNotEmpty => "is not empty".to_string(),
    };
    format!("Visible when {target} {clause}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::registry::create_field;
    use crate::domain::{FieldId, FieldType};

    fn answers(pairs: &[(u64, &str)]) -> AnswerMap {
        pairs
            .iter()
            .map(|(id, value)| (FieldId(*id), value.to_string()))
            .collect()
    }

    #[test]
    fn disabled_or_unset_rules_are_always_true() {
        let mut rule = ShowCondition::always();
        assert!(evaluate(&rule, &answers(&[])));
        rule.enabled = true;
        rule.field_id = None;
        assert!(evaluate(&rule, &answers(&[])));
    }

    #[test]
    fn equals_is_string_identity() {
        let rule = ShowCondition::when(FieldId(7), ConditionOperator::Equals, "yes");
        assert!(evaluate(&rule, &answers(&[(7, "yes")])));
        assert!(!evaluate(&rule, &answers(&[(7, "Yes")])));
        assert!(!evaluate(&rule, &answers(&[])));
    }

    #[test]
    fn contains_is_case_insensitive_and_false_on_empty() {
        let rule = ShowCondition::when(FieldId(7), ConditionOperator::Contains, "Ship");
        assert!(evaluate(&rule, &answers(&[(7, "worldwide shipping")])));
        assert!(!evaluate(&rule, &answers(&[(7, "")])));
        assert!(!evaluate(&rule, &answers(&[])));
    }

    #[test]
    fn emptiness_operators_treat_missing_as_empty() {
        let empty = ShowCondition::when(FieldId(9), ConditionOperator::IsEmpty, "");
        let not_empty = ShowCondition::when(FieldId(9), ConditionOperator::IsNotEmpty, "");
        assert!(evaluate(&empty, &answers(&[])));
        assert!(!evaluate(&not_empty, &answers(&[])));
        assert!(evaluate(&not_empty, &answers(&[(9, "x")])));
    }

    #[test]
    fn reference_to_missing_field_behaves_as_empty_answer() {
        // NotEquals against "" on a missing answer: "" != "true" holds.
        let rule = ShowCondition::when(FieldId(404), ConditionOperator::NotEquals, "true");
        assert!(evaluate(&rule, &answers(&[])));
    }

    #[test]
    fn conditional_select_is_filtered_from_visible_set() {
        let mut ships = create_field(FieldType::Radio, FieldId(1));
        ships.label = "Ships internationally".to_string();
        let mut country = create_field(FieldType::Select, FieldId(2));
        country.label = "Country".to_string();
        country.show_condition = ShowCondition::when(FieldId(1), ConditionOperator::Equals, "true");
        let fields = vec![ships, country];

        let hidden = visible_fields(&fields, &answers(&[(1, "false")]));
        assert_eq!(hidden.len(), 1);
        assert_eq!(hidden[0].id, FieldId(1));

        let shown = visible_fields(&fields, &answers(&[(1, "true")]));
        assert_eq!(shown.len(), 2);
    }

    #[test]
    fn dangling_references_degrade_to_always_visible() {
        let mut dependent = create_field(FieldType::Text, FieldId(2));
        dependent.show_condition = ShowCondition::when(FieldId(99), ConditionOperator::Equals, "x");
        let fields = vec![dependent];

        // Pure evaluation sees an empty answer and fails the equals rule...
        assert!(!evaluate(&fields[0].show_condition, &answers(&[])));
        // ...but against the field list the dangling rule is treated as disabled.
        assert!(evaluate_for(&fields, &fields[0].show_condition, &answers(&[])));
        assert_eq!(visible_fields(&fields, &answers(&[])).len(), 1);
    }

    #[test]
    fn describe_degrades_for_deleted_targets() {
        let rule = ShowCondition::when(FieldId(42), ConditionOperator::Equals, "x");
        let text = describe(&rule, &[]);
        assert!(text.contains("deleted field #42"));
    }
}
