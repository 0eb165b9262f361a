use crate::domain::Field;

/// One wizard step: the fields between two page breaks.
#[derive(Debug, Clone)]
pub struct FormStep<'a> {
    pub index: usize,
    pub title: Option<String>,
    pub fields: Vec<&'a Field>,
}

impl FormStep<'_> {
    /// Title shown in step indicators, falling back to "Step N".
    pub fn display_title(&self) -> String {
        match &self.title {
            Some(title) if !title.is_empty() => title.clone(),
            _ => format!("Step {}", self.index + 1),
        }
    }
}

/// Split the ordered field list into steps at page-break boundaries.
///
/// The break itself is consumed as a separator: it closes the current bucket
/// (when non-empty) and opens the next one, donating its step title. Zero
/// breaks yield a single bucket; a list of only breaks yields one empty step.
pub fn partition(fields: &[Field]) -> Vec<FormStep<'_>> {
    let mut steps: Vec<FormStep<'_>> = Vec::new();
    let mut current: Vec<&Field> = Vec::new();
    let mut title: Option<String> = None;

    for field in fields {
        if field.field_type.is_page_break() {
            if !current.is_empty() {
                steps.push(FormStep {
                    index: steps.len(),
                    title: title.take(),
                    fields: std::mem::take(&mut current),
                });
            }
            title = field
                .config
                .step_title()
                .filter(|text| !text.is_empty())
                .map(str::to_string);
        } else {
            current.push(field);
        }
    }

    steps.push(FormStep {
        index: steps.len(),
        title,
        fields: current,
    });
    steps
}

/// Number of steps the filler will walk for this field list.
pub fn step_count(fields: &[Field]) -> usize {
    partition(fields).len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::registry::create_field;
    use crate::domain::{FieldConfig, FieldId, FieldType};

    fn mk(kind: FieldType, id: u64, label: &str) -> Field {
        let mut field = create_field(kind, FieldId(id));
        field.label = label.to_string();
        field
    }

    #[test]
    fn zero_breaks_yield_one_bucket() {
        let fields = vec![mk(FieldType::Text, 1, "a"), mk(FieldType::Email, 2, "b")];
        let steps = partition(&fields);
        assert_eq!(steps.len(), 1);
        assert_eq!(steps[0].fields.len(), 2);
    }

    #[test]
    fn splits_at_page_breaks() {
        let fields = vec![
            mk(FieldType::Text, 1, "Name"),
            mk(FieldType::Email, 2, "Email"),
            mk(FieldType::PageBreak, 3, "Page Break"),
            mk(FieldType::Tel, 4, "Phone"),
        ];
        let steps = partition(&fields);
        assert_eq!(steps.len(), 2);
        assert_eq!(
            steps[0]
                .fields
                .iter()
                .map(|f| f.label.as_str())
                .collect::<Vec<_>>(),
            vec!["Name", "Email"]
        );
        assert_eq!(
            steps[1]
                .fields
                .iter()
                .map(|f| f.label.as_str())
                .collect::<Vec<_>>(),
            vec!["Phone"]
        );
    }

    #[test]
    fn all_breaks_yield_a_single_empty_step() {
        let fields = vec![
            mk(FieldType::PageBreak, 1, "pb1"),
            mk(FieldType::PageBreak, 2, "pb2"),
        ];
        let steps = partition(&fields);
        assert_eq!(steps.len(), 1);
        assert!(steps[0].fields.is_empty());
    }

    #[test]
    fn trailing_break_opens_a_final_empty_step() {
        let fields = vec![mk(FieldType::Text, 1, "a"), mk(FieldType::PageBreak, 2, "pb")];
        let steps = partition(&fields);
        assert_eq!(steps.len(), 2);
        assert!(steps[1].fields.is_empty());
    }

    #[test]
    fn concatenation_round_trips_non_break_order() {
        let fields = vec![
            mk(FieldType::Text, 1, "a"),
            mk(FieldType::PageBreak, 2, "pb"),
            mk(FieldType::Email, 3, "b"),
            mk(FieldType::Number, 4, "c"),
            mk(FieldType::PageBreak, 5, "pb"),
            mk(FieldType::Tel, 6, "d"),
        ];
        let steps = partition(&fields);
        let flattened: Vec<FieldId> = steps
            .iter()
            .flat_map(|step| step.fields.iter().map(|f| f.id))
            .collect();
        let expected: Vec<FieldId> = fields
            .iter()
            .filter(|f| !f.field_type.is_page_break())
            .map(|f| f.id)
            .collect();
        assert_eq!(flattened, expected);
    }

    #[test]
    fn break_titles_name_the_step_they_open() {
        let mut pb = mk(FieldType::PageBreak, 2, "pb");
        pb.config = FieldConfig::PageBreak {
            step_title: "Shipping".to_string(),
        };
        let fields = vec![mk(FieldType::Text, 1, "a"), pb, mk(FieldType::Text, 3, "b")];
        let steps = partition(&fields);
        assert_eq!(steps[0].display_title(), "Step 1");
        assert_eq!(steps[1].display_title(), "Shipping");
    }
}
