use formcanvas::domain::registry::create_field;
use formcanvas::domain::{AnswerMap, ConditionOperator, ShowCondition};
use formcanvas::prelude::*;

fn checkout_form() -> Form {
    let mut form = Form::new("Checkout");

    let mut name = create_field(FieldType::Text, FieldId(1));
    name.label = "Name".to_string();
    name.required = true;

    let mut email = create_field(FieldType::Email, FieldId(2));
    email.label = "Email".to_string();
    email.required = true;

    let mut ships = create_field(FieldType::Radio, FieldId(3));
    ships.label = "Ships internationally".to_string();

    let page_break = create_field(FieldType::PageBreak, FieldId(4));

    let mut country = create_field(FieldType::Select, FieldId(5));
    country.label = "Country".to_string();
    country.required = true;
    country.show_condition = ShowCondition::when(FieldId(3), ConditionOperator::Equals, "true");

    let mut quantity = create_field(FieldType::Number, FieldId(6));
    quantity.label = "Quantity".to_string();

    form.fields = vec![name, email, ships, page_break, country, quantity];
    form
}

#[test]
fn empty_required_email_blocks_step_one() {
    let mut flow = FillFlow::start(checkout_form());
    flow.set_answer(FieldId(1), "Ada");
    flow.set_answer(FieldId(3), "false");

    let outcome = flow.next();
    assert_eq!(outcome, StepOutcome::Stayed(1));
    assert_eq!(flow.current_step(), 0);
    assert_eq!(flow.issue_for(FieldId(2)), Some("Email is required"));
}

#[test]
fn gated_country_is_skipped_when_hidden() {
    let mut flow = FillFlow::start(checkout_form());
    flow.set_answer(FieldId(1), "Ada");
    flow.set_answer(FieldId(2), "ada@example.com");
    flow.set_answer(FieldId(3), "false");

    assert_eq!(flow.next(), StepOutcome::Advanced);
    // Country is hidden, so only Quantity renders on step two.
    let visible: Vec<FieldId> = flow.visible_fields().iter().map(|f| f.id).collect();
    assert_eq!(visible, vec![FieldId(6)]);

    assert!(matches!(flow.next(), StepOutcome::Submitted(_)));
}

#[test]
fn gated_country_is_enforced_when_visible() {
    let mut flow = FillFlow::start(checkout_form());
    flow.set_answer(FieldId(1), "Ada");
    flow.set_answer(FieldId(2), "ada@example.com");
    flow.set_answer(FieldId(3), "true");

    assert_eq!(flow.next(), StepOutcome::Advanced);
    assert_eq!(flow.next(), StepOutcome::Stayed(1));
    assert_eq!(flow.issue_for(FieldId(5)), Some("Country is required"));

    flow.set_answer(FieldId(5), "Iceland");
    assert!(matches!(flow.next(), StepOutcome::Submitted(_)));
}

#[test]
fn stale_answers_ship_by_default_and_clear_under_the_policy() {
    // Default (retain): answer entered, then the gate flips to hide Country.
    let mut flow = FillFlow::start(checkout_form());
    flow.set_answer(FieldId(1), "Ada");
    flow.set_answer(FieldId(2), "ada@example.com");
    flow.set_answer(FieldId(3), "true");
    flow.set_answer(FieldId(5), "Iceland");
    flow.set_answer(FieldId(3), "false");
    flow.next();
    let StepOutcome::Submitted(submission) = flow.next() else {
        panic!("expected submission");
    };
    assert_eq!(
        submission.answers.get(&FieldId(5)).map(String::as_str),
        Some("Iceland")
    );

    // Clear policy drops the answer the moment the field hides.
    let mut flow = FillFlow::start(checkout_form()).with_policy(HiddenAnswerPolicy::Clear);
    flow.set_answer(FieldId(3), "true");
    flow.set_answer(FieldId(5), "Iceland");
    flow.set_answer(FieldId(3), "false");
    assert!(!flow.answers().contains_key(&FieldId(5)));
}

#[test]
fn out_of_bounds_quantity_is_reported_on_submit() {
    let mut form = checkout_form();
    if let Some(field) = form.field_mut(FieldId(6)) {
        field.config = formcanvas::domain::FieldConfig::Numeric {
            min: Some(1.0),
            max: Some(10.0),
            step: 1.0,
            default_value: None,
        };
    }
    let mut flow = FillFlow::start(form);
    flow.set_answer(FieldId(1), "Ada");
    flow.set_answer(FieldId(2), "ada@example.com");
    flow.set_answer(FieldId(3), "false");
    flow.next();
    flow.set_answer(FieldId(6), "999");
    assert_eq!(flow.next(), StepOutcome::Stayed(1));
    assert_eq!(
        flow.issue_for(FieldId(6)),
        Some("Quantity must be at most 10")
    );
}

#[test]
fn submission_lands_in_the_store_with_a_bumped_counter() {
    let mut store = MemoryStore::new();
    let saved = store.create(checkout_form()).unwrap();
    let published = store.publish(saved.id).unwrap();
    let publish_id = published.publish_id.clone().unwrap();

    // The public renderer loads a read-only snapshot by publish id.
    let snapshot = store.get_by_publish_id(&publish_id).unwrap();
    let mut flow = FillFlow::start(snapshot);
    flow.set_answer(FieldId(1), "Ada");
    flow.set_answer(FieldId(2), "ada@example.com");
    flow.set_answer(FieldId(3), "false");
    flow.next();
    let StepOutcome::Submitted(submission) = flow.next() else {
        panic!("expected submission");
    };

    store
        .create_submission(submission.form_id, submission.answers.clone())
        .unwrap();
    let updated = store.increment_submission_count(saved.id).unwrap();
    assert_eq!(updated.submission_count, 1);
    assert_eq!(store.submissions().len(), 1);
    assert_eq!(store.submissions()[0].form_id, saved.id);
}

#[test]
fn answer_map_serializes_with_field_id_keys() {
    let mut answers = AnswerMap::new();
    answers.insert(FieldId(7), "yes".to_string());
    let submission = Submission::new(uuid::Uuid::nil(), answers);
    let text = serde_json::to_string(&submission).unwrap();
    assert!(text.contains("\"7\":\"yes\""));

    let back: Submission = serde_json::from_str(&text).unwrap();
    assert_eq!(back.answers.get(&FieldId(7)).map(String::as_str), Some("yes"));
}
