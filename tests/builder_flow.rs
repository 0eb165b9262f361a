use formcanvas::domain::{ConditionOperator, FieldConfig, ShowCondition};
use formcanvas::engine::{
    CardBounds, DragController, DragPayload, DropOutcome, insertion_index,
};
use formcanvas::prelude::*;

fn blank_session() -> EditorSession {
    EditorSession::open(Form::new("Builder flow"))
}

#[test]
fn palette_to_canvas_round_trip() {
    let mut editor = blank_session();

    // A full drag session: palette payload over three rendered cards.
    editor.add_field(FieldType::Text, 0).unwrap();
    editor.add_field(FieldType::Email, 1).unwrap();
    editor.add_field(FieldType::Textarea, 2).unwrap();

    let mut drag = DragController::new();
    drag.begin(DragPayload::NewField {
        field_type: FieldType::Rating,
    });
    let cards = vec![
        CardBounds::new(1.0, 3.0),
        CardBounds::new(4.0, 3.0),
        CardBounds::new(7.0, 3.0),
    ];
    drag.update_pointer(5.0, &cards); // between the first and second midpoints
    let (payload, index) = drag.complete().unwrap();
    assert_eq!(index, 1);

    let outcome = editor.apply_drop(payload, index).unwrap();
    let DropOutcome::Inserted(id) = outcome else {
        panic!("expected insertion");
    };
    assert_eq!(editor.fields()[1].id, id);
    assert_eq!(editor.fields()[1].field_type, FieldType::Rating);
    assert_eq!(editor.selected(), Some(id));
}

#[test]
fn cancelled_drag_leaves_no_trace() {
    let mut editor = blank_session();
    let a = editor.add_field(FieldType::Text, 0).unwrap();
    editor.add_field(FieldType::Email, 1).unwrap();
    let history_before = editor.history_len();

    let mut drag = DragController::new();
    drag.begin(DragPayload::Reorder { field_id: a });
    drag.update_pointer(9.0, &[CardBounds::new(1.0, 3.0), CardBounds::new(4.0, 3.0)]);
    drag.cancel();

    assert!(drag.complete().is_none());
    assert_eq!(editor.history_len(), history_before);
    assert_eq!(editor.fields()[0].id, a);
}

#[test]
fn reorder_transfer_payload_moves_the_card() {
    let mut editor = blank_session();
    let a = editor.add_field(FieldType::Text, 0).unwrap();
    let b = editor.add_field(FieldType::Email, 1).unwrap();

    let raw = DragPayload::Reorder { field_id: b }.to_transfer();
    let outcome = editor.apply_transfer(&raw, 0).unwrap();
    assert!(matches!(outcome, DropOutcome::Moved { from: 1, to: 0 }));
    let order: Vec<FieldId> = editor.fields().iter().map(|f| f.id).collect();
    assert_eq!(order, vec![b, a]);
}

#[test]
fn undo_redo_walks_whole_edit_sessions() {
    let mut editor = blank_session();
    let text = editor.add_field(FieldType::Text, 0).unwrap();
    editor
        .update_field(text, |field| field.label = "First name".to_string())
        .unwrap();
    editor.rename_form("Onboarding");

    assert_eq!(editor.form().name, "Onboarding");
    assert!(editor.undo());
    assert_eq!(editor.form().name, "Builder flow");
    assert_eq!(editor.fields()[0].label, "First name");
    assert!(editor.undo());
    assert_eq!(editor.fields()[0].label, "Text Field");
    assert!(editor.redo());
    assert_eq!(editor.fields()[0].label, "First name");
}

#[test]
fn deleting_a_condition_target_degrades_to_always_visible() {
    let mut editor = blank_session();
    let gate = editor.add_field(FieldType::Radio, 0).unwrap();
    let dependent = editor.add_field(FieldType::Text, 1).unwrap();
    editor
        .update_field(dependent, |field| {
            field.required = true;
            field.show_condition = ShowCondition::when(gate, ConditionOperator::Equals, "Yes");
        })
        .unwrap();

    editor.remove_field(gate).unwrap();
    let form = editor.into_form();

    // The dangling rule is tolerated: the field renders as always-visible, so
    // its required rule is back in force.
    let mut flow = FillFlow::start(form);
    assert_eq!(flow.visible_fields().len(), 1);
    assert_eq!(flow.next(), StepOutcome::Stayed(1));

    flow.set_answer(dependent, "kept");
    assert!(matches!(flow.next(), StepOutcome::Submitted(_)));
}

#[test]
fn insertion_index_matches_midpoint_semantics_under_scroll() {
    // Cards partially above the viewport still anchor the math.
    let cards = vec![
        CardBounds::new(-2.0, 3.0),
        CardBounds::new(1.0, 3.0),
        CardBounds::new(4.0, 3.0),
    ];
    assert_eq!(insertion_index(-2.0, &cards), 0);
    assert_eq!(insertion_index(2.0, &cards), 2);
    assert_eq!(insertion_index(40.0, &cards), 3);
}

#[test]
fn duplicate_keeps_config_but_not_identity() {
    let mut editor = blank_session();
    let select = editor.add_field(FieldType::Select, 0).unwrap();
    editor
        .update_field(select, |field| {
            field.label = "Country".to_string();
            field.config = FieldConfig::Choice {
                options: vec!["Iceland".to_string(), "Norway".to_string()],
            };
        })
        .unwrap();

    let copy = editor.duplicate_field(select).unwrap();
    assert_ne!(copy, select);
    let fields = editor.fields();
    assert_eq!(fields[1].id, copy);
    assert_eq!(fields[1].label, "Country (2)");
    assert_eq!(fields[1].config, fields[0].config);
}
