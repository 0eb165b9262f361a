use tracing::debug;

use crate::domain::registry::{self, DraftError};
use crate::domain::{
    Field, FieldId, FieldType, Form, FormStyle, NotificationSettings, ThankYouSettings,
};

use super::drag::{DragPayload, TransferError};
use super::history::{HistoryStack, Snapshot};

/// Failures of editor mutations. All are recoverable: the form keeps its
/// last-known-good state whenever one is returned.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EditorError {
    #[error(transparent)]
    Draft(#[from] DraftError),
    #[error(transparent)]
    Transfer(#[from] TransferError),
    #[error("no field with id {0} on this form")]
    UnknownField(FieldId),
}

/// What a completed drop did to the list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropOutcome {
    Inserted(FieldId),
    Moved { from: usize, to: usize },
    /// Reorder released on its own position; nothing changed, nothing committed.
    NoOp,
}

/// The editing session: exclusive owner of the in-memory form and its history
/// while the builder is open.
///
/// Every mutating operation deep-snapshots into the history stack, so undo and
/// redo always restore exact prior states.
#[derive(Debug)]
pub struct EditorSession {
    form: Form,
    history: HistoryStack,
    selected: Option<FieldId>,
    next_id: u64,
}

impl EditorSession {
    pub fn open(form: Form) -> Self {
        let next_id = form
            .fields
            .iter()
            .map(|field| field.id.0)
            .max()
            .map_or(1, |max| max + 1);
        let history = HistoryStack::new(Snapshot::of(&form));
        Self {
            form,
            history,
            selected: None,
            next_id,
        }
    }

    pub fn form(&self) -> &Form {
        &self.form
    }

    pub fn into_form(self) -> Form {
        self.form
    }

    pub fn fields(&self) -> &[Field] {
        &self.form.fields
    }

    pub fn selected(&self) -> Option<FieldId> {
        self.selected
    }

    pub fn selected_field(&self) -> Option<&Field> {
        self.selected.and_then(|id| self.form.field(id))
    }

    pub fn select(&mut self, id: Option<FieldId>) {
        self.selected = id.filter(|id| self.form.field(*id).is_some());
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Number of snapshots currently held; the no-op drop tests pin this.
    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    /// Fields another field's show condition may reference: answer-bearing
    /// inputs, never the field itself.
    pub fn condition_candidates(&self, subject: FieldId) -> Vec<&Field> {
        self.form
            .fields
            .iter()
            .filter(|field| field.id != subject && field.field_type.is_input())
            .collect()
    }

    /// Create a field of `field_type` and splice it in at `index`.
    pub fn add_field(&mut self, field_type: FieldType, index: usize) -> Result<FieldId, EditorError> {
        let id = self.allocate_id();
        let mut field = registry::create_field(field_type, id);
        registry::validate_draft(&field)?;
        field.label = self.disambiguate_label(&field.label);
        self.splice_in(field, index);
        self.commit("add field");
        self.selected = Some(id);
        Ok(id)
    }

    /// Clone an existing field under a fresh id, inserted right after it.
    pub fn duplicate_field(&mut self, id: FieldId) -> Result<FieldId, EditorError> {
        let index = self
            .form
            .field_index(id)
            .ok_or(EditorError::UnknownField(id))?;
        let mut copy = self.form.fields[index].clone();
        copy.id = self.allocate_id();
        copy.label = self.disambiguate_label(&copy.label);
        registry::validate_draft(&copy)?;
        let new_id = copy.id;
        self.splice_in(copy, index + 1);
        self.commit("duplicate field");
        self.selected = Some(new_id);
        Ok(new_id)
    }

    /// Remove a field. Conditions referencing it are left alone; they degrade
    /// to always-visible.
    pub fn remove_field(&mut self, id: FieldId) -> Result<(), EditorError> {
        let index = self
            .form
            .field_index(id)
            .ok_or(EditorError::UnknownField(id))?;
        self.form.fields.remove(index);
        self.renumber();
        if self.selected == Some(id) {
            self.selected = None;
        }
        self.commit("remove field");
        Ok(())
    }

    /// Edit a field in place. The draft rules are re-checked afterwards; an
    /// edit that would make the field inadmissible is rolled back.
    pub fn update_field(
        &mut self,
        id: FieldId,
        edit: impl FnOnce(&mut Field),
    ) -> Result<(), EditorError> {
        let index = self
            .form
            .field_index(id)
            .ok_or(EditorError::UnknownField(id))?;
        let mut draft = self.form.fields[index].clone();
        edit(&mut draft);
        draft.id = id;
        registry::validate_draft(&draft)?;
        if draft == self.form.fields[index] {
            return Ok(());
        }
        self.form.fields[index] = draft;
        self.commit("edit field");
        Ok(())
    }

    /// Apply a completed drop from the drag controller.
    pub fn apply_drop(
        &mut self,
        payload: DragPayload,
        target_index: usize,
    ) -> Result<DropOutcome, EditorError> {
        match payload {
            DragPayload::NewField { field_type } => {
                let id = self.add_field(field_type, target_index)?;
                Ok(DropOutcome::Inserted(id))
            }
            DragPayload::Reorder { field_id } => self.reorder(field_id, target_index),
        }
    }

    /// Parse a raw transfer payload and apply it; malformed payloads abort the
    /// drop with no mutation.
    pub fn apply_transfer(
        &mut self,
        raw: &str,
        target_index: usize,
    ) -> Result<DropOutcome, EditorError> {
        let payload = DragPayload::from_transfer(raw)?;
        self.apply_drop(payload, target_index)
    }

    /// Move an existing field so it lands at `target_index` (an insertion slot
    /// in the pre-removal list). Dropping a card onto its own slot, or onto the
    /// slot directly below it, is a no-op with no history commit.
    pub fn reorder(
        &mut self,
        field_id: FieldId,
        target_index: usize,
    ) -> Result<DropOutcome, EditorError> {
        let current = self
            .form
            .field_index(field_id)
            .ok_or(EditorError::UnknownField(field_id))?;
        if target_index == current || target_index == current + 1 {
            return Ok(DropOutcome::NoOp);
        }
        let field = self.form.fields.remove(current);
        let adjusted = if current < target_index {
            target_index - 1
        } else {
            target_index
        };
        let adjusted = adjusted.min(self.form.fields.len());
        self.form.fields.insert(adjusted, field);
        self.renumber();
        self.commit("reorder field");
        Ok(DropOutcome::Moved {
            from: current,
            to: adjusted,
        })
    }

    pub fn rename_form(&mut self, name: impl Into<String>) {
        let name = name.into();
        if name == self.form.name {
            return;
        }
        self.form.name = name;
        self.commit("rename form");
    }

    pub fn set_notifications(&mut self, settings: NotificationSettings) {
        if settings == self.form.notifications {
            return;
        }
        self.form.notifications = settings;
        self.commit("edit notifications");
    }

    pub fn set_thank_you(&mut self, settings: ThankYouSettings) {
        if settings == self.form.thank_you {
            return;
        }
        self.form.thank_you = settings;
        self.commit("edit thank-you");
    }

    /// Style edits commit like every other mutation, though snapshots carry no
    /// style; undo restores the editable state around an unchanged style.
    pub fn set_style(&mut self, style: FormStyle) {
        if style == self.form.style {
            return;
        }
        self.form.style = style;
        self.commit("edit style");
    }

    /// Restore the previous snapshot; false when at the oldest state.
    pub fn undo(&mut self) -> bool {
        let Some(snapshot) = self.history.undo().cloned() else {
            return false;
        };
        snapshot.restore(&mut self.form);
        self.reconcile_selection();
        debug!(entries = self.history.len(), "undo");
        true
    }

    /// Re-apply the next snapshot; false when nothing was undone.
    pub fn redo(&mut self) -> bool {
        let Some(snapshot) = self.history.redo().cloned() else {
            return false;
        };
        snapshot.restore(&mut self.form);
        self.reconcile_selection();
        debug!(entries = self.history.len(), "redo");
        true
    }

    fn allocate_id(&mut self) -> FieldId {
        let id = FieldId(self.next_id);
        self.next_id += 1;
        id
    }

    fn splice_in(&mut self, field: Field, index: usize) {
        let index = index.min(self.form.fields.len());
        self.form.fields.insert(index, field);
        self.renumber();
    }

    fn renumber(&mut self) {
        for (position, field) in self.form.fields.iter_mut().enumerate() {
            field.position = position;
        }
    }

    fn disambiguate_label(&self, base: &str) -> String {
        let taken = |candidate: &str| self.form.fields.iter().any(|f| f.label == candidate);
        if !taken(base) {
            return base.to_string();
        }
        let mut counter = 2;
        loop {
            let candidate = format!("{base} ({counter})");
            if !taken(&candidate) {
                return candidate;
            }
            counter += 1;
        }
    }

    fn commit(&mut self, action: &str) {
        self.form.touch();
        self.history.commit(Snapshot::of(&self.form));
        debug!(action, fields = self.form.fields.len(), "commit");
    }

    fn reconcile_selection(&mut self) {
        if let Some(id) = self.selected
            && self.form.field(id).is_none()
        {
            self.selected = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::FieldConfig;

    fn session() -> EditorSession {
        EditorSession::open(Form::new("Test form"))
    }

    #[test]
    fn duplicate_labels_get_numbered_suffixes() {
        let mut editor = session();
        editor.add_field(FieldType::Text, 0).unwrap();
        editor.add_field(FieldType::Text, 1).unwrap();
        let labels: Vec<&str> = editor.fields().iter().map(|f| f.label.as_str()).collect();
        assert_eq!(labels, vec!["Text Field", "Text Field (2)"]);
    }

    #[test]
    fn reorder_at_noop_boundary_commits_nothing() {
        let mut editor = session();
        let a = editor.add_field(FieldType::Text, 0).unwrap();
        editor.add_field(FieldType::Email, 1).unwrap();
        let before_len = editor.history_len();
        let order_before: Vec<FieldId> = editor.fields().iter().map(|f| f.id).collect();

        assert_eq!(editor.reorder(a, 0).unwrap(), DropOutcome::NoOp);
        assert_eq!(editor.reorder(a, 1).unwrap(), DropOutcome::NoOp);

        let order_after: Vec<FieldId> = editor.fields().iter().map(|f| f.id).collect();
        assert_eq!(order_before, order_after);
        assert_eq!(editor.history_len(), before_len);
    }

    #[test]
    fn forward_moves_adjust_the_insertion_slot() {
        let mut editor = session();
        let a = editor.add_field(FieldType::Text, 0).unwrap();
        let b = editor.add_field(FieldType::Email, 1).unwrap();
        let c = editor.add_field(FieldType::Number, 2).unwrap();

        // Drag the first card below the last one.
        let outcome = editor.reorder(a, 3).unwrap();
        assert_eq!(outcome, DropOutcome::Moved { from: 0, to: 2 });
        let order: Vec<FieldId> = editor.fields().iter().map(|f| f.id).collect();
        assert_eq!(order, vec![b, c, a]);
    }

    #[test]
    fn backward_moves_keep_the_slot() {
        let mut editor = session();
        let a = editor.add_field(FieldType::Text, 0).unwrap();
        let b = editor.add_field(FieldType::Email, 1).unwrap();
        let c = editor.add_field(FieldType::Number, 2).unwrap();

        let outcome = editor.reorder(c, 0).unwrap();
        assert_eq!(outcome, DropOutcome::Moved { from: 2, to: 0 });
        let order: Vec<FieldId> = editor.fields().iter().map(|f| f.id).collect();
        assert_eq!(order, vec![c, a, b]);
    }

    #[test]
    fn undo_restores_a_deleted_field_at_its_index_with_its_id() {
        let mut editor = session();
        let a = editor.add_field(FieldType::Text, 0).unwrap();
        let b = editor.add_field(FieldType::Email, 1).unwrap();
        let c = editor.add_field(FieldType::Number, 2).unwrap();

        editor.remove_field(b).unwrap();
        assert_eq!(editor.fields().len(), 2);

        assert!(editor.undo());
        let order: Vec<FieldId> = editor.fields().iter().map(|f| f.id).collect();
        assert_eq!(order, vec![a, b, c]);
        assert_eq!(editor.fields()[1].id, b);
    }

    #[test]
    fn redo_is_discarded_by_a_fresh_commit() {
        let mut editor = session();
        editor.add_field(FieldType::Text, 0).unwrap();
        editor.add_field(FieldType::Email, 1).unwrap();
        assert!(editor.undo());
        assert!(editor.can_redo());

        editor.add_field(FieldType::Number, 1).unwrap();
        assert!(!editor.can_redo());
        assert!(!editor.redo());
    }

    #[test]
    fn malformed_transfer_leaves_the_list_unchanged() {
        let mut editor = session();
        editor.add_field(FieldType::Text, 0).unwrap();
        let before: Vec<FieldId> = editor.fields().iter().map(|f| f.id).collect();
        let len = editor.history_len();

        assert!(editor.apply_transfer("{oops", 0).is_err());
        assert!(
            editor
                .apply_transfer("{\"fieldType\":\"hologram\"}", 0)
                .is_err()
        );

        let after: Vec<FieldId> = editor.fields().iter().map(|f| f.id).collect();
        assert_eq!(before, after);
        assert_eq!(editor.history_len(), len);
    }

    #[test]
    fn invalid_edits_are_rolled_back() {
        let mut editor = session();
        let id = editor.add_field(FieldType::Select, 0).unwrap();
        let err = editor
            .update_field(id, |field| {
                field.config = FieldConfig::Choice {
                    options: Vec::new(),
                };
            })
            .unwrap_err();
        assert!(matches!(err, EditorError::Draft(_)));
        assert_eq!(
            editor.fields()[0].config.options().map(<[String]>::len),
            Some(2)
        );
    }

    #[test]
    fn condition_candidates_exclude_self_and_content_blocks() {
        let mut editor = session();
        let a = editor.add_field(FieldType::Text, 0).unwrap();
        let b = editor.add_field(FieldType::Heading, 1).unwrap();
        let c = editor.add_field(FieldType::Select, 2).unwrap();

        let candidates: Vec<FieldId> = editor
            .condition_candidates(c)
            .iter()
            .map(|f| f.id)
            .collect();
        assert_eq!(candidates, vec![a]);
        assert!(!candidates.contains(&b));
        assert!(!candidates.contains(&c));
    }

    #[test]
    fn style_edits_commit_but_snapshots_leave_style_alone() {
        let mut editor = session();
        editor.add_field(FieldType::Text, 0).unwrap();
        let mut style = editor.form().style.clone();
        style.accent_color = "#ff0000".to_string();
        editor.set_style(style);
        assert!(editor.can_undo());

        // Undo rewinds the snapshot cursor; style is not part of the entry.
        assert!(editor.undo());
        assert_eq!(editor.form().style.accent_color, "#ff0000");
        assert_eq!(editor.fields().len(), 1);
    }

    #[test]
    fn palette_drop_inserts_validates_and_selects() {
        let mut editor = session();
        editor.add_field(FieldType::Text, 0).unwrap();
        let outcome = editor
            .apply_transfer("{\"fieldType\":\"rating\"}", 0)
            .unwrap();
        let DropOutcome::Inserted(id) = outcome else {
            panic!("expected insert outcome");
        };
        assert_eq!(editor.fields()[0].id, id);
        assert_eq!(editor.selected(), Some(id));
    }
}
