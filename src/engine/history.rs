use crate::domain::{Field, Form, NotificationSettings, ThankYouSettings};

/// Most snapshots the stack retains before the oldest is dropped.
pub const MAX_ENTRIES: usize = 50;

/// An owned deep copy of the editable form state at one point in time.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub form_name: String,
    pub fields: Vec<Field>,
    pub notifications: NotificationSettings,
    pub thank_you: ThankYouSettings,
}

impl Snapshot {
    pub fn of(form: &Form) -> Self {
        Self {
            form_name: form.name.clone(),
            fields: form.fields.clone(),
            notifications: form.notifications.clone(),
            thank_you: form.thank_you.clone(),
        }
    }

    /// Write this snapshot back onto the live form.
    pub fn restore(&self, form: &mut Form) {
        form.name = self.form_name.clone();
        form.fields = self.fields.clone();
        form.notifications = self.notifications.clone();
        form.thank_you = self.thank_you.clone();
        form.touch();
    }
}

/// Linear undo history: an entry log with a movable cursor.
///
/// Committing while the cursor sits behind the tail discards the redo entries,
/// the standard linear model.
#[derive(Debug, Clone)]
pub struct HistoryStack {
    entries: Vec<Snapshot>,
    cursor: usize,
}

impl HistoryStack {
    /// Seed the stack with the opening state so the first undo has a target.
    pub fn new(initial: Snapshot) -> Self {
        Self {
            entries: vec![initial],
            cursor: 0,
        }
    }

    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_redo(&self) -> bool {
        self.cursor + 1 < self.entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Record a new state: truncate the redo tail, append, enforce the cap.
    pub fn commit(&mut self, entry: Snapshot) {
        self.entries.truncate(self.cursor + 1);
        self.entries.push(entry);
        self.cursor += 1;
        if self.entries.len() > MAX_ENTRIES {
            self.entries.remove(0);
            self.cursor -= 1;
        }
    }

    /// Step the cursor back and return the snapshot to restore; `None` at the
    /// oldest entry.
    pub fn undo(&mut self) -> Option<&Snapshot> {
        if self.cursor == 0 {
            return None;
        }
        self.cursor -= 1;
        self.entries.get(self.cursor)
    }

    /// Step the cursor forward; `None` when nothing was undone.
    pub fn redo(&mut self) -> Option<&Snapshot> {
        if self.cursor + 1 >= self.entries.len() {
            return None;
        }
        self.cursor += 1;
        self.entries.get(self.cursor)
    }

    /// The snapshot under the cursor.
    pub fn current(&self) -> &Snapshot {
        &self.entries[self.cursor]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::registry::create_field;
    use crate::domain::{FieldId, FieldType};

    fn snap(name: &str) -> Snapshot {
        Snapshot {
            form_name: name.to_string(),
            fields: Vec::new(),
            notifications: NotificationSettings::default(),
            thank_you: ThankYouSettings::default(),
        }
    }

    #[test]
    fn undo_then_redo_walks_the_cursor() {
        let mut history = HistoryStack::new(snap("start"));
        history.commit(snap("A"));
        history.commit(snap("B"));

        assert_eq!(history.undo().unwrap().form_name, "A");
        assert_eq!(history.redo().unwrap().form_name, "B");
    }

    #[test]
    fn commit_after_undo_discards_redo() {
        let mut history = HistoryStack::new(snap("start"));
        history.commit(snap("A"));
        history.commit(snap("B"));
        assert_eq!(history.undo().unwrap().form_name, "A");

        history.commit(snap("C"));
        assert!(!history.can_redo());
        assert_eq!(history.current().form_name, "C");
        assert_eq!(history.undo().unwrap().form_name, "A");
    }

    #[test]
    fn undo_at_oldest_entry_is_a_noop() {
        let mut history = HistoryStack::new(snap("start"));
        assert!(history.undo().is_none());
        assert!(history.redo().is_none());
        assert_eq!(history.current().form_name, "start");
    }

    #[test]
    fn overflow_drops_the_oldest_entry_and_keeps_the_cursor_logical() {
        let mut history = HistoryStack::new(snap("start"));
        for i in 0..MAX_ENTRIES + 10 {
            history.commit(snap(&format!("s{i}")));
        }
        assert_eq!(history.len(), MAX_ENTRIES);
        assert_eq!(
            history.current().form_name,
            format!("s{}", MAX_ENTRIES + 9)
        );
        // Walking all the way back lands on the oldest retained entry: the
        // initial snapshot and s0..=s9 were dropped on overflow.
        let mut oldest = history.current().form_name.clone();
        while let Some(entry) = history.undo() {
            oldest = entry.form_name.clone();
        }
        assert_eq!(oldest, "s10");
    }

    #[test]
    fn snapshots_are_deep_copies() {
        let mut form = crate::domain::Form::new("demo");
        form.fields.push(create_field(FieldType::Text, FieldId(1)));
        let snapshot = Snapshot::of(&form);

        form.fields[0].label = "mutated".to_string();
        assert_eq!(snapshot.fields[0].label, "Text Field");
    }
}
