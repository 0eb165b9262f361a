#[derive(Debug, Clone)]
pub struct StatusLine {
    message: String,
}

pub const READY_STATUS: &str = "Ready. Tab switches panes, Ctrl+S saves, Ctrl+Q quits.";

impl Default for StatusLine {
    fn default() -> Self {
        Self {
            message: READY_STATUS.to_string(),
        }
    }
}

impl StatusLine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_raw(&mut self, msg: impl Into<String>) {
        self.message = msg.into();
    }

    pub fn ready(&mut self) {
        self.message = READY_STATUS.to_string();
    }

    pub fn editing(&mut self, label: &str) {
        self.message = format!("Editing {label}");
    }

    pub fn field_added(&mut self, label: &str) {
        self.message = format!("Added {label}");
    }

    pub fn field_removed(&mut self, label: &str) {
        self.message = format!("Removed {label}");
    }

    pub fn field_moved(&mut self, label: &str) {
        self.message = format!("Moved {label}");
    }

    pub fn dragging(&mut self, label: &str) {
        self.message = format!("Dragging {label} • release to drop, Esc to cancel");
    }

    pub fn drop_cancelled(&mut self) {
        self.message = "Drag cancelled".to_string();
    }

    pub fn undo_applied(&mut self) {
        self.message = "Undid last change".to_string();
    }

    pub fn redo_applied(&mut self) {
        self.message = "Redid change".to_string();
    }

    pub fn nothing_to_undo(&mut self) {
        self.message = "Nothing to undo".to_string();
    }

    pub fn issues_remaining(&mut self, count: usize) {
        self.message = format!("{count} issue(s) remaining");
    }

    pub fn step_changed(&mut self, step: usize, total: usize, title: &str) {
        self.message = format!("Step {step}/{total}: {title}");
    }

    pub fn pending_exit(&mut self) {
        self.message = "Unsaved changes. Press Ctrl+Q again to quit without saving.".to_string();
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}
