use indexmap::IndexMap;
use tracing::info;
use uuid::Uuid;

use crate::domain::{AnswerMap, Form, Submission};
use crate::publish;

use super::{FormStore, StoreError};

const DEFAULT_BASE_URL: &str = "https://forms.local";

/// In-memory store: the durable-copy owner for tests, demos and the CLI's
/// single-file workflows.
#[derive(Debug)]
pub struct MemoryStore {
    base_url: String,
    forms: IndexMap<Uuid, Form>,
    submissions: Vec<Submission>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            forms: IndexMap::new(),
            submissions: Vec::new(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn submissions(&self) -> &[Submission] {
        &self.submissions
    }

    fn form_mut(&mut self, id: Uuid) -> Result<&mut Form, StoreError> {
        self.forms.get_mut(&id).ok_or(StoreError::NotFound(id))
    }
}

impl FormStore for MemoryStore {
    fn create(&mut self, mut form: Form) -> Result<Form, StoreError> {
        form.touch();
        info!(form = %form.id, name = %form.name, "store: create");
        self.forms.insert(form.id, form.clone());
        Ok(form)
    }

    fn get_all(&self) -> Result<Vec<Form>, StoreError> {
        Ok(self.forms.values().cloned().collect())
    }

    fn get(&self, id: Uuid) -> Result<Form, StoreError> {
        self.forms.get(&id).cloned().ok_or(StoreError::NotFound(id))
    }

    fn update(&mut self, id: Uuid, mut form: Form) -> Result<Form, StoreError> {
        if !self.forms.contains_key(&id) {
            return Err(StoreError::NotFound(id));
        }
        form.id = id;
        form.touch();
        self.forms.insert(id, form.clone());
        Ok(form)
    }

    fn delete(&mut self, id: Uuid) -> Result<bool, StoreError> {
        Ok(self.forms.shift_remove(&id).is_some())
    }

    fn publish(&mut self, id: Uuid) -> Result<Form, StoreError> {
        let base_url = self.base_url.clone();
        let form = self.form_mut(id)?;
        let publish_id = form
            .publish_id
            .clone()
            .unwrap_or_else(publish::mint_publish_id);
        form.publish_url = Some(publish::share_url(&base_url, &publish_id, &form.name));
        form.publish_id = Some(publish_id);
        form.is_published = true;
        form.touch();
        info!(form = %id, publish_id = form.publish_id.as_deref(), "store: publish");
        Ok(form.clone())
    }

    fn unpublish(&mut self, id: Uuid) -> Result<Form, StoreError> {
        let form = self.form_mut(id)?;
        form.is_published = false;
        form.touch();
        Ok(form.clone())
    }

    fn get_by_publish_id(&self, publish_id: &str) -> Result<Form, StoreError> {
        self.forms
            .values()
            .find(|form| form.is_published && form.publish_id.as_deref() == Some(publish_id))
            .cloned()
            .ok_or_else(|| StoreError::UnknownPublishId(publish_id.to_string()))
    }

    fn increment_submission_count(&mut self, id: Uuid) -> Result<Form, StoreError> {
        let form = self.form_mut(id)?;
        form.submission_count += 1;
        form.touch();
        Ok(form.clone())
    }

    fn create_submission(
        &mut self,
        form_id: Uuid,
        answers: AnswerMap,
    ) -> Result<Submission, StoreError> {
        if !self.forms.contains_key(&form_id) {
            return Err(StoreError::NotFound(form_id));
        }
        let submission = Submission::new(form_id, answers);
        info!(form = %form_id, answers = submission.answers.len(), "store: submission");
        self.submissions.push(submission.clone());
        Ok(submission)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::FieldId;

    #[test]
    fn publish_mints_an_id_and_share_url() {
        let mut store = MemoryStore::new().with_base_url("https://example.test");
        let form = store.create(Form::new("Event RSVP")).unwrap();
        let published = store.publish(form.id).unwrap();

        assert!(published.is_published);
        let publish_id = published.publish_id.expect("publish id");
        let url = published.publish_url.expect("publish url");
        assert!(url.starts_with("https://example.test/f/"));
        assert!(url.contains(&publish_id));
        assert!(url.contains("Event%20RSVP"));
    }

    #[test]
    fn republish_keeps_the_same_publish_id() {
        let mut store = MemoryStore::new();
        let form = store.create(Form::new("demo")).unwrap();
        let first = store.publish(form.id).unwrap();
        store.unpublish(form.id).unwrap();
        let second = store.publish(form.id).unwrap();
        assert_eq!(first.publish_id, second.publish_id);
    }

    #[test]
    fn lookup_by_publish_id_respects_published_state() {
        let mut store = MemoryStore::new();
        let form = store.create(Form::new("demo")).unwrap();
        let published = store.publish(form.id).unwrap();
        let publish_id = published.publish_id.unwrap();

        assert!(store.get_by_publish_id(&publish_id).is_ok());
        store.unpublish(form.id).unwrap();
        assert!(matches!(
            store.get_by_publish_id(&publish_id),
            Err(StoreError::UnknownPublishId(_))
        ));
    }

    #[test]
    fn submissions_bump_the_counter_via_the_explicit_call() {
        let mut store = MemoryStore::new();
        let form = store.create(Form::new("demo")).unwrap();
        let mut answers = AnswerMap::new();
        answers.insert(FieldId(1), "hello".to_string());
        store.create_submission(form.id, answers).unwrap();
        let updated = store.increment_submission_count(form.id).unwrap();
        assert_eq!(updated.submission_count, 1);
        assert_eq!(store.submissions().len(), 1);
    }

    #[test]
    fn missing_forms_surface_not_found() {
        let mut store = MemoryStore::new();
        let ghost = Uuid::new_v4();
        assert!(matches!(store.get(ghost), Err(StoreError::NotFound(_))));
        assert!(matches!(
            store.create_submission(ghost, AnswerMap::new()),
            Err(StoreError::NotFound(_))
        ));
        assert!(!store.delete(ghost).unwrap());
    }
}
