mod memory;

pub use memory::MemoryStore;

use uuid::Uuid;

use crate::domain::{AnswerMap, Form, Submission};

/// Failures from the persistence collaborator. Reported to the user and left
/// retryable; nothing here is retried automatically.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("no form with id {0}")]
    NotFound(Uuid),
    #[error("no published form under '{0}'")]
    UnknownPublishId(String),
    #[error("form '{0}' is not published")]
    NotPublished(Uuid),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Serde(#[from] serde_json::Error),
}

/// Persistence contract for form definitions and submissions.
///
/// The browser original talks to a remote service; here the boundary is a
/// blocking trait and asyncness stays an implementation detail of the caller.
pub trait FormStore {
    fn create(&mut self, form: Form) -> Result<Form, StoreError>;
    fn get_all(&self) -> Result<Vec<Form>, StoreError>;
    fn get(&self, id: Uuid) -> Result<Form, StoreError>;
    fn update(&mut self, id: Uuid, form: Form) -> Result<Form, StoreError>;
    fn delete(&mut self, id: Uuid) -> Result<bool, StoreError>;

    /// Mark a form published, minting a publish id and share URL.
    fn publish(&mut self, id: Uuid) -> Result<Form, StoreError>;
    fn unpublish(&mut self, id: Uuid) -> Result<Form, StoreError>;
    fn get_by_publish_id(&self, publish_id: &str) -> Result<Form, StoreError>;
    fn increment_submission_count(&mut self, id: Uuid) -> Result<Form, StoreError>;

    fn create_submission(
        &mut self,
        form_id: Uuid,
        answers: AnswerMap,
    ) -> Result<Submission, StoreError>;
}
