//! Persistence contract for forms and responses.
//!
//! The service only needs keyed create/read/replace/delete; anything that
//! can provide that (a database table, a key-value store) implements
//! [`FormStore`]. [`MemoryStore`] keeps everything in process.

mod memory;

use thiserror::Error;

use crate::domain::{Form, FormId, PublicId, Response, UserId};

pub use memory::MemoryStore;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("record {0} already exists")]
    Duplicate(String),
    #[error("record {0} does not exist")]
    Missing(String),
    #[error("store backend failed: {0}")]
    Backend(String),
}

pub trait FormStore: Send + Sync {
    fn insert_form(&self, form: Form) -> Result<(), StoreError>;

    fn form(&self, id: FormId) -> Result<Option<Form>, StoreError>;

    fn form_by_public_id(&self, public_id: PublicId) -> Result<Option<Form>, StoreError>;

    /// Forms owned by `owner`, oldest first.
    fn forms_by_owner(&self, owner: &UserId) -> Result<Vec<Form>, StoreError>;

    /// Overwrite an existing form. Last write wins.
    fn replace_form(&self, form: Form) -> Result<(), StoreError>;

    fn remove_form(&self, id: FormId) -> Result<Option<Form>, StoreError>;

    fn insert_response(&self, response: Response) -> Result<(), StoreError>;

    /// Responses of one form in submission order.
    fn responses_for(&self, form_id: FormId) -> Result<Vec<Response>, StoreError>;

    /// Returns how many responses were removed.
    fn remove_responses_for(&self, form_id: FormId) -> Result<usize, StoreError>;
}
