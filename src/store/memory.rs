use std::collections::HashMap;

use indexmap::IndexMap;
use parking_lot::RwLock;
use tracing::debug;

use crate::domain::{Form, FormId, PublicId, Response, ResponseId, UserId};

use super::{FormStore, StoreError};

#[derive(Debug, Default)]
struct Tables {
    forms: IndexMap<FormId, Form>,
    public_ids: HashMap<PublicId, FormId>,
    responses: IndexMap<ResponseId, Response>,
}

/// In-process store. Every operation takes the lock once, so each call is
/// atomic with respect to the others.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl FormStore for MemoryStore {
    fn insert_form(&self, form: Form) -> Result<(), StoreError> {
        let mut tables = self.tables.write();
        if tables.forms.contains_key(&form.id) {
            return Err(StoreError::Duplicate(form.id.to_string()));
        }
        if tables.public_ids.contains_key(&form.public_id) {
            return Err(StoreError::Duplicate(form.public_id.to_string()));
        }
        tables.public_ids.insert(form.public_id, form.id);
        tables.forms.insert(form.id, form);
        Ok(())
    }

    fn form(&self, id: FormId) -> Result<Option<Form>, StoreError> {
        Ok(self.tables.read().forms.get(&id).cloned())
    }

    fn form_by_public_id(&self, public_id: PublicId) -> Result<Option<Form>, StoreError> {
        let tables = self.tables.read();
        Ok(tables
            .public_ids
            .get(&public_id)
            .and_then(|id| tables.forms.get(id))
            .cloned())
    }

    fn forms_by_owner(&self, owner: &UserId) -> Result<Vec<Form>, StoreError> {
        Ok(self
            .tables
            .read()
            .forms
            .values()
            .filter(|form| &form.owner == owner)
            .cloned()
            .collect())
    }

    fn replace_form(&self, form: Form) -> Result<(), StoreError> {
        let mut tables = self.tables.write();
        let Some(slot) = tables.forms.get_mut(&form.id) else {
            return Err(StoreError::Missing(form.id.to_string()));
        };
        *slot = form;
        Ok(())
    }

    fn remove_form(&self, id: FormId) -> Result<Option<Form>, StoreError> {
        let mut tables = self.tables.write();
        let removed = tables.forms.shift_remove(&id);
        if let Some(form) = &removed {
            tables.public_ids.remove(&form.public_id);
        }
        Ok(removed)
    }

    fn insert_response(&self, response: Response) -> Result<(), StoreError> {
        let mut tables = self.tables.write();
        if !tables.forms.contains_key(&response.form_id) {
            return Err(StoreError::Missing(response.form_id.to_string()));
        }
        if tables.responses.contains_key(&response.id) {
            return Err(StoreError::Duplicate(response.id.to_string()));
        }
        tables.responses.insert(response.id, response);
        Ok(())
    }

    fn responses_for(&self, form_id: FormId) -> Result<Vec<Response>, StoreError> {
        Ok(self
            .tables
            .read()
            .responses
            .values()
            .filter(|response| response.form_id == form_id)
            .cloned()
            .collect())
    }

    fn remove_responses_for(&self, form_id: FormId) -> Result<usize, StoreError> {
        let mut tables = self.tables.write();
        let before = tables.responses.len();
        tables
            .responses
            .retain(|_, response| response.form_id != form_id);
        let removed = before - tables.responses.len();
        debug!(%form_id, removed, "dropped responses");
        Ok(removed)
    }
}
