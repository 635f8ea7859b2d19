//! Form and response operations for owners and anonymous visitors.
//!
//! Owner operations take the caller's [`UserId`] (see
//! [`authenticate`](crate::auth::authenticate)). A form that exists but
//! belongs to someone else is reported exactly like a missing one.

use chrono::Utc;
use thiserror::Error;
use tracing::{debug, info};

use crate::auth::AuthError;
use crate::domain::{
    Form, FormId, PublicForm, PublicId, Response, ResponseData, ResponseId, Schema, UserId,
};
use crate::render::{RenderOptions, render_form};
use crate::store::{FormStore, StoreError};
use crate::validation::{ValidationError, prepare_schema};

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("Please enter a title for your form.")]
    MissingTitle,
    #[error("Not found")]
    NotFound,
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

pub struct FormService<S> {
    store: S,
    render: RenderOptions,
}

impl<S: FormStore> FormService<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            render: RenderOptions::default(),
        }
    }

    pub fn with_render_options(mut self, render: RenderOptions) -> Self {
        self.render = render;
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Validate and render without saving anything.
    pub fn preview(&self, schema: &Schema) -> ServiceResult<String> {
        let schema = prepare_schema(schema)?;
        let html = render_form(&schema, &self.render);
        debug!(bytes = html.len(), "rendered preview");
        Ok(html)
    }

    pub fn create_form(&self, owner: &UserId, title: &str, schema: &Schema) -> ServiceResult<Form> {
        let schema = prepare_schema(schema)?;
        let title = require_title(title)?;
        let now = Utc::now();
        let form = Form {
            id: FormId::generate(),
            owner: owner.clone(),
            title,
            schema,
            public_id: PublicId::generate(),
            created_at: now,
            updated_at: now,
        };
        self.store.insert_form(form.clone())?;
        info!(form_id = %form.id, %owner, "form created");
        Ok(form)
    }

    pub fn list_forms(&self, owner: &UserId) -> ServiceResult<Vec<Form>> {
        Ok(self.store.forms_by_owner(owner)?)
    }

    pub fn get_form(&self, owner: &UserId, id: FormId) -> ServiceResult<Form> {
        self.owned_form(owner, id)
    }

    /// Replace title and schema wholesale. `id`, `owner` and `publicId` never
    /// change.
    pub fn update_form(
        &self,
        owner: &UserId,
        id: FormId,
        title: &str,
        schema: &Schema,
    ) -> ServiceResult<Form> {
        let existing = self.owned_form(owner, id)?;
        let schema = prepare_schema(schema)?;
        let title = require_title(title)?;
        let form = Form {
            title,
            schema,
            updated_at: Utc::now(),
            ..existing
        };
        self.store.replace_form(form.clone())?;
        info!(form_id = %form.id, "form updated");
        Ok(form)
    }

    /// Delete a form and every response recorded against it. The form goes
    /// first so that no submission can land after its responses are swept.
    pub fn delete_form(&self, owner: &UserId, id: FormId) -> ServiceResult<()> {
        let form = self.owned_form(owner, id)?;
        self.store.remove_form(form.id)?;
        let responses = self.store.remove_responses_for(form.id)?;
        info!(form_id = %form.id, responses, "form deleted");
        Ok(())
    }

    /// Anonymous view of a shared form, with its HTML rendered fresh.
    pub fn public_form(&self, public_id: PublicId) -> ServiceResult<PublicForm> {
        let form = self
            .store
            .form_by_public_id(public_id)?
            .ok_or(ServiceError::NotFound)?;
        Ok(PublicForm {
            id: form.id,
            html: render_form(&form.schema, &self.render),
            title: form.title,
            public_id: form.public_id,
        })
    }

    /// Record an anonymous submission. Keys are stored exactly as submitted.
    pub fn submit_response(
        &self,
        public_id: PublicId,
        response: ResponseData,
    ) -> ServiceResult<Response> {
        let form = self
            .store
            .form_by_public_id(public_id)?
            .ok_or(ServiceError::NotFound)?;
        let response = Response {
            id: ResponseId::generate(),
            form_id: form.id,
            response,
            submitted_at: Utc::now(),
        };
        self.store.insert_response(response.clone())?;
        info!(form_id = %form.id, response_id = %response.id, "response recorded");
        Ok(response)
    }

    pub fn list_responses(&self, owner: &UserId, form_id: FormId) -> ServiceResult<Vec<Response>> {
        let form = self.owned_form(owner, form_id)?;
        Ok(self.store.responses_for(form.id)?)
    }

    fn owned_form(&self, owner: &UserId, id: FormId) -> ServiceResult<Form> {
        match self.store.form(id)? {
            Some(form) if &form.owner == owner => Ok(form),
            _ => {
                debug!(form_id = %id, %owner, "form not visible to caller");
                Err(ServiceError::NotFound)
            }
        }
    }
}

fn require_title(title: &str) -> ServiceResult<String> {
    let title = title.trim();
    if title.is_empty() {
        return Err(ServiceError::MissingTitle);
    }
    Ok(title.to_string())
}
