#![deny(rust_2018_idioms)]
//! Nested form schemas, from editing to HTML.
//!
//! A [`Schema`] is an ordered tree of [`Field`]s. [`EditSession`] applies
//! copy-on-write edits to it, [`prepare_schema`] normalises option text and
//! validates the tree, and [`render_form`] turns it into an HTML fragment
//! whose control names use bracket paths (`addr[city]`). [`FormService`]
//! persists forms through a [`FormStore`] and records anonymous responses.

pub mod auth;
pub mod domain;
pub mod io;
pub mod render;
pub mod schema;
pub mod service;
pub mod store;
pub mod validation;

pub use domain::{
    Field, FieldKind, FieldParseError, Form, FormId, PublicForm, PublicId, Response, ResponseData,
    Schema, SelectField, SelectOption, Submission, UserId,
};
pub use io::{
    DocumentFormat, OutputDestination, OutputOptions, emit_document, emit_text, load_schema_str,
    parse_document_str,
};
pub use render::{RenderOptions, bracket_path, render_form};
pub use schema::{EditError, EditSession, FieldPatch};
pub use service::{FormService, ServiceError};
pub use store::{FormStore, MemoryStore, StoreError};
pub use validation::{ValidationError, ValidationOutcome, prepare_schema, validate_schema};

pub mod prelude {
    pub use super::{
        EditSession, Field, FieldPatch, FormService, RenderOptions, Schema, ValidationOutcome,
        prepare_schema, render_form,
    };
}
