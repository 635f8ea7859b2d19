use crate::domain::Schema;
use crate::render::{RenderOptions, render_form};
use crate::validation::{ValidationError, prepare_schema};

use super::error::EditError;
use super::ops;
use super::patch::FieldPatch;

/// The schema being edited, owned by whoever drives the editor.
///
/// Each edit computes a complete new tree first and only then replaces the
/// current one, so a rejected edit leaves the session exactly as it was.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EditSession {
    schema: Schema,
}

impl EditSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_schema(schema: Schema) -> Self {
        Self { schema }
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn into_schema(self) -> Schema {
        self.schema
    }

    /// Fields directly under `path`, empty when the path does not exist yet.
    pub fn fields_at<P: AsRef<str>>(&self, path: &[P]) -> Schema {
        ops::get_nested_schema(&self.schema, path)
    }

    pub fn add_field<P: AsRef<str>>(&mut self, parent_path: &[P]) -> Result<String, EditError> {
        let (schema, name) = ops::add_field(&self.schema, parent_path)?;
        self.schema = schema;
        Ok(name)
    }

    pub fn update_field<P: AsRef<str>>(
        &mut self,
        path: &[P],
        patch: &FieldPatch,
    ) -> Result<(), EditError> {
        self.schema = ops::update_field(&self.schema, path, patch)?;
        Ok(())
    }

    pub fn delete_field<P: AsRef<str>>(&mut self, path: &[P]) {
        self.schema = ops::delete_field(&self.schema, path);
    }

    pub fn rename_field<P: AsRef<str>>(
        &mut self,
        old_path: &[P],
        new_name: &str,
    ) -> Result<(), EditError> {
        self.schema = ops::rename_field(&self.schema, old_path, new_name)?;
        Ok(())
    }

    pub fn reorder_fields<P: AsRef<str>>(
        &mut self,
        parent_path: &[P],
        old_index: usize,
        new_index: usize,
    ) -> Result<(), EditError> {
        self.schema = ops::reorder_fields(&self.schema, parent_path, old_index, new_index)?;
        Ok(())
    }

    pub fn move_field<P: AsRef<str>>(
        &mut self,
        parent_path: &[P],
        active: &str,
        over: &str,
    ) -> Result<(), EditError> {
        self.schema = ops::move_field(&self.schema, parent_path, active, over)?;
        Ok(())
    }

    /// Normalised, validated copy of the schema, ready to persist.
    pub fn prepare(&self) -> Result<Schema, ValidationError> {
        prepare_schema(&self.schema)
    }

    pub fn preview(&self, options: &RenderOptions) -> Result<String, ValidationError> {
        let schema = self.prepare()?;
        Ok(render_form(&schema, options))
    }
}
