use thiserror::Error;

use crate::domain::FieldParseError;

/// A rejected structural edit. The tree the edit was applied to is untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditError {
    #[error("field path is empty")]
    EmptyPath,
    #[error("field \"{path}\" does not exist")]
    FieldNotFound { path: String },
    #[error("field \"{path}\" is not a schema field and cannot hold nested fields")]
    NotAContainer { path: String },
    #[error("field name \"{name}\" already exists at this level")]
    NameConflict { name: String },
    #[error("\"{name}\" is not a usable field name")]
    InvalidName { name: String },
    #[error("index {index} is out of range for {len} fields")]
    IndexOutOfRange { index: usize, len: usize },
    #[error(transparent)]
    InvalidField(#[from] FieldParseError),
}

pub(crate) fn dotted<P: AsRef<str>>(path: &[P]) -> String {
    path.iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join(".")
}
