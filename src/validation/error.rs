use thiserror::Error;

/// The first problem found in a schema. Messages are shown to the form
/// author verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Schema at {path} is empty")]
    EmptySchema { path: String },
    #[error("Field \"{path}\" is missing a type")]
    MissingType { path: String },
    #[error("Select field \"{path}\" must have at least one option")]
    EmptySelect { path: String },
    #[error("Schema field \"{path}\" has no schema defined")]
    MissingNestedSchema { path: String },
    #[error(
        "Select field \"{path}\" has invalid option format on line {line}: \"{content}\". Each line must be value,label."
    )]
    OptionFormat {
        path: String,
        /// 1-based, counting non-empty lines only.
        line: usize,
        content: String,
    },
}

impl ValidationError {
    /// Dotted path of the offending schema or field; empty for the root.
    pub fn path(&self) -> &str {
        match self {
            ValidationError::EmptySchema { path }
            | ValidationError::MissingType { path }
            | ValidationError::EmptySelect { path }
            | ValidationError::MissingNestedSchema { path }
            | ValidationError::OptionFormat { path, .. } => path,
        }
    }
}
