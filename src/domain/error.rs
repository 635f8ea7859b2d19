use thiserror::Error;

/// A field or schema document that cannot be turned into the typed model.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("field \"{}\": {issue}", .path.join("."))]
pub struct FieldParseError {
    /// Keys from the outermost document down to the offending field.
    pub path: Vec<String>,
    pub issue: ParseIssue,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseIssue {
    #[error("expected an object")]
    NotAnObject,
    #[error("`{0}` must be a string")]
    ExpectedString(&'static str),
    #[error("`position` must be an integer")]
    InvalidPosition,
    #[error("`options` must be an array")]
    InvalidOptions,
    #[error("option {index} must be {{value, label}} or [value, label]")]
    InvalidOption { index: usize },
    #[error("`schema` must be an object")]
    InvalidNestedSchema,
}

impl FieldParseError {
    pub(crate) fn here(issue: ParseIssue) -> Self {
        Self {
            path: Vec::new(),
            issue,
        }
    }

    pub(crate) fn under(mut self, key: &str) -> Self {
        self.path.insert(0, key.to_string());
        self
    }

    pub(crate) fn under_path<P: AsRef<str>>(mut self, prefix: &[P]) -> Self {
        let mut path: Vec<String> = prefix.iter().map(|key| key.as_ref().to_string()).collect();
        path.append(&mut self.path);
        self.path = path;
        self
    }
}
