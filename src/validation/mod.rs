mod error;
mod options;
mod structural;

use serde::{Deserialize, Serialize};

use crate::domain::Schema;

pub use error::ValidationError;
pub use options::{normalize_select_options, parse_option_lines};
pub use structural::validate_schema;

/// Wire shape of a validation result: `{"isValid": bool, "error": string|null}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationOutcome {
    pub is_valid: bool,
    pub error: Option<String>,
}

impl ValidationOutcome {
    pub fn check(schema: &Schema) -> Self {
        validate_schema(schema).into()
    }
}

impl From<Result<(), ValidationError>> for ValidationOutcome {
    fn from(result: Result<(), ValidationError>) -> Self {
        match result {
            Ok(()) => Self {
                is_valid: true,
                error: None,
            },
            Err(err) => Self {
                is_valid: false,
                error: Some(err.to_string()),
            },
        }
    }
}

/// Normalise option text, then run the structural check. This is the gate
/// in front of preview and persistence.
pub fn prepare_schema(schema: &Schema) -> Result<Schema, ValidationError> {
    let normalized = normalize_select_options(schema)?;
    validate_schema(&normalized)?;
    Ok(normalized)
}
