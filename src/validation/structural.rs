use crate::domain::{FieldKind, Schema};
use crate::schema::dotted;

use super::error::ValidationError;

/// Depth-first structural check in key insertion order. Stops at the first
/// violation.
pub fn validate_schema(schema: &Schema) -> Result<(), ValidationError> {
    validate_at(schema, &mut Vec::new())
}

fn validate_at<'a>(schema: &'a Schema, path: &mut Vec<&'a str>) -> Result<(), ValidationError> {
    if schema.is_empty() {
        return Err(ValidationError::EmptySchema {
            path: dotted(path.as_slice()),
        });
    }

    for (key, field) in schema {
        path.push(key);
        match &field.kind {
            None => {
                return Err(ValidationError::MissingType {
                    path: dotted(path.as_slice()),
                });
            }
            Some(FieldKind::Select(select)) if select.options.is_empty() => {
                return Err(ValidationError::EmptySelect {
                    path: dotted(path.as_slice()),
                });
            }
            Some(FieldKind::Container(None)) => {
                return Err(ValidationError::MissingNestedSchema {
                    path: dotted(path.as_slice()),
                });
            }
            Some(FieldKind::Container(Some(nested))) => validate_at(nested, path)?,
            Some(_) => {}
        }
        path.pop();
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn check(value: serde_json::Value) -> Result<(), ValidationError> {
        validate_schema(&Schema::from_value(&value).unwrap())
    }

    #[test]
    fn empty_root_names_empty_path() {
        let err = check(json!({})).unwrap_err();
        assert_eq!(err, ValidationError::EmptySchema { path: String::new() });
    }

    #[test]
    fn empty_select_names_field() {
        let err = check(json!({"a": {"type": "select", "options": []}})).unwrap_err();
        assert_eq!(err.to_string(), "Select field \"a\" must have at least one option");
    }

    #[test]
    fn missing_type_uses_dotted_path() {
        let err = check(json!({
            "addr": {"type": "schema", "schema": {"city": {"label": "City"}}}
        }))
        .unwrap_err();
        assert_eq!(err.to_string(), "Field \"addr.city\" is missing a type");
    }

    #[test]
    fn container_without_schema_differs_from_empty_container() {
        let missing = check(json!({"g": {"type": "schema"}})).unwrap_err();
        assert_eq!(missing, ValidationError::MissingNestedSchema { path: "g".into() });

        let empty = check(json!({"g": {"type": "schema", "schema": {}}})).unwrap_err();
        assert_eq!(empty.to_string(), "Schema at g is empty");
    }

    #[test]
    fn walks_in_insertion_order_not_position_order() {
        let err = check(json!({
            "late": {"position": 5},
            "early": {"type": "select", "position": 0}
        }))
        .unwrap_err();
        assert_eq!(err.path(), "late");
    }

    #[test]
    fn accepts_pass_through_types() {
        assert!(check(json!({"age": {"type": "number", "min": 0}})).is_ok());
    }
}
