use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::{Field, SelectOption};

/// Partial field document merged onto an existing field by
/// [`update_field`](super::update_field). Keys overwrite; `null` removes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldPatch(Map<String, Value>);

impl FieldPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn unset(self, key: impl Into<String>) -> Self {
        self.set(key, Value::Null)
    }

    pub fn kind(self, type_name: &str) -> Self {
        self.set("type", type_name)
    }

    pub fn label(self, label: impl Into<String>) -> Self {
        self.set("label", label.into())
    }

    pub fn hint(self, hint: impl Into<String>) -> Self {
        self.set("hint", hint.into())
    }

    pub fn options(self, options: &[SelectOption]) -> Self {
        let value = options
            .iter()
            .map(|option| {
                serde_json::json!({"value": option.value.as_str(), "label": option.label.as_str()})
            })
            .collect::<Vec<_>>();
        self.set("options", value)
    }

    pub fn options_raw(self, raw: impl Into<String>) -> Self {
        self.set("optionsRaw", raw.into())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Merge onto `base` (or onto nothing) and parse the result. Only a patch
    /// that itself sets `type` to `schema` seeds an empty nested schema.
    pub(crate) fn apply(&self, base: Option<&Field>) -> Result<Field, crate::domain::FieldParseError> {
        let mut merged = match base.map(Field::to_value) {
            Some(Value::Object(object)) => object,
            _ => Map::new(),
        };
        for (key, value) in &self.0 {
            if value.is_null() {
                merged.shift_remove(key);
            } else {
                merged.insert(key.clone(), value.clone());
            }
        }

        let becomes_container = self.0.get("type").and_then(Value::as_str) == Some("schema");
        if becomes_container && !merged.get("schema").is_some_and(Value::is_object) {
            merged.insert("schema".into(), Value::Object(Map::new()));
        }

        Field::from_value(&Value::Object(merged))
    }
}

impl From<Map<String, Value>> for FieldPatch {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::domain::{FieldKind, Schema};

    #[test]
    fn switching_to_container_seeds_empty_schema() {
        let field = FieldPatch::new()
            .kind("schema")
            .apply(Some(&Field::text()))
            .unwrap();
        assert_eq!(field.kind, Some(FieldKind::Container(Some(Schema::new()))));
    }

    #[test]
    fn unrelated_patch_keeps_container_without_schema() {
        let base = Field::from_value(&json!({"type": "schema"})).unwrap();
        let field = FieldPatch::new().label("Group").apply(Some(&base)).unwrap();
        assert_eq!(field.kind, Some(FieldKind::Container(None)));
        assert_eq!(field.label.as_deref(), Some("Group"));
    }

    #[test]
    fn null_removes_key() {
        let base = Field::text().with_hint("old");
        let field = FieldPatch::new().unset("hint").apply(Some(&base)).unwrap();
        assert_eq!(field.hint, None);
    }
}
