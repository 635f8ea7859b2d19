use indexmap::IndexMap;
use indexmap::map::{IntoIter, Iter};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::error::{FieldParseError, ParseIssue};
use super::field::Field;

/// Ordered mapping from field key to field. Insertion order is preserved;
/// rendering order is decided by each field's `position`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(try_from = "Value", into = "Value")]
pub struct Schema {
    fields: IndexMap<String, Field>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn get(&self, key: &str) -> Option<&Field> {
        self.fields.get(key)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut Field> {
        self.fields.get_mut(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    pub fn get_index_of(&self, key: &str) -> Option<usize> {
        self.fields.get_index_of(key)
    }

    /// Insert or replace. A replaced key keeps its insertion slot.
    pub fn insert(&mut self, key: impl Into<String>, field: Field) -> Option<Field> {
        self.fields.insert(key.into(), field)
    }

    /// Remove a key while keeping the order of the remaining entries.
    pub fn remove(&mut self, key: &str) -> Option<Field> {
        self.fields.shift_remove(key)
    }

    /// Put `field` under `new_key` at the slot currently held by `old_key`.
    /// Returns `false` when `old_key` is absent.
    pub(crate) fn replace_key(&mut self, old_key: &str, new_key: &str, field: Field) -> bool {
        let Some(index) = self.fields.get_index_of(old_key) else {
            return false;
        };
        self.fields.shift_remove_index(index);
        self.fields.shift_insert(index, new_key.to_string(), field);
        true
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.fields.keys()
    }

    pub fn iter(&self) -> Iter<'_, String, Field> {
        self.fields.iter()
    }

    /// Entries in rendering order: ascending `position`, ties in insertion order.
    pub fn sorted(&self) -> Vec<(&String, &Field)> {
        let mut entries: Vec<_> = self.fields.iter().collect();
        entries.sort_by_key(|(_, field)| field.position);
        entries
    }

    /// Position for a field appended after every existing sibling.
    pub fn next_position(&self) -> i64 {
        self.fields
            .values()
            .map(|field| field.position)
            .max()
            .map_or(0, |max| max.saturating_add(1))
    }

    /// Borrow the schema nested at `path`, following container fields only.
    pub fn nested<P: AsRef<str>>(&self, path: &[P]) -> Option<&Schema> {
        let mut current = self;
        for key in path {
            current = current.get(key.as_ref())?.nested()?;
        }
        Some(current)
    }

    pub fn from_value(value: &Value) -> Result<Self, FieldParseError> {
        let object = value
            .as_object()
            .ok_or_else(|| FieldParseError::here(ParseIssue::NotAnObject))?;
        object
            .iter()
            .map(|(key, entry)| {
                Field::from_value(entry)
                    .map(|field| (key.clone(), field))
                    .map_err(|err| err.under(key))
            })
            .collect()
    }

    pub fn to_value(&self) -> Value {
        Value::Object(
            self.fields
                .iter()
                .map(|(key, field)| (key.clone(), field.to_value()))
                .collect::<Map<_, _>>(),
        )
    }
}

impl TryFrom<Value> for Schema {
    type Error = FieldParseError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        Schema::from_value(&value)
    }
}

impl From<Schema> for Value {
    fn from(schema: Schema) -> Self {
        schema.to_value()
    }
}

impl<K: Into<String>> FromIterator<(K, Field)> for Schema {
    fn from_iter<T: IntoIterator<Item = (K, Field)>>(iter: T) -> Self {
        Self {
            fields: iter.into_iter().map(|(key, field)| (key.into(), field)).collect(),
        }
    }
}

impl IntoIterator for Schema {
    type Item = (String, Field);
    type IntoIter = IntoIter<String, Field>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.into_iter()
    }
}

impl<'a> IntoIterator for &'a Schema {
    type Item = (&'a String, &'a Field);
    type IntoIter = Iter<'a, String, Field>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.iter()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn sorted_is_stable_for_equal_positions() {
        let schema: Schema = [
            ("b", Field::text().with_position(1)),
            ("a", Field::text().with_position(0)),
            ("c", Field::text().with_position(1)),
        ]
        .into_iter()
        .collect();
        let keys: Vec<_> = schema.sorted().into_iter().map(|(key, _)| key.as_str()).collect();
        assert_eq!(keys, vec!["a", "b", "c"]);
    }

    #[test]
    fn next_position_follows_max() {
        assert_eq!(Schema::new().next_position(), 0);
        let schema: Schema = [("x", Field::text().with_position(4))].into_iter().collect();
        assert_eq!(schema.next_position(), 5);

        let full: Schema = [("x", Field::text().with_position(i64::MAX))].into_iter().collect();
        assert_eq!(full.next_position(), i64::MAX);
    }

    #[test]
    fn parse_errors_name_the_nested_path() {
        let err = Schema::from_value(&json!({
            "addr": {"type": "schema", "schema": {"city": {"type": 7}}}
        }))
        .unwrap_err();
        assert_eq!(err.path, vec!["addr", "city"]);
        assert_eq!(err.to_string(), "field \"addr.city\": `type` must be a string");
    }

    #[test]
    fn deserializes_through_serde_preserving_key_order() {
        let schema: Schema = serde_json::from_str(
            r#"{"zeta": {"type": "text"}, "alpha": {"type": "email"}}"#,
        )
        .unwrap();
        let keys: Vec<_> = schema.keys().cloned().collect();
        assert_eq!(keys, vec!["zeta", "alpha"]);
        let back = serde_json::to_value(&schema).unwrap();
        assert_eq!(back["alpha"]["type"], json!("email"));
        assert_eq!(back["zeta"]["position"], json!(0));
    }
}
