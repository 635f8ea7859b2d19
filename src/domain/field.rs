use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::error::{FieldParseError, ParseIssue};
use super::schema::Schema;

/// Keys with a fixed meaning on a field document. Everything else is passed
/// through to the rendered control as an HTML attribute.
pub const RESERVED_KEYS: &[&str] = &[
    "type",
    "label",
    "hint",
    "schema",
    "options",
    "optionsRaw",
    "placeholder",
    "position",
];

/// One schema entry: a typed control plus display metadata.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(try_from = "Value", into = "Value")]
pub struct Field {
    /// `None` when the document carries no (or an empty) `type`.
    pub kind: Option<FieldKind>,
    pub label: Option<String>,
    pub hint: Option<String>,
    pub position: i64,
    pub attributes: IndexMap<String, Value>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FieldKind {
    Text,
    Email,
    Date,
    Textarea,
    Select(SelectField),
    /// A group of nested fields. `None` means the container has no nested
    /// schema at all, which is not the same as an empty one.
    Container(Option<Schema>),
    /// Any other HTML input type, rendered as `<input type="...">`.
    Input(String),
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct SelectField {
    pub options: Vec<SelectOption>,
    /// Newline-delimited `value,label` text waiting for normalisation.
    pub options_raw: Option<String>,
    pub placeholder: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
}

impl SelectOption {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

impl FieldKind {
    /// Build the payload-free variant for a `type` string.
    pub fn from_type_name(name: &str) -> Self {
        match name {
            "text" => FieldKind::Text,
            "email" => FieldKind::Email,
            "date" => FieldKind::Date,
            "textarea" => FieldKind::Textarea,
            "select" => FieldKind::Select(SelectField::default()),
            "schema" => FieldKind::Container(None),
            other => FieldKind::Input(other.to_string()),
        }
    }

    pub fn type_name(&self) -> &str {
        match self {
            FieldKind::Text => "text",
            FieldKind::Email => "email",
            FieldKind::Date => "date",
            FieldKind::Textarea => "textarea",
            FieldKind::Select(_) => "select",
            FieldKind::Container(_) => "schema",
            FieldKind::Input(name) => name,
        }
    }
}

impl Field {
    pub fn new(kind: FieldKind) -> Self {
        Self {
            kind: Some(kind),
            ..Self::default()
        }
    }

    pub fn text() -> Self {
        Self::new(FieldKind::Text)
    }

    pub fn select(options: Vec<SelectOption>) -> Self {
        Self::new(FieldKind::Select(SelectField {
            options,
            ..SelectField::default()
        }))
    }

    pub fn container(schema: Schema) -> Self {
        Self::new(FieldKind::Container(Some(schema)))
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    pub fn with_position(mut self, position: i64) -> Self {
        self.position = position;
        self
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    pub fn type_name(&self) -> Option<&str> {
        self.kind.as_ref().map(FieldKind::type_name)
    }

    pub fn is_container(&self) -> bool {
        matches!(self.kind, Some(FieldKind::Container(_)))
    }

    /// Nested schema of a container field, if there is one.
    pub fn nested(&self) -> Option<&Schema> {
        match &self.kind {
            Some(FieldKind::Container(Some(schema))) => Some(schema),
            _ => None,
        }
    }

    /// Parse one field document. Errors carry a path relative to this field.
    pub fn from_value(value: &Value) -> Result<Self, FieldParseError> {
        let object = value
            .as_object()
            .ok_or_else(|| FieldParseError::here(ParseIssue::NotAnObject))?;

        let kind = match object.get("type") {
            None | Some(Value::Null) => None,
            Some(Value::String(name)) if name.is_empty() => None,
            Some(Value::String(name)) => Some(parse_kind(name, object)?),
            Some(_) => return Err(FieldParseError::here(ParseIssue::ExpectedString("type"))),
        };

        let attributes = object
            .iter()
            .filter(|(key, _)| !RESERVED_KEYS.contains(&key.as_str()))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();

        Ok(Self {
            kind,
            label: optional_string(object, "label")?,
            hint: optional_string(object, "hint")?,
            position: parse_position(object.get("position"))?,
            attributes,
        })
    }

    pub fn to_value(&self) -> Value {
        let mut object = Map::new();
        if let Some(kind) = &self.kind {
            object.insert("type".into(), Value::String(kind.type_name().to_string()));
        }
        if let Some(label) = &self.label {
            object.insert("label".into(), Value::String(label.clone()));
        }
        if let Some(hint) = &self.hint {
            object.insert("hint".into(), Value::String(hint.clone()));
        }
        object.insert("position".into(), Value::from(self.position));

        match &self.kind {
            Some(FieldKind::Select(select)) => {
                let options = select
                    .options
                    .iter()
                    .map(|option| {
                        let mut entry = Map::new();
                        entry.insert("value".into(), Value::String(option.value.clone()));
                        entry.insert("label".into(), Value::String(option.label.clone()));
                        Value::Object(entry)
                    })
                    .collect();
                object.insert("options".into(), Value::Array(options));
                if let Some(raw) = &select.options_raw {
                    object.insert("optionsRaw".into(), Value::String(raw.clone()));
                }
                if let Some(placeholder) = &select.placeholder {
                    object.insert("placeholder".into(), Value::String(placeholder.clone()));
                }
            }
            Some(FieldKind::Container(Some(schema))) => {
                object.insert("schema".into(), schema.to_value());
            }
            _ => {}
        }

        for (key, value) in &self.attributes {
            object.insert(key.clone(), value.clone());
        }
        Value::Object(object)
    }
}

impl TryFrom<Value> for Field {
    type Error = FieldParseError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        Field::from_value(&value)
    }
}

impl From<Field> for Value {
    fn from(field: Field) -> Self {
        field.to_value()
    }
}

fn parse_kind(name: &str, object: &Map<String, Value>) -> Result<FieldKind, FieldParseError> {
    let kind = match FieldKind::from_type_name(name) {
        FieldKind::Select(_) => FieldKind::Select(SelectField {
            options: parse_options(object.get("options"))?,
            options_raw: optional_string(object, "optionsRaw")?,
            placeholder: optional_string(object, "placeholder")?,
        }),
        FieldKind::Container(_) => match object.get("schema") {
            None | Some(Value::Null) => FieldKind::Container(None),
            Some(nested @ Value::Object(_)) => {
                FieldKind::Container(Some(Schema::from_value(nested)?))
            }
            Some(_) => return Err(FieldParseError::here(ParseIssue::InvalidNestedSchema)),
        },
        other => other,
    };
    Ok(kind)
}

fn parse_options(value: Option<&Value>) -> Result<Vec<SelectOption>, FieldParseError> {
    let items = match value {
        None | Some(Value::Null) => return Ok(Vec::new()),
        Some(Value::Array(items)) => items,
        Some(_) => return Err(FieldParseError::here(ParseIssue::InvalidOptions)),
    };

    items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            let invalid = || FieldParseError::here(ParseIssue::InvalidOption { index });
            match item {
                Value::Array(pair) if pair.len() == 2 => Ok(SelectOption::new(
                    scalar_text(&pair[0]).ok_or_else(invalid)?,
                    scalar_text(&pair[1]).ok_or_else(invalid)?,
                )),
                Value::Object(entry) => Ok(SelectOption::new(
                    entry.get("value").and_then(scalar_text).ok_or_else(invalid)?,
                    entry.get("label").and_then(scalar_text).ok_or_else(invalid)?,
                )),
                _ => Err(invalid()),
            }
        })
        .collect()
}

fn parse_position(value: Option<&Value>) -> Result<i64, FieldParseError> {
    match value {
        None | Some(Value::Null) => Ok(0),
        Some(Value::Number(number)) => number
            .as_i64()
            .or_else(|| {
                number
                    .as_f64()
                    .filter(|float| {
                        float.fract() == 0.0 && (i64::MIN as f64..i64::MAX as f64).contains(float)
                    })
                    .map(|float| float as i64)
            })
            .ok_or_else(|| FieldParseError::here(ParseIssue::InvalidPosition)),
        Some(_) => Err(FieldParseError::here(ParseIssue::InvalidPosition)),
    }
}

fn optional_string(
    object: &Map<String, Value>,
    key: &'static str,
) -> Result<Option<String>, FieldParseError> {
    match object.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(text)) => Ok(Some(text.clone())),
        Some(_) => Err(FieldParseError::here(ParseIssue::ExpectedString(key))),
    }
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        _ => None,
    }
}

/// Upper-case the first character and keep the rest untouched.
pub fn capitalize(raw: &str) -> String {
    let mut chars = raw.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn parses_select_options_in_both_shapes() {
        let field = Field::from_value(&json!({
            "type": "select",
            "options": [{"value": 1, "label": "One"}, ["two", "Two"]],
            "placeholder": "Pick"
        }))
        .unwrap();
        let Some(FieldKind::Select(select)) = field.kind else {
            panic!("expected select");
        };
        assert_eq!(
            select.options,
            vec![SelectOption::new("1", "One"), SelectOption::new("two", "Two")]
        );
        assert_eq!(select.placeholder.as_deref(), Some("Pick"));
    }

    #[test]
    fn unknown_keys_become_attributes_in_order() {
        let field = Field::from_value(&json!({
            "type": "text",
            "required": true,
            "maxlength": 20,
            "options": ["ignored"],
            "position": 3
        }))
        .unwrap();
        let keys: Vec<_> = field.attributes.keys().cloned().collect();
        assert_eq!(keys, vec!["required", "maxlength"]);
        assert_eq!(field.position, 3);
    }

    #[test]
    fn distinguishes_missing_and_empty_nested_schema() {
        let missing = Field::from_value(&json!({"type": "schema"})).unwrap();
        assert_eq!(missing.kind, Some(FieldKind::Container(None)));

        let empty = Field::from_value(&json!({"type": "schema", "schema": {}})).unwrap();
        assert_eq!(empty.kind, Some(FieldKind::Container(Some(Schema::new()))));
    }

    #[test]
    fn empty_type_is_treated_as_missing() {
        let field = Field::from_value(&json!({"type": "", "label": "x"})).unwrap();
        assert!(field.kind.is_none());
        assert_eq!(field.label.as_deref(), Some("x"));
    }

    #[test]
    fn rejects_fractional_position() {
        let err = Field::from_value(&json!({"type": "text", "position": 1.5})).unwrap_err();
        assert_eq!(err.issue, ParseIssue::InvalidPosition);
    }

    #[test]
    fn rejects_position_outside_integer_range() {
        for position in [json!(1e300), json!(-1e300), json!(9.3e18)] {
            let err = Field::from_value(&json!({"type": "text", "position": position})).unwrap_err();
            assert_eq!(err.issue, ParseIssue::InvalidPosition);
        }
        let field = Field::from_value(&json!({"type": "text", "position": 2.0})).unwrap();
        assert_eq!(field.position, 2);
    }

    #[test]
    fn capitalizes_first_character_only() {
        assert_eq!(capitalize("addr"), "Addr");
        assert_eq!(capitalize("firstName"), "FirstName");
        assert_eq!(capitalize("éclair"), "Éclair");
        assert_eq!(capitalize(""), "");
    }
}
