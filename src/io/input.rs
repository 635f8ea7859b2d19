use anyhow::{Context, Result, anyhow};
use serde_json::Value;

use crate::domain::Schema;

use super::DocumentFormat;

/// Parse structured data in any supported format into a `serde_json::Value`.
pub fn parse_document_str(contents: &str, format: DocumentFormat) -> Result<Value> {
    match format {
        DocumentFormat::Json => {
            serde_json::from_str::<Value>(contents).with_context(|| "failed to parse JSON document")
        }
        #[cfg(feature = "yaml")]
        DocumentFormat::Yaml => {
            serde_yaml::from_str::<Value>(contents).with_context(|| "failed to parse YAML document")
        }
        #[cfg(feature = "toml")]
        DocumentFormat::Toml => toml::from_str::<toml::Table>(contents)
            .with_context(|| "failed to parse TOML document")
            .and_then(|table| {
                serde_json::to_value(table).context("failed to convert TOML to JSON")
            }),
    }
}

/// Try `preferred` first, then every other compiled-in format.
pub fn parse_document_any(contents: &str, preferred: DocumentFormat) -> Result<Value> {
    let primary = match parse_document_str(contents, preferred) {
        Ok(value) => return Ok(value),
        Err(err) => err,
    };
    DocumentFormat::available_formats()
        .into_iter()
        .filter(|candidate| *candidate != preferred)
        .find_map(|candidate| parse_document_str(contents, candidate).ok())
        .ok_or_else(|| {
            let tried: Vec<String> = DocumentFormat::available_formats()
                .iter()
                .map(ToString::to_string)
                .collect();
            anyhow!(
                "tried {} (first error: {primary:#})",
                tried.join(", ")
            )
        })
}

/// Parse a schema document into the typed model.
pub fn load_schema_str(contents: &str, format: DocumentFormat) -> Result<Schema> {
    let value = parse_document_any(contents, format)?;
    Schema::from_value(&value).context("document is not a valid form schema")
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn parse_json_documents() {
        let raw = "{\"name\":{\"type\":\"text\"}}";
        let parsed = parse_document_str(raw, DocumentFormat::Json).unwrap();
        assert_eq!(parsed["name"]["type"], json!("text"));
    }

    #[cfg(feature = "yaml")]
    #[test]
    fn parse_yaml_documents() {
        let raw = "name:\n  type: text\n  position: 1";
        let parsed = parse_document_str(raw, DocumentFormat::Yaml).unwrap();
        assert_eq!(parsed["name"]["position"], json!(1));
    }

    #[cfg(feature = "toml")]
    #[test]
    fn parse_toml_documents() {
        let raw = "[name]\ntype = \"text\"\nlabel = \"Full Name\"";
        let parsed = parse_document_str(raw, DocumentFormat::Toml).unwrap();
        assert_eq!(parsed["name"]["label"], json!("Full Name"));
    }

    #[test]
    fn load_schema_keeps_document_order() {
        let schema = load_schema_str(
            r#"{"b": {"type": "text"}, "a": {"type": "date"}}"#,
            DocumentFormat::Json,
        )
        .unwrap();
        let keys: Vec<_> = schema.keys().cloned().collect();
        assert_eq!(keys, vec!["b", "a"]);
    }

    #[test]
    fn load_schema_reports_field_errors() {
        let err = load_schema_str(r#"{"a": "nope"}"#, DocumentFormat::Json).unwrap_err();
        assert!(format!("{err:#}").contains("field \"a\": expected an object"));
    }

    #[test]
    fn rejects_unparseable_documents() {
        assert!(load_schema_str("{not json", DocumentFormat::Json).is_err());
    }
}
