use crate::domain::{FieldKind, Schema, SelectOption};
use crate::schema::dotted;

use super::error::ValidationError;

/// Replace every select field's `optionsRaw` text with parsed options.
///
/// Runs before [`validate_schema`](super::validate_schema); the first
/// malformed line aborts the whole pass.
pub fn normalize_select_options(schema: &Schema) -> Result<Schema, ValidationError> {
    normalize_at(schema, &mut Vec::new())
}

/// Parse `value,label` lines. Empty lines are skipped and not counted. On
/// failure returns the 1-based line number and the offending line.
pub fn parse_option_lines(raw: &str) -> Result<Vec<SelectOption>, (usize, String)> {
    raw.split('\n')
        .filter(|line| !line.is_empty())
        .enumerate()
        .map(|(index, line)| {
            let parts: Vec<&str> = line.split(',').collect();
            match parts.as_slice() {
                [value, label] => Ok(SelectOption::new(value.trim(), label.trim())),
                _ => Err((index + 1, line.to_string())),
            }
        })
        .collect()
}

fn normalize_at<'a>(
    schema: &'a Schema,
    path: &mut Vec<&'a str>,
) -> Result<Schema, ValidationError> {
    let mut normalized = schema.clone();
    for (key, field) in schema {
        path.push(key);
        match &field.kind {
            Some(FieldKind::Select(select)) => {
                if let Some(raw) = &select.options_raw {
                    let options = parse_option_lines(raw).map_err(|(line, content)| {
                        ValidationError::OptionFormat {
                            path: dotted(path.as_slice()),
                            line,
                            content,
                        }
                    })?;
                    if let Some(Some(FieldKind::Select(target))) =
                        normalized.get_mut(key).map(|field| &mut field.kind)
                    {
                        target.options = options;
                        target.options_raw = None;
                    }
                }
            }
            Some(FieldKind::Container(Some(nested))) => {
                let nested = normalize_at(nested, path)?;
                if let Some(target) = normalized.get_mut(key) {
                    target.kind = Some(FieldKind::Container(Some(nested)));
                }
            }
            _ => {}
        }
        path.pop();
    }
    Ok(normalized)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn parses_and_trims_lines() {
        let options = parse_option_lines("a, Alpha\n\n b ,Beta\r\n").unwrap();
        assert_eq!(
            options,
            vec![SelectOption::new("a", "Alpha"), SelectOption::new("b", "Beta")]
        );
    }

    #[test]
    fn counts_only_non_empty_lines() {
        let err = parse_option_lines("a,A\n\nbroken").unwrap_err();
        assert_eq!(err, (2, "broken".to_string()));
    }

    #[test]
    fn normalises_nested_selects() {
        let schema = Schema::from_value(&json!({
            "prefs": {"type": "schema", "schema": {
                "color": {"type": "select", "optionsRaw": "r,Red\ng,Green"}
            }}
        }))
        .unwrap();
        let normalized = normalize_select_options(&schema).unwrap();
        let color = normalized.nested(&["prefs"]).unwrap().get("color").unwrap();
        let Some(FieldKind::Select(select)) = &color.kind else {
            panic!("expected select");
        };
        assert_eq!(select.options.len(), 2);
        assert_eq!(select.options_raw, None);
    }

    #[test]
    fn malformed_line_names_field_and_line() {
        let schema = Schema::from_value(&json!({
            "prefs": {"type": "schema", "schema": {
                "color": {"type": "select", "optionsRaw": "r,Red\na,b,c"}
            }}
        }))
        .unwrap();
        let err = normalize_select_options(&schema).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Select field \"prefs.color\" has invalid option format on line 2: \"a,b,c\". Each line must be value,label."
        );
    }
}
