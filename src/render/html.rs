use std::fmt::Write;

use serde_json::Value;

use crate::domain::{Field, FieldKind, Schema, SelectField, capitalize};

use super::RenderOptions;

/// Render `schema` into an HTML fragment. The fragment has no `<form>`
/// wrapper; the embedding page decides action and method.
///
/// Attribute values and labels are written as-is. Schemas are authored by
/// the owning account and are trusted.
pub fn render_form(schema: &Schema, options: &RenderOptions) -> String {
    let mut out = String::new();
    render_level(&mut out, schema, None, options);
    out
}

/// HTML `name` for a nested path: `["addr", "city"]` becomes `addr[city]`.
pub fn bracket_path<P: AsRef<str>>(path: &[P]) -> String {
    let mut segments = path.iter().map(AsRef::as_ref);
    let mut name = segments.next().unwrap_or_default().to_string();
    for segment in segments {
        let _ = write!(name, "[{segment}]");
    }
    name
}

fn render_level(out: &mut String, schema: &Schema, prefix: Option<&str>, options: &RenderOptions) {
    for (key, field) in schema.sorted() {
        let name = match prefix {
            Some(prefix) => format!("{prefix}[{key}]"),
            None => key.clone(),
        };
        if !out.is_empty() {
            out.push('\n');
        }
        match &field.kind {
            Some(FieldKind::Container(nested)) => {
                render_fieldset(out, &name, key, field, nested.as_ref(), options)
            }
            _ => render_control(out, &name, key, field, options),
        }
    }
}

fn render_fieldset(
    out: &mut String,
    name: &str,
    key: &str,
    field: &Field,
    nested: Option<&Schema>,
    options: &RenderOptions,
) {
    let _ = write!(out, "<fieldset>\n<legend>{}</legend>", capitalize(key));
    if let Some(hint) = &field.hint {
        out.push('\n');
        push_hint(out, hint, options);
    }

    let mut children = String::new();
    if let Some(nested) = nested {
        render_level(&mut children, nested, Some(name), options);
    }
    if !children.is_empty() {
        out.push('\n');
        out.push_str(&children);
    }
    out.push_str("\n</fieldset>");
}

fn render_control(out: &mut String, name: &str, key: &str, field: &Field, options: &RenderOptions) {
    let label = field.label.clone().unwrap_or_else(|| capitalize(key));
    let attrs = attributes(field);

    let _ = write!(out, "<div>\n<label for=\"{name}\">{label}</label>\n");
    match &field.kind {
        Some(FieldKind::Select(select)) => push_select(out, name, &attrs, select, options),
        Some(FieldKind::Textarea) => {
            let _ = write!(out, "<textarea name=\"{name}\" id=\"{name}\"{attrs}></textarea>");
        }
        kind => {
            // A field without a type falls back to a plain text input.
            let type_name = kind.as_ref().map_or("text", FieldKind::type_name);
            let _ = write!(
                out,
                "<input type=\"{type_name}\" name=\"{name}\" id=\"{name}\"{attrs}>"
            );
        }
    }
    if let Some(hint) = &field.hint {
        out.push('\n');
        push_hint(out, hint, options);
    }
    out.push_str("\n</div>");
}

fn push_select(
    out: &mut String,
    name: &str,
    attrs: &str,
    select: &SelectField,
    options: &RenderOptions,
) {
    let _ = write!(out, "<select name=\"{name}\" id=\"{name}\"{attrs}>");
    let placeholder = select
        .placeholder
        .as_deref()
        .or(options.default_placeholder.as_deref());
    if let Some(text) = placeholder {
        let _ = write!(out, "<option value=\"\">{text}</option>");
    }
    for option in &select.options {
        let _ = write!(
            out,
            "<option value=\"{}\">{}</option>",
            option.value, option.label
        );
    }
    out.push_str("</select>");
}

fn push_hint(out: &mut String, hint: &str, options: &RenderOptions) {
    let _ = write!(
        out,
        "<div class=\"hint\" style=\"font-style: italic;\">{}{hint}</div>",
        options.hint_prefix
    );
}

fn attributes(field: &Field) -> String {
    field
        .attributes
        .iter()
        .fold(String::new(), |mut acc, (key, value)| {
            let _ = write!(acc, " {key}=\"{}\"", attribute_text(value));
            acc
        })
}

fn attribute_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Array(items) => items
            .iter()
            .map(attribute_text)
            .collect::<Vec<_>>()
            .join(","),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn render(value: Value) -> String {
        render_form(&Schema::from_value(&value).unwrap(), &RenderOptions::default())
    }

    #[test]
    fn renders_text_input_with_label() {
        let html = render(json!({"email": {"type": "email", "label": "E-mail"}}));
        assert_eq!(
            html,
            "<div>\n<label for=\"email\">E-mail</label>\n\
             <input type=\"email\" name=\"email\" id=\"email\">\n</div>"
        );
    }

    #[test]
    fn passes_extra_attributes_through_in_order() {
        let html = render(json!({
            "age": {"type": "number", "min": 0, "required": true, "placeholder": "n/a", "position": 2}
        }));
        assert!(html.contains("<input type=\"number\" name=\"age\" id=\"age\" min=\"0\" required=\"true\">"));
        assert!(!html.contains("position="));
        assert!(!html.contains("placeholder="));
    }

    #[test]
    fn hint_follows_control() {
        let html = render(json!({"bio": {"type": "textarea", "hint": "Keep it short", "rows": 4}}));
        let control = html.find("<textarea name=\"bio\" id=\"bio\" rows=\"4\"></textarea>").unwrap();
        let hint = html.find("Hint: Keep it short").unwrap();
        assert!(control < hint);
    }

    #[test]
    fn fieldset_hint_sits_between_legend_and_children() {
        let html = render(json!({
            "addr": {"type": "schema", "hint": "Postal", "schema": {
                "city": {"type": "text"}
            }}
        }));
        let legend = html.find("<legend>Addr</legend>").unwrap();
        let hint = html.find("Hint: Postal").unwrap();
        let child = html.find("name=\"addr[city]\"").unwrap();
        assert!(legend < hint && hint < child);
        assert!(html.ends_with("</fieldset>"));
    }

    #[test]
    fn placeholder_comes_from_field_or_options() {
        let schema = Schema::from_value(&json!({
            "c": {"type": "select", "options": [{"value": "a", "label": "A"}]}
        }))
        .unwrap();
        let plain = render_form(&schema, &RenderOptions::default());
        assert!(!plain.contains("<option value=\"\">"));

        let defaulted = render_form(&schema, &RenderOptions::default().with_default_placeholder());
        assert!(defaulted.contains("<select name=\"c\" id=\"c\"><option value=\"\">Select...</option>"));

        let own = render(json!({
            "c": {"type": "select", "placeholder": "Pick one", "options": [["a", "A"]]}
        }));
        assert!(own.contains("<option value=\"\">Pick one</option><option value=\"a\">A</option>"));
    }

    #[test]
    fn bracket_path_chains_segments() {
        assert_eq!(bracket_path(&["a"]), "a");
        assert_eq!(bracket_path(&["a", "b", "c"]), "a[b][c]");
        assert_eq!(bracket_path::<&str>(&[]), "");
    }

    #[test]
    fn empty_schema_renders_nothing() {
        assert_eq!(render_form(&Schema::new(), &RenderOptions::default()), "");
    }
}
