//! Copy-on-write edits on a [`Schema`] tree.
//!
//! Every function takes the current tree by reference and returns a new
//! one. Only the containers on the edited path are rebuilt; everything off
//! the path is carried over unchanged.

use crate::domain::{Field, FieldKind, Schema, capitalize};

use super::error::{EditError, dotted};
use super::patch::FieldPatch;

/// Schema at `path`, or an empty schema when any segment is missing or is
/// not a container.
pub fn get_nested_schema<P: AsRef<str>>(schema: &Schema, path: &[P]) -> Schema {
    schema.nested(path).cloned().unwrap_or_default()
}

/// Replace the schema at `path` with `new_schema`, creating container fields
/// for missing segments. A segment naming a field that is not a container is
/// an error; its type is never changed behind the caller's back.
pub fn update_nested_schema<P: AsRef<str>>(
    schema: &Schema,
    path: &[P],
    new_schema: Schema,
) -> Result<Schema, EditError> {
    rebuild_along(schema, path, 0, new_schema)
}

fn rebuild_along<P: AsRef<str>>(
    schema: &Schema,
    path: &[P],
    depth: usize,
    new_schema: Schema,
) -> Result<Schema, EditError> {
    let Some(key) = path.get(depth) else {
        return Ok(new_schema);
    };
    let key = key.as_ref();

    let container = match schema.get(key) {
        Some(existing) => {
            let Some(FieldKind::Container(child)) = &existing.kind else {
                return Err(EditError::NotAContainer {
                    path: dotted(&path[..=depth]),
                });
            };
            let empty = Schema::new();
            let child = child.as_ref().unwrap_or(&empty);
            Field {
                kind: Some(FieldKind::Container(Some(rebuild_along(
                    child, path, depth + 1, new_schema,
                )?))),
                ..existing.clone()
            }
        }
        None => Field::container(rebuild_along(&Schema::new(), path, depth + 1, new_schema)?)
            .with_position(schema.next_position()),
    };

    let mut rebuilt = schema.clone();
    rebuilt.insert(key, container);
    Ok(rebuilt)
}

/// `field{N}` for the smallest positive `N` not already used at this level.
pub fn generate_unique_field_name(parent: &Schema) -> String {
    (1usize..)
        .map(|counter| format!("field{counter}"))
        .find(|name| !parent.contains_key(name))
        .unwrap_or_default()
}

/// Append a fresh `text` field under `parent_path`. Returns the new tree and
/// the generated key.
pub fn add_field<P: AsRef<str>>(
    schema: &Schema,
    parent_path: &[P],
) -> Result<(Schema, String), EditError> {
    let mut parent = get_nested_schema(schema, parent_path);
    let name = generate_unique_field_name(&parent);
    let field = Field::text()
        .with_label(capitalize(&name))
        .with_position(parent.next_position());
    parent.insert(name.clone(), field);
    Ok((update_nested_schema(schema, parent_path, parent)?, name))
}

/// Merge `patch` onto the field at `path`. A patch that sets `type` to
/// `schema` seeds an empty nested schema when none is present.
pub fn update_field<P: AsRef<str>>(
    schema: &Schema,
    path: &[P],
    patch: &FieldPatch,
) -> Result<Schema, EditError> {
    let (key, parent_path) = split_field_path(path)?;
    let mut parent = get_nested_schema(schema, parent_path);
    let updated = patch
        .apply(parent.get(key))
        .map_err(|err| EditError::InvalidField(err.under_path(path)))?;
    parent.insert(key, updated);
    update_nested_schema(schema, parent_path, parent)
}

/// Remove the field at `path` together with anything nested in it.
pub fn delete_field<P: AsRef<str>>(schema: &Schema, path: &[P]) -> Schema {
    let Ok((key, parent_path)) = split_field_path(path) else {
        return schema.clone();
    };
    let mut parent = get_nested_schema(schema, parent_path);
    if parent.remove(key).is_none() {
        return schema.clone();
    }
    // The key was found, so every parent segment is a container.
    update_nested_schema(schema, parent_path, parent).unwrap_or_else(|_| schema.clone())
}

/// Move the field at `old_path` to `new_name` on the same level, keeping
/// its value, position and insertion slot.
pub fn rename_field<P: AsRef<str>>(
    schema: &Schema,
    old_path: &[P],
    new_name: &str,
) -> Result<Schema, EditError> {
    let (old_key, parent_path) = split_field_path(old_path)?;
    let new_name = new_name.trim();
    if new_name.is_empty() || new_name.contains(['[', ']']) {
        return Err(EditError::InvalidName {
            name: new_name.to_string(),
        });
    }

    let mut parent = get_nested_schema(schema, parent_path);
    let field = parent
        .get(old_key)
        .cloned()
        .ok_or_else(|| EditError::FieldNotFound {
            path: dotted(old_path),
        })?;
    if new_name == old_key {
        return Ok(schema.clone());
    }
    if parent.contains_key(new_name) {
        return Err(EditError::NameConflict {
            name: new_name.to_string(),
        });
    }

    parent.replace_key(old_key, new_name, field);
    update_nested_schema(schema, parent_path, parent)
}

/// Move the sibling at `old_index` (in position order) to `new_index` and
/// renumber every sibling to a dense `0..n` sequence.
pub fn reorder_fields<P: AsRef<str>>(
    schema: &Schema,
    parent_path: &[P],
    old_index: usize,
    new_index: usize,
) -> Result<Schema, EditError> {
    let parent = get_nested_schema(schema, parent_path);
    let len = parent.len();
    for index in [old_index, new_index] {
        if index >= len {
            return Err(EditError::IndexOutOfRange { index, len });
        }
    }

    let mut entries: Vec<(String, Field)> = parent
        .sorted()
        .into_iter()
        .map(|(key, field)| (key.clone(), field.clone()))
        .collect();
    let moved = entries.remove(old_index);
    entries.insert(new_index, moved);

    let reordered = entries
        .into_iter()
        .enumerate()
        .map(|(index, (key, field))| (key, field.with_position(index as i64)))
        .collect();
    update_nested_schema(schema, parent_path, reordered)
}

/// Drag-and-drop helper: move `active` to where `over` currently sits.
/// Unknown keys leave the tree as it is.
pub fn move_field<P: AsRef<str>>(
    schema: &Schema,
    parent_path: &[P],
    active: &str,
    over: &str,
) -> Result<Schema, EditError> {
    if active == over {
        return Ok(schema.clone());
    }
    let parent = get_nested_schema(schema, parent_path);
    let order = parent.sorted();
    let index_of = |key: &str| order.iter().position(|(candidate, _)| *candidate == key);
    match (index_of(active), index_of(over)) {
        (Some(old_index), Some(new_index)) => {
            reorder_fields(schema, parent_path, old_index, new_index)
        }
        _ => Ok(schema.clone()),
    }
}

fn split_field_path<P: AsRef<str>>(path: &[P]) -> Result<(&str, &[P]), EditError> {
    path.split_last()
        .map(|(key, parent)| (key.as_ref(), parent))
        .ok_or(EditError::EmptyPath)
}
