mod error;
mod ops;
mod patch;
mod session;

pub use error::EditError;
pub use ops::{
    add_field, delete_field, generate_unique_field_name, get_nested_schema, move_field,
    rename_field, reorder_fields, update_field, update_nested_schema,
};
pub use patch::FieldPatch;
pub use session::EditSession;

pub(crate) use error::dotted;
