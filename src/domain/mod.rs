mod error;
mod field;
mod record;
mod schema;

pub use error::{FieldParseError, ParseIssue};
pub use field::{Field, FieldKind, RESERVED_KEYS, SelectField, SelectOption, capitalize};
pub use record::{
    Form, FormId, PublicForm, PublicId, Response, ResponseData, ResponseId, Submission, UserId,
};
pub use schema::Schema;
