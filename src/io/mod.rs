mod format;
mod input;
mod output;

pub use format::{DocumentFormat, ExtensionFormat};
pub use input::{load_schema_str, parse_document_any, parse_document_str};
pub use output::{OutputDestination, OutputOptions, emit_document, emit_text};
