//! Schema system - descriptor tree construction and validation

pub mod document;
pub mod node;
pub mod validator;

pub use document::{current_year, document_schema, CHEMKED_VERSION};
pub use node::{fields, merge, Fields, SchemaNode};
pub use validator::{DocumentValidator, SchemaCompileError, ValidationError};
