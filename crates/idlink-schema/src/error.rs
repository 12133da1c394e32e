//! Schema validator error types

use thiserror::Error;

/// Errors that can occur during payload validation
#[derive(Debug, Error)]
pub enum SchemaError {
    /// No schema registered under the given name
    #[error("Unknown schema: {0}")]
    UnknownSchema(String),

    /// The payload violated the schema's structural constraints
    #[error(transparent)]
    Validation(#[from] SchemaValidationError),
}

/// A structural validation failure carrying every violated constraint
#[derive(Debug, Error)]
#[error("Payload does not match schema `{schema}`: {}", .violations.join("; "))]
pub struct SchemaValidationError {
    /// Name of the schema the payload was checked against
    pub schema: String,

    /// All violated constraints, in field order
    pub violations: Vec<String>,
}
