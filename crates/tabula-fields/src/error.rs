//! Error types for the field type registry

use tabula_core::TabulaError;
use thiserror::Error;

/// Registry errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FieldTypeError {
    /// No descriptor registered under this id. Callers degrade to `text`.
    #[error("Unknown field type: {0}")]
    UnknownFieldType(String),

    /// A descriptor with this id is already registered. Fatal at startup.
    #[error("Duplicate field type: {0}")]
    DuplicateFieldType(String),

    #[error("Field type registry is already initialized")]
    AlreadyInitialized,
}

impl From<FieldTypeError> for TabulaError {
    fn from(err: FieldTypeError) -> Self {
        match err {
            FieldTypeError::UnknownFieldType(id) => TabulaError::UnknownFieldType(id),
            FieldTypeError::DuplicateFieldType(id) => TabulaError::DuplicateFieldType(id),
            FieldTypeError::AlreadyInitialized => TabulaError::Configuration(err.to_string()),
        }
    }
}

/// A value rejected by a field type's validator
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct FieldValidationError {
    pub message: String,
}

impl FieldValidationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Outcome of validating a value
pub type ValidationResult = Result<(), FieldValidationError>;
