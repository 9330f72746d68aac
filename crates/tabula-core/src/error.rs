//! Error types for Tabula

use thiserror::Error;

/// Core error type for Tabula operations
///
/// Pure-model failures (field types, filters) are recoverable with a local
/// fallback. Only `DuplicateFieldType` is fatal, and only at startup.
#[derive(Error, Debug)]
pub enum TabulaError {
    #[error("Unknown field type: {0}")]
    UnknownFieldType(String),

    #[error("Duplicate field type: {0}")]
    DuplicateFieldType(String),

    #[error("Malformed filter: {0}")]
    MalformedFilter(String),

    #[error("Invalid filter: {0}")]
    InvalidFilter(String),

    #[error("Not permitted: {action} on {resource}")]
    PermissionDenied { resource: String, action: String },

    #[error("Unknown UI context: {0}")]
    UnknownContext(String),

    #[error("Collaborator error: {0}")]
    Collaborator(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("{0}")]
    Other(String),
}

impl TabulaError {
    /// Whether the error must abort startup rather than degrade to a fallback
    pub fn is_fatal(&self) -> bool {
        matches!(self, TabulaError::DuplicateFieldType(_))
    }
}

/// Result type alias for Tabula operations
pub type Result<T> = std::result::Result<T, TabulaError>;
