//! Error types for access control

use tabula_core::TabulaError;
use thiserror::Error;

use crate::{Action, Resource, Role};

/// Access control errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AccessError {
    /// A write path rejected an action. Surfaced to the user as "not permitted".
    #[error("Not permitted: {role} may not {action} {resource}")]
    PermissionDenied {
        role: Role,
        resource: Resource,
        action: Action,
    },

    #[error("Invalid permission table: {0}")]
    InvalidTable(String),
}

impl From<AccessError> for TabulaError {
    fn from(err: AccessError) -> Self {
        match err {
            AccessError::PermissionDenied {
                resource, action, ..
            } => TabulaError::PermissionDenied {
                resource: resource.to_string(),
                action: action.to_string(),
            },
            AccessError::InvalidTable(msg) => TabulaError::Configuration(msg),
        }
    }
}

/// Result type alias for access control
pub type Result<T> = std::result::Result<T, AccessError>;
