use tabula_admin::AccessError;
use tabula_core::TabulaError;
use tabula_fields::FieldValidationError;
use tabula_filters::FilterError;
use thiserror::Error;

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Service-level errors with user-friendly messages
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Collaborator request failed: {0}")]
    Collaborator(String),

    /// The collaborator refused a write
    #[error("Rejected by data source: {0}")]
    Rejected(String),

    #[error(transparent)]
    Access(#[from] AccessError),

    #[error(transparent)]
    Filter(#[from] FilterError),

    #[error("Invalid column option: {0}")]
    InvalidOption(#[from] FieldValidationError),

    #[error("{0} is not supported here")]
    Unsupported(&'static str),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Option persister has shut down")]
    PersisterClosed,
}

impl From<ServiceError> for TabulaError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Access(access) => access.into(),
            ServiceError::Filter(filter) => filter.into(),
            ServiceError::NotFound(what) => TabulaError::NotFound(what),
            other => TabulaError::Collaborator(other.to_string()),
        }
    }
}
