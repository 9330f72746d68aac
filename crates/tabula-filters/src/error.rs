//! Error types for filter parsing and validation

use std::fmt;

use tabula_core::TabulaError;
use thiserror::Error;

use crate::FilterOperator;

/// Why a single leaf was rejected
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvalidReason {
    UnknownColumn,
    /// Operator doesn't apply to the column's primitive type
    OperatorMismatch { primitive: String },
    MissingValue,
    UnexpectedValue,
    ExpectedList,
    /// `between` needs exactly two values
    ExpectedRange,
    /// A value doesn't fit the column's primitive type
    ValueMismatch { primitive: String },
}

/// A leaf that failed validation, addressed by its index path from the root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidFilterLeaf {
    pub path: Vec<usize>,
    pub column: String,
    pub operator: FilterOperator,
    pub reason: InvalidReason,
}

impl fmt::Display for InvalidFilterLeaf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let path = self
            .path
            .iter()
            .map(|i| i.to_string())
            .collect::<Vec<_>>()
            .join(".");
        write!(f, "[{}] {} {}: ", path, self.column, self.operator)?;
        match &self.reason {
            InvalidReason::UnknownColumn => write!(f, "unknown column"),
            InvalidReason::OperatorMismatch { primitive } => {
                write!(f, "operator does not apply to {primitive} columns")
            }
            InvalidReason::MissingValue => write!(f, "a value is required"),
            InvalidReason::UnexpectedValue => write!(f, "takes no value"),
            InvalidReason::ExpectedList => write!(f, "expects a list of values"),
            InvalidReason::ExpectedRange => write!(f, "expects exactly two values"),
            InvalidReason::ValueMismatch { primitive } => {
                write!(f, "value does not fit a {primitive} column")
            }
        }
    }
}

/// Filter errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FilterError {
    /// Input couldn't be parsed. Callers start from an empty filter set.
    #[error("Malformed filter: {0}")]
    Malformed(String),

    /// One or more leaves failed validation. Blocks apply.
    #[error("Invalid filter: {}", summarize(.0))]
    Invalid(Vec<InvalidFilterLeaf>),

    #[error("Failed to encode filter: {0}")]
    Encode(String),
}

fn summarize(leaves: &[InvalidFilterLeaf]) -> String {
    leaves
        .iter()
        .map(|leaf| leaf.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

impl FilterError {
    /// Offending leaves, empty unless this is a validation error
    pub fn invalid_leaves(&self) -> &[InvalidFilterLeaf] {
        match self {
            FilterError::Invalid(leaves) => leaves,
            _ => &[],
        }
    }
}

impl From<FilterError> for TabulaError {
    fn from(err: FilterError) -> Self {
        match err {
            FilterError::Malformed(msg) => TabulaError::MalformedFilter(msg),
            FilterError::Invalid(leaves) => TabulaError::InvalidFilter(summarize(&leaves)),
            FilterError::Encode(msg) => TabulaError::Other(msg),
        }
    }
}

/// Result type alias for filter operations
pub type Result<T> = std::result::Result<T, FilterError>;
