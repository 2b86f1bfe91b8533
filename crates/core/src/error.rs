//! Error model for parsing and validation boundaries.

use thiserror::Error;

/// Result type used at parsing/validation boundaries.
pub type DomainResult<T> = Result<T, DomainError>;

/// Boundary-level error.
///
/// Authorization decisions never produce this type; it only surfaces where
/// loosely typed input (strings, JSON) is converted into typed values.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A value failed validation (e.g. an unknown enum name).
    #[error("validation failed: {0}")]
    Validation(String),

    /// An identifier was invalid (e.g. parse failure).
    #[error("invalid identifier: {0}")]
    InvalidId(String),
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }
}
