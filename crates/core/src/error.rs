//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Keep this focused on deterministic, business/domain failures. The engines
/// have no I/O, so every variant here is a caller mistake or a bad input, never
/// a transient condition.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A value failed validation (e.g. duplicate record code).
    #[error("validation failed: {0}")]
    Validation(String),

    /// An identifier was invalid (e.g. parse failure on a record code).
    #[error("invalid identifier: {0}")]
    InvalidId(String),

    /// A line-item index did not address an existing row.
    #[error("line item index {index} out of range (order has {len} items)")]
    LineIndexOutOfRange { index: usize, len: usize },
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    pub fn line_index_out_of_range(index: usize, len: usize) -> Self {
        Self::LineIndexOutOfRange { index, len }
    }
}
