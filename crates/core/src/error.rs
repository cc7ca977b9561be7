//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// These never escape the session's convenience surface (every rejection there
/// is a no-op), but `Session::dispatch` returns them so callers and tests can
/// see why a command was refused.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A value failed validation (e.g. blank description, unparseable amount).
    #[error("validation failed: {0}")]
    Validation(String),

    /// A domain invariant would be violated (e.g. removing the last participant).
    #[error("invariant violated: {0}")]
    InvariantViolation(String),

    /// A capacity limit was reached (e.g. participant cap).
    #[error("limit reached: {0}")]
    LimitReached(String),

    /// A referenced participant, expense or index does not exist.
    #[error("not found: {0}")]
    NotFound(String),
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn invariant(msg: impl Into<String>) -> Self {
        Self::InvariantViolation(msg.into())
    }

    pub fn limit_reached(msg: impl Into<String>) -> Self {
        Self::LimitReached(msg.into())
    }

    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound(what.into())
    }
}
