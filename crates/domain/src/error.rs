//! Domain error types

use thiserror::Error;

/// Domain-level errors raised while validating test specifications.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// The probe URL is invalid or malformed.
    #[error("invalid URL '{url}': {reason}")]
    InvalidUrl {
        /// The offending URL.
        url: String,
        /// Parser diagnostic.
        reason: String,
    },

    /// The HTTP method is not supported.
    #[error("unsupported HTTP method: {0}")]
    UnsupportedMethod(String),

    /// The configured timeout is unusable.
    #[error("invalid timeout for test '{0}': timeout must be greater than zero")]
    InvalidTimeout(String),

    /// An expectation is structurally invalid (e.g. empty header name).
    #[error("invalid expectation: {0}")]
    InvalidExpectation(String),
}

/// Result type alias for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
