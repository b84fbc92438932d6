//! Engine error taxonomy
//!
//! Per-probe failures are data (`TestResult`, `ConnectionStatus`) and never
//! appear here. The error types below cover the only two fatal classes:
//! startup configuration problems and listener failures during dispatch.

use thiserror::Error;

use livecheck_domain::DomainError;

/// Fatal startup errors: the run never starts.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The test set contains no enabled tests.
    #[error("no enabled tests configured")]
    NoTestsConfigured,

    /// A listener declared an empty event name.
    #[error("listener '{listener}' declared an empty event name")]
    EmptyEventName {
        /// The listener that declared it.
        listener: String,
    },

    /// A listener declared an event name outside the wire contract.
    #[error("listener '{listener}' declared unknown event '{event}'")]
    UnknownEvent {
        /// The listener that declared it.
        listener: String,
        /// The unrecognized name.
        event: String,
    },

    /// Registration was attempted after the run started.
    #[error("handler registration is closed once the run has started")]
    RegistrationClosed,

    /// A test specification failed validation.
    #[error(transparent)]
    Domain(#[from] DomainError),
}

/// A failure raised by a single listener handler.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{0}")]
pub struct HandlerError(String);

impl HandlerError {
    /// Creates a handler error from a message.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// A handler failure attributed to the listener that raised it.
#[derive(Debug, Clone, Error)]
#[error("listener '{listener}' failed: {error}")]
pub struct HandlerFailure {
    /// The listener whose handler failed.
    pub listener: String,
    /// The underlying failure.
    #[source]
    pub error: HandlerError,
}

/// Aggregate of every handler failure from one publish call.
///
/// The dispatcher runs all handlers for an event before raising this, so a
/// single failing listener never starves the others of the event.
#[derive(Debug, Error)]
#[error("{} handler(s) failed for event '{event}'", .failures.len())]
pub struct DispatchError {
    /// The event whose dispatch failed.
    pub event: String,
    /// Every failure collected during the publish, in handler order.
    pub failures: Vec<HandlerFailure>,
}

/// Errors a run can terminate with.
#[derive(Debug, Error)]
pub enum RunError {
    /// The run could not start.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A listener failed during event dispatch.
    #[error(transparent)]
    Dispatch(#[from] DispatchError),
}
