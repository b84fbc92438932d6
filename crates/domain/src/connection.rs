//! Connection failure types
//!
//! A failed probe attempt is data, not an error: the client adapter maps
//! every transport-level problem into a [`ConnectionStatus`] so the run
//! can continue past it.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::response::Response;

/// Classification of a failed attempt to reach the target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionStatusKind {
    /// Network, DNS, or protocol failure.
    Error,
    /// The configured per-test timeout elapsed.
    Timeout,
}

impl fmt::Display for ConnectionStatusKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Error => write!(f, "error"),
            Self::Timeout => write!(f, "timeout"),
        }
    }
}

/// A probe attempt that never produced a response.
///
/// Mutually exclusive with [`Response`] for a given attempt; the pair is
/// expressed as [`ProbeOutcome`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionStatus {
    /// Failure classification.
    pub kind: ConnectionStatusKind,
    /// The URL the probe was aimed at.
    pub url: String,
    /// Optional transport diagnostic.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ConnectionStatus {
    /// Creates an `Error`-kind status.
    #[must_use]
    pub fn error(url: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: ConnectionStatusKind::Error,
            url: url.into(),
            message: Some(message.into()),
        }
    }

    /// Creates a `Timeout`-kind status.
    #[must_use]
    pub fn timeout(url: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: ConnectionStatusKind::Timeout,
            url: url.into(),
            message: Some(message.into()),
        }
    }
}

impl fmt::Display for ConnectionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} probing {}", self.kind, self.url)?;
        if let Some(message) = &self.message {
            write!(f, ": {message}")?;
        }
        Ok(())
    }
}

/// The two mutually exclusive outcomes of one probe attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum ProbeOutcome {
    /// The target replied; the response is ready for evaluation.
    Response(Response),
    /// The target could not be reached.
    ConnectionFailed(ConnectionStatus),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_kind_and_url() {
        let status = ConnectionStatus::error("https://example.org/", "connection refused");
        assert_eq!(
            status.to_string(),
            "error probing https://example.org/: connection refused"
        );
    }

    #[test]
    fn timeout_constructor_sets_kind() {
        let status = ConnectionStatus::timeout("https://example.org/", "deadline elapsed");
        assert_eq!(status.kind, ConnectionStatusKind::Timeout);
    }
}
