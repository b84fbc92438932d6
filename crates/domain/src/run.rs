//! Run lifecycle payloads

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Metadata describing a run at the moment it starts.
///
/// Published with the run-start event so listeners can size their output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunMetadata {
    /// Unique identifier for this run.
    pub run_id: Uuid,
    /// When the run started.
    pub started_at: DateTime<Utc>,
    /// Number of enabled tests participating.
    pub test_count: usize,
    /// Configured cycle limit, if any.
    pub max_cycles: Option<u64>,
}

impl RunMetadata {
    /// Creates metadata for a starting run.
    #[must_use]
    pub fn new(started_at: DateTime<Utc>, test_count: usize, max_cycles: Option<u64>) -> Self {
        Self {
            run_id: Uuid::now_v7(),
            started_at,
            test_count,
            max_cycles,
        }
    }
}

/// Final accounting for a run, published with the run-end event.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    /// The run this summary belongs to.
    pub run_id: Uuid,
    /// When the run finished.
    pub finished_at: Option<DateTime<Utc>>,
    /// Full passes over the test set that completed.
    pub cycles: u64,
    /// Results classified as success.
    pub success: u64,
    /// Results classified as failed.
    pub failed: u64,
    /// Results classified as error.
    pub error: u64,
    /// Probe attempts that never produced a response.
    pub connection_failures: u64,
    /// True when the run ended before its configured limits.
    pub stopped_early: bool,
}

impl RunSummary {
    /// Total probe attempts accounted for.
    #[must_use]
    pub const fn attempts(&self) -> u64 {
        self.success + self.failed + self.error + self.connection_failures
    }

    /// True when nothing failed, errored, or dropped the connection.
    #[must_use]
    pub const fn all_passed(&self) -> bool {
        self.failed == 0 && self.error == 0 && self.connection_failures == 0
    }
}
