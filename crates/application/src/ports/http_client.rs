//! HTTP client port

use std::future::Future;

use livecheck_domain::{ProbeOutcome, TestSpec};

/// Port for issuing one HTTP probe.
///
/// Implementations apply the test's configured timeout and never retry;
/// retry policy belongs to the scheduler. Transport-level problems —
/// connection failure, DNS failure, timeout — come back as the
/// [`ProbeOutcome::ConnectionFailed`] variant, never as an error the caller
/// has to unwind: a failed probe is data the run continues past.
pub trait HttpClient: Send + Sync {
    /// Executes the probe described by `test`.
    fn execute(&self, test: &TestSpec) -> impl Future<Output = ProbeOutcome> + Send;
}
