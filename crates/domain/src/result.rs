//! Evaluated test results
//!
//! A [`TestResult`] classifies one probe-and-evaluate round. The
//! constructors are the only way to build one, which keeps the status
//! invariant intact: `Error` iff no response was obtainable or evaluation
//! itself faulted, `Failed` iff a response missed at least one
//! expectation, `Success` iff every expectation passed.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::expectation::ExpectationFailure;
use crate::response::Response;
use crate::test::TestSpec;

/// Closed set of result classifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResultStatus {
    /// Every expectation passed.
    Success,
    /// The response was obtained but missed at least one expectation.
    Failed,
    /// No response was obtainable, or evaluation itself faulted.
    Error,
}

/// Outcome of evaluating one response against one test.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestResult {
    /// Result classification.
    status: ResultStatus,
    /// The test this result belongs to.
    test: TestSpec,
    /// The evaluated response; absent only on `Error`.
    response: Option<Response>,
    /// The expectations the response missed; non-empty only on `Failed`.
    failures: Vec<ExpectationFailure>,
    /// Evaluation fault description; present only on `Error`.
    fault: Option<String>,
    /// When the result was produced.
    timestamp: DateTime<Utc>,
}

impl TestResult {
    /// A result for a response that met every expectation.
    #[must_use]
    pub fn success(test: TestSpec, response: Response, at: DateTime<Utc>) -> Self {
        Self {
            status: ResultStatus::Success,
            test,
            response: Some(response),
            failures: Vec::new(),
            fault: None,
            timestamp: at,
        }
    }

    /// A result for a response that missed one or more expectations.
    ///
    /// # Panics
    ///
    /// Debug-asserts that `failures` is non-empty; an empty mismatch list
    /// would violate the status invariant.
    #[must_use]
    pub fn failed(
        test: TestSpec,
        response: Response,
        failures: Vec<ExpectationFailure>,
        at: DateTime<Utc>,
    ) -> Self {
        debug_assert!(!failures.is_empty(), "a failed result retains mismatches");
        Self {
            status: ResultStatus::Failed,
            test,
            response: Some(response),
            failures,
            fault: None,
            timestamp: at,
        }
    }

    /// A result for an attempt where evaluation could not complete.
    #[must_use]
    pub fn error(
        test: TestSpec,
        response: Option<Response>,
        fault: impl Into<String>,
        at: DateTime<Utc>,
    ) -> Self {
        Self {
            status: ResultStatus::Error,
            test,
            response,
            failures: Vec::new(),
            fault: Some(fault.into()),
            timestamp: at,
        }
    }

    /// The result classification.
    #[must_use]
    pub const fn status(&self) -> ResultStatus {
        self.status
    }

    /// The test this result belongs to.
    #[must_use]
    pub const fn test(&self) -> &TestSpec {
        &self.test
    }

    /// The evaluated response, when one was obtained.
    #[must_use]
    pub const fn response(&self) -> Option<&Response> {
        self.response.as_ref()
    }

    /// The retained mismatches; empty unless the status is `Failed`.
    #[must_use]
    pub fn failures(&self) -> &[ExpectationFailure] {
        &self.failures
    }

    /// The evaluation fault, when the status is `Error`.
    #[must_use]
    pub fn fault(&self) -> Option<&str> {
        self.fault.as_deref()
    }

    /// When the result was produced.
    #[must_use]
    pub const fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}
