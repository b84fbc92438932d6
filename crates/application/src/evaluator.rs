//! Response evaluation
//!
//! The evaluator scores a captured response against a test's declared
//! expectations. Every expectation is checked — there is no stop-on-first-
//! failure — so reports carry the complete mismatch list. A check that
//! cannot complete (malformed pattern, internal fault) classifies the whole
//! result as an evaluation fault instead of propagating.

use chrono::{DateTime, Utc};
use regex::Regex;
use thiserror::Error;

use livecheck_domain::{
    Expectation, ExpectationFailure, Response, StatusExpectation, TestResult, TestSpec,
};

/// A check that could not be completed.
#[derive(Debug, Error)]
enum EvaluationFault {
    #[error("invalid pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: Box<regex::Error>,
    },
}

/// Evaluates responses against declared expectations.
#[derive(Debug, Default, Clone, Copy)]
pub struct Evaluator;

impl Evaluator {
    /// Creates an evaluator.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Scores `response` against every expectation of `test`.
    ///
    /// All expectations passing yields `Success`; any mismatch yields
    /// `Failed` with the mismatches retained; a check that cannot complete
    /// yields `Error` with the response attached.
    #[must_use]
    pub fn evaluate(&self, test: &TestSpec, response: Response, at: DateTime<Utc>) -> TestResult {
        let mut failures = Vec::new();
        for expectation in &test.expectations {
            match Self::check(expectation, &response) {
                Ok(None) => {}
                Ok(Some(failure)) => failures.push(failure),
                Err(fault) => {
                    return TestResult::error(
                        test.clone(),
                        Some(response),
                        fault.to_string(),
                        at,
                    );
                }
            }
        }
        if failures.is_empty() {
            TestResult::success(test.clone(), response, at)
        } else {
            TestResult::failed(test.clone(), response, failures, at)
        }
    }

    /// Checks one expectation. `Ok(None)` means it passed.
    fn check(
        expectation: &Expectation,
        response: &Response,
    ) -> Result<Option<ExpectationFailure>, EvaluationFault> {
        match expectation {
            Expectation::StatusCode { expected } => {
                Ok(Self::check_status(expectation, response, expected))
            }
            Expectation::BodyContains { text, ignore_case } => {
                Ok(Self::check_body_contains(
                    expectation,
                    response,
                    text,
                    *ignore_case,
                ))
            }
            Expectation::BodyMatches { pattern } => {
                let regex = compile(pattern)?;
                Ok(Self::check_body_matches(expectation, response, &regex))
            }
            Expectation::HeaderExists { name, value } => Ok(Self::check_header_exists(
                expectation,
                response,
                name,
                value.as_deref(),
            )),
            Expectation::HeaderMatches { name, pattern } => {
                let regex = compile(pattern)?;
                Ok(Self::check_header_matches(
                    expectation,
                    response,
                    name,
                    &regex,
                ))
            }
            Expectation::ResponseTime { max_ms } => {
                Ok(Self::check_response_time(expectation, response, *max_ms))
            }
            Expectation::ContentType { expected } => {
                Ok(Self::check_content_type(expectation, response, expected))
            }
            Expectation::IsJson => Ok(Self::check_is_json(expectation, response)),
        }
    }

    fn check_status(
        expectation: &Expectation,
        response: &Response,
        expected: &StatusExpectation,
    ) -> Option<ExpectationFailure> {
        if expected.matches(response.status) {
            return None;
        }
        Some(ExpectationFailure::with_actual(
            expectation.clone(),
            response.status.to_string(),
            format!(
                "expected status {}, got {}",
                expected.description(),
                response.status
            ),
        ))
    }

    fn check_body_contains(
        expectation: &Expectation,
        response: &Response,
        text: &str,
        ignore_case: bool,
    ) -> Option<ExpectationFailure> {
        let found = if ignore_case {
            response
                .body
                .to_lowercase()
                .contains(&text.to_lowercase())
        } else {
            response.body.contains(text)
        };
        if found {
            return None;
        }
        Some(ExpectationFailure::with_actual(
            expectation.clone(),
            body_preview(&response.body),
            format!("body does not contain '{text}'"),
        ))
    }

    fn check_body_matches(
        expectation: &Expectation,
        response: &Response,
        regex: &Regex,
    ) -> Option<ExpectationFailure> {
        if regex.is_match(&response.body) {
            return None;
        }
        Some(ExpectationFailure::with_actual(
            expectation.clone(),
            body_preview(&response.body),
            format!("body does not match /{}/", regex.as_str()),
        ))
    }

    fn check_header_exists(
        expectation: &Expectation,
        response: &Response,
        name: &str,
        expected: Option<&str>,
    ) -> Option<ExpectationFailure> {
        match (response.headers.get(name), expected) {
            (Some(actual), Some(expected)) if actual != expected => {
                Some(ExpectationFailure::with_actual(
                    expectation.clone(),
                    actual.to_string(),
                    format!("header '{name}' is '{actual}', expected '{expected}'"),
                ))
            }
            (Some(_), _) => None,
            (None, _) => Some(ExpectationFailure::new(
                expectation.clone(),
                format!("header '{name}' not found"),
            )),
        }
    }

    fn check_header_matches(
        expectation: &Expectation,
        response: &Response,
        name: &str,
        regex: &Regex,
    ) -> Option<ExpectationFailure> {
        let Some(actual) = response.headers.get(name) else {
            return Some(ExpectationFailure::new(
                expectation.clone(),
                format!("header '{name}' not found"),
            ));
        };
        if regex.is_match(actual) {
            return None;
        }
        Some(ExpectationFailure::with_actual(
            expectation.clone(),
            actual.to_string(),
            format!(
                "header '{name}' value '{actual}' does not match /{}/",
                regex.as_str()
            ),
        ))
    }

    fn check_response_time(
        expectation: &Expectation,
        response: &Response,
        max_ms: u64,
    ) -> Option<ExpectationFailure> {
        let actual_ms = u64::try_from(response.latency.as_millis()).unwrap_or(u64::MAX);
        if actual_ms <= max_ms {
            return None;
        }
        Some(ExpectationFailure::with_actual(
            expectation.clone(),
            format!("{actual_ms}ms"),
            format!("response took {actual_ms}ms, expected <= {max_ms}ms"),
        ))
    }

    fn check_content_type(
        expectation: &Expectation,
        response: &Response,
        expected: &str,
    ) -> Option<ExpectationFailure> {
        match response.content_type() {
            Some(actual) if actual.contains(expected) => None,
            Some(actual) => Some(ExpectationFailure::with_actual(
                expectation.clone(),
                actual.to_string(),
                format!("content type '{actual}' does not contain '{expected}'"),
            )),
            None => Some(ExpectationFailure::new(
                expectation.clone(),
                "no Content-Type header present",
            )),
        }
    }

    fn check_is_json(expectation: &Expectation, response: &Response) -> Option<ExpectationFailure> {
        match serde_json::from_str::<serde_json::Value>(&response.body) {
            Ok(_) => None,
            Err(e) => Some(ExpectationFailure::with_actual(
                expectation.clone(),
                body_preview(&response.body),
                format!("body is not valid JSON: {e}"),
            )),
        }
    }
}

fn compile(pattern: &str) -> Result<Regex, EvaluationFault> {
    Regex::new(pattern).map_err(|source| EvaluationFault::InvalidPattern {
        pattern: pattern.to_string(),
        source: Box::new(source),
    })
}

/// Truncates a body for mismatch reports.
fn body_preview(body: &str) -> String {
    const LIMIT: usize = 100;
    if body.len() <= LIMIT {
        return body.to_string();
    }
    let cut = (1..=LIMIT).rev().find(|i| body.is_char_boundary(*i));
    format!("{}...", &body[..cut.unwrap_or(0)])
}

#[cfg(test)]
mod tests {
    use super::*;
    use livecheck_domain::{Headers, ResultStatus};
    use std::time::Duration;

    fn response(status: u16, body: &str) -> Response {
        Response::new(status, "", Headers::new(), body, Duration::from_millis(50))
    }

    fn json_response(status: u16, body: &str) -> Response {
        let mut headers = Headers::new();
        headers.append("Content-Type", "application/json");
        Response::new(status, "", headers, body, Duration::from_millis(50))
    }

    fn spec_with(expectation: Expectation) -> TestSpec {
        TestSpec::new("t", "https://example.org/").with_expectation(expectation)
    }

    #[test]
    fn all_passing_yields_success() {
        let test = TestSpec::new("t", "https://example.org/")
            .with_expectation(Expectation::StatusCode {
                expected: StatusExpectation::success(),
            })
            .with_expectation(Expectation::BodyContains {
                text: "ok".to_string(),
                ignore_case: false,
            });
        let result = Evaluator::new().evaluate(&test, response(200, "ok"), Utc::now());
        assert_eq!(result.status(), ResultStatus::Success);
        assert!(result.failures().is_empty());
    }

    #[test]
    fn status_mismatch_yields_failed_with_mismatch_retained() {
        let test = spec_with(Expectation::StatusCode {
            expected: StatusExpectation::exact(200),
        });
        let result = Evaluator::new().evaluate(&test, response(500, ""), Utc::now());
        assert_eq!(result.status(), ResultStatus::Failed);
        assert_eq!(result.failures().len(), 1);
        assert_eq!(result.failures()[0].actual.as_deref(), Some("500"));
    }

    #[test]
    fn every_mismatch_is_retained() {
        let test = TestSpec::new("t", "https://example.org/")
            .with_expectation(Expectation::StatusCode {
                expected: StatusExpectation::exact(200),
            })
            .with_expectation(Expectation::BodyContains {
                text: "welcome".to_string(),
                ignore_case: false,
            });
        let result = Evaluator::new().evaluate(&test, response(404, "gone"), Utc::now());
        assert_eq!(result.failures().len(), 2);
    }

    #[test]
    fn malformed_pattern_yields_error_not_failed() {
        let test = spec_with(Expectation::BodyMatches {
            pattern: "[unclosed".to_string(),
        });
        let result = Evaluator::new().evaluate(&test, response(200, "anything"), Utc::now());
        assert_eq!(result.status(), ResultStatus::Error);
        assert!(result.response().is_some());
        assert!(result.fault().is_some_and(|f| f.contains("[unclosed")));
    }

    #[test]
    fn body_matches_pattern() {
        let test = spec_with(Expectation::BodyMatches {
            pattern: r"id: \d+".to_string(),
        });
        let result = Evaluator::new().evaluate(&test, response(200, "id: 42"), Utc::now());
        assert_eq!(result.status(), ResultStatus::Success);
    }

    #[test]
    fn body_contains_respects_case_flag() {
        let test = spec_with(Expectation::BodyContains {
            text: "WORLD".to_string(),
            ignore_case: true,
        });
        let result = Evaluator::new().evaluate(&test, response(200, "hello world"), Utc::now());
        assert_eq!(result.status(), ResultStatus::Success);
    }

    #[test]
    fn header_checks() {
        let mut headers = Headers::new();
        headers.append("X-Request-Id", "abc-123");
        let response = Response::new(200, "OK", headers, "", Duration::from_millis(5));

        let exists = spec_with(Expectation::HeaderExists {
            name: "x-request-id".to_string(),
            value: None,
        });
        assert_eq!(
            Evaluator::new()
                .evaluate(&exists, response.clone(), Utc::now())
                .status(),
            ResultStatus::Success
        );

        let wrong_value = spec_with(Expectation::HeaderExists {
            name: "X-Request-Id".to_string(),
            value: Some("other".to_string()),
        });
        assert_eq!(
            Evaluator::new()
                .evaluate(&wrong_value, response.clone(), Utc::now())
                .status(),
            ResultStatus::Failed
        );

        let matches = spec_with(Expectation::HeaderMatches {
            name: "X-Request-Id".to_string(),
            pattern: r"^abc-\d+$".to_string(),
        });
        assert_eq!(
            Evaluator::new()
                .evaluate(&matches, response, Utc::now())
                .status(),
            ResultStatus::Success
        );
    }

    #[test]
    fn response_time_budget() {
        let test = spec_with(Expectation::ResponseTime { max_ms: 10 });
        let result = Evaluator::new().evaluate(&test, response(200, ""), Utc::now());
        assert_eq!(result.status(), ResultStatus::Failed);
    }

    #[test]
    fn content_type_partial_match() {
        let test = spec_with(Expectation::ContentType {
            expected: "application/json".to_string(),
        });
        let result =
            Evaluator::new().evaluate(&test, json_response(200, "{}"), Utc::now());
        assert_eq!(result.status(), ResultStatus::Success);
    }

    #[test]
    fn is_json_check() {
        let test = spec_with(Expectation::IsJson);
        let ok = Evaluator::new().evaluate(&test, response(200, r#"{"a": 1}"#), Utc::now());
        assert_eq!(ok.status(), ResultStatus::Success);

        let bad = Evaluator::new().evaluate(&test, response(200, "not json"), Utc::now());
        assert_eq!(bad.status(), ResultStatus::Failed);
    }

    #[test]
    fn no_expectations_means_success() {
        let test = TestSpec::new("bare", "https://example.org/");
        let result = Evaluator::new().evaluate(&test, response(500, ""), Utc::now());
        assert_eq!(result.status(), ResultStatus::Success);
    }

    #[test]
    fn body_preview_truncates_long_bodies() {
        let long = "x".repeat(300);
        assert_eq!(body_preview(&long).len(), 103);
        assert_eq!(body_preview("short"), "short");
    }
}
