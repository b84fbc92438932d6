//! Response expectations.
//!
//! Expectations are the declarative half of the evaluation pipeline: each
//! one names a property a captured response has to satisfy. Checking them
//! is the evaluator's job; this module only defines the closed vocabulary
//! and its validation rules.

use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};

/// A single declared expectation against a response.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Expectation {
    /// The response status code matches.
    StatusCode {
        /// Expected status code, range, or set.
        expected: StatusExpectation,
    },
    /// The response body contains the given text.
    BodyContains {
        /// Text to search for.
        text: String,
        /// Case-insensitive search.
        #[serde(default)]
        ignore_case: bool,
    },
    /// The response body matches a regex pattern.
    BodyMatches {
        /// Regex pattern.
        pattern: String,
    },
    /// A header is present, optionally with an exact value.
    HeaderExists {
        /// Header name (case-insensitive).
        name: String,
        /// Optional expected value.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        value: Option<String>,
    },
    /// A header value matches a regex pattern.
    HeaderMatches {
        /// Header name (case-insensitive).
        name: String,
        /// Regex pattern to match.
        pattern: String,
    },
    /// The response arrived within a time budget.
    ResponseTime {
        /// Maximum allowed latency in milliseconds.
        max_ms: u64,
    },
    /// The Content-Type header contains the given value.
    ContentType {
        /// Expected content type (partial match).
        expected: String,
    },
    /// The response body parses as JSON.
    IsJson,
}

impl Expectation {
    /// A human-readable description of this expectation.
    #[must_use]
    pub fn description(&self) -> String {
        match self {
            Self::StatusCode { expected } => format!("status code {}", expected.description()),
            Self::BodyContains { text, .. } => format!("body contains '{text}'"),
            Self::BodyMatches { pattern } => format!("body matches /{pattern}/"),
            Self::HeaderExists {
                name,
                value: Some(v),
            } => format!("header '{name}' equals '{v}'"),
            Self::HeaderExists { name, value: None } => format!("header '{name}' exists"),
            Self::HeaderMatches { name, pattern } => {
                format!("header '{name}' matches /{pattern}/")
            }
            Self::ResponseTime { max_ms } => format!("response time <= {max_ms}ms"),
            Self::ContentType { expected } => format!("content type contains '{expected}'"),
            Self::IsJson => "body is valid JSON".to_string(),
        }
    }

    /// Validates the expectation's structure.
    ///
    /// Pattern compilation is deliberately left to the evaluator: a pattern
    /// that fails to compile at evaluation time classifies the result as an
    /// evaluation fault, not a configuration error.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidExpectation`] for empty header names or
    /// empty search text.
    pub fn validate(&self) -> DomainResult<()> {
        match self {
            Self::BodyContains { text, .. } if text.is_empty() => Err(
                DomainError::InvalidExpectation("body_contains text is empty".to_string()),
            ),
            Self::HeaderExists { name, .. } | Self::HeaderMatches { name, .. }
                if name.trim().is_empty() =>
            {
                Err(DomainError::InvalidExpectation(
                    "header name is empty".to_string(),
                ))
            }
            _ => Ok(()),
        }
    }
}

/// Expected status code value, range, or set.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum StatusExpectation {
    /// Exact status code.
    Exact(u16),
    /// Inclusive range of status codes.
    Range {
        /// Minimum status code (inclusive).
        min: u16,
        /// Maximum status code (inclusive).
        max: u16,
    },
    /// One of multiple status codes.
    OneOf(Vec<u16>),
}

impl StatusExpectation {
    /// Checks whether a status code satisfies this expectation.
    #[must_use]
    pub fn matches(&self, status: u16) -> bool {
        match self {
            Self::Exact(expected) => status == *expected,
            Self::Range { min, max } => status >= *min && status <= *max,
            Self::OneOf(codes) => codes.contains(&status),
        }
    }

    /// A description of the expected value.
    #[must_use]
    pub fn description(&self) -> String {
        match self {
            Self::Exact(code) => format!("= {code}"),
            Self::Range { min, max } => format!("in {min}-{max}"),
            Self::OneOf(codes) => {
                let codes: Vec<_> = codes.iter().map(ToString::to_string).collect();
                format!("in [{}]", codes.join(", "))
            }
        }
    }

    /// The "success" expectation (200-299).
    #[must_use]
    pub const fn success() -> Self {
        Self::Range { min: 200, max: 299 }
    }

    /// An exact status expectation.
    #[must_use]
    pub const fn exact(code: u16) -> Self {
        Self::Exact(code)
    }
}

impl Default for StatusExpectation {
    fn default() -> Self {
        Self::success()
    }
}

/// One expectation that a response did not meet, retained for reporting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpectationFailure {
    /// The expectation that was checked.
    pub expectation: Expectation,
    /// The value actually observed, when one could be captured.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actual: Option<String>,
    /// Human-readable mismatch description.
    pub message: String,
}

impl ExpectationFailure {
    /// Creates a failure without an observed value.
    #[must_use]
    pub fn new(expectation: Expectation, message: impl Into<String>) -> Self {
        Self {
            expectation,
            actual: None,
            message: message.into(),
        }
    }

    /// Creates a failure carrying the observed value.
    #[must_use]
    pub fn with_actual(
        expectation: Expectation,
        actual: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            expectation,
            actual: Some(actual.into()),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_expectation_exact() {
        let exp = StatusExpectation::exact(200);
        assert!(exp.matches(200));
        assert!(!exp.matches(201));
    }

    #[test]
    fn status_expectation_success_range() {
        let exp = StatusExpectation::success();
        assert!(exp.matches(200));
        assert!(exp.matches(299));
        assert!(!exp.matches(300));
        assert!(!exp.matches(199));
    }

    #[test]
    fn status_expectation_one_of() {
        let exp = StatusExpectation::OneOf(vec![200, 204]);
        assert!(exp.matches(204));
        assert!(!exp.matches(201));
    }

    #[test]
    fn description_names_the_property() {
        let exp = Expectation::StatusCode {
            expected: StatusExpectation::exact(200),
        };
        assert_eq!(exp.description(), "status code = 200");

        let exp = Expectation::BodyContains {
            text: "ok".to_string(),
            ignore_case: false,
        };
        assert_eq!(exp.description(), "body contains 'ok'");
    }

    #[test]
    fn validate_rejects_empty_header_name() {
        let exp = Expectation::HeaderExists {
            name: "  ".to_string(),
            value: None,
        };
        assert!(exp.validate().is_err());
    }

    #[test]
    fn validate_rejects_empty_body_text() {
        let exp = Expectation::BodyContains {
            text: String::new(),
            ignore_case: false,
        };
        assert!(exp.validate().is_err());
    }

    #[test]
    fn serde_uses_type_tag() {
        let exp = Expectation::StatusCode {
            expected: StatusExpectation::exact(404),
        };
        let yaml = serde_json::to_value(&exp).ok();
        assert!(yaml.is_some_and(|v| v["type"] == "status_code"));
    }
}
