//! Test plan loading.
//!
//! A plan file is the external configuration surface: it supplies the
//! ordered test list and the run's scheduling parameters. Validation
//! happens here, before the run starts — an invalid plan is fatal at
//! startup and the scheduler never sees it.
//!
//! ```yaml
//! run:
//!   interval_ms: 5000
//!   max_cycles: 10
//! tests:
//!   - name: homepage
//!     url: https://example.org/
//!     expect:
//!       - type: status_code
//!         expected: 200
//! ```

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;
use tokio::fs;

use livecheck_application::runner::RunConfig;
use livecheck_domain::{DomainError, Expectation, Header, HttpMethod, TestSpec};

/// Error type for plan loading.
#[derive(Debug, thiserror::Error)]
pub enum PlanError {
    /// IO error reading the plan file.
    #[error("cannot read plan: {0}")]
    Io(#[from] std::io::Error),

    /// The file is not a valid plan document.
    #[error("cannot parse plan: {0}")]
    Parse(#[from] serde_yaml::Error),

    /// The plan contains no tests.
    #[error("plan declares no tests")]
    Empty,

    /// A test specification failed validation.
    #[error("test '{name}': {source}")]
    InvalidTest {
        /// The offending test's name.
        name: String,
        /// The validation failure.
        #[source]
        source: DomainError,
    },
}

/// A loaded, validated plan.
#[derive(Debug, Clone)]
pub struct Plan {
    /// Scheduling parameters.
    pub run: RunConfig,
    /// The ordered test list.
    pub tests: Vec<TestSpec>,
}

#[derive(Debug, Deserialize, Default)]
struct PlanFile {
    #[serde(default)]
    run: RunSection,
    #[serde(default)]
    tests: Vec<TestEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct RunSection {
    interval_ms: u64,
    max_cycles: Option<u64>,
    max_duration_ms: Option<u64>,
}

impl Default for RunSection {
    fn default() -> Self {
        Self {
            interval_ms: 30_000,
            max_cycles: None,
            max_duration_ms: None,
        }
    }
}

#[derive(Debug, Deserialize)]
struct TestEntry {
    name: String,
    url: String,
    #[serde(default)]
    method: Option<String>,
    #[serde(default)]
    headers: Vec<Header>,
    #[serde(default)]
    body: Option<String>,
    #[serde(default)]
    timeout_ms: Option<u64>,
    #[serde(default)]
    interval_ms: Option<u64>,
    #[serde(default = "enabled_default")]
    enabled: bool,
    #[serde(default)]
    expect: Vec<Expectation>,
}

const fn enabled_default() -> bool {
    true
}

impl TestEntry {
    fn into_spec(self) -> Result<TestSpec, PlanError> {
        let mut spec = TestSpec::new(self.name, self.url);
        if let Some(method) = self.method {
            spec.method = method
                .parse::<HttpMethod>()
                .map_err(|source| PlanError::InvalidTest {
                    name: spec.name.clone(),
                    source,
                })?;
        }
        spec.headers = self.headers;
        spec.body = self.body;
        if let Some(timeout_ms) = self.timeout_ms {
            spec.timeout_ms = timeout_ms;
        }
        spec.interval_ms = self.interval_ms;
        spec.enabled = self.enabled;
        spec.expectations = self.expect;
        spec.validate().map_err(|source| PlanError::InvalidTest {
            name: spec.name.clone(),
            source,
        })?;
        Ok(spec)
    }
}

/// Loads and validates a plan file.
///
/// # Errors
///
/// Returns a [`PlanError`] when the file cannot be read or parsed, declares
/// no tests, or contains an invalid test.
pub async fn load_plan(path: impl AsRef<Path>) -> Result<Plan, PlanError> {
    let content = fs::read_to_string(path.as_ref()).await?;
    parse_plan(&content)
}

/// Parses plan YAML from a string.
///
/// # Errors
///
/// Same conditions as [`load_plan`], minus the IO.
pub fn parse_plan(content: &str) -> Result<Plan, PlanError> {
    let file: PlanFile = serde_yaml::from_str(content)?;
    if file.tests.is_empty() {
        return Err(PlanError::Empty);
    }
    let tests = file
        .tests
        .into_iter()
        .map(TestEntry::into_spec)
        .collect::<Result<Vec<_>, _>>()?;
    let run = RunConfig {
        interval: Duration::from_millis(file.run.interval_ms),
        max_cycles: file.run.max_cycles,
        max_duration: file.run.max_duration_ms.map(Duration::from_millis),
    };
    tracing::debug!(tests = tests.len(), interval = ?run.interval, "plan loaded");
    Ok(Plan { run, tests })
}
