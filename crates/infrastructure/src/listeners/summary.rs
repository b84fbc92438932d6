//! Summary listener
//!
//! Collects every problem observed during the run and renders the final
//! accounting when the run ends, whatever the termination path was.

use std::io::Write;
use std::sync::Arc;

use livecheck_application::events::names;
use livecheck_application::ports::OutputSink;
use livecheck_application::{HandlerError, Listener};
use livecheck_domain::{ConnectionStatus, Response, ResultStatus, RunSummary, TestResult};

/// Tallies outcomes and prints a closing report.
pub struct SummaryListener {
    problems: Vec<String>,
    output: Option<Arc<dyn OutputSink>>,
}

impl SummaryListener {
    /// Creates a plain-echo summary listener.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            problems: Vec::new(),
            output: None,
        }
    }

    /// Creates a summary listener rendering through `output`.
    #[must_use]
    pub const fn with_output(output: Arc<dyn OutputSink>) -> Self {
        Self {
            problems: Vec::new(),
            output: Some(output),
        }
    }

    fn emit(&self, text: &str) {
        if let Some(output) = &self.output {
            output.write(text);
        } else {
            let mut stdout = std::io::stdout().lock();
            let _ = stdout.write_all(text.as_bytes());
            let _ = stdout.flush();
        }
    }
}

impl Default for SummaryListener {
    fn default() -> Self {
        Self::new()
    }
}

impl Listener for SummaryListener {
    fn name(&self) -> &str {
        "summary"
    }

    fn subscriptions(&self) -> Vec<String> {
        vec![
            names::HANDLE_RESULT.to_string(),
            names::HANDLE_CONNECTION_STATUS.to_string(),
            names::RUN_END.to_string(),
        ]
    }

    fn on_result(
        &mut self,
        result: &TestResult,
        _response: Option<&Response>,
    ) -> Result<(), HandlerError> {
        match result.status() {
            ResultStatus::Success => {}
            ResultStatus::Failed => {
                for failure in result.failures() {
                    self.problems
                        .push(format!("{}: {}", result.test().name, failure.message));
                }
            }
            ResultStatus::Error => {
                let fault = result.fault().unwrap_or("evaluation fault");
                self.problems
                    .push(format!("{}: {}", result.test().name, fault));
            }
        }
        Ok(())
    }

    fn on_connection_status(&mut self, status: &ConnectionStatus) -> Result<(), HandlerError> {
        self.problems.push(status.to_string());
        Ok(())
    }

    fn on_run_end(&mut self, summary: &RunSummary) -> Result<(), HandlerError> {
        self.emit("\n");
        for problem in &self.problems {
            self.emit(&format!("  - {problem}\n"));
        }
        self.emit(&format!(
            "  {} attempts in {} cycle(s): {} ok, {} failed, {} errors, {} unreachable\n",
            summary.attempts(),
            summary.cycles,
            summary.success,
            summary.failed,
            summary.error,
            summary.connection_failures,
        ));
        Ok(())
    }
}
