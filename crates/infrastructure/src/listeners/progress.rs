//! Progress bar listener
//!
//! Visualizes the run as one character per outcome: `*` for a passing
//! result, `f` for a failed one, `e` for an evaluation error and `E` for a
//! probe that never connected. Lines wrap at a configurable width under a
//! `  Running: ` prefix. With an output sink injected, failures and errors
//! are wrapped in markup for sinks that render styles; without one the
//! plain characters go straight to stdout.

use std::io::Write;
use std::sync::Arc;

use livecheck_application::events::names;
use livecheck_application::ports::OutputSink;
use livecheck_application::{HandlerError, Listener};
use livecheck_domain::{ConnectionStatus, Response, ResultStatus, RunSummary, TestResult};

const DEFAULT_LINE_BREAK: usize = 70;
const CONTINUATION_INDENT: &str = "\n           ";

/// Renders test outcomes as a progress bar.
pub struct ProgressListener {
    line_break_at: usize,
    counter: usize,
    output: Option<Arc<dyn OutputSink>>,
}

impl ProgressListener {
    /// Creates a plain-echo progress listener (raw stdout writes).
    #[must_use]
    pub const fn new() -> Self {
        Self {
            line_break_at: DEFAULT_LINE_BREAK,
            counter: 0,
            output: None,
        }
    }

    /// Creates a progress listener rendering through `output`.
    #[must_use]
    pub const fn with_output(output: Arc<dyn OutputSink>) -> Self {
        Self {
            line_break_at: DEFAULT_LINE_BREAK,
            counter: 0,
            output: Some(output),
        }
    }

    /// Sets the bar width (builder pattern).
    #[must_use]
    pub const fn with_line_break_at(mut self, width: usize) -> Self {
        self.line_break_at = width;
        self
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

    /// Prints one outcome character at the right position, breaking lines
    /// under the `Running:` prefix.
    fn write_char(&mut self, plain: &str, rich: &str) {
        if self.counter == 0 {
            if self.output.is_some() {
                self.emit("  <info>Running</info>: ");
            } else {
                self.emit("  Running: ");
            }
        }
        if self.counter % self.line_break_at == 0 && self.counter != 0 {
            self.emit(CONTINUATION_INDENT);
        }
        self.emit(if self.output.is_some() { rich } else { plain });
        self.counter += 1;
    }
}

impl Default for ProgressListener {
    fn default() -> Self {
        Self::new()
    }
}

impl Listener for ProgressListener {
    fn name(&self) -> &str {
        "progress"
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
            ResultStatus::Success => self.write_char("*", "*"),
            ResultStatus::Failed => self.write_char("f", "<failure>f</failure>"),
            ResultStatus::Error => self.write_char("e", "<error>e</error>"),
        }
        Ok(())
    }

    fn on_connection_status(&mut self, _status: &ConnectionStatus) -> Result<(), HandlerError> {
        self.write_char("E", "E");
        Ok(())
    }

    fn on_run_end(&mut self, _summary: &RunSummary) -> Result<(), HandlerError> {
        if self.counter > 0 {
            self.emit("\n");
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use livecheck_domain::{Expectation, ExpectationFailure, Headers, StatusExpectation, TestSpec};
    use pretty_assertions::assert_eq;
    use std::sync::Mutex;
    use std::time::Duration;

    #[derive(Default)]
    struct BufferSink {
        buffer: Mutex<String>,
    }

    impl BufferSink {
        fn contents(&self) -> String {
            self.buffer.lock().unwrap().clone()
        }
    }

    impl OutputSink for BufferSink {
        fn write(&self, text: &str) {
            self.buffer.lock().unwrap().push_str(text);
        }
    }

    fn response() -> livecheck_domain::Response {
        livecheck_domain::Response::new(200, "OK", Headers::new(), "", Duration::from_millis(1))
    }

    fn success() -> TestResult {
        TestResult::success(TestSpec::new("t", "https://t/"), response(), Utc::now())
    }

    fn failed() -> TestResult {
        let expectation = Expectation::StatusCode {
            expected: StatusExpectation::exact(200),
        };
        TestResult::failed(
            TestSpec::new("t", "https://t/"),
            response(),
            vec![ExpectationFailure::new(expectation, "mismatch")],
            Utc::now(),
        )
    }

    fn error() -> TestResult {
        TestResult::error(TestSpec::new("t", "https://t/"), None, "fault", Utc::now())
    }

    #[test]
    fn renders_one_char_per_outcome_with_markup() {
        let sink = Arc::new(BufferSink::default());
        let mut listener = ProgressListener::with_output(Arc::clone(&sink) as Arc<dyn OutputSink>);

        listener.on_result(&success(), None).unwrap();
        listener.on_result(&failed(), None).unwrap();
        listener.on_result(&error(), None).unwrap();
        listener
            .on_connection_status(&ConnectionStatus::error("https://t/", "refused"))
            .unwrap();
        listener.on_run_end(&RunSummary::default()).unwrap();

        assert_eq!(
            sink.contents(),
            "  <info>Running</info>: *<failure>f</failure><error>e</error>E\n"
        );
    }

    #[test]
    fn wraps_at_the_configured_width() {
        let sink = Arc::new(BufferSink::default());
        let mut listener = ProgressListener::with_output(Arc::clone(&sink) as Arc<dyn OutputSink>)
            .with_line_break_at(5);

        for _ in 0..7 {
            listener.on_result(&success(), None).unwrap();
        }

        assert_eq!(
            sink.contents(),
            format!("  <info>Running</info>: *****{CONTINUATION_INDENT}**")
        );
    }

    #[test]
    fn subscribes_to_outcome_and_end_events_only() {
        let listener = ProgressListener::new();
        let subscriptions = listener.subscriptions();
        assert_eq!(subscriptions.len(), 3);
        assert!(!subscriptions.contains(&names::RUN_START.to_string()));
    }
}
