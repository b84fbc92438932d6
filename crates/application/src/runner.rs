//! Run scheduler
//!
//! One logical run loop: pull the next test, probe it, evaluate, publish,
//! repeat over the configured interval until a stop condition is met. Each
//! probe is issued, awaited, evaluated and fully dispatched before the next
//! test begins, which keeps event ordering deterministic for listeners that
//! render incrementally.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use uuid::Uuid;

use livecheck_domain::{ProbeOutcome, ResultStatus, RunMetadata, RunSummary, TestSpec};

use crate::dispatcher::EventDispatcher;
use crate::error::{ConfigError, DispatchError, RunError};
use crate::evaluator::Evaluator;
use crate::events::RunEvent;
use crate::ports::{Clock, HttpClient};
use crate::stop::StopToken;

/// Scheduling parameters for one run.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Inter-cycle wait between full passes over the test set.
    pub interval: Duration,
    /// Stop after this many completed passes.
    pub max_cycles: Option<u64>,
    /// Stop once the run has lasted this long.
    pub max_duration: Option<Duration>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(30),
            max_cycles: None,
            max_duration: None,
        }
    }
}

/// Observable scheduler states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    /// Constructed, not yet started.
    Idle,
    /// Probing the test set.
    Running,
    /// Between cycles, waiting out the interval.
    Waiting,
    /// Probing is over; final events are being published.
    Stopped,
    /// Fully finished, end-of-run event published.
    Terminated,
}

/// Drives repeated execution of a test set over the run's lifetime.
pub struct Runner<C: HttpClient> {
    tests: Vec<TestSpec>,
    client: Arc<C>,
    evaluator: Evaluator,
    dispatcher: EventDispatcher,
    clock: Arc<dyn Clock>,
    config: RunConfig,
    stop: StopToken,
    state: RunState,
}

impl<C: HttpClient> Runner<C> {
    /// Creates a runner over the given test set.
    ///
    /// The dispatcher should already carry its listener registrations; it is
    /// sealed when the run starts.
    #[must_use]
    pub fn new(
        tests: Vec<TestSpec>,
        client: Arc<C>,
        dispatcher: EventDispatcher,
        clock: Arc<dyn Clock>,
        config: RunConfig,
        stop: StopToken,
    ) -> Self {
        Self {
            tests,
            client,
            evaluator: Evaluator::new(),
            dispatcher,
            clock,
            config,
            stop,
            state: RunState::Idle,
        }
    }

    /// The scheduler's current state.
    #[must_use]
    pub const fn state(&self) -> RunState {
        self.state
    }

    /// Executes the run to completion.
    ///
    /// Per-probe failures are data and never abort the run. Listener
    /// failures during dispatch are fatal, but the end-of-run event is
    /// still published first so listeners can flush partial statistics.
    ///
    /// # Errors
    ///
    /// [`RunError::Config`] when no enabled tests are configured (the run
    /// never starts), or [`RunError::Dispatch`] when a listener failed.
    pub async fn run(&mut self) -> Result<RunSummary, RunError> {
        let enabled: Vec<TestSpec> = self.tests.iter().filter(|t| t.enabled).cloned().collect();
        if enabled.is_empty() {
            return Err(ConfigError::NoTestsConfigured.into());
        }

        self.dispatcher.seal();
        self.state = RunState::Running;
        let started = Instant::now();
        let metadata = RunMetadata::new(self.clock.now(), enabled.len(), self.config.max_cycles);
        let mut summary = RunSummary {
            run_id: metadata.run_id,
            ..RunSummary::default()
        };
        let mut last_execution: HashMap<Uuid, Instant> = HashMap::new();
        let mut stop = self.stop.clone();
        let mut fatal: Option<DispatchError> = None;

        tracing::info!(run_id = %metadata.run_id, tests = enabled.len(), "run starting");
        if let Err(e) = self.dispatcher.publish(&RunEvent::Start(metadata)) {
            fatal = Some(e);
        }

        'run: while fatal.is_none() {
            for test in &enabled {
                if stop.is_stopped() {
                    summary.stopped_early = true;
                    break 'run;
                }
                if !is_due(test, &last_execution) {
                    continue;
                }
                last_execution.insert(test.id, Instant::now());

                let event = match self.client.execute(test).await {
                    ProbeOutcome::Response(response) => {
                        let result = self.evaluator.evaluate(test, response, self.clock.now());
                        match result.status() {
                            ResultStatus::Success => summary.success += 1,
                            ResultStatus::Failed => summary.failed += 1,
                            ResultStatus::Error => summary.error += 1,
                        }
                        RunEvent::Result(result)
                    }
                    ProbeOutcome::ConnectionFailed(status) => {
                        summary.connection_failures += 1;
                        tracing::debug!(test = %test.name, %status, "probe did not connect");
                        RunEvent::ConnectionStatus(status)
                    }
                };
                if let Err(e) = self.dispatcher.publish(&event) {
                    summary.stopped_early = true;
                    fatal = Some(e);
                    break 'run;
                }
            }

            summary.cycles += 1;
            tracing::debug!(cycle = summary.cycles, "pass complete");

            if stop.is_stopped() {
                summary.stopped_early = true;
                break;
            }
            if self.limits_reached(started, summary.cycles) {
                break;
            }

            self.state = RunState::Waiting;
            tokio::select! {
                () = tokio::time::sleep(self.config.interval) => {
                    self.state = RunState::Running;
                }
                () = stop.cancelled() => {
                    summary.stopped_early = true;
                    break;
                }
            }
        }

        self.state = RunState::Stopped;
        summary.finished_at = Some(self.clock.now());
        let end_publish = self.dispatcher.publish(&RunEvent::End(summary.clone()));
        self.state = RunState::Terminated;
        tracing::info!(
            run_id = %summary.run_id,
            cycles = summary.cycles,
            attempts = summary.attempts(),
            "run finished"
        );

        if let Some(error) = fatal {
            return Err(error.into());
        }
        end_publish?;
        Ok(summary)
    }

    fn limits_reached(&self, started: Instant, cycles: u64) -> bool {
        self.config.max_cycles.is_some_and(|max| cycles >= max)
            || self
                .config
                .max_duration
                .is_some_and(|max| started.elapsed() >= max)
    }
}

/// A test is due unless its own interval has not yet elapsed since its last
/// execution. Tests without a per-test interval run every cycle.
fn is_due(test: &TestSpec, last_execution: &HashMap<Uuid, Instant>) -> bool {
    match (test.interval(), last_execution.get(&test.id)) {
        (Some(interval), Some(at)) => at.elapsed() >= interval,
        _ => true,
    }
}
