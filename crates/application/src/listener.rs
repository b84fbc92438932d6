//! Listener contract and binding
//!
//! Listeners observe the run; they never participate in control flow. The
//! binder replaces runtime introspection with an explicit bootstrap step:
//! each listener's declared subscriptions become dispatcher registrations,
//! in declared order, before the run starts.

use std::sync::{Arc, Mutex};

use livecheck_domain::{ConnectionStatus, Response, RunMetadata, RunSummary, TestResult};

use crate::dispatcher::EventDispatcher;
use crate::error::{ConfigError, HandlerError};
use crate::events::{RunEvent, names};

/// An observer of run lifecycle events.
///
/// Every hook has a no-op default, so a listener only implements the events
/// it cares about. Hooks run synchronously on the scheduler's thread.
pub trait Listener: Send {
    /// Identifies this listener in failure reports.
    fn name(&self) -> &str;

    /// The event names this listener binds to, in binding order.
    ///
    /// Defaults to the full wire contract.
    fn subscriptions(&self) -> Vec<String> {
        names::ALL.iter().map(|n| (*n).to_string()).collect()
    }

    /// Called once when the run starts.
    ///
    /// # Errors
    ///
    /// A returned [`HandlerError`] is aggregated by the dispatcher.
    fn on_run_start(&mut self, _meta: &RunMetadata) -> Result<(), HandlerError> {
        Ok(())
    }

    /// Called for every evaluated result, with its response when present.
    ///
    /// # Errors
    ///
    /// A returned [`HandlerError`] is aggregated by the dispatcher.
    fn on_result(
        &mut self,
        _result: &TestResult,
        _response: Option<&Response>,
    ) -> Result<(), HandlerError> {
        Ok(())
    }

    /// Called for every probe that never produced a response.
    ///
    /// # Errors
    ///
    /// A returned [`HandlerError`] is aggregated by the dispatcher.
    fn on_connection_status(&mut self, _status: &ConnectionStatus) -> Result<(), HandlerError> {
        Ok(())
    }

    /// Called exactly once when the run ends, on every termination path.
    ///
    /// # Errors
    ///
    /// A returned [`HandlerError`] is aggregated by the dispatcher.
    fn on_run_end(&mut self, _summary: &RunSummary) -> Result<(), HandlerError> {
        Ok(())
    }
}

/// Binds each listener's subscriptions into the dispatcher.
///
/// Registration order is the declared order: listeners in the order given,
/// and within one listener its subscriptions in the order returned. That
/// order is exactly the handler execution order for every later publish.
///
/// # Errors
///
/// Returns the [`ConfigError`] of the first empty or unknown subscription
/// name, or of a registration attempt on a sealed dispatcher.
pub fn bind_listeners(
    dispatcher: &mut EventDispatcher,
    listeners: Vec<Box<dyn Listener>>,
) -> Result<(), ConfigError> {
    for listener in listeners {
        let label = listener.name().to_string();
        let subscriptions = listener.subscriptions();
        let shared = Arc::new(Mutex::new(listener));
        for event in &subscriptions {
            let handle = Arc::clone(&shared);
            dispatcher.register(
                event,
                label.clone(),
                Box::new(move |event: &RunEvent| {
                    let mut listener = handle
                        .lock()
                        .map_err(|_| HandlerError::new("listener state poisoned"))?;
                    match event {
                        RunEvent::Start(meta) => listener.on_run_start(meta),
                        RunEvent::Result(result) => listener.on_result(result, result.response()),
                        RunEvent::ConnectionStatus(status) => {
                            listener.on_connection_status(status)
                        }
                        RunEvent::End(summary) => listener.on_run_end(summary),
                    }
                }),
            )?;
        }
    }
    Ok(())
}
