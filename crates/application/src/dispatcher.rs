//! Event dispatch core
//!
//! One dispatcher instance is built at startup, handed to the scheduler,
//! and sealed when the run starts. There is no ambient global: everything
//! that wants to publish or observe events holds an explicit reference.

use std::collections::HashMap;

use crate::error::{ConfigError, DispatchError, HandlerError, HandlerFailure};
use crate::events::{RunEvent, names};

/// A registered handler callback.
///
/// Handlers run synchronously on the publishing thread and must not block
/// indefinitely; a stalled handler stalls the whole run.
pub type Handler = Box<dyn FnMut(&RunEvent) -> Result<(), HandlerError> + Send>;

struct Registration {
    label: String,
    handler: Handler,
}

/// Routes published events to registered handlers, in registration order.
///
/// The registration table is write-once: [`EventDispatcher::seal`] closes it
/// before the first publish, so readers never race writers.
#[derive(Default)]
pub struct EventDispatcher {
    routes: HashMap<&'static str, Vec<Registration>>,
    sealed: bool,
}

impl EventDispatcher {
    /// Creates an empty, unsealed dispatcher.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `handler` to the ordered list for `event`.
    ///
    /// `label` identifies the owning listener in failure reports.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the name is empty or not part of the
    /// wire contract, or if the dispatcher is already sealed.
    pub fn register(
        &mut self,
        event: &str,
        label: impl Into<String>,
        handler: Handler,
    ) -> Result<(), ConfigError> {
        let label = label.into();
        if self.sealed {
            return Err(ConfigError::RegistrationClosed);
        }
        if event.trim().is_empty() {
            return Err(ConfigError::EmptyEventName { listener: label });
        }
        let Some(canonical) = names::ALL.iter().copied().find(|n| *n == event) else {
            return Err(ConfigError::UnknownEvent {
                listener: label,
                event: event.to_string(),
            });
        };
        self.routes
            .entry(canonical)
            .or_default()
            .push(Registration { label, handler });
        Ok(())
    }

    /// Closes registration. Idempotent.
    pub const fn seal(&mut self) {
        self.sealed = true;
    }

    /// Whether registration has been closed.
    #[must_use]
    pub const fn is_sealed(&self) -> bool {
        self.sealed
    }

    /// Number of handlers registered for `event`.
    #[must_use]
    pub fn handler_count(&self, event: &str) -> usize {
        self.routes.get(event).map_or(0, Vec::len)
    }

    /// Invokes every handler registered for the event's name, in
    /// registration order.
    ///
    /// All handlers run even when earlier ones fail; failures are collected
    /// and raised together afterwards.
    ///
    /// # Errors
    ///
    /// Returns a [`DispatchError`] aggregating every handler failure from
    /// this publish call.
    pub fn publish(&mut self, event: &RunEvent) -> Result<(), DispatchError> {
        let Some(registrations) = self.routes.get_mut(event.name()) else {
            return Ok(());
        };
        let mut failures = Vec::new();
        for registration in registrations.iter_mut() {
            if let Err(error) = (registration.handler)(event) {
                failures.push(HandlerFailure {
                    listener: registration.label.clone(),
                    error,
                });
            }
        }
        if failures.is_empty() {
            Ok(())
        } else {
            Err(DispatchError {
                event: event.name().to_string(),
                failures,
            })
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use livecheck_domain::RunSummary;
    use std::sync::{Arc, Mutex};

    fn end_event() -> RunEvent {
        RunEvent::End(RunSummary::default())
    }

    fn recording_handler(log: &Arc<Mutex<Vec<&'static str>>>, tag: &'static str) -> Handler {
        let log = Arc::clone(log);
        Box::new(move |_| {
            log.lock().unwrap().push(tag);
            Ok(())
        })
    }

    #[test]
    fn handlers_run_in_registration_order() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut dispatcher = EventDispatcher::new();
        dispatcher
            .register(names::RUN_END, "first", recording_handler(&log, "first"))
            .unwrap();
        dispatcher
            .register(names::RUN_END, "second", recording_handler(&log, "second"))
            .unwrap();

        dispatcher.publish(&end_event()).unwrap();
        dispatcher.publish(&end_event()).unwrap();

        assert_eq!(
            *log.lock().unwrap(),
            vec!["first", "second", "first", "second"]
        );
    }

    #[test]
    fn failing_handler_does_not_suppress_later_handlers() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut dispatcher = EventDispatcher::new();
        dispatcher
            .register(
                names::RUN_END,
                "broken",
                Box::new(|_| Err(HandlerError::new("boom"))),
            )
            .unwrap();
        dispatcher
            .register(names::RUN_END, "healthy", recording_handler(&log, "ran"))
            .unwrap();

        let error = dispatcher.publish(&end_event()).unwrap_err();
        assert_eq!(error.failures.len(), 1);
        assert_eq!(error.failures[0].listener, "broken");
        assert_eq!(*log.lock().unwrap(), vec!["ran"]);
    }

    #[test]
    fn publish_without_handlers_is_a_no_op() {
        let mut dispatcher = EventDispatcher::new();
        assert!(dispatcher.publish(&end_event()).is_ok());
    }

    #[test]
    fn register_rejects_empty_name() {
        let mut dispatcher = EventDispatcher::new();
        let result = dispatcher.register("  ", "l", Box::new(|_| Ok(())));
        assert!(matches!(result, Err(ConfigError::EmptyEventName { .. })));
    }

    #[test]
    fn register_rejects_unknown_name() {
        let mut dispatcher = EventDispatcher::new();
        let result = dispatcher.register("Run.Bogus", "l", Box::new(|_| Ok(())));
        assert!(matches!(result, Err(ConfigError::UnknownEvent { .. })));
    }

    #[test]
    fn register_rejects_after_seal() {
        let mut dispatcher = EventDispatcher::new();
        dispatcher.seal();
        let result = dispatcher.register(names::RUN_END, "late", Box::new(|_| Ok(())));
        assert!(matches!(result, Err(ConfigError::RegistrationClosed)));
    }
}
