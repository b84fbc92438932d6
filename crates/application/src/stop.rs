//! Cooperative stop signal
//!
//! The scheduler's inter-cycle wait has to be cancellable: a stop request
//! must interrupt it instead of waiting the interval out. The pair below
//! wraps a `tokio::sync::watch` channel so any number of holders can
//! request a stop and the scheduler can both poll and await it.

use tokio::sync::watch;

/// Requests a stop. Cheap to clone; any clone can signal.
#[derive(Debug, Clone)]
pub struct StopHandle {
    tx: watch::Sender<bool>,
}

impl StopHandle {
    /// Signals the run to stop after the current probe.
    pub fn stop(&self) {
        let _ = self.tx.send(true);
    }
}

/// Observes stop requests.
#[derive(Debug, Clone)]
pub struct StopToken {
    rx: watch::Receiver<bool>,
}

impl StopToken {
    /// Whether a stop has been requested.
    #[must_use]
    pub fn is_stopped(&self) -> bool {
        *self.rx.borrow()
    }

    /// Resolves once a stop is requested.
    ///
    /// Dropping every [`StopHandle`] counts as a stop request: once the
    /// handles are gone the run could never be interrupted otherwise.
    pub async fn cancelled(&mut self) {
        if *self.rx.borrow() {
            return;
        }
        while self.rx.changed().await.is_ok() {
            if *self.rx.borrow() {
                return;
            }
        }
    }
}

/// Creates a connected stop handle/token pair.
#[must_use]
pub fn stop_channel() -> (StopHandle, StopToken) {
    let (tx, rx) = watch::channel(false);
    (StopHandle { tx }, StopToken { rx })
}
