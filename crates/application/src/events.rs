//! Run lifecycle events
//!
//! Event names are the compatibility surface between the engine and its
//! listeners: renaming one breaks every listener bound to it. The payloads
//! are consumed synchronously at publish time and never persisted.

use livecheck_domain::{ConnectionStatus, RunMetadata, RunSummary, TestResult};

/// Wire-contract event names.
pub mod names {
    /// Published once, before the first probe.
    pub const RUN_START: &str = "Run.Start";
    /// Published for every evaluated response.
    pub const HANDLE_RESULT: &str = "Run.HandleResult";
    /// Published for every probe that never produced a response.
    pub const HANDLE_CONNECTION_STATUS: &str = "Run.HandleConnectionStatus";
    /// Published exactly once, after the last probe, on every termination path.
    pub const RUN_END: &str = "Run.End";

    /// Every name in the wire contract.
    pub const ALL: &[&str] = &[RUN_START, HANDLE_RESULT, HANDLE_CONNECTION_STATUS, RUN_END];
}

/// A named occurrence published through the dispatcher.
#[derive(Debug, Clone)]
pub enum RunEvent {
    /// The run is starting.
    Start(RunMetadata),
    /// A probe produced a response that was evaluated.
    Result(TestResult),
    /// A probe failed to reach the target.
    ConnectionStatus(ConnectionStatus),
    /// The run is over; listeners should flush.
    End(RunSummary),
}

impl RunEvent {
    /// The wire name this event dispatches under.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Start(_) => names::RUN_START,
            Self::Result(_) => names::HANDLE_RESULT,
            Self::ConnectionStatus(_) => names::HANDLE_CONNECTION_STATUS,
            Self::End(_) => names::RUN_END,
        }
    }
}
