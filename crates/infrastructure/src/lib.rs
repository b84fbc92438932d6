//! Livecheck Infrastructure - Adapters and implementations
//!
//! This crate provides concrete implementations of the ports defined in the
//! application layer: the reqwest-backed probe client, the system clock,
//! YAML plan loading, and the console listeners.

pub mod adapters;
pub mod listeners;
pub mod output;
pub mod plan;

pub use adapters::{ReqwestProbeClient, SystemClock};
pub use listeners::{ProgressListener, SummaryListener};
pub use output::ConsoleSink;
pub use plan::{Plan, PlanError, load_plan};
