//! Livecheck Application - Engine core
//!
//! This crate holds the live-testing engine proper:
//! - Port traits (HTTP client, clock, output sink)
//! - The event dispatcher and listener binding
//! - The response evaluator
//! - The run scheduler state machine
//!
//! Infrastructure adapters and concrete listeners live one layer out.

pub mod dispatcher;
pub mod error;
pub mod evaluator;
pub mod events;
pub mod listener;
pub mod ports;
pub mod runner;
pub mod stop;

pub use dispatcher::EventDispatcher;
pub use error::{ConfigError, DispatchError, HandlerError, HandlerFailure, RunError};
pub use evaluator::Evaluator;
pub use events::RunEvent;
pub use listener::{Listener, bind_listeners};
pub use ports::{Clock, HttpClient, OutputSink};
pub use runner::{RunConfig, RunState, Runner};
pub use stop::{StopHandle, StopToken, stop_channel};
