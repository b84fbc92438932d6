//! Port adapters

mod reqwest_client;
mod system_clock;

pub use reqwest_client::{ClientBuildError, ReqwestProbeClient};
pub use system_clock::SystemClock;
