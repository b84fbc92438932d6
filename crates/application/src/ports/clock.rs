//! Clock port for result timestamps

use chrono::{DateTime, Utc};

/// Port for getting the current time.
///
/// Results and run metadata are stamped through this seam so tests can pin
/// the clock.
pub trait Clock: Send + Sync {
    /// Returns the current UTC timestamp.
    fn now(&self) -> DateTime<Utc>;
}
