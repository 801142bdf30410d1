//! Wall-clock source for the timer

use chrono::{DateTime, Utc};

/// Source of the current wall-clock time.
///
/// Countdowns are reconciled against absolute timestamps, so the engine only
/// ever asks "what time is it now".
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// The system wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
