//! Time sources for the question timer
//!
//! The controller never counts ticks; it derives elapsed time from the
//! instant a question started. Hosts inject the clock so that tests and
//! replays can move time forward deterministically.

use std::{
    cell::Cell,
    rc::Rc,
    time::Duration,
};

use web_time::Instant;

/// Source of monotonic time
pub trait Clock {
    /// Returns the current instant
    fn now(&self) -> Instant;
}

/// The platform's monotonic clock (`performance.now()` on the web)
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// A clock that only moves when told to
///
/// Clones share the same time, so a test can keep one handle and hand
/// another to the controller.
#[derive(Debug, Clone)]
pub struct ManualClock {
    origin: Instant,
    offset: Rc<Cell<Duration>>,
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl ManualClock {
    /// Creates a clock frozen at the current instant
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
            offset: Rc::new(Cell::new(Duration::ZERO)),
        }
    }

    /// Moves the clock forward by `delta`
    pub fn advance(&self, delta: Duration) {
        self.offset.set(self.offset.get() + delta);
    }

    /// Total time the clock has been advanced by
    pub fn elapsed(&self) -> Duration {
        self.offset.get()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.origin + self.offset.get()
    }
}
