//! Time source for timestamps and streak calculation

use std::cell::Cell;
use std::rc::Rc;

use chrono::{DateTime, Duration, Local};

/// Provides the current local time
pub trait Clock {
    /// Current local time
    fn now(&self) -> DateTime<Local>;
}

/// Wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}

/// A clock that only moves when told to.
///
/// Clones share the same instant, so a test can keep one handle while the
/// store owns another.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Rc<Cell<DateTime<Local>>>,
}

impl ManualClock {
    /// Create a clock frozen at `now`
    pub fn new(now: DateTime<Local>) -> Self {
        Self { now: Rc::new(Cell::new(now)) }
    }

    /// Jump to `now`
    pub fn set(&self, now: DateTime<Local>) {
        self.now.set(now);
    }

    /// Move forward by whole days
    pub fn advance_days(&self, days: i64) {
        self.now.set(self.now.get() + Duration::days(days));
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Local> {
        self.now.get()
    }
}
