//! Wall-clock sampling for elapsed-time bookkeeping.

use std::cell::Cell;

use jiff::{SignedDuration, Timestamp};

/// Source of the current time.
pub trait Clock {
    fn now(&self) -> Timestamp;
}

/// The system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Timestamp::now()
    }
}

/// A clock that only moves when told to.
#[derive(Debug)]
pub struct ManualClock {
    now: Cell<Timestamp>,
}

impl ManualClock {
    pub fn new(start: Timestamp) -> Self {
        Self {
            now: Cell::new(start),
        }
    }

    /// Moves the clock forward by whole seconds.
    pub fn advance(&self, seconds: i64) {
        self.now.set(self.now.get() + SignedDuration::from_secs(seconds));
    }

    /// Moves the clock forward by milliseconds.
    pub fn advance_millis(&self, millis: i64) {
        self.now.set(self.now.get() + SignedDuration::from_millis(millis));
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Timestamp {
        self.now.get()
    }
}

/// Whole seconds from `start` to `end`, rounded to nearest, never negative.
pub fn elapsed_seconds(start: Timestamp, end: Timestamp) -> u64 {
    let millis = end.as_millisecond() - start.as_millisecond();
    if millis <= 0 {
        return 0;
    }
    u64::try_from((millis + 500) / 1000).unwrap_or(0)
}
