use std::cell::Cell;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

/// Time primitives
#[derive(Copy, Clone, Debug, Default, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct Time(pub f64); // seconds

impl Time {
    pub const ZERO: Time = Time(0.0);

    pub fn seconds(self) -> f64 {
        self.0
    }

    /// Seconds elapsed since `earlier` (negative if `earlier` is in the future).
    pub fn since(self, earlier: Time) -> f64 {
        self.0 - earlier.0
    }

    pub fn after(self, seconds: f64) -> Time {
        Time(self.0 + seconds)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TimeSpan {
    pub start: Time,
    pub end: Time,
}

impl TimeSpan {
    pub fn new(start: Time, end: Time) -> Self {
        Self { start, end }
    }

    pub fn duration(&self) -> f64 {
        (self.end.0 - self.start.0).max(0.0)
    }

    pub fn contains(&self, t: Time) -> bool {
        t.0 >= self.start.0 && t.0 <= self.end.0
    }
}

/// Monotonic time source in seconds.
pub trait Clock {
    fn now(&self) -> Time;
}

/// Clock driven by hand. Clones share the same underlying time, so a test can
/// keep one handle and advance the clock owned by another component.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Rc<Cell<f64>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, t: Time) {
        self.now.set(t.0);
    }

    /// Advances by `seconds`. Negative steps are ignored to keep the clock monotonic.
    pub fn advance(&self, seconds: f64) {
        if seconds > 0.0 {
            self.now.set(self.now.get() + seconds);
        }
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Time {
        Time(self.now.get())
    }
}
