use foundation::time::Time;
use serde::{Deserialize, Serialize};

/// Deterministic frame metadata.
///
/// Simulated hosts step time in fixed increments so a scroll session can be
/// recorded and replayed with identical trigger timestamps.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    /// 0-based frame index.
    pub index: u64,
    /// Fixed delta time (seconds).
    pub dt_s: f64,
    /// Time at the start of the frame (seconds).
    pub time: Time,
}

impl Frame {
    pub fn new(index: u64, dt_s: f64) -> Self {
        Self {
            index,
            dt_s,
            time: Time(index as f64 * dt_s),
        }
    }

    pub fn next(self) -> Self {
        Self::new(self.index + 1, self.dt_s)
    }
}
