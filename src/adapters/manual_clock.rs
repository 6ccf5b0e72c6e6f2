//! Hand-stepped clock for deterministic pacing in tests and offline runs.
//!
//! Time only moves when `advance` is called, so a converter driven by this
//! clock produces exactly the items the caller asks for.

use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};

use crate::ports::Clock;

#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<Instant>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            now: Mutex::new(Instant::now()),
        }
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap_or_else(PoisonError::into_inner);
        *now += by;
    }

    /// Step forward by exactly `items` periods of `sample_rate`
    pub fn advance_items(&self, items: u64, sample_rate: f64) {
        let nanos = (items as f64 * 1e9 / sample_rate).round() as u64;
        self.advance(Duration::from_nanos(nanos));
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        *self.now.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
