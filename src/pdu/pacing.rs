//! Wall-clock pacing for the PDU stream
//!
//! Each work call may emit `round(elapsed × sample_rate)` items, where
//! `elapsed` runs from the end of the last paced interval. There is no
//! sleeping: a call that arrives before one whole period has passed simply
//! gets a zero budget.
//!
//! After a productive call the interval start moves forward by exactly the
//! items produced, not to "now". Whatever rounding gave or took is settled on
//! the next call, so over many calls the output rate is `sample_rate` no
//! matter how irregularly the host calls in. When the output buffer was too
//! small for the budget, the backlog is dropped and the interval restarts at
//! "now".

use std::time::{Duration, Instant};

/// Slack that keeps an exact multiple of the sample period from looking one
/// item short because of float rounding
const BUDGET_EPSILON: f64 = 1e-6;

/// Largest rounding difference carried into the next call
const MAX_CARRY: f64 = 0.5 + BUDGET_EPSILON;

#[derive(Debug, Clone)]
pub struct PacingClock {
    sample_rate: f64,
    last_call: Instant,
}

impl PacingClock {
    pub fn new(sample_rate: f64, start: Instant) -> Self {
        Self {
            sample_rate,
            last_call: start,
        }
    }

    /// Time since the start of the current interval
    pub fn elapsed(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.last_call)
    }

    /// Elapsed time in sample periods, fractional
    pub fn elapsed_items(&self, now: Instant) -> f64 {
        self.elapsed(now).as_secs_f64() * self.sample_rate
    }

    /// Items that may be produced at `now`, capped at `capacity`
    pub fn budget(&self, now: Instant, capacity: usize) -> usize {
        let items = self.elapsed_items(now);
        if items + BUDGET_EPSILON < 1.0 {
            return 0;
        }
        let items = items.round();
        if items >= capacity as f64 {
            capacity
        } else {
            items as usize
        }
    }

    /// Close the interval after `produced` items were emitted at `now`
    pub fn mark(&mut self, now: Instant, produced: usize) {
        let owed = self.elapsed_items(now) - produced as f64;
        self.last_call = if owed.abs() <= MAX_CARRY {
            self.last_call + self.periods(produced)
        } else {
            now
        };
    }

    fn periods(&self, items: usize) -> Duration {
        Duration::from_nanos((items as f64 * 1e9 / self.sample_rate).round() as u64)
    }

    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }
}
