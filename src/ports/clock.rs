//! Clock port trait

use std::time::Instant;

/// Monotonic time source used for output pacing.
///
/// Reads must never block; the converter calls `now` while holding its lock.
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}
