//! Record id generation
//!
//! Ids are creation timestamps in milliseconds. Two records created in the
//! same millisecond would collide, so the clock never hands out a value
//! that is not strictly greater than the previous one.

use chrono::Utc;
use std::sync::atomic::{AtomicI64, Ordering};

/// Monotonic millisecond id source
#[derive(Debug, Default)]
pub struct IdClock {
    last: AtomicI64,
}

impl IdClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clock that will never return an id at or below `id`
    pub fn starting_after(id: i64) -> Self {
        let clock = Self::new();
        clock.observe(id);
        clock
    }

    /// Record an id that already exists in the store
    pub fn observe(&self, id: i64) {
        self.last.fetch_max(id, Ordering::SeqCst);
    }

    /// Next id: the current time in milliseconds, bumped past the last id if needed
    pub fn next(&self) -> i64 {
        let now = Utc::now().timestamp_millis();
        let previous = self
            .last
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| {
                Some(now.max(last + 1))
            })
            .unwrap_or(now);
        now.max(previous + 1)
    }
}
