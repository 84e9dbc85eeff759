//! Capped exponential backoff for status polling.

use std::time::Duration;

use crate::config::polling::BACKOFF_FACTOR;

/// Interval sequence `i(n+1) = min(floor(i(n) * 1.5), cap)`, in whole milliseconds.
///
/// Iterating yields the current interval and then advances, so the first item
/// is the initial interval itself.
#[derive(Debug, Clone)]
pub struct Backoff {
    current_ms: u64,
    max_ms: u64,
}

impl Backoff {
    /// Start at `initial`, never exceeding `max`.
    #[must_use]
    pub fn new(initial: Duration, max: Duration) -> Self {
        let max_ms = duration_ms(max);
        Self { current_ms: duration_ms(initial).min(max_ms), max_ms }
    }

    /// Interval the next sleep would use.
    #[must_use]
    pub const fn current(&self) -> Duration {
        Duration::from_millis(self.current_ms)
    }

    /// Return the current interval and grow it for the following call.
    pub fn next_interval(&mut self) -> Duration {
        let interval = self.current();
        let grown = (self.current_ms as f64 * BACKOFF_FACTOR).floor() as u64;
        self.current_ms = grown.min(self.max_ms);
        interval
    }
}

impl Iterator for Backoff {
    type Item = Duration;

    fn next(&mut self) -> Option<Duration> {
        Some(self.next_interval())
    }
}

fn duration_ms(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}
