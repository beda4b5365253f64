use std::time::Duration;

/// Polled accumulator that reports when an interval has elapsed.
///
/// Crossing the threshold several times within a single poll still reports
/// only once; the remainder is discarded.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Timer {
    elapsed: Duration,
}

impl Timer {
    /// Creates a timer with an empty accumulator.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            elapsed: Duration::ZERO,
        }
    }

    /// Adds `dt` to the accumulator and reports whether `interval` was reached.
    pub fn run(&mut self, dt: Duration, interval: Duration) -> bool {
        self.elapsed = self.elapsed.saturating_add(dt);
        if self.elapsed >= interval {
            self.elapsed = Duration::ZERO;
            true
        } else {
            false
        }
    }

    /// Clears the accumulator.
    pub fn reset(&mut self) {
        self.elapsed = Duration::ZERO;
    }

    /// Time accumulated since the last signal.
    #[must_use]
    pub const fn elapsed(&self) -> Duration {
        self.elapsed
    }
}
