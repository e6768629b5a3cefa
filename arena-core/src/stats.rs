//! Rolling frame statistics.

use std::collections::VecDeque;
use std::time::Duration;

/// Fixed-capacity window of recent frame instants plus a running frame count.
#[derive(Debug, Clone)]
pub struct RollingStats {
    capacity: usize,
    window: VecDeque<Duration>,
    frames: u64,
}

impl RollingStats {
    /// Window holding at most `capacity` instants (at least one).
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            window: VecDeque::with_capacity(capacity),
            frames: 0,
        }
    }

    /// Record a frame at `now`, evicting the oldest instant when full.
    pub fn record(&mut self, now: Duration) {
        if self.window.len() == self.capacity {
            self.window.pop_front();
        }
        self.window.push_back(now);
        self.frames += 1;
    }

    /// Frames per second over the window; zero until two distinct instants
    /// have been recorded.
    #[must_use]
    pub fn frame_rate(&self) -> f64 {
        let (Some(oldest), Some(newest)) = (self.window.front(), self.window.back()) else {
            return 0.0;
        };
        let span = newest.saturating_sub(*oldest).as_secs_f64();
        if span <= 0.0 {
            return 0.0;
        }
        #[allow(clippy::cast_precision_loss)]
        let intervals = (self.window.len() - 1) as f64;
        intervals / span
    }

    /// Frames recorded since creation.
    #[must_use]
    pub const fn frame_count(&self) -> u64 {
        self.frames
    }

    /// Number of instants currently in the window.
    #[must_use]
    pub fn len(&self) -> usize {
        self.window.len()
    }

    /// Check if nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.window.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_of_five_over_half_a_second() {
        let mut stats = RollingStats::new(5);
        for t in (0..=500).step_by(100) {
            stats.record(Duration::from_millis(t));
        }
        assert_eq!(stats.len(), 5);
        assert_eq!(stats.frame_count(), 6);
        // 1000 * 4 / (500 - 100)
        assert!((stats.frame_rate() - 10.0).abs() < 1e-9);
    }

    #[test]
    fn single_instant_has_no_rate() {
        let mut stats = RollingStats::new(3);
        assert!(stats.frame_rate().abs() < f64::EPSILON);
        stats.record(Duration::from_millis(16));
        assert!(stats.frame_rate().abs() < f64::EPSILON);
        assert_eq!(stats.frame_count(), 1);
    }
}
