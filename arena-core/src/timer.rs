//! Wall-clock countdown.

use std::time::Duration;

/// Countdown measured against host timestamps.
///
/// Expiry is reported exactly once per [`Timer::start`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timer {
    duration: Duration,
    started_at: Duration,
    running: bool,
}

impl Timer {
    /// Create a stopped timer.
    #[must_use]
    pub const fn new(duration: Duration) -> Self {
        Self {
            duration,
            started_at: Duration::ZERO,
            running: false,
        }
    }

    /// Total length.
    #[must_use]
    pub const fn duration(&self) -> Duration {
        self.duration
    }

    /// (Re)start the countdown at `now`.
    pub fn start(&mut self, now: Duration) {
        self.started_at = now;
        self.running = true;
    }

    /// Stop without firing.
    pub fn stop(&mut self) {
        self.running = false;
    }

    /// Check if the countdown is active.
    #[must_use]
    pub const fn is_running(&self) -> bool {
        self.running
    }

    /// Time left at `now`; zero once stopped or elapsed.
    #[must_use]
    pub fn remaining_at(&self, now: Duration) -> Duration {
        if !self.running {
            return Duration::ZERO;
        }
        let elapsed = now.saturating_sub(self.started_at);
        self.duration.saturating_sub(elapsed)
    }

    /// Fraction of the duration left at `now`, in `[0, 1]`.
    #[must_use]
    pub fn progress_at(&self, now: Duration) -> f32 {
        if self.duration.is_zero() {
            return 0.0;
        }
        (self.remaining_at(now).as_secs_f32() / self.duration.as_secs_f32()).clamp(0.0, 1.0)
    }

    /// Poll the timer. Returns `true` on the poll that observes expiry and
    /// stops the timer, so later polls return `false` until restarted.
    pub fn update(&mut self, now: Duration) -> bool {
        if self.running && now.saturating_sub(self.started_at) >= self.duration {
            self.running = false;
            return true;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn remaining_counts_down() {
        let mut timer = Timer::new(ms(10_000));
        timer.start(ms(1_000));
        assert_eq!(timer.remaining_at(ms(1_000)), ms(10_000));
        assert_eq!(timer.remaining_at(ms(3_000)), ms(8_000));
        assert!((timer.progress_at(ms(6_000)) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn expiry_fires_exactly_once() {
        let mut timer = Timer::new(ms(500));
        timer.start(ms(0));
        assert!(!timer.update(ms(499)));
        assert!(timer.update(ms(500)));
        assert!(!timer.update(ms(600)));
        assert!(!timer.is_running());
        assert_eq!(timer.remaining_at(ms(600)), Duration::ZERO);

        timer.start(ms(1_000));
        assert!(timer.update(ms(2_000)));
    }

    #[test]
    fn stopped_timer_never_fires() {
        let mut timer = Timer::new(ms(100));
        assert!(!timer.update(ms(1_000)));
        timer.start(ms(0));
        timer.stop();
        assert!(!timer.update(ms(1_000)));
    }
}
