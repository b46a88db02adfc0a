use std::time::Duration;

use rand::Rng;

/// Elapsed-time gate measured against the round clock.
///
/// Time is passed in explicitly as the duration since the round started, so
/// the same cooldown behaves identically under a real clock and in tests.
#[derive(Debug, Clone, PartialEq)]
pub struct Cooldown {
    base: Duration,
    variance: Duration,
    duration: Duration,
    started: Option<Duration>,
}

impl Cooldown {
    pub fn new(duration: Duration) -> Self {
        Self {
            base: duration,
            variance: Duration::ZERO,
            duration,
            started: None,
        }
    }

    pub fn from_millis(millis: u64) -> Self {
        Self::new(Duration::from_millis(millis))
    }

    /// Cooldown whose duration is redrawn from `[base, base + variance)` on
    /// every [`Cooldown::reset_random`].
    pub fn variable(base: Duration, variance: Duration) -> Self {
        Self {
            base,
            variance,
            duration: base,
            started: None,
        }
    }

    /// A cooldown that is already running and never finishes.
    pub fn never() -> Self {
        Self {
            started: Some(Duration::ZERO),
            ..Self::new(Duration::MAX)
        }
    }

    pub fn reset(&mut self, now: Duration) {
        self.started = Some(now);
    }

    pub fn reset_random<R: Rng + ?Sized>(&mut self, now: Duration, rng: &mut R) {
        if !self.variance.is_zero() {
            let spread = self.variance.as_millis() as u64;
            let extra = rng.random_range(0..spread.max(1));
            self.duration = self.base + Duration::from_millis(extra);
        }
        self.reset(now);
    }

    /// True once `duration` has elapsed since the last reset. A cooldown that
    /// was never reset counts as finished.
    pub fn check_finished(&self, now: Duration) -> bool {
        match self.started {
            None => true,
            Some(started) => now.saturating_sub(started) >= self.duration,
        }
    }

    /// Time left before the cooldown finishes.
    pub fn remaining(&self, now: Duration) -> Duration {
        match self.started {
            None => Duration::ZERO,
            Some(started) => self.duration.saturating_sub(now.saturating_sub(started)),
        }
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// Replaces the configured duration without touching the start instant.
    pub fn set_duration(&mut self, duration: Duration) {
        self.base = duration;
        self.variance = Duration::ZERO;
        self.duration = duration;
    }
}
