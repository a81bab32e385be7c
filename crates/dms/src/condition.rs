//! Condition trackers
//!
//! A condition is "signal crossed its threshold this cycle". The tracker
//! remembers when the current uninterrupted run of the condition began; a
//! single cycle without the condition forgets it.

use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

/// Direction in which a signal must cross its threshold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Comparison {
    /// Condition holds while `signal < threshold`
    Below,
    /// Condition holds while `signal > threshold`
    Above,
}

impl Comparison {
    pub fn holds(&self, signal: f64, threshold: f64) -> bool {
        match self {
            Comparison::Below => signal < threshold,
            Comparison::Above => signal > threshold,
        }
    }
}

/// Hysteresis tracker for one signal
#[derive(Debug, Clone)]
pub struct ConditionTracker {
    comparison: Comparison,
    threshold: f64,
    active_since: Option<Instant>,
}

impl ConditionTracker {
    pub fn new(comparison: Comparison, threshold: f64) -> Self {
        Self {
            comparison,
            threshold,
            active_since: None,
        }
    }

    /// Feed one cycle's signal value; returns whether the condition holds
    pub fn update(&mut self, signal: f64, now: Instant) -> bool {
        if self.comparison.holds(signal, self.threshold) {
            if self.active_since.is_none() {
                self.active_since = Some(now);
            }
            true
        } else {
            self.active_since = None;
            false
        }
    }

    /// Start of the current run, if the condition is active
    pub fn active_since(&self) -> Option<Instant> {
        self.active_since
    }

    pub fn is_active(&self) -> bool {
        self.active_since.is_some()
    }

    /// How long the condition has held as of `now`
    pub fn active_for(&self, now: Instant) -> Option<Duration> {
        self.active_since
            .map(|since| now.saturating_duration_since(since))
    }

    /// Whether the condition has held for at least `min`
    pub fn sustained(&self, now: Instant, min: Duration) -> bool {
        self.active_for(now).is_some_and(|held| held >= min)
    }

    pub fn clear(&mut self) {
        self.active_since = None;
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn comparison(&self) -> Comparison {
        self.comparison
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secs(s: f64) -> Duration {
        Duration::from_secs_f64(s)
    }

    #[test]
    fn test_activation_keeps_first_timestamp() {
        let t0 = Instant::now();
        let mut tracker = ConditionTracker::new(Comparison::Below, 0.015);

        assert!(tracker.update(0.01, t0));
        assert!(tracker.update(0.005, t0 + secs(1.0)));
        assert_eq!(tracker.active_since(), Some(t0));
        assert_eq!(tracker.active_for(t0 + secs(3.0)), Some(secs(3.0)));
    }

    #[test]
    fn test_single_miss_resets() {
        let t0 = Instant::now();
        let mut tracker = ConditionTracker::new(Comparison::Above, 150.0);

        tracker.update(200.0, t0);
        assert!(!tracker.update(100.0, t0 + secs(1.0)));
        assert!(!tracker.is_active());

        tracker.update(200.0, t0 + secs(2.0));
        assert_eq!(tracker.active_since(), Some(t0 + secs(2.0)));
    }

    #[test]
    fn test_threshold_is_exclusive() {
        let t0 = Instant::now();
        let mut below = ConditionTracker::new(Comparison::Below, 13.0);
        let mut above = ConditionTracker::new(Comparison::Above, 150.0);

        assert!(!below.update(13.0, t0));
        assert!(!above.update(150.0, t0));
    }

    #[test]
    fn test_sustained_boundary() {
        let t0 = Instant::now();
        let mut tracker = ConditionTracker::new(Comparison::Below, 13.0);
        tracker.update(0.0, t0);

        assert!(!tracker.sustained(t0 + secs(4.9), secs(5.0)));
        assert!(tracker.sustained(t0 + secs(5.0), secs(5.0)));
    }

    #[test]
    fn test_clear() {
        let t0 = Instant::now();
        let mut tracker = ConditionTracker::new(Comparison::Below, 13.0);
        tracker.update(0.0, t0);
        tracker.clear();

        assert_eq!(tracker.active_for(t0 + secs(10.0)), None);
        assert!(!tracker.sustained(t0 + secs(10.0), Duration::ZERO));
    }
}
