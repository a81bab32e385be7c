//! Hand movement smoothing

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use landmark_source::Point;

/// Timestamped hand position
#[derive(Debug, Clone, Copy)]
pub struct HandSample {
    pub position: Point,
    pub at: Instant,
}

/// Time-bounded history of hand positions
#[derive(Debug, Clone)]
pub struct HandHistory {
    samples: VecDeque<HandSample>,
    window: Duration,
    scale: f64,
}

impl HandHistory {
    pub fn new(window: Duration, scale: f64) -> Self {
        Self {
            samples: VecDeque::new(),
            window,
            scale,
        }
    }

    /// Record this cycle's hand position (if any) and drop stale samples.
    ///
    /// Samples older than the window relative to `now` are evicted even when
    /// no hand was seen, so the history decays while the hand is out of view.
    pub fn observe(&mut self, position: Option<Point>, now: Instant) {
        if let Some(position) = position {
            self.samples.push_back(HandSample { position, at: now });
        }
        self.evict(now);
    }

    fn evict(&mut self, now: Instant) {
        while let Some(oldest) = self.samples.front() {
            if now.saturating_duration_since(oldest.at) > self.window {
                self.samples.pop_front();
            } else {
                break;
            }
        }
    }

    /// Mean step length between consecutive samples, scaled.
    ///
    /// Zero with fewer than two samples.
    pub fn movement(&self) -> f64 {
        if self.samples.len() < 2 {
            return 0.0;
        }

        let total: f64 = self
            .samples
            .iter()
            .zip(self.samples.iter().skip(1))
            .map(|(a, b)| a.position.distance(&b.position))
            .sum();

        total / (self.samples.len() - 1) as f64 * self.scale
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn oldest(&self) -> Option<&HandSample> {
        self.samples.front()
    }

    pub fn newest(&self) -> Option<&HandSample> {
        self.samples.back()
    }

    pub fn clear(&mut self) {
        self.samples.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn history() -> HandHistory {
        HandHistory::new(Duration::from_secs(5), 1000.0)
    }

    #[test]
    fn test_single_sample_is_still() {
        let mut h = history();
        h.observe(Some(Point::new(0.5, 0.5)), Instant::now());
        assert_eq!(h.movement(), 0.0);
    }

    #[test]
    fn test_mean_step_length() {
        let t0 = Instant::now();
        let mut h = history();
        h.observe(Some(Point::new(0.0, 0.0)), t0);
        h.observe(Some(Point::new(0.003, 0.004)), t0 + Duration::from_millis(100));
        h.observe(Some(Point::new(0.003, 0.004)), t0 + Duration::from_millis(200));

        // steps: 0.005 and 0.0 -> mean 0.0025 -> x1000
        assert!((h.movement() - 2.5).abs() < 1e-9);
    }

    #[test]
    fn test_absent_hand_still_evicts() {
        let t0 = Instant::now();
        let mut h = history();
        h.observe(Some(Point::new(0.1, 0.1)), t0);
        h.observe(Some(Point::new(0.2, 0.1)), t0 + Duration::from_secs(1));
        assert_eq!(h.len(), 2);

        h.observe(None, t0 + Duration::from_millis(5500));
        assert_eq!(h.len(), 1);

        h.observe(None, t0 + Duration::from_millis(6500));
        assert!(h.is_empty());
        assert_eq!(h.movement(), 0.0);
    }

    #[test]
    fn test_sample_exactly_at_window_edge_is_kept() {
        let t0 = Instant::now();
        let mut h = history();
        h.observe(Some(Point::new(0.1, 0.1)), t0);
        h.observe(Some(Point::new(0.1, 0.1)), t0 + Duration::from_secs(5));
        assert_eq!(h.len(), 2);
    }

    proptest! {
        #[test]
        fn prop_window_never_exceeds_five_seconds(
            steps in proptest::collection::vec(
                (0u64..800, any::<bool>(), 0.0f64..1.0, 0.0f64..1.0),
                1..200,
            )
        ) {
            let t0 = Instant::now();
            let mut h = history();
            let mut elapsed = 0u64;

            for (dt_ms, present, x, y) in steps {
                elapsed += dt_ms;
                let now = t0 + Duration::from_millis(elapsed);
                let position = present.then(|| Point::new(x, y));
                h.observe(position, now);

                if let Some(oldest) = h.oldest() {
                    prop_assert!(now.duration_since(oldest.at) <= Duration::from_secs(5));
                }
                if let (Some(oldest), Some(newest)) = (h.oldest(), h.newest()) {
                    prop_assert!(newest.at.duration_since(oldest.at) <= Duration::from_secs(5));
                }
                prop_assert!(h.movement() >= 0.0);
            }
        }
    }
}
