//! Session timer state machine

use serde::Serialize;
use std::time::{Duration, Instant};
use tracing::debug;

use crate::format_hms;

/// Timer phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TimerPhase {
    /// Not running, elapsed frozen
    Idle,
    /// Elapsed advancing
    Running,
}

/// Read-only view of the timer
#[derive(Debug, Clone, Serialize)]
pub struct TimerSnapshot {
    pub phase: TimerPhase,
    pub elapsed_secs: u64,
    pub formatted: String,
}

/// Run/stop elapsed-time clock
///
/// While running, elapsed time is `elapsed_before_stop + (now - started_at)`;
/// while idle it is `elapsed_before_stop`. `current_elapsed` caches the last
/// value computed by [`SessionTimer::refresh`] for presentation.
#[derive(Debug, Clone, Default)]
pub struct SessionTimer {
    started_at: Option<Instant>,
    elapsed_before_stop: Duration,
    current_elapsed: Duration,
}

impl SessionTimer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_running(&self) -> bool {
        self.started_at.is_some()
    }

    pub fn phase(&self) -> TimerPhase {
        if self.is_running() {
            TimerPhase::Running
        } else {
            TimerPhase::Idle
        }
    }

    /// Idle -> Running. Returns false if already running.
    pub fn start(&mut self, now: Instant) -> bool {
        if self.is_running() {
            return false;
        }
        self.started_at = Some(now);
        self.current_elapsed = self.elapsed_before_stop;
        true
    }

    /// Running -> Idle, folding the run into the accumulated total.
    /// Returns false if not running.
    pub fn stop(&mut self, now: Instant) -> bool {
        let Some(started_at) = self.started_at.take() else {
            return false;
        };
        self.elapsed_before_stop = self
            .elapsed_before_stop
            .saturating_add(now.saturating_duration_since(started_at));
        self.current_elapsed = self.elapsed_before_stop;
        debug!("Run folded, total {}", format_hms(self.elapsed_before_stop));
        true
    }

    /// Any state -> Idle with all counters zeroed
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Overwrite the accumulated elapsed time without changing phase.
    ///
    /// A running timer restarts its current run at `now`, so it reads
    /// exactly `elapsed` at that instant and keeps counting from there.
    /// Keeping the old `started_at` would add the run so far on top of the
    /// value the operator just set.
    pub fn set_elapsed(&mut self, elapsed: Duration, now: Instant) {
        self.elapsed_before_stop = elapsed;
        if self.started_at.is_some() {
            self.started_at = Some(now);
        }
        self.current_elapsed = elapsed;
        debug!("Timer set to {}", format_hms(elapsed));
    }

    /// Elapsed time as of `now`
    pub fn elapsed(&self, now: Instant) -> Duration {
        match self.started_at {
            Some(started_at) => self
                .elapsed_before_stop
                .saturating_add(now.saturating_duration_since(started_at)),
            None => self.elapsed_before_stop,
        }
    }

    /// Recompute the presented elapsed time; no state transition
    pub fn refresh(&mut self, now: Instant) -> Duration {
        self.current_elapsed = self.elapsed(now);
        self.current_elapsed
    }

    /// Last refreshed elapsed time
    pub fn current_elapsed(&self) -> Duration {
        self.current_elapsed
    }

    pub fn elapsed_before_stop(&self) -> Duration {
        self.elapsed_before_stop
    }

    pub fn snapshot(&self) -> TimerSnapshot {
        TimerSnapshot {
            phase: self.phase(),
            elapsed_secs: self.current_elapsed.as_secs(),
            formatted: format_hms(self.current_elapsed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secs(s: u64) -> Duration {
        Duration::from_secs(s)
    }

    #[test]
    fn test_start_stop_accumulates() {
        let t0 = Instant::now();
        let mut timer = SessionTimer::new();

        assert!(timer.start(t0));
        assert!(timer.stop(t0 + secs(3)));
        assert_eq!(timer.current_elapsed(), secs(3));
        assert_eq!(format_hms(timer.current_elapsed()), "00:00:03");

        // Idle time does not count
        assert!(timer.start(t0 + secs(10)));
        assert_eq!(timer.elapsed(t0 + secs(12)), secs(5));
        assert!(timer.stop(t0 + secs(12)));
        assert_eq!(timer.elapsed(t0 + secs(100)), secs(5));
    }

    #[test]
    fn test_start_and_stop_are_idempotent() {
        let t0 = Instant::now();
        let mut timer = SessionTimer::new();

        assert!(!timer.stop(t0));
        assert!(timer.start(t0));
        assert!(!timer.start(t0 + secs(2)));
        assert_eq!(timer.elapsed(t0 + secs(4)), secs(4));

        assert!(timer.stop(t0 + secs(4)));
        assert!(!timer.stop(t0 + secs(6)));
        assert_eq!(timer.elapsed_before_stop(), secs(4));
    }

    #[test]
    fn test_refresh_tracks_running_time() {
        let t0 = Instant::now();
        let mut timer = SessionTimer::new();
        timer.start(t0);

        assert_eq!(timer.refresh(t0 + secs(1)), secs(1));
        assert_eq!(timer.refresh(t0 + secs(2)), secs(2));
        assert_eq!(timer.phase(), TimerPhase::Running);
    }

    #[test]
    fn test_set_elapsed_while_idle() {
        let t0 = Instant::now();
        let mut timer = SessionTimer::new();
        timer.start(t0);
        timer.stop(t0 + secs(42));

        timer.set_elapsed(secs(3600), t0 + secs(50));
        assert!(!timer.is_running());
        assert_eq!(format_hms(timer.current_elapsed()), "01:00:00");
        assert_eq!(timer.elapsed(t0 + secs(500)), secs(3600));
    }

    #[test]
    fn test_set_elapsed_while_running() {
        let t0 = Instant::now();
        let mut timer = SessionTimer::new();
        timer.start(t0);

        timer.set_elapsed(secs(3600), t0 + secs(20));
        assert!(timer.is_running());
        assert_eq!(timer.refresh(t0 + secs(20)), secs(3600));
        assert_eq!(timer.refresh(t0 + secs(25)), secs(3605));
    }

    #[test]
    fn test_reset() {
        let t0 = Instant::now();
        let mut timer = SessionTimer::new();
        timer.start(t0);
        timer.refresh(t0 + secs(9));

        timer.reset();
        assert!(!timer.is_running());
        assert_eq!(timer.current_elapsed(), Duration::ZERO);
        assert_eq!(timer.elapsed(t0 + secs(20)), Duration::ZERO);
    }

    #[test]
    fn test_snapshot() {
        let t0 = Instant::now();
        let mut timer = SessionTimer::new();
        timer.set_elapsed(secs(61), t0);

        let snap = timer.snapshot();
        assert_eq!(snap.phase, TimerPhase::Idle);
        assert_eq!(snap.elapsed_secs, 61);
        assert_eq!(snap.formatted, "00:01:01");
    }

    #[test]
    fn test_running_near_duration_max_saturates() {
        let t0 = Instant::now();
        let mut timer = SessionTimer::new();
        timer.start(t0);
        timer.set_elapsed(Duration::MAX - secs(5), t0);

        assert_eq!(timer.refresh(t0 + secs(20)), Duration::MAX);
        assert!(timer.stop(t0 + secs(30)));
        assert_eq!(timer.elapsed_before_stop(), Duration::MAX);

        assert!(timer.start(t0 + secs(40)));
        assert_eq!(timer.elapsed(t0 + secs(50)), Duration::MAX);
        assert!(!timer.snapshot().formatted.is_empty());
    }
}
