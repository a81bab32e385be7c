//! Shared state store
//!
//! One mutex guards the timer and the detection state together, so every
//! operation observes and leaves both in a consistent state. The lock is
//! only held for the duration of a single operation.

use serde::Serialize;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};
use tracing::info;

use dms::{CycleAnalysis, DetectionState, DrowsinessState};
use landmark_source::LandmarkFrame;
use session_timer::{format_hms, parse_hms, SessionTimer, TimeParseError, TimerSnapshot};

/// State protected by the store lock
#[derive(Debug)]
pub struct MonitorState {
    pub timer: SessionTimer,
    pub detection: DetectionState,
}

/// Which condition trackers are active
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ConditionFlags {
    pub eye: bool,
    pub head: bool,
    pub hand: bool,
}

impl ConditionFlags {
    fn of(detection: &DetectionState) -> Self {
        Self {
            eye: detection.eye().is_active(),
            head: detection.head().is_active(),
            hand: detection.hand().is_active(),
        }
    }

    pub fn any(&self) -> bool {
        self.eye || self.head || self.hand
    }
}

/// Consistent view of the whole store
#[derive(Debug, Clone, Serialize)]
pub struct MonitorSnapshot {
    pub timer: TimerSnapshot,
    pub detected: bool,
    pub reason: String,
    pub conditions: ConditionFlags,
}

/// Cloneable handle to the shared monitor state
#[derive(Debug, Clone)]
pub struct SharedStore {
    inner: Arc<Mutex<MonitorState>>,
}

impl SharedStore {
    pub fn new(detection: DetectionState) -> Self {
        Self {
            inner: Arc::new(Mutex::new(MonitorState {
                timer: SessionTimer::new(),
                detection,
            })),
        }
    }

    fn lock(&self) -> MutexGuard<'_, MonitorState> {
        // A panic in another holder leaves plain data behind; keep serving it.
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// One sensing cycle
    pub fn process_frame(&self, frame: &LandmarkFrame) -> CycleAnalysis {
        let analysis = {
            let mut state = self.lock();
            let running = state.timer.is_running();
            state.detection.process(frame, running)
        };
        if analysis.newly_detected.is_some() {
            metrics::counter!("drowsiness_detections_total").increment(1);
        }
        analysis
    }

    /// Ticker hook: refresh the presented elapsed time
    pub fn tick(&self, now: Instant) -> Duration {
        let elapsed = self.lock().timer.refresh(now);
        metrics::gauge!("session_elapsed_seconds").set(elapsed.as_secs_f64());
        elapsed
    }

    /// Start the session timer; false if it was already running
    pub fn start(&self, now: Instant) -> bool {
        self.lock().timer.start(now)
    }

    /// Stop the session timer; false if it was not running
    pub fn stop(&self, now: Instant) -> bool {
        self.lock().timer.stop(now)
    }

    /// Full reset: timer, alert and all detection history
    pub fn reset(&self) {
        let mut state = self.lock();
        state.timer.reset();
        state.detection.reset();
        info!("[RESET] System reset");
    }

    /// Acknowledge the alert; the timer is untouched
    pub fn clear_drowsiness(&self) {
        self.lock().detection.clear_drowsiness();
        info!("[CLEAR] Drowsiness state cleared");
    }

    /// Elapsed session time as `HH:MM:SS`
    pub fn get_time(&self, now: Instant) -> String {
        format_hms(self.lock().timer.refresh(now))
    }

    /// Overwrite the elapsed session time from `HH:MM:SS`
    pub fn update_time(&self, text: &str, now: Instant) -> Result<Duration, TimeParseError> {
        let elapsed = parse_hms(text)?;
        self.lock().timer.set_elapsed(elapsed, now);
        Ok(elapsed)
    }

    pub fn drowsiness(&self) -> DrowsinessState {
        self.lock().detection.drowsiness()
    }

    pub fn is_running(&self) -> bool {
        self.lock().timer.is_running()
    }

    pub fn conditions(&self) -> ConditionFlags {
        ConditionFlags::of(&self.lock().detection)
    }

    pub fn snapshot(&self) -> MonitorSnapshot {
        let state = self.lock();
        let drowsiness = state.detection.drowsiness();
        MonitorSnapshot {
            timer: state.timer.snapshot(),
            detected: drowsiness.is_detected(),
            reason: drowsiness.reason_str().to_string(),
            conditions: ConditionFlags::of(&state.detection),
        }
    }
}
