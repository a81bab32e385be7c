//! Detection state tracking

use std::time::Instant;
use tracing::{debug, info};

use landmark_source::LandmarkFrame;

use crate::analysis::CycleAnalysis;
use crate::condition::{Comparison, ConditionTracker};
use crate::decision::{DrowsinessState, Sustained};
use crate::hand::HandHistory;
use crate::signals::{self, NoseBaseline};
use crate::{DmsConfig, DmsError, HeadAbsencePolicy};

/// Everything the sensing loop carries from one cycle to the next
#[derive(Debug, Clone)]
pub struct DetectionState {
    config: DmsConfig,
    eye: ConditionTracker,
    head: ConditionTracker,
    hand: ConditionTracker,
    hand_history: HandHistory,
    nose_baseline: NoseBaseline,
    drowsiness: DrowsinessState,
}

impl DetectionState {
    pub fn new(config: DmsConfig) -> Result<Self, DmsError> {
        config.validate()?;
        Ok(Self {
            eye: ConditionTracker::new(Comparison::Below, config.eye_threshold),
            head: ConditionTracker::new(Comparison::Above, config.head_threshold),
            hand: ConditionTracker::new(Comparison::Below, config.hand_threshold),
            hand_history: HandHistory::new(config.hand_window(), config.hand_scale),
            nose_baseline: NoseBaseline::default(),
            drowsiness: DrowsinessState::Clear,
            config,
        })
    }

    /// Run one sensing cycle.
    ///
    /// Trackers always update. The decision rule only runs while the session
    /// timer is running and no alert is latched.
    pub fn process(&mut self, frame: &LandmarkFrame, timer_running: bool) -> CycleAnalysis {
        let now = frame.captured_at;

        // Eye
        let eye_openness = signals::eye_openness(frame.face.as_ref(), &self.config);
        self.eye.update(eye_openness, now);
        debug!("[EYE] EAR (top-bottom distance): {:.3}", eye_openness);

        // Head
        let head_displacement = signals::nose_y(frame.pose.as_ref(), &self.config)
            .map(|y| self.nose_baseline.displacement(y, self.config.head_scale));
        match (head_displacement, self.config.head_absence) {
            (Some(dy), _) => {
                self.head.update(dy, now);
                debug!("[HEAD] DY: {:.2}", dy);
            }
            (None, HeadAbsencePolicy::FeedZero) => {
                self.head.update(0.0, now);
            }
            (None, HeadAbsencePolicy::Freeze) => {}
        }

        // Hand
        let hand_point = signals::hand_point(frame.hand.as_ref(), &self.config);
        self.hand_history.observe(hand_point, now);
        let hand_movement = if hand_point.is_some() {
            self.hand_history.movement()
        } else {
            0.0
        };
        self.hand.update(hand_movement, now);
        debug!("[HAND] Movement: {:.2}", hand_movement);

        let eye_active = self.eye.active_for(now);
        let head_active = self.head.active_for(now);
        let hand_active = self.hand.active_for(now);
        if let Some(d) = eye_active {
            debug!("[EYE] condition duration: {:.1}s", d.as_secs_f64());
        }
        if let Some(d) = head_active {
            debug!("[HEAD] condition duration: {:.1}s", d.as_secs_f64());
        }
        if let Some(d) = hand_active {
            debug!("[HAND] condition duration: {:.1}s", d.as_secs_f64());
        }

        let evaluated = timer_running && !self.drowsiness.is_detected();
        let mut sustained = Sustained::default();
        let mut newly_detected = None;

        if evaluated {
            sustained = Sustained::measure(&self.eye, &self.head, &self.hand, &self.config, now);
            if let Some(reason) = sustained.decide() {
                self.drowsiness = DrowsinessState::Latched(reason);
                newly_detected = Some(reason);
                info!("=== DROWSINESS DETECTED: {} ===", reason);
            }
        }

        CycleAnalysis {
            eye_openness,
            head_displacement,
            hand_movement,
            eye_active_secs: eye_active.map(|d| d.as_secs_f64()),
            head_active_secs: head_active.map(|d| d.as_secs_f64()),
            hand_active_secs: hand_active.map(|d| d.as_secs_f64()),
            evaluated,
            sustained,
            newly_detected,
            state: self.drowsiness,
        }
    }

    /// Acknowledge the alert and restart all condition runs
    pub fn clear_drowsiness(&mut self) {
        self.drowsiness = DrowsinessState::Clear;
        self.clear_trackers();
    }

    /// Full reset: alert, trackers, hand history and nose baseline
    pub fn reset(&mut self) {
        self.clear_drowsiness();
        self.hand_history.clear();
        self.nose_baseline.reset();
    }

    fn clear_trackers(&mut self) {
        self.eye.clear();
        self.head.clear();
        self.hand.clear();
    }

    pub fn drowsiness(&self) -> DrowsinessState {
        self.drowsiness
    }

    pub fn eye(&self) -> &ConditionTracker {
        &self.eye
    }

    pub fn head(&self) -> &ConditionTracker {
        &self.head
    }

    pub fn hand(&self) -> &ConditionTracker {
        &self.hand
    }

    pub fn hand_history(&self) -> &HandHistory {
        &self.hand_history
    }

    pub fn nose_baseline(&self) -> Option<f64> {
        self.nose_baseline.value()
    }

    pub fn config(&self) -> &DmsConfig {
        &self.config
    }

    /// Whether any condition tracker is currently active
    pub fn any_condition_active(&self) -> bool {
        self.eye.is_active() || self.head.is_active() || self.hand.is_active()
    }
}
