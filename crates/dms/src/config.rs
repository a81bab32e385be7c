//! DMS configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::DmsError;

/// What the head tracker sees on frames without a detected pose
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeadAbsencePolicy {
    /// Leave the head tracker untouched
    #[default]
    Freeze,
    /// Feed a zero displacement, which clears an active head condition
    FeedZero,
}

/// DMS configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DmsConfig {
    /// Eyelid distance below which the eye counts as closed
    pub eye_threshold: f64,

    /// Head displacement above which the head counts as drooping
    pub head_threshold: f64,

    /// Hand movement below which the hand counts as still
    pub hand_threshold: f64,

    /// Eye closure must persist this long (seconds)
    pub eye_sustain_secs: f64,

    /// Head droop must persist this long (seconds)
    pub head_sustain_secs: f64,

    /// Hand stillness must persist this long (seconds)
    pub hand_sustain_secs: f64,

    /// Trailing window of hand samples (seconds)
    pub hand_window_secs: f64,

    /// Face mesh index of the upper eyelid point
    pub upper_eyelid_index: usize,

    /// Face mesh index of the lower eyelid point
    pub lower_eyelid_index: usize,

    /// Pose index of the nose
    pub nose_index: usize,

    /// Hand joint used for movement tracking
    pub hand_joint_index: usize,

    /// Multiplier applied to the normalized nose displacement
    pub head_scale: f64,

    /// Multiplier applied to the mean hand step length
    pub hand_scale: f64,

    pub head_absence: HeadAbsencePolicy,
}

impl Default for DmsConfig {
    fn default() -> Self {
        Self {
            eye_threshold: 0.015,
            head_threshold: 150.0,
            hand_threshold: 13.0,
            eye_sustain_secs: 5.0,
            head_sustain_secs: 4.0,
            hand_sustain_secs: 5.0,
            hand_window_secs: 5.0,
            // Left eye, MediaPipe face mesh
            upper_eyelid_index: 386,
            lower_eyelid_index: 374,
            nose_index: 0,
            // Middle finger PIP joint
            hand_joint_index: 10,
            head_scale: 1000.0,
            hand_scale: 1000.0,
            head_absence: HeadAbsencePolicy::Freeze,
        }
    }
}

impl DmsConfig {
    pub fn eye_sustain(&self) -> Duration {
        Duration::from_secs_f64(self.eye_sustain_secs)
    }

    pub fn head_sustain(&self) -> Duration {
        Duration::from_secs_f64(self.head_sustain_secs)
    }

    pub fn hand_sustain(&self) -> Duration {
        Duration::from_secs_f64(self.hand_sustain_secs)
    }

    pub fn hand_window(&self) -> Duration {
        Duration::from_secs_f64(self.hand_window_secs)
    }

    /// Reject configurations that cannot be turned into durations
    pub fn validate(&self) -> Result<(), DmsError> {
        let durations = [
            ("eye_sustain_secs", self.eye_sustain_secs),
            ("head_sustain_secs", self.head_sustain_secs),
            ("hand_sustain_secs", self.hand_sustain_secs),
            ("hand_window_secs", self.hand_window_secs),
        ];
        for (name, value) in durations {
            if Duration::try_from_secs_f64(value).is_err() {
                return Err(DmsError::Config(format!(
                    "{} must be a representable non-negative number of seconds, got {}",
                    name, value
                )));
            }
        }

        let thresholds = [
            ("eye_threshold", self.eye_threshold),
            ("head_threshold", self.head_threshold),
            ("hand_threshold", self.hand_threshold),
            ("head_scale", self.head_scale),
            ("hand_scale", self.hand_scale),
        ];
        for (name, value) in thresholds {
            if !value.is_finite() {
                return Err(DmsError::Config(format!("{} must be finite", name)));
            }
        }

        Ok(())
    }
}
