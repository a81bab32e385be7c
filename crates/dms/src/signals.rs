//! Signal extraction from landmark sets

use landmark_source::{LandmarkSet, Point};

use crate::DmsConfig;

/// Eye openness proxy: distance between the upper and lower eyelid points.
///
/// A single vertical distance, not a full eye aspect ratio. Returns 0 when
/// there is no face, so a missing face reads as a closed eye.
pub fn eye_openness(face: Option<&LandmarkSet>, config: &DmsConfig) -> f64 {
    let Some(face) = face else {
        return 0.0;
    };
    match (
        face.get(config.upper_eyelid_index),
        face.get(config.lower_eyelid_index),
    ) {
        (Some(top), Some(bottom)) => top.distance(&bottom),
        _ => 0.0,
    }
}

/// Vertical coordinate of the nose, if a pose with a nose landmark is present
pub fn nose_y(pose: Option<&LandmarkSet>, config: &DmsConfig) -> Option<f64> {
    pose.and_then(|p| p.get(config.nose_index)).map(|nose| nose.y)
}

/// Tracked hand joint, if a hand with that joint is present
pub fn hand_point(hand: Option<&LandmarkSet>, config: &DmsConfig) -> Option<Point> {
    hand.and_then(|h| h.get(config.hand_joint_index))
}

/// First observed nose height, the zero reference for head droop
#[derive(Debug, Clone, Copy, Default)]
pub struct NoseBaseline {
    baseline: Option<f64>,
}

impl NoseBaseline {
    /// Scaled displacement of `nose_y` from the baseline.
    ///
    /// The first call fixes the baseline and returns 0. Positive values mean
    /// the head moved down in image coordinates.
    pub fn displacement(&mut self, nose_y: f64, scale: f64) -> f64 {
        let base = *self.baseline.get_or_insert(nose_y);
        (nose_y - base) * scale
    }

    pub fn value(&self) -> Option<f64> {
        self.baseline
    }

    pub fn reset(&mut self) {
        self.baseline = None;
    }
}
