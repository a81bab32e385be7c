//! Landmark frame types

use serde::{Deserialize, Serialize};
use std::time::Instant;

/// Normalized 2D landmark position.
///
/// Coordinates are relative to the image (0..1), with `y` growing downward.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point
    pub fn distance(&self, other: &Point) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }
}

impl From<[f64; 2]> for Point {
    fn from(p: [f64; 2]) -> Self {
        Self { x: p[0], y: p[1] }
    }
}

/// Ordered landmark positions produced by one detector for one frame
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LandmarkSet(Vec<Point>);

impl LandmarkSet {
    pub fn new(points: Vec<Point>) -> Self {
        Self(points)
    }

    /// Landmark at `index`, if the set is long enough to contain it
    pub fn get(&self, index: usize) -> Option<Point> {
        self.0.get(index).copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn points(&self) -> &[Point] {
        &self.0
    }
}

impl From<Vec<Point>> for LandmarkSet {
    fn from(points: Vec<Point>) -> Self {
        Self(points)
    }
}

/// Perception output for a single sensing cycle.
///
/// Each set is `None` when its detector found nothing in the frame.
#[derive(Debug, Clone)]
pub struct LandmarkFrame {
    /// Face mesh landmarks
    pub face: Option<LandmarkSet>,
    /// Landmarks of the first detected hand
    pub hand: Option<LandmarkSet>,
    /// Body pose landmarks
    pub pose: Option<LandmarkSet>,
    /// Capture time of the underlying camera frame
    pub captured_at: Instant,
}

impl LandmarkFrame {
    /// Frame with no detections at all
    pub fn empty(captured_at: Instant) -> Self {
        Self {
            face: None,
            hand: None,
            pose: None,
            captured_at,
        }
    }

    pub fn with_face(mut self, face: LandmarkSet) -> Self {
        self.face = Some(face);
        self
    }

    pub fn with_hand(mut self, hand: LandmarkSet) -> Self {
        self.hand = Some(hand);
        self
    }

    pub fn with_pose(mut self, pose: LandmarkSet) -> Self {
        self.pose = Some(pose);
        self
    }

    /// Whether any detector produced landmarks
    pub fn has_detections(&self) -> bool {
        self.face.is_some() || self.hand.is_some() || self.pose.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_distance() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(0.3, 0.4);
        assert!((a.distance(&b) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_landmark_set_out_of_range() {
        let set = LandmarkSet::new(vec![Point::new(0.1, 0.2)]);
        assert_eq!(set.get(0), Some(Point::new(0.1, 0.2)));
        assert_eq!(set.get(1), None);
    }

    #[test]
    fn test_landmark_set_deserializes_from_pairs() {
        let set: LandmarkSet = serde_json::from_str(r#"[{"x":0.5,"y":0.25}]"#).unwrap();
        assert_eq!(set.len(), 1);
        assert_eq!(set.get(0).unwrap().y, 0.25);
    }

    #[test]
    fn test_empty_frame() {
        let frame = LandmarkFrame::empty(Instant::now());
        assert!(!frame.has_detections());
        let frame = frame.with_hand(LandmarkSet::default());
        assert!(frame.has_detections());
    }
}
