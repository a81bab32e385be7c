//! Per-cycle analysis results

use serde::{Deserialize, Serialize};

use crate::decision::{DrowsinessReason, DrowsinessState, Sustained};

/// Snapshot of one sensing cycle
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CycleAnalysis {
    /// Eyelid distance (0 without a face)
    pub eye_openness: f64,

    /// Scaled nose displacement, absent without a pose
    #[serde(skip_serializing_if = "Option::is_none")]
    pub head_displacement: Option<f64>,

    /// Smoothed hand movement
    pub hand_movement: f64,

    /// How long each condition has held (seconds)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub eye_active_secs: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub head_active_secs: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hand_active_secs: Option<f64>,

    /// Whether the decision rule ran this cycle
    pub evaluated: bool,

    /// Sustained conditions seen by the decision rule
    pub sustained: Sustained,

    /// Set on the cycle that latched the alert
    #[serde(skip_serializing_if = "Option::is_none")]
    pub newly_detected: Option<DrowsinessReason>,

    /// Alert state after this cycle
    pub state: DrowsinessState,
}

impl CycleAnalysis {
    pub fn is_drowsy(&self) -> bool {
        self.state.is_detected()
    }
}
