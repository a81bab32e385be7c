//! Drowsiness Routes

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::AppState;

/// Response for the detection endpoint
#[derive(Debug, Serialize, Deserialize)]
pub struct DrowsinessResponse {
    pub detected: bool,
    /// `"HAND + EYE"`, `"HAND + HEAD"`, or empty
    pub reason: String,
}

/// Current alert state
pub async fn detect(State(state): State<Arc<AppState>>) -> Json<DrowsinessResponse> {
    let drowsiness = state.store.drowsiness();
    Json(DrowsinessResponse {
        detected: drowsiness.is_detected(),
        reason: drowsiness.reason_str().to_string(),
    })
}

/// Acknowledge the alert and restart condition tracking
pub async fn clear(State(state): State<Arc<AppState>>) -> &'static str {
    state.store.clear_drowsiness();
    "Cleared"
}
