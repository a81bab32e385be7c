//! Session Timer Routes

use axum::{extract::rejection::JsonRejection, extract::State, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

use crate::{AppState, ApiError};

/// Response for the time endpoint
#[derive(Debug, Serialize, Deserialize)]
pub struct TimeResponse {
    pub time: String,
}

/// Body of a time update
#[derive(Debug, Deserialize)]
pub struct TimeUpdate {
    pub time: String,
}

/// Start the session timer
pub async fn start(State(state): State<Arc<AppState>>) -> &'static str {
    if state.store.start(monitor::now()) {
        info!("[API] Timer started");
    }
    "Started"
}

/// Stop the session timer
pub async fn stop(State(state): State<Arc<AppState>>) -> &'static str {
    if state.store.stop(monitor::now()) {
        info!("[API] Timer stopped");
    }
    "Stopped"
}

/// Reset the timer and all detection state
pub async fn reset(State(state): State<Arc<AppState>>) -> &'static str {
    state.store.reset();
    "Reset"
}

/// Current elapsed session time
pub async fn get_time(State(state): State<Arc<AppState>>) -> Json<TimeResponse> {
    Json(TimeResponse {
        time: state.store.get_time(monitor::now()),
    })
}

/// Overwrite the elapsed session time
pub async fn update_time(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<TimeUpdate>, JsonRejection>,
) -> Result<&'static str, ApiError> {
    let Json(update) = payload.map_err(|e| ApiError::InvalidBody(e.body_text()))?;
    state.store.update_time(&update.time, monitor::now())?;
    info!("[RECEIVED TIME] {}", update.time);
    Ok("Time updated")
}
