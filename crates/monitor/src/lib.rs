//! Drowsiness Monitor Runtime
//!
//! Owns the single shared state store and the two long-running workers
//! that mutate it besides the control surface:
//! - Sensing loop (one cycle per landmark frame, dedicated thread)
//! - Ticker (refreshes the presented session time once per second)

mod sensing;
mod store;
mod ticker;

pub use sensing::{SensingHandle, SensingLoop, SensingStats};
pub use store::{ConditionFlags, MonitorSnapshot, MonitorState, SharedStore};
pub use ticker::spawn_ticker;

use std::time::Instant;
use thiserror::Error;

/// Monitor error types
#[derive(Error, Debug)]
pub enum MonitorError {
    #[error("Failed to spawn sensing thread: {0}")]
    Spawn(#[from] std::io::Error),

    #[error("Sensing thread panicked")]
    SensingPanicked,
}

/// Current instant on the runtime clock.
///
/// Follows tokio's clock, so paused-time tests see virtual time here too.
pub fn now() -> Instant {
    tokio::time::Instant::now().into_std()
}
