//! Drowsiness Monitoring (DMS)
//!
//! Fuses three behavioral signals taken from perception landmarks:
//! - Eye closure (eyelid distance)
//! - Head droop (nose height against a first-seen baseline)
//! - Hand stillness (smoothed movement of one hand joint)
//!
//! Hand stillness plus either eye or head evidence, each sustained long
//! enough, latches a drowsiness alert until it is explicitly cleared.

pub mod analysis;
pub mod condition;
pub mod config;
pub mod decision;
pub mod hand;
pub mod signals;
pub mod state;

pub use analysis::CycleAnalysis;
pub use condition::{Comparison, ConditionTracker};
pub use config::{DmsConfig, HeadAbsencePolicy};
pub use decision::{DrowsinessReason, DrowsinessState, Sustained};
pub use hand::{HandHistory, HandSample};
pub use signals::NoseBaseline;
pub use state::DetectionState;

use thiserror::Error;

/// DMS error types
#[derive(Error, Debug)]
pub enum DmsError {
    #[error("Configuration error: {0}")]
    Config(String),
}
