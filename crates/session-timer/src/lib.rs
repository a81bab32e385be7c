//! Session Timer
//!
//! Start/stop elapsed-time clock driven by operator commands, plus the
//! `HH:MM:SS` text format used on the control surface.

mod clock;
mod timer;

pub use clock::{format_hms, parse_hms, MAX_HOURS};
pub use timer::{SessionTimer, TimerPhase, TimerSnapshot};

use thiserror::Error;

/// Errors parsing an `HH:MM:SS` value
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimeParseError {
    #[error("expected HH:MM:SS, got {0} field(s)")]
    FieldCount(usize),

    #[error("{field} is not a number: {value:?}")]
    InvalidNumber { field: &'static str, value: String },

    #[error("{field} value {value} is out of range [0, {max}]")]
    OutOfRange {
        field: &'static str,
        value: u64,
        max: u64,
    },
}
