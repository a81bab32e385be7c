//! Drowsiness decision and alert latch

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Instant;

use crate::condition::ConditionTracker;
use crate::DmsConfig;

/// Which evidence accompanied hand stillness
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DrowsinessReason {
    HandEye,
    HandHead,
}

impl DrowsinessReason {
    /// Wire representation
    pub fn as_str(&self) -> &'static str {
        match self {
            DrowsinessReason::HandEye => "HAND + EYE",
            DrowsinessReason::HandHead => "HAND + HEAD",
        }
    }
}

impl fmt::Display for DrowsinessReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Alert state. Once latched, only an explicit clear releases it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DrowsinessState {
    #[default]
    Clear,
    Latched(DrowsinessReason),
}

impl DrowsinessState {
    pub fn is_detected(&self) -> bool {
        matches!(self, DrowsinessState::Latched(_))
    }

    pub fn reason(&self) -> Option<DrowsinessReason> {
        match self {
            DrowsinessState::Clear => None,
            DrowsinessState::Latched(reason) => Some(*reason),
        }
    }

    /// Reason text, empty while clear
    pub fn reason_str(&self) -> &'static str {
        self.reason().map(|r| r.as_str()).unwrap_or("")
    }
}

/// Trackers that have held long enough this cycle
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sustained {
    pub eye: bool,
    pub head: bool,
    pub hand: bool,
}

impl Sustained {
    pub fn measure(
        eye: &ConditionTracker,
        head: &ConditionTracker,
        hand: &ConditionTracker,
        config: &DmsConfig,
        now: Instant,
    ) -> Self {
        Self {
            eye: eye.sustained(now, config.eye_sustain()),
            head: head.sustained(now, config.head_sustain()),
            hand: hand.sustained(now, config.hand_sustain()),
        }
    }

    /// Hand stillness plus eye or head evidence.
    ///
    /// Eye wins when both eye and head qualify.
    pub fn decide(&self) -> Option<DrowsinessReason> {
        if !self.hand {
            return None;
        }
        if self.eye {
            Some(DrowsinessReason::HandEye)
        } else if self.head {
            Some(DrowsinessReason::HandHead)
        } else {
            None
        }
    }
}
