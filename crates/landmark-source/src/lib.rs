//! Landmark Sources for Drowsiness Monitoring
//!
//! The perception layer (face mesh, hand and pose models) lives outside this
//! workspace. This crate defines what it hands over each sensing cycle and
//! ships two adapters:
//! - Replay of a recorded session (JSON lines, paced in real time)
//! - Channel fed by an external perception process

pub mod channel;
pub mod frame;
pub mod replay;

pub use channel::ChannelSource;
pub use frame::{LandmarkFrame, LandmarkSet, Point};
pub use replay::ReplaySource;

use thiserror::Error;

/// Landmark source error types
#[derive(Error, Debug)]
pub enum SourceError {
    /// No frame this cycle; the caller is expected to try again
    #[error("Frame unavailable: {0}")]
    Unavailable(String),

    /// The source will never produce another frame
    #[error("Landmark source closed")]
    Closed,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed recording at line {line}: {reason}")]
    Parse { line: usize, reason: String },
}

/// Producer of per-cycle landmark frames.
///
/// `next_frame` blocks until a frame is available (or the source gives up on
/// this cycle). It is called once per sensing cycle from a dedicated thread.
pub trait LandmarkSource: Send {
    fn next_frame(&mut self) -> Result<LandmarkFrame, SourceError>;
}
