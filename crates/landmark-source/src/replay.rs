//! Replay of recorded landmark sessions
//!
//! A recording is a JSON-lines file, one frame per line:
//!
//! ```text
//! {"offset_ms": 0, "face": [[0.41, 0.33], ...], "hand": null, "pose": [[0.5, 0.2], ...]}
//! ```
//!
//! `offset_ms` is relative to the start of the recording and must not decrease.

use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::time::{Duration, Instant};
use tracing::{debug, info};

use crate::{LandmarkFrame, LandmarkSet, LandmarkSource, Point, SourceError};

/// One line of a recording
#[derive(Debug, Clone, Deserialize)]
struct RecordedFrame {
    offset_ms: u64,
    #[serde(default)]
    face: Option<Vec<[f64; 2]>>,
    #[serde(default)]
    hand: Option<Vec<[f64; 2]>>,
    #[serde(default)]
    pose: Option<Vec<[f64; 2]>>,
}

fn to_set(points: &Option<Vec<[f64; 2]>>) -> Option<LandmarkSet> {
    points
        .as_ref()
        .map(|pts| LandmarkSet::new(pts.iter().copied().map(Point::from).collect()))
}

/// Plays a recording back in real time
pub struct ReplaySource {
    frames: Vec<RecordedFrame>,
    cursor: usize,
    looping: bool,
    /// Wall-clock instant corresponding to `offset_ms == 0` of the current pass
    origin: Option<Instant>,
}

impl ReplaySource {
    /// Load a recording from disk
    pub fn open(path: impl AsRef<Path>, looping: bool) -> Result<Self, SourceError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)?;
        let source = Self::parse(&text, looping)?;
        info!(
            "Loaded {} recorded frames from {}",
            source.frames.len(),
            path.display()
        );
        Ok(source)
    }

    /// Parse a recording held in memory
    pub fn parse(text: &str, looping: bool) -> Result<Self, SourceError> {
        let mut frames = Vec::new();
        let mut last_offset = 0;

        for (idx, line) in text.lines().enumerate() {
            let line_no = idx + 1;
            if line.trim().is_empty() {
                continue;
            }
            let frame: RecordedFrame =
                serde_json::from_str(line).map_err(|e| SourceError::Parse {
                    line: line_no,
                    reason: e.to_string(),
                })?;
            if frame.offset_ms < last_offset {
                return Err(SourceError::Parse {
                    line: line_no,
                    reason: format!(
                        "offset_ms {} goes backwards (previous {})",
                        frame.offset_ms, last_offset
                    ),
                });
            }
            last_offset = frame.offset_ms;
            frames.push(frame);
        }

        Ok(Self {
            frames,
            cursor: 0,
            looping,
            origin: None,
        })
    }

    /// Number of frames in the recording
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

impl LandmarkSource for ReplaySource {
    fn next_frame(&mut self) -> Result<LandmarkFrame, SourceError> {
        if self.cursor >= self.frames.len() {
            if !self.looping || self.frames.is_empty() {
                return Err(SourceError::Closed);
            }
            debug!("Recording finished, restarting replay");
            self.cursor = 0;
            self.origin = None;
        }

        let origin = *self.origin.get_or_insert_with(Instant::now);
        let recorded = &self.frames[self.cursor];
        self.cursor += 1;

        let due = origin + Duration::from_millis(recorded.offset_ms);
        let now = Instant::now();
        if due > now {
            std::thread::sleep(due - now);
        }

        Ok(LandmarkFrame {
            face: to_set(&recorded.face),
            hand: to_set(&recorded.hand),
            pose: to_set(&recorded.pose),
            captured_at: due,
        })
    }
}
