//! Per-frame observations.
//!
//! One `FrameObservation` is everything the interpreter sees for a single
//! camera frame. Replay files store one observation per line (JSONL); lines
//! starting with `#` are headers or comments.

use serde::{Deserialize, Serialize};

use crate::landmark::{HandObservation, HandSide};

/// Hands detected in one frame, with the frame geometry they were measured in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameObservation {
    /// Seconds since session start.
    pub t: f64,

    /// Frame width in pixels.
    pub width: u32,

    /// Frame height in pixels.
    pub height: u32,

    /// Detected hands, in detector order.
    #[serde(default)]
    pub hands: Vec<HandObservation>,
}

impl FrameObservation {
    pub fn new(t: f64, width: u32, height: u32, hands: Vec<HandObservation>) -> Self {
        Self {
            t,
            width,
            height,
            hands,
        }
    }

    /// A frame in which no hand was detected.
    pub fn empty(t: f64, width: u32, height: u32) -> Self {
        Self::new(t, width, height, Vec::new())
    }

    /// Hands carrying the given side label.
    pub fn hands_on(&self, side: HandSide) -> impl Iterator<Item = &HandObservation> {
        self.hands.iter().filter(move |hand| hand.side() == side)
    }

    /// Whether any hand carries the given side label.
    pub fn has_side(&self, side: HandSide) -> bool {
        self.hands_on(side).next().is_some()
    }
}

/// Parse observations from JSONL content (one JSON object per line).
pub fn parse_observations(jsonl: &str) -> Result<Vec<FrameObservation>, serde_json::Error> {
    jsonl
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(serde_json::from_str)
        .collect()
}

/// Serialize observations to JSONL format.
pub fn serialize_observations(frames: &[FrameObservation]) -> Result<String, serde_json::Error> {
    let mut output = String::new();
    for frame in frames {
        output.push_str(&serde_json::to_string(frame)?);
        output.push('\n');
    }
    Ok(output)
}
