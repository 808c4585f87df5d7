//! Replay of recorded landmark sessions.
//!
//! A replay file is JSONL, one [`FrameObservation`] per line, with blank and
//! `#` lines ignored. Replays drive the exact same loop as a live camera, so
//! they double as regression fixtures.

use std::collections::VecDeque;
use std::path::Path;
use std::time::Duration;

use handmouse_common::error::{HandmouseError, HandmouseResult};
use handmouse_hand_model::{parse_observations, FrameObservation};

use crate::camera::{Frame, FrameRead, FrameSource};

/// Frame source backed by recorded observations.
pub struct ReplaySource {
    frames: VecDeque<FrameObservation>,
    seq: u64,
    realtime: bool,
    last_t: Option<f64>,
    released: bool,
}

impl ReplaySource {
    pub fn new(frames: Vec<FrameObservation>) -> Self {
        Self {
            frames: frames.into(),
            seq: 0,
            realtime: false,
            last_t: None,
            released: false,
        }
    }

    /// Load a JSONL replay file.
    pub fn open(path: &Path) -> HandmouseResult<Self> {
        if !path.exists() {
            return Err(HandmouseError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        let content = std::fs::read_to_string(path)?;
        let frames = parse_observations(&content)?;
        tracing::info!(path = %path.display(), frames = frames.len(), "Replay loaded");
        Ok(Self::new(frames))
    }

    /// Sleep between frames so they are delivered at their recorded pace.
    pub fn realtime(mut self, realtime: bool) -> Self {
        self.realtime = realtime;
        self
    }

    /// Frames not yet delivered.
    pub fn remaining(&self) -> usize {
        self.frames.len()
    }
}

impl FrameSource for ReplaySource {
    fn name(&self) -> &str {
        "replay"
    }

    fn read(&mut self) -> HandmouseResult<FrameRead> {
        if self.released {
            return Ok(FrameRead::Exhausted);
        }
        let Some(obs) = self.frames.pop_front() else {
            return Ok(FrameRead::Exhausted);
        };

        if self.realtime {
            if let Some(last) = self.last_t {
                let gap = obs.t - last;
                if gap > 0.0 {
                    std::thread::sleep(Duration::from_secs_f64(gap));
                }
            }
        }
        self.last_t = Some(obs.t);

        let seq = self.seq;
        self.seq += 1;
        Ok(FrameRead::Frame(Frame::with_landmarks(
            seq, obs.t, obs.width, obs.height, obs.hands,
        )))
    }

    fn release(&mut self) {
        if !self.released {
            tracing::debug!(remaining = self.frames.len(), "Replay released");
        }
        self.frames.clear();
        self.released = true;
    }

    fn is_released(&self) -> bool {
        self.released
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use handmouse_hand_model::synthetic::SyntheticHand;
    use handmouse_hand_model::{serialize_observations, HandSide};

    #[test]
    fn open_reads_jsonl_and_ends_exhausted() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.jsonl");
        let frames = vec![
            FrameObservation::new(0.0, 640, 480, vec![SyntheticHand::new(HandSide::Left).build()]),
            FrameObservation::empty(0.5, 640, 480),
        ];
        let body = serialize_observations(&frames).unwrap();
        std::fs::write(&path, format!("# recorded by a test\n\n{body}")).unwrap();

        let mut source = ReplaySource::open(&path).unwrap();
        assert_eq!(source.remaining(), 2);

        let FrameRead::Frame(first) = source.read().unwrap() else {
            panic!("expected a frame");
        };
        assert_eq!(first.seq, 0);
        let FrameRead::Frame(second) = source.read().unwrap() else {
            panic!("expected a frame");
        };
        assert_eq!((second.seq, second.t), (1, 0.5));
        assert!(matches!(source.read().unwrap(), FrameRead::Exhausted));
    }

    #[test]
    fn missing_file_is_reported() {
        let err = ReplaySource::open(Path::new("/nonexistent/replay.jsonl"))
            .err()
            .unwrap();
        assert!(matches!(err, HandmouseError::FileNotFound { .. }));
    }

    #[test]
    fn release_drops_pending_frames() {
        let mut source = ReplaySource::new(vec![FrameObservation::empty(0.0, 640, 480)]);
        source.release();
        assert!(source.is_released());
        assert_eq!(source.remaining(), 0);
        assert!(matches!(source.read().unwrap(), FrameRead::Exhausted));
    }
}
