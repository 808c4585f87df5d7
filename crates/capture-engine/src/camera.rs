//! Frame sources and camera probing.

use handmouse_common::error::{HandmouseError, HandmouseResult};
use handmouse_hand_model::HandObservation;

/// What a frame carries.
#[derive(Debug)]
pub enum FrameData {
    /// Landmarks already computed upstream (landmark stream or recording).
    Landmarks(Vec<HandObservation>),

    /// Raw BGR camera image, still to be run through a detector.
    #[cfg(feature = "opencv")]
    Image(opencv::core::Mat),
}

/// One captured frame. Dropped once the interpreter has seen it.
#[derive(Debug)]
pub struct Frame {
    /// Sequence number assigned by the source, starting at 0.
    pub seq: u64,
    pub width: u32,
    pub height: u32,
    /// Capture time in seconds since the source was opened.
    pub t: f64,
    pub data: FrameData,
}

impl Frame {
    /// Frame carrying pre-computed landmarks.
    pub fn with_landmarks(
        seq: u64,
        t: f64,
        width: u32,
        height: u32,
        hands: Vec<HandObservation>,
    ) -> Self {
        Self {
            seq,
            width,
            height,
            t,
            data: FrameData::Landmarks(hands),
        }
    }
}

/// Result of one read attempt.
#[derive(Debug)]
pub enum FrameRead {
    Frame(Frame),
    /// Transient failure; skip and try again next pass.
    Missed,
    /// No more frames will ever arrive (end of a recording).
    Exhausted,
}

/// Trait for anything that produces frames.
pub trait FrameSource {
    /// Source name for logging.
    fn name(&self) -> &str;

    /// Read the next frame. Blocks until a frame, a miss, or the end.
    fn read(&mut self) -> HandmouseResult<FrameRead>;

    /// Release the underlying device. Must be idempotent.
    fn release(&mut self);

    fn is_released(&self) -> bool;
}

/// Opens a camera by device index.
pub trait CameraOpener {
    type Source: FrameSource;

    fn open(&mut self, index: u32) -> HandmouseResult<Self::Source>;
}

/// Probe device indices `0..probe_count` in order and return the first
/// camera that opens, together with its index.
pub fn open_first_available<O: CameraOpener>(
    opener: &mut O,
    probe_count: u32,
) -> HandmouseResult<(u32, O::Source)> {
    let mut tried = Vec::new();
    for index in 0..probe_count {
        tried.push(index);
        match opener.open(index) {
            Ok(source) => {
                tracing::info!(index, source = source.name(), "Camera opened");
                return Ok((index, source));
            }
            Err(e) => {
                tracing::debug!(index, error = %e, "Camera index unavailable");
            }
        }
    }
    Err(HandmouseError::NoCamera { tried })
}
