//! Gesture session management.
//!
//! One session = one pass of the frame loop: read a frame, detect hands,
//! interpret, apply actions, refresh the preview, poll the exit key.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use handmouse_common::error::HandmouseResult;
use handmouse_gesture_core::GestureMapper;
use handmouse_hand_model::FrameObservation;
use handmouse_input_driver::ActionExecutor;

use crate::camera::{Frame, FrameRead, FrameSource};
use crate::detector::HandDetector;
use crate::preview::{HeadlessPreview, Overlay, PreviewWindow, ESC_KEY};

/// Why a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionOutcome {
    /// The exit gesture was held.
    StopGesture,
    /// ESC was pressed in the preview window.
    ExitKey,
    /// The shared stop flag was set (e.g. Ctrl-C).
    Interrupted,
    /// The frame source has no more frames.
    SourceExhausted,
}

/// Counters reported when a session ends.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionStats {
    pub frames: u64,
    pub missed_frames: u64,
    pub detector_errors: u64,
    pub actions: u64,
}

/// A gesture session that owns the source, preview, and action executor.
pub struct GestureSession {
    source: Box<dyn FrameSource>,
    detector: Box<dyn HandDetector>,
    mapper: Box<dyn GestureMapper>,
    executor: ActionExecutor,
    preview: Box<dyn PreviewWindow>,
    stop_flag: Arc<AtomicBool>,
    stats: SessionStats,
}

impl GestureSession {
    /// Create a headless session.
    pub fn new(
        source: Box<dyn FrameSource>,
        detector: Box<dyn HandDetector>,
        mapper: Box<dyn GestureMapper>,
        executor: ActionExecutor,
    ) -> Self {
        Self {
            source,
            detector,
            mapper,
            executor,
            preview: Box::new(HeadlessPreview::new()),
            stop_flag: Arc::new(AtomicBool::new(false)),
            stats: SessionStats::default(),
        }
    }

    pub fn with_preview(mut self, preview: Box<dyn PreviewWindow>) -> Self {
        self.preview = preview;
        self
    }

    /// Share an externally owned stop flag.
    pub fn with_stop_flag(mut self, stop_flag: Arc<AtomicBool>) -> Self {
        self.stop_flag = stop_flag;
        self
    }

    /// The flag that interrupts the loop when set.
    pub fn stop_flag(&self) -> Arc<AtomicBool> {
        self.stop_flag.clone()
    }

    pub fn stats(&self) -> SessionStats {
        self.stats
    }

    pub fn source(&self) -> &dyn FrameSource {
        self.source.as_ref()
    }

    pub fn executor(&self) -> &ActionExecutor {
        &self.executor
    }

    /// Run until a stop condition, then release the source and window.
    ///
    /// Resources are released on every exit path, including errors.
    pub fn run(&mut self) -> HandmouseResult<SessionOutcome> {
        tracing::info!(
            source = self.source.name(),
            detector = self.detector.name(),
            mode = self.mapper.mode().as_str(),
            "Gesture session started"
        );

        let result = self.run_loop();
        self.release();

        match &result {
            Ok(outcome) => tracing::info!(
                ?outcome,
                frames = self.stats.frames,
                missed = self.stats.missed_frames,
                actions = self.stats.actions,
                "Gesture session ended"
            ),
            Err(e) => tracing::error!(error = %e, "Gesture session failed"),
        }
        result
    }

    fn run_loop(&mut self) -> HandmouseResult<SessionOutcome> {
        loop {
            if self.stop_flag.load(Ordering::Relaxed) {
                return Ok(SessionOutcome::Interrupted);
            }

            let frame = match self.source.read() {
                Ok(FrameRead::Frame(frame)) => frame,
                Ok(FrameRead::Missed) => {
                    self.stats.missed_frames += 1;
                    continue;
                }
                Ok(FrameRead::Exhausted) => return Ok(SessionOutcome::SourceExhausted),
                Err(e) => {
                    self.stats.missed_frames += 1;
                    tracing::warn!(error = %e, "Frame read failed");
                    continue;
                }
            };

            if self.process(&frame) {
                return Ok(SessionOutcome::StopGesture);
            }

            if self.preview.poll_key()? == Some(ESC_KEY) {
                tracing::info!("Exit key pressed");
                return Ok(SessionOutcome::ExitKey);
            }
        }
    }

    /// Handle one frame. Returns true when the stop gesture fired.
    fn process(&mut self, frame: &Frame) -> bool {
        self.stats.frames += 1;

        let hands = match self.detector.detect(frame) {
            Ok(hands) => hands,
            Err(e) => {
                self.stats.detector_errors += 1;
                tracing::warn!(seq = frame.seq, error = %e, "Hand detection failed");
                Vec::new()
            }
        };

        let observation = FrameObservation::new(frame.t, frame.width, frame.height, hands);
        let records = self.mapper.process(&observation);
        self.executor.apply_all(&records);
        self.stats.actions += records.len() as u64;

        let overlay = Overlay {
            labels: records.iter().map(|r| r.action.label()).collect(),
            stop_hold_secs: self.mapper.stop_hold_progress(frame.t),
        };
        if let Err(e) = self.preview.show(frame, &overlay) {
            tracing::warn!(error = %e, "Preview update failed");
        }

        records.iter().any(|r| r.action.is_stop())
    }

    /// Release the frame source and close the preview. Idempotent.
    pub fn release(&mut self) {
        self.source.release();
        self.preview.release();
        if let Err(e) = self.executor.flush() {
            tracing::warn!(error = %e, "Failed to flush action log");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detector::RecordedDetector;
    use crate::replay::ReplaySource;
    use handmouse_common::config::AppConfig;
    use handmouse_gesture_core::{build_mapper, InterpreterMode};
    use handmouse_hand_model::synthetic::SyntheticHand;
    use handmouse_hand_model::HandSide;
    use handmouse_input_driver::{RecordingBackend, ScreenshotStore};
    use handmouse_platform_core::ScreenGeometry;

    /// Source that misses a few reads before running dry.
    struct FlakySource {
        misses: u32,
        released: bool,
    }

    impl FrameSource for FlakySource {
        fn name(&self) -> &str {
            "flaky"
        }

        fn read(&mut self) -> HandmouseResult<FrameRead> {
            if self.misses == 0 {
                return Ok(FrameRead::Exhausted);
            }
            self.misses -= 1;
            if self.misses % 2 == 0 {
                Err(handmouse_common::HandmouseError::camera("usb hiccup"))
            } else {
                Ok(FrameRead::Missed)
            }
        }

        fn release(&mut self) {
            self.released = true;
        }

        fn is_released(&self) -> bool {
            self.released
        }
    }

    fn session(source: Box<dyn FrameSource>, screenshot_dir: &std::path::Path) -> GestureSession {
        let screen = ScreenGeometry::new(1920, 1080);
        let executor = ActionExecutor::new(
            Box::new(RecordingBackend::new(screen)),
            ScreenshotStore::new(screenshot_dir),
        )
        .unwrap();
        GestureSession::new(
            source,
            Box::new(RecordedDetector::default()),
            build_mapper(InterpreterMode::DualHand, &AppConfig::default(), screen),
            executor,
        )
    }

    #[test]
    fn missed_and_failed_reads_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = session(
            Box::new(FlakySource {
                misses: 4,
                released: false,
            }),
            dir.path(),
        );
        assert_eq!(session.run().unwrap(), SessionOutcome::SourceExhausted);
        assert_eq!(session.stats().missed_frames, 4);
        assert_eq!(session.stats().frames, 0);
        assert!(session.source().is_released());
    }

    #[test]
    fn stop_flag_interrupts_before_first_frame() {
        let dir = tempfile::tempdir().unwrap();
        let frames = vec![FrameObservation::empty(0.0, 640, 480); 3];
        let mut session = session(Box::new(ReplaySource::new(frames)), dir.path());
        session.stop_flag().store(true, Ordering::Relaxed);
        assert_eq!(session.run().unwrap(), SessionOutcome::Interrupted);
        assert_eq!(session.stats().frames, 0);
        assert!(session.source().is_released());
    }

    #[test]
    fn actions_are_counted() {
        let dir = tempfile::tempdir().unwrap();
        let pointer = SyntheticHand::new(HandSide::Right)
            .fingers([0, 1, 1, 0, 0])
            .build();
        let frames = vec![FrameObservation::new(0.0, 640, 480, vec![pointer])];
        let mut session = session(Box::new(ReplaySource::new(frames)), dir.path());
        assert_eq!(session.run().unwrap(), SessionOutcome::SourceExhausted);
        assert_eq!(session.stats().frames, 1);
        assert_eq!(session.stats().actions, 1);
        assert_eq!(session.executor().applied(), 1);
    }
}
