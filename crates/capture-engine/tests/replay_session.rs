//! End-to-end sessions driven by recorded landmarks.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use handmouse_capture_engine::{
    GestureSession, HeadlessPreview, RecordedDetector, ReplaySource, SessionOutcome, ESC_KEY,
};
use handmouse_common::config::AppConfig;
use handmouse_gesture_core::{build_mapper, InterpreterMode};
use handmouse_hand_model::synthetic::SyntheticHand;
use handmouse_hand_model::{
    ActionLogHeader, ActionRecord, Finger, FrameObservation, GestureAction, HandObservation,
    HandSide, MouseButton,
};
use handmouse_input_driver::{
    ActionExecutor, ActionLogWriter, InputCall, RecordingBackend, ScreenshotStore,
};
use handmouse_platform_core::ScreenGeometry;

const SCREEN: ScreenGeometry = ScreenGeometry {
    width: 1920,
    height: 1080,
};

fn frames(secs: f64, hands: impl Fn() -> Vec<HandObservation>) -> Vec<FrameObservation> {
    let count = (secs * 30.0).round() as usize;
    (0..count)
        .map(|i| FrameObservation::new(i as f64 / 30.0, 640, 480, hands()))
        .collect()
}

fn left_fist() -> HandObservation {
    SyntheticHand::new(HandSide::Left).build()
}

fn pointer() -> HandObservation {
    SyntheticHand::new(HandSide::Right)
        .fingers([0, 1, 1, 0, 0])
        .build()
}

fn session(
    frames: Vec<FrameObservation>,
    mode: InterpreterMode,
    backend: &RecordingBackend,
    screenshot_dir: &std::path::Path,
) -> GestureSession {
    let executor = ActionExecutor::new(
        Box::new(backend.clone()),
        ScreenshotStore::new(screenshot_dir),
    )
    .unwrap();
    GestureSession::new(
        Box::new(ReplaySource::new(frames)),
        Box::new(RecordedDetector::default()),
        build_mapper(mode, &AppConfig::default(), SCREEN),
        executor,
    )
}

#[test]
fn held_fist_stops_session_and_releases_source() {
    let dir = tempfile::tempdir().unwrap();
    let backend = RecordingBackend::new(SCREEN);
    let mut session = session(
        frames(3.0, || vec![left_fist()]),
        InterpreterMode::DualHand,
        &backend,
        dir.path(),
    );

    assert_eq!(session.run().unwrap(), SessionOutcome::StopGesture);
    assert!(session.source().is_released());
    // Stop arrives after two seconds of fist, well before the recording ends.
    let stats = session.stats();
    assert!((61..=63).contains(&stats.frames), "frames: {}", stats.frames);
    assert_eq!(stats.actions, 1);
    // Stop is never forwarded to the OS.
    assert!(backend.calls().is_empty());
}

#[test]
fn exhausted_replay_ends_session() {
    let dir = tempfile::tempdir().unwrap();
    let backend = RecordingBackend::new(SCREEN);
    let mut session = session(
        frames(0.5, || vec![pointer()]),
        InterpreterMode::DualHand,
        &backend,
        dir.path(),
    );

    assert_eq!(session.run().unwrap(), SessionOutcome::SourceExhausted);
    assert!(session.source().is_released());

    let calls = backend.calls();
    assert_eq!(calls.len(), 15);
    assert!(calls
        .iter()
        .all(|call| matches!(call, InputCall::MoveCursor { .. })));
}

#[test]
fn escape_key_ends_session() {
    let dir = tempfile::tempdir().unwrap();
    let backend = RecordingBackend::new(SCREEN);
    let mut session = session(
        frames(1.0, Vec::new),
        InterpreterMode::DualHand,
        &backend,
        dir.path(),
    )
    .with_preview(Box::new(HeadlessPreview::with_keys([
        None,
        Some(b'q' as i32),
        Some(ESC_KEY),
    ])));

    assert_eq!(session.run().unwrap(), SessionOutcome::ExitKey);
    assert_eq!(session.stats().frames, 3);
    assert!(session.source().is_released());
}

#[test]
fn shared_stop_flag_interrupts() {
    let dir = tempfile::tempdir().unwrap();
    let backend = RecordingBackend::new(SCREEN);
    let flag = Arc::new(AtomicBool::new(true));
    let mut session = session(
        frames(1.0, || vec![pointer()]),
        InterpreterMode::SingleHand,
        &backend,
        dir.path(),
    )
    .with_stop_flag(flag.clone());

    assert_eq!(session.run().unwrap(), SessionOutcome::Interrupted);
    assert!(flag.load(Ordering::Relaxed));
    assert!(backend.calls().is_empty());
}

#[test]
fn single_hand_pinch_drags_and_logs() {
    let dir = tempfile::tempdir().unwrap();
    let log_path = dir.path().join("actions.jsonl");
    let backend = RecordingBackend::new(SCREEN);

    // Hold still for two seconds so the cursor settles on the index tip,
    // pinch for three frames, then open the hand.
    let pinch = SyntheticHand::new(HandSide::Right)
        .fingers([0, 1, 0, 0, 0])
        .thumb_touching(Finger::Index)
        .build();
    let open = SyntheticHand::new(HandSide::Right)
        .fingers([0, 1, 0, 0, 0])
        .build();
    let recording: Vec<FrameObservation> = (0..65)
        .map(|i| {
            let hand = if (60..63).contains(&i) {
                pinch.clone()
            } else {
                open.clone()
            };
            FrameObservation::new(i as f64 / 30.0, 640, 480, vec![hand])
        })
        .collect();

    let header = ActionLogHeader {
        schema_version: "1.0".to_string(),
        epoch_wall: "2026-01-01T00:00:00Z".to_string(),
        mode: InterpreterMode::SingleHand.as_str().to_string(),
        screen_width: SCREEN.width,
        screen_height: SCREEN.height,
    };
    let log = ActionLogWriter::new(log_path.clone(), header).unwrap();

    let executor = ActionExecutor::new(
        Box::new(backend.clone()),
        ScreenshotStore::new(dir.path().join("shots")),
    )
    .unwrap()
    .with_log(log);
    let mut session = GestureSession::new(
        Box::new(ReplaySource::new(recording)),
        Box::new(RecordedDetector::default()),
        build_mapper(InterpreterMode::SingleHand, &AppConfig::default(), SCREEN),
        executor,
    );
    assert_eq!(session.run().unwrap(), SessionOutcome::SourceExhausted);

    let calls = backend.calls();
    let downs = calls.iter().filter(|c| **c == InputCall::MouseDown).count();
    let ups = calls.iter().filter(|c| **c == InputCall::MouseUp).count();
    assert_eq!((downs, ups), (1, 1));
    assert!(calls.contains(&InputCall::Click {
        button: MouseButton::Left
    }));

    // Session release flushes the log.
    let content = std::fs::read_to_string(&log_path).unwrap();
    let mut lines = content.lines();
    assert!(lines.next().unwrap().starts_with("# "));
    let logged: Vec<GestureAction> = lines
        .map(|line| {
            serde_json::from_str::<ActionRecord>(line)
                .unwrap()
                .action
        })
        .collect();
    assert!(logged.contains(&GestureAction::MouseDown));
    assert!(logged.contains(&GestureAction::MouseUp));
}
