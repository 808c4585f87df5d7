//! Wiring shared by `run` and `replay`.

use std::path::Path;

use anyhow::Context;
use handmouse_capture_engine::{SessionOutcome, SessionStats};
use handmouse_common::clock::SessionClock;
use handmouse_common::config::AppConfig;
use handmouse_gesture_core::InterpreterMode;
use handmouse_hand_model::ActionLogHeader;
use handmouse_input_driver::{ActionExecutor, ActionLogWriter, InputBackend, ScreenshotStore};

/// The OS input backend.
#[cfg(feature = "live")]
pub fn live_backend() -> anyhow::Result<Box<dyn InputBackend>> {
    Ok(Box::new(handmouse_input_driver::EnigoBackend::new()?))
}

#[cfg(not(feature = "live"))]
pub fn live_backend() -> anyhow::Result<Box<dyn InputBackend>> {
    anyhow::bail!("built without the `live` feature; use --dry-run or rebuild with --features live")
}

/// Executor writing screenshots to the configured directory and, when
/// `log_actions` is set, every emitted action to that file.
pub fn executor(
    config: &AppConfig,
    backend: Box<dyn InputBackend>,
    mode: InterpreterMode,
    log_actions: Option<&Path>,
) -> anyhow::Result<ActionExecutor> {
    let executor = ActionExecutor::new(backend, ScreenshotStore::new(&config.screenshots.dir))?;
    let Some(path) = log_actions else {
        return Ok(executor);
    };

    let screen = executor.screen();
    let header = ActionLogHeader {
        schema_version: "1.0".to_string(),
        epoch_wall: SessionClock::start().epoch_wall().to_string(),
        mode: mode.as_str().to_string(),
        screen_width: screen.width,
        screen_height: screen.height,
    };
    let log = ActionLogWriter::new(path.to_path_buf(), header)
        .with_context(|| format!("Failed to create action log {}", path.display()))?;
    println!("  Action log: {}", path.display());
    Ok(executor.with_log(log))
}

pub fn print_summary(outcome: SessionOutcome, stats: SessionStats) {
    let reason = match outcome {
        SessionOutcome::StopGesture => "stop gesture",
        SessionOutcome::ExitKey => "exit key",
        SessionOutcome::Interrupted => "interrupted",
        SessionOutcome::SourceExhausted => "end of input",
    };
    println!();
    println!("Session ended ({reason})");
    println!("  Frames: {}", stats.frames);
    println!("  Missed frames: {}", stats.missed_frames);
    println!("  Detector errors: {}", stats.detector_errors);
    println!("  Actions: {}", stats.actions);
}
