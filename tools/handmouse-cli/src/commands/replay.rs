//! Run a recorded landmark session through the interpreter.

use std::path::PathBuf;

use anyhow::Context;
use handmouse_capture_engine::{
    validate_settings, DetectorSettings, GestureSession, RecordedDetector, ReplaySource,
};
use handmouse_common::config::AppConfig;
use handmouse_gesture_core::{build_mapper, InterpreterMode};
use handmouse_input_driver::RecordingBackend;
use handmouse_platform_core::ScreenGeometry;

use super::session;

pub fn run(
    config: AppConfig,
    file: PathBuf,
    single_hand: bool,
    apply: bool,
    screen: String,
    realtime: bool,
) -> anyhow::Result<()> {
    let mode = if single_hand {
        InterpreterMode::SingleHand
    } else {
        InterpreterMode::DualHand
    };
    let screen = parse_screen(&screen)?;
    let source = ReplaySource::open(&file)
        .with_context(|| format!("Failed to load replay {}", file.display()))?
        .realtime(realtime);

    println!("Replaying {} ({} frames)", file.display(), source.remaining());
    println!("  Mode: {}", mode.as_str());

    let recorder = RecordingBackend::new(screen);
    let executor = if apply {
        session::executor(&config, session::live_backend()?, mode, None)?
    } else {
        session::executor(&config, Box::new(recorder.clone()), mode, None)?
    };
    let mapper = build_mapper(mode, &config, executor.screen());
    let settings = DetectorSettings::from(&config.detector);
    validate_settings(&settings)?;
    let detector = RecordedDetector::new(settings);

    let mut session = GestureSession::new(Box::new(source), Box::new(detector), mapper, executor);
    let outcome = session.run()?;

    if !apply {
        for call in recorder.calls() {
            println!("{}", serde_json::to_string(&call)?);
        }
    }
    session::print_summary(outcome, session.stats());
    Ok(())
}

/// Parse `WIDTHxHEIGHT`.
fn parse_screen(size: &str) -> anyhow::Result<ScreenGeometry> {
    let (w, h) = size
        .split_once(['x', 'X'])
        .with_context(|| format!("Screen size '{size}' is not WIDTHxHEIGHT"))?;
    let width: u32 = w.trim().parse().context("Invalid screen width")?;
    let height: u32 = h.trim().parse().context("Invalid screen height")?;
    if width == 0 || height == 0 {
        anyhow::bail!("Screen size must be non-zero, got {size}");
    }
    Ok(ScreenGeometry::new(width, height))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_screen_sizes() {
        let screen = parse_screen("1280x720").unwrap();
        assert_eq!((screen.width, screen.height), (1280, 720));
        assert_eq!(parse_screen("800X600").unwrap().height, 600);
        assert!(parse_screen("1280").is_err());
        assert!(parse_screen("0x720").is_err());
    }
}
