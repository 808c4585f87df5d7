//! Start a live gesture session.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use handmouse_capture_engine::{
    validate_settings, DetectorSettings, GestureSession, RecordedDetector, SessionOutcome,
    SessionStats, UdpLandmarkSource,
};
use handmouse_common::config::AppConfig;
use handmouse_gesture_core::{build_mapper, GestureMapper, InterpreterMode};
use handmouse_input_driver::{ActionExecutor, DryRunBackend, InputBackend};
use handmouse_platform_core::ScreenGeometry;

use super::session;
use crate::InputSource;

pub async fn run(
    config: AppConfig,
    single_hand: bool,
    input: InputSource,
    bind: Option<String>,
    log_actions: Option<PathBuf>,
    dry_run: bool,
) -> anyhow::Result<()> {
    let mode = if single_hand {
        InterpreterMode::SingleHand
    } else {
        InterpreterMode::DualHand
    };
    let bind = bind.unwrap_or_else(|| config.detector.udp_bind.clone());
    let addr: SocketAddr = bind
        .parse()
        .with_context(|| format!("Invalid bind address '{bind}'"))?;

    println!("Starting gesture session");
    println!("  Mode: {}", mode.as_str());
    println!("  Input: {input:?} ({addr})");
    println!("  Dry run: {dry_run}");

    let stop_flag = Arc::new(AtomicBool::new(false));
    let ctrl_c_flag = stop_flag.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Ctrl-C received, stopping session");
            ctrl_c_flag.store(true, Ordering::Relaxed);
        }
    });

    if mode == InterpreterMode::DualHand {
        println!("Hold a left fist for two seconds or press Ctrl+C to stop.");
    } else {
        println!("Press Ctrl+C to stop.");
    }

    // The frame loop blocks; keep it off the async workers.
    let (outcome, stats) = tokio::task::spawn_blocking(move || {
        run_blocking(&config, mode, input, addr, log_actions, dry_run, stop_flag)
    })
    .await??;

    session::print_summary(outcome, stats);
    Ok(())
}

fn run_blocking(
    config: &AppConfig,
    mode: InterpreterMode,
    input: InputSource,
    addr: SocketAddr,
    log_actions: Option<PathBuf>,
    dry_run: bool,
    stop_flag: Arc<AtomicBool>,
) -> anyhow::Result<(SessionOutcome, SessionStats)> {
    let backend: Box<dyn InputBackend> = if dry_run {
        Box::new(DryRunBackend::new(ScreenGeometry::default()))
    } else {
        session::live_backend()?
    };
    let executor = session::executor(config, backend, mode, log_actions.as_deref())?;
    let mapper = build_mapper(mode, config, executor.screen());
    let settings = DetectorSettings::from(&config.detector);
    validate_settings(&settings)?;

    let session = match input {
        InputSource::Udp => {
            let timeout = Duration::from_millis(config.detector.read_timeout_ms);
            let source = UdpLandmarkSource::bind(addr, timeout, settings.clone())?;
            GestureSession::new(
                Box::new(source),
                Box::new(RecordedDetector::new(settings)),
                mapper,
                executor,
            )
        }
        InputSource::Camera => camera_session(config, mode, addr, settings, mapper, executor)?,
    };

    let mut session = session.with_stop_flag(stop_flag);
    let outcome = session.run()?;
    Ok((outcome, session.stats()))
}

/// Landmarks older than this are not paired with a camera frame.
#[cfg(feature = "opencv")]
const MAX_LANDMARK_AGE: Duration = Duration::from_millis(500);

#[cfg(feature = "opencv")]
fn camera_session(
    config: &AppConfig,
    mode: InterpreterMode,
    addr: SocketAddr,
    settings: DetectorSettings,
    mapper: Box<dyn GestureMapper>,
    executor: ActionExecutor,
) -> anyhow::Result<GestureSession> {
    use handmouse_capture_engine::backend::{HighGuiPreview, OpenCvCameraOpener};
    use handmouse_capture_engine::{open_first_available, UdpLandmarkDetector};

    // Mirroring makes the user's right hand appear on the right; the
    // single-hand interpreter expects the raw image.
    let flip = mode == InterpreterMode::DualHand && config.camera.flip_horizontal;
    let mut opener = OpenCvCameraOpener::new(&config.camera, flip);
    let (index, camera) = open_first_available(&mut opener, config.camera.probe_count)?;
    println!("  Camera: index {index}");

    // The tracker sees the unflipped camera, so its landmarks follow the flip.
    let detector = UdpLandmarkDetector::bind(addr, MAX_LANDMARK_AGE, settings)?.mirrored(flip);
    let preview = HighGuiPreview::new("handmouse")?;
    Ok(
        GestureSession::new(Box::new(camera), Box::new(detector), mapper, executor)
            .with_preview(Box::new(preview)),
    )
}

#[cfg(not(feature = "opencv"))]
fn camera_session(
    _config: &AppConfig,
    _mode: InterpreterMode,
    _addr: SocketAddr,
    _settings: DetectorSettings,
    _mapper: Box<dyn GestureMapper>,
    _executor: ActionExecutor,
) -> anyhow::Result<GestureSession> {
    anyhow::bail!(
        "camera input needs the `opencv` feature; rebuild with --features opencv or use --input udp"
    )
}
