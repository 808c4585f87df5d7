//! Applies interpreter output to an input backend.

use handmouse_common::error::HandmouseResult;
use handmouse_hand_model::{ActionRecord, GestureAction};
use handmouse_platform_core::ScreenGeometry;

use crate::screenshot::ScreenshotStore;
use crate::writer::ActionLogWriter;
use crate::InputBackend;

/// Executes gesture actions on the OS, fire-and-forget.
///
/// Backend failures are logged and never stop the session; the next frame
/// simply tries again. Action log failures never keep an action from the
/// backend.
pub struct ActionExecutor {
    backend: Box<dyn InputBackend>,
    screen: ScreenGeometry,
    screenshots: ScreenshotStore,
    log: Option<ActionLogWriter>,
    applied: u64,
    failed: u64,
    log_failures: u64,
}

impl ActionExecutor {
    /// Create an executor, querying the backend for the screen size.
    pub fn new(
        backend: Box<dyn InputBackend>,
        screenshots: ScreenshotStore,
    ) -> HandmouseResult<Self> {
        let screen = backend.screen_size()?;
        tracing::info!(
            backend = backend.name(),
            width = screen.width,
            height = screen.height,
            "Input backend ready"
        );
        Ok(Self {
            backend,
            screen,
            screenshots,
            log: None,
            applied: 0,
            failed: 0,
            log_failures: 0,
        })
    }

    /// Also append every emitted action to `log`, whether or not the
    /// backend call succeeds.
    pub fn with_log(mut self, log: ActionLogWriter) -> Self {
        self.log = Some(log);
        self
    }

    pub fn screen(&self) -> ScreenGeometry {
        self.screen
    }

    /// Apply every record in order, logging failures.
    pub fn apply_all(&mut self, records: &[ActionRecord]) {
        for record in records {
            if let Err(e) = self.apply(record) {
                self.failed += 1;
                tracing::warn!(
                    action = record.action.label(),
                    error = %e,
                    "Failed to apply gesture action"
                );
            }
        }
    }

    /// Apply one record.
    pub fn apply(&mut self, record: &ActionRecord) -> HandmouseResult<()> {
        if let Some(log) = self.log.as_mut() {
            if let Err(e) = log.write_action(record) {
                self.log_failures += 1;
                if self.log_failures == 1 {
                    tracing::warn!(
                        path = %log.path().display(),
                        error = %e,
                        "Action log write failed, continuing without it"
                    );
                } else {
                    tracing::debug!(error = %e, failures = self.log_failures, "Action log write failed");
                }
            }
        }

        let backend = self.backend.as_mut();
        match record.action {
            GestureAction::MoveCursor { x, y } => {
                let (x, y) = self.screen.clamp(x, y);
                backend.move_cursor(x.round() as i32, y.round() as i32)?;
            }
            GestureAction::Click { button } => backend.click(button)?,
            GestureAction::DoubleClick => backend.double_click()?,
            GestureAction::MouseDown => backend.mouse_down()?,
            GestureAction::MouseUp => backend.mouse_up()?,
            GestureAction::Scroll { delta } => backend.scroll(delta)?,
            GestureAction::Hotkey { hotkey } => backend.hotkey(hotkey)?,
            GestureAction::Screenshot => {
                self.screenshots.capture(backend)?;
            }
            // The session loop handles stopping.
            GestureAction::Stop => {}
        }

        if !matches!(record.action, GestureAction::MoveCursor { .. }) {
            tracing::info!(t = record.t, hand = ?record.hand, "{}", record.action.label());
        }
        self.applied += 1;
        Ok(())
    }

    /// Number of actions applied successfully.
    pub fn applied(&self) -> u64 {
        self.applied
    }

    /// Number of actions whose backend call failed.
    pub fn failed(&self) -> u64 {
        self.failed
    }

    /// Number of actions the action log failed to record.
    pub fn log_failures(&self) -> u64 {
        self.log_failures
    }

    /// Flush the action log, if any.
    pub fn flush(&mut self) -> HandmouseResult<()> {
        match self.log.as_mut() {
            Some(log) => log.flush(),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{InputCall, RecordingBackend};
    use handmouse_hand_model::{ActionLogHeader, HandSide, Hotkey, MouseButton};
    use std::path::Path;

    struct FailingBackend;

    impl InputBackend for FailingBackend {
        fn name(&self) -> &str {
            "failing"
        }
        fn screen_size(&self) -> HandmouseResult<ScreenGeometry> {
            Ok(ScreenGeometry::default())
        }
        fn move_cursor(&mut self, _x: i32, _y: i32) -> HandmouseResult<()> {
            Err(handmouse_common::error::HandmouseError::input("no display"))
        }
        fn click(&mut self, _button: MouseButton) -> HandmouseResult<()> {
            Err(handmouse_common::error::HandmouseError::input("no display"))
        }
        fn double_click(&mut self) -> HandmouseResult<()> {
            Ok(())
        }
        fn mouse_down(&mut self) -> HandmouseResult<()> {
            Ok(())
        }
        fn mouse_up(&mut self) -> HandmouseResult<()> {
            Ok(())
        }
        fn scroll(&mut self, _delta: i32) -> HandmouseResult<()> {
            Ok(())
        }
        fn hotkey(&mut self, _hotkey: Hotkey) -> HandmouseResult<()> {
            Ok(())
        }
        fn screenshot(&mut self, _path: &Path) -> HandmouseResult<()> {
            Ok(())
        }
    }

    fn record(action: GestureAction) -> ActionRecord {
        ActionRecord {
            t: 0.0,
            hand: Some(HandSide::Right),
            action,
        }
    }

    fn executor(handle: &RecordingBackend, dir: &Path) -> ActionExecutor {
        ActionExecutor::new(Box::new(handle.clone()), ScreenshotStore::new(dir)).unwrap()
    }

    #[test]
    fn moves_are_clamped_and_rounded() {
        let dir = tempfile::tempdir().unwrap();
        let handle = RecordingBackend::new(ScreenGeometry::new(1920, 1080));
        let mut exec = executor(&handle, dir.path());

        exec.apply_all(&[
            record(GestureAction::MoveCursor { x: 100.6, y: 20.2 }),
            record(GestureAction::MoveCursor {
                x: 2500.0,
                y: -40.0,
            }),
        ]);
        assert_eq!(
            handle.calls(),
            vec![
                InputCall::MoveCursor { x: 101, y: 20 },
                InputCall::MoveCursor { x: 1920, y: 0 },
            ]
        );
    }

    #[test]
    fn stop_is_not_forwarded() {
        let dir = tempfile::tempdir().unwrap();
        let handle = RecordingBackend::new(ScreenGeometry::default());
        let mut exec = executor(&handle, dir.path());
        exec.apply_all(&[
            record(GestureAction::Scroll { delta: -3 }),
            record(GestureAction::Stop),
        ]);
        assert_eq!(handle.calls(), vec![InputCall::Scroll { delta: -3 }]);
        assert_eq!(exec.applied(), 2);
    }

    #[test]
    fn screenshot_goes_through_store() {
        let dir = tempfile::tempdir().unwrap();
        let shots = dir.path().join("shots");
        let handle = RecordingBackend::new(ScreenGeometry::default());
        let mut exec = executor(&handle, &shots);
        exec.apply_all(&[record(GestureAction::Screenshot)]);

        let calls = handle.calls();
        assert_eq!(calls.len(), 1);
        match &calls[0] {
            InputCall::Screenshot { path } => {
                assert_eq!(path.parent(), Some(shots.as_path()));
                assert!(shots.is_dir());
            }
            other => panic!("unexpected call {other:?}"),
        }
    }

    #[test]
    fn backend_errors_are_counted_and_do_not_stop_later_actions() {
        let dir = tempfile::tempdir().unwrap();
        let mut exec =
            ActionExecutor::new(Box::new(FailingBackend), ScreenshotStore::new(dir.path()))
                .unwrap();
        exec.apply_all(&[
            record(GestureAction::Click {
                button: MouseButton::Left,
            }),
            record(GestureAction::MoveCursor { x: 1.0, y: 1.0 }),
            record(GestureAction::Scroll { delta: 1 }),
        ]);
        assert_eq!(exec.failed(), 2);
        assert_eq!(exec.applied(), 1);
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn full_disk_log_does_not_drop_clicks() {
        let dir = tempfile::tempdir().unwrap();
        let handle = RecordingBackend::new(ScreenGeometry::default());
        let header = ActionLogHeader {
            schema_version: "1.0".to_string(),
            epoch_wall: "2026-01-01T00:00:00Z".to_string(),
            mode: "dual_hand".to_string(),
            screen_width: 1920,
            screen_height: 1080,
        };
        // Every write to /dev/full fails with ENOSPC once the buffer drains.
        let log = ActionLogWriter::new("/dev/full".into(), header).unwrap();
        let mut exec = executor(&handle, dir.path()).with_log(log);

        let clicks: Vec<ActionRecord> = (0..300)
            .map(|_| {
                record(GestureAction::Click {
                    button: MouseButton::Left,
                })
            })
            .collect();
        exec.apply_all(&clicks);

        assert!(exec.log_failures() > 0);
        assert_eq!(exec.failed(), 0);
        assert_eq!(exec.applied(), 300);
        assert_eq!(handle.calls().len(), 300);
        assert!(exec.flush().is_err());
    }
}
