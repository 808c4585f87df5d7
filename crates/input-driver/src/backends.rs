//! Input backend implementations.
//!
//! Each backend provides a different way to deliver pointer and keyboard
//! input.

use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

use handmouse_common::error::HandmouseResult;
use handmouse_hand_model::{Hotkey, MouseButton};
use handmouse_platform_core::ScreenGeometry;

use crate::{InputBackend, InputCall};

#[cfg(feature = "live")]
pub use live::EnigoBackend;

/// Backend that records every call instead of touching the OS.
///
/// Clones share the same call list, so a test can keep a handle while the
/// executor owns the boxed backend.
#[derive(Debug, Clone)]
pub struct RecordingBackend {
    screen: ScreenGeometry,
    calls: Arc<Mutex<Vec<InputCall>>>,
}

impl RecordingBackend {
    pub fn new(screen: ScreenGeometry) -> Self {
        Self {
            screen,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Snapshot of the calls recorded so far.
    pub fn calls(&self) -> Vec<InputCall> {
        self.lock().clone()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    fn lock(&self) -> MutexGuard<'_, Vec<InputCall>> {
        self.calls.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn record(&mut self, call: InputCall) -> HandmouseResult<()> {
        tracing::debug!(?call, "Recorded input call");
        self.lock().push(call);
        Ok(())
    }
}

impl InputBackend for RecordingBackend {
    fn name(&self) -> &str {
        "recording"
    }

    fn screen_size(&self) -> HandmouseResult<ScreenGeometry> {
        Ok(self.screen)
    }

    fn move_cursor(&mut self, x: i32, y: i32) -> HandmouseResult<()> {
        self.record(InputCall::MoveCursor { x, y })
    }

    fn click(&mut self, button: MouseButton) -> HandmouseResult<()> {
        self.record(InputCall::Click { button })
    }

    fn double_click(&mut self) -> HandmouseResult<()> {
        self.record(InputCall::DoubleClick)
    }

    fn mouse_down(&mut self) -> HandmouseResult<()> {
        self.record(InputCall::MouseDown)
    }

    fn mouse_up(&mut self) -> HandmouseResult<()> {
        self.record(InputCall::MouseUp)
    }

    fn scroll(&mut self, delta: i32) -> HandmouseResult<()> {
        self.record(InputCall::Scroll { delta })
    }

    fn hotkey(&mut self, hotkey: Hotkey) -> HandmouseResult<()> {
        self.record(InputCall::Hotkey { hotkey })
    }

    fn screenshot(&mut self, path: &Path) -> HandmouseResult<()> {
        self.record(InputCall::Screenshot {
            path: path.to_path_buf(),
        })
    }
}

/// Backend that traces each call and keeps nothing but a counter.
///
/// Used for live dry runs, which can last for hours and never read their
/// calls back.
#[derive(Debug, Clone)]
pub struct DryRunBackend {
    screen: ScreenGeometry,
    calls: u64,
}

impl DryRunBackend {
    pub fn new(screen: ScreenGeometry) -> Self {
        Self { screen, calls: 0 }
    }

    /// Number of calls seen so far.
    pub fn call_count(&self) -> u64 {
        self.calls
    }

    fn trace(&mut self, call: InputCall) -> HandmouseResult<()> {
        self.calls += 1;
        match call {
            InputCall::MoveCursor { x, y } => tracing::trace!(x, y, "Dry run: move"),
            call => tracing::info!(?call, "Dry run"),
        }
        Ok(())
    }
}

impl InputBackend for DryRunBackend {
    fn name(&self) -> &str {
        "dry-run"
    }

    fn screen_size(&self) -> HandmouseResult<ScreenGeometry> {
        Ok(self.screen)
    }

    fn move_cursor(&mut self, x: i32, y: i32) -> HandmouseResult<()> {
        self.trace(InputCall::MoveCursor { x, y })
    }

    fn click(&mut self, button: MouseButton) -> HandmouseResult<()> {
        self.trace(InputCall::Click { button })
    }

    fn double_click(&mut self) -> HandmouseResult<()> {
        self.trace(InputCall::DoubleClick)
    }

    fn mouse_down(&mut self) -> HandmouseResult<()> {
        self.trace(InputCall::MouseDown)
    }

    fn mouse_up(&mut self) -> HandmouseResult<()> {
        self.trace(InputCall::MouseUp)
    }

    fn scroll(&mut self, delta: i32) -> HandmouseResult<()> {
        self.trace(InputCall::Scroll { delta })
    }

    fn hotkey(&mut self, hotkey: Hotkey) -> HandmouseResult<()> {
        self.trace(InputCall::Hotkey { hotkey })
    }

    fn screenshot(&mut self, path: &Path) -> HandmouseResult<()> {
        self.trace(InputCall::Screenshot {
            path: path.to_path_buf(),
        })
    }
}

#[cfg(feature = "live")]
mod live {
    use std::path::Path;

    use enigo::{Axis, Button, Coordinate, Direction, Enigo, Key, Keyboard, Mouse, Settings};
    use handmouse_common::error::{HandmouseError, HandmouseResult};
    use handmouse_hand_model::{Hotkey, MouseButton};
    use handmouse_platform_core::ScreenGeometry;

    use crate::InputBackend;

    #[cfg(target_os = "macos")]
    const COMMAND_KEY: Key = Key::Meta;
    #[cfg(not(target_os = "macos"))]
    const COMMAND_KEY: Key = Key::Control;

    /// Live backend: enigo for pointer and keyboard, xcap for screenshots.
    pub struct EnigoBackend {
        enigo: Enigo,
        button_held: bool,
    }

    impl EnigoBackend {
        pub fn new() -> HandmouseResult<Self> {
            let enigo = Enigo::new(&Settings::default())
                .map_err(|e| HandmouseError::input(format!("Failed to connect enigo: {e}")))?;
            tracing::info!("Enigo input backend connected");
            Ok(Self {
                enigo,
                button_held: false,
            })
        }

        fn button(&mut self, button: Button, direction: Direction) -> HandmouseResult<()> {
            self.enigo
                .button(button, direction)
                .map_err(|e| HandmouseError::input(format!("{button:?} {direction:?}: {e}")))
        }
    }

    fn to_enigo(button: MouseButton) -> Button {
        match button {
            MouseButton::Left => Button::Left,
            MouseButton::Right => Button::Right,
        }
    }

    impl InputBackend for EnigoBackend {
        fn name(&self) -> &str {
            "enigo"
        }

        fn screen_size(&self) -> HandmouseResult<ScreenGeometry> {
            let (w, h) = self
                .enigo
                .main_display()
                .map_err(|e| HandmouseError::input(format!("Failed to query display: {e}")))?;
            Ok(ScreenGeometry::new(w.max(1) as u32, h.max(1) as u32))
        }

        fn move_cursor(&mut self, x: i32, y: i32) -> HandmouseResult<()> {
            self.enigo
                .move_mouse(x, y, Coordinate::Abs)
                .map_err(|e| HandmouseError::input(format!("Failed to move pointer: {e}")))
        }

        fn click(&mut self, button: MouseButton) -> HandmouseResult<()> {
            self.button(to_enigo(button), Direction::Click)
        }

        fn double_click(&mut self) -> HandmouseResult<()> {
            self.button(Button::Left, Direction::Click)?;
            self.button(Button::Left, Direction::Click)
        }

        fn mouse_down(&mut self) -> HandmouseResult<()> {
            self.button(Button::Left, Direction::Press)?;
            self.button_held = true;
            Ok(())
        }

        fn mouse_up(&mut self) -> HandmouseResult<()> {
            self.button(Button::Left, Direction::Release)?;
            self.button_held = false;
            Ok(())
        }

        fn scroll(&mut self, delta: i32) -> HandmouseResult<()> {
            // enigo scrolls down for positive lengths.
            self.enigo
                .scroll(-delta, Axis::Vertical)
                .map_err(|e| HandmouseError::input(format!("Failed to scroll: {e}")))
        }

        fn hotkey(&mut self, hotkey: Hotkey) -> HandmouseResult<()> {
            let letter = Key::Unicode(hotkey.letter());
            let press = self
                .enigo
                .key(COMMAND_KEY, Direction::Press)
                .and_then(|_| self.enigo.key(letter, Direction::Click));
            // Always release the modifier, even if the letter failed.
            let release = self.enigo.key(COMMAND_KEY, Direction::Release);
            press
                .and(release)
                .map_err(|e| HandmouseError::input(format!("Failed to send {hotkey:?}: {e}")))
        }

        fn screenshot(&mut self, path: &Path) -> HandmouseResult<()> {
            let monitors = xcap::Monitor::all()
                .map_err(|e| HandmouseError::screenshot(format!("Failed to list monitors: {e}")))?;
            let monitor = monitors
                .iter()
                .find(|m| m.is_primary())
                .or_else(|| monitors.first())
                .ok_or_else(|| HandmouseError::screenshot("No monitor available"))?;
            let image = monitor
                .capture_image()
                .map_err(|e| HandmouseError::screenshot(format!("Capture failed: {e}")))?;
            image.save(path).map_err(|e| {
                HandmouseError::screenshot(format!("Failed to write {}: {e}", path.display()))
            })?;
            Ok(())
        }
    }

    impl Drop for EnigoBackend {
        fn drop(&mut self) {
            if self.button_held {
                let _ = self.enigo.button(Button::Left, Direction::Release);
            }
        }
    }
}
