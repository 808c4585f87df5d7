//! handmouse Input Driver
//!
//! Applies gesture actions to the operating system. Uses a pluggable backend
//! architecture so the interpreter never touches OS APIs directly:
//!
//! - **Enigo:** Real pointer and keyboard injection, screen capture via xcap
//! - **Recording:** Captures calls in memory (tests, replays)
//! - **Dry run:** Traces calls without touching the OS or keeping them
//!
//! Applied actions can be logged in append-only JSONL format.

pub mod backends;
pub mod executor;
pub mod screenshot;
pub mod writer;

use std::path::{Path, PathBuf};

use handmouse_common::error::HandmouseResult;
use handmouse_hand_model::{Hotkey, MouseButton};
use handmouse_platform_core::ScreenGeometry;
use serde::Serialize;

pub use backends::{DryRunBackend, RecordingBackend};
#[cfg(feature = "live")]
pub use backends::EnigoBackend;
pub use executor::ActionExecutor;
pub use screenshot::ScreenshotStore;
pub use writer::ActionLogWriter;

/// Trait for OS input backends.
pub trait InputBackend {
    /// Backend name for logging.
    fn name(&self) -> &str;

    /// Size of the primary screen in pixels.
    fn screen_size(&self) -> HandmouseResult<ScreenGeometry>;

    /// Move the pointer to absolute screen coordinates.
    fn move_cursor(&mut self, x: i32, y: i32) -> HandmouseResult<()>;

    fn click(&mut self, button: MouseButton) -> HandmouseResult<()>;

    fn double_click(&mut self) -> HandmouseResult<()>;

    /// Press and hold the left button.
    fn mouse_down(&mut self) -> HandmouseResult<()>;

    /// Release the left button.
    fn mouse_up(&mut self) -> HandmouseResult<()>;

    /// Scroll vertically by `delta` wheel notches; positive scrolls up.
    fn scroll(&mut self, delta: i32) -> HandmouseResult<()>;

    /// Press the platform command modifier together with the hotkey letter.
    fn hotkey(&mut self, hotkey: Hotkey) -> HandmouseResult<()>;

    /// Capture the primary screen to a PNG file at `path`.
    fn screenshot(&mut self, path: &Path) -> HandmouseResult<()>;
}

/// One call made on an [`InputBackend`], as captured by
/// [`RecordingBackend`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "call", rename_all = "snake_case")]
pub enum InputCall {
    MoveCursor { x: i32, y: i32 },
    Click { button: MouseButton },
    DoubleClick,
    MouseDown,
    MouseUp,
    Scroll { delta: i32 },
    Hotkey { hotkey: Hotkey },
    Screenshot { path: PathBuf },
}
