//! Preview window and exit-key polling.

use std::collections::VecDeque;

use handmouse_common::error::HandmouseResult;

use crate::camera::Frame;

/// Key code that ends the session.
pub const ESC_KEY: i32 = 27;

/// Status text drawn over the preview.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Overlay {
    /// Labels of the actions emitted this frame.
    pub labels: Vec<&'static str>,
    /// Seconds the stop fist has been held, when a hold is in progress.
    pub stop_hold_secs: Option<f64>,
}

/// Trait for the on-screen preview.
pub trait PreviewWindow {
    /// Draw `frame` with `overlay`.
    fn show(&mut self, frame: &Frame, overlay: &Overlay) -> HandmouseResult<()>;

    /// Key pressed since the last poll, if any. Called once per frame.
    fn poll_key(&mut self) -> HandmouseResult<Option<i32>>;

    /// Close the window. Must be idempotent.
    fn release(&mut self);
}

/// No window at all. Keys can be scripted for tests.
#[derive(Debug, Default)]
pub struct HeadlessPreview {
    keys: VecDeque<Option<i32>>,
    frames_shown: u64,
    released: bool,
}

impl HeadlessPreview {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return these poll results in order, then `None` forever.
    pub fn with_keys(keys: impl IntoIterator<Item = Option<i32>>) -> Self {
        Self {
            keys: keys.into_iter().collect(),
            ..Self::default()
        }
    }

    pub fn frames_shown(&self) -> u64 {
        self.frames_shown
    }

    pub fn is_released(&self) -> bool {
        self.released
    }
}

impl PreviewWindow for HeadlessPreview {
    fn show(&mut self, _frame: &Frame, _overlay: &Overlay) -> HandmouseResult<()> {
        self.frames_shown += 1;
        Ok(())
    }

    fn poll_key(&mut self) -> HandmouseResult<Option<i32>> {
        Ok(self.keys.pop_front().flatten())
    }

    fn release(&mut self) {
        self.released = true;
    }
}
