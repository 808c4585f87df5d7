//! handmouse platform core contracts.
//!
//! Screen geometry and coordinate mapping shared by the interpreter and the
//! input driver, without coupling to a concrete OS backend.

use serde::{Deserialize, Serialize};

/// Size of the target screen in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScreenGeometry {
    pub width: u32,
    pub height: u32,
}

impl ScreenGeometry {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Scale factors from a frame of the given size to this screen.
    pub fn scale_from(&self, frame_width: u32, frame_height: u32) -> (f64, f64) {
        (
            self.width as f64 / frame_width.max(1) as f64,
            self.height as f64 / frame_height.max(1) as f64,
        )
    }

    /// Clamp a point onto the screen.
    pub fn clamp(&self, x: f64, y: f64) -> (f64, f64) {
        (
            x.clamp(0.0, self.width as f64),
            y.clamp(0.0, self.height as f64),
        )
    }
}

impl Default for ScreenGeometry {
    fn default() -> Self {
        Self::new(1920, 1080)
    }
}

/// Display server / platform family used for input injection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DisplayServer {
    Wayland,
    X11,
    Windows,
    MacOS,
    #[default]
    Unknown,
}

/// Axis-aligned rectangle inside a camera frame, in frame pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CaptureRect {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl CaptureRect {
    /// The frame shrunk by `margin` pixels on every side.
    pub fn inset(frame_width: u32, frame_height: u32, margin: f64) -> Self {
        Self {
            left: margin,
            top: margin,
            right: frame_width as f64 - margin,
            bottom: frame_height as f64 - margin,
        }
    }

    /// Map a frame point linearly onto the screen. Points outside the
    /// rectangle clamp to the screen edge.
    pub fn map_to_screen(&self, x: f64, y: f64, screen: ScreenGeometry) -> (f64, f64) {
        (
            interp(x, (self.left, self.right), (0.0, screen.width as f64)),
            interp(y, (self.top, self.bottom), (0.0, screen.height as f64)),
        )
    }
}

/// One-dimensional linear interpolation with clamping at both ends.
///
/// A degenerate input range maps everything to the lower output bound.
pub fn interp(value: f64, from: (f64, f64), to: (f64, f64)) -> f64 {
    let (x0, x1) = from;
    let (y0, y1) = to;
    if x1 <= x0 || value <= x0 {
        return y0;
    }
    if value >= x1 {
        return y1;
    }
    y0 + (value - x0) * (y1 - y0) / (x1 - x0)
}
