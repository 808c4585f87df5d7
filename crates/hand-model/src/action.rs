//! Gesture actions emitted by the interpreter.
//!
//! Actions are plain data; the input driver turns them into OS calls.
//! They serialize as tagged JSON objects for the action log.

use serde::{Deserialize, Serialize};

use crate::landmark::HandSide;

/// Mouse button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MouseButton {
    Left,
    Right,
}

/// Keyboard shortcuts the gestures can trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Hotkey {
    SelectAll,
    Copy,
    Cut,
    Paste,
}

impl Hotkey {
    /// Letter pressed together with the platform command modifier.
    pub fn letter(&self) -> char {
        match self {
            Self::SelectAll => 'a',
            Self::Copy => 'c',
            Self::Cut => 'x',
            Self::Paste => 'v',
        }
    }
}

/// Discriminated union of gesture actions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GestureAction {
    /// Move the pointer to absolute screen coordinates.
    MoveCursor { x: f64, y: f64 },

    /// Single click.
    Click { button: MouseButton },

    /// Left double click.
    DoubleClick,

    /// Press and hold the left button (drag start).
    MouseDown,

    /// Release the left button (drag end).
    MouseUp,

    /// Vertical scroll; positive scrolls up.
    Scroll { delta: i32 },

    /// Keyboard shortcut.
    Hotkey { hotkey: Hotkey },

    /// Capture the screen to the screenshot directory.
    Screenshot,

    /// End the gesture session.
    Stop,
}

impl GestureAction {
    /// Short label for logs and on-screen overlays.
    pub fn label(&self) -> &'static str {
        match self {
            Self::MoveCursor { .. } => "MOVE",
            Self::Click {
                button: MouseButton::Left,
            } => "LEFT CLICK",
            Self::Click {
                button: MouseButton::Right,
            } => "RIGHT CLICK",
            Self::DoubleClick => "DOUBLE CLICK",
            Self::MouseDown => "DRAG MODE",
            Self::MouseUp => "DROP",
            Self::Scroll { delta } if *delta >= 0 => "SCROLL UP",
            Self::Scroll { .. } => "SCROLL DOWN",
            Self::Hotkey {
                hotkey: Hotkey::SelectAll,
            } => "SELECT ALL",
            Self::Hotkey {
                hotkey: Hotkey::Copy,
            } => "COPY",
            Self::Hotkey {
                hotkey: Hotkey::Cut,
            } => "CUT",
            Self::Hotkey {
                hotkey: Hotkey::Paste,
            } => "PASTE",
            Self::Screenshot => "SCREENSHOT",
            Self::Stop => "STOP",
        }
    }

    pub fn is_stop(&self) -> bool {
        matches!(self, Self::Stop)
    }
}

/// An action together with when and by which hand it was emitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionRecord {
    /// Seconds since session start.
    pub t: f64,

    /// Hand that produced the action, if labelled.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hand: Option<HandSide>,

    #[serde(flatten)]
    pub action: GestureAction,
}

/// Header line for action logs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionLogHeader {
    /// Schema version for forward compatibility.
    pub schema_version: String,

    /// Wall-clock time at session start (ISO 8601).
    pub epoch_wall: String,

    /// Interpreter mode ("dual_hand" or "single_hand").
    pub mode: String,

    /// Screen size the cursor coordinates refer to.
    pub screen_width: u32,
    pub screen_height: u32,
}
