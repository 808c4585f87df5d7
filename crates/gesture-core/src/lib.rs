//! handmouse Gesture Core: the Gesture Interpreter
//!
//! Turns per-frame hand observations into discrete OS actions:
//! - **Finger State:** Which digits are extended, from landmark geometry
//! - **Rules:** Ordered first-match dispatch tables per hand role
//! - **Smoothing:** Cursor filters that damp landmark jitter
//! - **Interpreters:** The dual-hand and single-hand state machines
//!
//! This crate is pure computation: no I/O, no platform dependencies.
//! All inputs are data; all outputs are data.

pub mod dual_hand;
pub mod fingers;
pub mod rules;
pub mod single_hand;
pub mod smoothing;

pub use dual_hand::{GestureInterpreter, GestureTimers};
pub use fingers::{fingers_up, FingerState};
pub use single_hand::{SingleHandInterpreter, SingleHandState};
pub use smoothing::{CursorSmoother, IntegerSmoother};

use handmouse_common::config::AppConfig;
use handmouse_hand_model::{ActionRecord, FrameObservation};
use handmouse_platform_core::ScreenGeometry;
use serde::{Deserialize, Serialize};

/// Which interpreter variant drives the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InterpreterMode {
    /// Right hand steers the pointer, left hand runs shortcuts and exit.
    DualHand,
    /// First detected hand does everything; no exit gesture.
    SingleHand,
}

impl InterpreterMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DualHand => "dual_hand",
            Self::SingleHand => "single_hand",
        }
    }
}

/// A per-frame gesture state machine.
pub trait GestureMapper: Send {
    /// Consume one frame and return the actions it triggers, in order.
    fn process(&mut self, frame: &FrameObservation) -> Vec<ActionRecord>;

    fn mode(&self) -> InterpreterMode;

    /// Seconds an exit hold has lasted at `now_secs`, if one is in progress.
    fn stop_hold_progress(&self, _now_secs: f64) -> Option<f64> {
        None
    }
}

/// Build the interpreter for `mode` from the application config.
pub fn build_mapper(
    mode: InterpreterMode,
    config: &AppConfig,
    screen: ScreenGeometry,
) -> Box<dyn GestureMapper> {
    match mode {
        InterpreterMode::DualHand => Box::new(GestureInterpreter::new(&config.gestures, screen)),
        InterpreterMode::SingleHand => {
            Box::new(SingleHandInterpreter::new(&config.single_hand, screen))
        }
    }
}
