//! handmouse Hand Model
//!
//! Defines the core data contracts shared by the interpreter, the capture
//! engine, and the input driver:
//! - **Landmarks:** The 21 keypoints of a detected hand, in frame pixels
//! - **Observations:** Per-frame lists of labelled hands (the replay format)
//! - **Actions:** Discrete OS-level actions emitted by the interpreter
//!
//! Landmark coordinates use the frame's pixel space with the origin at the
//! top-left, so "up" on screen means a smaller `y`.

pub mod action;
pub mod landmark;
pub mod observation;
pub mod synthetic;

pub use action::*;
pub use landmark::*;
pub use observation::*;
