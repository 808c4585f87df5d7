//! handmouse Linux Platform Integration
//!
//! Platform-specific helpers for Linux:
//! - **Display Detection:** Wayland vs X11 session detection
//! - **Webcam Devices:** Video4Linux device enumeration
//! - **Permissions:** Capability detection and user guidance

pub mod display;
pub mod permissions;

pub use display::*;
