//! handmouse Common Utilities
//!
//! Shared infrastructure for all handmouse crates:
//! - Error types and result aliases
//! - Session clock, cooldown gates, and hold timers
//! - Tracing/logging initialization
//! - Configuration loading

pub mod clock;
pub mod config;
pub mod error;
pub mod logging;

pub use clock::*;
pub use config::*;
pub use error::*;
