//! Error types shared across handmouse crates.

use std::path::PathBuf;

/// Top-level error type for handmouse operations.
#[derive(Debug, thiserror::Error)]
pub enum HandmouseError {
    #[error("Camera error: {message}")]
    Camera { message: String },

    #[error("No working camera found (tried indices {tried:?})")]
    NoCamera { tried: Vec<u32> },

    #[error("Hand detector error: {message}")]
    Detector { message: String },

    #[error("Input injection error: {message}")]
    Input { message: String },

    #[error("Screenshot error: {message}")]
    Screenshot { message: String },

    #[error("Invalid hand observation: {message}")]
    Observation { message: String },

    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias using HandmouseError.
pub type HandmouseResult<T> = Result<T, HandmouseError>;

impl HandmouseError {
    pub fn camera(msg: impl Into<String>) -> Self {
        Self::Camera {
            message: msg.into(),
        }
    }

    pub fn detector(msg: impl Into<String>) -> Self {
        Self::Detector {
            message: msg.into(),
        }
    }

    pub fn input(msg: impl Into<String>) -> Self {
        Self::Input {
            message: msg.into(),
        }
    }

    pub fn screenshot(msg: impl Into<String>) -> Self {
        Self::Screenshot {
            message: msg.into(),
        }
    }

    pub fn observation(msg: impl Into<String>) -> Self {
        Self::Observation {
            message: msg.into(),
        }
    }
}
