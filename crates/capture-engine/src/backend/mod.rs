//! Device backends.
//!
//! Only the OpenCV webcam and window backend lives here; the landmark stream
//! and replay sources need no native libraries.

#[cfg(feature = "opencv")]
pub mod opencv_camera;

#[cfg(feature = "opencv")]
pub use opencv_camera::{HighGuiPreview, OpenCvCamera, OpenCvCameraOpener};
