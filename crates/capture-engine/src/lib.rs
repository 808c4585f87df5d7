//! handmouse Capture Engine
//!
//! Feeds hand observations to the gesture interpreter and drives the
//! per-frame loop. Frames come from a pluggable source, landmarks from a
//! pluggable detector:
//!
//! ```text
//! ┌───────────────────────────────────────────────────┐
//! │                  GestureSession                    │
//! │  ┌─────────────┐  ┌──────────────┐  ┌───────────┐  │
//! │  │ FrameSource │─▶│ HandDetector │─▶│  Gesture  │  │
//! │  │ cam/udp/jsonl│  │ sidecar/replay│  │  Mapper   │  │
//! │  └─────────────┘  └──────────────┘  └─────┬─────┘  │
//! │                                           ▼        │
//! │  ┌───────────────┐               ┌──────────────┐  │
//! │  │ PreviewWindow │◀── overlay ───│ActionExecutor│  │
//! │  └───────────────┘               └──────────────┘  │
//! └───────────────────────────────────────────────────┘
//! ```

pub mod backend;
pub mod camera;
pub mod detector;
pub mod preview;
pub mod replay;
pub mod session;
pub mod udp;

pub use camera::{open_first_available, CameraOpener, Frame, FrameData, FrameRead, FrameSource};
pub use detector::{validate_settings, DetectorSettings, HandDetector, RecordedDetector};
pub use preview::{HeadlessPreview, Overlay, PreviewWindow, ESC_KEY};
pub use replay::ReplaySource;
pub use session::{GestureSession, SessionOutcome, SessionStats};
pub use udp::{UdpLandmarkDetector, UdpLandmarkSource};
