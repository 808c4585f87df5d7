//! Display server and webcam device detection.

use std::path::{Path, PathBuf};

pub use handmouse_platform_core::DisplayServer;

/// Detect the current display server.
pub fn detect_display_server() -> DisplayServer {
    if std::env::var("WAYLAND_DISPLAY").is_ok() {
        DisplayServer::Wayland
    } else if std::env::var("DISPLAY").is_ok() {
        DisplayServer::X11
    } else {
        DisplayServer::Unknown
    }
}

/// A Video4Linux device node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebcamDevice {
    /// Device index (`N` in `/dev/videoN`).
    pub index: u32,
    pub path: PathBuf,
}

/// List `/dev/video{0..count}` nodes that exist.
pub fn list_webcam_devices(count: u32) -> Vec<WebcamDevice> {
    list_webcam_devices_in(Path::new("/dev"), count)
}

fn list_webcam_devices_in(dev_dir: &Path, count: u32) -> Vec<WebcamDevice> {
    tracing::debug!(dir = %dev_dir.display(), count, "Probing webcam device nodes");
    (0..count)
        .map(|index| WebcamDevice {
            index,
            path: dev_dir.join(format!("video{index}")),
        })
        .filter(|device| device.path.exists())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lists_only_existing_device_nodes_within_probe_range() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("video1"), b"").unwrap();
        std::fs::write(dir.path().join("video3"), b"").unwrap();
        std::fs::write(dir.path().join("video7"), b"").unwrap();

        let devices = list_webcam_devices_in(dir.path(), 5);
        let indices: Vec<u32> = devices.iter().map(|d| d.index).collect();
        assert_eq!(indices, vec![1, 3]);
    }
}
