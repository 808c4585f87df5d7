//! Permission detection and guidance for Linux.
//!
//! handmouse needs a graphical session to inject input, a readable webcam
//! (or an external landmark tracker), and a writable screenshot directory.

use std::path::Path;

use crate::display::{detect_display_server, list_webcam_devices, DisplayServer};

/// A system capability that handmouse may need.
#[derive(Debug, Clone)]
pub struct Capability {
    pub name: String,
    pub description: String,
    pub available: bool,
    pub required: bool,
    pub fix_instructions: Option<String>,
}

/// Check all capabilities and report status.
pub fn check_capabilities(screenshot_dir: &Path, camera_probe_count: u32) -> Vec<Capability> {
    vec![
        check_display_session(),
        check_webcam_access(camera_probe_count),
        check_uinput_access(),
        check_screenshot_dir(screenshot_dir),
    ]
}

/// Check for a graphical session the pointer can be driven in.
fn check_display_session() -> Capability {
    let server = detect_display_server();
    let available = server != DisplayServer::Unknown;

    Capability {
        name: "Display Session".to_string(),
        description: format!("Graphical session for pointer and keyboard injection ({server:?})"),
        available,
        required: true,
        fix_instructions: if available {
            None
        } else {
            Some("Run handmouse inside a graphical desktop session (X11 or Wayland)".to_string())
        },
    }
}

/// Check if a webcam device is available in the probed index range.
fn check_webcam_access(probe_count: u32) -> Capability {
    let devices = list_webcam_devices(probe_count);
    let has_webcam = !devices.is_empty();

    Capability {
        name: "Webcam Device".to_string(),
        description: format!(
            "Video4Linux webcam at /dev/video0..{} (found: {:?})",
            probe_count.saturating_sub(1),
            devices.iter().map(|d| d.index).collect::<Vec<_>>()
        ),
        available: has_webcam,
        required: false, // an external landmark tracker may own the camera
        fix_instructions: if has_webcam {
            None
        } else {
            Some(
                "Connect a webcam and verify /dev/video* exists (v4l2-ctl --list-devices)"
                    .to_string(),
            )
        },
    }
}

/// Check uinput access, which Wayland input injection relies on.
fn check_uinput_access() -> Capability {
    let server = detect_display_server();
    let writable = std::fs::OpenOptions::new()
        .write(true)
        .open("/dev/uinput")
        .is_ok();

    Capability {
        name: "Input Injection".to_string(),
        description: "Synthetic pointer/keyboard events (XTest on X11, uinput on Wayland)"
            .to_string(),
        available: server == DisplayServer::X11 || writable,
        required: server == DisplayServer::Wayland,
        fix_instructions: if writable || server == DisplayServer::X11 {
            None
        } else {
            Some(
                "Add user to input group: sudo usermod -aG input $USER (logout required)"
                    .to_string(),
            )
        },
    }
}

/// Check that the screenshot directory exists or can be created.
fn check_screenshot_dir(dir: &Path) -> Capability {
    let available = std::fs::create_dir_all(dir).is_ok() && is_writable_dir(dir);

    Capability {
        name: "Screenshot Directory".to_string(),
        description: format!("Screenshots are saved to {}", dir.display()),
        available,
        required: false,
        fix_instructions: if available {
            None
        } else {
            Some(format!(
                "Create {} or set screenshots.dir in the config file",
                dir.display()
            ))
        },
    }
}

fn is_writable_dir(dir: &Path) -> bool {
    let probe = dir.join(".handmouse-write-test");
    let ok = std::fs::write(&probe, b"").is_ok();
    let _ = std::fs::remove_file(&probe);
    ok
}

/// Print a user-friendly capability report.
pub fn print_capability_report(capabilities: &[Capability]) {
    println!("handmouse System Capabilities:");
    println!("{}", "-".repeat(60));

    for cap in capabilities {
        let status = if cap.available {
            "[OK]"
        } else if cap.required {
            "[MISSING - REQUIRED]"
        } else {
            "[MISSING - OPTIONAL]"
        };

        println!("  {} {}: {}", status, cap.name, cap.description);

        if let Some(ref fix) = cap.fix_instructions {
            println!("    Fix: {fix}");
        }
    }
}
