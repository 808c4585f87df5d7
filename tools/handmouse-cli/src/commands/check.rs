//! Check system capabilities.

use handmouse_common::config::AppConfig;
use handmouse_platform_linux::permissions::{check_capabilities, print_capability_report};
use handmouse_platform_linux::{detect_display_server, list_webcam_devices, DisplayServer};

pub fn run(config: &AppConfig) -> anyhow::Result<()> {
    println!("handmouse System Check");
    println!("{}", "=".repeat(50));

    match detect_display_server() {
        DisplayServer::Wayland => println!("[OK] Display server: Wayland"),
        DisplayServer::X11 => println!("[OK] Display server: X11"),
        _ => println!("[WARN] Display server: Unknown"),
    }

    let devices = list_webcam_devices(config.camera.probe_count);
    println!("[OK] Webcam devices found: {}", devices.len());
    for device in &devices {
        println!("     {} (index {})", device.path.display(), device.index);
    }

    let capabilities = check_capabilities(&config.screenshots.dir, config.camera.probe_count);
    println!();
    print_capability_report(&capabilities);

    let all_required_ok = capabilities
        .iter()
        .filter(|c| c.required)
        .all(|c| c.available);

    println!();
    if all_required_ok {
        println!("All required capabilities are available. handmouse is ready.");
    } else {
        println!("Some required capabilities are missing. See above for fixes.");
    }

    Ok(())
}
