//! Application configuration.
//!
//! Every section carries `#[serde(default)]` so a partial config file only
//! overrides the keys it names.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Global application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Camera capture settings.
    pub camera: CameraConfig,

    /// Hand-landmark detector settings.
    pub detector: DetectorConfig,

    /// Dual-hand gesture thresholds and cooldowns.
    pub gestures: GestureConfig,

    /// Single-hand variant thresholds.
    pub single_hand: SingleHandConfig,

    /// Screenshot output settings.
    pub screenshots: ScreenshotConfig,

    /// Logging configuration.
    pub logging: LoggingConfig,
}

/// Camera capture parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Requested capture width in pixels.
    pub width: u32,

    /// Requested capture height in pixels.
    pub height: u32,

    /// Number of device indices probed, starting at 0.
    pub probe_count: u32,

    /// Mirror frames horizontally before detection (dual-hand mode).
    pub flip_horizontal: bool,
}

/// Parameters handed to the hand-landmark collaborator.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorConfig {
    /// Maximum number of hands reported per frame.
    pub max_hands: usize,

    /// Minimum detection score for a hand to be reported.
    pub min_detection_confidence: f64,

    /// Minimum tracking score between frames.
    pub min_tracking_confidence: f64,

    /// UDP address the landmark stream is received on.
    pub udp_bind: String,

    /// Read timeout for the landmark stream, in milliseconds.
    pub read_timeout_ms: u64,
}

/// Dual-hand interpreter constants.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GestureConfig {
    /// Divisor of the exponential cursor filter (higher = smoother).
    pub smoothening: f64,

    /// Margin in frame pixels trimmed from each side of the capture rectangle.
    pub frame_reduction: f64,

    /// Seconds the left fist must be held to stop the session.
    pub stop_hold_secs: f64,

    /// Minimum seconds between any two clicks.
    pub click_cooldown_secs: f64,

    /// Minimum seconds between scroll ticks.
    pub scroll_cooldown_secs: f64,

    /// Optional debounce for left-hand clipboard hotkeys. `None` fires every frame.
    pub clipboard_cooldown_secs: Option<f64>,

    /// Thumb-to-middle fingertip distance (frame pixels) that triggers a screenshot.
    pub screenshot_distance_px: f64,

    /// Wheel notches per scroll tick.
    ///
    /// Always whole notches on every platform. Raw wheel amounts such as
    /// `±150` are platform units: 150 button clicks on X11 but only 1.25
    /// notches at Windows' 120 units per notch. 3 notches sits between the two.
    pub scroll_step: i32,
}

/// Single-hand interpreter constants.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SingleHandConfig {
    /// Integer divisor of the cursor filter.
    pub smoothing: i32,

    /// Distance (screen pixels) that counts as a pinch. The left-click pinch
    /// measures from the thumb tip to the smoothed cursor, the right-click
    /// pinch from the thumb tip to the middle tip.
    pub pinch_distance_px: f64,

    /// Vertical index-tip movement (screen pixels) between frames that scrolls.
    pub scroll_threshold_px: i32,

    /// Wheel notches per scroll tick. One notch stands in for a raw `±50`
    /// wheel amount (see [`GestureConfig::scroll_step`] for the unit mapping).
    pub scroll_step: i32,

    /// Fire right click only on the frame the pinch starts.
    pub edge_triggered_right_click: bool,
}

/// Screenshot output settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScreenshotConfig {
    /// Directory screenshots are written to.
    pub dir: PathBuf,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "handmouse=debug,warn").
    pub level: String,

    /// Whether to output structured JSON logs.
    pub json: bool,

    /// Optional log file path.
    pub file: Option<PathBuf>,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            width: 640,
            height: 480,
            probe_count: 5,
            flip_horizontal: true,
        }
    }
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            max_hands: 2,
            min_detection_confidence: 0.7,
            min_tracking_confidence: 0.7,
            udp_bind: "127.0.0.1:5005".to_string(),
            read_timeout_ms: 100,
        }
    }
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            smoothening: 5.0,
            frame_reduction: 100.0,
            stop_hold_secs: 2.0,
            click_cooldown_secs: 0.5,
            scroll_cooldown_secs: 0.25,
            clipboard_cooldown_secs: None,
            screenshot_distance_px: 30.0,
            scroll_step: 3,
        }
    }
}

impl Default for SingleHandConfig {
    fn default() -> Self {
        Self {
            smoothing: 5,
            pinch_distance_px: 40.0,
            scroll_threshold_px: 20,
            scroll_step: 1,
            edge_triggered_right_click: false,
        }
    }
}

impl Default for ScreenshotConfig {
    fn default() -> Self {
        Self {
            dir: default_screenshot_dir(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
            file: None,
        }
    }
}

impl AppConfig {
    /// Load config from the standard location, falling back to defaults.
    pub fn load() -> Self {
        Self::load_from(&config_file_path())
    }

    /// Load config from an explicit path, falling back to defaults.
    pub fn load_from(config_path: &Path) -> Self {
        if config_path.exists() {
            match std::fs::read_to_string(config_path) {
                Ok(content) => match serde_json::from_str(&content) {
                    Ok(config) => return config,
                    Err(e) => {
                        tracing::warn!("Failed to parse config at {:?}: {}", config_path, e);
                    }
                },
                Err(e) => {
                    tracing::warn!("Failed to read config at {:?}: {}", config_path, e);
                }
            }
        }
        Self::default()
    }

    /// Save config to the standard location.
    pub fn save(&self) -> Result<PathBuf, std::io::Error> {
        let config_path = config_file_path();
        self.save_to(&config_path)?;
        Ok(config_path)
    }

    /// Save config to an explicit path.
    pub fn save_to(&self, config_path: &Path) -> Result<(), std::io::Error> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;
        std::fs::write(config_path, json)
    }
}

/// Standard config file location.
pub fn config_file_path() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".config"));
    base.join("handmouse").join("config.json")
}

/// Default screenshot directory: `<home>/Pictures/GestureScreenshots`.
fn default_screenshot_dir() -> PathBuf {
    home_dir().join("Pictures").join("GestureScreenshots")
}

fn home_dir() -> PathBuf {
    std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("/tmp"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_gesture_constants() {
        let config = AppConfig::default();
        assert_eq!(config.gestures.smoothening, 5.0);
        assert_eq!(config.gestures.frame_reduction, 100.0);
        assert_eq!(config.gestures.stop_hold_secs, 2.0);
        assert_eq!(config.gestures.click_cooldown_secs, 0.5);
        assert_eq!(config.gestures.scroll_cooldown_secs, 0.25);
        assert!(config.gestures.clipboard_cooldown_secs.is_none());
        assert_eq!(config.camera.probe_count, 5);
        assert!(config.screenshots.dir.ends_with("Pictures/GestureScreenshots"));
    }

    #[test]
    fn scroll_steps_are_whole_notches() {
        let config = AppConfig::default();
        assert_eq!(config.gestures.scroll_step, 3);
        assert_eq!(config.single_hand.scroll_step, 1);
        assert_eq!(config.single_hand.scroll_threshold_px, 20);
        assert_eq!(config.single_hand.pinch_distance_px, 40.0);
    }

    #[test]
    fn partial_file_overrides_only_named_keys() {
        let raw = r#"{ "gestures": { "click_cooldown_secs": 1.25 } }"#;
        let config: AppConfig = serde_json::from_str(raw).unwrap();
        assert_eq!(config.gestures.click_cooldown_secs, 1.25);
        assert_eq!(config.gestures.scroll_cooldown_secs, 0.25);
        assert_eq!(config.detector.max_hands, 2);
    }

    #[test]
    fn save_then_load_preserves_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");

        let mut config = AppConfig::default();
        config.single_hand.edge_triggered_right_click = true;
        config.gestures.clipboard_cooldown_secs = Some(8.0);
        config.save_to(&path).unwrap();

        let loaded = AppConfig::load_from(&path);
        assert!(loaded.single_hand.edge_triggered_right_click);
        assert_eq!(loaded.gestures.clipboard_cooldown_secs, Some(8.0));
    }

    #[test]
    fn unparsable_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ not json").unwrap();

        let loaded = AppConfig::load_from(&path);
        assert_eq!(loaded.gestures.smoothening, 5.0);
    }
}
