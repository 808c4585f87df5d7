//! Hand-landmark detector interface.
//!
//! The landmark model itself lives outside this crate. Detectors here
//! either pass through landmarks that arrived with the frame or pair camera
//! frames with an external tracker's output.

use handmouse_common::config::DetectorConfig;
use handmouse_common::error::{HandmouseError, HandmouseResult};
use handmouse_hand_model::HandObservation;

use crate::camera::{Frame, FrameData};

/// Settings handed to the landmark collaborator.
#[derive(Debug, Clone, PartialEq)]
pub struct DetectorSettings {
    pub max_hands: usize,
    pub min_detection_confidence: f64,
    pub min_tracking_confidence: f64,
}

impl From<&DetectorConfig> for DetectorSettings {
    fn from(config: &DetectorConfig) -> Self {
        Self {
            max_hands: config.max_hands,
            min_detection_confidence: config.min_detection_confidence,
            min_tracking_confidence: config.min_tracking_confidence,
        }
    }
}

impl Default for DetectorSettings {
    fn default() -> Self {
        Self::from(&DetectorConfig::default())
    }
}

/// Trait for hand-landmark detectors.
pub trait HandDetector {
    /// Detector name for logging.
    fn name(&self) -> &str;

    /// Hands visible in `frame`, in frame pixel coordinates.
    fn detect(&mut self, frame: &Frame) -> HandmouseResult<Vec<HandObservation>>;
}

/// Detector for frames that already carry landmarks.
#[derive(Debug, Clone, Default)]
pub struct RecordedDetector {
    settings: DetectorSettings,
}

impl RecordedDetector {
    pub fn new(settings: DetectorSettings) -> Self {
        Self { settings }
    }
}

impl HandDetector for RecordedDetector {
    fn name(&self) -> &str {
        "recorded"
    }

    fn detect(&mut self, frame: &Frame) -> HandmouseResult<Vec<HandObservation>> {
        match &frame.data {
            FrameData::Landmarks(hands) => Ok(hands
                .iter()
                .take(self.settings.max_hands)
                .cloned()
                .collect()),
            #[cfg(feature = "opencv")]
            FrameData::Image(_) => Err(HandmouseError::detector(
                "frame carries a raw image; use a landmark stream detector",
            )),
        }
    }
}

/// Reject settings the landmark collaborator could never satisfy.
pub fn validate_settings(settings: &DetectorSettings) -> HandmouseResult<()> {
    if settings.max_hands == 0 {
        return Err(HandmouseError::detector("max_hands must be at least 1"));
    }
    for (name, value) in [
        ("min_detection_confidence", settings.min_detection_confidence),
        ("min_tracking_confidence", settings.min_tracking_confidence),
    ] {
        if !(0.0..=1.0).contains(&value) {
            return Err(HandmouseError::detector(format!(
                "{name} must be within [0, 1], got {value}"
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use handmouse_hand_model::synthetic::SyntheticHand;
    use handmouse_hand_model::HandSide;

    #[test]
    fn recorded_detector_truncates_to_max_hands() {
        let hands = vec![
            SyntheticHand::new(HandSide::Right).build(),
            SyntheticHand::new(HandSide::Left).build(),
            SyntheticHand::new(HandSide::Left).build(),
        ];
        let frame = Frame::with_landmarks(0, 0.0, 640, 480, hands);
        let mut detector = RecordedDetector::default();
        let detected = detector.detect(&frame).unwrap();
        assert_eq!(detected.len(), 2);
        assert_eq!(detected[0].side(), HandSide::Right);
    }

    #[test]
    fn settings_validation() {
        assert!(validate_settings(&DetectorSettings::default()).is_ok());
        let bad = DetectorSettings {
            min_tracking_confidence: 1.5,
            ..DetectorSettings::default()
        };
        let err = validate_settings(&bad).unwrap_err();
        assert!(err.to_string().contains("min_tracking_confidence"));
    }
}
