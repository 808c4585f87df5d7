//! Hand landmark types.
//!
//! A hand is described by 21 keypoints in the MediaPipe hand topology:
//! the wrist followed by four joints per finger, base to tip.

use handmouse_common::error::{HandmouseError, HandmouseResult};
use serde::{Deserialize, Serialize};

/// Number of landmarks per hand.
pub const LANDMARK_COUNT: usize = 21;

/// A 2D point in frame pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point.
    pub fn distance(&self, other: &Point) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }

    /// Scale both axes.
    pub fn scaled(&self, sx: f64, sy: f64) -> Point {
        Point::new(self.x * sx, self.y * sy)
    }
}

impl From<[f64; 2]> for Point {
    fn from(value: [f64; 2]) -> Self {
        Point::new(value[0], value[1])
    }
}

impl From<Point> for [f64; 2] {
    fn from(value: Point) -> Self {
        [value.x, value.y]
    }
}

/// The 21 hand landmarks, in detector index order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Landmark {
    Wrist = 0,
    ThumbCmc = 1,
    ThumbMcp = 2,
    ThumbIp = 3,
    ThumbTip = 4,
    IndexMcp = 5,
    IndexPip = 6,
    IndexDip = 7,
    IndexTip = 8,
    MiddleMcp = 9,
    MiddlePip = 10,
    MiddleDip = 11,
    MiddleTip = 12,
    RingMcp = 13,
    RingPip = 14,
    RingDip = 15,
    RingTip = 16,
    PinkyMcp = 17,
    PinkyPip = 18,
    PinkyDip = 19,
    PinkyTip = 20,
}

impl Landmark {
    /// Array index of this landmark (0-20).
    pub fn index(self) -> usize {
        self as usize
    }
}

/// The five digits, in fingers-up vector order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Finger {
    Thumb,
    Index,
    Middle,
    Ring,
    Pinky,
}

impl Finger {
    /// All fingers in vector order.
    pub const ALL: [Finger; 5] = [
        Finger::Thumb,
        Finger::Index,
        Finger::Middle,
        Finger::Ring,
        Finger::Pinky,
    ];

    /// Fingertip landmark.
    pub fn tip(self) -> Landmark {
        match self {
            Finger::Thumb => Landmark::ThumbTip,
            Finger::Index => Landmark::IndexTip,
            Finger::Middle => Landmark::MiddleTip,
            Finger::Ring => Landmark::RingTip,
            Finger::Pinky => Landmark::PinkyTip,
        }
    }

    /// Joint the tip is compared against when deciding up/down.
    ///
    /// The thumb uses the joint directly below its tip (compared on x);
    /// the other fingers use the joint two segments below (compared on y).
    pub fn reference_joint(self) -> Landmark {
        match self {
            Finger::Thumb => Landmark::ThumbIp,
            Finger::Index => Landmark::IndexPip,
            Finger::Middle => Landmark::MiddlePip,
            Finger::Ring => Landmark::RingPip,
            Finger::Pinky => Landmark::PinkyPip,
        }
    }
}

/// Which hand the detector labelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HandSide {
    #[serde(alias = "left", alias = "LEFT")]
    Left,
    #[serde(alias = "right", alias = "RIGHT")]
    Right,
}

impl HandSide {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
        }
    }

    pub fn opposite(self) -> HandSide {
        match self {
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }
}

/// One detected hand: its side label and 21 landmark points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawHand", into = "RawHand")]
pub struct HandObservation {
    side: HandSide,
    landmarks: [Point; LANDMARK_COUNT],
}

impl HandObservation {
    /// Build an observation, validating the landmark count.
    pub fn new(side: HandSide, landmarks: &[Point]) -> HandmouseResult<Self> {
        let landmarks: [Point; LANDMARK_COUNT] = landmarks.try_into().map_err(|_| {
            HandmouseError::observation(format!(
                "expected {LANDMARK_COUNT} landmarks, got {}",
                landmarks.len()
            ))
        })?;
        Ok(Self { side, landmarks })
    }

    /// Build an observation from an already complete landmark array.
    pub fn from_array(side: HandSide, landmarks: [Point; LANDMARK_COUNT]) -> Self {
        Self { side, landmarks }
    }

    pub fn side(&self) -> HandSide {
        self.side
    }

    /// Position of a landmark.
    pub fn point(&self, landmark: Landmark) -> Point {
        self.landmarks[landmark.index()]
    }

    /// Distance between two landmarks.
    pub fn distance(&self, a: Landmark, b: Landmark) -> f64 {
        self.point(a).distance(&self.point(b))
    }

    pub fn landmarks(&self) -> &[Point; LANDMARK_COUNT] {
        &self.landmarks
    }

    /// Same hand with every landmark scaled (e.g. frame to screen space).
    pub fn scaled(&self, sx: f64, sy: f64) -> HandObservation {
        Self {
            side: self.side,
            landmarks: self.landmarks.map(|p| p.scaled(sx, sy)),
        }
    }

    /// The hand as seen in a horizontally flipped frame of `width` pixels.
    ///
    /// Handedness labels come from how the hand looks, so mirroring swaps
    /// the side as well.
    pub fn mirrored(&self, width: f64) -> HandObservation {
        Self {
            side: self.side.opposite(),
            landmarks: self.landmarks.map(|p| Point::new(width - p.x, p.y)),
        }
    }
}

#[derive(Serialize, Deserialize)]
struct RawHand {
    side: HandSide,
    landmarks: Vec<Point>,
}

impl TryFrom<RawHand> for HandObservation {
    type Error = HandmouseError;

    fn try_from(raw: RawHand) -> Result<Self, Self::Error> {
        HandObservation::new(raw.side, &raw.landmarks)
    }
}

impl From<HandObservation> for RawHand {
    fn from(hand: HandObservation) -> Self {
        RawHand {
            side: hand.side,
            landmarks: hand.landmarks.to_vec(),
        }
    }
}
