//! Finger-state classification.
//!
//! A finger counts as "up" when its tip is further from the palm than a
//! reference joint. For the four fingers that is a vertical comparison
//! against the PIP joint; the thumb folds sideways, so it is compared on x
//! and the direction depends on which hand it is.

use std::fmt;

use handmouse_hand_model::{Finger, HandObservation, HandSide};

/// Up/down state of the five digits, thumb first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct FingerState([bool; 5]);

impl FingerState {
    pub fn new(up: [bool; 5]) -> Self {
        Self(up)
    }

    /// Build from a 0/1 pattern in thumb..pinky order.
    pub fn from_pattern(pattern: [u8; 5]) -> Self {
        Self(pattern.map(|f| f != 0))
    }

    pub fn is_up(&self, finger: Finger) -> bool {
        self.0[finger as usize]
    }

    pub fn as_array(&self) -> [bool; 5] {
        self.0
    }

    /// Number of extended digits.
    pub fn count_up(&self) -> usize {
        self.0.iter().filter(|up| **up).count()
    }

    /// Closed fist.
    pub fn all_down(&self) -> bool {
        self.0.iter().all(|up| !up)
    }

    /// Every one of the 32 possible states, in binary counting order.
    pub fn all_states() -> impl Iterator<Item = FingerState> {
        (0u8..32).map(|bits| {
            let mut up = [false; 5];
            for (i, slot) in up.iter_mut().enumerate() {
                *slot = bits & (1 << (4 - i)) != 0;
            }
            FingerState(up)
        })
    }
}

impl fmt::Display for FingerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, up) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            write!(f, "{}", u8::from(*up))?;
        }
        write!(f, "]")
    }
}

/// Classify each digit of `hand` as up or down.
///
/// `thumb_side` picks the thumb direction; it is usually `hand.side()`, but
/// the single-hand variant always reads the thumb as a right hand.
pub fn fingers_up(hand: &HandObservation, thumb_side: HandSide) -> FingerState {
    let mut up = [false; 5];
    for finger in Finger::ALL {
        let tip = hand.point(finger.tip());
        let joint = hand.point(finger.reference_joint());
        up[finger as usize] = match (finger, thumb_side) {
            (Finger::Thumb, HandSide::Right) => tip.x < joint.x,
            (Finger::Thumb, HandSide::Left) => tip.x > joint.x,
            _ => tip.y < joint.y,
        };
    }
    FingerState(up)
}
