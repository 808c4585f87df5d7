//! Synthetic hand poses.
//!
//! Builds plausible 21-point hands for a requested fingers-up pattern. Used
//! to build replay recordings and to drive the interpreter in tests without
//! a detector.

use crate::landmark::{Finger, HandObservation, HandSide, Landmark, Point, LANDMARK_COUNT};

/// Builder for a synthetic hand pose.
#[derive(Debug, Clone)]
pub struct SyntheticHand {
    side: HandSide,
    up: [bool; 5],
    center: Point,
    thumb_touching: Option<Finger>,
}

impl SyntheticHand {
    /// A fist centered in a 640x480 frame.
    pub fn new(side: HandSide) -> Self {
        Self {
            side,
            up: [false; 5],
            center: Point::new(320.0, 240.0),
            thumb_touching: None,
        }
    }

    /// Fingers-up pattern in thumb..pinky order; non-zero means up.
    pub fn fingers(mut self, pattern: [u8; 5]) -> Self {
        self.up = pattern.map(|f| f != 0);
        self
    }

    /// Move the knuckle line center (the middle finger's base joint).
    pub fn centered_at(mut self, x: f64, y: f64) -> Self {
        self.center = Point::new(x, y);
        self
    }

    /// Place the thumb tip right next to another fingertip (pinch).
    pub fn thumb_touching(mut self, finger: Finger) -> Self {
        self.thumb_touching = Some(finger);
        self
    }

    /// Where the index fingertip will land for the current settings.
    pub fn index_tip(&self) -> Point {
        self.build().point(Landmark::IndexTip)
    }

    pub fn build(&self) -> HandObservation {
        // Thumb extends away from the palm: toward -x for a right label,
        // toward +x for a left label.
        let s = match self.side {
            HandSide::Right => -1.0,
            HandSide::Left => 1.0,
        };
        let Point { x: cx, y: cy } = self.center;
        let mut points = [Point::default(); LANDMARK_COUNT];

        points[Landmark::Wrist.index()] = Point::new(cx, cy + 60.0);
        points[Landmark::ThumbCmc.index()] = Point::new(cx + s * 20.0, cy + 40.0);
        points[Landmark::ThumbMcp.index()] = Point::new(cx + s * 35.0, cy + 30.0);
        points[Landmark::ThumbIp.index()] = Point::new(cx + s * 50.0, cy + 20.0);
        let thumb_reach = if self.up[0] { 75.0 } else { 30.0 };
        points[Landmark::ThumbTip.index()] = Point::new(cx + s * thumb_reach, cy + 25.0);

        for (slot, finger) in Finger::ALL.into_iter().enumerate().skip(1) {
            // Index sits next to the thumb, pinky furthest from it.
            let x = cx + s * (30.0 - 15.0 * slot as f64);
            let base = finger.tip().index() - 3;
            let (dip_y, tip_y) = if self.up[slot] {
                (cy - 40.0, cy - 55.0)
            } else {
                (cy - 15.0, cy - 5.0)
            };
            points[base] = Point::new(x, cy);
            points[base + 1] = Point::new(x, cy - 25.0);
            points[base + 2] = Point::new(x, dip_y);
            points[base + 3] = Point::new(x, tip_y);
        }

        if let Some(finger) = self.thumb_touching {
            let tip = points[finger.tip().index()];
            points[Landmark::ThumbTip.index()] = Point::new(tip.x + s * 2.0, tip.y + 2.0);
        }

        HandObservation::from_array(self.side, points)
    }
}
