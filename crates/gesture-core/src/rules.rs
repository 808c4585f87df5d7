//! Ordered gesture dispatch tables.
//!
//! Each hand role has a table of `(pattern, rule)` pairs evaluated top to
//! bottom; the first pattern that matches the finger state wins.

use handmouse_hand_model::Hotkey;

use crate::fingers::FingerState;

/// A finger-state pattern where each digit is required up, required down,
/// or ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FingerPattern([Option<bool>; 5]);

impl FingerPattern {
    /// Every digit must match `pattern` (0 = down, 1 = up).
    pub const fn exact(pattern: [u8; 5]) -> Self {
        let mut mask = [None; 5];
        let mut i = 0;
        while i < 5 {
            mask[i] = Some(pattern[i] != 0);
            i += 1;
        }
        Self(mask)
    }

    /// Only thumb, index and middle are checked; ring and pinky are free.
    pub const fn leading(pattern: [u8; 3]) -> Self {
        Self([
            Some(pattern[0] != 0),
            Some(pattern[1] != 0),
            Some(pattern[2] != 0),
            None,
            None,
        ])
    }

    pub fn matches(&self, state: &FingerState) -> bool {
        self.0
            .iter()
            .zip(state.as_array())
            .all(|(want, up)| want.map_or(true, |w| w == up))
    }
}

/// Right-hand (pointer) gestures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RightRule {
    Move,
    LeftClick,
    RightClick,
    DoubleClick,
    ScrollUp,
    ScrollDown,
}

/// Left-hand (shortcut) gestures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LeftRule {
    Screenshot,
    SelectAll,
    Copy,
    Paste,
    StopHold,
}

/// Right-hand table, highest priority first.
pub const RIGHT_RULES: &[(FingerPattern, RightRule)] = &[
    (FingerPattern::leading([0, 1, 1]), RightRule::Move),
    (FingerPattern::leading([1, 0, 1]), RightRule::LeftClick),
    (FingerPattern::leading([1, 1, 0]), RightRule::RightClick),
    (FingerPattern::leading([1, 0, 0]), RightRule::DoubleClick),
    (FingerPattern::exact([0, 1, 0, 0, 0]), RightRule::ScrollUp),
    (FingerPattern::exact([0, 1, 0, 0, 1]), RightRule::ScrollDown),
];

/// Left-hand finger-pattern table. The screenshot pinch is distance based
/// and is checked before this table.
pub const LEFT_RULES: &[(FingerPattern, LeftRule)] = &[
    (FingerPattern::exact([1, 1, 1, 0, 0]), LeftRule::SelectAll),
    (FingerPattern::exact([1, 1, 1, 1, 0]), LeftRule::Copy),
    (FingerPattern::exact([1, 0, 0, 0, 0]), LeftRule::Paste),
    (FingerPattern::exact([0, 0, 0, 0, 0]), LeftRule::StopHold),
];

fn first_match<R: Copy>(table: &[(FingerPattern, R)], state: &FingerState) -> Option<R> {
    table
        .iter()
        .find(|(pattern, _)| pattern.matches(state))
        .map(|(_, rule)| *rule)
}

/// First right-hand rule matching `state`.
pub fn select_right(state: &FingerState) -> Option<RightRule> {
    first_match(RIGHT_RULES, state)
}

/// First left-hand rule, given the finger state and whether the thumb and
/// middle tips are pinched together.
pub fn select_left(state: &FingerState, thumb_middle_pinch: bool) -> Option<LeftRule> {
    if thumb_middle_pinch {
        return Some(LeftRule::Screenshot);
    }
    first_match(LEFT_RULES, state)
}

/// Single-hand hotkey table (exact matches only).
pub const SINGLE_HAND_HOTKEYS: &[(FingerPattern, Hotkey)] = &[
    (FingerPattern::exact([0, 1, 1, 0, 0]), Hotkey::Copy),
    (FingerPattern::exact([0, 1, 1, 1, 0]), Hotkey::Cut),
    (FingerPattern::exact([0, 1, 1, 1, 1]), Hotkey::Paste),
    (FingerPattern::exact([1, 1, 1, 1, 1]), Hotkey::SelectAll),
];

/// Hotkey for a single-hand finger state, if any.
pub fn select_single_hand_hotkey(state: &FingerState) -> Option<Hotkey> {
    first_match(SINGLE_HAND_HOTKEYS, state)
}
