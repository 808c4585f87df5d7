//! Single-hand gesture interpreter.
//!
//! One hand does everything: the cursor tracks the index tip on every frame,
//! a thumb-index pinch clicks and drags, a thumb-middle pinch right-clicks,
//! vertical index motion scrolls, and a few finger patterns fire hotkeys.
//! There is no exit gesture in this mode.

use handmouse_common::config::SingleHandConfig;
use handmouse_hand_model::{
    ActionRecord, FrameObservation, GestureAction, HandSide, Landmark, MouseButton, Point,
};
use handmouse_platform_core::ScreenGeometry;

use crate::fingers::fingers_up;
use crate::rules::select_single_hand_hotkey;
use crate::smoothing::IntegerSmoother;
use crate::{GestureMapper, InterpreterMode};

/// Edge-detection and scroll memory carried between frames.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SingleHandState {
    /// Thumb and index were pinched on the previous frame (button held).
    pub dragging: bool,
    /// Thumb and middle were pinched on the previous frame.
    pub right_pinched: bool,
    /// Index-tip screen y from the previous frame; 0 until first seen.
    pub prev_scroll_y: i32,
}

/// The single-hand state machine.
pub struct SingleHandInterpreter {
    config: SingleHandConfig,
    screen: ScreenGeometry,
    smoother: IntegerSmoother,
    state: SingleHandState,
}

impl SingleHandInterpreter {
    pub fn new(config: &SingleHandConfig, screen: ScreenGeometry) -> Self {
        Self {
            config: config.clone(),
            screen,
            smoother: IntegerSmoother::new(config.smoothing),
            state: SingleHandState::default(),
        }
    }

    pub fn state(&self) -> &SingleHandState {
        &self.state
    }

    pub fn cursor(&self) -> (i32, i32) {
        self.smoother.position()
    }

    /// Interpret one frame.
    pub fn process_frame(&mut self, frame: &FrameObservation) -> Vec<ActionRecord> {
        let now = frame.t;
        let mut actions = Vec::new();
        let mut emit = |action: GestureAction| {
            actions.push(ActionRecord {
                t: now,
                hand: None,
                action,
            })
        };

        let Some(raw) = frame.hands.first() else {
            // A lost hand must not leave the button stuck down.
            if self.state.dragging {
                tracing::debug!(t = now, "Hand lost while dragging, releasing button");
                self.state.dragging = false;
                emit(GestureAction::MouseUp);
            }
            self.state.right_pinched = false;
            return actions;
        };

        let (sx, sy) = self.screen.scale_from(frame.width, frame.height);
        let hand = raw.scaled(sx, sy);
        let state = fingers_up(&hand, HandSide::Right);
        let index_tip = hand.point(Landmark::IndexTip);
        tracing::trace!(fingers = %state, "Single hand");

        let (x, y) = self
            .smoother
            .step(index_tip.x.floor() as i32, index_tip.y.floor() as i32);
        emit(GestureAction::MoveCursor {
            x: x as f64,
            y: y as f64,
        });

        // The click pinch is measured against the smoothed cursor, so a
        // pointer still catching up with the hand does not click.
        let pinch = self.config.pinch_distance_px;
        let thumb_tip = hand.point(Landmark::ThumbTip);
        let thumb = Point::new(thumb_tip.x.floor(), thumb_tip.y.floor());
        let left_pinch = thumb.distance(&Point::new(x as f64, y as f64)) < pinch;
        match (left_pinch, self.state.dragging) {
            (true, false) => {
                emit(GestureAction::Click {
                    button: MouseButton::Left,
                });
                emit(GestureAction::MouseDown);
            }
            (false, true) => emit(GestureAction::MouseUp),
            _ => {}
        }
        self.state.dragging = left_pinch;

        let right_pinch = hand.distance(Landmark::ThumbTip, Landmark::MiddleTip) < pinch;
        if right_pinch && !(self.config.edge_triggered_right_click && self.state.right_pinched) {
            emit(GestureAction::Click {
                button: MouseButton::Right,
            });
        }
        self.state.right_pinched = right_pinch;

        let scroll_y = index_tip.y.floor() as i32;
        if self.state.prev_scroll_y != 0 {
            let dy = scroll_y - self.state.prev_scroll_y;
            if dy > self.config.scroll_threshold_px {
                emit(GestureAction::Scroll {
                    delta: -self.config.scroll_step,
                });
            } else if dy < -self.config.scroll_threshold_px {
                emit(GestureAction::Scroll {
                    delta: self.config.scroll_step,
                });
            }
        }
        self.state.prev_scroll_y = scroll_y;

        if let Some(hotkey) = select_single_hand_hotkey(&state) {
            emit(GestureAction::Hotkey { hotkey });
        }

        actions
    }
}

impl GestureMapper for SingleHandInterpreter {
    fn process(&mut self, frame: &FrameObservation) -> Vec<ActionRecord> {
        self.process_frame(frame)
    }

    fn mode(&self) -> InterpreterMode {
        InterpreterMode::SingleHand
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use handmouse_hand_model::synthetic::SyntheticHand;
    use handmouse_hand_model::{Finger, HandObservation, Hotkey};

    fn interpreter() -> SingleHandInterpreter {
        SingleHandInterpreter::new(&SingleHandConfig::default(), ScreenGeometry::new(1920, 1080))
    }

    fn frame(t: f64, hand: HandObservation) -> FrameObservation {
        FrameObservation::new(t, 640, 480, vec![hand])
    }

    fn actions(records: &[ActionRecord]) -> Vec<GestureAction> {
        records.iter().map(|r| r.action).collect()
    }

    fn non_move(records: &[ActionRecord]) -> Vec<GestureAction> {
        actions(records)
            .into_iter()
            .filter(|a| !matches!(a, GestureAction::MoveCursor { .. }))
            .collect()
    }

    #[test]
    fn cursor_moves_every_frame_in_screen_space() {
        let mut interp = interpreter();
        // Index tip at frame (305, 235) scales to screen (915, 528.75).
        let hand = SyntheticHand::new(HandSide::Right).build();
        let records = interp.process_frame(&frame(0.0, hand));
        assert_eq!(
            records[0].action,
            GestureAction::MoveCursor { x: 183.0, y: 105.0 }
        );
        assert_eq!(records[0].hand, None);
    }

    /// Hold `hand` still long enough for the cursor to catch up with it.
    fn settle(interp: &mut SingleHandInterpreter, hand: &HandObservation) {
        for i in 0..60 {
            let records = interp.process_frame(&frame(i as f64 / 30.0, hand.clone()));
            assert!(non_move(&records).is_empty(), "frame {i}: {records:?}");
        }
    }

    #[test]
    fn pinch_clicks_once_then_drags_until_release() {
        let mut interp = interpreter();
        let pinched = SyntheticHand::new(HandSide::Right)
            .fingers([0, 1, 0, 0, 0])
            .thumb_touching(Finger::Index)
            .build();
        let open = SyntheticHand::new(HandSide::Right)
            .fingers([0, 1, 0, 0, 0])
            .build();
        settle(&mut interp, &open);

        let first = interp.process_frame(&frame(2.0, pinched.clone()));
        assert_eq!(
            non_move(&first),
            vec![
                GestureAction::Click {
                    button: MouseButton::Left
                },
                GestureAction::MouseDown
            ]
        );
        assert!(interp.state().dragging);

        let held = interp.process_frame(&frame(2.03, pinched));
        assert!(non_move(&held).is_empty());

        let released = interp.process_frame(&frame(2.06, open));
        assert_eq!(non_move(&released), vec![GestureAction::MouseUp]);
        assert!(!interp.state().dragging);
    }

    #[test]
    fn pinch_is_ignored_while_cursor_lags_behind_the_hand() {
        let mut interp = interpreter();
        let pinched = SyntheticHand::new(HandSide::Right)
            .fingers([0, 1, 0, 0, 0])
            .thumb_touching(Finger::Index)
            .build();
        assert!(pinched.distance(Landmark::ThumbTip, Landmark::IndexTip) < 5.0);

        // The cursor starts at the origin, far from the pinching fingers.
        let records = interp.process_frame(&frame(0.0, pinched.clone()));
        assert_eq!(
            records[0].action,
            GestureAction::MoveCursor { x: 183.0, y: 83.0 }
        );
        assert!(non_move(&records).is_empty());
        assert!(!interp.state().dragging);

        // Once the cursor reaches the thumb the same pose clicks.
        let clicked_at = (1..60)
            .find(|&i| {
                let records = interp.process_frame(&frame(i as f64 / 30.0, pinched.clone()));
                !non_move(&records).is_empty()
            })
            .expect("pinch should click once the cursor settles");
        assert!(clicked_at > 5, "clicked on frame {clicked_at}");
        assert!(interp.state().dragging);

        // A jump to a new spot leaves the cursor behind again: no new press.
        let moved = SyntheticHand::new(HandSide::Right)
            .fingers([0, 1, 0, 0, 0])
            .thumb_touching(Finger::Index)
            .centered_at(100.0, 400.0)
            .build();
        let after_jump = non_move(&interp.process_frame(&frame(3.0, moved)));
        assert!(after_jump.contains(&GestureAction::MouseUp));
        assert!(!after_jump.contains(&GestureAction::MouseDown));
    }

    #[test]
    fn right_click_is_level_triggered_by_default() {
        let mut interp = interpreter();
        let hand = SyntheticHand::new(HandSide::Right)
            .fingers([0, 0, 1, 0, 0])
            .thumb_touching(Finger::Middle)
            .build();
        for t in [0.0, 0.03, 0.06] {
            let records = interp.process_frame(&frame(t, hand.clone()));
            assert_eq!(
                non_move(&records),
                vec![GestureAction::Click {
                    button: MouseButton::Right
                }]
            );
        }
    }

    #[test]
    fn right_click_edge_triggered_when_configured() {
        let config = SingleHandConfig {
            edge_triggered_right_click: true,
            ..SingleHandConfig::default()
        };
        let mut interp = SingleHandInterpreter::new(&config, ScreenGeometry::new(1920, 1080));
        let hand = SyntheticHand::new(HandSide::Right)
            .fingers([0, 0, 1, 0, 0])
            .thumb_touching(Finger::Middle)
            .build();
        let clicks: usize = [0.0, 0.03, 0.06]
            .into_iter()
            .map(|t| non_move(&interp.process_frame(&frame(t, hand.clone()))).len())
            .sum();
        assert_eq!(clicks, 1);
    }

    #[test]
    fn vertical_motion_scrolls_after_first_sample() {
        let mut interp = interpreter();
        let at = |y: f64| {
            SyntheticHand::new(HandSide::Right)
                .fingers([0, 1, 0, 0, 0])
                .centered_at(320.0, y)
                .build()
        };
        // First frame only records the baseline.
        assert!(non_move(&interp.process_frame(&frame(0.0, at(240.0)))).is_empty());
        // 20 frame px down = 45 screen px down.
        assert_eq!(
            non_move(&interp.process_frame(&frame(0.1, at(260.0)))),
            vec![GestureAction::Scroll { delta: -1 }]
        );
        assert_eq!(
            non_move(&interp.process_frame(&frame(0.2, at(240.0)))),
            vec![GestureAction::Scroll { delta: 1 }]
        );
        // 5 frame px = 11.25 screen px, under the threshold.
        assert!(non_move(&interp.process_frame(&frame(0.3, at(245.0)))).is_empty());
    }

    #[test]
    fn hotkeys_fire_on_exact_patterns() {
        let mut interp = interpreter();
        let cases = [
            ([0, 1, 1, 0, 0], Hotkey::Copy),
            ([0, 1, 1, 1, 0], Hotkey::Cut),
            ([0, 1, 1, 1, 1], Hotkey::Paste),
            ([1, 1, 1, 1, 1], Hotkey::SelectAll),
        ];
        for (i, (pattern, hotkey)) in cases.into_iter().enumerate() {
            let hand = SyntheticHand::new(HandSide::Right).fingers(pattern).build();
            let records = interp.process_frame(&frame(i as f64, hand));
            assert!(actions(&records).contains(&GestureAction::Hotkey { hotkey }));
        }
    }

    #[test]
    fn losing_the_hand_releases_a_drag() {
        let mut interp = interpreter();
        let pinched = SyntheticHand::new(HandSide::Right)
            .thumb_touching(Finger::Index)
            .build();
        for i in 0..60 {
            interp.process_frame(&frame(i as f64 / 30.0, pinched.clone()));
        }
        assert!(interp.state().dragging);
        let records = interp.process_frame(&FrameObservation::empty(2.0, 640, 480));
        assert_eq!(actions(&records), vec![GestureAction::MouseUp]);
    }
}
