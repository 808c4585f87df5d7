//! Dual-hand gesture interpreter.
//!
//! The right hand steers the pointer (move, clicks, scroll); the left hand
//! fires shortcuts (screenshot, select-all, copy, paste) and ends the
//! session with a held fist. Each hand emits at most one action per frame.

use handmouse_common::clock::{Cooldown, HoldTimer};
use handmouse_common::config::GestureConfig;
use handmouse_hand_model::{
    ActionRecord, FrameObservation, GestureAction, HandObservation, HandSide, Hotkey, Landmark,
    MouseButton,
};
use handmouse_platform_core::{CaptureRect, ScreenGeometry};

use crate::fingers::fingers_up;
use crate::rules::{select_left, select_right, LeftRule, RightRule};
use crate::smoothing::CursorSmoother;
use crate::{GestureMapper, InterpreterMode};

/// Rate limiters and the stop-hold timer.
#[derive(Debug, Clone)]
pub struct GestureTimers {
    /// Shared by left, right and double click.
    pub click: Cooldown,
    pub scroll: Cooldown,
    /// Shared by the left-hand clipboard shortcuts when configured.
    pub clipboard: Option<Cooldown>,
    pub stop_hold: HoldTimer,
}

impl GestureTimers {
    pub fn from_config(config: &GestureConfig) -> Self {
        Self {
            click: Cooldown::new(config.click_cooldown_secs),
            scroll: Cooldown::new(config.scroll_cooldown_secs),
            clipboard: config.clipboard_cooldown_secs.map(Cooldown::new),
            stop_hold: HoldTimer::new(config.stop_hold_secs),
        }
    }
}

/// The dual-hand state machine.
pub struct GestureInterpreter {
    config: GestureConfig,
    screen: ScreenGeometry,
    smoother: CursorSmoother,
    timers: GestureTimers,
}

impl GestureInterpreter {
    pub fn new(config: &GestureConfig, screen: ScreenGeometry) -> Self {
        Self {
            config: config.clone(),
            screen,
            smoother: CursorSmoother::new(config.smoothening),
            timers: GestureTimers::from_config(config),
        }
    }

    /// Current smoothed pointer position.
    pub fn cursor(&self) -> (f64, f64) {
        self.smoother.position()
    }

    pub fn timers(&self) -> &GestureTimers {
        &self.timers
    }

    /// Seconds the stop fist has been held as of `now_secs`.
    pub fn stop_hold_elapsed(&self, now_secs: f64) -> f64 {
        self.timers.stop_hold.elapsed(now_secs)
    }

    /// Interpret one frame.
    pub fn process_frame(&mut self, frame: &FrameObservation) -> Vec<ActionRecord> {
        let now = frame.t;

        // The hold follows the fist pose itself: any frame without a left
        // fist (including frames with no left hand) restarts it. A pinched
        // fist is the screenshot pose and restarts it too.
        let left_fist = frame.hands_on(HandSide::Left).any(|hand| {
            fingers_up(hand, HandSide::Left).all_down() && !self.screenshot_pinch(hand)
        });
        let hold_complete = if left_fist {
            self.timers.stop_hold.hold(now)
        } else {
            if self.timers.stop_hold.is_active() {
                tracing::debug!(t = now, "Stop hold interrupted");
            }
            self.timers.stop_hold.reset();
            false
        };

        let mut actions = Vec::new();
        for hand in &frame.hands {
            let action = match hand.side() {
                HandSide::Right => self.right_hand(hand, frame, now),
                HandSide::Left => self.left_hand(hand, now, hold_complete),
            };
            if let Some(action) = action {
                actions.push(ActionRecord {
                    t: now,
                    hand: Some(hand.side()),
                    action,
                });
            }
        }
        actions
    }

    fn right_hand(
        &mut self,
        hand: &HandObservation,
        frame: &FrameObservation,
        now: f64,
    ) -> Option<GestureAction> {
        let state = fingers_up(hand, HandSide::Right);
        let rule = select_right(&state)?;
        tracing::trace!(fingers = %state, ?rule, "Right hand");

        match rule {
            RightRule::Move => {
                let tip = hand.point(Landmark::IndexTip);
                let rect =
                    CaptureRect::inset(frame.width, frame.height, self.config.frame_reduction);
                let (tx, ty) = rect.map_to_screen(tip.x, tip.y, self.screen);
                let (x, y) = self.smoother.step(tx, ty);
                Some(GestureAction::MoveCursor { x, y })
            }
            RightRule::LeftClick => self.click(now, GestureAction::Click {
                button: MouseButton::Left,
            }),
            RightRule::RightClick => self.click(now, GestureAction::Click {
                button: MouseButton::Right,
            }),
            RightRule::DoubleClick => self.click(now, GestureAction::DoubleClick),
            RightRule::ScrollUp => self.scroll(now, self.config.scroll_step),
            RightRule::ScrollDown => self.scroll(now, -self.config.scroll_step),
        }
    }

    fn click(&mut self, now: f64, action: GestureAction) -> Option<GestureAction> {
        self.timers.click.try_fire(now).then_some(action)
    }

    fn scroll(&mut self, now: f64, delta: i32) -> Option<GestureAction> {
        self.timers
            .scroll
            .try_fire(now)
            .then_some(GestureAction::Scroll { delta })
    }

    fn left_hand(
        &mut self,
        hand: &HandObservation,
        now: f64,
        hold_complete: bool,
    ) -> Option<GestureAction> {
        let state = fingers_up(hand, HandSide::Left);
        let rule = select_left(&state, self.screenshot_pinch(hand))?;
        tracing::trace!(fingers = %state, ?rule, "Left hand");

        match rule {
            LeftRule::Screenshot => Some(GestureAction::Screenshot),
            LeftRule::SelectAll => self.clipboard(now, Hotkey::SelectAll),
            LeftRule::Copy => self.clipboard(now, Hotkey::Copy),
            LeftRule::Paste => self.clipboard(now, Hotkey::Paste),
            LeftRule::StopHold => {
                if hold_complete {
                    tracing::info!(
                        held_secs = self.timers.stop_hold.elapsed(now),
                        "Stop gesture held"
                    );
                    Some(GestureAction::Stop)
                } else {
                    None
                }
            }
        }
    }

    fn screenshot_pinch(&self, hand: &HandObservation) -> bool {
        hand.distance(Landmark::ThumbTip, Landmark::MiddleTip) < self.config.screenshot_distance_px
    }

    fn clipboard(&mut self, now: f64, hotkey: Hotkey) -> Option<GestureAction> {
        let ready = match self.timers.clipboard.as_mut() {
            Some(gate) => gate.try_fire(now),
            None => true,
        };
        ready.then_some(GestureAction::Hotkey { hotkey })
    }
}

impl GestureMapper for GestureInterpreter {
    fn process(&mut self, frame: &FrameObservation) -> Vec<ActionRecord> {
        self.process_frame(frame)
    }

    fn mode(&self) -> InterpreterMode {
        InterpreterMode::DualHand
    }

    fn stop_hold_progress(&self, now_secs: f64) -> Option<f64> {
        self.timers
            .stop_hold
            .is_active()
            .then(|| self.timers.stop_hold.elapsed(now_secs))
    }
}
