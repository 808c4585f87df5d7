//! Clock and timing utilities for gesture debouncing.
//!
//! Every gesture session is anchored to a monotonic epoch recorded when the
//! loop starts. Gates below take explicit timestamps (seconds since that
//! epoch) so replayed sessions behave exactly like live ones.

use std::time::Instant;

/// A session clock that provides monotonic timestamps relative to
/// a fixed epoch (the moment the gesture loop started).
#[derive(Debug, Clone)]
pub struct SessionClock {
    /// The instant the session started.
    epoch: Instant,

    /// Wall-clock time at epoch (ISO 8601 string).
    epoch_wall: String,
}

impl SessionClock {
    /// Create a new session clock anchored to now.
    pub fn start() -> Self {
        Self {
            epoch: Instant::now(),
            epoch_wall: chrono::Utc::now().to_rfc3339(),
        }
    }

    /// Get seconds elapsed since session start.
    pub fn elapsed_secs(&self) -> f64 {
        self.epoch.elapsed().as_secs_f64()
    }

    /// Wall-clock time at session start.
    pub fn epoch_wall(&self) -> &str {
        &self.epoch_wall
    }
}

/// Current Unix time as fractional seconds (microsecond precision).
pub fn unix_timestamp_secs() -> f64 {
    chrono::Utc::now().timestamp_micros() as f64 / 1_000_000.0
}

/// Minimum-interval gate for a class of actions.
///
/// The first call always passes; afterwards an action passes only when
/// strictly more than `interval_secs` has elapsed since the last firing.
#[derive(Debug, Clone)]
pub struct Cooldown {
    interval_secs: f64,
    last_fired_secs: Option<f64>,
}

impl Cooldown {
    /// Create a gate with the given minimum interval.
    pub fn new(interval_secs: f64) -> Self {
        Self {
            interval_secs,
            last_fired_secs: None,
        }
    }

    /// Whether an action at `now_secs` would pass the gate.
    pub fn is_ready(&self, now_secs: f64) -> bool {
        match self.last_fired_secs {
            None => true,
            Some(last) => now_secs - last > self.interval_secs,
        }
    }

    /// Record a firing at `now_secs`.
    pub fn mark(&mut self, now_secs: f64) {
        self.last_fired_secs = Some(now_secs);
    }

    /// Check the gate and record a firing if it passes.
    pub fn try_fire(&mut self, now_secs: f64) -> bool {
        if self.is_ready(now_secs) {
            self.mark(now_secs);
            true
        } else {
            false
        }
    }

    /// Timestamp of the last firing, if any.
    pub fn last_fired(&self) -> Option<f64> {
        self.last_fired_secs
    }

    /// Minimum interval in seconds.
    pub fn interval_secs(&self) -> f64 {
        self.interval_secs
    }
}

/// Tracks how long a pose has been held without interruption.
#[derive(Debug, Clone)]
pub struct HoldTimer {
    hold_secs: f64,
    started_at_secs: Option<f64>,
}

impl HoldTimer {
    /// Create a timer that completes after `hold_secs` of continuous hold.
    pub fn new(hold_secs: f64) -> Self {
        Self {
            hold_secs,
            started_at_secs: None,
        }
    }

    /// Start (if unset) or continue the hold. Returns true once the hold has
    /// lasted at least `hold_secs`.
    pub fn hold(&mut self, now_secs: f64) -> bool {
        let started = *self.started_at_secs.get_or_insert(now_secs);
        now_secs - started >= self.hold_secs
    }

    /// Clear any in-progress hold.
    pub fn reset(&mut self) {
        self.started_at_secs = None;
    }

    /// Seconds held so far, or zero when no hold is in progress.
    pub fn elapsed(&self, now_secs: f64) -> f64 {
        self.started_at_secs
            .map(|started| (now_secs - started).max(0.0))
            .unwrap_or(0.0)
    }

    /// Whether a hold is in progress.
    pub fn is_active(&self) -> bool {
        self.started_at_secs.is_some()
    }
}
