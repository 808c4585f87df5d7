//! Cursor motion smoothing.
//!
//! Both filters move a fraction of the remaining distance toward the
//! latest target each frame, which removes landmark jitter at the cost of a
//! little lag. Higher divisors mean smoother, slower cursors.

/// Exponential cursor filter: `p += (target - p) / divisor`.
///
/// The filter state starts at the screen origin.
#[derive(Debug, Clone)]
pub struct CursorSmoother {
    divisor: f64,
    x: f64,
    y: f64,
}

impl CursorSmoother {
    /// Create a filter. Divisors below 1 would overshoot and are raised to 1
    /// (no smoothing).
    pub fn new(divisor: f64) -> Self {
        Self {
            divisor: if divisor >= 1.0 { divisor } else { 1.0 },
            x: 0.0,
            y: 0.0,
        }
    }

    /// Advance toward `(target_x, target_y)` and return the new position.
    pub fn step(&mut self, target_x: f64, target_y: f64) -> (f64, f64) {
        self.x += (target_x - self.x) / self.divisor;
        self.y += (target_y - self.y) / self.divisor;
        (self.x, self.y)
    }

    pub fn position(&self) -> (f64, f64) {
        (self.x, self.y)
    }

    pub fn divisor(&self) -> f64 {
        self.divisor
    }

    /// Forget the current position and restart from the origin.
    pub fn reset(&mut self) {
        self.x = 0.0;
        self.y = 0.0;
    }
}

/// Integer cursor filter with floor division:
/// `p += floor((target - p) / divisor)`.
///
/// Floor division never overshoots but stalls up to `divisor - 1` pixels
/// left/above a target approached from below.
#[derive(Debug, Clone)]
pub struct IntegerSmoother {
    divisor: i32,
    x: i32,
    y: i32,
}

impl IntegerSmoother {
    pub fn new(divisor: i32) -> Self {
        Self {
            divisor: divisor.max(1),
            x: 0,
            y: 0,
        }
    }

    pub fn step(&mut self, target_x: i32, target_y: i32) -> (i32, i32) {
        self.x += (target_x - self.x).div_euclid(self.divisor);
        self.y += (target_y - self.y).div_euclid(self.divisor);
        (self.x, self.y)
    }

    pub fn position(&self) -> (i32, i32) {
        (self.x, self.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_first_step_moves_one_divisor_fraction() {
        let mut smoother = CursorSmoother::new(5.0);
        let (x, y) = smoother.step(1000.0, 500.0);
        assert!((x - 200.0).abs() < 1e-9);
        assert!((y - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_divisor_below_one_disables_smoothing() {
        let mut smoother = CursorSmoother::new(0.2);
        assert_eq!(smoother.step(300.0, 40.0), (300.0, 40.0));
    }

    #[test]
    fn test_reset_returns_to_origin() {
        let mut smoother = CursorSmoother::new(3.0);
        smoother.step(90.0, 90.0);
        smoother.reset();
        assert_eq!(smoother.position(), (0.0, 0.0));
    }

    #[test]
    fn test_integer_smoother_floors_toward_negative() {
        let mut smoother = IntegerSmoother::new(5);
        assert_eq!(smoother.step(12, 3), (2, 0));
        // -2 / 5 floors to -1, so the filter still moves left.
        assert_eq!(smoother.step(0, 0), (1, 0));
    }

    #[test]
    fn test_integer_smoother_stalls_short_of_target() {
        let mut smoother = IntegerSmoother::new(5);
        for _ in 0..200 {
            smoother.step(1000, 1000);
        }
        let (x, y) = smoother.position();
        assert!((996..=1000).contains(&x));
        assert!((996..=1000).contains(&y));
    }

    proptest! {
        #[test]
        fn converges_within_bound_proportional_to_divisor(
            divisor in 1.0f64..20.0,
            tx in -3000.0f64..3000.0,
            ty in -3000.0f64..3000.0,
        ) {
            let mut smoother = CursorSmoother::new(divisor);
            // (1 - 1/d)^(10d) <= e^-10 for every d >= 1.
            let steps = (10.0 * divisor).ceil() as usize;
            for _ in 0..steps {
                smoother.step(tx, ty);
            }
            let (x, y) = smoother.position();
            let bound = 3000.0 * (-10.0f64).exp() + 1e-9;
            prop_assert!((x - tx).abs() <= bound);
            prop_assert!((y - ty).abs() <= bound);
        }

        #[test]
        fn monotone_approach_without_overshoot(
            divisor in 1.0f64..20.0,
            start in 0.0f64..500.0,
            slope in 0.0f64..40.0,
        ) {
            let mut smoother = CursorSmoother::new(divisor);
            let mut prev = 0.0;
            for n in 0..200 {
                let target = start + slope * n as f64;
                let (x, _) = smoother.step(target, 0.0);
                prop_assert!(x >= prev - 1e-9);
                prop_assert!(x <= target + 1e-9);
                prev = x;
            }
        }
    }
}
