//! L3 Molecular Layer: Damped spring smoothing stage
//!
//! Converges a displayed value toward a moving target under
//! `a = (-k (x - target) - d v) / m`. The integrator is advanced explicitly
//! with [`Spring::step`], so it can be driven by a real frame loop or by
//! synthetic deltas in tests.

use crate::config::SpringConfig;

/// Largest integration sub-step in seconds
const MAX_SUBSTEP: f64 = 1.0 / 240.0;
/// Sub-steps per call; longer deltas are clamped to `MAX_SUBSTEPS * MAX_SUBSTEP`
const MAX_SUBSTEPS: f64 = 240.0;

/// Integrator state owned by one [`Spring`]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SpringState {
    pub value: f64,
    pub velocity: f64,
    pub target: f64,
}

/// Second-order damped filter
#[derive(Debug, Clone)]
pub struct Spring {
    config: SpringConfig,
    state: SpringState,
    settled: bool,
}

impl Default for Spring {
    fn default() -> Self {
        Self::new(SpringConfig::default())
    }
}

impl Spring {
    pub fn new(config: SpringConfig) -> Self {
        Self {
            config,
            state: SpringState::default(),
            settled: true,
        }
    }

    pub fn config(&self) -> &SpringConfig {
        &self.config
    }

    pub fn state(&self) -> SpringState {
        self.state
    }

    #[inline]
    pub fn value(&self) -> f64 {
        self.state.value
    }

    #[inline]
    pub fn velocity(&self) -> f64 {
        self.state.velocity
    }

    #[inline]
    pub fn target(&self) -> f64 {
        self.state.target
    }

    #[inline]
    pub fn is_settled(&self) -> bool {
        self.settled
    }

    /// Move the target; the value follows on subsequent steps
    pub fn set_target(&mut self, target: f64) {
        if target != self.state.target {
            self.state.target = target;
            self.settled = false;
        }
    }

    /// Place value and target at `value` with no motion
    pub fn jump_to(&mut self, value: f64) {
        self.state = SpringState {
            value,
            velocity: 0.0,
            target: value,
        };
        self.settled = true;
    }

    /// Drop all integrator state
    pub fn reset(&mut self) {
        self.jump_to(0.0);
    }

    /// Advance the integrator by `dt` seconds
    ///
    /// Returns true once the spring has come to rest on its target.
    /// Non-finite or non-positive deltas are ignored and deltas longer than
    /// one second are clamped, so a call is bounded in work.
    pub fn step(&mut self, dt: f64) -> bool {
        if self.settled || !(dt > 0.0) || !dt.is_finite() {
            return self.settled;
        }
        let dt = dt.min(MAX_SUBSTEPS * MAX_SUBSTEP);

        let SpringConfig {
            stiffness,
            damping,
            mass,
            ..
        } = self.config;

        let substeps = (dt / MAX_SUBSTEP).ceil().clamp(1.0, MAX_SUBSTEPS);
        let h = dt / substeps;
        let mut x = self.state.value;
        let mut v = self.state.velocity;
        let target = self.state.target;

        for _ in 0..substeps as u64 {
            // Semi-implicit Euler: velocity first, then position with the new velocity
            let accel = (-stiffness * (x - target) - damping * v) / mass;
            v += accel * h;
            x += v * h;
        }

        self.state.value = x;
        self.state.velocity = v;

        if (x - target).abs() < self.config.rest_delta && v.abs() < self.config.rest_speed {
            self.state.value = target;
            self.state.velocity = 0.0;
            self.settled = true;
        }
        self.settled
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(spring: &mut Spring, seconds: f64, dt: f64) {
        let mut t = 0.0;
        while t < seconds {
            spring.step(dt);
            t += dt;
        }
    }

    #[test]
    fn test_converges_to_target() {
        let mut spring = Spring::default();
        spring.set_target(500.0);
        assert!(!spring.is_settled());

        run(&mut spring, 5.0, 1.0 / 60.0);
        assert!(spring.is_settled());
        assert_eq!(spring.value(), 500.0);
        assert_eq!(spring.velocity(), 0.0);
    }

    #[test]
    fn test_moves_toward_target_without_jumping() {
        let mut spring = Spring::default();
        spring.set_target(100.0);
        spring.step(1.0 / 60.0);
        assert!(spring.value() > 0.0);
        assert!(spring.value() < 100.0);
    }

    #[test]
    fn test_overdamped_default_never_overshoots() {
        // Default damping 30 is above critical (2 * sqrt(100) = 20)
        let mut spring = Spring::default();
        spring.set_target(1000.0);
        for _ in 0..600 {
            spring.step(1.0 / 60.0);
            assert!(spring.value() <= 1000.0 + 1e-9);
        }
    }

    #[test]
    fn test_result_independent_of_frame_pacing() {
        let mut a = Spring::default();
        let mut b = Spring::default();
        a.set_target(300.0);
        b.set_target(300.0);

        // 0.5 s as 30 equal frames vs. 0.5 s as 120 equal frames
        for _ in 0..30 {
            a.step(0.5 / 30.0);
        }
        for _ in 0..120 {
            b.step(0.5 / 120.0);
        }
        assert!((a.value() - b.value()).abs() < 1.0);
    }

    #[test]
    fn test_zero_stiffness_never_converges_and_never_panics() {
        let mut spring = Spring::new(SpringConfig {
            stiffness: 0.0,
            ..SpringConfig::default()
        });
        spring.set_target(100.0);
        run(&mut spring, 10.0, 1.0 / 60.0);
        assert!(!spring.is_settled());
        assert_eq!(spring.value(), 0.0);
        assert!(spring.value().is_finite());
    }

    #[test]
    fn test_non_positive_dt_is_ignored() {
        let mut spring = Spring::default();
        spring.set_target(10.0);
        spring.step(0.0);
        spring.step(-1.0);
        spring.step(f64::NAN);
        assert_eq!(spring.value(), 0.0);
    }

    #[test]
    fn test_infinite_dt_is_ignored() {
        let mut spring = Spring::default();
        spring.set_target(100.0);
        assert!(!spring.step(f64::INFINITY));
        assert_eq!(spring.value(), 0.0);
        assert_eq!(spring.velocity(), 0.0);
    }

    #[test]
    fn test_huge_dt_is_clamped_to_one_second() {
        let mut a = Spring::default();
        let mut b = Spring::default();
        a.set_target(100.0);
        b.set_target(100.0);
        a.step(1e9);
        b.step(1.0);
        assert_eq!(a.state(), b.state());
        assert!(a.value() > 0.0 && a.value() <= 100.0);
    }

    #[test]
    fn test_reset_and_jump() {
        let mut spring = Spring::default();
        spring.set_target(42.0);
        spring.step(0.1);
        spring.jump_to(7.0);
        assert_eq!(spring.value(), 7.0);
        assert_eq!(spring.target(), 7.0);
        assert!(spring.is_settled());
        spring.reset();
        assert_eq!(spring.state(), SpringState::default());
    }
}
