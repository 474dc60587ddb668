//! Auto-advance driver
//!
//! Moves a raw scroll signal without user input, either continuously at a
//! fixed rate or in eased steps of one layer spacing. It only ever writes
//! the signal it is handed, so the smoothing and mapping stages downstream
//! cannot tell it apart from wheel input.

use crate::config::{AutoPlayConfig, AutoPlayMode};
use crate::motion::easing::EasingType;
use crate::motion::timing::{lerp, ms_to_secs, progress};
use crate::motion::ScrollSignal;
use crate::runtime::{Fired, FiredKind, FrameScheduler, TaskId};

/// One eased step in flight
#[derive(Debug, Clone, Copy, PartialEq)]
struct StepTransition {
    frame: TaskId,
    start_time: f64,
    from: f64,
    to: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum DriverState {
    Idle,
    Continuous {
        frame: TaskId,
        last_time: f64,
    },
    Stepping {
        interval: TaskId,
        transition: Option<StepTransition>,
    },
}

#[derive(Debug, Clone)]
pub struct AutoAdvance {
    config: AutoPlayConfig,
    spacing: f64,
    easing: EasingType,
    state: DriverState,
}

impl AutoAdvance {
    /// `spacing` is the distance one step covers
    pub fn new(config: AutoPlayConfig, spacing: f64) -> Self {
        Self {
            config,
            spacing,
            easing: EasingType::EaseInOutQuad,
            state: DriverState::Idle,
        }
    }

    pub fn config(&self) -> &AutoPlayConfig {
        &self.config
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.state != DriverState::Idle
    }

    /// True while a step transition is moving the signal
    pub fn is_transitioning(&self) -> bool {
        matches!(
            self.state,
            DriverState::Stepping {
                transition: Some(_),
                ..
            }
        )
    }

    /// Register the driver's callbacks; no-op when disabled or already running
    pub fn start(&mut self, sched: &mut FrameScheduler) {
        if !self.config.enabled || self.is_running() {
            return;
        }

        self.state = match self.config.mode {
            AutoPlayMode::Continuous => DriverState::Continuous {
                frame: sched.request_frame(),
                last_time: sched.now(),
            },
            AutoPlayMode::Step => DriverState::Stepping {
                interval: sched.set_interval(ms_to_secs(self.config.step_delay_ms)),
                transition: None,
            },
        };
        tracing::debug!(mode = ?self.config.mode, speed = self.config.speed, "Auto-advance started");
    }

    /// Cancel every callback the driver owns
    pub fn stop(&mut self, sched: &mut FrameScheduler) {
        match self.state {
            DriverState::Idle => return,
            DriverState::Continuous { frame, .. } => {
                sched.cancel(frame);
            }
            DriverState::Stepping {
                interval,
                transition,
            } => {
                sched.cancel(interval);
                if let Some(t) = transition {
                    sched.cancel(t.frame);
                }
            }
        }
        self.state = DriverState::Idle;
        tracing::debug!("Auto-advance stopped");
    }

    /// Whether `id` is one of this driver's callbacks
    pub fn owns(&self, id: TaskId) -> bool {
        match self.state {
            DriverState::Idle => false,
            DriverState::Continuous { frame, .. } => frame == id,
            DriverState::Stepping {
                interval,
                transition,
            } => interval == id || transition.is_some_and(|t| t.frame == id),
        }
    }

    /// React to a fired callback, writing into `signal`
    ///
    /// Returns false if the callback does not belong to this driver.
    pub fn handle(&mut self, fired: &Fired, sched: &mut FrameScheduler, signal: &ScrollSignal) -> bool {
        if !self.owns(fired.id) {
            return false;
        }

        match (&mut self.state, fired.kind) {
            (DriverState::Continuous { frame, last_time }, FiredKind::Frame) => {
                let dt = (fired.at - *last_time).max(0.0);
                *last_time = fired.at;
                signal.add(self.config.speed * dt);
                *frame = sched.request_frame();
            }
            (DriverState::Stepping { transition, .. }, FiredKind::Interval) => {
                // A new step starts from wherever the signal is now
                if let Some(previous) = transition.take() {
                    sched.cancel(previous.frame);
                }
                let from = signal.get();
                *transition = Some(StepTransition {
                    frame: sched.request_frame(),
                    start_time: fired.at,
                    from,
                    to: from + self.spacing,
                });
            }
            (DriverState::Stepping { transition, .. }, FiredKind::Frame) => {
                if let Some(step) = transition {
                    let duration = ms_to_secs(self.config.step_duration_ms);
                    let p = progress(fired.at - step.start_time, duration);
                    signal.set(lerp(step.from, step.to, self.easing.apply(p)));
                    if p < 1.0 {
                        step.frame = sched.request_frame();
                    } else {
                        *transition = None;
                    }
                }
            }
            _ => {}
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn continuous(speed: f64) -> AutoPlayConfig {
        AutoPlayConfig {
            enabled: true,
            mode: AutoPlayMode::Continuous,
            speed,
            ..AutoPlayConfig::default()
        }
    }

    fn step(delay_ms: u64, duration_ms: u64) -> AutoPlayConfig {
        AutoPlayConfig {
            enabled: true,
            mode: AutoPlayMode::Step,
            step_delay_ms: delay_ms,
            step_duration_ms: duration_ms,
            ..AutoPlayConfig::default()
        }
    }

    fn pump(driver: &mut AutoAdvance, sched: &mut FrameScheduler, signal: &ScrollSignal, dt: f64) {
        for fired in sched.advance(dt) {
            driver.handle(&fired, sched, signal);
        }
    }

    #[test]
    fn test_continuous_is_frame_rate_independent() {
        let deltas_a = [1.0 / 60.0; 120];
        let deltas_b = [0.005, 0.031, 0.016, 0.1, 0.048, 0.2, 0.6, 0.5, 0.5];

        let mut totals = Vec::new();
        for deltas in [&deltas_a[..], &deltas_b[..]] {
            let mut sched = FrameScheduler::new();
            let signal = ScrollSignal::new(0.0);
            let mut driver = AutoAdvance::new(continuous(30.0), 150.0);
            driver.start(&mut sched);
            for dt in deltas {
                pump(&mut driver, &mut sched, &signal, *dt);
            }
            let elapsed: f64 = deltas.iter().sum();
            assert!((signal.get() - 30.0 * elapsed).abs() < 1e-9);
            totals.push(signal.get());
        }
        assert!((totals[0] - totals[1]).abs() < 1e-9);
        assert!((totals[0] - 60.0).abs() < 1e-9);
    }

    #[test]
    fn test_step_moves_one_spacing_along_ease() {
        let mut sched = FrameScheduler::new();
        let signal = ScrollSignal::new(0.0);
        let mut driver = AutoAdvance::new(step(1000, 500), 150.0);
        driver.start(&mut sched);

        pump(&mut driver, &mut sched, &signal, 1.0);
        assert!(driver.is_transitioning());
        assert_eq!(signal.get(), 0.0);

        pump(&mut driver, &mut sched, &signal, 0.25);
        assert!((signal.get() - 75.0).abs() < 1e-9);

        pump(&mut driver, &mut sched, &signal, 0.25);
        assert_eq!(signal.get(), 150.0);
        assert!(!driver.is_transitioning());

        // Only the interval remains
        assert_eq!(sched.pending(), 1);
    }

    #[test]
    fn test_next_step_starts_from_current_value() {
        let mut sched = FrameScheduler::new();
        let signal = ScrollSignal::new(10.0);
        let mut driver = AutoAdvance::new(step(1000, 500), 100.0);
        driver.start(&mut sched);
        for _ in 0..4 {
            pump(&mut driver, &mut sched, &signal, 0.5);
        }
        // two intervals at t=1 and t=2, the second one finished at 2.5
        pump(&mut driver, &mut sched, &signal, 0.5);
        assert_eq!(signal.get(), 210.0);
    }

    #[test]
    fn test_stop_leaves_no_pending_callbacks() {
        for config in [continuous(30.0), step(1000, 500)] {
            let mut sched = FrameScheduler::new();
            let signal = ScrollSignal::new(0.0);
            let mut driver = AutoAdvance::new(config, 150.0);
            driver.start(&mut sched);
            pump(&mut driver, &mut sched, &signal, 1.1);

            driver.stop(&mut sched);
            assert_eq!(sched.pending(), 0);
            assert!(!driver.is_running());

            let frozen = signal.get();
            pump(&mut driver, &mut sched, &signal, 5.0);
            assert_eq!(signal.get(), frozen);
        }
    }

    #[test]
    fn test_disabled_driver_never_registers() {
        let mut sched = FrameScheduler::new();
        let mut driver = AutoAdvance::new(
            AutoPlayConfig {
                enabled: false,
                ..AutoPlayConfig::default()
            },
            150.0,
        );
        driver.start(&mut sched);
        assert!(!driver.is_running());
        assert_eq!(sched.pending(), 0);
    }

    #[test]
    fn test_foreign_callbacks_are_ignored() {
        let mut sched = FrameScheduler::new();
        let signal = ScrollSignal::new(0.0);
        let mut driver = AutoAdvance::new(continuous(30.0), 150.0);
        let foreign = sched.set_timeout(0.0);
        driver.start(&mut sched);
        let fired = sched.advance(0.1);
        let handled: Vec<bool> = fired
            .iter()
            .map(|f| driver.handle(f, &mut sched, &signal))
            .collect();
        assert_eq!(fired.iter().filter(|f| f.id == foreign).count(), 1);
        assert_eq!(handled.iter().filter(|h| !**h).count(), 1);
    }
}
