//! Startup loader
//!
//! Full-screen overlay shown while the first page settles. It fades in,
//! holds for a fixed time on a scheduler timeout, then fades out and
//! releases input. The logo and spinner enter with their own delays.

use serde::Serialize;

use crate::motion::easing::EasingType;
use crate::motion::timing::{is_complete, lerp, progress};
use crate::runtime::{Fired, FrameScheduler, TaskId};

/// Seconds the loader stays up before exiting
pub const LOADER_HOLD: f64 = 2.0;

const FADE_IN: f64 = 0.3;
const EXIT_DURATION: f64 = 0.3;

const LOGO_DELAY: f64 = 0.2;
const LOGO_DURATION: f64 = 0.5;
const LOGO_SCALE_FROM: f64 = 0.8;
const LOGO_EXIT_SCALE: f64 = 0.9;

const SPINNER_DELAY: f64 = 0.4;
const SPINNER_DURATION: f64 = 0.5;
/// Seconds per spinner revolution
const SPINNER_PERIOD: f64 = 2.5;

#[derive(Debug, Clone, Copy, PartialEq)]
enum Phase {
    Idle,
    Showing,
    /// Exit started at this many seconds after mount
    Exiting(f64),
    Done,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LoaderFrame {
    pub visible: bool,
    pub opacity: f64,
    pub logo_opacity: f64,
    pub logo_scale: f64,
    pub spinner_opacity: f64,
    /// Spinner rotation in turns, [0, 1)
    pub spinner_phase: f64,
}

impl LoaderFrame {
    const HIDDEN: LoaderFrame = LoaderFrame {
        visible: false,
        opacity: 0.0,
        logo_opacity: 0.0,
        logo_scale: 1.0,
        spinner_opacity: 0.0,
        spinner_phase: 0.0,
    };
}

#[derive(Debug)]
pub struct PageLoader {
    hold: f64,
    phase: Phase,
    timer: Option<TaskId>,
    mounted_at: f64,
    elapsed: f64,
}

impl Default for PageLoader {
    fn default() -> Self {
        Self::new(LOADER_HOLD)
    }
}

impl PageLoader {
    pub fn new(hold: f64) -> Self {
        Self {
            hold: hold.max(0.0),
            phase: Phase::Idle,
            timer: None,
            mounted_at: 0.0,
            elapsed: 0.0,
        }
    }

    pub fn mount(&mut self, sched: &mut FrameScheduler) {
        if self.phase != Phase::Idle {
            return;
        }
        self.phase = Phase::Showing;
        self.mounted_at = sched.now();
        self.elapsed = 0.0;
        self.timer = Some(sched.set_timeout(self.hold));
        tracing::debug!(hold = self.hold, "Loader shown");
    }

    pub fn unmount(&mut self, sched: &mut FrameScheduler) {
        if let Some(id) = self.timer.take() {
            sched.cancel(id);
        }
        self.phase = Phase::Idle;
    }

    /// Start the exit on the hold timeout; false if not ours
    pub fn handle(&mut self, fired: &Fired) -> bool {
        if self.timer != Some(fired.id) {
            return false;
        }
        self.timer = None;
        if self.phase == Phase::Showing {
            self.phase = Phase::Exiting((fired.at - self.mounted_at).max(0.0));
        }
        true
    }

    /// Skip the rest of the hold and exit now
    pub fn dismiss(&mut self, sched: &mut FrameScheduler) {
        if let Some(id) = self.timer.take() {
            sched.cancel(id);
        }
        if self.phase == Phase::Showing {
            self.phase = Phase::Exiting(self.elapsed);
        }
    }

    pub fn tick(&mut self, dt: f64) {
        if !self.is_visible() {
            return;
        }
        if dt > 0.0 && dt.is_finite() {
            self.elapsed += dt;
        }
        if let Phase::Exiting(since) = self.phase {
            if is_complete(self.elapsed - since, EXIT_DURATION) {
                self.phase = Phase::Done;
                tracing::debug!(elapsed = self.elapsed, "Loader finished");
            }
        }
    }

    /// Overlay is up and holds input
    #[inline]
    pub fn is_visible(&self) -> bool {
        matches!(self.phase, Phase::Showing | Phase::Exiting(_))
    }

    pub fn needs_update(&self) -> bool {
        self.is_visible()
    }

    pub fn compute(&self) -> LoaderFrame {
        if !self.is_visible() {
            return LoaderFrame::HIDDEN;
        }
        let t = self.elapsed;
        let exit = match self.phase {
            Phase::Exiting(since) => {
                EasingType::EaseInOutCubic.apply(progress(t - since, EXIT_DURATION))
            }
            _ => 0.0,
        };
        let keep = 1.0 - exit;

        let overlay = EasingType::Cubic.apply(progress(t, FADE_IN));
        let logo = EasingType::Cubic.apply(progress(t - LOGO_DELAY, LOGO_DURATION));
        let spinner = EasingType::Cubic.apply(progress(t - SPINNER_DELAY, SPINNER_DURATION));

        LoaderFrame {
            visible: true,
            opacity: overlay * keep,
            logo_opacity: logo * keep,
            logo_scale: lerp(lerp(LOGO_SCALE_FROM, 1.0, logo), LOGO_EXIT_SCALE, exit),
            spinner_opacity: spinner * keep,
            spinner_phase: (t / SPINNER_PERIOD).fract(),
        }
    }
}
