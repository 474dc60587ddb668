//! Keyhole reveal
//!
//! A page-colored overlay covers the viewport except for a centred
//! window. As the trigger section scrolls from "top meets top" to
//! "bottom meets bottom" the window opens to the full viewport. A scroll
//! hint arrow bobs below the window and fades out over the first 200 px.

use serde::Serialize;

use crate::motion::easing::EasingType;
use crate::motion::timing::lerp;
use crate::motion::{Edge, ScrollTrigger, Section, SignalReader, SignalSource, TriggerPoint};
use crate::runtime::{Fired, FrameScheduler, TaskId};

/// Scroll distance over which the arrow fades out
pub const ARROW_FADE_PX: f64 = 200.0;

/// Arrow position as a fraction of the viewport height
pub const ARROW_TOP: f64 = 0.725;

/// Seconds for one leg of the arrow's bob
const ARROW_FLOAT_PERIOD: f64 = 1.0;

/// Window in viewport fractions
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HoleRect {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl HoleRect {
    /// Window before the section is scrolled into
    pub const CLOSED: HoleRect = HoleRect {
        left: 0.25,
        top: 0.25,
        right: 0.75,
        bottom: 0.75,
    };

    /// Whole viewport, overlay gone
    pub const OPEN: HoleRect = HoleRect {
        left: 0.0,
        top: 0.0,
        right: 1.0,
        bottom: 1.0,
    };

    fn lerp(from: &HoleRect, to: &HoleRect, t: f64) -> HoleRect {
        HoleRect {
            left: lerp(from.left, to.left, t),
            top: lerp(from.top, to.top, t),
            right: lerp(from.right, to.right, t),
            bottom: lerp(from.bottom, to.bottom, t),
        }
    }

    pub fn is_open(&self) -> bool {
        *self == HoleRect::OPEN
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct KeyholeFrame {
    pub progress: f64,
    pub hole: HoleRect,
    pub arrow_opacity: f64,
    /// Bob offset as a fraction of the arrow's height, in [-0.5, 0.5]
    pub arrow_offset: f64,
}

/// Offset of the bobbing arrow after `t` seconds; alternates direction
/// every period
pub fn arrow_float(t: f64) -> f64 {
    let cycle = t.max(0.0) / ARROW_FLOAT_PERIOD;
    let eased = EasingType::EaseInOutCubic.apply(cycle.fract());
    if (cycle.floor() as u64) % 2 == 0 {
        -0.5 + eased
    } else {
        0.5 - eased
    }
}

#[derive(Debug)]
pub struct KeyholeReveal {
    scroll: SignalReader,
    section: Section,
    viewport_height: f64,
    trigger: ScrollTrigger,
    frame: Option<TaskId>,
    last_time: f64,
    float_time: f64,
}

impl KeyholeReveal {
    pub fn new(scroll: SignalReader) -> Self {
        Self {
            scroll,
            section: Section::default(),
            viewport_height: 0.0,
            trigger: ScrollTrigger::new(
                TriggerPoint::new(Edge::Top, Edge::Top),
                TriggerPoint::new(Edge::Bottom, Edge::Bottom),
            ),
            frame: None,
            last_time: 0.0,
            float_time: 0.0,
        }
    }

    #[inline]
    pub fn is_mounted(&self) -> bool {
        self.frame.is_some()
    }

    pub fn section(&self) -> Section {
        self.section
    }

    pub fn set_section(&mut self, section: Section) {
        self.section = section;
    }

    pub fn set_viewport_height(&mut self, height: f64) {
        self.viewport_height = height.max(0.0);
    }

    /// Start the arrow's frame loop
    pub fn mount(&mut self, sched: &mut FrameScheduler) {
        if self.is_mounted() {
            return;
        }
        self.last_time = sched.now();
        self.float_time = 0.0;
        self.frame = Some(sched.request_frame());
        tracing::debug!(top = self.section.top, height = self.section.height, "Keyhole mounted");
    }

    pub fn unmount(&mut self, sched: &mut FrameScheduler) {
        if let Some(id) = self.frame.take() {
            sched.cancel(id);
            self.float_time = 0.0;
            tracing::debug!("Keyhole unmounted");
        }
    }

    /// Advance the arrow on its own frame callback; false if not ours
    pub fn handle(&mut self, fired: &Fired, sched: &mut FrameScheduler) -> bool {
        if self.frame != Some(fired.id) {
            return false;
        }
        self.float_time += (fired.at - self.last_time).max(0.0);
        self.last_time = fired.at;
        self.frame = Some(sched.request_frame());
        true
    }

    /// Reveal progress; fully open while unmounted
    pub fn progress(&self) -> f64 {
        if !self.is_mounted() {
            return 1.0;
        }
        self.trigger
            .progress(self.scroll.get(), &self.section, self.viewport_height)
    }

    pub fn arrow_opacity(&self) -> f64 {
        if !self.is_mounted() {
            return 0.0;
        }
        let scrolled = (self.scroll.get() - self.section.top) / ARROW_FADE_PX;
        1.0 - scrolled.clamp(0.0, 1.0)
    }

    pub fn needs_update(&self) -> bool {
        self.is_mounted() && self.arrow_opacity() > 0.0
    }

    pub fn compute(&self) -> KeyholeFrame {
        let progress = self.progress();
        KeyholeFrame {
            progress,
            hole: HoleRect::lerp(&HoleRect::CLOSED, &HoleRect::OPEN, progress),
            arrow_opacity: self.arrow_opacity(),
            arrow_offset: arrow_float(self.float_time),
        }
    }
}
