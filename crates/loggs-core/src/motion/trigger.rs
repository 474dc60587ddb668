//! L3 Molecular Layer: Scroll triggers and scrubbing
//!
//! A [`ScrollTrigger`] turns the page scroll offset into the progress of one
//! section between a start line and an end line, e.g. "section top meets
//! viewport bottom" to "section bottom meets viewport top". [`Scrub`] lets
//! the rendered progress lag behind the scroll by a configurable time.

use serde::{Deserialize, Serialize};

/// Edge of an element or of the viewport
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Edge {
    Top,
    Center,
    Bottom,
}

impl Edge {
    #[inline]
    fn offset(self, extent: f64) -> f64 {
        match self {
            Edge::Top => 0.0,
            Edge::Center => extent * 0.5,
            Edge::Bottom => extent,
        }
    }
}

/// The moment `element` edge crosses `viewport` edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriggerPoint {
    pub element: Edge,
    pub viewport: Edge,
}

impl TriggerPoint {
    pub const fn new(element: Edge, viewport: Edge) -> Self {
        Self { element, viewport }
    }

    /// Scroll offset at which this point is reached
    pub fn scroll_offset(&self, section: &Section, viewport_height: f64) -> f64 {
        section.top + self.element.offset(section.height) - self.viewport.offset(viewport_height)
    }
}

/// Vertical placement of a section on the page
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Section {
    pub top: f64,
    pub height: f64,
}

/// Section progress between two trigger points
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScrollTrigger {
    pub start: TriggerPoint,
    pub end: TriggerPoint,
}

impl Default for ScrollTrigger {
    /// Whole pass of the section through the viewport
    fn default() -> Self {
        Self {
            start: TriggerPoint::new(Edge::Top, Edge::Bottom),
            end: TriggerPoint::new(Edge::Bottom, Edge::Top),
        }
    }
}

impl ScrollTrigger {
    pub const fn new(start: TriggerPoint, end: TriggerPoint) -> Self {
        Self { start, end }
    }

    /// Progress in [0, 1]
    pub fn progress(&self, scroll: f64, section: &Section, viewport_height: f64) -> f64 {
        let start = self.start.scroll_offset(section, viewport_height);
        let end = self.end.scroll_offset(section, viewport_height);
        if end <= start {
            return if scroll >= start { 1.0 } else { 0.0 };
        }
        ((scroll - start) / (end - start)).clamp(0.0, 1.0)
    }
}

/// Time-lagged follower for trigger progress
///
/// `lag` is the number of seconds the value needs to catch up with a jump
/// of the target (within 2%). A zero lag follows immediately.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scrub {
    lag: f64,
    value: f64,
}

impl Scrub {
    pub fn new(lag: f64) -> Self {
        Self {
            lag: lag.max(0.0),
            value: 0.0,
        }
    }

    #[inline]
    pub fn value(&self) -> f64 {
        self.value
    }

    /// Follow `target` for `dt` seconds and return the new value
    pub fn step(&mut self, target: f64, dt: f64) -> f64 {
        if self.lag == 0.0 {
            self.value = target;
            return self.value;
        }
        // ln(50) time constants per lag leaves 2% of the gap
        let rate = 50.0_f64.ln() / self.lag;
        let keep = (-rate * dt.max(0.0)).exp();
        self.value = target + (self.value - target) * keep;
        if (self.value - target).abs() < 1e-4 {
            self.value = target;
        }
        self.value
    }

    pub fn reset(&mut self) {
        self.value = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_trigger_spans_full_pass() {
        let trigger = ScrollTrigger::default();
        let section = Section {
            top: 1000.0,
            height: 500.0,
        };
        // starts at 1000 - 800 = 200, ends at 1500
        assert_eq!(trigger.progress(0.0, &section, 800.0), 0.0);
        assert_eq!(trigger.progress(200.0, &section, 800.0), 0.0);
        assert!((trigger.progress(850.0, &section, 800.0) - 0.5).abs() < 1e-12);
        assert_eq!(trigger.progress(1500.0, &section, 800.0), 1.0);
        assert_eq!(trigger.progress(9000.0, &section, 800.0), 1.0);
    }

    #[test]
    fn test_center_trigger() {
        let trigger = ScrollTrigger::new(
            TriggerPoint::new(Edge::Top, Edge::Center),
            TriggerPoint::new(Edge::Bottom, Edge::Center),
        );
        let section = Section {
            top: 600.0,
            height: 400.0,
        };
        // 600 - 300 = 300 .. 1000 - 300 = 700
        assert!((trigger.progress(500.0, &section, 600.0) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_degenerate_trigger_is_a_step() {
        let trigger = ScrollTrigger::new(
            TriggerPoint::new(Edge::Top, Edge::Top),
            TriggerPoint::new(Edge::Top, Edge::Top),
        );
        let section = Section {
            top: 100.0,
            height: 0.0,
        };
        assert_eq!(trigger.progress(99.0, &section, 500.0), 0.0);
        assert_eq!(trigger.progress(100.0, &section, 500.0), 1.0);
    }

    #[test]
    fn test_scrub_catches_up_within_lag() {
        let mut scrub = Scrub::new(1.5);
        let mid = scrub.step(1.0, 0.3);
        assert!(mid > 0.0 && mid < 1.0);
        for _ in 0..90 {
            scrub.step(1.0, 1.0 / 60.0);
        }
        assert!((scrub.value() - 1.0).abs() <= 0.02);
    }

    #[test]
    fn test_zero_lag_follows_immediately() {
        let mut scrub = Scrub::new(0.0);
        assert_eq!(scrub.step(0.4, 0.016), 0.4);
    }
}
