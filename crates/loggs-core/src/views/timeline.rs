//! Scroll-scrubbed timeline
//!
//! A vertical line is drawn as the timeline passes the middle of the
//! viewport, lagging slightly behind the scroll. Each entry slides up and
//! fades in once its top crosses 80% of the viewport height, and plays
//! backwards when scrolled back above that line.

use serde::Serialize;

use crate::motion::easing::EasingType;
use crate::motion::timing::progress;
use crate::motion::{Edge, ScrollTrigger, Scrub, Section, SignalReader, SignalSource, TriggerPoint};

/// Viewport fraction an entry's top must pass to be revealed
pub const REVEAL_LINE: f64 = 0.8;

/// Distance an entry slides up while revealing
pub const REVEAL_RISE: f64 = 50.0;

const REVEAL_DURATION: f64 = 0.8;
const LINE_SCRUB_LAG: f64 = 1.0;

/// Page placement of the timeline and its entries
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TimelineLayout {
    pub top: f64,
    /// Space above the first entry
    pub header: f64,
    /// Distance between the tops of neighbouring entries
    pub entry_pitch: f64,
    pub entry_height: f64,
}

impl Default for TimelineLayout {
    fn default() -> Self {
        Self {
            top: 0.0,
            header: 120.0,
            entry_pitch: 160.0,
            entry_height: 120.0,
        }
    }
}

impl TimelineLayout {
    pub fn section(&self, entries: usize) -> Section {
        Section {
            top: self.top,
            height: self.header + self.entry_pitch * entries as f64,
        }
    }

    pub fn entry(&self, index: usize) -> Section {
        Section {
            top: self.top + self.header + self.entry_pitch * index as f64,
            height: self.entry_height,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
struct EntryState {
    active: bool,
    /// Seconds into the reveal, in [0, REVEAL_DURATION]
    playhead: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EntryTransform {
    pub index: usize,
    pub opacity: f64,
    /// Downward displacement in pixels
    pub y: f64,
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimelineFrame {
    /// Drawn fraction of the line
    pub line: f64,
    pub entries: Vec<EntryTransform>,
}

#[derive(Debug)]
pub struct Timeline {
    layout: TimelineLayout,
    scroll: SignalReader,
    viewport_height: f64,
    line_trigger: ScrollTrigger,
    line_scrub: Scrub,
    line_target: f64,
    entries: Vec<EntryState>,
}

impl Timeline {
    pub fn new(entry_count: usize, layout: TimelineLayout, scroll: SignalReader) -> Self {
        Self {
            layout,
            scroll,
            viewport_height: 0.0,
            line_trigger: ScrollTrigger::new(
                TriggerPoint::new(Edge::Top, Edge::Center),
                TriggerPoint::new(Edge::Bottom, Edge::Center),
            ),
            line_scrub: Scrub::new(LINE_SCRUB_LAG),
            line_target: 0.0,
            entries: vec![EntryState::default(); entry_count],
        }
    }

    pub fn layout(&self) -> &TimelineLayout {
        &self.layout
    }

    pub fn set_layout(&mut self, layout: TimelineLayout) {
        self.layout = layout;
    }

    pub fn set_viewport_height(&mut self, height: f64) {
        self.viewport_height = height.max(0.0);
    }

    /// Whole timeline section
    pub fn section(&self) -> Section {
        self.layout.section(self.entries.len())
    }

    /// Scroll offset at which entry `index` starts revealing
    pub fn reveal_offset(&self, index: usize) -> f64 {
        self.layout.entry(index).top - REVEAL_LINE * self.viewport_height
    }

    pub fn tick(&mut self, dt: f64) {
        let dt = dt.max(0.0);
        let scroll = self.scroll.get();

        self.line_target = self
            .line_trigger
            .progress(scroll, &self.section(), self.viewport_height);
        self.line_scrub.step(self.line_target, dt);

        for index in 0..self.entries.len() {
            let active = scroll > self.reveal_offset(index);
            let entry = &mut self.entries[index];
            entry.active = active;
            entry.playhead = if active {
                (entry.playhead + dt).min(REVEAL_DURATION)
            } else {
                (entry.playhead - dt).max(0.0)
            };
        }
    }

    pub fn needs_update(&self) -> bool {
        self.line_scrub.value() != self.line_target
            || self.entries.iter().any(|e| {
                (e.active && e.playhead < REVEAL_DURATION) || (!e.active && e.playhead > 0.0)
            })
    }

    /// Forget all progress
    pub fn reset(&mut self) {
        self.line_scrub.reset();
        self.line_target = 0.0;
        self.entries.fill(EntryState::default());
    }

    pub fn compute(&self) -> TimelineFrame {
        let entries = self
            .entries
            .iter()
            .enumerate()
            .map(|(index, e)| {
                let eased = EasingType::Cubic.apply(progress(e.playhead, REVEAL_DURATION));
                EntryTransform {
                    index,
                    opacity: eased,
                    y: REVEAL_RISE * (1.0 - eased),
                    active: e.active,
                }
            })
            .collect();

        TimelineFrame {
            line: EasingType::EaseInOutCubic.apply(self.line_scrub.value()),
            entries,
        }
    }
}
