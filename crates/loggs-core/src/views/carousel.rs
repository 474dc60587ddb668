//! Horizontal translation driver
//!
//! Converts vertical page scroll through a tall sticky section into a
//! horizontal offset for the gallery strip. The strip's travel is measured
//! from the content and viewport widths and re-measured on resize.

use serde::Serialize;

use crate::config::{CarouselConfig, SpringConfig};
use crate::error::Result;
use crate::motion::easing::EasingType;
use crate::motion::timing::{lerp, ms_to_secs};
use crate::motion::{
    BreakpointTable, ScrollTrigger, Scrub, Section, SignalReader, SignalSource, Spring, Throttle,
};
use crate::runtime::{ListenerId, Viewport, ViewportEvent};

/// Seconds the drawn guide line lags behind the scroll
const LINE_SCRUB_LAG: f64 = 1.5;

/// Widths the travel distance is derived from
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Measurement {
    pub content_width: f64,
    pub viewport_width: f64,
    pub scrollbar_width: f64,
    pub parent_offset_left: f64,
}

/// Offset at full progress; never positive
pub fn end_position(m: &Measurement) -> f64 {
    let overflow =
        m.content_width - m.viewport_width + m.scrollbar_width + 2.0 * m.parent_offset_left;
    if overflow > 0.0 {
        -overflow
    } else {
        0.0
    }
}

/// Offset at progress `p`
pub fn translation_for(m: &Measurement, p: f64) -> f64 {
    lerp(0.0, end_position(m), p.clamp(0.0, 1.0))
}

/// Progress of a sticky section: 0 when its top reaches the viewport top,
/// 1 when its bottom reaches the viewport bottom
pub fn sticky_progress(scroll: f64, section: &Section, viewport_height: f64) -> f64 {
    let travel = section.height - viewport_height;
    if travel <= 0.0 {
        return 0.0;
    }
    ((scroll - section.top) / travel).clamp(0.0, 1.0)
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CarouselItem {
    pub index: usize,
    /// Left edge in viewport coordinates
    pub x: f64,
    pub width: f64,
    /// Entirely inside the viewport
    pub in_view: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CarouselFrame {
    pub progress: f64,
    pub offset: f64,
    pub blur: f64,
    /// Drawn fraction of the guide line
    pub line: f64,
    pub items: Vec<CarouselItem>,
}

#[derive(Debug)]
pub struct HorizontalScroll {
    config: CarouselConfig,
    item_count: usize,
    scroll: SignalReader,
    spring: Spring,
    blur_table: BreakpointTable,
    section: Section,
    parent_offset_left: f64,
    measurement: Option<Measurement>,
    viewport_height: f64,
    throttle: Throttle,
    remeasure_pending: bool,
    resize_listener: Option<ListenerId>,
    line_trigger: ScrollTrigger,
    line_scrub: Scrub,
    line_target: f64,
}

impl HorizontalScroll {
    pub fn new(
        config: CarouselConfig,
        spring: SpringConfig,
        item_count: usize,
        scroll: SignalReader,
    ) -> Result<Self> {
        config.validate()?;
        spring.validate()?;

        let blur_table = BreakpointTable::new(
            vec![0.0, 0.2, 0.5, 0.8, 1.0],
            vec![2.0, 0.5, 0.0, 0.5, 2.0],
        )?;
        let throttle = Throttle::new(ms_to_secs(config.resize_throttle_ms));

        Ok(Self {
            config,
            item_count,
            scroll,
            spring: Spring::new(spring),
            blur_table,
            section: Section::default(),
            parent_offset_left: 0.0,
            measurement: None,
            viewport_height: 0.0,
            throttle,
            remeasure_pending: false,
            resize_listener: None,
            line_trigger: ScrollTrigger::default(),
            line_scrub: Scrub::new(LINE_SCRUB_LAG),
            line_target: 0.0,
        })
    }

    #[inline]
    pub fn is_mounted(&self) -> bool {
        self.resize_listener.is_some()
    }

    pub fn measurement(&self) -> Option<Measurement> {
        self.measurement
    }

    /// Sticky section as laid out at the last measure
    pub fn section(&self) -> Section {
        self.section
    }

    /// Total width of the strip
    pub fn content_width(&self) -> f64 {
        if self.item_count == 0 {
            return 0.0;
        }
        let n = self.item_count as f64;
        n * self.config.item_width + (n - 1.0) * self.config.gap
    }

    /// Move the sticky section, e.g. after content above it changed height
    pub fn set_section_top(&mut self, top: f64) {
        self.section.top = top;
    }

    /// Horizontal inset of the strip's container
    pub fn set_parent_offset_left(&mut self, offset: f64) {
        self.parent_offset_left = offset.max(0.0);
    }

    /// Attach the resize listener and take the first measurement
    pub fn mount(&mut self, viewport: &mut Viewport, section_top: f64) {
        if self.is_mounted() {
            return;
        }
        self.section.top = section_top;
        self.resize_listener = Some(viewport.subscribe(ViewportEvent::Resize));
        self.measure(viewport);
        self.spring.jump_to(viewport.scroll_offset());
        tracing::debug!(items = self.item_count, "Horizontal scroll mounted");
    }

    /// Detach the resize listener and forget the measurement
    pub fn unmount(&mut self, viewport: &mut Viewport) {
        if let Some(id) = self.resize_listener.take() {
            viewport.unsubscribe(id);
        }
        self.measurement = None;
        self.remeasure_pending = false;
        self.throttle.reset();
        self.spring.reset();
        self.line_scrub.reset();
        self.line_target = 0.0;
        tracing::debug!("Horizontal scroll unmounted");
    }

    /// Dispatch a viewport notification; false if the listener is not ours
    pub fn handle_listener(&mut self, id: ListenerId, now: f64, viewport: &Viewport) -> bool {
        if self.resize_listener != Some(id) {
            return false;
        }
        self.on_resize(now, viewport);
        true
    }

    /// Re-measure, at most once per throttle window
    ///
    /// A dropped call is remembered and flushed on a later tick.
    pub fn on_resize(&mut self, now: f64, viewport: &Viewport) {
        if !self.is_mounted() {
            return;
        }
        if self.throttle.ready(now) {
            self.remeasure_pending = false;
            self.measure(viewport);
        } else {
            self.remeasure_pending = true;
        }
    }

    fn measure(&mut self, viewport: &Viewport) {
        let size = viewport.size();
        if size.width <= 0.0 || size.height <= 0.0 {
            tracing::debug!("Viewport has no extent yet; carousel left unmeasured");
            self.measurement = None;
            return;
        }

        let m = Measurement {
            content_width: self.content_width(),
            viewport_width: size.width,
            scrollbar_width: size.scrollbar_width,
            parent_offset_left: self.parent_offset_left,
        };
        self.viewport_height = size.height;
        self.section.height = size.height * self.config.section_screens;
        self.measurement = Some(m);
        tracing::debug!(
            content_width = m.content_width,
            viewport_width = m.viewport_width,
            end = end_position(&m),
            "Carousel measured"
        );
    }

    /// Advance smoothing and flush a pending re-measure
    pub fn tick(&mut self, dt: f64, now: f64, viewport: &Viewport) {
        if !self.is_mounted() {
            return;
        }
        if self.remeasure_pending && self.throttle.ready(now) {
            self.remeasure_pending = false;
            self.measure(viewport);
        }

        let scroll = self.scroll.get();
        if self.config.smooth_scroll {
            self.spring.set_target(scroll);
            self.spring.step(dt);
        } else {
            self.spring.jump_to(scroll);
        }

        self.line_target = self
            .line_trigger
            .progress(scroll, &self.section, self.viewport_height);
        self.line_scrub.step(self.line_target, dt);
    }

    /// Section progress in [0, 1] from the smoothed scroll
    pub fn progress(&self) -> f64 {
        if self.measurement.is_none() {
            return 0.0;
        }
        sticky_progress(self.spring.value(), &self.section, self.viewport_height)
    }

    pub fn needs_update(&self) -> bool {
        self.is_mounted()
            && (!self.spring.is_settled()
                || self.spring.target() != self.scroll.get()
                || self.remeasure_pending
                || self.line_scrub.value() != self.line_target)
    }

    pub fn compute(&self) -> CarouselFrame {
        let progress = self.progress();
        let (offset, blur) = match &self.measurement {
            Some(m) => (translation_for(m, progress), self.blur_table.map(progress)),
            None => (0.0, 0.0),
        };

        let pitch = self.config.item_width + self.config.gap;
        let viewport_width = self.measurement.map_or(0.0, |m| m.viewport_width);
        let items = (0..self.item_count)
            .map(|index| {
                let x = self.parent_offset_left + offset + index as f64 * pitch;
                CarouselItem {
                    index,
                    x,
                    width: self.config.item_width,
                    in_view: x >= 0.0 && x + self.config.item_width <= viewport_width,
                }
            })
            .collect();

        CarouselFrame {
            progress,
            offset,
            blur,
            line: EasingType::EaseInOutCubic.apply(self.line_scrub.value()),
            items,
        }
    }
}
