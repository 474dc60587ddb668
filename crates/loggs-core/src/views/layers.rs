//! Layered works scroller
//!
//! Repeats the works on a ring of `total_layers` planes spaced along the
//! depth axis. Wheel input (or the auto-advance driver) moves a raw offset,
//! a spring smooths it, and every layer's depth, scale, opacity, blur and
//! stacking order is mapped from the smoothed value once per frame.

use serde::Serialize;

use crate::config::{AppConfig, DepthOfFieldConfig, LayerConfig};
use crate::error::Result;
use crate::motion::{BreakpointTable, Extrapolation, ScrollSignal, SignalReader, Spring, WheelDelta};
use crate::runtime::{Fired, FrameScheduler};

use super::autoplay::AutoAdvance;

/// Stacking order given to the layer under the pointer
pub const HOVER_Z_INDEX: i64 = 999_999;

/// Scroll range over which the scene tilt swings by ±5 degrees
const TILT_SWING_RANGE: f64 = 5000.0;

/// Wrap `value` into `[-modulus / 2, modulus / 2)`
///
/// Periodic in `modulus`. A non-positive modulus maps everything to 0.
pub fn wrap(value: f64, modulus: f64) -> f64 {
    if !(modulus > 0.0) || !value.is_finite() {
        return 0.0;
    }
    let mut normalized = value.rem_euclid(modulus);
    // Tiny negative inputs can round up to exactly the modulus
    if normalized >= modulus {
        normalized = 0.0;
    }
    normalized - modulus * 0.5
}

/// Number of rendered layers for `item_count` items
pub fn total_layers(min_layers: usize, item_count: usize) -> usize {
    min_layers.max(item_count.saturating_mul(2))
}

/// Computed appearance of one layer for the current frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LayerTransform {
    pub layer: usize,
    /// Item shown on this layer; `None` renders the placeholder `layer + 1`
    pub item: Option<usize>,
    pub depth: f64,
    pub scale: f64,
    pub opacity: f64,
    pub blur: f64,
    pub z_index: i64,
    pub hovered: bool,
}

/// Camera orientation in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SceneTransform {
    pub rotate_x: f64,
    pub rotate_y: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayerFrame {
    pub offset: f64,
    pub scene: SceneTransform,
    pub layers: Vec<LayerTransform>,
}

impl LayerFrame {
    /// Layers sorted back to front
    pub fn paint_order(&self) -> Vec<&LayerTransform> {
        let mut order: Vec<&LayerTransform> = self.layers.iter().collect();
        order.sort_by_key(|l| l.z_index);
        order
    }
}

/// Per-depth lookup tables, built once from configuration
#[derive(Debug, Clone)]
struct DepthTables {
    scale: BreakpointTable,
    opacity: BreakpointTable,
    blur: BreakpointTable,
    tilt: BreakpointTable,
}

impl DepthTables {
    fn build(layers: &LayerConfig, dof: &DepthOfFieldConfig, total_depth: f64) -> Result<Self> {
        let half = total_depth * 0.5;

        let scale = BreakpointTable::new(
            vec![-half, 0.0, half],
            vec![layers.scale_far, 1.0, layers.scale_near],
        )?
        .with_extrapolation(Extrapolation::Extend);

        let focus = total_depth * dof.focus_range;
        let window = vec![-half, -focus, 0.0, focus, half];
        let o = layers.opacity;

        // Disabled depth of field overrides both factors
        let opacity = if dof.enabled {
            let edge = o * (1.0 - dof.opacity_factor);
            BreakpointTable::new(window.clone(), vec![0.0, edge, o, edge, 0.0])?
        } else {
            BreakpointTable::constant(window.clone(), o)?
        };

        let blur = if dof.enabled && dof.blur_factor > 0.0 {
            let bf = dof.blur_factor;
            BreakpointTable::new(window, vec![bf * 10.0, bf * 2.0, 0.0, bf * 2.0, bf * 10.0])?
        } else {
            BreakpointTable::constant(window, 0.0)?
        };

        let tilt = BreakpointTable::linear(
            (-TILT_SWING_RANGE, layers.camera_tilt - 5.0),
            (TILT_SWING_RANGE, layers.camera_tilt + 5.0),
        )?;

        Ok(Self {
            scale,
            opacity,
            blur,
            tilt,
        })
    }
}

#[derive(Debug)]
pub struct LayerScroller {
    config: LayerConfig,
    item_count: usize,
    total_layers: usize,
    total_depth: f64,
    tables: DepthTables,
    raw: ScrollSignal,
    spring: Spring,
    autoplay: AutoAdvance,
    viewport_height: f64,
    hovered: Option<usize>,
    mounted: bool,
}

impl LayerScroller {
    /// Build a scroller for `item_count` items; fails on invalid configuration
    pub fn new(config: &AppConfig, item_count: usize) -> Result<Self> {
        config.layers.validate()?;
        config.depth_of_field.validate()?;
        config.auto_play.validate()?;
        config.spring.validate()?;

        let total = total_layers(config.layers.min_layers, item_count);
        let total_depth = total as f64 * config.layers.spacing;
        let tables = DepthTables::build(&config.layers, &config.depth_of_field, total_depth)?;

        Ok(Self {
            config: config.layers.clone(),
            item_count,
            total_layers: total,
            total_depth,
            tables,
            raw: ScrollSignal::new(0.0),
            spring: Spring::new(config.spring),
            autoplay: AutoAdvance::new(config.auto_play.clone(), config.layers.spacing),
            viewport_height: 0.0,
            hovered: None,
            mounted: false,
        })
    }

    #[inline]
    pub fn total_layers(&self) -> usize {
        self.total_layers
    }

    #[inline]
    pub fn total_depth(&self) -> f64 {
        self.total_depth
    }

    #[inline]
    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// Read-only handle to the unsmoothed offset
    pub fn raw_reader(&self) -> SignalReader {
        self.raw.reader()
    }

    /// Current smoothed offset
    #[inline]
    pub fn offset(&self) -> f64 {
        self.spring.value()
    }

    pub fn autoplay(&self) -> &AutoAdvance {
        &self.autoplay
    }

    /// Height used to normalise page-mode wheel deltas
    pub fn set_viewport_height(&mut self, height: f64) {
        self.viewport_height = height.max(0.0);
    }

    pub fn mount(&mut self, sched: &mut FrameScheduler) {
        if self.mounted {
            return;
        }
        self.mounted = true;
        self.autoplay.start(sched);
        tracing::debug!(
            layers = self.total_layers,
            items = self.item_count,
            "Layer scroller mounted"
        );
    }

    /// Release every callback and drop the integrator state
    pub fn unmount(&mut self, sched: &mut FrameScheduler) {
        if !self.mounted {
            return;
        }
        self.autoplay.stop(sched);
        self.spring.reset();
        self.raw.set(0.0);
        self.hovered = None;
        self.mounted = false;
        tracing::debug!("Layer scroller unmounted");
    }

    /// Pause or resume auto-advance while mounted
    pub fn set_autoplay(&mut self, running: bool, sched: &mut FrameScheduler) {
        if !self.mounted {
            return;
        }
        if running {
            self.autoplay.start(sched);
        } else {
            self.autoplay.stop(sched);
        }
    }

    /// Layer drawn in front of all others
    pub fn front_layer(&self) -> Option<usize> {
        let offset = self.spring.value();
        (0..self.total_layers).max_by(|a, b| {
            self.depth_at(*a, offset).total_cmp(&self.depth_at(*b, offset))
        })
    }

    pub fn on_wheel(&mut self, delta: WheelDelta) {
        if !self.mounted {
            return;
        }
        let d = delta.to_signal_delta(self.viewport_height, self.config.scroll_sensitivity);
        self.raw.add(d);
    }

    /// Pointer drag by `dy` pixels
    pub fn on_drag(&mut self, dy: f64) {
        if !self.mounted {
            return;
        }
        self.raw.add(dy * self.config.scroll_sensitivity);
    }

    /// Route a fired scheduler callback; false if it is not ours
    pub fn handle(&mut self, fired: &Fired, sched: &mut FrameScheduler) -> bool {
        if !self.mounted {
            return false;
        }
        self.autoplay.handle(fired, sched, &self.raw)
    }

    /// Advance the smoothing stage by `dt` seconds
    pub fn tick(&mut self, dt: f64) {
        if !self.mounted {
            return;
        }
        self.spring.set_target(self.raw.get());
        self.spring.step(dt);
    }

    pub fn set_hovered(&mut self, layer: Option<usize>) {
        self.hovered = layer.filter(|l| *l < self.total_layers);
    }

    /// Check if another frame is needed
    pub fn needs_update(&self) -> bool {
        self.mounted
            && (!self.spring.is_settled()
                || self.spring.target() != self.raw.get()
                || self.autoplay.is_running())
    }

    /// Depth of layer `index` at smoothed offset `offset`
    pub fn depth_at(&self, index: usize, offset: f64) -> f64 {
        wrap(-(index as f64) * self.config.spacing + offset, self.total_depth)
    }

    /// Map the smoothed offset onto every layer
    pub fn compute(&self) -> LayerFrame {
        let offset = self.spring.value();
        let layers = (0..self.total_layers)
            .map(|i| self.layer_at(i, offset))
            .collect();

        LayerFrame {
            offset,
            scene: SceneTransform {
                rotate_x: self.tables.tilt.map(offset),
                rotate_y: self.config.camera_rotation,
            },
            layers,
        }
    }

    fn layer_at(&self, index: usize, offset: f64) -> LayerTransform {
        let depth = self.depth_at(index, offset);
        let hovered = self.hovered == Some(index);
        let item = (self.item_count > 0).then(|| index % self.item_count);

        LayerTransform {
            layer: index,
            item,
            depth,
            scale: self.tables.scale.map(depth),
            opacity: self.tables.opacity.map(depth),
            blur: if hovered { 0.0 } else { self.tables.blur.map(depth) },
            z_index: if hovered {
                HOVER_Z_INDEX
            } else {
                (5000.0 + depth * 10.0).round() as i64
            },
            hovered,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AutoPlayMode;
    use crate::motion::SignalSource;

    fn still_config() -> AppConfig {
        let mut config = AppConfig::default();
        config.auto_play.enabled = false;
        config
    }

    #[test]
    fn test_total_layers() {
        assert_eq!(total_layers(20, 1), 20);
        assert_eq!(total_layers(20, 15), 30);
        assert_eq!(total_layers(20, 0), 20);
    }

    #[test]
    fn test_wrap_range_and_periodicity() {
        let m = 3000.0;
        for i in -200..200 {
            let v = i as f64 * 37.5 + 0.25;
            let w = wrap(v, m);
            assert!(w >= -m / 2.0 && w < m / 2.0, "wrap({v}) = {w}");
            assert!((wrap(v + m, m) - w).abs() < 1e-9);
            assert!((wrap(v - 2.0 * m, m) - w).abs() < 1e-9);
        }
        assert_eq!(wrap(0.0, m), -1500.0);
        assert_eq!(wrap(1500.0, m), 0.0);
        assert_eq!(wrap(-1e-18, m), -1500.0);
        assert_eq!(wrap(5.0, 0.0), 0.0);
    }

    #[test]
    fn test_layers_are_evenly_spaced() {
        let mut sched = FrameScheduler::new();
        let mut scroller = LayerScroller::new(&still_config(), 3).unwrap();
        scroller.mount(&mut sched);
        let frame = scroller.compute();
        assert_eq!(frame.layers.len(), 20);
        // spacing 150, 20 layers -> depth 3000
        assert_eq!(frame.layers[0].depth, -1500.0);
        assert_eq!(frame.layers[1].depth, 1350.0);
        assert_eq!(frame.layers[10].depth, 0.0);
        assert_eq!(frame.layers[10].scale, 1.0);
        assert_eq!(frame.layers[10].opacity, 0.9);
        assert_eq!(frame.layers[10].blur, 0.0);
        assert_eq!(frame.layers[10].z_index, 5000);
        assert_eq!(frame.layers[4].item, Some(1));
    }

    #[test]
    fn test_depth_of_field_tables() {
        let mut sched = FrameScheduler::new();
        let mut scroller = LayerScroller::new(&still_config(), 1).unwrap();
        scroller.mount(&mut sched);
        let frame = scroller.compute();

        let back = &frame.layers[0];
        assert_eq!(back.opacity, 0.0);
        assert_eq!(back.blur, 30.0);
        assert_eq!(back.scale, 0.6);

        // focus edge at 3000 * 0.3 = 900, reached by layer 4
        let edge = frame.layers.iter().find(|l| l.depth == 900.0).unwrap();
        assert!((edge.opacity - 0.9 * 0.3).abs() < 1e-12);
        assert_eq!(edge.blur, 6.0);
    }

    #[test]
    fn test_disabled_depth_of_field_is_flat() {
        let mut config = still_config();
        config.depth_of_field.enabled = false;
        let mut sched = FrameScheduler::new();
        let mut scroller = LayerScroller::new(&config, 4).unwrap();
        scroller.mount(&mut sched);
        for layer in scroller.compute().layers {
            assert!((layer.opacity - 0.9).abs() < 1e-12);
            assert_eq!(layer.blur, 0.0);
        }
    }

    #[test]
    fn test_hover_clears_blur_and_raises() {
        let mut sched = FrameScheduler::new();
        let mut scroller = LayerScroller::new(&still_config(), 2).unwrap();
        scroller.mount(&mut sched);
        scroller.set_hovered(Some(0));
        let frame = scroller.compute();
        assert!(frame.layers[0].hovered);
        assert_eq!(frame.layers[0].blur, 0.0);
        assert_eq!(frame.layers[0].z_index, HOVER_Z_INDEX);
        assert_eq!(frame.paint_order().last().unwrap().layer, 0);

        scroller.set_hovered(Some(1000));
        assert!(scroller.compute().layers.iter().all(|l| !l.hovered));
    }

    #[test]
    fn test_wheel_is_smoothed() {
        let mut sched = FrameScheduler::new();
        let mut scroller = LayerScroller::new(&still_config(), 2).unwrap();
        scroller.set_viewport_height(800.0);
        scroller.mount(&mut sched);
        scroller.on_wheel(WheelDelta::pixels(400.0));
        assert_eq!(scroller.raw_reader().get(), 200.0);
        assert!(scroller.needs_update());

        scroller.tick(1.0 / 60.0);
        let first = scroller.offset();
        assert!(first > 0.0 && first < 200.0);

        for _ in 0..600 {
            scroller.tick(1.0 / 60.0);
        }
        assert_eq!(scroller.offset(), 200.0);
        assert!(!scroller.needs_update());
        assert!((scroller.compute().scene.rotate_x - (-25.0 + 0.2)).abs() < 1e-9);
    }

    #[test]
    fn test_unmount_releases_everything() {
        let mut config = AppConfig::default();
        config.auto_play.mode = AutoPlayMode::Continuous;
        let mut sched = FrameScheduler::new();
        let mut scroller = LayerScroller::new(&config, 3).unwrap();
        scroller.mount(&mut sched);
        assert_eq!(sched.pending(), 1);

        for _ in 0..30 {
            for fired in sched.advance(1.0 / 60.0) {
                scroller.handle(&fired, &mut sched);
            }
            scroller.tick(1.0 / 60.0);
        }
        assert!(scroller.raw_reader().get() > 0.0);

        scroller.unmount(&mut sched);
        assert_eq!(sched.pending(), 0);

        let reader = scroller.raw_reader();
        let before = scroller.compute();
        for _ in 0..30 {
            for fired in sched.advance(1.0 / 60.0) {
                scroller.handle(&fired, &mut sched);
            }
            scroller.tick(1.0 / 60.0);
            scroller.on_wheel(WheelDelta::pixels(100.0));
        }
        assert_eq!(reader.get(), 0.0);
        assert_eq!(scroller.compute(), before);
    }

    #[test]
    fn test_autoplay_can_be_paused() {
        let mut sched = FrameScheduler::new();
        let mut scroller = LayerScroller::new(&AppConfig::default(), 3).unwrap();
        scroller.mount(&mut sched);
        assert!(scroller.autoplay().is_running());

        scroller.set_autoplay(false, &mut sched);
        assert_eq!(sched.pending(), 0);
        scroller.set_autoplay(true, &mut sched);
        assert_eq!(sched.pending(), 1);
    }

    #[test]
    fn test_front_layer_is_nearest() {
        let mut sched = FrameScheduler::new();
        let mut scroller = LayerScroller::new(&still_config(), 3).unwrap();
        scroller.mount(&mut sched);
        // layer 1 sits at depth 1350, the nearest at offset 0
        assert_eq!(scroller.front_layer(), Some(1));
    }

    #[test]
    fn test_invalid_configuration_is_rejected() {
        let mut config = still_config();
        config.depth_of_field.focus_range = 0.0;
        assert!(LayerScroller::new(&config, 3).is_err());
    }

    #[test]
    fn test_non_finite_autoplay_speed_is_rejected() {
        let mut config = still_config();
        config.auto_play.speed = f64::NAN;
        assert!(matches!(
            LayerScroller::new(&config, 3),
            Err(crate::Error::InvalidConfiguration(_))
        ));
    }
}
