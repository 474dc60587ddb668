//! Motion primitives shared by every view
//!
//! # Architecture
//!
//! ## L4 Atomic Layer
//! - `easing` - Pure easing curves (ease-out family, ease-in-out quad/cubic)
//! - `timing` - Progress, interpolation and throttling on the frame clock
//! - `range` - Piecewise-linear breakpoint tables (the Range Mapper)
//! - `signal` - Raw scroll signal, read-only handles and wheel normalisation
//!
//! ## L3 Molecular Layer
//! - `spring` - Damped spring integrator (the Smoothing Stage)
//! - `trigger` - Section progress between scroll trigger points, with scrub
//!
//! # Usage
//!
//! ```
//! use loggs_core::config::SpringConfig;
//! use loggs_core::motion::{BreakpointTable, ScrollSignal, Spring};
//!
//! let raw = ScrollSignal::new(0.0);
//! let mut smooth = Spring::new(SpringConfig::default());
//! let opacity = BreakpointTable::new(vec![0.0, 500.0], vec![1.0, 0.0]).unwrap();
//!
//! raw.add(250.0);
//! smooth.set_target(raw.get());
//! smooth.step(1.0 / 60.0);
//! let alpha = opacity.map(smooth.value());
//! assert!(alpha < 1.0 && alpha > 0.0);
//! ```

// L4 Atomic Layer
pub mod easing;
pub mod range;
pub mod signal;
pub mod timing;

// L3 Molecular Layer
pub mod spring;
pub mod trigger;

// Re-exports for convenient access
pub use easing::EasingType;
pub use range::{map_value, BreakpointTable, Extrapolation};
pub use signal::{DeltaMode, ScrollSignal, SignalReader, SignalSource, WheelDelta};
pub use spring::{Spring, SpringState};
pub use timing::{lerp, Throttle};
pub use trigger::{Edge, ScrollTrigger, Scrub, Section, TriggerPoint};
