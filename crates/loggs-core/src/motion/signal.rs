//! L4 Atomic Layer: Raw scroll signal and input normalisation
//!
//! A [`ScrollSignal`] is the single writable scalar a view is driven by.
//! Everything downstream only sees a [`SignalReader`] through the
//! [`SignalSource`] trait, so components can be handed the page scroll, a
//! wheel accumulator or a test signal interchangeably.

use std::cell::Cell;
use std::rc::Rc;

/// Read-only access to a scalar input signal
pub trait SignalSource {
    fn get(&self) -> f64;
}

/// Owned, writable scroll signal
///
/// Not `Clone`: one logical writer per signal.
#[derive(Debug, Default)]
pub struct ScrollSignal {
    value: Rc<Cell<f64>>,
}

impl ScrollSignal {
    pub fn new(initial: f64) -> Self {
        Self {
            value: Rc::new(Cell::new(initial)),
        }
    }

    #[inline]
    pub fn get(&self) -> f64 {
        self.value.get()
    }

    #[inline]
    pub fn set(&self, value: f64) {
        self.value.set(value);
    }

    /// Add `delta` to the current value and return the new one
    #[inline]
    pub fn add(&self, delta: f64) -> f64 {
        let next = self.value.get() + delta;
        self.value.set(next);
        next
    }

    /// Hand out a read-only view of this signal
    pub fn reader(&self) -> SignalReader {
        SignalReader {
            value: Rc::clone(&self.value),
        }
    }
}

impl SignalSource for ScrollSignal {
    fn get(&self) -> f64 {
        ScrollSignal::get(self)
    }
}

/// Read-only handle to a [`ScrollSignal`]
#[derive(Debug, Clone)]
pub struct SignalReader {
    value: Rc<Cell<f64>>,
}

impl SignalSource for SignalReader {
    #[inline]
    fn get(&self) -> f64 {
        self.value.get()
    }
}

/// Unit of a wheel event's delta
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeltaMode {
    #[default]
    Pixel,
    Line,
    Page,
}

/// Pixels per line for [`DeltaMode::Line`] deltas
pub const LINE_HEIGHT_PX: f64 = 16.0;

/// One wheel (or trackpad) event
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WheelDelta {
    pub delta_y: f64,
    pub mode: DeltaMode,
}

impl WheelDelta {
    pub fn pixels(delta_y: f64) -> Self {
        Self {
            delta_y,
            mode: DeltaMode::Pixel,
        }
    }

    pub fn lines(delta_y: f64) -> Self {
        Self {
            delta_y,
            mode: DeltaMode::Line,
        }
    }

    /// Convert to a signal delta in pixels, scaled by `sensitivity`
    pub fn to_signal_delta(&self, viewport_height: f64, sensitivity: f64) -> f64 {
        let factor = match self.mode {
            DeltaMode::Pixel => 1.0,
            DeltaMode::Line => LINE_HEIGHT_PX,
            DeltaMode::Page => viewport_height,
        };
        self.delta_y * factor * sensitivity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reader_sees_writes() {
        let signal = ScrollSignal::new(10.0);
        let reader = signal.reader();
        assert_eq!(reader.get(), 10.0);
        signal.set(25.0);
        assert_eq!(reader.get(), 25.0);
        assert_eq!(signal.add(5.0), 30.0);
        assert_eq!(reader.clone().get(), 30.0);
    }

    #[test]
    fn test_wheel_normalisation() {
        assert_eq!(WheelDelta::pixels(100.0).to_signal_delta(900.0, 0.5), 50.0);
        assert_eq!(WheelDelta::lines(3.0).to_signal_delta(900.0, 0.5), 24.0);
        let page = WheelDelta {
            delta_y: -1.0,
            mode: DeltaMode::Page,
        };
        assert_eq!(page.to_signal_delta(900.0, 1.0), -900.0);
    }
}
