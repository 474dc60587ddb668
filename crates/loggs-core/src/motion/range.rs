//! L4 Atomic Layer: Piecewise-linear breakpoint tables
//!
//! A [`BreakpointTable`] maps one scalar input onto one visual property
//! (translation, scale, opacity, blur). Tables are validated when built so a
//! malformed table can never reach the per-tick path.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

use super::timing::lerp;

/// Behaviour for inputs outside the table's domain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Extrapolation {
    /// Hold the nearest edge value
    #[default]
    Clamp,
    /// Continue the edge segment linearly
    Extend,
}

/// Ordered (input, output) control points defining a piecewise-linear function
///
/// Invariants: at least two points, domain and range of equal length, finite
/// values, strictly increasing domain.
#[derive(Debug, Clone, PartialEq)]
pub struct BreakpointTable {
    domain: Vec<f64>,
    range: Vec<f64>,
    extrapolation: Extrapolation,
}

impl BreakpointTable {
    /// Build a clamping table
    pub fn new(domain: Vec<f64>, range: Vec<f64>) -> Result<Self> {
        if domain.len() != range.len() {
            return Err(Error::invalid(format!(
                "breakpoint table domain has {} points but range has {}",
                domain.len(),
                range.len()
            )));
        }
        if domain.len() < 2 {
            return Err(Error::invalid(format!(
                "breakpoint table needs at least 2 points, got {}",
                domain.len()
            )));
        }
        if let Some(bad) = domain.iter().chain(range.iter()).find(|v| !v.is_finite()) {
            return Err(Error::invalid(format!(
                "breakpoint table contains non-finite value {bad}"
            )));
        }
        if let Some(pair) = domain.windows(2).find(|w| w[1] <= w[0]) {
            return Err(Error::invalid(format!(
                "breakpoint table domain must be strictly increasing ({} then {})",
                pair[0], pair[1]
            )));
        }

        Ok(Self {
            domain,
            range,
            extrapolation: Extrapolation::Clamp,
        })
    }

    /// A two-point table
    pub fn linear(from: (f64, f64), to: (f64, f64)) -> Result<Self> {
        Self::new(vec![from.0, to.0], vec![from.1, to.1])
    }

    /// Table with the same output everywhere on `domain`
    pub fn constant(domain: Vec<f64>, value: f64) -> Result<Self> {
        let range = vec![value; domain.len()];
        Self::new(domain, range)
    }

    pub fn with_extrapolation(mut self, extrapolation: Extrapolation) -> Self {
        self.extrapolation = extrapolation;
        self
    }

    pub fn extrapolation(&self) -> Extrapolation {
        self.extrapolation
    }

    pub fn domain(&self) -> &[f64] {
        &self.domain
    }

    pub fn range(&self) -> &[f64] {
        &self.range
    }

    /// Evaluate the table at `x`
    pub fn map(&self, x: f64) -> f64 {
        let last = self.domain.len() - 1;

        if x <= self.domain[0] {
            if x == self.domain[0] || self.extrapolation == Extrapolation::Clamp {
                return self.range[0];
            }
            return self.segment(0, x);
        }
        if x >= self.domain[last] {
            if x == self.domain[last] || self.extrapolation == Extrapolation::Clamp {
                return self.range[last];
            }
            return self.segment(last - 1, x);
        }

        // First breakpoint strictly greater than x; x lies in the segment before it
        let upper = self.domain.partition_point(|&d| d <= x);
        self.segment(upper - 1, x)
    }

    /// Interpolate (or extend) along the segment starting at `i`
    #[inline]
    fn segment(&self, i: usize, x: f64) -> f64 {
        let (x0, x1) = (self.domain[i], self.domain[i + 1]);
        let t = (x - x0) / (x1 - x0);
        lerp(self.range[i], self.range[i + 1], t)
    }
}

/// Evaluate `table` at `x`
#[inline]
pub fn map_value(table: &BreakpointTable, x: f64) -> f64 {
    table.map(x)
}
