//! L4 Atomic Layer: Time calculation utilities for transitions
//!
//! All times are seconds on the host's frame clock, never wall-clock
//! `Instant`s, so every calculation can be replayed with synthetic deltas.

/// Calculate transition progress (0.0 to 1.0) from elapsed time and duration
///
/// # Arguments
/// * `elapsed` - Seconds since the transition started
/// * `duration` - Total transition duration in seconds
///
/// # Returns
/// Progress value clamped to [0.0, 1.0]
#[inline]
pub fn progress(elapsed: f64, duration: f64) -> f64 {
    if duration <= 0.0 {
        return 1.0;
    }
    (elapsed / duration).clamp(0.0, 1.0)
}

/// Check if a transition is complete
#[inline]
pub fn is_complete(elapsed: f64, duration: f64) -> bool {
    elapsed >= duration
}

/// Linear interpolation between two values
///
/// Written as a weighted sum so that `t = 0` yields `from` and `t = 1`
/// yields `to` exactly.
#[inline]
pub fn lerp(from: f64, to: f64, t: f64) -> f64 {
    from * (1.0 - t) + to * t
}

/// Convert milliseconds from the config into frame-clock seconds
#[inline]
pub fn ms_to_secs(ms: u64) -> f64 {
    ms as f64 / 1000.0
}

/// Leading-edge throttle
///
/// The first call passes, then every call within `wait` seconds of the last
/// accepted one is dropped.
#[derive(Debug, Clone)]
pub struct Throttle {
    wait: f64,
    last_accepted: Option<f64>,
}

impl Throttle {
    pub fn new(wait: f64) -> Self {
        Self {
            wait: wait.max(0.0),
            last_accepted: None,
        }
    }

    /// Returns true if a call at `now` should run
    pub fn ready(&mut self, now: f64) -> bool {
        match self.last_accepted {
            Some(last) if now - last < self.wait => false,
            _ => {
                self.last_accepted = Some(now);
                true
            }
        }
    }

    pub fn reset(&mut self) {
        self.last_accepted = None;
    }
}
