//! Animated counter
//!
//! A number that springs from its start value to its end value the first
//! time at least half of it is visible, and stays there afterwards.

use crate::config::SpringConfig;
use crate::content::Stat;
use crate::motion::{Section, Spring};

/// Visible share of an element needed to reveal it
pub const REVEAL_AMOUNT: f64 = 0.5;

/// Share of `element` inside the viewport at `scroll`
pub fn visible_fraction(element: &Section, scroll: f64, viewport_height: f64) -> f64 {
    if element.height <= 0.0 {
        return 0.0;
    }
    let top = element.top.max(scroll);
    let bottom = (element.top + element.height).min(scroll + viewport_height);
    ((bottom - top) / element.height).clamp(0.0, 1.0)
}

#[derive(Debug, Clone)]
pub struct Counter {
    end: f64,
    decimals: usize,
    show_plus: bool,
    spring: Spring,
    revealed: bool,
}

impl Counter {
    pub fn new(stat: &Stat, spring: SpringConfig) -> Self {
        let mut s = Spring::new(spring);
        s.jump_to(stat.start);
        Self {
            end: stat.end,
            decimals: stat.decimals,
            show_plus: stat.show_plus,
            spring: s,
            revealed: false,
        }
    }

    #[inline]
    pub fn is_revealed(&self) -> bool {
        self.revealed
    }

    #[inline]
    pub fn value(&self) -> f64 {
        self.spring.value()
    }

    /// Start counting; later calls do nothing
    pub fn reveal(&mut self) {
        if self.revealed {
            return;
        }
        self.revealed = true;
        self.spring.set_target(self.end);
    }

    /// Feed the element's visible share; reveals once it reaches one half
    pub fn observe(&mut self, fraction: f64) {
        if fraction >= REVEAL_AMOUNT {
            self.reveal();
        }
    }

    pub fn tick(&mut self, dt: f64) {
        self.spring.step(dt);
    }

    pub fn needs_update(&self) -> bool {
        !self.spring.is_settled()
    }

    /// Rendered text for the current value
    pub fn display(&self) -> String {
        format_count(self.spring.value(), self.decimals, self.show_plus)
    }
}

/// Fixed decimals, comma grouping from 1000 up, optional `+`
pub fn format_count(value: f64, decimals: usize, show_plus: bool) -> String {
    let fixed = format!("{value:.decimals$}");
    let mut text = if value >= 1000.0 {
        group_thousands(&fixed)
    } else {
        fixed
    };
    if show_plus {
        text.push('+');
    }
    text
}

/// Group the integer digits in threes; trailing fractional zeros are dropped
fn group_thousands(fixed: &str) -> String {
    let (int_part, frac_part) = match fixed.split_once('.') {
        Some((i, f)) => (i, f.trim_end_matches('0')),
        None => (fixed, ""),
    };

    let digits: Vec<char> = int_part.chars().collect();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.iter().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(*c);
    }

    if !frac_part.is_empty() {
        grouped.push('.');
        grouped.push_str(frac_part);
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stat(end: f64, decimals: usize, show_plus: bool) -> Stat {
        Stat {
            label: "Photos".into(),
            start: 0.0,
            end,
            decimals,
            show_plus,
        }
    }

    #[test]
    fn test_format_count() {
        assert_eq!(format_count(0.0, 0, false), "0");
        assert_eq!(format_count(19.6, 0, true), "20+");
        assert_eq!(format_count(999.4, 0, false), "999");
        assert_eq!(format_count(1000.0, 0, false), "1,000");
        assert_eq!(format_count(1234567.0, 0, true), "1,234,567+");
        assert_eq!(format_count(2.5, 2, false), "2.50");
        assert_eq!(format_count(1500.5, 2, false), "1,500.5");
    }

    #[test]
    fn test_visible_fraction() {
        let element = Section {
            top: 1000.0,
            height: 100.0,
        };
        assert_eq!(visible_fraction(&element, 0.0, 800.0), 0.0);
        assert_eq!(visible_fraction(&element, 250.0, 800.0), 0.5);
        assert_eq!(visible_fraction(&element, 900.0, 800.0), 1.0);
        assert_eq!(visible_fraction(&element, 1100.0, 800.0), 0.0);
    }

    #[test]
    fn test_counts_up_once_half_visible() {
        let mut counter = Counter::new(&stat(20.0, 0, true), SpringConfig::default());
        assert_eq!(counter.display(), "0+");

        counter.observe(0.3);
        counter.tick(0.5);
        assert!(!counter.is_revealed());
        assert_eq!(counter.value(), 0.0);

        counter.observe(0.5);
        assert!(counter.is_revealed());
        for _ in 0..600 {
            counter.tick(1.0 / 60.0);
        }
        assert_eq!(counter.display(), "20+");
        assert!(!counter.needs_update());

        // Scrolling away never resets it
        counter.observe(0.0);
        assert_eq!(counter.value(), 20.0);
    }
}
