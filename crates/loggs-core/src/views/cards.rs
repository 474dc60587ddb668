//! Embed card board
//!
//! Loosely scattered video cards that load one after another, fade in,
//! and can be dragged around. A dragged card jumps to the front and grows
//! slightly; shortly after it is dropped it falls back to its own layer.

use serde::Serialize;

use crate::config::SpringConfig;
use crate::content::{CardPosition, EmbedCard};
use crate::motion::easing::EasingType;
use crate::motion::timing::progress;
use crate::motion::Spring;
use crate::runtime::{Fired, FrameScheduler, TaskId};

/// Viewport width below which cards are stacked in one column
pub const MOBILE_BREAKPOINT: f64 = 768.0;

/// Stacking order of the card being dragged
pub const DRAG_Z_INDEX: i64 = 100;

const BASE_Z_INDEX: i64 = 10;
const DRAG_SCALE: f64 = 1.05;
const INITIAL_SCALE: f64 = 0.8;
const Z_RESET_DELAY: f64 = 0.3;
const LOAD_DELAY: f64 = 0.5;
const LOAD_STAGGER: f64 = 0.2;
const FADE_DELAY: f64 = 0.3;
const FADE_STAGGER: f64 = 0.15;
const FADE_DURATION: f64 = 0.6;

const MOBILE_COLUMN: [CardPosition; 4] = [
    CardPosition { x: 0.5, y: 0.15 },
    CardPosition { x: 0.5, y: 0.35 },
    CardPosition { x: 0.5, y: 0.55 },
    CardPosition { x: 0.5, y: 0.80 },
];

/// Spring used for scale and rotation
pub fn card_spring() -> SpringConfig {
    SpringConfig {
        stiffness: 300.0,
        damping: 25.0,
        mass: 1.0,
        rest_delta: 0.001,
        rest_speed: 0.001,
    }
}

/// Board-relative anchor of card `index`
pub fn anchor_for(card: &EmbedCard, index: usize, mobile: bool) -> (CardPosition, f64) {
    if mobile {
        let pos = MOBILE_COLUMN.get(index).copied().unwrap_or(MOBILE_COLUMN[0]);
        (pos, 0.0)
    } else {
        (card.position, card.rotation)
    }
}

#[derive(Debug, Clone)]
struct CardState {
    rest_rotation: f64,
    loaded: bool,
    load_timer: Option<TaskId>,
    dragging: bool,
    drag_offset: (f64, f64),
    z_index: i64,
    z_reset_timer: Option<TaskId>,
    scale: Spring,
    rotation: Spring,
}

impl CardState {
    fn new(index: usize, rest_rotation: f64) -> Self {
        let mut scale = Spring::new(card_spring());
        scale.jump_to(INITIAL_SCALE);
        let mut rotation = Spring::new(card_spring());
        rotation.jump_to(rest_rotation);
        Self {
            rest_rotation,
            loaded: false,
            load_timer: None,
            dragging: false,
            drag_offset: (0.0, 0.0),
            z_index: BASE_Z_INDEX + index as i64,
            z_reset_timer: None,
            scale,
            rotation,
        }
    }

    fn timers(&self) -> impl Iterator<Item = TaskId> {
        self.load_timer.into_iter().chain(self.z_reset_timer)
    }
}

/// Computed appearance of one card
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CardTransform {
    pub index: usize,
    /// Anchor as fractions of the board
    pub x: f64,
    pub y: f64,
    /// Drag displacement in pixels
    pub offset_x: f64,
    pub offset_y: f64,
    pub scale: f64,
    pub rotation: f64,
    pub opacity: f64,
    pub z_index: i64,
    pub loaded: bool,
    pub dragging: bool,
}

#[derive(Debug)]
pub struct CardBoard {
    cards: Vec<EmbedCard>,
    states: Vec<CardState>,
    mobile: bool,
    elapsed: f64,
    mounted: bool,
}

impl CardBoard {
    pub fn new(cards: Vec<EmbedCard>) -> Self {
        let states = cards
            .iter()
            .enumerate()
            .map(|(i, c)| CardState::new(i, c.rotation))
            .collect();
        Self {
            cards,
            states,
            mobile: false,
            elapsed: 0.0,
            mounted: false,
        }
    }

    pub fn cards(&self) -> &[EmbedCard] {
        &self.cards
    }

    #[inline]
    pub fn is_mobile(&self) -> bool {
        self.mobile
    }

    /// Switch between scattered and single-column layout
    pub fn set_viewport_width(&mut self, width: f64) {
        let mobile = width < MOBILE_BREAKPOINT;
        if mobile != self.mobile {
            self.mobile = mobile;
            for (i, state) in self.states.iter_mut().enumerate() {
                state.rest_rotation = anchor_for(&self.cards[i], i, mobile).1;
                if !state.dragging {
                    state.rotation.set_target(state.rest_rotation);
                }
            }
        }
    }

    /// Schedule the staggered loads and start the entrance
    pub fn mount(&mut self, sched: &mut FrameScheduler) {
        if self.mounted {
            return;
        }
        self.mounted = true;
        self.elapsed = 0.0;
        for (i, state) in self.states.iter_mut().enumerate() {
            state.load_timer = Some(sched.set_timeout(LOAD_DELAY + LOAD_STAGGER * i as f64));
            state.scale.set_target(1.0);
        }
        tracing::debug!(cards = self.cards.len(), "Card board mounted");
    }

    /// Cancel every pending timer and reset to the pre-mount state
    pub fn unmount(&mut self, sched: &mut FrameScheduler) {
        if !self.mounted {
            return;
        }
        for state in &self.states {
            for id in state.timers() {
                sched.cancel(id);
            }
        }
        self.states = self
            .cards
            .iter()
            .enumerate()
            .map(|(i, c)| CardState::new(i, c.rotation))
            .collect();
        self.mobile = false;
        self.mounted = false;
        tracing::debug!("Card board unmounted");
    }

    /// React to a fired timer; false if it is not ours
    pub fn handle(&mut self, fired: &Fired) -> bool {
        if !self.mounted {
            return false;
        }
        for (i, state) in self.states.iter_mut().enumerate() {
            if state.load_timer == Some(fired.id) {
                state.load_timer = None;
                state.loaded = true;
                tracing::debug!(card = %self.cards[i].id, "Card embed loaded");
                return true;
            }
            if state.z_reset_timer == Some(fired.id) {
                state.z_reset_timer = None;
                state.z_index = BASE_Z_INDEX + i as i64;
                return true;
            }
        }
        false
    }

    pub fn drag_start(&mut self, index: usize, sched: &mut FrameScheduler) {
        if !self.mounted {
            return;
        }
        let Some(state) = self.states.get_mut(index) else {
            return;
        };
        if let Some(id) = state.z_reset_timer.take() {
            sched.cancel(id);
        }
        state.dragging = true;
        state.z_index = DRAG_Z_INDEX;
        state.scale.set_target(DRAG_SCALE);
        state.rotation.set_target(0.0);
    }

    /// Move a dragged card by `(dx, dy)` pixels
    pub fn drag_move(&mut self, index: usize, dx: f64, dy: f64) {
        if let Some(state) = self.states.get_mut(index).filter(|s| s.dragging) {
            state.drag_offset.0 += dx;
            state.drag_offset.1 += dy;
        }
    }

    pub fn drag_end(&mut self, index: usize, sched: &mut FrameScheduler) {
        let Some(state) = self.states.get_mut(index).filter(|s| s.dragging) else {
            return;
        };
        state.dragging = false;
        state.scale.set_target(1.0);
        state.rotation.set_target(state.rest_rotation);
        state.z_reset_timer = Some(sched.set_timeout(Z_RESET_DELAY));
    }

    /// Index of the card being dragged, if any
    pub fn dragging(&self) -> Option<usize> {
        self.states.iter().position(|s| s.dragging)
    }

    pub fn tick(&mut self, dt: f64) {
        if !self.mounted {
            return;
        }
        if dt > 0.0 {
            self.elapsed += dt;
        }
        for state in &mut self.states {
            state.scale.step(dt);
            state.rotation.step(dt);
        }
    }

    pub fn needs_update(&self) -> bool {
        if !self.mounted {
            return false;
        }
        let fading = (0..self.states.len()).any(|i| self.opacity(i) < 1.0);
        fading
            || self
                .states
                .iter()
                .any(|s| !s.scale.is_settled() || !s.rotation.is_settled())
    }

    fn opacity(&self, index: usize) -> f64 {
        if !self.mounted {
            return 0.0;
        }
        let delay = FADE_DELAY + FADE_STAGGER * index as f64;
        let p = progress(self.elapsed - delay, FADE_DURATION);
        EasingType::Cubic.apply(p)
    }

    pub fn compute(&self) -> Vec<CardTransform> {
        self.states
            .iter()
            .enumerate()
            .map(|(i, state)| {
                let (anchor, _) = anchor_for(&self.cards[i], i, self.mobile);
                CardTransform {
                    index: i,
                    x: anchor.x,
                    y: anchor.y,
                    offset_x: state.drag_offset.0,
                    offset_y: state.drag_offset.1,
                    scale: state.scale.value(),
                    rotation: state.rotation.value(),
                    opacity: self.opacity(i),
                    z_index: state.z_index,
                    loaded: state.loaded,
                    dragging: state.dragging,
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::Catalog;

    fn board() -> CardBoard {
        CardBoard::new(Catalog::builtin().unwrap().cards)
    }

    fn pump(board: &mut CardBoard, sched: &mut FrameScheduler, seconds: f64) {
        let frames = (seconds * 100.0).round() as usize;
        for _ in 0..frames {
            for fired in sched.advance(0.01) {
                board.handle(&fired);
            }
            board.tick(0.01);
        }
    }

    #[test]
    fn test_embeds_load_staggered() {
        let mut sched = FrameScheduler::new();
        let mut board = board();
        board.mount(&mut sched);
        assert_eq!(sched.pending(), 3);

        pump(&mut board, &mut sched, 0.55);
        let loaded: Vec<bool> = board.compute().iter().map(|c| c.loaded).collect();
        assert_eq!(loaded, vec![true, false, false]);

        pump(&mut board, &mut sched, 0.2);
        let loaded: Vec<bool> = board.compute().iter().map(|c| c.loaded).collect();
        assert_eq!(loaded, vec![true, true, false]);

        pump(&mut board, &mut sched, 0.2);
        assert!(board.compute().iter().all(|c| c.loaded));
        assert_eq!(sched.pending(), 0);
    }

    #[test]
    fn test_entrance_fades_and_grows() {
        let mut sched = FrameScheduler::new();
        let mut board = board();
        board.mount(&mut sched);
        let start = board.compute();
        assert!(start.iter().all(|c| c.opacity == 0.0));
        assert_eq!(start[0].scale, INITIAL_SCALE);

        pump(&mut board, &mut sched, 2.0);
        let settled = board.compute();
        assert!(settled.iter().all(|c| c.opacity == 1.0));
        assert!(settled.iter().all(|c| c.scale == 1.0));
        assert!(!board.needs_update());
    }

    #[test]
    fn test_drag_raises_then_restores_z_index() {
        let mut sched = FrameScheduler::new();
        let mut board = board();
        board.mount(&mut sched);
        pump(&mut board, &mut sched, 2.0);

        board.drag_start(1, &mut sched);
        board.drag_move(1, 40.0, -10.0);
        pump(&mut board, &mut sched, 1.0);
        let card = board.compute()[1];
        assert_eq!(card.z_index, DRAG_Z_INDEX);
        assert!(card.dragging);
        assert_eq!((card.offset_x, card.offset_y), (40.0, -10.0));
        assert!((card.scale - DRAG_SCALE).abs() < 1e-9);
        assert_eq!(board.dragging(), Some(1));

        board.drag_end(1, &mut sched);
        pump(&mut board, &mut sched, 0.2);
        assert_eq!(board.compute()[1].z_index, DRAG_Z_INDEX);
        pump(&mut board, &mut sched, 0.2);
        assert_eq!(board.compute()[1].z_index, 11);
        // The card stays where it was dropped
        assert_eq!(board.compute()[1].offset_x, 40.0);
    }

    #[test]
    fn test_mobile_layout_is_a_column() {
        let mut board = board();
        board.set_viewport_width(500.0);
        assert!(board.is_mobile());
        let cards = board.compute();
        assert_eq!((cards[0].x, cards[0].y), (0.5, 0.15));
        assert_eq!((cards[2].x, cards[2].y), (0.5, 0.55));

        board.set_viewport_width(1280.0);
        assert_eq!(board.compute()[0].x, 0.6);
    }

    #[test]
    fn test_unmount_cancels_timers() {
        let mut sched = FrameScheduler::new();
        let mut board = board();
        board.mount(&mut sched);
        pump(&mut board, &mut sched, 0.1);
        board.drag_start(0, &mut sched);
        board.drag_end(0, &mut sched);
        assert_eq!(sched.pending(), 4);

        board.unmount(&mut sched);
        assert_eq!(sched.pending(), 0);
        pump(&mut board, &mut sched, 2.0);
        assert!(board.compute().iter().all(|c| !c.loaded && c.opacity == 0.0));
    }
}
