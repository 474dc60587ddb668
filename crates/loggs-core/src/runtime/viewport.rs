//! Viewport / input provider
//!
//! Owns the page-wide scroll signal and the viewport dimensions. Views
//! never write to it; they read the scroll through a [`SignalReader`] and
//! register listeners for the events they care about.

use std::collections::BTreeMap;

use crate::motion::{ScrollSignal, SignalReader};

/// Events a view can listen for
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ViewportEvent {
    Resize,
    Scroll,
}

/// Handle to a registered listener
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ListenerId(u64);

/// Current viewport geometry
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ViewportSize {
    pub width: f64,
    pub height: f64,
    /// Width taken by a vertical scrollbar, if any
    pub scrollbar_width: f64,
}

#[derive(Debug)]
pub struct Viewport {
    scroll: ScrollSignal,
    size: ViewportSize,
    page_height: f64,
    next_listener: u64,
    listeners: BTreeMap<ListenerId, ViewportEvent>,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            scroll: ScrollSignal::new(0.0),
            size: ViewportSize {
                width,
                height,
                scrollbar_width: 0.0,
            },
            page_height: height,
            next_listener: 0,
            listeners: BTreeMap::new(),
        }
    }

    #[inline]
    pub fn size(&self) -> ViewportSize {
        self.size
    }

    /// Read-only handle to the page scroll offset
    pub fn scroll_reader(&self) -> SignalReader {
        self.scroll.reader()
    }

    #[inline]
    pub fn scroll_offset(&self) -> f64 {
        self.scroll.get()
    }

    #[inline]
    pub fn page_height(&self) -> f64 {
        self.page_height
    }

    /// Largest reachable scroll offset
    pub fn max_scroll(&self) -> f64 {
        (self.page_height - self.size.height).max(0.0)
    }

    /// Whole-page scroll progress in [0, 1]
    pub fn page_progress(&self) -> f64 {
        let max = self.max_scroll();
        if max <= 0.0 {
            0.0
        } else {
            (self.scroll.get() / max).clamp(0.0, 1.0)
        }
    }

    /// Set the total document height; the scroll is clamped into range
    pub fn set_page_height(&mut self, height: f64) -> Vec<ListenerId> {
        self.page_height = height.max(0.0);
        let clamped = self.scroll.get().clamp(0.0, self.max_scroll());
        if clamped != self.scroll.get() {
            return self.scroll_to(clamped);
        }
        Vec::new()
    }

    pub fn set_scrollbar_width(&mut self, width: f64) {
        self.size.scrollbar_width = width.max(0.0);
    }

    /// Resize the viewport and return the listeners to notify
    pub fn resize(&mut self, width: f64, height: f64) -> Vec<ListenerId> {
        self.size.width = width.max(0.0);
        self.size.height = height.max(0.0);
        let mut notify = self.listeners_for(ViewportEvent::Resize);
        let clamped = self.scroll.get().clamp(0.0, self.max_scroll());
        if clamped != self.scroll.get() {
            notify.extend(self.scroll_to(clamped));
        }
        notify
    }

    /// Scroll to `offset` (clamped) and return the listeners to notify
    pub fn scroll_to(&mut self, offset: f64) -> Vec<ListenerId> {
        let offset = offset.clamp(0.0, self.max_scroll());
        if offset == self.scroll.get() {
            return Vec::new();
        }
        self.scroll.set(offset);
        self.listeners_for(ViewportEvent::Scroll)
    }

    pub fn scroll_by(&mut self, delta: f64) -> Vec<ListenerId> {
        self.scroll_to(self.scroll.get() + delta)
    }

    pub fn subscribe(&mut self, event: ViewportEvent) -> ListenerId {
        let id = ListenerId(self.next_listener);
        self.next_listener += 1;
        self.listeners.insert(id, event);
        id
    }

    /// Remove a listener; returns false if it was not registered
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        self.listeners.remove(&id).is_some()
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    fn listeners_for(&self, event: ViewportEvent) -> Vec<ListenerId> {
        self.listeners
            .iter()
            .filter(|(_, e)| **e == event)
            .map(|(id, _)| *id)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::motion::SignalSource;

    #[test]
    fn test_scroll_is_clamped_and_broadcast() {
        let mut viewport = Viewport::new(1000.0, 800.0);
        viewport.set_page_height(3000.0);
        let reader = viewport.scroll_reader();
        let listener = viewport.subscribe(ViewportEvent::Scroll);

        assert_eq!(viewport.scroll_to(500.0), vec![listener]);
        assert_eq!(reader.get(), 500.0);

        viewport.scroll_to(10_000.0);
        assert_eq!(reader.get(), 2200.0);
        assert_eq!(viewport.page_progress(), 1.0);

        // No change, no notification
        assert!(viewport.scroll_to(2200.0).is_empty());
        viewport.scroll_by(-5000.0);
        assert_eq!(reader.get(), 0.0);
    }

    #[test]
    fn test_resize_notifies_only_resize_listeners() {
        let mut viewport = Viewport::new(1000.0, 800.0);
        let resize = viewport.subscribe(ViewportEvent::Resize);
        let _scroll = viewport.subscribe(ViewportEvent::Scroll);
        assert_eq!(viewport.resize(1200.0, 800.0), vec![resize]);
        assert_eq!(viewport.size().width, 1200.0);
    }

    #[test]
    fn test_unsubscribe() {
        let mut viewport = Viewport::new(100.0, 100.0);
        let id = viewport.subscribe(ViewportEvent::Resize);
        assert_eq!(viewport.listener_count(), 1);
        assert!(viewport.unsubscribe(id));
        assert!(!viewport.unsubscribe(id));
        assert_eq!(viewport.listener_count(), 0);
        assert!(viewport.resize(50.0, 50.0).is_empty());
    }

    #[test]
    fn test_short_page_has_no_progress() {
        let viewport = Viewport::new(100.0, 800.0);
        assert_eq!(viewport.max_scroll(), 0.0);
        assert_eq!(viewport.page_progress(), 0.0);
    }
}
