use ratatui::layout::Rect;

use loggs_core::config::Page;
use loggs_core::content::{Catalog, Stat};
use loggs_core::motion::{DeltaMode, Section, WheelDelta};
use loggs_core::runtime::{Fired, FrameScheduler, Viewport};
use loggs_core::views::{
    visible_fraction, CardBoard, Counter, HorizontalScroll, KeyholeReveal, LayerScroller,
    PageLoader, Timeline, TimelineLayout,
};
use loggs_core::AppConfig;

use crate::input::Action;
use crate::theme::Theme;

/// Logical pixels per terminal column
pub const CELL_WIDTH_PX: f64 = 8.0;
/// Logical pixels per terminal row
pub const CELL_HEIGHT_PX: f64 = 16.0;

/// Gap above the timeline and between the timeline and the card board
const ABOUT_MARGIN_PX: f64 = 64.0;
/// Height of the counter row within the stats section
const STATS_ROW_PX: f64 = 160.0;
/// Keyhole section height in screens
const KEYHOLE_SCREENS: f64 = 1.5;

/// Convert a column/row extent to logical pixels
pub fn cells_to_px(cols: u16, rows: u16) -> (f64, f64) {
    (cols as f64 * CELL_WIDTH_PX, rows as f64 * CELL_HEIGHT_PX)
}

/// Pointer drag in progress on the card board
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DragState {
    pub card: usize,
    pub last: (u16, u16),
}

/// Home page vertical layout in logical pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HomeLayout {
    pub hero: Section,
    pub carousel: Section,
    pub stats: Section,
}

impl HomeLayout {
    pub fn new(viewport_height: f64, section_screens: f64) -> Self {
        let hero = Section {
            top: 0.0,
            height: viewport_height,
        };
        let carousel = Section {
            top: viewport_height,
            height: viewport_height * section_screens,
        };
        let stats = Section {
            top: carousel.top + carousel.height,
            height: viewport_height,
        };
        Self {
            hero,
            carousel,
            stats,
        }
    }

    /// Counter row, centred in the stats section
    pub fn counters(&self) -> Section {
        Section {
            top: self.stats.top + (self.stats.height - STATS_ROW_PX) * 0.5,
            height: STATS_ROW_PX,
        }
    }

    pub fn page_height(&self) -> f64 {
        self.stats.top + self.stats.height
    }
}

pub struct App {
    pub config: AppConfig,
    pub catalog: Catalog,
    pub theme: Theme,
    pub page: Page,
    pub scheduler: FrameScheduler,
    pub viewport: Viewport,
    pub carousel: HorizontalScroll,
    pub counters: Vec<Counter>,
    pub layers: LayerScroller,
    pub keyhole: KeyholeReveal,
    pub timeline: Timeline,
    pub cards: CardBoard,
    pub loader: PageLoader,
    /// Area the current page is drawn into
    pub content_area: Rect,
    pub drag: Option<DragState>,
    pub status_message: Option<String>,
    pub should_quit: bool,
    autoplay_paused: bool,
}

impl App {
    /// Build every view; `size` is the terminal size in cells
    pub fn new(config: AppConfig, catalog: Catalog, size: (u16, u16)) -> loggs_core::Result<Self> {
        let content = Rect::new(0, 0, size.0, size.1.saturating_sub(1));
        let (width, height) = cells_to_px(content.width, content.height);
        let viewport = Viewport::new(width, height);

        let carousel = HorizontalScroll::new(
            config.carousel.clone(),
            config.spring,
            catalog.gallery.len(),
            viewport.scroll_reader(),
        )?;
        let counters = Self::build_counters(&catalog.stats, &config);
        let layers = LayerScroller::new(&config, catalog.works.len())?;
        let keyhole = KeyholeReveal::new(viewport.scroll_reader());
        let timeline = Timeline::new(
            catalog.timeline.len(),
            Self::timeline_layout(height),
            viewport.scroll_reader(),
        );
        let cards = CardBoard::new(catalog.cards.clone());

        let mut app = Self {
            page: config.ui.start_page,
            config,
            catalog,
            theme: Theme::default(),
            scheduler: FrameScheduler::new(),
            viewport,
            carousel,
            counters,
            layers,
            keyhole,
            timeline,
            cards,
            loader: PageLoader::default(),
            content_area: content,
            drag: None,
            status_message: None,
            should_quit: false,
            autoplay_paused: false,
        };
        app.mount_page();
        if app.config.ui.show_loader {
            app.loader.mount(&mut app.scheduler);
        }
        Ok(app)
    }

    fn build_counters(stats: &[Stat], config: &AppConfig) -> Vec<Counter> {
        stats.iter().map(|s| Counter::new(s, config.spring)).collect()
    }

    pub fn home_layout(&self) -> HomeLayout {
        HomeLayout::new(self.viewport.size().height, self.config.carousel.section_screens)
    }

    /// Keyhole section at the top of the About page
    pub fn keyhole_section(&self) -> Section {
        Self::keyhole_section_for(self.viewport.size().height)
    }

    fn keyhole_section_for(viewport_height: f64) -> Section {
        Section {
            top: 0.0,
            height: viewport_height * KEYHOLE_SCREENS,
        }
    }

    /// Timeline placed below the keyhole section
    fn timeline_layout(viewport_height: f64) -> TimelineLayout {
        let keyhole = Self::keyhole_section_for(viewport_height);
        TimelineLayout {
            top: keyhole.top + keyhole.height + ABOUT_MARGIN_PX,
            ..TimelineLayout::default()
        }
    }

    /// Top of the card board section on the About page
    pub fn cards_section(&self) -> Section {
        let timeline = self.timeline.section();
        Section {
            top: timeline.top + timeline.height + ABOUT_MARGIN_PX,
            height: self.viewport.size().height,
        }
    }

    fn page_height(&self) -> f64 {
        match self.page {
            Page::Home => self.home_layout().page_height(),
            Page::Works => self.viewport.size().height,
            Page::About => {
                let cards = self.cards_section();
                cards.top + cards.height
            }
        }
    }

    fn mount_page(&mut self) {
        let size = self.viewport.size();
        match self.page {
            Page::Home => {
                let layout = self.home_layout();
                self.carousel.mount(&mut self.viewport, layout.carousel.top);
                self.counters = Self::build_counters(&self.catalog.stats, &self.config);
            }
            Page::Works => {
                self.layers.set_viewport_height(size.height);
                self.layers.mount(&mut self.scheduler);
                if self.autoplay_paused {
                    self.layers.set_autoplay(false, &mut self.scheduler);
                }
            }
            Page::About => {
                self.keyhole.set_section(self.keyhole_section());
                self.keyhole.set_viewport_height(size.height);
                self.keyhole.mount(&mut self.scheduler);
                self.timeline.set_layout(Self::timeline_layout(size.height));
                self.timeline.set_viewport_height(size.height);
                self.timeline.reset();
                self.cards.set_viewport_width(size.width);
                self.cards.mount(&mut self.scheduler);
            }
        }
        self.viewport.set_page_height(self.page_height());
        tracing::debug!(page = self.page.as_str(), "Page mounted");
    }

    fn unmount_page(&mut self) {
        match self.page {
            Page::Home => self.carousel.unmount(&mut self.viewport),
            Page::Works => self.layers.unmount(&mut self.scheduler),
            Page::About => {
                self.drag = None;
                self.keyhole.unmount(&mut self.scheduler);
                self.cards.unmount(&mut self.scheduler);
                self.timeline.reset();
            }
        }
        self.viewport.scroll_to(0.0);
        if self.scheduler.pending() > 0 {
            tracing::warn!(
                pending = self.scheduler.pending(),
                "Callbacks still scheduled after unmount"
            );
        }
    }

    pub fn show_page(&mut self, page: Page) {
        if page == self.page {
            return;
        }
        self.unmount_page();
        self.page = page;
        self.mount_page();
        self.clear_status();
        tracing::info!(page = page.as_str(), "Switched page");
    }

    /// Terminal resized to `size` cells
    pub fn resize(&mut self, size: (u16, u16)) {
        self.content_area = Rect::new(0, 0, size.0, size.1.saturating_sub(1));
        let (width, height) = cells_to_px(self.content_area.width, self.content_area.height);
        // The viewport clamps against the old page height; restore after relayout
        let scroll = self.viewport.scroll_offset();
        let notify = self.viewport.resize(width, height);

        let now = self.scheduler.now();
        for id in notify {
            self.carousel.handle_listener(id, now, &self.viewport);
        }

        self.layers.set_viewport_height(height);
        self.keyhole.set_section(Self::keyhole_section_for(height));
        self.keyhole.set_viewport_height(height);
        self.timeline.set_layout(Self::timeline_layout(height));
        self.timeline.set_viewport_height(height);
        self.cards.set_viewport_width(width);
        if self.page == Page::Home {
            let top = self.home_layout().carousel.top;
            self.carousel.set_section_top(top);
        }
        self.viewport.set_page_height(self.page_height());
        self.viewport.scroll_to(scroll);
    }

    /// Advance the frame clock by `dt` seconds and step every mounted view
    pub fn update(&mut self, dt: f64) {
        let fired = self.scheduler.advance(dt);
        for f in &fired {
            if !self.loader.handle(f) && !self.dispatch(f) {
                tracing::debug!(id = ?f.id, "Fired callback has no owner");
            }
        }

        self.loader.tick(dt);
        let now = self.scheduler.now();
        match self.page {
            Page::Home => {
                self.carousel.tick(dt, now, &self.viewport);
                let row = self.home_layout().counters();
                let fraction = visible_fraction(
                    &row,
                    self.viewport.scroll_offset(),
                    self.viewport.size().height,
                );
                for counter in &mut self.counters {
                    counter.observe(fraction);
                    counter.tick(dt);
                }
            }
            Page::Works => self.layers.tick(dt),
            Page::About => {
                self.timeline.tick(dt);
                self.cards.tick(dt);
            }
        }
    }

    fn dispatch(&mut self, fired: &Fired) -> bool {
        match self.page {
            Page::Works => self.layers.handle(fired, &mut self.scheduler),
            Page::About => {
                self.cards.handle(fired) || self.keyhole.handle(fired, &mut self.scheduler)
            }
            Page::Home => false,
        }
    }

    /// Check if the next frame should come at the animation rate
    pub fn needs_animation(&self) -> bool {
        if self.loader.needs_update() {
            return true;
        }
        match self.page {
            Page::Home => {
                self.carousel.needs_update() || self.counters.iter().any(|c| c.needs_update())
            }
            Page::Works => self.layers.needs_update(),
            Page::About => {
                self.keyhole.needs_update()
                    || self.timeline.needs_update()
                    || self.cards.needs_update()
                    || self.drag.is_some()
            }
        }
    }

    pub fn apply(&mut self, action: Action) {
        // The loader holds input until it has faded out
        if self.loader.is_visible() && action != Action::Quit {
            return;
        }
        match action {
            Action::Quit => self.should_quit = true,
            Action::NextPage => self.show_page(self.page.next()),
            Action::ShowPage(page) => self.show_page(page),
            Action::ScrollLines(lines) => self.scroll(WheelDelta::lines(lines)),
            Action::ScrollPages(pages) => self.scroll(WheelDelta {
                delta_y: pages,
                mode: DeltaMode::Page,
            }),
            Action::JumpToTop => {
                self.viewport.scroll_to(0.0);
            }
            Action::JumpToBottom => {
                let bottom = self.viewport.max_scroll();
                self.viewport.scroll_to(bottom);
            }
            Action::ToggleAutoPlay => self.toggle_autoplay(),
            Action::PointerMove(col, row) => self.pointer_move(col, row),
            Action::PointerDown(col, row) => self.pointer_down(col, row),
            Action::PointerDrag(col, row) => self.pointer_drag(col, row),
            Action::PointerUp => self.pointer_up(),
            Action::None => {}
        }
    }

    fn scroll(&mut self, delta: WheelDelta) {
        match self.page {
            Page::Works => self.layers.on_wheel(delta),
            Page::Home | Page::About => {
                let px = delta.to_signal_delta(self.viewport.size().height, 1.0);
                self.viewport.scroll_by(px);
            }
        }
    }

    fn toggle_autoplay(&mut self) {
        if self.page != Page::Works {
            return;
        }
        if !self.config.auto_play.enabled {
            self.set_status("Auto-advance is disabled in the configuration");
            return;
        }
        self.autoplay_paused = !self.autoplay_paused;
        self.layers
            .set_autoplay(!self.autoplay_paused, &mut self.scheduler);
        self.set_status(if self.autoplay_paused {
            "Auto-advance paused"
        } else {
            "Auto-advance resumed"
        });
    }

    fn pointer_move(&mut self, col: u16, row: u16) {
        if self.page != Page::Works {
            return;
        }
        let area = crate::widgets::focus_rect(self.content_area);
        let inside = col >= area.x
            && col < area.x + area.width
            && row >= area.y
            && row < area.y + area.height;
        let hovered = if inside { self.layers.front_layer() } else { None };
        self.layers.set_hovered(hovered);
    }

    fn pointer_down(&mut self, col: u16, row: u16) {
        if self.page != Page::About {
            return;
        }
        let board = crate::widgets::board_rect(self);
        let transforms = self.cards.compute();
        if let Some(card) = crate::widgets::card_at(board, &transforms, col, row) {
            self.cards.drag_start(card, &mut self.scheduler);
            self.drag = Some(DragState {
                card,
                last: (col, row),
            });
        }
    }

    fn pointer_drag(&mut self, col: u16, row: u16) {
        if let Some(drag) = self.drag.as_mut() {
            let dx = (col as f64 - drag.last.0 as f64) * CELL_WIDTH_PX;
            let dy = (row as f64 - drag.last.1 as f64) * CELL_HEIGHT_PX;
            drag.last = (col, row);
            self.cards.drag_move(drag.card, dx, dy);
        }
    }

    fn pointer_up(&mut self) {
        if let Some(drag) = self.drag.take() {
            self.cards.drag_end(drag.card, &mut self.scheduler);
        }
    }

    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
    }

    pub fn clear_status(&mut self) {
        self.status_message = None;
    }

    /// Release every view before exit
    pub fn shutdown(&mut self) {
        self.loader.unmount(&mut self.scheduler);
        self.unmount_page();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app() -> App {
        let mut config = AppConfig::default();
        config.auto_play.enabled = false;
        config.ui.show_loader = false;
        App::new(config, Catalog::builtin().unwrap(), (120, 41)).unwrap()
    }

    #[test]
    fn test_home_layout_and_carousel() {
        let mut app = app();
        assert_eq!(app.page, Page::Home);
        // 40 rows * 16 px = 640 px viewport
        let layout = app.home_layout();
        assert_eq!(layout.carousel.top, 640.0);
        assert_eq!(app.viewport.page_height(), 640.0 * 5.0);
        assert!(app.carousel.is_mounted());

        app.viewport.scroll_to(640.0 + 640.0);
        for _ in 0..300 {
            app.update(1.0 / 60.0);
        }
        assert!((app.carousel.progress() - 0.5).abs() < 1e-6);
        assert!(app.carousel.compute().offset < 0.0);
    }

    #[test]
    fn test_counters_reveal_when_scrolled_into_view() {
        let mut app = app();
        app.update(0.1);
        assert!(app.counters.iter().all(|c| !c.is_revealed()));

        app.apply(Action::JumpToBottom);
        for _ in 0..600 {
            app.update(1.0 / 60.0);
        }
        assert!(app.counters.iter().all(|c| c.is_revealed()));
        assert_eq!(app.counters[2].display(), "1,000");
    }

    #[test]
    fn test_page_switch_releases_everything() {
        let mut app = app();
        app.apply(Action::ShowPage(Page::About));
        assert!(!app.carousel.is_mounted());
        assert_eq!(app.viewport.listener_count(), 0);
        // Card timers plus the keyhole arrow frame
        assert_eq!(app.scheduler.pending(), 4);
        assert!(app.keyhole.is_mounted());

        app.apply(Action::ShowPage(Page::Works));
        assert_eq!(app.scheduler.pending(), 0);
        assert!(app.layers.is_mounted());

        app.apply(Action::ScrollLines(3.0));
        for _ in 0..600 {
            app.update(1.0 / 60.0);
        }
        // 3 lines * 16 px * 0.5 sensitivity
        assert_eq!(app.layers.offset(), 24.0);

        app.apply(Action::NextPage);
        assert_eq!(app.page, Page::About);
        assert!(!app.layers.is_mounted());
        assert_eq!(app.layers.offset(), 0.0);
    }

    #[test]
    fn test_about_keyhole_opens_before_timeline() {
        let mut app = app();
        app.apply(Action::ShowPage(Page::About));
        // 640 px viewport: keyhole is 960 px, timeline follows after the margin
        assert_eq!(app.keyhole_section().height, 960.0);
        assert_eq!(app.timeline.section().top, 960.0 + 64.0);
        assert!(!app.keyhole.compute().hole.is_open());

        app.viewport.scroll_to(320.0);
        app.update(1.0 / 60.0);
        assert!(app.keyhole.compute().hole.is_open());
        assert_eq!(app.keyhole.compute().arrow_opacity, 0.0);

        app.resize((120, 21));
        assert_eq!(app.keyhole_section().height, 480.0);
        assert_eq!(app.timeline.section().top, 480.0 + 64.0);

        app.apply(Action::ShowPage(Page::Home));
        assert!(!app.keyhole.is_mounted());
    }

    #[test]
    fn test_loader_holds_input_until_it_fades() {
        let mut config = AppConfig::default();
        config.auto_play.enabled = false;
        let mut app = App::new(config, Catalog::builtin().unwrap(), (120, 41)).unwrap();
        assert!(app.loader.is_visible());
        assert!(app.needs_animation());

        app.apply(Action::JumpToBottom);
        app.apply(Action::NextPage);
        assert_eq!(app.viewport.scroll_offset(), 0.0);
        assert_eq!(app.page, Page::Home);

        for _ in 0..150 {
            app.update(1.0 / 60.0);
        }
        assert!(!app.loader.is_visible());
        app.apply(Action::JumpToBottom);
        assert_eq!(app.viewport.scroll_offset(), app.viewport.max_scroll());
    }

    #[test]
    fn test_quit_passes_through_loader() {
        let mut config = AppConfig::default();
        config.auto_play.enabled = false;
        let mut app = App::new(config, Catalog::builtin().unwrap(), (120, 41)).unwrap();
        app.apply(Action::Quit);
        assert!(app.should_quit);
        app.shutdown();
        assert_eq!(app.scheduler.pending(), 0);
    }

    #[test]
    fn test_resize_remeasures_carousel() {
        let mut app = app();
        let before = app.carousel.measurement().unwrap().viewport_width;
        app.update(1.0);
        app.resize((100, 41));
        let after = app.carousel.measurement().unwrap().viewport_width;
        assert_eq!(before, 960.0);
        assert_eq!(after, 800.0);
    }

    #[test]
    fn test_growing_terminal_keeps_scroll_position() {
        let mut app = app();
        app.apply(Action::JumpToBottom);
        assert_eq!(app.viewport.scroll_offset(), 2560.0);

        // 80 rows is a 1280 px viewport and a 6400 px page
        app.resize((120, 81));
        assert_eq!(app.viewport.page_height(), 6400.0);
        assert_eq!(app.viewport.scroll_offset(), 2560.0);

        // Shrinking still clamps into the shorter page
        app.resize((120, 21));
        assert_eq!(app.viewport.scroll_offset(), app.viewport.max_scroll());
    }

    #[test]
    fn test_autoplay_toggle_respects_config() {
        let mut app = app();
        app.apply(Action::ShowPage(Page::Works));
        app.apply(Action::ToggleAutoPlay);
        assert!(app.status_message.is_some());
        assert_eq!(app.scheduler.pending(), 0);
    }
}
