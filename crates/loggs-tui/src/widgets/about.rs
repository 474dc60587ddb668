use ratatui::{
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use loggs_core::views::keyhole::ARROW_TOP;
use loggs_core::views::{CardTransform, KeyholeFrame, TimelineFrame};

use super::{clip, fit, page_row, px_to_cols, px_to_rows};
use crate::app::App;
use crate::theme::Theme;

const CARD_WIDTH_PX: f64 = 320.0;
const CARD_HEIGHT_PX: f64 = 180.0;

const INTRO_HEADING: &str = "Who We Are.";
const INTRO_BODY: &str = "A documentation project born from passion, capturing bands with \
honest visuals and raw energy. Based in Pangkal Pinang.";

/// Card board placement in signed screen cells; may extend past the area
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Board {
    pub left: i32,
    pub top: i32,
    pub width: i32,
    pub height: i32,
}

impl Board {
    /// Unclipped cell rectangle of a card as `(x, y, width, height)`
    fn card_cells(&self, card: &CardTransform) -> (i32, i32, i32, i32) {
        let width = px_to_cols(CARD_WIDTH_PX * card.scale).max(4);
        let height = px_to_rows(CARD_HEIGHT_PX * card.scale).max(3);
        let cx = self.left + (card.x * self.width as f64).round() as i32 + px_to_cols(card.offset_x);
        let cy = self.top + (card.y * self.height as f64).round() as i32 + px_to_rows(card.offset_y);
        (cx - width / 2, cy - height / 2, width, height)
    }
}

/// Board geometry for the current scroll position
pub fn board_rect(app: &App) -> Board {
    let area = app.content_area;
    let section = app.cards_section();
    Board {
        left: area.x as i32,
        top: page_row(area, section.top, app.viewport.scroll_offset()),
        width: area.width as i32,
        height: px_to_rows(section.height),
    }
}

/// Topmost card under the pointer
pub fn card_at(board: Board, cards: &[CardTransform], col: u16, row: u16) -> Option<usize> {
    let (col, row) = (col as i32, row as i32);
    let mut order: Vec<&CardTransform> = cards.iter().filter(|c| c.opacity > 0.0).collect();
    order.sort_by_key(|c| std::cmp::Reverse(c.z_index));
    order
        .into_iter()
        .find(|card| {
            let (x, y, w, h) = board.card_cells(card);
            col >= x && col < x + w && row >= y && row < y + h
        })
        .map(|card| card.index)
}

/// Overlay bands around the keyhole window, clipped to `area`
fn keyhole_bands(area: Rect, frame: &KeyholeFrame) -> Vec<Rect> {
    let w = area.width as f64;
    let h = area.height as f64;
    let left = area.x as i32 + (frame.hole.left * w).round() as i32;
    let right = area.x as i32 + (frame.hole.right * w).round() as i32;
    let top = area.y as i32 + (frame.hole.top * h).round() as i32;
    let bottom = area.y as i32 + (frame.hole.bottom * h).round() as i32;
    let (x0, y0) = (area.x as i32, area.y as i32);
    let (aw, ah) = (area.width as i32, area.height as i32);

    [
        (x0, y0, aw, top - y0),
        (x0, bottom, aw, y0 + ah - bottom),
        (x0, top, left - x0, bottom - top),
        (right, top, x0 + aw - right, bottom - top),
    ]
    .into_iter()
    .filter_map(|(x, y, w, h)| clip(area, x, y, w, h))
    .collect()
}

/// Keyhole intro, timeline, then the draggable card board
pub struct AboutWidget;

impl AboutWidget {
    pub fn render(frame: &mut Frame, area: Rect, app: &App) {
        frame.render_widget(Block::default().style(Style::default().bg(app.theme.paper)), area);

        let keyhole = app.keyhole.compute();
        Self::render_intro(frame, area, app);
        Self::render_timeline(frame, area, app, &app.timeline.compute());
        Self::render_cards(frame, area, app);
        Self::render_keyhole(frame, area, app, &keyhole);
    }

    /// Hero image block and heading inside the keyhole section
    fn render_intro(frame: &mut Frame, area: Rect, app: &App) {
        let theme = &app.theme;
        let scroll = app.viewport.scroll_offset();
        let section = app.keyhole_section();
        let top = page_row(area, section.top, scroll);
        let height = px_to_rows(app.viewport.size().height);

        if let Some(rect) = clip(area, area.x as i32, top, area.width as i32, height) {
            frame.render_widget(Block::default().style(Style::default().bg(theme.bg1)), rect);
        }

        let heading = page_row(area, section.top + section.height * 0.75, scroll);
        if let Some(rect) = clip(area, area.x as i32, heading, area.width as i32, 2) {
            let lines: Vec<Line> = [
                Line::from(Span::styled(
                    INTRO_HEADING,
                    Style::default().fg(theme.ink).add_modifier(Modifier::BOLD),
                )),
                Line::from(Span::styled(
                    fit(INTRO_BODY, area.width as usize),
                    Style::default().fg(theme.grey0),
                )),
            ]
            .into_iter()
            .skip((rect.y as i32 - heading).max(0) as usize)
            .collect();
            frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), rect);
        }
    }

    /// Paper overlay outside the window and the bobbing scroll hint
    fn render_keyhole(frame: &mut Frame, area: Rect, app: &App, keyhole: &KeyholeFrame) {
        let theme = &app.theme;
        if !keyhole.hole.is_open() {
            for band in keyhole_bands(area, keyhole) {
                frame.render_widget(Clear, band);
                frame.render_widget(Block::default().style(Style::default().bg(theme.paper)), band);
            }
        }

        if keyhole.arrow_opacity <= 0.0 {
            return;
        }
        // Two rows tall, so the half-height bob is one row
        let row = area.y as i32
            + (area.height as f64 * ARROW_TOP).round() as i32
            + (keyhole.arrow_offset * 2.0).round() as i32;
        if let Some(rect) = clip(area, area.x as i32, row, area.width as i32, 2) {
            let color = Theme::fade(theme.ink, theme.paper, keyhole.arrow_opacity);
            frame.render_widget(
                Paragraph::new(vec![Line::from("│"), Line::from("↓")])
                    .style(Style::default().fg(color))
                    .alignment(Alignment::Center),
                rect,
            );
        }
    }

    fn render_timeline(frame: &mut Frame, area: Rect, app: &App, timeline: &TimelineFrame) {
        let theme = &app.theme;
        let scroll = app.viewport.scroll_offset();
        let layout = app.timeline.layout();
        let section = app.timeline.section();

        let title_row = page_row(area, section.top, scroll);
        if let Some(rect) = clip(area, area.x as i32, title_row, area.width as i32, 1) {
            frame.render_widget(
                Paragraph::new(Span::styled(
                    "Our Journey",
                    Style::default().fg(theme.ink).add_modifier(Modifier::BOLD),
                ))
                .alignment(Alignment::Center),
                rect,
            );
        }

        // Line grows down from the first entry
        let axis = area.x as i32 + area.width as i32 / 2;
        let line_top = section.top + layout.header;
        let line_len = (section.top + section.height - line_top) * timeline.line;
        let from = page_row(area, line_top, scroll);
        let to = page_row(area, line_top + line_len, scroll);
        if let Some(rect) = clip(area, axis, from, 1, to - from) {
            let bar: Vec<Line> = (0..rect.height).map(|_| Line::from("│")).collect();
            frame.render_widget(Paragraph::new(bar).style(Style::default().fg(theme.teal)), rect);
        }

        let half = area.width as i32 / 2 - 3;
        for entry in &timeline.entries {
            let Some(data) = app.catalog.timeline.get(entry.index) else {
                continue;
            };
            let placement = layout.entry(entry.index);
            let top = page_row(area, placement.top + entry.y, scroll);
            let height = px_to_rows(placement.height).max(3);
            let x = if entry.index % 2 == 0 { area.x as i32 + 1 } else { axis + 2 };

            let dot = if entry.active { "●" } else { "○" };
            if let Some(rect) = clip(area, axis, top, 1, 1) {
                frame.render_widget(
                    Paragraph::new(dot).style(Style::default().fg(Theme::fade(
                        theme.teal,
                        theme.paper,
                        entry.opacity.max(0.3),
                    ))),
                    rect,
                );
            }

            let Some(rect) = clip(area, x, top, half, height) else {
                continue;
            };
            let ink = Theme::fade(theme.ink, theme.paper, entry.opacity);
            let period_color = if data.current { theme.red } else { theme.teal };
            let lines: Vec<Line> = [
                Line::from(Span::styled(
                    data.period.clone(),
                    Style::default()
                        .fg(Theme::fade(period_color, theme.paper, entry.opacity))
                        .add_modifier(Modifier::BOLD),
                )),
                Line::from(Span::styled(fit(&data.description, half.max(0) as usize), Style::default().fg(ink))),
            ]
            .into_iter()
            .skip((rect.y as i32 - top).max(0) as usize)
            .collect();
            frame.render_widget(Paragraph::new(lines), rect);
        }
    }

    fn render_cards(frame: &mut Frame, area: Rect, app: &App) {
        let theme = &app.theme;
        let board = board_rect(app);
        let mut cards = app.cards.compute();
        cards.sort_by_key(|c| c.z_index);

        for card in &cards {
            if card.opacity <= 0.0 {
                continue;
            }
            let Some(data) = app.cards.cards().get(card.index) else {
                continue;
            };
            let (x, y, w, h) = board.card_cells(card);
            let Some(rect) = clip(area, x, y, w, h) else {
                continue;
            };

            let border = if card.dragging {
                theme.accent
            } else {
                Theme::fade(theme.ink, theme.paper, card.opacity)
            };
            let fill = Theme::fade(theme.bg1, theme.paper, card.opacity);
            let title = format!(" {} {:+.0}° ", fit(&data.title, w.max(8) as usize - 8), card.rotation);
            let block = Block::default()
                .title(title)
                .borders(Borders::ALL)
                .border_style(Style::default().fg(border))
                .style(Style::default().bg(fill));
            let inner = block.inner(rect);
            frame.render_widget(Clear, rect);
            frame.render_widget(block, rect);

            let body = if card.loaded {
                match data.embed_url() {
                    Ok(url) => url.to_string(),
                    Err(err) => {
                        tracing::debug!(card = %data.id, error = %err, "Card has no embed url");
                        String::from("unavailable")
                    }
                }
            } else {
                String::from("loading…")
            };
            if inner.height > 0 {
                let row = Rect::new(inner.x, inner.y + inner.height / 2, inner.width, 1);
                frame.render_widget(
                    Paragraph::new(fit(&body, inner.width as usize))
                        .style(Style::default().fg(Theme::fade(theme.fg1, fill, card.opacity)))
                        .alignment(Alignment::Center),
                    row,
                );
            }
        }
    }
}
