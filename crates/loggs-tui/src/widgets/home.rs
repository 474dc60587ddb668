use ratatui::{
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use loggs_core::motion::Section;
use loggs_core::views::CarouselItem;
use loggs_core::VisualItemSource;

use super::{clip, fit, page_row, px_to_cols, px_to_rows};
use crate::app::App;
use crate::theme::Theme;

/// Share of the viewport height taken by a gallery card
const CARD_HEIGHT: f64 = 0.55;

/// Hero, pinned gallery strip and the stats row
pub struct HomeWidget;

impl HomeWidget {
    pub fn render(frame: &mut Frame, area: Rect, app: &App) {
        let theme = &app.theme;
        frame.render_widget(Block::default().style(Style::default().bg(theme.bg0)), area);

        let layout = app.home_layout();
        let scroll = app.viewport.scroll_offset();

        Self::render_hero(frame, area, app, &layout.hero, scroll);
        Self::render_strip(frame, area, app, &layout.carousel, scroll);
        Self::render_stats(frame, area, app, &layout.counters(), scroll);
    }

    fn render_hero(frame: &mut Frame, area: Rect, app: &App, hero: &Section, scroll: f64) {
        let theme = &app.theme;
        let row = page_row(area, hero.top + hero.height * 0.4, scroll);
        let lines = [
            Line::from(Span::styled(
                "LOGGS VISUAL",
                Style::default().fg(theme.fg0).add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                "live music documentation",
                Style::default().fg(theme.grey1),
            )),
            Line::from(""),
            Line::from(Span::styled("scroll ↓", Style::default().fg(theme.grey0))),
        ];
        if let Some(rect) = clip(area, area.x as i32, row, area.width as i32, lines.len() as i32) {
            let skip = (rect.y as i32 - row).max(0) as usize;
            let visible: Vec<Line> = lines.into_iter().skip(skip).collect();
            frame.render_widget(Paragraph::new(visible).alignment(Alignment::Center), rect);
        }
    }

    /// The strip sticks to the top of the viewport while its section is
    /// being scrolled through
    fn render_strip(frame: &mut Frame, area: Rect, app: &App, section: &Section, scroll: f64) {
        let theme = &app.theme;
        let vh = app.viewport.size().height;
        let pinned = scroll.clamp(section.top, (section.top + section.height - vh).max(section.top));
        let top = page_row(area, pinned, scroll);

        let carousel = app.carousel.compute();
        let card_rows = px_to_rows(vh * CARD_HEIGHT).max(3);
        let strip_top = top + (area.height as i32 - card_rows) / 2 - 1;

        for item in &carousel.items {
            Self::render_card(frame, area, app, item, strip_top, card_rows, carousel.blur);
        }

        // Progress guide under the strip
        let line_row = strip_top + card_rows + 1;
        let drawn = (area.width as f64 * carousel.line).round() as i32;
        if let Some(rect) = clip(area, area.x as i32, line_row, drawn, 1) {
            frame.render_widget(
                Paragraph::new("━".repeat(rect.width as usize))
                    .style(Style::default().fg(theme.teal)),
                rect,
            );
        }

        let caption = format!(" {:>3.0}% ", carousel.progress * 100.0);
        if let Some(rect) = clip(area, area.x as i32, line_row + 1, area.width as i32, 1) {
            frame.render_widget(
                Paragraph::new(caption)
                    .style(Style::default().fg(theme.grey0))
                    .alignment(Alignment::Right),
                rect,
            );
        }
    }

    fn render_card(
        frame: &mut Frame,
        area: Rect,
        app: &App,
        item: &CarouselItem,
        top: i32,
        rows: i32,
        blur: f64,
    ) {
        let theme = &app.theme;
        let x = area.x as i32 + px_to_cols(item.x);
        let Some(rect) = clip(area, x, top, px_to_cols(item.width), rows) else {
            return;
        };

        let border = if item.in_view { theme.teal } else { theme.grey0 };
        let mut style = Style::default().bg(theme.bg1);
        if blur >= 1.0 {
            style = style.add_modifier(Modifier::DIM);
        }
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border))
            .style(style);
        let inner = block.inner(rect);
        frame.render_widget(Clear, rect);
        frame.render_widget(block, rect);

        let label = app
            .catalog
            .gallery
            .item(item.index)
            .map(|image| {
                if image.title.is_empty() {
                    format!("#{}", item.index + 1)
                } else {
                    image.title.to_string()
                }
            })
            .unwrap_or_default();
        if inner.height > 0 {
            let row = Rect::new(inner.x, inner.y + inner.height - 1, inner.width, 1);
            frame.render_widget(
                Paragraph::new(fit(&label, inner.width as usize))
                    .style(Style::default().fg(Theme::fade(theme.fg0, theme.bg1, 1.0 - blur * 0.25))),
                row,
            );
        }
    }

    fn render_stats(frame: &mut Frame, area: Rect, app: &App, row: &Section, scroll: f64) {
        let theme = &app.theme;
        let count = app.counters.len().max(1) as i32;
        let top = page_row(area, row.top, scroll);
        let height = px_to_rows(row.height).max(2);
        let column = area.width as i32 / count;

        for (i, (counter, stat)) in app.counters.iter().zip(&app.catalog.stats).enumerate() {
            let x = area.x as i32 + column * i as i32;
            let Some(rect) = clip(area, x, top, column, height) else {
                continue;
            };
            let skip = (rect.y as i32 - top).max(0) as usize;
            let lines: Vec<Line> = [
                Line::from(Span::styled(
                    counter.display(),
                    Style::default().fg(theme.fg0).add_modifier(Modifier::BOLD),
                )),
                Line::from(Span::styled(stat.label.clone(), Style::default().fg(theme.grey1))),
            ]
            .into_iter()
            .skip(skip)
            .collect();
            frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), rect);
        }
    }
}
