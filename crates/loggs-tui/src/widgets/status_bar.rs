use chrono::Local;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use unicode_width::UnicodeWidthStr;

use loggs_core::Page;

use crate::app::App;

pub struct StatusBarWidget;

impl StatusBarWidget {
    pub fn render(frame: &mut Frame, area: Rect, app: &App) {
        let theme = &app.theme;

        let tabs: Vec<Span> = Page::ALL
            .iter()
            .enumerate()
            .map(|(i, page)| {
                let label = format!(" {}:{} ", i + 1, page.as_str());
                if *page == app.page {
                    Span::styled(
                        label,
                        Style::default()
                            .fg(theme.bg0)
                            .bg(theme.accent)
                            .add_modifier(Modifier::BOLD),
                    )
                } else {
                    Span::styled(label, Style::default().fg(theme.grey1).bg(theme.bg2))
                }
            })
            .collect();

        let detail = if let Some(msg) = &app.status_message {
            format!(" {} ", msg)
        } else {
            match app.page {
                Page::Home => format!(
                    " scroll {:.0}px | carousel {:.0}% ",
                    app.viewport.scroll_offset(),
                    app.carousel.progress() * 100.0
                ),
                Page::Works => {
                    let auto = if app.layers.autoplay().is_running() {
                        "auto"
                    } else {
                        "manual"
                    };
                    format!(" offset {:.1} | {} ", app.layers.offset(), auto)
                }
                Page::About => format!(
                    " scroll {:.0}px | {} cards ",
                    app.viewport.scroll_offset(),
                    app.cards.cards().len()
                ),
            }
        };

        let clock = if app.config.ui.show_clock {
            Local::now().format(" %I:%M:%S %p ").to_string()
        } else {
            String::new()
        };
        let help_hint = " q:quit tab:page j/k:scroll p:auto ";

        let used: usize = tabs.iter().map(|s| s.content.width()).sum::<usize>()
            + detail.width()
            + help_hint.width()
            + clock.width();
        let padding = (area.width as usize).saturating_sub(used);

        let mut spans = tabs;
        spans.push(Span::styled(
            detail,
            Style::default().fg(theme.fg0).bg(theme.bg2),
        ));
        spans.push(Span::styled(
            " ".repeat(padding),
            Style::default().bg(theme.bg2),
        ));
        spans.push(Span::styled(
            help_hint,
            Style::default().fg(theme.grey0).bg(theme.bg2),
        ));
        spans.push(Span::styled(
            clock,
            Style::default().fg(theme.fg1).bg(theme.bg1),
        ));

        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }
}
