use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use loggs_core::views::LoaderFrame;

use crate::app::App;
use crate::theme::Theme;

/// Logo box width in columns at scale 1
const LOGO_COLS: f64 = 24.0;
const SPINNER_DOTS: usize = 7;

/// Spinner row with the lit dot following `phase`
fn spinner_row(phase: f64) -> String {
    let lit = ((phase.rem_euclid(1.0) * SPINNER_DOTS as f64) as usize).min(SPINNER_DOTS - 1);
    (0..SPINNER_DOTS)
        .map(|i| if i == lit { "●" } else { "·" })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Startup overlay drawn over everything else
pub struct LoaderWidget;

impl LoaderWidget {
    pub fn render(frame: &mut Frame, area: Rect, app: &App) {
        let loader = app.loader.compute();
        if !loader.visible || loader.opacity <= 0.0 || area.is_empty() {
            return;
        }
        let theme = &app.theme;
        let paper = Theme::fade(theme.paper, theme.bg0, loader.opacity);
        frame.render_widget(Clear, area);
        frame.render_widget(Block::default().style(Style::default().bg(paper)), area);

        Self::render_logo(frame, area, app, &loader, paper);

        if loader.spinner_opacity > 0.0 {
            let row = area.y + (area.height / 2 + 2).min(area.height.saturating_sub(1));
            frame.render_widget(
                Paragraph::new(spinner_row(loader.spinner_phase))
                    .style(Style::default().fg(Theme::fade(theme.ink, paper, loader.spinner_opacity)))
                    .alignment(Alignment::Center),
                Rect::new(area.x, row, area.width, 1),
            );
        }
    }

    fn render_logo(frame: &mut Frame, area: Rect, app: &App, loader: &LoaderFrame, paper: Color) {
        if loader.logo_opacity <= 0.0 || area.height < 4 {
            return;
        }
        let ink = Theme::fade(app.theme.ink, paper, loader.logo_opacity);
        let width = ((LOGO_COLS * loader.logo_scale).round() as u16).min(area.width);
        let rect = Rect::new(
            area.x + (area.width - width) / 2,
            area.y + (area.height / 2).saturating_sub(2),
            width,
            3,
        );
        frame.render_widget(
            Paragraph::new(Line::from(Span::styled(
                "LOGGS VISUAL",
                Style::default().fg(ink).add_modifier(Modifier::BOLD),
            )))
            .alignment(Alignment::Center)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(ink)),
            ),
            rect,
        );
    }
}
