use ratatui::{
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use loggs_core::views::LayerTransform;
use loggs_core::VisualItemSource;

use super::{clip, px_to_rows};
use crate::app::App;
use crate::theme::Theme;

/// Share of the content area taken by a layer at scale 1
const LAYER_WIDTH: f64 = 0.45;
const LAYER_HEIGHT: f64 = 0.55;
/// Vertical travel per pixel of depth, scaled by the camera tilt
const TILT_TRAVEL: f64 = 0.6;

/// Rectangle of an unscaled layer, centred in `area`
pub fn focus_rect(area: Rect) -> Rect {
    let width = (area.width as f64 * LAYER_WIDTH).round() as u16;
    let height = (area.height as f64 * LAYER_HEIGHT).round() as u16;
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}

pub struct LayerStackWidget;

impl LayerStackWidget {
    pub fn render(frame: &mut Frame, area: Rect, app: &App) {
        let theme = &app.theme;
        frame.render_widget(Block::default().style(Style::default().bg(theme.bg0)), area);

        let scene = app.layers.compute();
        let tilt = scene.scene.rotate_x.to_radians().sin();
        for layer in scene.paint_order() {
            if let Some(rect) = Self::project(area, layer, tilt) {
                Self::render_layer(frame, rect, app, layer);
            }
        }

        let hint = format!(
            " depth {:>7.1}  tilt {:>5.1}°  {} layers ",
            scene.offset, scene.scene.rotate_x, scene.layers.len()
        );
        let footer = Rect::new(area.x, area.y + area.height.saturating_sub(1), area.width, 1);
        frame.render_widget(
            Paragraph::new(Line::from(Span::styled(hint, Style::default().fg(theme.grey0))))
                .alignment(Alignment::Right),
            footer,
        );
    }

    /// Screen rectangle of a layer; deeper layers are smaller and pushed
    /// along the tilt
    fn project(area: Rect, layer: &LayerTransform, tilt: f64) -> Option<Rect> {
        if layer.opacity <= 0.0 || layer.scale <= 0.0 {
            return None;
        }
        let base = focus_rect(area);
        let width = (base.width as f64 * layer.scale).round() as i32;
        let height = (base.height as f64 * layer.scale).round() as i32;
        let cx = base.x as i32 + base.width as i32 / 2;
        let cy = base.y as i32 + base.height as i32 / 2 + px_to_rows(layer.depth * tilt * TILT_TRAVEL);
        clip(area, cx - width / 2, cy - height / 2, width, height)
    }

    fn render_layer(frame: &mut Frame, rect: Rect, app: &App, layer: &LayerTransform) {
        let theme = &app.theme;
        let border = if layer.hovered {
            theme.highlight
        } else {
            Theme::fade(theme.fg1, theme.bg0, layer.opacity)
        };
        let fill = Theme::fade(theme.bg2, theme.bg0, layer.opacity);

        let mut style = Style::default().bg(fill);
        if layer.blur >= 1.0 && !layer.hovered {
            style = style.add_modifier(Modifier::DIM);
        }

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border))
            .style(style);
        let inner = block.inner(rect);

        frame.render_widget(Clear, rect);
        frame.render_widget(block, rect);

        let label = match layer.item.and_then(|i| app.catalog.works.item(i)) {
            Some(item) => item.title.to_string(),
            None => (layer.layer + 1).to_string(),
        };
        let text_color = if layer.item.is_some() {
            Theme::fade(theme.fg0, fill, layer.opacity)
        } else {
            Theme::fade(theme.placeholder, fill, layer.opacity.max(0.5))
        };
        if inner.height > 0 {
            let row = Rect::new(inner.x, inner.y + inner.height / 2, inner.width, 1);
            frame.render_widget(
                Paragraph::new(super::fit(&label, inner.width as usize))
                    .style(Style::default().fg(text_color))
                    .alignment(Alignment::Center),
                row,
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_focus_rect_is_centred() {
        let area = Rect::new(0, 0, 100, 40);
        let rect = focus_rect(area);
        assert_eq!(rect, Rect::new(27, 9, 45, 22));
    }

    #[test]
    fn test_projection_shrinks_far_layers() {
        let area = Rect::new(0, 0, 100, 40);
        let layer = |depth: f64, scale: f64| LayerTransform {
            layer: 0,
            item: None,
            depth,
            scale,
            opacity: 1.0,
            blur: 0.0,
            z_index: 5000,
            hovered: false,
        };
        let near = LayerStackWidget::project(area, &layer(0.0, 1.0), 0.0).unwrap();
        let far = LayerStackWidget::project(area, &layer(-2000.0, 0.5), 0.0).unwrap();
        assert!(far.width < near.width);
        assert!(far.height < near.height);

        let hidden = LayerTransform {
            opacity: 0.0,
            ..layer(0.0, 1.0)
        };
        assert!(LayerStackWidget::project(area, &hidden, 0.0).is_none());
    }
}
