mod about;
mod home;
mod layer_stack;
mod loader;
mod status_bar;

pub use about::{board_rect, card_at, AboutWidget};
pub use home::HomeWidget;
pub use layer_stack::{focus_rect, LayerStackWidget};
pub use loader::LoaderWidget;
pub use status_bar::StatusBarWidget;

use ratatui::layout::Rect;
use unicode_width::UnicodeWidthChar;

use crate::app::{CELL_HEIGHT_PX, CELL_WIDTH_PX};

/// Clip a cell rectangle given in signed coordinates to `area`
pub(crate) fn clip(area: Rect, x: i32, y: i32, width: i32, height: i32) -> Option<Rect> {
    let left = x.max(area.x as i32);
    let top = y.max(area.y as i32);
    let right = (x + width).min(area.x as i32 + area.width as i32);
    let bottom = (y + height).min(area.y as i32 + area.height as i32);
    if right <= left || bottom <= top {
        return None;
    }
    Some(Rect::new(
        left as u16,
        top as u16,
        (right - left) as u16,
        (bottom - top) as u16,
    ))
}

/// Screen row of a page-space y coordinate
pub(crate) fn page_row(area: Rect, page_y: f64, scroll: f64) -> i32 {
    area.y as i32 + ((page_y - scroll) / CELL_HEIGHT_PX).round() as i32
}

/// Pixels to whole columns
pub(crate) fn px_to_cols(px: f64) -> i32 {
    (px / CELL_WIDTH_PX).round() as i32
}

/// Pixels to whole rows
pub(crate) fn px_to_rows(px: f64) -> i32 {
    (px / CELL_HEIGHT_PX).round() as i32
}

/// Truncate `text` to at most `width` display columns
pub(crate) fn fit(text: &str, width: usize) -> String {
    let mut used = 0;
    let mut out = String::new();
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > width {
            break;
        }
        used += w;
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clip() {
        let area = Rect::new(0, 0, 80, 24);
        assert_eq!(clip(area, 10, 5, 20, 4), Some(Rect::new(10, 5, 20, 4)));
        assert_eq!(clip(area, -5, -2, 10, 4), Some(Rect::new(0, 0, 5, 2)));
        assert_eq!(clip(area, 75, 20, 10, 10), Some(Rect::new(75, 20, 5, 4)));
        assert_eq!(clip(area, 90, 0, 10, 4), None);
        assert_eq!(clip(area, 0, -10, 10, 4), None);
    }

    #[test]
    fn test_fit_counts_wide_chars() {
        assert_eq!(fit("Pangkal Pinang", 7), "Pangkal");
        assert_eq!(fit("日本語", 5), "日本");
        assert_eq!(fit("abc", 10), "abc");
    }

    #[test]
    fn test_page_row() {
        let area = Rect::new(0, 2, 80, 24);
        assert_eq!(page_row(area, 320.0, 0.0), 22);
        assert_eq!(page_row(area, 320.0, 160.0), 12);
        assert_eq!(page_row(area, 0.0, 160.0), -8);
    }
}
