use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};

use loggs_core::Page;

/// Input action that can be performed
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Action {
    Quit,
    NextPage,
    ShowPage(Page),
    /// Wheel-style scroll by lines (positive is down)
    ScrollLines(f64),
    /// Scroll by whole viewport heights
    ScrollPages(f64),
    JumpToTop,
    JumpToBottom,
    ToggleAutoPlay,
    /// Pointer moved to (column, row)
    PointerMove(u16, u16),
    PointerDown(u16, u16),
    PointerDrag(u16, u16),
    PointerUp,
    None,
}

/// Lines scrolled per wheel notch or arrow key
pub const LINES_PER_NOTCH: f64 = 3.0;

/// Handle a key event and return the corresponding action
pub fn handle_key_event(key: KeyEvent) -> Action {
    match (key.code, key.modifiers) {
        // Quit
        (KeyCode::Char('q'), KeyModifiers::NONE) => Action::Quit,
        (KeyCode::Char('c'), KeyModifiers::CONTROL) => Action::Quit,

        // Pages
        (KeyCode::Tab, KeyModifiers::NONE) => Action::NextPage,
        (KeyCode::Char('1'), KeyModifiers::NONE) => Action::ShowPage(Page::Home),
        (KeyCode::Char('2'), KeyModifiers::NONE) => Action::ShowPage(Page::Works),
        (KeyCode::Char('3'), KeyModifiers::NONE) => Action::ShowPage(Page::About),

        // Scrolling
        (KeyCode::Char('j'), KeyModifiers::NONE) => Action::ScrollLines(LINES_PER_NOTCH),
        (KeyCode::Char('k'), KeyModifiers::NONE) => Action::ScrollLines(-LINES_PER_NOTCH),
        (KeyCode::Down, KeyModifiers::NONE) => Action::ScrollLines(LINES_PER_NOTCH),
        (KeyCode::Up, KeyModifiers::NONE) => Action::ScrollLines(-LINES_PER_NOTCH),
        (KeyCode::Char('d'), KeyModifiers::CONTROL) => Action::ScrollPages(0.5),
        (KeyCode::Char('u'), KeyModifiers::CONTROL) => Action::ScrollPages(-0.5),
        (KeyCode::PageDown, _) => Action::ScrollPages(1.0),
        (KeyCode::PageUp, _) => Action::ScrollPages(-1.0),
        (KeyCode::Char(' '), KeyModifiers::NONE) => Action::ScrollPages(1.0),

        // Jump to top/bottom
        (KeyCode::Char('g'), KeyModifiers::NONE) => Action::JumpToTop,
        (KeyCode::Home, _) => Action::JumpToTop,
        (KeyCode::Char('G'), KeyModifiers::SHIFT) => Action::JumpToBottom,
        (KeyCode::End, _) => Action::JumpToBottom,

        // Auto-advance
        (KeyCode::Char('p'), KeyModifiers::NONE) => Action::ToggleAutoPlay,

        _ => Action::None,
    }
}

/// Handle a mouse event and return the corresponding action
pub fn handle_mouse_event(mouse: MouseEvent) -> Action {
    match mouse.kind {
        MouseEventKind::ScrollDown => Action::ScrollLines(LINES_PER_NOTCH),
        MouseEventKind::ScrollUp => Action::ScrollLines(-LINES_PER_NOTCH),
        MouseEventKind::Moved => Action::PointerMove(mouse.column, mouse.row),
        MouseEventKind::Down(MouseButton::Left) => Action::PointerDown(mouse.column, mouse.row),
        MouseEventKind::Drag(MouseButton::Left) => Action::PointerDrag(mouse.column, mouse.row),
        MouseEventKind::Up(MouseButton::Left) => Action::PointerUp,
        _ => Action::None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEventKind;

    fn key(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new_with_kind(code, modifiers, KeyEventKind::Press)
    }

    #[test]
    fn test_key_bindings() {
        assert_eq!(handle_key_event(key(KeyCode::Char('q'), KeyModifiers::NONE)), Action::Quit);
        assert_eq!(
            handle_key_event(key(KeyCode::Char('2'), KeyModifiers::NONE)),
            Action::ShowPage(Page::Works)
        );
        assert_eq!(
            handle_key_event(key(KeyCode::Down, KeyModifiers::NONE)),
            Action::ScrollLines(3.0)
        );
        assert_eq!(
            handle_key_event(key(KeyCode::Char('G'), KeyModifiers::SHIFT)),
            Action::JumpToBottom
        );
        assert_eq!(handle_key_event(key(KeyCode::Char('z'), KeyModifiers::NONE)), Action::None);
    }

    #[test]
    fn test_mouse_bindings() {
        let event = |kind| MouseEvent {
            kind,
            column: 4,
            row: 7,
            modifiers: KeyModifiers::NONE,
        };
        assert_eq!(
            handle_mouse_event(event(MouseEventKind::ScrollUp)),
            Action::ScrollLines(-3.0)
        );
        assert_eq!(
            handle_mouse_event(event(MouseEventKind::Down(MouseButton::Left))),
            Action::PointerDown(4, 7)
        );
        assert_eq!(
            handle_mouse_event(event(MouseEventKind::Down(MouseButton::Right))),
            Action::None
        );
    }
}
