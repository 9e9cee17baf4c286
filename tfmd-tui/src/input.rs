//! Keybindings for the full-screen viewer

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseEvent, MouseEventKind};

/// Lines moved per mouse wheel notch
const WHEEL_STEP: usize = 3;

/// What a key press asks the viewer to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    LineUp,
    LineDown,
    PageUp,
    PageDown,
    Top,
    Bottom,
    /// Scroll by a number of lines, negative is up
    Scroll(isize),
    None,
}

/// Map a key event to an action
pub fn action_for_key(key: KeyEvent) -> Action {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c') => Action::Quit,
            KeyCode::Char('f') => Action::PageDown,
            KeyCode::Char('b') => Action::PageUp,
            _ => Action::None,
        };
    }

    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => Action::Quit,
        KeyCode::Char('j') | KeyCode::Down | KeyCode::Enter => Action::LineDown,
        KeyCode::Char('k') | KeyCode::Up => Action::LineUp,
        KeyCode::PageDown | KeyCode::Char(' ') => Action::PageDown,
        KeyCode::PageUp | KeyCode::Char('b') => Action::PageUp,
        KeyCode::Char('g') | KeyCode::Home => Action::Top,
        KeyCode::Char('G') | KeyCode::End => Action::Bottom,
        _ => Action::None,
    }
}

/// Map a mouse event to an action; only the wheel is used
pub fn action_for_mouse(mouse: MouseEvent) -> Action {
    match mouse.kind {
        MouseEventKind::ScrollDown => Action::Scroll(WHEEL_STEP as isize),
        MouseEventKind::ScrollUp => Action::Scroll(-(WHEEL_STEP as isize)),
        _ => Action::None,
    }
}

/// One-line summary of the bindings, shown above the viewport
pub const CONTROLS: &str = "q quit · j/k line · Space/b page · g/G top/bottom";
