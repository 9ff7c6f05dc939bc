use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEventKind};

use crate::core::view::NavLink;

/// TUI-specific input events
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TuiEvent {
    // Gestures (classified by core::dispatch)
    Quit,
    Nav(NavLink),
    Activate,
    Back,

    // TUI-local events (handled directly in TUI)
    CursorUp,
    CursorDown,
    ScrollUp,
    ScrollDown,
    ScrollPageUp,
    ScrollPageDown,
    MouseClick(u16, u16),
    Resize,
}

/// Poll for an event with timeout.
pub fn poll_event_timeout(timeout: std::time::Duration) -> Option<TuiEvent> {
    match event::poll(timeout) {
        Ok(true) => match event::read() {
            Ok(ev) => map_event(ev),
            Err(e) => {
                log::warn!("Failed to read terminal event: {}", e);
                None
            }
        },
        Ok(false) => None,
        Err(e) => {
            log::warn!("Failed to poll terminal events: {}", e);
            None
        }
    }
}

/// Poll for an event without blocking (returns immediately)
pub fn poll_event_immediate() -> Option<TuiEvent> {
    poll_event_timeout(std::time::Duration::ZERO)
}

pub fn map_event(ev: Event) -> Option<TuiEvent> {
    match ev {
        Event::Key(key_event) => map_key(key_event),
        Event::Mouse(mouse_event) => match mouse_event.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                Some(TuiEvent::MouseClick(mouse_event.column, mouse_event.row))
            }
            MouseEventKind::ScrollUp => Some(TuiEvent::ScrollUp),
            MouseEventKind::ScrollDown => Some(TuiEvent::ScrollDown),
            _ => None,
        },
        Event::Resize(_, _) => Some(TuiEvent::Resize),
        _ => None,
    }
}

fn map_key(key_event: KeyEvent) -> Option<TuiEvent> {
    // Ignore key releases (reported by terminals with keyboard enhancement)
    if key_event.kind == KeyEventKind::Release {
        return None;
    }
    log::debug!("Key event: {:?} with modifiers {:?}", key_event.code, key_event.modifiers);
    match (key_event.modifiers, key_event.code) {
        (KeyModifiers::CONTROL, KeyCode::Char('c')) => Some(TuiEvent::Quit),
        (_, KeyCode::Char('q')) => Some(TuiEvent::Quit),
        (_, KeyCode::Char('1' | 'h')) => Some(TuiEvent::Nav(NavLink::Home)),
        (_, KeyCode::Char('2' | 'r')) => Some(TuiEvent::Nav(NavLink::Reviews)),
        (_, KeyCode::Char('3' | 'c')) => Some(TuiEvent::Nav(NavLink::Chapters)),
        (_, KeyCode::Char('k') | KeyCode::Up) => Some(TuiEvent::CursorUp),
        (_, KeyCode::Char('j') | KeyCode::Down) => Some(TuiEvent::CursorDown),
        (_, KeyCode::Enter) => Some(TuiEvent::Activate),
        (_, KeyCode::Esc | KeyCode::Backspace | KeyCode::Char('b')) => Some(TuiEvent::Back),
        (_, KeyCode::PageUp) => Some(TuiEvent::ScrollPageUp),
        (_, KeyCode::PageDown | KeyCode::Char(' ')) => Some(TuiEvent::ScrollPageDown),
        _ => None,
    }
}
