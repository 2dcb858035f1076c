//! Event Handling - Keyboard input processing

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::time::Duration;

use super::state::{PanelFocus, TuiState};

/// Actions that can be triggered by user input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    NextPanel,
    PrevPanel,
    MoveUp,
    MoveDown,
    Select,
    ToggleCompact,
    Delete,
    None,
}

/// Map a key to an action. Focus changes are applied here; everything that
/// touches case data is left to the app.
pub fn handle_key_event(key: KeyEvent, state: &mut TuiState) -> Action {
    match (key.modifiers, key.code) {
        // Quit: q or Ctrl+C
        (KeyModifiers::NONE, KeyCode::Char('q')) => Action::Quit,
        (KeyModifiers::CONTROL, KeyCode::Char('c')) => Action::Quit,

        // Panel navigation: Tab / Shift+Tab
        (KeyModifiers::NONE, KeyCode::Tab) => {
            state.focus = state.focus.next();
            Action::NextPanel
        }
        (KeyModifiers::SHIFT, KeyCode::BackTab) => {
            state.focus = state.focus.prev();
            Action::PrevPanel
        }

        (_, KeyCode::Up) | (KeyModifiers::NONE, KeyCode::Char('k')) => Action::MoveUp,
        (_, KeyCode::Down) | (KeyModifiers::NONE, KeyCode::Char('j')) => Action::MoveDown,
        (_, KeyCode::Enter) => Action::Select,

        (KeyModifiers::NONE, KeyCode::Char('c')) => Action::ToggleCompact,
        // Deleting only makes sense from the case list
        (KeyModifiers::NONE, KeyCode::Char('d')) if state.focus == PanelFocus::Cases => {
            Action::Delete
        }

        _ => Action::None,
    }
}

/// Poll for keyboard events with timeout
pub fn poll_event(timeout: Duration) -> std::io::Result<Option<KeyEvent>> {
    if event::poll(timeout)? {
        if let Event::Key(key) = event::read()? {
            // Windows reports releases too
            if key.kind == KeyEventKind::Press {
                return Ok(Some(key));
            }
        }
    }
    Ok(None)
}
