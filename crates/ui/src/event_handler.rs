use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::io::Result;
use std::time::Duration;

use crate::state::AppState;

mod key_action;

pub use key_action::KeyAction;

/// Event handler for the chat screen
pub struct EventHandler;

impl EventHandler {
    /// Read one terminal event if one arrives within `timeout`
    pub fn read(timeout: Duration) -> Result<Option<Event>> {
        if crossterm::event::poll(timeout)? { Ok(Some(crossterm::event::read()?)) } else { Ok(None) }
    }

    /// Apply editing keys to the input directly; return anything the app must do.
    ///
    /// Typing stays enabled while a request is in flight; only submission is gated.
    pub fn handle_key_event(event: KeyEvent, state: &mut AppState) -> Option<KeyAction> {
        if event.kind != KeyEventKind::Press {
            return None;
        }

        let ctrl = event.modifiers.contains(KeyModifiers::CONTROL);
        let alt = event.modifiers.contains(KeyModifiers::ALT);

        match event.code {
            KeyCode::Char('c') if ctrl => Some(KeyAction::Exit),
            KeyCode::Char('o') if ctrl => Some(KeyAction::ToggleCitations),
            KeyCode::Char('u') if ctrl => {
                state.input.clear();
                None
            }
            KeyCode::Esc if state.citations.focused().is_some() => Some(KeyAction::ClearFocus),
            KeyCode::Esc => Some(KeyAction::Exit),
            KeyCode::Enter if alt || event.modifiers.contains(KeyModifiers::SHIFT) => {
                state.input.insert_newline();
                None
            }
            KeyCode::Enter => Some(KeyAction::Submit),
            KeyCode::Tab => Some(KeyAction::FocusNext),
            KeyCode::BackTab => Some(KeyAction::FocusPrev),
            KeyCode::PageUp => Some(KeyAction::PageUp),
            KeyCode::PageDown => Some(KeyAction::PageDown),
            KeyCode::End if ctrl => Some(KeyAction::ScrollToBottom),
            KeyCode::Up => {
                state.input.navigate_up();
                None
            }
            KeyCode::Down => {
                state.input.navigate_down();
                None
            }
            KeyCode::Left => {
                state.input.move_left();
                None
            }
            KeyCode::Right => {
                state.input.move_right();
                None
            }
            KeyCode::Home => {
                state.input.move_home();
                None
            }
            KeyCode::End => {
                state.input.move_end();
                None
            }
            KeyCode::Backspace => {
                state.input.backspace();
                None
            }
            KeyCode::Delete => {
                state.input.delete();
                None
            }
            KeyCode::Char(c) if !ctrl => {
                state.input.insert_char(c);
                if state.input.is_navigating_history() {
                    state.input.reset_history_navigation();
                }
                None
            }
            _ => None,
        }
    }
}
