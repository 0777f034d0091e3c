//! Keyboard commands.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use thiserror::Error;

use crate::dashboard::view::SortKey;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Quit,
    ToggleDown,
    SortBy(SortKey),
    ToggleReverse,
    EditFilter,
    ScrollUp,
    ScrollDown,
    PageUp,
    PageDown,
}

/// A key with no binding. Never fatal; the control loop drops it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("unbound key {0:?}")]
pub struct InputError(pub KeyCode);

/// Map a key press to a command. Letters are case-insensitive.
pub fn map_key(key: KeyEvent) -> Result<Command, InputError> {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c' | 'C') => Ok(Command::Quit),
            other => Err(InputError(other)),
        };
    }

    match key.code {
        KeyCode::Char(c) => match c.to_ascii_lowercase() {
            'q' => Ok(Command::Quit),
            'd' => Ok(Command::ToggleDown),
            'n' => Ok(Command::SortBy(SortKey::Name)),
            's' => Ok(Command::SortBy(SortKey::SourceAddress)),
            't' => Ok(Command::SortBy(SortKey::DestinationAddress)),
            'b' => Ok(Command::SortBy(SortKey::Bandwidth)),
            'r' => Ok(Command::ToggleReverse),
            'f' => Ok(Command::EditFilter),
            _ => Err(InputError(key.code)),
        },
        KeyCode::Up => Ok(Command::ScrollUp),
        KeyCode::Down => Ok(Command::ScrollDown),
        KeyCode::PageUp => Ok(Command::PageUp),
        KeyCode::PageDown => Ok(Command::PageDown),
        other => Err(InputError(other)),
    }
}
