//! Keyboard shortcut mapping.
//!
//! Turns a DOM `KeyboardEvent` (`key`, ctrl, shift) into an editor command.
//! Clipboard access stays on the host side because browser clipboard reads
//! are asynchronous.

use crate::types::Direction;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCommand {
    Copy,
    Cut,
    Paste,
    Delete,
    SelectAll,
    Undo,
    Redo,
    Navigate { direction: Direction, extend: bool },
}

impl KeyCommand {
    /// Ctrl+C/X/V/A/Z/Y (any case), Delete/Backspace, and the navigation
    /// keys, with Shift extending the selection.
    #[must_use]
    pub fn from_key(key: &str, ctrl: bool, shift: bool) -> Option<Self> {
        if ctrl {
            let command = match key.to_ascii_lowercase().as_str() {
                "c" => Some(Self::Copy),
                "x" => Some(Self::Cut),
                "v" => Some(Self::Paste),
                "a" => Some(Self::SelectAll),
                "z" => Some(Self::Undo),
                "y" => Some(Self::Redo),
                _ => None,
            };
            if command.is_some() {
                return command;
            }
        }
        if key == "Delete" || key == "Backspace" {
            return Some(Self::Delete);
        }
        Direction::from_key(key).map(|direction| Self::Navigate {
            direction,
            extend: shift,
        })
    }
}

/// What the host should do after a key press.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyOutcome {
    /// Not a shortcut; let the browser handle it.
    Ignored,
    Handled,
    /// Handled; put this text on the system clipboard.
    ClipboardWrite(String),
    /// Read the system clipboard and pass it to `paste`.
    PasteRequested,
}

impl KeyOutcome {
    #[must_use]
    pub fn is_handled(&self) -> bool {
        !matches!(self, Self::Ignored)
    }
}
