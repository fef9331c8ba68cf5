use serde::{Deserialize, Serialize};

/// Default number of rows moved by PageUp/PageDown.
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Keyboard navigation direction for moving the focus cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
    /// Up by one page of rows
    PageUp,
    /// Down by one page of rows
    PageDown,
    /// First column of the current row
    Home,
    /// Last column of the current row
    End,
}

impl Direction {
    /// Map a DOM `KeyboardEvent.key` value to a direction.
    #[must_use]
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "ArrowLeft" => Some(Self::Left),
            "ArrowRight" => Some(Self::Right),
            "ArrowUp" => Some(Self::Up),
            "ArrowDown" => Some(Self::Down),
            "PageUp" => Some(Self::PageUp),
            "PageDown" => Some(Self::PageDown),
            "Home" => Some(Self::Home),
            "End" => Some(Self::End),
            _ => None,
        }
    }
}
