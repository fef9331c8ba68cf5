//! sheetpad - a small spreadsheet editor for the web
//!
//! Imports CSV, TSV, or the first sheet of an XLSX file into a plain text
//! grid and edits it in the browser via WebAssembly:
//! - Rectangular selection by drag, click, shift-click, and keyboard
//! - TSV copy / cut / paste compatible with Excel and Google Sheets
//! - Bounded undo / redo of batched cell changes
//! - Row translation through an HTTP endpoint
//!
//! The editing core ([`SheetEditor`]) is plain Rust and runs natively too;
//! the `sheetpad_cli` binary uses it to inspect files.
//!
//! # Usage (JavaScript)
//!
//! ```javascript
//! import init, { SheetPad } from 'sheetpad';
//! await init();
//! const pad = new SheetPad();
//! pad.load(file.name, bytes);
//! pad.on_key_down(event.key, event.ctrlKey || event.metaKey, event.shiftKey);
//! ```

pub mod cell_ref;
pub mod clipboard;
pub mod config;
pub mod editor;
pub mod error;
pub mod grid;
pub mod history;
pub mod import;
pub mod logging;
pub mod selection;
pub mod translate;
pub mod types;

#[cfg(target_arch = "wasm32")]
pub mod web;

use wasm_bindgen::prelude::*;

pub use config::EditorConfig;
pub use editor::{KeyCommand, KeyOutcome, SheetEditor};
pub use error::{Result, SheetpadError};
pub use grid::Grid;
pub use history::{Action, ActionLog, CellChange, CellStore};
pub use selection::SelectionEngine;
pub use types::*;

#[cfg(target_arch = "wasm32")]
pub use web::SheetPad;

/// Get the library version
#[must_use]
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
