//! Editor configuration.
//!
//! Every field has a default, so a partial JSON/JS object is enough:
//!
//! ```json
//! { "maxHistory": 500, "translateEndpoint": "/api/translate" }
//! ```

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::grid::{check_capacity, DEFAULT_MAX_CELLS, DEFAULT_MIN_COLS, DEFAULT_MIN_ROWS};
use crate::history::DEFAULT_MAX_HISTORY;
use crate::types::{GridSize, DEFAULT_PAGE_SIZE};

/// Where the translation pass posts `{text, source, target}`.
pub const DEFAULT_TRANSLATE_ENDPOINT: &str = "/.netlify/functions/translate";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EditorConfig {
    /// Undoable actions kept before the oldest is dropped
    pub max_history: usize,
    /// Rows moved by PageUp/PageDown
    pub page_size: u32,
    /// Loaded sheets are padded to at least this many rows
    pub min_rows: u32,
    /// Loaded sheets are padded to at least this many columns
    pub min_cols: u32,
    /// Largest grid, in cells, that import and resize accept
    pub max_cells: u32,
    pub translate_endpoint: String,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            max_history: DEFAULT_MAX_HISTORY,
            page_size: DEFAULT_PAGE_SIZE,
            min_rows: DEFAULT_MIN_ROWS,
            min_cols: DEFAULT_MIN_COLS,
            max_cells: DEFAULT_MAX_CELLS,
            translate_endpoint: DEFAULT_TRANSLATE_ENDPOINT.to_string(),
        }
    }
}

impl EditorConfig {
    /// # Errors
    /// Returns an error if `json` is not a valid config object or fails
    /// [`validate`](Self::validate).
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// # Errors
    /// Returns `GridTooLarge` if the minimum grid is over `max_cells`.
    pub fn validate(&self) -> Result<()> {
        let min = self.min_size();
        check_capacity(u64::from(min.rows()), u64::from(min.cols()), self.max_cells)
    }

    #[must_use]
    pub fn min_size(&self) -> GridSize {
        GridSize::new(self.min_rows, self.min_cols)
    }
}
