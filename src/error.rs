//! Structured error types for sheetpad.
//!
//! Empty undo/redo stacks and empty actions are not errors: those paths
//! report `false` to the caller instead.

/// All errors that can occur while importing, selecting, or editing.
#[derive(Debug, thiserror::Error)]
pub enum SheetpadError {
    /// A coordinate that is negative, fractional, non-finite, or outside the grid.
    #[error("Invalid coordinate: {0}")]
    InvalidCoordinate(String),

    /// The uploaded file could not be turned into rows.
    #[error("Import error: {0}")]
    Import(String),

    /// XML parsing error from quick-xml.
    #[error("XML parsing: {0}")]
    Xml(#[from] quick_xml::Error),

    /// Delimited text the CSV reader rejected.
    #[error("CSV: {0}")]
    Csv(#[from] csv::Error),

    /// A grid larger than the configured cell limit.
    #[error("Grid too large: {rows}x{cols} exceeds {max} cells")]
    GridTooLarge { rows: u64, cols: u64, max: u32 },

    /// ZIP archive error.
    #[error("ZIP archive: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// JSON (de)serialization error.
    #[error("JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Catch-all for string errors.
    #[error("{0}")]
    Other(String),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, SheetpadError>;

impl SheetpadError {
    pub(crate) fn out_of_bounds(row: u32, col: u32, rows: u32, cols: u32) -> Self {
        Self::InvalidCoordinate(format!("({row}, {col}) outside {rows}x{cols} grid"))
    }
}

impl From<String> for SheetpadError {
    fn from(s: String) -> Self {
        Self::Other(s)
    }
}

impl From<&str> for SheetpadError {
    fn from(s: &str) -> Self {
        Self::Other(s.to_string())
    }
}

#[cfg(target_arch = "wasm32")]
impl From<SheetpadError> for wasm_bindgen::JsValue {
    fn from(e: SheetpadError) -> Self {
        wasm_bindgen::JsValue::from_str(&e.to_string())
    }
}
