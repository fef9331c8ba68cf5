//! File import.
//!
//! Turns an uploaded file into plain rows of text. The file kind is sniffed
//! from the bytes first (XLSX is a ZIP package) and the extension second.

mod delimited;
mod xlsx;

use serde::Serialize;

use crate::error::{Result, SheetpadError};
use crate::grid::{check_capacity, DEFAULT_MAX_CELLS};

use delimited::{parse_delimited, Delimiter};

/// ZIP local file header magic.
const ZIP_MAGIC: &[u8] = b"PK\x03\x04";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FileKind {
    Xlsx,
    Csv,
    Tsv,
}

impl FileKind {
    /// ZIP magic means XLSX; otherwise `.tsv`/`.tab` means TSV and anything
    /// else is read as CSV.
    #[must_use]
    pub fn detect(name: &str, data: &[u8]) -> Self {
        if data.starts_with(ZIP_MAGIC) {
            return Self::Xlsx;
        }
        let ext = name
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .unwrap_or_default();
        match ext.as_str() {
            "tsv" | "tab" => Self::Tsv,
            _ => Self::Csv,
        }
    }
}

/// Parse an uploaded file into rows. For XLSX only the first sheet is read.
///
/// # Errors
/// `Import` for empty input or a workbook without sheets; `Zip`/`Xml`/`Csv`
/// for a damaged file; `GridTooLarge` past [`DEFAULT_MAX_CELLS`].
pub fn load_rows(name: &str, data: &[u8]) -> Result<Vec<Vec<String>>> {
    load_rows_with_limit(name, data, DEFAULT_MAX_CELLS)
}

/// [`load_rows`] with an explicit cell limit. The limit applies to the
/// bounding box of the imported rows, blank cells included.
///
/// # Errors
/// As [`load_rows`], with `GridTooLarge` past `max_cells`.
pub fn load_rows_with_limit(name: &str, data: &[u8], max_cells: u32) -> Result<Vec<Vec<String>>> {
    if data.is_empty() {
        return Err(SheetpadError::Import(format!("{name} is empty")));
    }
    let kind = FileKind::detect(name, data);
    log::debug!("importing {name} ({} bytes) as {kind:?}", data.len());
    let rows = match kind {
        FileKind::Xlsx => xlsx::parse_first_sheet(data, max_cells)?,
        FileKind::Csv => parse_delimited(data, Delimiter::Comma)?,
        FileKind::Tsv => parse_delimited(data, Delimiter::Tab)?,
    };
    let height = u64::try_from(rows.len()).unwrap_or(u64::MAX);
    let width = rows.iter().map(Vec::len).max().unwrap_or(0);
    let width = u64::try_from(width).unwrap_or(u64::MAX);
    if let Err(e) = check_capacity(height, width, max_cells) {
        log::warn!("rejecting {name}: {e}");
        return Err(e);
    }
    log::debug!("imported {} row(s) from {name}", rows.len());
    Ok(rows)
}
