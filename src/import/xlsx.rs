//! XLSX import: cell text of the first worksheet.
//!
//! Styles, formulas, merges, and every other sheet are ignored. Values come
//! back as the text Excel stored: shared and inline strings resolved,
//! booleans as `TRUE`/`FALSE`, numbers and error codes verbatim.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::collections::HashMap;
use std::io::{BufReader, Cursor, Read, Seek};
use zip::ZipArchive;

use crate::cell_ref::parse_cell_ref_bytes;
use crate::error::{Result, SheetpadError};
use crate::grid::check_capacity;
use crate::types::Coord;

const WORKBOOK_PATH: &str = "xl/workbook.xml";
const WORKBOOK_RELS_PATH: &str = "xl/_rels/workbook.xml.rels";
const DEFAULT_SHEET_PATH: &str = "xl/worksheets/sheet1.xml";
const DEFAULT_SST_PATH: &str = "xl/sharedStrings.xml";

/// Parts of `workbook.xml.rels` the importer needs.
#[derive(Debug, Default)]
struct Relationships {
    /// rId -> full archive path
    worksheets: HashMap<String, String>,
    shared_strings: Option<String>,
}

/// Read the first worksheet of an XLSX package into rows. Fails as soon as
/// a cell would stretch the rows past `max_cells`.
pub(crate) fn parse_first_sheet(data: &[u8], max_cells: u32) -> Result<Vec<Vec<String>>> {
    let mut archive = ZipArchive::new(Cursor::new(data))?;

    let rels = parse_relationships(&mut archive);
    let sheet_path = first_sheet_path(&mut archive, &rels.worksheets)?;
    let shared = parse_shared_strings(
        &mut archive,
        rels.shared_strings.as_deref().unwrap_or(DEFAULT_SST_PATH),
    );
    log::debug!(
        "reading {sheet_path} with {} shared string(s)",
        shared.len()
    );

    let file = archive
        .by_name(&sheet_path)
        .map_err(|e| SheetpadError::Import(format!("missing worksheet {sheet_path}: {e}")))?;
    parse_sheet_rows(BufReader::new(file), &shared, max_cells)
}

fn attr_string(e: &BytesStart<'_>, key: &[u8]) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|attr| attr.key.as_ref() == key)
        .map(|attr| String::from_utf8_lossy(&attr.value).into_owned())
}

/// Resolve a relationship target against `xl/`.
fn resolve_target(target: &str) -> String {
    match target.strip_prefix('/') {
        Some(absolute) => absolute.to_string(),
        None => format!("xl/{target}"),
    }
}

fn parse_relationships<R: Read + Seek>(archive: &mut ZipArchive<R>) -> Relationships {
    let mut rels = Relationships::default();
    let Ok(file) = archive.by_name(WORKBOOK_RELS_PATH) else {
        return rels;
    };

    let mut xml = Reader::from_reader(BufReader::new(file));
    xml.trim_text(true);
    let mut buf = Vec::new();

    loop {
        match xml.read_event_into(&mut buf) {
            Ok(Event::Empty(ref e) | Event::Start(ref e))
                if e.local_name().as_ref() == b"Relationship" =>
            {
                let id = attr_string(e, b"Id").unwrap_or_default();
                let target = attr_string(e, b"Target").unwrap_or_default();
                let rel_type = attr_string(e, b"Type").unwrap_or_default();
                if target.is_empty() {
                    log::debug!("relationship {id} has no target");
                } else if rel_type.ends_with("/worksheet") && !id.is_empty() {
                    rels.worksheets.insert(id, resolve_target(&target));
                } else if rel_type.ends_with("/sharedStrings") {
                    rels.shared_strings = Some(resolve_target(&target));
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                log::warn!("bad workbook relationships: {e}");
                break;
            }
            _ => {}
        }
        buf.clear();
    }
    rels
}

/// Path of the first `<sheet>` listed in `workbook.xml`.
fn first_sheet_path<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
    worksheets: &HashMap<String, String>,
) -> Result<String> {
    let file = archive
        .by_name(WORKBOOK_PATH)
        .map_err(|e| SheetpadError::Import(format!("not a workbook: {e}")))?;

    let mut xml = Reader::from_reader(BufReader::new(file));
    xml.trim_text(true);
    let mut buf = Vec::new();

    loop {
        match xml.read_event_into(&mut buf)? {
            Event::Empty(ref e) | Event::Start(ref e) if e.local_name().as_ref() == b"sheet" => {
                // r:id, whatever the prefix
                let r_id = e
                    .attributes()
                    .flatten()
                    .find(|attr| attr.key.local_name().as_ref() == b"id")
                    .map(|attr| String::from_utf8_lossy(&attr.value).into_owned());
                let path = r_id
                    .and_then(|id| worksheets.get(&id).cloned())
                    .unwrap_or_else(|| DEFAULT_SHEET_PATH.to_string());
                return Ok(path);
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }
    Err(SheetpadError::Import("workbook has no sheets".into()))
}

/// Shared string table. Rich-text runs are concatenated; phonetic runs
/// (`rPh`) are skipped.
fn parse_shared_strings<R: Read + Seek>(archive: &mut ZipArchive<R>, path: &str) -> Vec<String> {
    let Ok(file) = archive.by_name(path) else {
        return Vec::new();
    };

    let mut xml = Reader::from_reader(BufReader::new(file));
    xml.trim_text(false);

    let mut strings = Vec::new();
    let mut buf = Vec::new();
    let mut current = String::new();
    let mut in_si = false;
    let mut in_t = false;
    let mut in_rph = false;

    loop {
        match xml.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => match e.local_name().as_ref() {
                b"si" => {
                    in_si = true;
                    current.clear();
                }
                b"rPh" => in_rph = true,
                b"t" if in_si && !in_rph => in_t = true,
                _ => {}
            },
            Ok(Event::Empty(ref e)) if e.local_name().as_ref() == b"si" => {
                strings.push(String::new());
            }
            Ok(Event::Text(ref e)) if in_t => {
                if let Ok(text) = e.unescape() {
                    current.push_str(&text);
                }
            }
            Ok(Event::End(ref e)) => match e.local_name().as_ref() {
                b"si" => {
                    strings.push(std::mem::take(&mut current));
                    in_si = false;
                }
                b"rPh" => in_rph = false,
                b"t" => in_t = false,
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => {
                log::warn!("bad shared strings at index {}: {e}", strings.len());
                break;
            }
            _ => {}
        }
        buf.clear();
    }
    strings
}

/// Value type from a cell's `t` attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CellKind {
    Number,
    Shared,
    Inline,
    Bool,
    /// `str` formula results and `e` error codes: stored text as-is.
    Text,
}

impl CellKind {
    fn from_attr(t: Option<&str>) -> Self {
        match t {
            Some("s") => Self::Shared,
            Some("inlineStr") => Self::Inline,
            Some("b") => Self::Bool,
            Some("str" | "e") => Self::Text,
            _ => Self::Number,
        }
    }
}

#[derive(Debug)]
struct PendingCell {
    coord: Coord,
    kind: CellKind,
    raw: String,
}

impl PendingCell {
    fn resolve(self, shared: &[String]) -> String {
        match self.kind {
            CellKind::Shared => self
                .raw
                .trim()
                .parse::<usize>()
                .ok()
                .and_then(|idx| shared.get(idx).cloned())
                .unwrap_or_default(),
            CellKind::Bool => match self.raw.trim() {
                "1" => "TRUE".to_string(),
                "0" => "FALSE".to_string(),
                other => other.to_string(),
            },
            CellKind::Number | CellKind::Inline | CellKind::Text => self.raw,
        }
    }
}

/// Rows collected so far, with the widest row tracked for the size check.
struct SheetRows {
    rows: Vec<Vec<String>>,
    width: u32,
    max_cells: u32,
}

impl SheetRows {
    fn new(max_cells: u32) -> Self {
        Self {
            rows: Vec::new(),
            width: 0,
            max_cells,
        }
    }

    fn place(&mut self, coord: Coord, value: String) -> Result<()> {
        let height = u64::try_from(self.rows.len())
            .unwrap_or(u64::MAX)
            .max(u64::from(coord.row) + 1);
        let width = u64::from(self.width.max(coord.col.saturating_add(1)));
        check_capacity(height, width, self.max_cells)?;

        let (Ok(r), Ok(c)) = (usize::try_from(coord.row), usize::try_from(coord.col)) else {
            return Ok(());
        };
        if self.rows.len() <= r {
            self.rows.resize_with(r + 1, Vec::new);
        }
        if let Some(row) = self.rows.get_mut(r) {
            if row.len() <= c {
                row.resize(c + 1, String::new());
            }
            if let Some(slot) = row.get_mut(c) {
                *slot = value;
            }
        }
        self.width = self.width.max(coord.col.saturating_add(1));
        Ok(())
    }
}

/// Walk `<sheetData>` and collect cell text. Cells without an `r`
/// reference continue from the previous cell in the row.
fn parse_sheet_rows<R: std::io::BufRead>(
    reader: R,
    shared: &[String],
    max_cells: u32,
) -> Result<Vec<Vec<String>>> {
    let mut xml = Reader::from_reader(reader);
    xml.trim_text(false);

    let mut rows = SheetRows::new(max_cells);
    let mut buf = Vec::new();

    let mut next_row: u32 = 0;
    let mut current_row: u32 = 0;
    let mut next_col: u32 = 0;
    let mut cell: Option<PendingCell> = None;
    let mut in_value = false;
    let mut in_rph = false;

    loop {
        let event = xml.read_event_into(&mut buf)?;
        match event {
            Event::Start(ref e) | Event::Empty(ref e) => {
                let is_start = matches!(event, Event::Start(_));
                match e.local_name().as_ref() {
                    b"row" => {
                        current_row = attr_string(e, b"r")
                            .and_then(|r| r.trim().parse::<u32>().ok())
                            .and_then(|r| r.checked_sub(1))
                            .unwrap_or(next_row);
                        next_row = current_row.saturating_add(1);
                        next_col = 0;
                    }
                    b"c" => {
                        let coord = e
                            .attributes()
                            .flatten()
                            .find(|attr| attr.key.as_ref() == b"r")
                            .and_then(|attr| parse_cell_ref_bytes(&attr.value))
                            .unwrap_or(Coord::new(current_row, next_col));
                        next_col = coord.col.saturating_add(1);
                        if is_start {
                            let kind = CellKind::from_attr(attr_string(e, b"t").as_deref());
                            cell = Some(PendingCell {
                                coord,
                                kind,
                                raw: String::new(),
                            });
                        }
                    }
                    b"rPh" if is_start => in_rph = true,
                    b"v" if is_start && cell.is_some() => {
                        in_value = cell.as_ref().is_some_and(|c| c.kind != CellKind::Inline);
                    }
                    b"t" if is_start && !in_rph => {
                        in_value = cell.as_ref().is_some_and(|c| c.kind == CellKind::Inline);
                    }
                    _ => {}
                }
            }
            Event::Text(ref e) if in_value => {
                if let Some(pending) = cell.as_mut() {
                    pending.raw.push_str(&e.unescape()?);
                }
            }
            Event::End(ref e) => match e.local_name().as_ref() {
                b"v" | b"t" => in_value = false,
                b"rPh" => in_rph = false,
                b"c" => {
                    if let Some(pending) = cell.take() {
                        let coord = pending.coord;
                        let value = pending.resolve(shared);
                        if !value.is_empty() {
                            rows.place(coord, value)?;
                        }
                    }
                }
                b"sheetData" => break,
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(rows.rows)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    fn rows(xml: &str, shared: &[&str]) -> Vec<Vec<String>> {
        let shared: Vec<String> = shared.iter().map(ToString::to_string).collect();
        parse_sheet_rows(xml.as_bytes(), &shared, u32::MAX).unwrap()
    }

    #[test]
    fn test_cell_kinds() {
        let sheet = r#"<worksheet><sheetData>
            <row r="1">
                <c r="A1" t="s"><v>1</v></c>
                <c r="B1"><v>3.5</v></c>
                <c r="C1" t="b"><v>1</v></c>
                <c r="D1" t="inlineStr"><is><t xml:space="preserve"> hi &amp; bye</t></is></c>
                <c r="E1" t="e"><v>#DIV/0!</v></c>
                <c r="F1" t="str"><f>A1</f><v>x</v></c>
            </row>
        </sheetData></worksheet>"#;
        let r = rows(sheet, &["zero", "one"]);
        assert_eq!(r[0], vec!["one", "3.5", "TRUE", " hi & bye", "#DIV/0!", "x"]);
    }

    #[test]
    fn test_sparse_placement() {
        let sheet = r#"<worksheet><sheetData>
            <row r="2"><c r="C2"><v>7</v></c></row>
            <row r="4"><c><v>a</v></c><c><v>b</v></c></row>
        </sheetData></worksheet>"#;
        let r = rows(sheet, &[]);
        assert_eq!(r.len(), 4);
        assert!(r[0].is_empty());
        assert_eq!(r[1], vec!["", "", "7"]);
        assert_eq!(r[3], vec!["a", "b"]);
    }

    #[test]
    fn test_bad_shared_index_is_empty() {
        let sheet = r#"<worksheet><sheetData><row r="1">
            <c r="A1" t="s"><v>9</v></c><c r="B1" t="s"><v>0</v></c>
        </row></sheetData></worksheet>"#;
        assert_eq!(rows(sheet, &["only"])[0], vec!["", "only"]);
    }

    #[test]
    fn test_far_cell_is_rejected_before_allocating() {
        let sheet = r#"<worksheet><sheetData><row r="1048576">
            <c r="XFD1048576"><v>1</v></c>
        </row></sheetData></worksheet>"#;
        let err = parse_sheet_rows(sheet.as_bytes(), &[], 2_000_000).unwrap_err();
        assert!(matches!(
            err,
            SheetpadError::GridTooLarge {
                rows: 1_048_576,
                cols: 16_384,
                ..
            }
        ));
    }

    #[test]
    fn test_resolve_target() {
        assert_eq!(resolve_target("worksheets/sheet2.xml"), "xl/worksheets/sheet2.xml");
        assert_eq!(resolve_target("/xl/worksheets/s.xml"), "xl/worksheets/s.xml");
    }
}
