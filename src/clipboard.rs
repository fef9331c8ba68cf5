//! TSV clipboard contract.
//!
//! Copy produces rows joined by `\n` and cells joined by `\t`, with carriage
//! returns stripped from values and no quoting. Paste reads the same shape
//! back, which also covers text copied from other spreadsheet apps.

use crate::history::CellStore;
use crate::types::Region;

/// Serialize the cells of `region` as TSV.
///
/// Cells the store cannot read are written as empty strings.
pub fn region_to_tsv<S: CellStore + ?Sized>(store: &S, region: Region) -> String {
    let (_, r2, c1, c2) = region.bounds();
    let mut result = String::new();
    for coord in region.cells() {
        if coord.col > c1 {
            result.push('\t');
        }
        let value = store.get_cell(coord).unwrap_or("");
        result.extend(value.chars().filter(|&ch| ch != '\r'));
        if coord.col == c2 && coord.row < r2 {
            result.push('\n');
        }
    }
    result
}

/// Parse clipboard text into rows of cell values.
///
/// A single trailing newline (as written by most spreadsheet apps) does not
/// produce an extra empty row. Empty text yields no rows.
#[must_use]
pub fn parse_tsv(text: &str) -> Vec<Vec<String>> {
    if text.is_empty() {
        return Vec::new();
    }
    let text = text.replace('\r', "");
    let body = text.strip_suffix('\n').unwrap_or(&text);
    body.split('\n')
        .map(|line| line.split('\t').map(str::to_string).collect())
        .collect()
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::panic
)]
mod tests {
    use super::*;
    use crate::grid::Grid;
    use crate::types::{normalize, Coord, GridSize};

    fn grid() -> Grid {
        let rows = vec![
            vec!["a".to_string(), "b\r".to_string(), "c".to_string()],
            vec!["d".to_string(), String::new(), "f".to_string()],
        ];
        Grid::from_rows(rows, GridSize::new(3, 3), 9).unwrap()
    }

    #[test]
    fn test_copy_region() {
        let g = grid();
        let tsv = region_to_tsv(&g, normalize(Coord::new(0, 0), Coord::new(1, 2)));
        assert_eq!(tsv, "a\tb\tc\nd\t\tf");
    }

    #[test]
    fn test_copy_inner_region() {
        let g = grid();
        let tsv = region_to_tsv(&g, normalize(Coord::new(0, 1), Coord::new(1, 1)));
        assert_eq!(tsv, "b\n");
    }

    #[test]
    fn test_copy_out_of_bounds_cells_are_empty() {
        let g = grid();
        let tsv = region_to_tsv(&g, normalize(Coord::new(2, 2), Coord::new(3, 2)));
        assert_eq!(tsv, "\n");
    }

    #[test]
    fn test_parse_basic() {
        assert_eq!(
            parse_tsv("a\tb\r\nc\td\r\n"),
            vec![vec!["a", "b"], vec!["c", "d"]]
        );
    }

    #[test]
    fn test_parse_keeps_inner_blank_lines() {
        assert_eq!(parse_tsv("a\n\nb"), vec![vec!["a"], vec![""], vec!["b"]]);
    }

    #[test]
    fn test_parse_empty() {
        assert!(parse_tsv("").is_empty());
        assert_eq!(parse_tsv("\n"), vec![vec![""]]);
    }
}
