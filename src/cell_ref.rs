//! A1-style cell references.
//!
//! Used for `r` attributes in worksheet XML and for the CLI's `--range`.

use crate::types::{normalize, Coord, Region};

/// Parse a reference like `"B3"` or `"$B$3"` into a 0-based coordinate.
///
/// Letters must come before digits; the row number must be at least 1.
pub fn parse_cell_ref(cell_ref: &str) -> Option<Coord> {
    parse_cell_ref_bytes(cell_ref.trim().as_bytes())
}

/// Bytes version of [`parse_cell_ref`] for raw quick-xml attribute values.
pub fn parse_cell_ref_bytes(ref_bytes: &[u8]) -> Option<Coord> {
    let mut col: u32 = 0;
    let mut row: u32 = 0;
    let mut saw_col = false;
    let mut saw_row = false;

    for &b in ref_bytes {
        match b {
            b'$' => {}
            b'A'..=b'Z' | b'a'..=b'z' if !saw_row => {
                let letter = u32::from(b.to_ascii_uppercase() - b'A') + 1;
                col = col.checked_mul(26)?.checked_add(letter)?;
                saw_col = true;
            }
            b'0'..=b'9' => {
                row = row.checked_mul(10)?.checked_add(u32::from(b - b'0'))?;
                saw_row = true;
            }
            _ => return None,
        }
    }

    if !saw_col || !saw_row || row == 0 {
        return None;
    }
    Some(Coord::new(row - 1, col - 1))
}

/// Parse `"A1:C3"` (either corner order) or a single `"B2"` into a region.
pub fn parse_cell_range(range: &str) -> Option<Region> {
    match range.split_once(':') {
        Some((start, end)) => Some(normalize(parse_cell_ref(start)?, parse_cell_ref(end)?)),
        None => parse_cell_ref(range).map(Region::single),
    }
}

/// Column letters for a 0-based column: 0 → "A", 26 → "AA".
pub fn col_to_letter(col: u32) -> String {
    let mut letters = Vec::new();
    let mut n = u64::from(col) + 1;
    while n > 0 {
        let rem = u8::try_from((n - 1) % 26).unwrap_or(0);
        letters.push(char::from(b'A' + rem));
        n = (n - 1) / 26;
    }
    letters.iter().rev().collect()
}

/// `Coord::new(2, 1)` → `"B3"`.
pub fn coord_to_ref(coord: Coord) -> String {
    format!("{}{}", col_to_letter(coord.col), u64::from(coord.row) + 1)
}

/// `"A1:C3"` for a range, `"B2"` for a single cell.
pub fn region_to_ref(region: Region) -> String {
    let (r1, r2, c1, c2) = region.bounds();
    let start = coord_to_ref(Coord::new(r1, c1));
    if region.is_single_cell() {
        start
    } else {
        format!("{start}:{}", coord_to_ref(Coord::new(r2, c2)))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_cell_ref() {
        assert_eq!(parse_cell_ref("A1"), Some(Coord::new(0, 0)));
        assert_eq!(parse_cell_ref("$b$3"), Some(Coord::new(2, 1)));
        assert_eq!(parse_cell_ref("AA10"), Some(Coord::new(9, 26)));
        assert_eq!(parse_cell_ref("A0"), None);
        assert_eq!(parse_cell_ref("1A"), None);
        assert_eq!(parse_cell_ref("A"), None);
        assert_eq!(parse_cell_ref("A1B"), None);
    }

    #[test]
    fn test_parse_cell_range() {
        let r = parse_cell_range("C3:A1").unwrap();
        assert_eq!(r.bounds(), (0, 2, 0, 2));
        assert!(parse_cell_range("B2").unwrap().is_single_cell());
        assert_eq!(parse_cell_range("A1:"), None);
    }

    #[test]
    fn test_col_to_letter() {
        assert_eq!(col_to_letter(0), "A");
        assert_eq!(col_to_letter(25), "Z");
        assert_eq!(col_to_letter(26), "AA");
        assert_eq!(col_to_letter(701), "ZZ");
        assert_eq!(col_to_letter(702), "AAA");
        assert_eq!(coord_to_ref(Coord::new(2, 1)), "B3");
    }

    #[test]
    fn test_region_to_ref() {
        let region = normalize(Coord::new(9, 27), Coord::new(0, 0));
        assert_eq!(region_to_ref(region), "A1:AB10");
        assert_eq!(parse_cell_range(&region_to_ref(region)), Some(region));
        assert_eq!(region_to_ref(Region::single(Coord::new(1, 1))), "B2");
    }
}
