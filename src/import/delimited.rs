//! CSV/TSV import.

use csv::{ReaderBuilder, StringRecord};

use crate::error::Result;

/// Field separator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Delimiter {
    Comma,
    Tab,
}

impl Delimiter {
    fn as_byte(self) -> u8 {
        match self {
            Self::Comma => b',',
            Self::Tab => b'\t',
        }
    }
}

/// Parse delimited bytes into trimmed rows.
///
/// Invalid UTF-8 is replaced, a leading BOM is dropped, and blank lines stay
/// as empty rows so row numbers match the file. Quoted fields may span
/// several lines and still come back as one cell.
pub(crate) fn parse_delimited(data: &[u8], delim: Delimiter) -> Result<Vec<Vec<String>>> {
    let text = String::from_utf8_lossy(data);
    let text = text.strip_prefix('\u{feff}').unwrap_or(&text);
    let bytes = text.as_bytes();

    let mut reader = ReaderBuilder::new()
        .delimiter(delim.as_byte())
        .has_headers(false)
        .flexible(true)
        .from_reader(bytes);

    let mut rows = Vec::new();
    let mut record = StringRecord::new();
    let mut pos = 0usize;
    loop {
        // The csv reader skips empty lines, so count them from the raw text.
        let blank = blank_lines_at(bytes, pos);
        rows.extend(std::iter::repeat_with(Vec::new).take(blank));

        if !reader.read_record(&mut record)? {
            break;
        }
        rows.push(record.iter().map(|field| field.trim().to_string()).collect());
        pos = usize::try_from(reader.position().byte()).unwrap_or(usize::MAX);
    }
    Ok(rows)
}

/// Number of empty lines starting at byte `pos`.
fn blank_lines_at(bytes: &[u8], mut pos: usize) -> usize {
    // A record ended by `\r\n` can stop between the two bytes.
    if pos > 0 && bytes.get(pos - 1) == Some(&b'\r') && bytes.get(pos) == Some(&b'\n') {
        pos += 1;
    }
    let mut blank = 0;
    loop {
        match bytes.get(pos..) {
            Some([b'\n', ..]) => pos += 1,
            Some([b'\r', b'\n', ..]) => pos += 2,
            _ => return blank,
        }
        blank += 1;
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    fn csv(data: &[u8]) -> Vec<Vec<String>> {
        parse_delimited(data, Delimiter::Comma).unwrap()
    }

    #[test]
    fn test_parse_csv_basic() {
        let rows = csv(b"Name,Age\n Alice , 30\n\nBob,25");
        assert_eq!(rows.len(), 4);
        assert_eq!(rows[1], vec!["Alice", "30"]);
        assert!(rows[2].is_empty());
        assert_eq!(rows[3][0], "Bob");
    }

    #[test]
    fn test_quoted_fields() {
        let rows = csv(b"\"Hello, World\",42\n\"She said \"\"hi\"\"\",0");
        assert_eq!(rows[0][0], "Hello, World");
        assert_eq!(rows[1][0], "She said \"hi\"");
    }

    #[test]
    fn test_quoted_newline_stays_in_one_cell() {
        let rows = csv(b"Name: x,\"line1\nline2\"\n\nnext,row");
        assert_eq!(
            rows,
            vec![
                vec!["Name: x".to_string(), "line1\nline2".to_string()],
                Vec::new(),
                vec!["next".to_string(), "row".to_string()],
            ]
        );
    }

    #[test]
    fn test_leading_and_trailing_blank_lines() {
        let rows = csv(b"\n\na\r\n\r\n");
        assert_eq!(rows.len(), 4);
        assert!(rows[0].is_empty() && rows[1].is_empty());
        assert_eq!(rows[2], vec!["a"]);
        assert!(rows[3].is_empty());
    }

    #[test]
    fn test_tsv_and_bom() {
        let rows = parse_delimited("\u{feff}A\tB,C\r\n1\t2".as_bytes(), Delimiter::Tab).unwrap();
        assert_eq!(rows, vec![vec!["A", "B,C"], vec!["1", "2"]]);
    }

    #[test]
    fn test_empty_input() {
        assert!(csv(b"").is_empty());
    }
}
