use serde::{Deserialize, Serialize};

use crate::error::{Result, SheetpadError};

/// A 0-indexed `(row, col)` cell position.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub struct Coord {
    pub row: u32,
    pub col: u32,
}

impl Coord {
    #[must_use]
    pub const fn new(row: u32, col: u32) -> Self {
        Self { row, col }
    }

    /// Convert a pair of JavaScript numbers into a coordinate.
    ///
    /// # Errors
    /// Returns [`SheetpadError::InvalidCoordinate`] if either component is
    /// negative, fractional, NaN/infinite, or larger than `u32::MAX`.
    pub fn from_f64(row: f64, col: f64) -> Result<Self> {
        match (index_from_f64(row), index_from_f64(col)) {
            (Some(row), Some(col)) => Ok(Self { row, col }),
            _ => Err(SheetpadError::InvalidCoordinate(format!("({row}, {col})"))),
        }
    }
}

impl From<(u32, u32)> for Coord {
    fn from((row, col): (u32, u32)) -> Self {
        Self { row, col }
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn index_from_f64(v: f64) -> Option<u32> {
    if !v.is_finite() || v < 0.0 || v.fract() != 0.0 || v > f64::from(u32::MAX) {
        return None;
    }
    Some(v as u32)
}

/// Grid dimensions. Both counts are at least 1, including when
/// deserialized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "RawGridSize")]
pub struct GridSize {
    rows: u32,
    cols: u32,
}

#[derive(Deserialize)]
struct RawGridSize {
    rows: u32,
    cols: u32,
}

impl From<RawGridSize> for GridSize {
    fn from(raw: RawGridSize) -> Self {
        Self::new(raw.rows, raw.cols)
    }
}

impl GridSize {
    /// A zero dimension is raised to 1 so clamping always has a target cell.
    #[must_use]
    pub fn new(rows: u32, cols: u32) -> Self {
        Self {
            rows: rows.max(1),
            cols: cols.max(1),
        }
    }

    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    #[must_use]
    pub const fn cols(&self) -> u32 {
        self.cols
    }

    /// Bottom-right cell.
    #[must_use]
    pub fn last(&self) -> Coord {
        Coord::new(self.rows - 1, self.cols - 1)
    }

    #[must_use]
    pub fn contains(&self, coord: Coord) -> bool {
        coord.row < self.rows && coord.col < self.cols
    }

    /// Pull a coordinate back inside the grid.
    #[must_use]
    pub fn clamp(&self, coord: Coord) -> Coord {
        let last = self.last();
        Coord::new(coord.row.min(last.row), coord.col.min(last.col))
    }

    /// # Errors
    /// Returns [`SheetpadError::InvalidCoordinate`] if `coord` is outside the grid.
    pub fn check(&self, coord: Coord) -> Result<Coord> {
        if self.contains(coord) {
            Ok(coord)
        } else {
            Err(SheetpadError::out_of_bounds(
                coord.row, coord.col, self.rows, self.cols,
            ))
        }
    }

    #[must_use]
    pub fn cell_count(&self) -> u64 {
        u64::from(self.rows) * u64::from(self.cols)
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]
mod tests {
    use super::*;

    #[test]
    fn test_from_f64_accepts_integers() {
        assert_eq!(Coord::from_f64(3.0, 7.0).unwrap(), Coord::new(3, 7));
    }

    #[test]
    fn test_from_f64_rejects_bad_numbers() {
        for (r, c) in [
            (1.5, 0.0),
            (-1.0, 0.0),
            (0.0, f64::NAN),
            (f64::INFINITY, 0.0),
            (5e12, 0.0),
        ] {
            assert!(
                matches!(
                    Coord::from_f64(r, c),
                    Err(SheetpadError::InvalidCoordinate(_))
                ),
                "({r}, {c}) should be rejected"
            );
        }
    }

    #[test]
    fn test_zero_size_is_raised() {
        let size = GridSize::new(0, 0);
        assert_eq!(size.last(), Coord::new(0, 0));
        assert!(size.contains(Coord::new(0, 0)));
    }

    #[test]
    fn test_deserialized_zero_size_is_raised() {
        let size: GridSize = serde_json::from_str(r#"{"rows":0,"cols":0}"#).unwrap();
        assert_eq!((size.rows(), size.cols()), (1, 1));
        assert_eq!(size.last(), Coord::new(0, 0));
        assert_eq!(size.clamp(Coord::new(5, 5)), Coord::new(0, 0));

        let json = serde_json::to_string(&GridSize::new(3, 0)).unwrap();
        assert_eq!(json, r#"{"rows":3,"cols":1}"#);
    }

    #[test]
    fn test_clamp_and_check() {
        let size = GridSize::new(50, 15);
        assert_eq!(size.clamp(Coord::new(99, 99)), Coord::new(49, 14));
        assert!(size.check(Coord::new(49, 14)).is_ok());
        assert!(size.check(Coord::new(50, 0)).is_err());
    }
}
