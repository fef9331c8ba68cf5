//! Row-major text grid backing the editor.

use serde::Serialize;

use crate::error::{Result, SheetpadError};
use crate::history::CellStore;
use crate::types::{Coord, GridSize};

/// Minimum rows a loaded sheet is padded to.
pub const DEFAULT_MIN_ROWS: u32 = 50;
/// Minimum columns a loaded sheet is padded to.
pub const DEFAULT_MIN_COLS: u32 = 15;
/// Largest grid, in cells, that import and resize accept.
pub const DEFAULT_MAX_CELLS: u32 = 2_000_000;

/// Reject a `rows` x `cols` extent holding more than `max_cells` cells.
///
/// # Errors
/// Returns `GridTooLarge` when the extent is over the limit.
pub fn check_capacity(rows: u64, cols: u64, max_cells: u32) -> Result<()> {
    if rows.saturating_mul(cols) > u64::from(max_cells) {
        return Err(SheetpadError::GridTooLarge {
            rows,
            cols,
            max: max_cells,
        });
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Grid {
    size: GridSize,
    cells: Vec<String>,
}

impl Default for Grid {
    fn default() -> Self {
        Self::new(GridSize::new(DEFAULT_MIN_ROWS, DEFAULT_MIN_COLS))
    }
}

impl Grid {
    /// An all-empty grid. Callers bound `size` with [`check_capacity`].
    #[must_use]
    pub fn new(size: GridSize) -> Self {
        let len = usize::try_from(size.cell_count()).unwrap_or(usize::MAX);
        Self {
            size,
            cells: vec![String::new(); len],
        }
    }

    /// Build a grid from imported rows, padded out to at least `min`.
    ///
    /// Ragged rows are filled with empty cells.
    ///
    /// # Errors
    /// Returns `GridTooLarge` if the padded grid holds more than `max_cells`.
    pub fn from_rows(rows: Vec<Vec<String>>, min: GridSize, max_cells: u32) -> Result<Self> {
        let height = u32::try_from(rows.len()).unwrap_or(u32::MAX);
        let width = rows.iter().map(Vec::len).max().unwrap_or(0);
        let width = u32::try_from(width).unwrap_or(u32::MAX);
        let size = GridSize::new(height.max(min.rows()), width.max(min.cols()));
        check_capacity(u64::from(size.rows()), u64::from(size.cols()), max_cells)?;

        let mut grid = Self::new(size);
        for (row, values) in (0u32..).zip(rows) {
            for (col, value) in (0u32..).zip(values) {
                if let Some(idx) = grid.index(Coord::new(row, col)) {
                    if let Some(slot) = grid.cells.get_mut(idx) {
                        *slot = value;
                    }
                }
            }
        }
        Ok(grid)
    }

    #[must_use]
    pub fn size(&self) -> GridSize {
        self.size
    }

    fn index(&self, coord: Coord) -> Option<usize> {
        if !self.size.contains(coord) {
            return None;
        }
        Some(coord.row as usize * self.size.cols() as usize + coord.col as usize)
    }

    /// # Errors
    /// Returns `InvalidCoordinate` if `coord` is outside the grid.
    pub fn get(&self, coord: Coord) -> Result<&str> {
        self.index(coord)
            .and_then(|idx| self.cells.get(idx))
            .map(String::as_str)
            .ok_or_else(|| self.out_of_bounds(coord))
    }

    /// # Errors
    /// Returns `InvalidCoordinate` if `coord` is outside the grid.
    pub fn set(&mut self, coord: Coord, value: &str) -> Result<()> {
        if let Some(slot) = self.index(coord).and_then(|idx| self.cells.get_mut(idx)) {
            value.clone_into(slot);
            return Ok(());
        }
        Err(self.out_of_bounds(coord))
    }

    fn out_of_bounds(&self, coord: Coord) -> SheetpadError {
        SheetpadError::out_of_bounds(coord.row, coord.col, self.size.rows(), self.size.cols())
    }

    /// Change dimensions, keeping the overlapping cells.
    pub fn resize(&mut self, size: GridSize) {
        let mut next = Self::new(size);
        for (row, values) in (0u32..).zip(self.rows()) {
            for (col, value) in (0u32..).zip(values) {
                if let Some(slot) = next.index(Coord::new(row, col)).and_then(|i| next.cells.get_mut(i))
                {
                    value.clone_into(slot);
                }
            }
        }
        *self = next;
    }

    /// Rows as slices, top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[String]> {
        self.cells.chunks(self.size.cols() as usize)
    }

    /// Owned copy of every row.
    #[must_use]
    pub fn to_rows(&self) -> Vec<Vec<String>> {
        self.rows().map(<[String]>::to_vec).collect()
    }

    /// Number of non-empty cells.
    #[must_use]
    pub fn filled_count(&self) -> usize {
        self.cells.iter().filter(|c| !c.is_empty()).count()
    }
}

impl CellStore for Grid {
    fn get_cell(&self, coord: Coord) -> Result<&str> {
        self.get(coord)
    }

    fn set_cell(&mut self, coord: Coord, value: &str) -> Result<()> {
        self.set(coord, value)
    }
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

    fn rows(data: &[&[&str]]) -> Vec<Vec<String>> {
        data.iter()
            .map(|r| r.iter().map(|s| (*s).to_string()).collect())
            .collect()
    }

    #[test]
    fn test_from_rows_pads_to_minimum() {
        let grid = Grid::from_rows(
            rows(&[&["a", "b"], &["c"]]),
            GridSize::new(DEFAULT_MIN_ROWS, DEFAULT_MIN_COLS),
            DEFAULT_MAX_CELLS,
        )
        .unwrap();
        assert_eq!(grid.size(), GridSize::new(50, 15));
        assert_eq!(grid.get(Coord::new(0, 1)).unwrap(), "b");
        assert_eq!(grid.get(Coord::new(1, 1)).unwrap(), "");
        assert_eq!(grid.filled_count(), 3);
    }

    #[test]
    fn test_from_rows_grows_past_minimum() {
        let wide: Vec<String> = (0..20).map(|i| i.to_string()).collect();
        let grid = Grid::from_rows(vec![wide], GridSize::new(5, 5), DEFAULT_MAX_CELLS).unwrap();
        assert_eq!(grid.size(), GridSize::new(5, 20));
        assert_eq!(grid.get(Coord::new(0, 19)).unwrap(), "19");
    }

    #[test]
    fn test_from_rows_rejects_padded_size_over_limit() {
        let err = Grid::from_rows(rows(&[&["a"]]), GridSize::new(50, 15), 700).unwrap_err();
        assert!(matches!(
            err,
            SheetpadError::GridTooLarge {
                rows: 50,
                cols: 15,
                max: 700
            }
        ));
    }

    #[test]
    fn test_out_of_range_access() {
        let mut grid = Grid::new(GridSize::new(2, 2));
        assert!(grid.get(Coord::new(2, 0)).is_err());
        assert!(grid.set(Coord::new(0, 2), "x").is_err());
    }

    #[test]
    fn test_resize_keeps_overlap() {
        let mut grid =
            Grid::from_rows(rows(&[&["a", "b"], &["c", "d"]]), GridSize::new(2, 2), 4).unwrap();
        grid.resize(GridSize::new(1, 3));
        assert_eq!(grid.to_rows(), rows(&[&["a", "b", ""]]));
    }
}
