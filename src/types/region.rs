use serde::Serialize;

use super::{Coord, GridSize};

/// A normalized rectangle of cells, inclusive on both ends.
///
/// Only [`normalize`] builds one, so `r1 <= r2` and `c1 <= c2` always hold
/// and a region is never empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Region {
    r1: u32,
    r2: u32,
    c1: u32,
    c2: u32,
}

/// Build the region spanned by two arbitrary corners.
#[must_use]
pub fn normalize(a: Coord, b: Coord) -> Region {
    Region {
        r1: a.row.min(b.row),
        r2: a.row.max(b.row),
        c1: a.col.min(b.col),
        c2: a.col.max(b.col),
    }
}

impl Region {
    /// The one-cell region at `coord`.
    #[must_use]
    pub fn single(coord: Coord) -> Self {
        normalize(coord, coord)
    }

    /// `(r1, r2, c1, c2)`
    #[must_use]
    pub fn bounds(&self) -> (u32, u32, u32, u32) {
        (self.r1, self.r2, self.c1, self.c2)
    }

    #[must_use]
    pub fn top_left(&self) -> Coord {
        Coord::new(self.r1, self.c1)
    }

    #[must_use]
    pub fn bottom_right(&self) -> Coord {
        Coord::new(self.r2, self.c2)
    }

    #[must_use]
    pub fn rows(&self) -> u32 {
        self.r2 - self.r1 + 1
    }

    #[must_use]
    pub fn cols(&self) -> u32 {
        self.c2 - self.c1 + 1
    }

    #[must_use]
    pub fn cell_count(&self) -> u64 {
        u64::from(self.rows()) * u64::from(self.cols())
    }

    #[must_use]
    pub fn is_single_cell(&self) -> bool {
        self.r1 == self.r2 && self.c1 == self.c2
    }

    #[must_use]
    pub fn contains(&self, coord: Coord) -> bool {
        (self.r1..=self.r2).contains(&coord.row) && (self.c1..=self.c2).contains(&coord.col)
    }

    /// Whether every cell of the region lies inside a grid of `size`.
    #[must_use]
    pub fn fits(&self, size: GridSize) -> bool {
        size.contains(self.bottom_right())
    }

    /// Cells in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = Coord> {
        let (c1, c2) = (self.c1, self.c2);
        (self.r1..=self.r2).flat_map(move |row| (c1..=c2).map(move |col| Coord::new(row, col)))
    }

    /// `[r1, c1, r2, c2]`, the shape the JS side expects.
    #[must_use]
    pub fn to_vec(&self) -> Vec<u32> {
        vec![self.r1, self.c1, self.r2, self.c2]
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

    #[test]
    fn test_normalize_swaps_corners() {
        let r = normalize(Coord::new(5, 1), Coord::new(2, 4));
        assert_eq!(r.bounds(), (2, 5, 1, 4));
        assert_eq!(r.rows(), 4);
        assert_eq!(r.cols(), 4);
        assert_eq!(r.cell_count(), 16);
    }

    #[test]
    fn test_single_cell() {
        let r = Region::single(Coord::new(3, 3));
        assert!(r.is_single_cell());
        assert_eq!(r.cells().collect::<Vec<_>>(), vec![Coord::new(3, 3)]);
    }

    #[test]
    fn test_cells_row_major() {
        let r = normalize(Coord::new(0, 0), Coord::new(1, 1));
        let cells: Vec<_> = r.cells().collect();
        assert_eq!(
            cells,
            vec![
                Coord::new(0, 0),
                Coord::new(0, 1),
                Coord::new(1, 0),
                Coord::new(1, 1)
            ]
        );
    }

    #[test]
    fn test_fits() {
        let r = normalize(Coord::new(0, 0), Coord::new(49, 14));
        assert!(r.fits(GridSize::new(50, 15)));
        assert!(!r.fits(GridSize::new(49, 15)));
    }
}
