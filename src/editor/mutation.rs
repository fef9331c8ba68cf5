//! Grid mutations that produce undoable actions.
//!
//! Each helper writes into the grid immediately and returns the batch of
//! changes it made. Cells whose value would not change are left out, so an
//! operation that changes nothing yields an empty action.

use crate::grid::Grid;
use crate::history::{Action, CellChange};
use crate::types::{Coord, Region};

/// Apply `writes` in order, skipping coordinates outside the grid.
pub(crate) fn write_batch<I>(grid: &mut Grid, writes: I) -> Action
where
    I: IntoIterator<Item = (Coord, String)>,
{
    let mut changes = Vec::new();
    for (coord, new_value) in writes {
        let Ok(old) = grid.get(coord) else {
            continue;
        };
        if old == new_value {
            continue;
        }
        let old_value = old.to_string();
        if grid.set(coord, &new_value).is_ok() {
            changes.push(CellChange {
                coord,
                old_value,
                new_value,
            });
        }
    }
    Action::new(changes)
}

/// Empty every cell of `region`.
pub(crate) fn clear_region(grid: &mut Grid, region: Region) -> Action {
    write_batch(grid, region.cells().map(|coord| (coord, String::new())))
}

/// Write a block of rows with its top-left corner at `origin`.
///
/// Cells falling past the grid edge are dropped.
pub(crate) fn paste_block(grid: &mut Grid, origin: Coord, block: Vec<Vec<String>>) -> Action {
    let mut writes = Vec::new();
    for (dr, values) in (0u32..).zip(block) {
        let Some(row) = origin.row.checked_add(dr) else {
            break;
        };
        for (dc, value) in (0u32..).zip(values) {
            let Some(col) = origin.col.checked_add(dc) else {
                break;
            };
            writes.push((Coord::new(row, col), value));
        }
    }
    write_batch(grid, writes)
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
    use crate::types::{normalize, GridSize};

    #[test]
    fn test_write_batch_skips_noops_and_offgrid() {
        let mut grid = Grid::new(GridSize::new(2, 2));
        grid.set(Coord::new(0, 0), "same").unwrap();
        let action = write_batch(
            &mut grid,
            vec![
                (Coord::new(0, 0), "same".to_string()),
                (Coord::new(0, 1), "new".to_string()),
                (Coord::new(5, 5), "lost".to_string()),
            ],
        );
        assert_eq!(action.len(), 1);
        assert_eq!(action.changes()[0].old_value, "");
        assert_eq!(grid.get(Coord::new(0, 1)).unwrap(), "new");
    }

    #[test]
    fn test_clear_region_only_records_filled_cells() {
        let mut grid = Grid::new(GridSize::new(3, 3));
        grid.set(Coord::new(1, 1), "x").unwrap();
        let action = clear_region(&mut grid, normalize(Coord::new(0, 0), Coord::new(2, 2)));
        assert_eq!(action.len(), 1);
        assert_eq!(grid.filled_count(), 0);
    }

    #[test]
    fn test_paste_block_clips_at_edge() {
        let mut grid = Grid::new(GridSize::new(2, 2));
        let block = vec![
            vec!["a".to_string(), "b".to_string(), "c".to_string()],
            vec!["d".to_string()],
            vec!["e".to_string()],
        ];
        let action = paste_block(&mut grid, Coord::new(0, 1), block);
        assert_eq!(action.len(), 2);
        assert_eq!(grid.get(Coord::new(0, 1)).unwrap(), "a");
        assert_eq!(grid.get(Coord::new(1, 1)).unwrap(), "d");
    }
}
