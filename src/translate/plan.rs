//! Which cells the translation pass fills, and with what.
//!
//! Layout convention: a row whose first cell starts with `Name:` holds the
//! source text in column B. Translations go three rows below, one column
//! per target language (C..I), and only into cells that are still empty.

use serde::{Deserialize, Serialize};

use super::TranslateRequest;
use crate::history::CellStore;
use crate::types::{Coord, GridSize};

/// Number of language selectors (language1..language8).
pub const LANGUAGE_SLOTS: usize = 8;
/// Marker at the start of column A on rows that carry source text.
pub const NAME_PREFIX: &str = "Name:";
/// Distance from a name row to the row its translations go into.
pub const TARGET_ROW_OFFSET: u32 = 3;

const SOURCE_COL: u32 = 1;
const FIRST_TARGET_COL: u32 = 2;
const LAST_TARGET_COL: u32 = 8;

const AUTO: &str = "auto";
const DEFAULT_TARGET: &str = "en";

/// The eight language selectors. Slot 0 is the source language, slots
/// 1..=7 are the targets for columns C..I.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguageSlots {
    slots: [Option<String>; LANGUAGE_SLOTS],
}

impl LanguageSlots {
    /// Set slot `index` (0-based). An empty code clears the slot.
    /// Returns `false` if `index` is out of range.
    pub fn set(&mut self, index: usize, code: Option<&str>) -> bool {
        let Some(slot) = self.slots.get_mut(index) else {
            return false;
        };
        *slot = code
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(str::to_string);
        true
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&str> {
        self.slots.get(index).and_then(Option::as_deref)
    }

    /// Source language, `auto` when unset.
    #[must_use]
    pub fn source(&self) -> &str {
        self.get(0).unwrap_or(AUTO)
    }

    /// Target language for a column in C..I, `en` when unset.
    #[must_use]
    pub fn target_for_col(&self, col: u32) -> Option<&str> {
        if !(FIRST_TARGET_COL..=LAST_TARGET_COL).contains(&col) {
            return None;
        }
        let index = usize::try_from(col - 1).ok()?;
        Some(self.get(index).unwrap_or(DEFAULT_TARGET))
    }
}

/// One cell to translate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TranslationJob {
    /// Cell that receives the translation
    pub coord: Coord,
    pub text: String,
    pub source: String,
    pub target: String,
}

impl TranslationJob {
    #[must_use]
    pub fn request(&self) -> TranslateRequest {
        TranslateRequest {
            text: self.text.clone(),
            source: self.source.clone(),
            target: self.target.clone(),
        }
    }
}

/// Rows whose first cell starts with [`NAME_PREFIX`].
pub fn find_name_rows<S: CellStore + ?Sized>(store: &S, size: GridSize) -> Vec<u32> {
    (0..size.rows())
        .filter(|&row| {
            store
                .get_cell(Coord::new(row, 0))
                .is_ok_and(|v| v.trim().starts_with(NAME_PREFIX))
        })
        .collect()
}

/// List every empty target cell the translation pass should fill.
pub fn plan_jobs<S: CellStore + ?Sized>(
    store: &S,
    size: GridSize,
    languages: &LanguageSlots,
) -> Vec<TranslationJob> {
    let source = languages.source();
    let mut jobs = Vec::new();

    for row in find_name_rows(store, size) {
        let text = store
            .get_cell(Coord::new(row, SOURCE_COL))
            .map(str::trim)
            .unwrap_or("");
        if text.is_empty() {
            log::trace!("row {row}: no source text");
            continue;
        }
        let Some(target_row) = row.checked_add(TARGET_ROW_OFFSET) else {
            continue;
        };

        for col in FIRST_TARGET_COL..=LAST_TARGET_COL {
            let Some(target) = languages.target_for_col(col) else {
                continue;
            };
            if target == AUTO || target == source {
                continue;
            }
            let coord = Coord::new(target_row, col);
            let Ok(existing) = store.get_cell(coord) else {
                continue;
            };
            if !existing.trim().is_empty() {
                continue;
            }
            jobs.push(TranslationJob {
                coord,
                text: text.to_string(),
                source: source.to_string(),
                target: target.to_string(),
            });
        }
    }

    jobs
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

    fn grid_with_name_row() -> Grid {
        let mut grid = Grid::new(GridSize::new(10, 10));
        grid.set(Coord::new(1, 0), "Name: product").unwrap();
        grid.set(Coord::new(1, 1), "  Kalem  ").unwrap();
        grid
    }

    #[test]
    fn test_slots_defaults() {
        let slots = LanguageSlots::default();
        assert_eq!(slots.source(), "auto");
        assert_eq!(slots.target_for_col(2), Some("en"));
        assert_eq!(slots.target_for_col(1), None);
        assert_eq!(slots.target_for_col(9), None);
    }

    #[test]
    fn test_slot_set_trims_and_clears() {
        let mut slots = LanguageSlots::default();
        assert!(slots.set(0, Some(" tr ")));
        assert_eq!(slots.source(), "tr");
        assert!(slots.set(0, Some("")));
        assert_eq!(slots.source(), "auto");
        assert!(!slots.set(8, Some("de")));
    }

    #[test]
    fn test_plan_targets_three_rows_below() {
        let grid = grid_with_name_row();
        let mut slots = LanguageSlots::default();
        slots.set(0, Some("tr"));
        let jobs = plan_jobs(&grid, grid.size(), &slots);
        assert_eq!(jobs.len(), 7);
        assert!(jobs.iter().all(|j| j.coord.row == 4));
        assert_eq!(jobs[0].coord, Coord::new(4, 2));
        assert_eq!(jobs[0].text, "Kalem");
        assert_eq!(jobs[0].source, "tr");
        assert_eq!(jobs[0].target, "en");
    }

    #[test]
    fn test_plan_skips_same_language_auto_and_filled() {
        let mut grid = grid_with_name_row();
        grid.set(Coord::new(4, 3), "already").unwrap();
        let mut slots = LanguageSlots::default();
        slots.set(0, Some("de"));
        slots.set(1, Some("de"));
        slots.set(3, Some("auto"));
        let jobs = plan_jobs(&grid, grid.size(), &slots);
        let cols: Vec<u32> = jobs.iter().map(|j| j.coord.col).collect();
        assert_eq!(cols, vec![5, 6, 7, 8]);
    }

    #[test]
    fn test_plan_skips_empty_source_and_offgrid_target() {
        let mut grid = Grid::new(GridSize::new(5, 10));
        grid.set(Coord::new(0, 0), "Name:").unwrap();
        grid.set(Coord::new(3, 0), "Name:").unwrap();
        grid.set(Coord::new(3, 1), "text").unwrap();
        let jobs = plan_jobs(&grid, grid.size(), &LanguageSlots::default());
        assert!(jobs.is_empty());
    }

    #[test]
    fn test_find_name_rows_trims() {
        let mut grid = Grid::new(GridSize::new(5, 3));
        grid.set(Coord::new(2, 0), "  Name: x").unwrap();
        grid.set(Coord::new(3, 0), "name:").unwrap();
        assert_eq!(find_name_rows(&grid, grid.size()), vec![2]);
    }
}
