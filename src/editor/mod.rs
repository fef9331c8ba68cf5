//! The spreadsheet editor.
//!
//! `SheetEditor` owns the grid, the selection engine, and the action log,
//! and implements every user-facing operation on top of them:
//! - Cell editing with blur-style commit
//! - Copy / cut / paste / delete over the active region
//! - Undo / redo
//! - Keyboard shortcut dispatch
//! - Applying translation results
//!
//! Every mutating operation records at most one action.

mod input;
pub(crate) mod mutation;

pub use input::{KeyCommand, KeyOutcome};

use crate::clipboard::{parse_tsv, region_to_tsv};
use crate::config::EditorConfig;
use crate::error::Result;
use crate::grid::{check_capacity, Grid};
use crate::history::{Action, ActionLog};
use crate::selection::SelectionEngine;
use crate::translate::{plan_jobs, LanguageSlots, TranslationJob};
use crate::types::{Coord, Direction, GridSize, Region};

#[derive(Debug, Clone)]
pub struct SheetEditor {
    config: EditorConfig,
    grid: Grid,
    selection: SelectionEngine,
    history: ActionLog,
    languages: LanguageSlots,
    /// Cell whose edit has begun but not been committed.
    editing_cell: Option<Coord>,
    /// Text produced by the last copy or cut.
    last_copy: Option<String>,
}

impl Default for SheetEditor {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}

impl SheetEditor {
    /// An editor over an empty grid of the configured minimum size.
    /// Check untrusted configs with [`EditorConfig::validate`] first.
    #[must_use]
    pub fn new(config: EditorConfig) -> Self {
        let grid = Grid::new(config.min_size());
        let selection = SelectionEngine::with_page_size(grid.size(), config.page_size);
        let history = ActionLog::new(config.max_history);
        Self {
            config,
            grid,
            selection,
            history,
            languages: LanguageSlots::default(),
            editing_cell: None,
            last_copy: None,
        }
    }

    /// Replace the grid with imported rows (padded to the configured
    /// minimum). Selection collapses to `(0, 0)` and history is cleared.
    ///
    /// # Errors
    /// Returns `GridTooLarge` if the padded grid is over the configured
    /// `max_cells`; the current grid is left untouched.
    pub fn load_rows(&mut self, rows: Vec<Vec<String>>) -> Result<()> {
        self.grid = Grid::from_rows(rows, self.config.min_size(), self.config.max_cells)?;
        self.selection.resize(self.grid.size());
        self.selection.reset();
        self.history.clear();
        self.editing_cell = None;
        self.last_copy = None;
        let size = self.grid.size();
        log::debug!("loaded {}x{} grid", size.rows(), size.cols());
        Ok(())
    }

    /// Change the grid dimensions, keeping overlapping content. History is
    /// kept; undoing a change to a dropped cell skips that cell.
    ///
    /// # Errors
    /// Returns `GridTooLarge` if `size` is over the configured `max_cells`.
    pub fn resize(&mut self, size: GridSize) -> Result<()> {
        check_capacity(
            u64::from(size.rows()),
            u64::from(size.cols()),
            self.config.max_cells,
        )?;
        self.grid.resize(size);
        self.selection.resize(self.grid.size());
        if self.editing_cell.is_some_and(|c| !size.contains(c)) {
            self.editing_cell = None;
        }
        Ok(())
    }

    #[must_use]
    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    #[must_use]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    #[must_use]
    pub fn selection(&self) -> &SelectionEngine {
        &self.selection
    }

    #[must_use]
    pub fn history(&self) -> &ActionLog {
        &self.history
    }

    #[must_use]
    pub fn languages(&self) -> &LanguageSlots {
        &self.languages
    }

    pub fn languages_mut(&mut self) -> &mut LanguageSlots {
        &mut self.languages
    }

    #[must_use]
    pub fn dimensions(&self) -> GridSize {
        self.grid.size()
    }

    /// # Errors
    /// Returns `InvalidCoordinate` if `coord` is outside the grid.
    pub fn cell_value(&self, coord: Coord) -> Result<&str> {
        self.grid.get(coord)
    }

    #[must_use]
    pub fn active_region(&self) -> Region {
        self.selection.active_region()
    }

    fn commit(&mut self, action: Action) -> usize {
        let changed = action.len();
        self.history.record(action);
        changed
    }

    // ---- Editing ----

    /// Start editing `coord`, returning its current value.
    ///
    /// # Errors
    /// Returns `InvalidCoordinate` if `coord` is outside the grid.
    pub fn begin_edit(&mut self, coord: Coord) -> Result<String> {
        let value = self.grid.get(coord)?.to_string();
        self.editing_cell = Some(coord);
        Ok(value)
    }

    #[must_use]
    pub fn editing_cell(&self) -> Option<Coord> {
        self.editing_cell
    }

    pub fn cancel_edit(&mut self) {
        self.editing_cell = None;
    }

    /// Commit `value` into `coord`. Returns whether anything changed.
    ///
    /// # Errors
    /// Returns `InvalidCoordinate` if `coord` is outside the grid.
    pub fn commit_edit(&mut self, coord: Coord, value: &str) -> Result<bool> {
        self.grid.size().check(coord)?;
        if self.editing_cell == Some(coord) {
            self.editing_cell = None;
        }
        let action = mutation::write_batch(&mut self.grid, [(coord, value.to_string())]);
        Ok(self.commit(action) > 0)
    }

    /// Commit `value` into the cell passed to [`begin_edit`](Self::begin_edit).
    /// Returns `Ok(false)` when no edit is in progress.
    ///
    /// # Errors
    /// Returns `InvalidCoordinate` if the editing cell fell outside the grid.
    pub fn commit_active_edit(&mut self, value: &str) -> Result<bool> {
        match self.editing_cell.take() {
            Some(coord) => self.commit_edit(coord, value),
            None => Ok(false),
        }
    }

    // ---- Selection ----

    /// # Errors
    /// Returns `InvalidCoordinate` if `coord` is outside the grid.
    pub fn begin_selection(&mut self, coord: Coord) -> Result<Region> {
        self.selection.begin_selection(coord)
    }

    /// # Errors
    /// Returns `InvalidCoordinate` if `coord` is outside the grid.
    pub fn extend_selection(&mut self, coord: Coord) -> Result<Option<Region>> {
        self.selection.extend_selection(coord)
    }

    pub fn end_selection(&mut self) {
        self.selection.end_selection();
    }

    /// # Errors
    /// Returns `InvalidCoordinate` if `coord` is outside the grid.
    pub fn click(&mut self, coord: Coord, extend: bool) -> Result<Region> {
        self.selection.click(coord, extend)
    }

    pub fn move_focus(&mut self, direction: Direction, extend: bool) -> Region {
        self.selection.move_focus(direction, extend)
    }

    pub fn select_all(&mut self) -> Region {
        self.selection.select_all()
    }

    // ---- Clipboard ----

    /// TSV of the active region. Also remembered as the last copy.
    pub fn copy(&mut self) -> String {
        let text = region_to_tsv(&self.grid, self.selection.active_region());
        self.last_copy = Some(text.clone());
        text
    }

    #[must_use]
    pub fn last_copy(&self) -> Option<&str> {
        self.last_copy.as_deref()
    }

    /// Copy, then clear the active region as one action.
    pub fn cut(&mut self) -> String {
        let text = self.copy();
        self.delete_selection();
        text
    }

    /// Paste TSV text with its top-left corner at the active region's
    /// top-left. Returns the number of cells that changed.
    pub fn paste(&mut self, text: &str) -> usize {
        let block = parse_tsv(text);
        if block.is_empty() {
            return 0;
        }
        let origin = self.selection.active_region().top_left();
        let action = mutation::paste_block(&mut self.grid, origin, block);
        self.commit(action)
    }

    /// Clear the active region. Returns the number of cells that changed.
    pub fn delete_selection(&mut self) -> usize {
        let region = self.selection.active_region();
        let action = mutation::clear_region(&mut self.grid, region);
        self.commit(action)
    }

    // ---- History ----

    pub fn undo(&mut self) -> bool {
        self.history.undo(&mut self.grid)
    }

    pub fn redo(&mut self) -> bool {
        self.history.redo(&mut self.grid)
    }

    /// Undo up to `steps` actions; returns how many were undone.
    pub fn undo_steps(&mut self, steps: usize) -> usize {
        self.history.undo_steps(steps, &mut self.grid)
    }

    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    // ---- Translation ----

    /// Cells the translation pass would fill right now.
    #[must_use]
    pub fn translation_jobs(&self) -> Vec<TranslationJob> {
        plan_jobs(&self.grid, self.grid.size(), &self.languages)
    }

    /// Write translated values as a single undoable action.
    /// Returns the number of cells updated.
    ///
    /// Targets are checked again here: a cell that was filled after the
    /// jobs were planned keeps its value.
    pub fn apply_translations<I>(&mut self, results: I) -> usize
    where
        I: IntoIterator<Item = (Coord, String)>,
    {
        let grid = &self.grid;
        let pending: Vec<_> = results
            .into_iter()
            .filter(|(coord, _)| grid.get(*coord).is_ok_and(|v| v.trim().is_empty()))
            .collect();
        let action = mutation::write_batch(&mut self.grid, pending);
        let updated = self.commit(action);
        log::debug!("translation updated {updated} cell(s)");
        updated
    }

    // ---- Keyboard ----

    /// Run the shortcut bound to a key press.
    pub fn handle_key(&mut self, key: &str, ctrl: bool, shift: bool) -> KeyOutcome {
        let Some(command) = KeyCommand::from_key(key, ctrl, shift) else {
            return KeyOutcome::Ignored;
        };
        match command {
            KeyCommand::Copy => KeyOutcome::ClipboardWrite(self.copy()),
            KeyCommand::Cut => KeyOutcome::ClipboardWrite(self.cut()),
            KeyCommand::Paste => KeyOutcome::PasteRequested,
            KeyCommand::Delete => {
                self.delete_selection();
                KeyOutcome::Handled
            }
            KeyCommand::SelectAll => {
                self.select_all();
                KeyOutcome::Handled
            }
            KeyCommand::Undo => {
                self.undo();
                KeyOutcome::Handled
            }
            KeyCommand::Redo => {
                self.redo();
                KeyOutcome::Handled
            }
            KeyCommand::Navigate { direction, extend } => {
                self.move_focus(direction, extend);
                KeyOutcome::Handled
            }
        }
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

    fn editor() -> SheetEditor {
        let mut e = SheetEditor::default();
        e.load_rows(vec![
            vec!["a".into(), "b".into()],
            vec!["c".into(), "d".into()],
        ])
        .unwrap();
        e
    }

    #[test]
    fn test_begin_and_commit_active_edit() {
        let mut e = editor();
        assert_eq!(e.begin_edit(Coord::new(0, 1)).unwrap(), "b");
        assert!(e.commit_active_edit("B").unwrap());
        assert_eq!(e.editing_cell(), None);
        assert!(!e.commit_active_edit("again").unwrap());
        assert_eq!(e.cell_value(Coord::new(0, 1)).unwrap(), "B");
    }

    #[test]
    fn test_commit_same_value_is_not_recorded() {
        let mut e = editor();
        assert!(!e.commit_edit(Coord::new(0, 0), "a").unwrap());
        assert!(!e.can_undo());
    }

    #[test]
    fn test_cut_is_one_action() {
        let mut e = editor();
        e.select_all();
        let text = e.cut();
        assert!(text.starts_with("a\tb\t"));
        assert_eq!(text.lines().count(), 50);
        assert_eq!(e.grid().filled_count(), 0);
        assert_eq!(e.history().history_len(), 1);
        assert!(e.undo());
        assert_eq!(e.grid().filled_count(), 4);
    }

    #[test]
    fn test_key_dispatch() {
        let mut e = editor();
        assert_eq!(e.handle_key("q", false, false), KeyOutcome::Ignored);
        assert_eq!(e.handle_key("ArrowRight", false, false), KeyOutcome::Handled);
        assert_eq!(e.handle_key("ArrowDown", false, true), KeyOutcome::Handled);
        assert_eq!(e.active_region().bounds(), (0, 1, 1, 1));
        assert_eq!(
            e.handle_key("C", true, false),
            KeyOutcome::ClipboardWrite("b\nd".into())
        );
        assert_eq!(e.handle_key("v", true, false), KeyOutcome::PasteRequested);
        assert_eq!(e.handle_key("Delete", false, false), KeyOutcome::Handled);
        assert_eq!(e.cell_value(Coord::new(1, 1)).unwrap(), "");
        assert_eq!(e.handle_key("z", true, false), KeyOutcome::Handled);
        assert_eq!(e.cell_value(Coord::new(1, 1)).unwrap(), "d");
    }

    #[test]
    fn test_load_resets_history_and_selection() {
        let mut e = editor();
        e.click(Coord::new(1, 1), false).unwrap();
        e.delete_selection();
        e.load_rows(vec![vec!["x".into()]]).unwrap();
        assert!(!e.can_undo());
        assert_eq!(e.active_region(), Region::single(Coord::new(0, 0)));
    }
}
