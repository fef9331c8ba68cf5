//! Undo/redo action log.
//!
//! A two-stack model: `record` pushes onto history and clears the redo
//! stack, `undo` moves one action history -> redo, `redo` moves it back.
//! Actions are never mutated once recorded.

use std::collections::VecDeque;

use crate::error::Result;
use crate::types::Coord;

/// Default cap on the number of undoable actions.
pub const DEFAULT_MAX_HISTORY: usize = 200;

/// Cell storage the log reads from and writes through.
pub trait CellStore {
    /// Current text at `coord`.
    ///
    /// # Errors
    /// Returns `InvalidCoordinate` when `coord` is outside the store.
    fn get_cell(&self, coord: Coord) -> Result<&str>;

    /// Overwrite the text at `coord`.
    ///
    /// # Errors
    /// Returns `InvalidCoordinate` when `coord` is outside the store.
    fn set_cell(&mut self, coord: Coord, value: &str) -> Result<()>;
}

/// One cell's value before and after a mutation.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct CellChange {
    pub coord: Coord,
    pub old_value: String,
    pub new_value: String,
}

impl CellChange {
    pub fn new(coord: Coord, old_value: impl Into<String>, new_value: impl Into<String>) -> Self {
        Self {
            coord,
            old_value: old_value.into(),
            new_value: new_value.into(),
        }
    }

    #[must_use]
    pub fn is_noop(&self) -> bool {
        self.old_value == self.new_value
    }
}

/// A batch of changes undone and redone as one unit.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Action {
    changes: Vec<CellChange>,
}

impl Action {
    /// Build an action, dropping changes whose old and new values match.
    pub fn new(changes: impl IntoIterator<Item = CellChange>) -> Self {
        Self {
            changes: changes.into_iter().filter(|c| !c.is_noop()).collect(),
        }
    }

    pub fn single(coord: Coord, old_value: impl Into<String>, new_value: impl Into<String>) -> Self {
        Self::new([CellChange::new(coord, old_value, new_value)])
    }

    #[must_use]
    pub fn changes(&self) -> &[CellChange] {
        &self.changes
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.changes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }
}

/// Write every change of `action` into `store`, old values when `reverse`.
///
/// Changes are applied in recorded order in both directions, so for a
/// coordinate listed twice the last-recorded value wins. A write the store
/// rejects is skipped; the rest of the batch still applies. Never records.
pub fn apply_action<S: CellStore + ?Sized>(action: &Action, reverse: bool, store: &mut S) {
    for change in &action.changes {
        let value = if reverse {
            &change.old_value
        } else {
            &change.new_value
        };
        if let Err(e) = store.set_cell(change.coord, value) {
            log::warn!("skipping replay of {:?}: {e}", change.coord);
        }
    }
}

/// Bounded undo history plus redo stack.
#[derive(Debug, Clone)]
pub struct ActionLog {
    history: VecDeque<Action>,
    redo_stack: Vec<Action>,
    max_history: usize,
}

impl Default for ActionLog {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_HISTORY)
    }
}

impl ActionLog {
    /// A cap of 0 is raised to 1.
    #[must_use]
    pub fn new(max_history: usize) -> Self {
        Self {
            history: VecDeque::new(),
            redo_stack: Vec::new(),
            max_history: max_history.max(1),
        }
    }

    /// Push an action. Empty actions are not recorded and return `false`.
    ///
    /// Any successful record invalidates the redo stack.
    pub fn record(&mut self, action: Action) -> bool {
        if action.is_empty() {
            return false;
        }
        log::debug!("record action with {} change(s)", action.len());
        self.history.push_back(action);
        if self.history.len() > self.max_history {
            self.history.pop_front();
        }
        self.redo_stack.clear();
        true
    }

    /// Revert the most recent action. Returns `false` if there is nothing to undo.
    pub fn undo<S: CellStore + ?Sized>(&mut self, store: &mut S) -> bool {
        let Some(action) = self.history.pop_back() else {
            return false;
        };
        apply_action(&action, true, store);
        log::debug!("undo {} change(s)", action.len());
        self.redo_stack.push(action);
        true
    }

    /// Re-apply the most recently undone action. Returns `false` if there is nothing to redo.
    pub fn redo<S: CellStore + ?Sized>(&mut self, store: &mut S) -> bool {
        let Some(action) = self.redo_stack.pop() else {
            return false;
        };
        apply_action(&action, false, store);
        log::debug!("redo {} change(s)", action.len());
        // No cap check: redo restores exactly what undo removed.
        self.history.push_back(action);
        true
    }

    /// Undo up to `steps` actions (at least one). Returns how many were undone.
    pub fn undo_steps<S: CellStore + ?Sized>(&mut self, steps: usize, store: &mut S) -> usize {
        let mut undone = 0;
        for _ in 0..steps.max(1) {
            if !self.undo(store) {
                break;
            }
            undone += 1;
        }
        undone
    }

    #[must_use]
    pub fn can_undo(&self) -> bool {
        !self.history.is_empty()
    }

    #[must_use]
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    #[must_use]
    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    #[must_use]
    pub fn redo_len(&self) -> usize {
        self.redo_stack.len()
    }

    #[must_use]
    pub fn max_history(&self) -> usize {
        self.max_history
    }

    /// Oldest first.
    pub fn history(&self) -> impl Iterator<Item = &Action> {
        self.history.iter()
    }

    pub fn clear(&mut self) {
        self.history.clear();
        self.redo_stack.clear();
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
    use crate::error::SheetpadError;
    use std::collections::HashMap;

    /// Sparse store bounded to a 10x10 area.
    #[derive(Default)]
    struct MapStore {
        cells: HashMap<Coord, String>,
    }

    impl CellStore for MapStore {
        fn get_cell(&self, coord: Coord) -> Result<&str> {
            Ok(self.cells.get(&coord).map_or("", String::as_str))
        }

        fn set_cell(&mut self, coord: Coord, value: &str) -> Result<()> {
            if coord.row >= 10 || coord.col >= 10 {
                return Err(SheetpadError::InvalidCoordinate(format!("{coord:?}")));
            }
            self.cells.insert(coord, value.to_string());
            Ok(())
        }
    }

    fn get(store: &MapStore, row: u32, col: u32) -> &str {
        store.get_cell(Coord::new(row, col)).unwrap()
    }

    #[test]
    fn test_noop_changes_are_dropped() {
        let action = Action::new([
            CellChange::new(Coord::new(0, 0), "a", "a"),
            CellChange::new(Coord::new(0, 1), "", "b"),
        ]);
        assert_eq!(action.len(), 1);
        assert_eq!(action.changes()[0].coord, Coord::new(0, 1));
    }

    #[test]
    fn test_empty_action_not_recorded() {
        let mut log = ActionLog::default();
        assert!(!log.record(Action::new([])));
        assert!(!log.record(Action::single(Coord::new(0, 0), "x", "x")));
        assert!(!log.can_undo());
    }

    #[test]
    fn test_duplicate_coordinate_last_recorded_wins() {
        let mut store = MapStore::default();
        let action = Action::new([
            CellChange::new(Coord::new(0, 0), "a", "b"),
            CellChange::new(Coord::new(0, 0), "b", "c"),
        ]);
        apply_action(&action, false, &mut store);
        assert_eq!(get(&store, 0, 0), "c");
        apply_action(&action, true, &mut store);
        assert_eq!(get(&store, 0, 0), "b");
    }

    #[test]
    fn test_rejected_write_does_not_stop_batch() {
        let mut store = MapStore::default();
        let action = Action::new([
            CellChange::new(Coord::new(20, 0), "", "lost"),
            CellChange::new(Coord::new(1, 1), "", "kept"),
        ]);
        apply_action(&action, false, &mut store);
        assert_eq!(get(&store, 1, 1), "kept");
    }

    #[test]
    fn test_redo_skips_cap_check() {
        let mut store = MapStore::default();
        let mut log = ActionLog::new(2);
        for i in 0..3 {
            log.record(Action::single(Coord::new(0, i), "", "v"));
        }
        assert_eq!(log.history_len(), 2);
        assert!(log.undo(&mut store));
        assert!(log.redo(&mut store));
        assert_eq!(log.history_len(), 2);
    }

    #[test]
    fn test_undo_steps_stops_when_exhausted() {
        let mut store = MapStore::default();
        let mut log = ActionLog::default();
        log.record(Action::single(Coord::new(0, 0), "", "a"));
        log.record(Action::single(Coord::new(0, 1), "", "b"));
        assert_eq!(log.undo_steps(5, &mut store), 2);
        assert_eq!(log.undo_steps(0, &mut store), 0);
        assert_eq!(log.redo_len(), 2);
    }

    #[test]
    fn test_clear_empties_both_stacks() {
        let mut store = MapStore::default();
        let mut log = ActionLog::default();
        log.record(Action::single(Coord::new(0, 0), "", "a"));
        log.record(Action::single(Coord::new(0, 1), "", "b"));
        log.undo(&mut store);
        log.clear();
        assert!(!log.can_undo());
        assert!(!log.can_redo());
    }
}
