//! Undo/redo behavior of the action log, both directly over a grid and
//! through the editor.
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::panic
)]

use proptest::prelude::*;
use sheetpad::{
    Action, ActionLog, CellChange, CellStore, Coord, EditorConfig, Grid, GridSize, SheetEditor,
};

fn at(row: u32, col: u32) -> Coord {
    Coord::new(row, col)
}

fn grid() -> Grid {
    Grid::new(GridSize::new(50, 15))
}

/// Write `value` and record the change, the way the editor does.
fn write(log: &mut ActionLog, grid: &mut Grid, coord: Coord, value: &str) -> bool {
    let old = grid.get_cell(coord).unwrap().to_string();
    grid.set_cell(coord, value).unwrap();
    log.record(Action::single(coord, old, value))
}

// ============================================================================
// Scenarios
// ============================================================================

#[test]
fn test_undo_redo_two_writes() {
    let mut log = ActionLog::default();
    let mut g = grid();
    write(&mut log, &mut g, at(0, 0), "A");
    write(&mut log, &mut g, at(0, 0), "B");

    assert!(log.undo(&mut g));
    assert_eq!(g.get(at(0, 0)).unwrap(), "A");
    assert!(log.undo(&mut g));
    assert_eq!(g.get(at(0, 0)).unwrap(), "");
    assert!(!log.can_undo());

    assert!(log.redo(&mut g));
    assert_eq!(g.get(at(0, 0)).unwrap(), "A");
    assert!(log.redo(&mut g));
    assert_eq!(g.get(at(0, 0)).unwrap(), "B");
    assert!(!log.can_redo());
}

#[test]
fn test_undo_on_empty_history() {
    let mut log = ActionLog::default();
    let mut g = grid();
    assert!(!log.undo(&mut g));
    assert!(!log.redo(&mut g));
    assert_eq!(g.filled_count(), 0);
}

#[test]
fn test_undo_reverts_only_the_latest_action() {
    let mut log = ActionLog::default();
    let mut g = grid();
    write(&mut log, &mut g, at(0, 0), "x");
    write(&mut log, &mut g, at(0, 1), "y");

    assert!(log.undo(&mut g));
    assert_eq!(g.get(at(0, 1)).unwrap(), "");
    assert_eq!(g.get(at(0, 0)).unwrap(), "x");

    assert!(log.undo(&mut g));
    assert_eq!(g.get(at(0, 0)).unwrap(), "");
    assert_eq!(g.filled_count(), 0);
}

#[test]
fn test_record_clears_redo() {
    let mut log = ActionLog::default();
    let mut g = grid();
    write(&mut log, &mut g, at(1, 1), "x");
    write(&mut log, &mut g, at(1, 2), "y");
    log.undo(&mut g);
    assert!(log.can_redo());
    assert_eq!(g.get(at(1, 1)).unwrap(), "x");

    write(&mut log, &mut g, at(2, 2), "z");
    assert!(!log.can_redo());
    assert!(!log.redo(&mut g));
    assert_eq!(g.get(at(1, 2)).unwrap(), "");
}

#[test]
fn test_empty_action_is_not_recorded() {
    let mut log = ActionLog::default();
    let mut g = grid();
    write(&mut log, &mut g, at(0, 0), "x");
    log.undo(&mut g);

    assert!(!log.record(Action::new(Vec::new())));
    assert!(!log.record(Action::single(at(0, 0), "same", "same")));
    assert!(log.can_redo());
    assert_eq!(log.history_len(), 0);
}

#[test]
fn test_cap_evicts_oldest() {
    let mut log = ActionLog::default();
    let mut g = grid();
    for i in 0..201u32 {
        write(&mut log, &mut g, at(i % 50, 0), &format!("v{i}"));
    }
    assert_eq!(log.history_len(), 200);

    for _ in 0..200 {
        assert!(log.undo(&mut g));
    }
    assert!(!log.undo(&mut g));
    // The first write was evicted, so its value survives every undo.
    assert_eq!(g.get(at(0, 0)).unwrap(), "v0");
    assert_eq!(log.redo_len(), 200);
}

#[test]
fn test_custom_cap() {
    let mut log = ActionLog::new(3);
    let mut g = grid();
    for i in 0..5u32 {
        write(&mut log, &mut g, at(i, 0), "x");
    }
    assert_eq!(log.history_len(), 3);
    assert_eq!(log.undo_steps(10, &mut g), 3);
    assert_eq!(g.get(at(1, 0)).unwrap(), "x");
    assert_eq!(g.get(at(2, 0)).unwrap(), "");
}

#[test]
fn test_batch_reverts_together() {
    let mut log = ActionLog::default();
    let mut g = grid();
    g.set(at(0, 0), "a").unwrap();
    g.set(at(0, 1), "b").unwrap();
    let action = Action::new(vec![
        CellChange::new(at(0, 0), "a", ""),
        CellChange::new(at(0, 1), "b", ""),
        CellChange::new(at(0, 2), "", ""),
    ]);
    assert_eq!(action.len(), 2);
    g.set(at(0, 0), "").unwrap();
    g.set(at(0, 1), "").unwrap();
    log.record(action);

    log.undo(&mut g);
    assert_eq!(g.get(at(0, 0)).unwrap(), "a");
    assert_eq!(g.get(at(0, 1)).unwrap(), "b");
}

// ============================================================================
// Through the editor
// ============================================================================

#[test]
fn test_editor_history_is_capped_by_config() {
    let config = EditorConfig {
        max_history: 2,
        ..EditorConfig::default()
    };
    let mut editor = SheetEditor::new(config);
    for value in ["1", "2", "3"] {
        editor.commit_edit(at(0, 0), value).unwrap();
    }
    assert!(editor.undo());
    assert!(editor.undo());
    assert!(!editor.undo());
    assert_eq!(editor.cell_value(at(0, 0)).unwrap(), "1");
}

// ============================================================================
// Properties
// ============================================================================

fn config() -> ProptestConfig {
    ProptestConfig {
        cases: std::env::var("PROPTEST_CASES")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(128),
        failure_persistence: None,
        ..ProptestConfig::default()
    }
}

fn writes() -> impl Strategy<Value = Vec<(u32, u32, String)>> {
    prop::collection::vec((0u32..5, 0u32..5, "[a-c]{0,2}"), 1..40)
}

proptest! {
    #![proptest_config(config())]

    /// Undoing everything restores the initial grid; redoing everything
    /// restores the final one.
    #[test]
    fn undo_all_then_redo_all_round_trips(ops in writes()) {
        let mut log = ActionLog::default();
        let mut g = Grid::new(GridSize::new(5, 5));
        for (row, col, value) in &ops {
            write(&mut log, &mut g, at(*row, *col), value);
        }
        let final_rows = g.to_rows();

        while log.undo(&mut g) {}
        prop_assert_eq!(g.filled_count(), 0);

        while log.redo(&mut g) {}
        prop_assert_eq!(g.to_rows(), final_rows);
    }

    /// One undo followed by one redo leaves the grid unchanged.
    #[test]
    fn undo_redo_is_identity(ops in writes()) {
        let mut log = ActionLog::default();
        let mut g = Grid::new(GridSize::new(5, 5));
        for (row, col, value) in &ops {
            write(&mut log, &mut g, at(*row, *col), value);
        }
        let before = g.to_rows();
        if log.undo(&mut g) {
            prop_assert!(log.redo(&mut g));
        }
        prop_assert_eq!(g.to_rows(), before);
    }
}
