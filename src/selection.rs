//! Selection engine: anchor/focus tracking and region derivation.
//!
//! The active region is always `normalize(anchor, focus)`, except during a
//! pointer drag, where the latest drag point stands in for the focus until
//! the drag ends.

use crate::error::Result;
use crate::types::{normalize, Coord, Direction, GridSize, Region, DEFAULT_PAGE_SIZE};

#[derive(Debug, Clone)]
pub struct SelectionEngine {
    size: GridSize,
    page_size: u32,
    anchor: Coord,
    focus: Coord,
    /// Latest pointer position while a drag is in progress.
    drag_point: Option<Coord>,
    is_selecting: bool,
}

impl SelectionEngine {
    /// New engine with the selection collapsed on `(0, 0)`.
    #[must_use]
    pub fn new(size: GridSize) -> Self {
        Self::with_page_size(size, DEFAULT_PAGE_SIZE)
    }

    #[must_use]
    pub fn with_page_size(size: GridSize, page_size: u32) -> Self {
        Self {
            size,
            page_size: page_size.max(1),
            anchor: Coord::default(),
            focus: Coord::default(),
            drag_point: None,
            is_selecting: false,
        }
    }

    #[must_use]
    pub fn size(&self) -> GridSize {
        self.size
    }

    #[must_use]
    pub fn anchor(&self) -> Coord {
        self.anchor
    }

    #[must_use]
    pub fn focus(&self) -> Coord {
        self.focus
    }

    #[must_use]
    pub fn is_selecting(&self) -> bool {
        self.is_selecting
    }

    /// The single source of truth for copy/cut/paste/delete.
    #[must_use]
    pub fn active_region(&self) -> Region {
        normalize(self.anchor, self.drag_point.unwrap_or(self.focus))
    }

    /// Pointer-down: collapse the selection on `coord` and start a drag.
    ///
    /// # Errors
    /// Returns `InvalidCoordinate` if `coord` is outside the grid.
    pub fn begin_selection(&mut self, coord: Coord) -> Result<Region> {
        let coord = self.size.check(coord)?;
        self.anchor = coord;
        self.focus = coord;
        self.drag_point = None;
        self.is_selecting = true;
        log::trace!("selection begin at {coord:?}");
        Ok(self.active_region())
    }

    /// Pointer-enter during a drag. Returns `None` when no drag is in progress.
    ///
    /// # Errors
    /// Returns `InvalidCoordinate` if `coord` is outside the grid.
    pub fn extend_selection(&mut self, coord: Coord) -> Result<Option<Region>> {
        if !self.is_selecting {
            return Ok(None);
        }
        let coord = self.size.check(coord)?;
        self.drag_point = Some(coord);
        Ok(Some(self.active_region()))
    }

    /// Pointer-up. The last drag point becomes the focus.
    pub fn end_selection(&mut self) {
        if !self.is_selecting {
            return;
        }
        self.is_selecting = false;
        if let Some(point) = self.drag_point.take() {
            self.focus = point;
        }
        log::trace!("selection end: {:?}", self.active_region());
    }

    /// Click, optionally with the range-extend modifier held.
    ///
    /// # Errors
    /// Returns `InvalidCoordinate` if `coord` is outside the grid.
    pub fn click(&mut self, coord: Coord, extend: bool) -> Result<Region> {
        let coord = self.size.check(coord)?;
        self.end_selection();
        if !extend {
            self.anchor = coord;
        }
        self.focus = coord;
        Ok(self.active_region())
    }

    /// Move the focus one navigation step, clamped to the grid.
    ///
    /// Without `extend` the anchor follows the focus and the selection
    /// collapses to one cell; with it the anchor stays put.
    pub fn move_focus(&mut self, direction: Direction, extend: bool) -> Region {
        self.end_selection();
        let candidate = self.size.clamp(self.step(direction));
        if !extend {
            self.anchor = candidate;
        }
        self.focus = candidate;
        log::trace!("focus {direction:?} -> {candidate:?} (extend={extend})");
        self.active_region()
    }

    fn step(&self, direction: Direction) -> Coord {
        let Coord { row, col } = self.focus;
        let last = self.size.last();
        match direction {
            Direction::Left => Coord::new(row, col.saturating_sub(1)),
            Direction::Right => Coord::new(row, col.saturating_add(1)),
            Direction::Up => Coord::new(row.saturating_sub(1), col),
            Direction::Down => Coord::new(row.saturating_add(1), col),
            Direction::PageUp => Coord::new(row.saturating_sub(self.page_size), col),
            Direction::PageDown => Coord::new(row.saturating_add(self.page_size), col),
            Direction::Home => Coord::new(row, 0),
            Direction::End => Coord::new(row, last.col),
        }
    }

    pub fn select_all(&mut self) -> Region {
        self.is_selecting = false;
        self.drag_point = None;
        self.anchor = Coord::new(0, 0);
        self.focus = self.size.last();
        self.active_region()
    }

    /// Collapse the selection back to `(0, 0)`.
    pub fn reset(&mut self) {
        self.anchor = Coord::default();
        self.focus = Coord::default();
        self.drag_point = None;
        self.is_selecting = false;
    }

    /// Adopt new grid dimensions, pulling every tracked point back inside.
    pub fn resize(&mut self, size: GridSize) {
        self.size = size;
        self.anchor = size.clamp(self.anchor);
        self.focus = size.clamp(self.focus);
        self.drag_point = self.drag_point.map(|p| size.clamp(p));
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

    fn engine() -> SelectionEngine {
        SelectionEngine::new(GridSize::new(50, 15))
    }

    #[test]
    fn test_starts_collapsed_at_origin() {
        let e = engine();
        assert_eq!(e.active_region(), Region::single(Coord::new(0, 0)));
        assert!(!e.is_selecting());
    }

    #[test]
    fn test_drag_keeps_anchor_and_commits_focus_on_end() {
        let mut e = engine();
        e.begin_selection(Coord::new(4, 4)).unwrap();
        let r = e.extend_selection(Coord::new(1, 6)).unwrap().unwrap();
        assert_eq!(r.bounds(), (1, 4, 4, 6));
        assert_eq!(e.focus(), Coord::new(4, 4));

        e.end_selection();
        assert_eq!(e.anchor(), Coord::new(4, 4));
        assert_eq!(e.focus(), Coord::new(1, 6));
        assert_eq!(e.active_region().bounds(), (1, 4, 4, 6));
    }

    #[test]
    fn test_extend_without_drag_is_noop() {
        let mut e = engine();
        assert!(e.extend_selection(Coord::new(3, 3)).unwrap().is_none());
        assert_eq!(e.active_region(), Region::single(Coord::new(0, 0)));
        e.end_selection();
        assert_eq!(e.active_region(), Region::single(Coord::new(0, 0)));
    }

    #[test]
    fn test_out_of_bounds_rejected() {
        let mut e = engine();
        assert!(matches!(
            e.begin_selection(Coord::new(50, 0)),
            Err(SheetpadError::InvalidCoordinate(_))
        ));
        e.begin_selection(Coord::new(0, 0)).unwrap();
        assert!(e.extend_selection(Coord::new(0, 15)).is_err());
    }

    #[test]
    fn test_shift_click_extends_from_anchor() {
        let mut e = engine();
        e.click(Coord::new(2, 2), false).unwrap();
        let r = e.click(Coord::new(5, 0), true).unwrap();
        assert_eq!(r.bounds(), (2, 5, 0, 2));
        let r = e.click(Coord::new(7, 7), false).unwrap();
        assert!(r.is_single_cell());
    }

    #[test]
    fn test_move_focus_clamps_at_edges() {
        let mut e = engine();
        assert_eq!(
            e.move_focus(Direction::Up, false),
            Region::single(Coord::new(0, 0))
        );
        assert_eq!(
            e.move_focus(Direction::Left, false),
            Region::single(Coord::new(0, 0))
        );
        e.move_focus(Direction::End, false);
        assert_eq!(e.focus(), Coord::new(0, 14));
        e.move_focus(Direction::Right, false);
        assert_eq!(e.focus(), Coord::new(0, 14));
    }

    #[test]
    fn test_page_keys_step_ten_rows() {
        let mut e = engine();
        e.move_focus(Direction::PageDown, false);
        assert_eq!(e.focus(), Coord::new(10, 0));
        for _ in 0..10 {
            e.move_focus(Direction::PageDown, false);
        }
        assert_eq!(e.focus(), Coord::new(49, 0));
        e.move_focus(Direction::PageUp, false);
        assert_eq!(e.focus(), Coord::new(39, 0));
    }

    #[test]
    fn test_home_with_extend_keeps_anchor() {
        let mut e = engine();
        e.click(Coord::new(3, 9), false).unwrap();
        let r = e.move_focus(Direction::Home, true);
        assert_eq!(r.bounds(), (3, 3, 0, 9));
        assert_eq!(e.anchor(), Coord::new(3, 9));
    }

    #[test]
    fn test_resize_reclamps() {
        let mut e = engine();
        e.select_all();
        e.resize(GridSize::new(10, 5));
        assert_eq!(e.focus(), Coord::new(9, 4));
        assert!(e.active_region().fits(e.size()));
    }
}
