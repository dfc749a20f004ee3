//! Fixed-cell desktop icon grid with exclusive occupancy.
//!
//! Cells are filled column-major (top to bottom, then left to right). The grid owns occupancy;
//! [`crate::model::DesktopIconRecord::cell`] is a copy refreshed by the reducer after each change.

use std::collections::BTreeMap;

use thiserror::Error;

use crate::{
    config::GridConfig,
    model::{GridCell, IconId, IconPositionMap, PointerPosition, Viewport},
};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GridError {
    #[error("icon `{0}` is not registered")]
    UnknownIcon(IconId),
    #[error("cell ({row}, {col}) is outside the {rows}x{cols} grid")]
    OutOfBounds {
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    },
}

/// Returns `(cols, rows)` for a viewport; both are at least one.
pub fn grid_dimensions(config: GridConfig, taskbar_height: i32, viewport: Viewport) -> (usize, usize) {
    let available_w = (viewport.width - config.padding * 2).max(0);
    let available_h = (viewport.height - taskbar_height - config.padding * 2).max(0);
    let cols = (available_w / config.cell_width.max(1)).max(1);
    let rows = (available_h / config.cell_height.max(1)).max(1);
    (cols as usize, rows as usize)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DesktopGrid {
    config: GridConfig,
    taskbar_height: i32,
    cols: usize,
    rows: usize,
    cells: BTreeMap<GridCell, IconId>,
    positions: IconPositionMap,
    registered: Vec<IconId>,
}

impl DesktopGrid {
    pub fn new(config: GridConfig, taskbar_height: i32, viewport: Viewport) -> Self {
        let (cols, rows) = grid_dimensions(config, taskbar_height, viewport);
        Self {
            config,
            taskbar_height,
            cols,
            rows,
            cells: BTreeMap::new(),
            positions: IconPositionMap::new(),
            registered: Vec::new(),
        }
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn contains(&self, cell: GridCell) -> bool {
        cell.row < self.rows && cell.col < self.cols
    }

    pub fn occupant(&self, cell: GridCell) -> Option<&IconId> {
        self.cells.get(&cell)
    }

    pub fn cell_of(&self, icon_id: &IconId) -> Option<GridCell> {
        self.positions.get(icon_id).copied()
    }

    /// Placed icons and their cells.
    pub fn positions(&self) -> &IconPositionMap {
        &self.positions
    }

    /// Icon ids in registration order.
    pub fn registered(&self) -> &[IconId] {
        &self.registered
    }

    /// First free cell scanning column-major.
    pub fn first_free_cell(&self) -> Option<GridCell> {
        (0..self.cols)
            .flat_map(|col| (0..self.rows).map(move |row| GridCell::new(row, col)))
            .find(|cell| !self.cells.contains_key(cell))
    }

    /// Registers `icon_ids` in order and lays them out.
    ///
    /// Saved cells win when they are in bounds and still free; everything else goes to the first
    /// free cell. Re-registering replaces the previous layout.
    pub fn register_icons(&mut self, icon_ids: &[IconId], saved: &IconPositionMap) {
        self.registered.clear();
        for icon_id in icon_ids {
            if !self.registered.contains(icon_id) {
                self.registered.push(icon_id.clone());
            }
        }
        self.clear();

        let ids = self.registered.clone();
        for icon_id in &ids {
            if let Some(cell) = saved.get(icon_id) {
                if self.contains(*cell) && !self.cells.contains_key(cell) {
                    self.assign(icon_id, *cell);
                }
            }
        }
        self.place_unplaced(&ids);
    }

    /// Moves `icon_id` to `target`, swapping with any occupant.
    ///
    /// The occupant moves into the cell `icon_id` vacated. When `icon_id` had no cell the occupant
    /// takes the first free cell instead, or stays unplaced if the grid is full.
    pub fn place_icon(&mut self, icon_id: &IconId, target: GridCell) -> Result<(), GridError> {
        if !self.registered.contains(icon_id) {
            return Err(GridError::UnknownIcon(icon_id.clone()));
        }
        if !self.contains(target) {
            return Err(GridError::OutOfBounds {
                row: target.row,
                col: target.col,
                rows: self.rows,
                cols: self.cols,
            });
        }

        let previous = self.vacate(icon_id);
        if let Some(occupant) = self.cells.get(&target).cloned() {
            self.vacate(&occupant);
            let fallback = previous.or_else(|| self.first_free_cell_excluding(target));
            if let Some(cell) = fallback {
                self.assign(&occupant, cell);
            }
        }
        self.assign(icon_id, target);
        Ok(())
    }

    /// Clears the grid and re-places icons column-major in `order`.
    ///
    /// Registered icons missing from `order` follow in registration order.
    pub fn arrange(&mut self, order: &[IconId]) {
        self.clear();
        let mut ids: Vec<IconId> = order
            .iter()
            .filter(|id| self.registered.contains(id))
            .cloned()
            .collect();
        for id in &self.registered {
            if !ids.contains(id) {
                ids.push(id.clone());
            }
        }
        self.place_unplaced(&ids);
    }

    /// Re-places every icon in registration order.
    pub fn auto_arrange(&mut self) {
        let order = self.registered.clone();
        self.arrange(&order);
    }

    /// Recomputes dimensions for `viewport`. Returns `true` when they changed.
    ///
    /// Icons keep their cell when it is still in bounds; the rest fill free cells in
    /// registration order.
    pub fn resize(&mut self, viewport: Viewport) -> bool {
        let (cols, rows) = grid_dimensions(self.config, self.taskbar_height, viewport);
        if cols == self.cols && rows == self.rows {
            return false;
        }
        self.cols = cols;
        self.rows = rows;

        let previous = std::mem::take(&mut self.positions);
        self.cells.clear();
        let ids = self.registered.clone();
        for icon_id in &ids {
            if let Some(cell) = previous.get(icon_id) {
                if self.contains(*cell) && !self.cells.contains_key(cell) {
                    self.assign(icon_id, *cell);
                }
            }
        }
        self.place_unplaced(&ids);
        true
    }

    /// Top-left pixel position of `cell`.
    pub fn position_from_cell(&self, cell: GridCell) -> PointerPosition {
        PointerPosition::new(
            self.config.padding + cell.col as i32 * self.config.cell_width,
            self.config.padding + cell.row as i32 * self.config.cell_height,
        )
    }

    /// Cell under a pixel position, clamped into the grid.
    pub fn cell_from_position(&self, position: PointerPosition) -> GridCell {
        let col = (position.x - self.config.padding).div_euclid(self.config.cell_width.max(1));
        let row = (position.y - self.config.padding).div_euclid(self.config.cell_height.max(1));
        GridCell::new(
            row.clamp(0, self.rows as i32 - 1) as usize,
            col.clamp(0, self.cols as i32 - 1) as usize,
        )
    }

    fn clear(&mut self) {
        self.cells.clear();
        self.positions.clear();
    }

    fn place_unplaced(&mut self, ids: &[IconId]) {
        for icon_id in ids {
            if self.positions.contains_key(icon_id) {
                continue;
            }
            match self.first_free_cell() {
                Some(cell) => self.assign(icon_id, cell),
                None => break,
            }
        }
    }

    fn first_free_cell_excluding(&self, excluded: GridCell) -> Option<GridCell> {
        (0..self.cols)
            .flat_map(|col| (0..self.rows).map(move |row| GridCell::new(row, col)))
            .find(|cell| *cell != excluded && !self.cells.contains_key(cell))
    }

    fn assign(&mut self, icon_id: &IconId, cell: GridCell) {
        self.cells.insert(cell, icon_id.clone());
        self.positions.insert(icon_id.clone(), cell);
    }

    fn vacate(&mut self, icon_id: &IconId) -> Option<GridCell> {
        let cell = self.positions.remove(icon_id)?;
        self.cells.remove(&cell);
        Some(cell)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn ids(names: &[&str]) -> Vec<IconId> {
        names.iter().map(|n| IconId(n.to_string())).collect()
    }

    fn id(name: &str) -> IconId {
        IconId(name.to_string())
    }

    /// 3 columns x 2 rows with stock metrics.
    fn small_grid() -> DesktopGrid {
        DesktopGrid::new(GridConfig::default(), 40, Viewport::new(290, 240))
    }

    fn assert_exclusive(grid: &DesktopGrid) {
        assert_eq!(grid.cells.len(), grid.positions.len());
        for (icon, cell) in &grid.positions {
            assert_eq!(grid.cells.get(cell), Some(icon));
            assert!(grid.contains(*cell));
        }
    }

    #[test]
    fn dimensions_follow_viewport_and_reserve_the_taskbar() {
        assert_eq!(
            grid_dimensions(GridConfig::default(), 40, Viewport::new(1024, 768)),
            (11, 7)
        );
        assert_eq!(
            grid_dimensions(GridConfig::default(), 40, Viewport::new(10, 10)),
            (1, 1)
        );
        let grid = small_grid();
        assert_eq!((grid.cols(), grid.rows()), (3, 2));
    }

    #[test]
    fn registration_fills_column_major_and_honours_saved_cells() {
        let mut grid = small_grid();
        let mut saved = IconPositionMap::new();
        saved.insert(id("c"), GridCell::new(0, 0));
        saved.insert(id("d"), GridCell::new(9, 9));

        grid.register_icons(&ids(&["a", "b", "c", "d"]), &saved);

        assert_eq!(grid.cell_of(&id("c")), Some(GridCell::new(0, 0)));
        assert_eq!(grid.cell_of(&id("a")), Some(GridCell::new(1, 0)));
        assert_eq!(grid.cell_of(&id("b")), Some(GridCell::new(0, 1)));
        assert_eq!(grid.cell_of(&id("d")), Some(GridCell::new(1, 1)));
        assert_exclusive(&grid);
    }

    #[test]
    fn saved_cell_collisions_go_to_the_first_registered_icon() {
        let mut grid = small_grid();
        let mut saved = IconPositionMap::new();
        saved.insert(id("a"), GridCell::new(1, 2));
        saved.insert(id("b"), GridCell::new(1, 2));

        grid.register_icons(&ids(&["a", "b"]), &saved);

        assert_eq!(grid.cell_of(&id("a")), Some(GridCell::new(1, 2)));
        assert_eq!(grid.cell_of(&id("b")), Some(GridCell::new(0, 0)));
    }

    #[test]
    fn full_grid_leaves_extra_icons_unplaced() {
        let mut grid = DesktopGrid::new(GridConfig::default(), 40, Viewport::new(110, 150));
        grid.register_icons(&ids(&["a", "b"]), &IconPositionMap::new());
        assert_eq!(grid.cell_of(&id("a")), Some(GridCell::new(0, 0)));
        assert_eq!(grid.cell_of(&id("b")), None);
        assert_exclusive(&grid);
    }

    #[test]
    fn placing_onto_an_occupied_cell_swaps() {
        let mut grid = DesktopGrid::new(GridConfig::default(), 40, Viewport::new(1024, 768));
        let mut saved = IconPositionMap::new();
        saved.insert(id("calc"), GridCell::new(0, 0));
        saved.insert(id("paint"), GridCell::new(1, 2));
        grid.register_icons(&ids(&["calc", "paint", "notepad"]), &saved);

        grid.place_icon(&id("calc"), GridCell::new(1, 2))
            .expect("place");

        assert_eq!(grid.cell_of(&id("calc")), Some(GridCell::new(1, 2)));
        assert_eq!(grid.cell_of(&id("paint")), Some(GridCell::new(0, 0)));
        assert_exclusive(&grid);
    }

    #[test]
    fn placing_onto_a_free_cell_vacates_the_old_one() {
        let mut grid = small_grid();
        grid.register_icons(&ids(&["a", "b"]), &IconPositionMap::new());
        grid.place_icon(&id("a"), GridCell::new(1, 2)).expect("place");
        assert_eq!(grid.occupant(GridCell::new(0, 0)), None);
        assert_eq!(grid.occupant(GridCell::new(1, 2)), Some(&id("a")));
        assert_exclusive(&grid);
    }

    #[test]
    fn placing_an_unplaced_icon_drops_the_occupant_when_the_grid_is_full() {
        let mut grid = DesktopGrid::new(GridConfig::default(), 40, Viewport::new(200, 240));
        grid.register_icons(&ids(&["a", "b", "c"]), &IconPositionMap::new());
        // 2 rows x 1 col: `c` does not fit.
        assert_eq!(grid.cell_of(&id("c")), None);

        grid.place_icon(&id("c"), GridCell::new(0, 0)).expect("place");

        assert_eq!(grid.cell_of(&id("c")), Some(GridCell::new(0, 0)));
        assert_eq!(grid.cell_of(&id("b")), Some(GridCell::new(1, 0)));
        assert_eq!(grid.cell_of(&id("a")), None);
        assert_exclusive(&grid);
    }

    #[test]
    fn placement_rejects_unknown_icons_and_out_of_bounds_cells() {
        let mut grid = small_grid();
        grid.register_icons(&ids(&["a"]), &IconPositionMap::new());
        assert_eq!(
            grid.place_icon(&id("zzz"), GridCell::new(0, 0)),
            Err(GridError::UnknownIcon(id("zzz")))
        );
        assert!(matches!(
            grid.place_icon(&id("a"), GridCell::new(5, 0)),
            Err(GridError::OutOfBounds { .. })
        ));
        assert_eq!(grid.cell_of(&id("a")), Some(GridCell::new(0, 0)));
    }

    #[test]
    fn arrange_uses_the_given_order() {
        let mut grid = small_grid();
        grid.register_icons(&ids(&["a", "b", "c"]), &IconPositionMap::new());
        grid.arrange(&ids(&["c", "a"]));
        assert_eq!(grid.cell_of(&id("c")), Some(GridCell::new(0, 0)));
        assert_eq!(grid.cell_of(&id("a")), Some(GridCell::new(1, 0)));
        assert_eq!(grid.cell_of(&id("b")), Some(GridCell::new(0, 1)));

        grid.auto_arrange();
        assert_eq!(grid.cell_of(&id("a")), Some(GridCell::new(0, 0)));
        assert_eq!(grid.cell_of(&id("b")), Some(GridCell::new(1, 0)));
        assert_eq!(grid.cell_of(&id("c")), Some(GridCell::new(0, 1)));
    }

    #[test]
    fn resize_keeps_in_bounds_cells_and_rehomes_orphans() {
        let mut grid = DesktopGrid::new(GridConfig::default(), 40, Viewport::new(1024, 768));
        let mut saved = IconPositionMap::new();
        saved.insert(id("far"), GridCell::new(5, 8));
        saved.insert(id("near"), GridCell::new(1, 1));
        grid.register_icons(&ids(&["far", "near", "other"]), &saved);

        assert!(grid.resize(Viewport::new(290, 240)));

        assert_eq!(grid.cell_of(&id("near")), Some(GridCell::new(1, 1)));
        assert_eq!(grid.cell_of(&id("far")), Some(GridCell::new(0, 0)));
        assert_eq!(grid.cell_of(&id("other")), Some(GridCell::new(1, 0)));
        assert_exclusive(&grid);
        assert!(!grid.resize(Viewport::new(295, 245)));
    }

    #[test]
    fn coordinate_conversion_is_inverse_in_bounds_and_clamps_outside() {
        let grid = small_grid();
        for row in 0..grid.rows() {
            for col in 0..grid.cols() {
                let cell = GridCell::new(row, col);
                assert_eq!(grid.cell_from_position(grid.position_from_cell(cell)), cell);
            }
        }
        assert_eq!(grid.position_from_cell(GridCell::new(1, 2)), PointerPosition::new(190, 100));
        assert_eq!(
            grid.cell_from_position(PointerPosition::new(-50, 5000)),
            GridCell::new(1, 0)
        );
    }
}
