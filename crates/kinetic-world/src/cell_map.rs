use crate::cell::{CellState, RegionCell};
use kinetic_core::types::CellCoord;
use std::collections::HashMap;

/// Sparse map of region cells. Cells never touched report `default_state`.
pub struct CellMap {
    cells: HashMap<CellCoord, RegionCell>,
    default_state: CellState,
}

impl Default for CellMap {
    fn default() -> Self {
        Self::new()
    }
}

impl CellMap {
    /// A map where every cell starts loaded.
    pub fn new() -> Self {
        Self::with_default_state(CellState::Loaded)
    }

    pub fn with_default_state(default_state: CellState) -> Self {
        Self {
            cells: HashMap::new(),
            default_state,
        }
    }

    pub fn state(&self, coord: &CellCoord) -> CellState {
        self.cells
            .get(coord)
            .map(|c| c.state)
            .unwrap_or(self.default_state)
    }

    pub fn set_state(&mut self, coord: CellCoord, state: CellState) {
        self.cells
            .entry(coord)
            .and_modify(|c| c.state = state)
            .or_insert_with(|| RegionCell::new(coord, state));
    }

    /// Load a cell, materializing its record on first touch.
    /// Returns false if the cell cannot be loaded.
    pub fn load_cell(&mut self, coord: CellCoord) -> bool {
        let default_state = self.default_state;
        self.cells
            .entry(coord)
            .or_insert_with(|| RegionCell::new(coord, default_state))
            .load()
    }

    pub fn unload_cell(&mut self, coord: CellCoord) {
        let default_state = self.default_state;
        self.cells
            .entry(coord)
            .or_insert_with(|| RegionCell::new(coord, default_state))
            .unload();
    }

    pub fn get(&self, coord: &CellCoord) -> Option<&RegionCell> {
        self.cells.get(coord)
    }

    /// Total on-demand loads across all cells.
    pub fn total_loads(&self) -> u32 {
        self.cells.values().map(|c| c.load_count).sum()
    }

    /// Get counts for debug display: (tracked, loaded, unloaded, unloadable).
    pub fn cell_counts(&self) -> (u32, u32, u32, u32) {
        let mut loaded = 0u32;
        let mut unloaded = 0u32;
        let mut unloadable = 0u32;
        for cell in self.cells.values() {
            match cell.state {
                CellState::Loaded => loaded += 1,
                CellState::Unloaded => unloaded += 1,
                CellState::Unloadable => unloadable += 1,
            }
        }
        (self.cells.len() as u32, loaded, unloaded, unloadable)
    }
}
