use kinetic_core::types::CellCoord;

/// Load state of one region cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellState {
    /// Resident; blocks may be read and written.
    Loaded,
    /// Not resident but can be loaded on demand.
    Unloaded,
    /// Not resident and every load attempt fails (outside the world border, corrupt, ...).
    Unloadable,
}

/// Per-cell bookkeeping kept by the in-memory backend.
#[derive(Debug, Clone)]
pub struct RegionCell {
    pub coord: CellCoord,
    pub state: CellState,
    /// How many times this cell has been loaded on demand.
    pub load_count: u32,
}

impl RegionCell {
    pub fn new(coord: CellCoord, state: CellState) -> Self {
        Self {
            coord,
            state,
            load_count: 0,
        }
    }

    /// Try to bring the cell into memory. Returns false if it cannot be loaded.
    pub fn load(&mut self) -> bool {
        match self.state {
            CellState::Loaded => true,
            CellState::Unloaded => {
                self.state = CellState::Loaded;
                self.load_count += 1;
                true
            }
            CellState::Unloadable => false,
        }
    }

    /// Drop the cell from memory. Unloadable cells stay unloadable.
    pub fn unload(&mut self) {
        if self.state == CellState::Loaded {
            self.state = CellState::Unloaded;
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.state == CellState::Loaded
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::IVec2;

    #[test]
    fn test_load_unload_cycle() {
        let mut cell = RegionCell::new(IVec2::new(2, -1), CellState::Unloaded);
        assert!(!cell.is_loaded());
        assert!(cell.load());
        assert!(cell.is_loaded());
        assert!(cell.load());
        assert_eq!(cell.load_count, 1, "reloading a resident cell is free");
        cell.unload();
        assert_eq!(cell.state, CellState::Unloaded);
    }

    #[test]
    fn test_unloadable_never_loads() {
        let mut cell = RegionCell::new(IVec2::ZERO, CellState::Unloadable);
        assert!(!cell.load());
        cell.unload();
        assert_eq!(cell.state, CellState::Unloadable);
        assert_eq!(cell.load_count, 0);
    }
}
