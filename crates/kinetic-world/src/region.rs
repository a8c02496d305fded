//! Region readiness checks run before (and at the end of) an animation.
//!
//! A cuboid is mapped onto the region cells covering its x/z footprint. The
//! check either only verifies those cells or asks the backend to load the
//! missing ones. Nothing in the world is mutated unless the check passes.

use crate::backend::WorldBackend;
use kinetic_core::config::RegionMode;
use kinetic_core::cuboid::Cuboid;
use kinetic_core::types::{CellCoord, WorldId};
use glam::IVec2;

/// Outcome of a region check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegionCheck {
    /// All cells were already loaded.
    Pass,
    /// All cells are loaded now, but at least one had to be loaded for this check.
    RequiredLoad,
    /// A cell is unloaded (verify mode) or could not be loaded.
    Fail,
}

impl RegionCheck {
    pub fn is_ready(self) -> bool {
        !matches!(self, RegionCheck::Fail)
    }
}

/// Cells covering the x/z footprint of `cuboid`, row by row.
pub fn covering_cells(cuboid: &Cuboid, cell_size: i32) -> Vec<CellCoord> {
    let footprint = cuboid.as_flat_rectangle();
    let lo = footprint.min.div_euclid(IVec2::splat(cell_size));
    let hi = footprint.max.div_euclid(IVec2::splat(cell_size));
    let mut cells = Vec::with_capacity(((hi.x - lo.x + 1) * (hi.y - lo.y + 1)) as usize);
    for cz in lo.y..=hi.y {
        for cx in lo.x..=hi.x {
            cells.push(IVec2::new(cx, cz));
        }
    }
    cells
}

/// Check (or establish) that every cell under `cuboid` is loaded.
pub fn check_region<B: WorldBackend>(
    backend: &mut B,
    world: WorldId,
    cuboid: &Cuboid,
    mode: RegionMode,
    cell_size: i32,
) -> RegionCheck {
    let mut required_load = false;

    for cell in covering_cells(cuboid, cell_size) {
        if backend.is_region_loaded(world, cell) {
            continue;
        }
        match mode {
            RegionMode::VerifyLoaded => {
                log::debug!("Region cell ({}, {}) not loaded", cell.x, cell.y);
                return RegionCheck::Fail;
            }
            RegionMode::AttemptLoad => {
                if let Err(e) = backend.load_region(world, cell) {
                    log::debug!("Region cell ({}, {}) failed to load: {e}", cell.x, cell.y);
                    return RegionCheck::Fail;
                }
                required_load = true;
            }
        }
    }

    if required_load {
        RegionCheck::RequiredLoad
    } else {
        RegionCheck::Pass
    }
}
