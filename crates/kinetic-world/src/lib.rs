pub mod backend;
pub mod cell;
pub mod cell_map;
pub mod memory;
pub mod region;

pub use backend::{BackendError, WorldBackend};
pub use memory::{EntityId, MemoryBlock, MemoryWorld};
pub use region::{check_region, covering_cells, RegionCheck};
