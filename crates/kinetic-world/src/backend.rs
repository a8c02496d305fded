use kinetic_core::direction::BlockRotation;
use kinetic_core::types::{CellCoord, Vector3Dd, Vector3Di, WorldId};
use thiserror::Error;

/// Errors reported by a world backend.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BackendError {
    #[error("world {0:?} is not known to the backend")]
    UnknownWorld(WorldId),

    #[error("cell ({}, {}) of world {world:?} is not loaded", cell.x, cell.y)]
    CellNotLoaded { world: WorldId, cell: CellCoord },

    #[error("cell ({}, {}) of world {world:?} cannot be loaded", cell.x, cell.y)]
    LoadFailed { world: WorldId, cell: CellCoord },

    #[error("animated entity {0} no longer exists")]
    EntityMissing(String),

    #[error("host rejected the operation: {0}")]
    Host(String),
}

/// The operations the animation engine needs from the host world.
///
/// Implementations own all block and entity state; the engine only ever
/// touches it through these calls, and only from the tick driver (or while
/// preparing a toggle under the engine's backend lock).
pub trait WorldBackend: Send {
    /// Opaque block appearance (material, facing, ...).
    type Block: Clone + std::fmt::Debug + Send;
    /// Handle of a spawned animated entity.
    type Entity: Clone + std::fmt::Debug + Send;

    /// Remove the real block at `pos`, returning it. `Ok(None)` means the position was empty.
    fn remove_block(
        &mut self,
        world: WorldId,
        pos: Vector3Di,
    ) -> Result<Option<Self::Block>, BackendError>;

    /// Place a real block at `pos`, replacing whatever is there.
    fn place_block(
        &mut self,
        world: WorldId,
        pos: Vector3Di,
        block: Self::Block,
    ) -> Result<(), BackendError>;

    /// Spawn a moving stand-in showing `block` at `pos`.
    fn spawn_animated_entity(
        &mut self,
        world: WorldId,
        block: &Self::Block,
        pos: Vector3Dd,
    ) -> Result<Self::Entity, BackendError>;

    fn move_animated_entity(
        &mut self,
        entity: &Self::Entity,
        pos: Vector3Dd,
    ) -> Result<(), BackendError>;

    /// Change the appearance an animated entity shows.
    fn update_animated_entity(
        &mut self,
        entity: &Self::Entity,
        block: &Self::Block,
    ) -> Result<(), BackendError>;

    fn despawn_animated_entity(&mut self, entity: Self::Entity);

    /// Reorient a block appearance by a quarter turn.
    fn rotate_block(&self, block: &Self::Block, rotation: BlockRotation) -> Self::Block;

    fn is_region_loaded(&self, world: WorldId, cell: CellCoord) -> bool;

    /// Load (generating if needed) the given cell.
    fn load_region(&mut self, world: WorldId, cell: CellCoord) -> Result<(), BackendError>;
}
