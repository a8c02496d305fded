//! In-memory world backend. Used by tests and the bench runner, and as a
//! reference for host adapters.

use crate::backend::{BackendError, WorldBackend};
use crate::cell::CellState;
use crate::cell_map::CellMap;
use kinetic_core::constants::REGION_CELL_SIZE;
use kinetic_core::cuboid::Cuboid;
use kinetic_core::direction::{BlockRotation, Facing};
use kinetic_core::math::block_to_cell;
use kinetic_core::types::{CellCoord, Vector3Dd, Vector3Di, WorldId};
use std::collections::{HashMap, HashSet};

/// Block appearance stored by [`MemoryWorld`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MemoryBlock {
    pub material: u16,
    pub facing: Facing,
}

impl MemoryBlock {
    pub fn new(material: u16) -> Self {
        Self {
            material,
            facing: Facing::default(),
        }
    }

    pub fn facing(material: u16, facing: Facing) -> Self {
        Self { material, facing }
    }
}

/// Handle of an animated entity in [`MemoryWorld`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntityId(pub u64);

#[derive(Debug, Clone)]
struct AnimatedEntity {
    block: MemoryBlock,
    position: Vector3Dd,
    moves: u32,
}

pub struct MemoryWorld {
    blocks: HashMap<(WorldId, Vector3Di), MemoryBlock>,
    cells: HashMap<WorldId, CellMap>,
    entities: HashMap<EntityId, AnimatedEntity>,
    next_entity: u64,
    cell_size: i32,
    default_cell_state: CellState,
    /// Moving an entity showing one of these materials fails.
    poisoned_materials: HashSet<u16>,
    /// Placing a block at one of these positions fails.
    failing_placements: HashSet<(WorldId, Vector3Di)>,
}

impl Default for MemoryWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryWorld {
    /// Empty world with every cell loaded.
    pub fn new() -> Self {
        Self::with_default_cell_state(CellState::Loaded)
    }

    pub fn with_default_cell_state(default_cell_state: CellState) -> Self {
        Self {
            blocks: HashMap::new(),
            cells: HashMap::new(),
            entities: HashMap::new(),
            next_entity: 0,
            cell_size: REGION_CELL_SIZE,
            default_cell_state,
            poisoned_materials: HashSet::new(),
            failing_placements: HashSet::new(),
        }
    }

    fn cell_map_mut(&mut self, world: WorldId) -> &mut CellMap {
        let default_state = self.default_cell_state;
        self.cells
            .entry(world)
            .or_insert_with(|| CellMap::with_default_state(default_state))
    }

    fn ensure_loaded(&self, world: WorldId, pos: Vector3Di) -> Result<(), BackendError> {
        let cell = block_to_cell(pos, self.cell_size);
        if self.is_region_loaded(world, cell) {
            Ok(())
        } else {
            Err(BackendError::CellNotLoaded { world, cell })
        }
    }

    pub fn set_cell_state(&mut self, world: WorldId, cell: CellCoord, state: CellState) {
        self.cell_map_mut(world).set_state(cell, state);
    }

    /// Number of cells loaded on demand in `world`.
    pub fn region_loads(&self, world: WorldId) -> u32 {
        self.cells.get(&world).map(|m| m.total_loads()).unwrap_or(0)
    }

    /// Place a block directly, ignoring cell state (world setup).
    pub fn set_block(&mut self, world: WorldId, pos: Vector3Di, block: MemoryBlock) {
        self.blocks.insert((world, pos), block);
    }

    /// Fill every position of `cuboid` with `block`.
    pub fn fill(&mut self, world: WorldId, cuboid: &Cuboid, block: MemoryBlock) {
        for pos in cuboid.positions() {
            self.blocks.insert((world, pos), block);
        }
    }

    pub fn block_at(&self, world: WorldId, pos: Vector3Di) -> Option<MemoryBlock> {
        self.blocks.get(&(world, pos)).copied()
    }

    /// Positions of all real blocks in `world`.
    pub fn block_positions(&self, world: WorldId) -> Vec<Vector3Di> {
        self.blocks
            .keys()
            .filter(|(w, _)| *w == world)
            .map(|(_, pos)| *pos)
            .collect()
    }

    pub fn block_count(&self, world: WorldId) -> usize {
        self.blocks.keys().filter(|(w, _)| *w == world).count()
    }

    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    pub fn entity_position(&self, entity: &EntityId) -> Option<Vector3Dd> {
        self.entities.get(entity).map(|e| e.position)
    }

    pub fn entity_block(&self, entity: &EntityId) -> Option<MemoryBlock> {
        self.entities.get(entity).map(|e| e.block)
    }

    /// Successful moves applied to an entity.
    pub fn entity_moves(&self, entity: &EntityId) -> Option<u32> {
        self.entities.get(entity).map(|e| e.moves)
    }

    /// Make every move of entities showing `material` fail.
    pub fn poison_material(&mut self, material: u16) {
        self.poisoned_materials.insert(material);
    }

    /// Make block placement at `pos` fail.
    pub fn fail_placement_at(&mut self, world: WorldId, pos: Vector3Di) {
        self.failing_placements.insert((world, pos));
    }
}

impl WorldBackend for MemoryWorld {
    type Block = MemoryBlock;
    type Entity = EntityId;

    fn remove_block(
        &mut self,
        world: WorldId,
        pos: Vector3Di,
    ) -> Result<Option<MemoryBlock>, BackendError> {
        self.ensure_loaded(world, pos)?;
        Ok(self.blocks.remove(&(world, pos)))
    }

    fn place_block(
        &mut self,
        world: WorldId,
        pos: Vector3Di,
        block: MemoryBlock,
    ) -> Result<(), BackendError> {
        self.ensure_loaded(world, pos)?;
        if self.failing_placements.contains(&(world, pos)) {
            return Err(BackendError::Host(format!(
                "placement refused at ({}, {}, {})",
                pos.x, pos.y, pos.z
            )));
        }
        self.blocks.insert((world, pos), block);
        Ok(())
    }

    fn spawn_animated_entity(
        &mut self,
        _world: WorldId,
        block: &MemoryBlock,
        pos: Vector3Dd,
    ) -> Result<EntityId, BackendError> {
        let id = EntityId(self.next_entity);
        self.next_entity += 1;
        self.entities.insert(
            id,
            AnimatedEntity {
                block: *block,
                position: pos,
                moves: 0,
            },
        );
        Ok(id)
    }

    fn move_animated_entity(
        &mut self,
        entity: &EntityId,
        pos: Vector3Dd,
    ) -> Result<(), BackendError> {
        let e = self
            .entities
            .get_mut(entity)
            .ok_or_else(|| BackendError::EntityMissing(format!("{entity:?}")))?;
        if self.poisoned_materials.contains(&e.block.material) {
            return Err(BackendError::Host(format!(
                "entity {entity:?} refused to move"
            )));
        }
        e.position = pos;
        e.moves += 1;
        Ok(())
    }

    fn update_animated_entity(
        &mut self,
        entity: &EntityId,
        block: &MemoryBlock,
    ) -> Result<(), BackendError> {
        let e = self
            .entities
            .get_mut(entity)
            .ok_or_else(|| BackendError::EntityMissing(format!("{entity:?}")))?;
        e.block = *block;
        Ok(())
    }

    fn despawn_animated_entity(&mut self, entity: EntityId) {
        self.entities.remove(&entity);
    }

    fn rotate_block(&self, block: &MemoryBlock, rotation: BlockRotation) -> MemoryBlock {
        MemoryBlock {
            material: block.material,
            facing: block.facing.rotated(rotation),
        }
    }

    fn is_region_loaded(&self, world: WorldId, cell: CellCoord) -> bool {
        match self.cells.get(&world) {
            Some(map) => map.state(&cell) == CellState::Loaded,
            None => self.default_cell_state == CellState::Loaded,
        }
    }

    fn load_region(&mut self, world: WorldId, cell: CellCoord) -> Result<(), BackendError> {
        if self.cell_map_mut(world).load_cell(cell) {
            log::debug!("Loaded cell ({}, {}) of world {:?}", cell.x, cell.y, world);
            Ok(())
        } else {
            Err(BackendError::LoadFailed { world, cell })
        }
    }
}
