//! Drives one animation from spawning the animated blocks to placing the
//! real blocks back.
//!
//! The animator owns the animated blocks and talks to the backend only
//! through the calls it is handed; the engine decides when it ticks.

use crate::block::{AnimatedBlock, BlockMotion};
use crate::component::{AnimationComponent, BlockMover};
use crate::error::AnimationError;
use crate::request::AnimationRequestData;
use crate::schedule::OneShotSchedule;
use kinetic_core::config::RegionMode;
use kinetic_core::cuboid::Cuboid;
use kinetic_core::direction::BlockRotation;
use kinetic_core::math::round_to_block;
use kinetic_core::types::{StructureId, Vector3Dd, Vector3Di, WorldId};
use kinetic_world::{check_region, WorldBackend};
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Lifecycle of an [`Animator`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimatorState {
    Idle,
    Preparing,
    Running,
    Completing,
    Cancelled,
}

/// Final state of a structure once its animation stops.
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationOutcome {
    pub structure: StructureId,
    pub cuboid: Cuboid,
    pub rotation_point: Vector3Di,
    pub is_open: bool,
    /// Blocks that stopped moving after a step failure.
    pub failed_blocks: usize,
    /// Blocks that could not be placed where they belonged.
    pub misplaced_blocks: usize,
    /// Misplaced blocks whose fallback position was refused or taken too.
    pub lost_blocks: usize,
    pub cancelled: bool,
}

/// Cross-thread request to stop an animation. Checked at the start of every tick.
#[derive(Debug, Clone, Default)]
pub struct CancelHandle(Arc<AtomicBool>);

impl CancelHandle {
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

pub struct Animator<B: WorldBackend> {
    request: AnimationRequestData,
    component: Box<dyn AnimationComponent>,
    blocks: Vec<AnimatedBlock<B>>,
    schedule: OneShotSchedule,
    state: AnimatorState,
    total_ticks: u32,
    ticks_elapsed: u32,
    ticks_remaining: u32,
    /// Elapsed tick at which the current cycle of a looping animation began.
    cycle_start: u32,
    cell_size: i32,
    cancel: CancelHandle,
}

impl<B: WorldBackend> Animator<B> {
    pub fn new(
        request: AnimationRequestData,
        component: Box<dyn AnimationComponent>,
        cell_size: i32,
    ) -> Self {
        let total_ticks = request.tick_count();
        Self {
            request,
            component,
            blocks: Vec::new(),
            schedule: OneShotSchedule::empty(),
            state: AnimatorState::Idle,
            total_ticks,
            ticks_elapsed: 0,
            ticks_remaining: total_ticks,
            cycle_start: 0,
            cell_size,
            cancel: CancelHandle::default(),
        }
    }

    pub fn structure(&self) -> StructureId {
        self.request.snapshot().id
    }

    pub fn request(&self) -> &AnimationRequestData {
        &self.request
    }

    pub fn state(&self) -> AnimatorState {
        self.state
    }

    pub fn total_ticks(&self) -> u32 {
        self.total_ticks
    }

    pub fn ticks_elapsed(&self) -> u32 {
        self.ticks_elapsed
    }

    pub fn ticks_remaining(&self) -> u32 {
        self.ticks_remaining
    }

    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    pub fn failed_count(&self) -> usize {
        self.blocks.iter().filter(|b| b.failed).count()
    }

    /// Current positions of the animated blocks.
    pub fn positions(&self) -> impl Iterator<Item = Vector3Dd> + '_ {
        self.blocks.iter().map(|b| b.motion.current)
    }

    pub fn cancel_handle(&self) -> CancelHandle {
        self.cancel.clone()
    }

    /// Remove the real blocks and spawn their stand-ins. On any backend
    /// failure everything done so far is rolled back and the error returned.
    pub fn prepare(&mut self, backend: &mut B) -> Result<(), AnimationError> {
        self.state = AnimatorState::Preparing;
        let snapshot = self.request.snapshot();
        let (id, world, cuboid) = (snapshot.id, snapshot.world, snapshot.cuboid);
        let spawn = !self.request.skip_animation();

        for pos in cuboid.positions() {
            let block = match backend.remove_block(world, pos) {
                Ok(Some(block)) => block,
                Ok(None) => continue,
                Err(e) => {
                    self.rollback(backend);
                    return Err(e.into());
                }
            };
            let motion = BlockMotion::new(
                pos,
                self.component.radius(pos),
                self.component.start_angle(pos),
            );
            let entity = if spawn {
                match backend.spawn_animated_entity(world, &block, motion.start) {
                    Ok(entity) => Some(entity),
                    Err(e) => {
                        self.blocks.push(AnimatedBlock::new(motion, block, None));
                        self.rollback(backend);
                        return Err(e.into());
                    }
                }
            } else {
                None
            };
            self.blocks.push(AnimatedBlock::new(motion, block, entity));
        }

        self.schedule = self.component.rotation_schedule(self.total_ticks);
        self.state = AnimatorState::Running;
        log::debug!(
            "Structure {} running: {} blocks over {} ticks",
            id,
            self.blocks.len(),
            self.total_ticks
        );
        Ok(())
    }

    fn rollback(&mut self, backend: &mut B) {
        let world = self.request.snapshot().world;
        for block in self.blocks.drain(..) {
            if let Some(entity) = block.entity {
                backend.despawn_animated_entity(entity);
            }
            if let Err(e) = backend.place_block(world, block.motion.origin, block.original) {
                let p = block.motion.origin;
                log::error!("Failed to restore block at ({}, {}, {}): {e}", p.x, p.y, p.z);
            }
        }
        self.state = AnimatorState::Idle;
    }

    /// Advance one tick. Returns the outcome once the animation has stopped,
    /// either because it ran out of ticks or because it was cancelled.
    ///
    /// Continuous animations start a new cycle instead of running out, so
    /// only a cancellation stops them.
    pub fn tick(&mut self, backend: &mut B) -> Option<AnimationOutcome> {
        if self.state != AnimatorState::Running {
            return None;
        }
        if self.cancel.is_cancelled() {
            return Some(self.cancel(backend));
        }

        self.ticks_elapsed += 1;
        self.ticks_remaining = self.ticks_remaining.saturating_sub(1);

        for rotation in self.schedule.due(self.ticks_elapsed - self.cycle_start) {
            self.reorient(backend, rotation, true);
        }

        let mut mover = BackendMover {
            structure: self.request.snapshot().id,
            blocks: &mut self.blocks,
            backend: &mut *backend,
        };
        self.component
            .execute_animation_step(&mut mover, self.ticks_elapsed, self.ticks_remaining);

        if self.ticks_remaining > 0 {
            return None;
        }
        if self.component.is_continuous() {
            self.cycle_start = self.ticks_elapsed;
            self.ticks_remaining = self.total_ticks;
            self.schedule = self.component.rotation_schedule(self.total_ticks);
            return None;
        }
        Some(self.complete(backend))
    }

    /// Number of completed cycles of a looping animation.
    pub fn cycles(&self) -> u32 {
        self.cycle_start / self.total_ticks.max(1)
    }

    fn reorient(&mut self, backend: &mut B, rotation: BlockRotation, update_entities: bool) {
        for block in &mut self.blocks {
            block.block = backend.rotate_block(&block.block, rotation);
            if !update_entities || block.failed {
                continue;
            }
            if let Some(entity) = &block.entity {
                if let Err(e) = backend.update_animated_entity(entity, &block.block) {
                    log::warn!(
                        "Structure {}: failed to reorient animated block: {e}",
                        self.request.snapshot().id
                    );
                }
            }
        }
    }

    /// Place every block at its final position and report the new state.
    pub fn complete(&mut self, backend: &mut B) -> AnimationOutcome {
        self.state = AnimatorState::Completing;
        let snapshot = self.request.snapshot().clone();

        for rotation in self.schedule.drain_remaining() {
            self.reorient(backend, rotation, false);
        }

        let cuboid = self.component.potential_new_coordinates();
        let region = check_region(
            backend,
            snapshot.world,
            &cuboid,
            RegionMode::AttemptLoad,
            self.cell_size,
        );
        if !region.is_ready() {
            log::warn!(
                "Structure {} completing into unavailable region {cuboid}",
                snapshot.id
            );
        }

        let failed_blocks = self.failed_count();
        let mut placements = Vec::with_capacity(self.blocks.len());
        for block in self.blocks.drain(..) {
            if let Some(entity) = block.entity {
                backend.despawn_animated_entity(entity);
            }
            placements.push(Placement {
                target: self.component.final_position(&block.motion),
                block: block.block,
                fallback: block.motion.origin,
                fallback_block: block.original,
            });
        }
        let placed = place_all(backend, snapshot.id, snapshot.world, placements);

        self.state = AnimatorState::Idle;
        AnimationOutcome {
            structure: snapshot.id,
            cuboid,
            rotation_point: self.component.new_rotation_point(),
            is_open: self.request.target_open(),
            failed_blocks,
            misplaced_blocks: placed.misplaced,
            lost_blocks: placed.lost,
            cancelled: false,
        }
    }

    /// Stop immediately and put every block back where it came from.
    pub fn cancel(&mut self, backend: &mut B) -> AnimationOutcome {
        let snapshot = self.request.snapshot().clone();
        let failed_blocks = self.failed_count();
        let mut placements = Vec::with_capacity(self.blocks.len());
        for block in self.blocks.drain(..) {
            if let Some(entity) = block.entity {
                backend.despawn_animated_entity(entity);
            }
            placements.push(Placement {
                target: block.motion.origin,
                block: block.original,
                fallback: round_to_block(block.motion.current),
                fallback_block: block.block,
            });
        }
        let placed = place_all(backend, snapshot.id, snapshot.world, placements);

        self.state = AnimatorState::Cancelled;
        log::info!(
            "Structure {} animation cancelled after {} of {} ticks",
            snapshot.id,
            self.ticks_elapsed,
            self.total_ticks
        );
        AnimationOutcome {
            structure: snapshot.id,
            cuboid: snapshot.cuboid,
            rotation_point: snapshot.rotation_point,
            is_open: snapshot.is_open,
            failed_blocks,
            misplaced_blocks: placed.misplaced,
            lost_blocks: placed.lost,
            cancelled: true,
        }
    }
}

/// Where one block goes when an animation stops, and where it goes instead
/// if the backend refuses that.
struct Placement<T> {
    target: Vector3Di,
    block: T,
    fallback: Vector3Di,
    fallback_block: T,
}

#[derive(Debug, Default)]
struct PlacementReport {
    misplaced: usize,
    lost: usize,
}

/// Place every target first, then resolve refusals. A fallback never
/// overwrites a block this structure has already placed.
fn place_all<B: WorldBackend>(
    backend: &mut B,
    structure: StructureId,
    world: WorldId,
    placements: Vec<Placement<B::Block>>,
) -> PlacementReport {
    let mut occupied = HashSet::with_capacity(placements.len());
    let mut refused = Vec::new();
    for placement in placements {
        let target = placement.target;
        match backend.place_block(world, target, placement.block.clone()) {
            Ok(()) => {
                occupied.insert(target);
            }
            Err(e) => {
                log::warn!(
                    "Structure {structure}: cannot place block at ({}, {}, {}): {e}",
                    target.x,
                    target.y,
                    target.z
                );
                refused.push(placement);
            }
        }
    }

    let mut report = PlacementReport {
        misplaced: refused.len(),
        lost: 0,
    };
    for placement in refused {
        let fallback = placement.fallback;
        let result = if occupied.contains(&fallback) {
            Err("another block of the structure is there".to_string())
        } else {
            backend
                .place_block(world, fallback, placement.fallback_block)
                .map_err(|e| e.to_string())
        };
        match result {
            Ok(()) => {
                occupied.insert(fallback);
                log::warn!(
                    "Structure {structure}: block for ({}, {}, {}) left at ({}, {}, {})",
                    placement.target.x,
                    placement.target.y,
                    placement.target.z,
                    fallback.x,
                    fallback.y,
                    fallback.z
                );
            }
            Err(reason) => {
                report.lost += 1;
                log::error!(
                    "Structure {structure}: block for ({}, {}, {}) lost, fallback ({}, {}, {}) refused: {reason}",
                    placement.target.x,
                    placement.target.y,
                    placement.target.z,
                    fallback.x,
                    fallback.y,
                    fallback.z
                );
            }
        }
    }
    report
}

/// Applies component goals to the animated blocks through the backend.
struct BackendMover<'a, B: WorldBackend> {
    structure: StructureId,
    blocks: &'a mut [AnimatedBlock<B>],
    backend: &'a mut B,
}

impl<B: WorldBackend> BackendMover<'_, B> {
    fn fail(&mut self, idx: usize, reason: String) {
        let Some(block) = self.blocks.get_mut(idx) else {
            return;
        };
        block.failed = true;
        let err = AnimationError::StepFailure {
            structure: self.structure,
            origin: block.motion.origin,
            reason,
        };
        log::warn!("{err}");
    }
}

impl<B: WorldBackend> BlockMover for BackendMover<'_, B> {
    fn block_count(&self) -> usize {
        self.blocks.len()
    }

    fn motion(&self, idx: usize) -> Option<BlockMotion> {
        self.blocks
            .get(idx)
            .filter(|b| !b.failed)
            .map(|b| b.motion)
    }

    fn apply_movement(&mut self, idx: usize, goal: Vector3Dd) {
        if !goal.is_finite() {
            self.fail(idx, format!("non-finite goal {goal}"));
            return;
        }
        let Some(block) = self.blocks.get_mut(idx) else {
            return;
        };
        let moved = match &block.entity {
            Some(entity) => self.backend.move_animated_entity(entity, goal),
            None => Ok(()),
        };
        match moved {
            Ok(()) => block.motion.current = goal,
            Err(e) => self.fail(idx, e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kind::StructureKind;
    use crate::request::test_support::request;
    use glam::{IVec2, IVec3};
    use kinetic_core::direction::{Facing, MovementDirection};
    use kinetic_core::types::WorldId;
    use kinetic_world::cell::CellState;
    use kinetic_world::{MemoryBlock, MemoryWorld};

    const W: WorldId = WorldId(0);

    fn door_cuboid() -> Cuboid {
        Cuboid::new(IVec3::new(0, 64, 0), IVec3::new(0, 66, 3))
    }

    fn skipped(req: AnimationRequestData) -> AnimationRequestData {
        AnimationRequestData::new(
            req.snapshot().clone(),
            req.duration_secs(),
            req.tick_period_ms(),
            None,
            req.cause(),
            req.action(),
            true,
        )
    }

    fn animator_for(req: AnimationRequestData) -> Animator<MemoryWorld> {
        let component = req
            .snapshot()
            .kind
            .create_component(&req)
            .expect("valid component");
        Animator::new(req, component, 16)
    }

    fn door_animator(skip: bool) -> Animator<MemoryWorld> {
        let req = request(
            StructureKind::BigDoor,
            door_cuboid(),
            IVec3::new(0, 64, 0),
            MovementDirection::Clockwise,
            false,
        );
        animator_for(if skip { skipped(req) } else { req })
    }

    fn world_with_door() -> MemoryWorld {
        let mut world = MemoryWorld::new();
        world.fill(W, &door_cuboid(), MemoryBlock::facing(1, Facing::North));
        world
    }

    fn run_to_end(animator: &mut Animator<MemoryWorld>, world: &mut MemoryWorld) -> AnimationOutcome {
        for _ in 0..animator.total_ticks() {
            if let Some(outcome) = animator.tick(world) {
                return outcome;
            }
        }
        panic!("animation did not finish");
    }

    #[test]
    fn test_prepare_swaps_blocks_for_entities() {
        let mut world = world_with_door();
        world.remove_block(W, IVec3::new(0, 65, 1)).expect("loaded");
        let mut animator = door_animator(false);
        animator.prepare(&mut world).expect("prepared");

        assert_eq!(animator.state(), AnimatorState::Running);
        assert_eq!(animator.block_count(), 11);
        assert_eq!(world.entity_count(), 11);
        assert_eq!(world.block_count(W), 0);
    }

    #[test]
    fn test_full_run_places_rotated_blocks() {
        let mut world = world_with_door();
        let mut animator = door_animator(false);
        animator.prepare(&mut world).expect("prepared");
        let outcome = run_to_end(&mut animator, &mut world);

        assert!(!outcome.cancelled);
        assert!(outcome.is_open);
        assert_eq!(
            outcome.cuboid,
            Cuboid::new(IVec3::new(-3, 64, 0), IVec3::new(0, 66, 0))
        );
        assert_eq!(world.entity_count(), 0);
        assert_eq!(world.block_count(W), 12);
        for pos in outcome.cuboid.positions() {
            let block = world.block_at(W, pos).expect("block placed");
            assert_eq!(block.facing, Facing::East);
        }
        assert_eq!(animator.state(), AnimatorState::Idle);
    }

    #[test]
    fn test_skip_completes_without_entities() {
        let mut world = world_with_door();
        let mut animator = door_animator(true);
        animator.prepare(&mut world).expect("prepared");
        assert_eq!(world.entity_count(), 0);

        let outcome = animator.complete(&mut world);
        assert_eq!(outcome.misplaced_blocks, 0);
        for pos in outcome.cuboid.positions() {
            assert_eq!(
                world.block_at(W, pos),
                Some(MemoryBlock::facing(1, Facing::East))
            );
        }
    }

    #[test]
    fn test_failed_block_still_lands() {
        let mut world = world_with_door();
        world.set_block(W, IVec3::new(0, 66, 3), MemoryBlock::new(9));
        world.poison_material(9);
        let mut animator = door_animator(false);
        animator.prepare(&mut world).expect("prepared");
        let outcome = run_to_end(&mut animator, &mut world);

        assert_eq!(outcome.failed_blocks, 1);
        assert_eq!(
            world.block_at(W, IVec3::new(-3, 66, 0)).map(|b| b.material),
            Some(9)
        );
    }

    #[test]
    fn test_cancel_restores_origin() {
        let mut world = world_with_door();
        let mut animator = door_animator(false);
        animator.prepare(&mut world).expect("prepared");
        for _ in 0..10 {
            assert!(animator.tick(&mut world).is_none());
        }
        animator.cancel_handle().cancel();
        let outcome = animator.tick(&mut world).expect("cancelled");

        assert!(outcome.cancelled);
        assert!(!outcome.is_open);
        assert_eq!(outcome.cuboid, door_cuboid());
        assert_eq!(animator.state(), AnimatorState::Cancelled);
        assert_eq!(world.entity_count(), 0);
        for pos in door_cuboid().positions() {
            assert!(world.block_at(W, pos).is_some(), "{pos:?} not restored");
        }
    }

    #[test]
    fn test_prepare_failure_rolls_back() {
        let mut world = MemoryWorld::new();
        let cuboid = Cuboid::new(IVec3::new(14, 64, 0), IVec3::new(17, 64, 0));
        world.fill(W, &cuboid, MemoryBlock::new(2));
        world.set_cell_state(W, IVec2::new(1, 0), CellState::Unloaded);

        let req = request(
            StructureKind::Portcullis { blocks_to_move: 1 },
            cuboid,
            IVec3::new(14, 64, 0),
            MovementDirection::Up,
            false,
        );
        let component = req.snapshot().kind.create_component(&req).expect("valid");
        let mut animator: Animator<MemoryWorld> = Animator::new(req, component, 16);

        assert!(matches!(
            animator.prepare(&mut world),
            Err(AnimationError::Backend(_))
        ));
        assert_eq!(animator.state(), AnimatorState::Idle);
        assert_eq!(world.entity_count(), 0);
        assert_eq!(world.block_at(W, IVec3::new(14, 64, 0)), Some(MemoryBlock::new(2)));
        assert_eq!(world.block_at(W, IVec3::new(15, 64, 0)), Some(MemoryBlock::new(2)));
    }

    #[test]
    fn test_completion_loads_destination() {
        let mut world = world_with_door();
        world.set_cell_state(W, IVec2::new(-1, 0), CellState::Unloaded);
        let mut animator = door_animator(false);
        animator.prepare(&mut world).expect("prepared");
        let outcome = run_to_end(&mut animator, &mut world);

        assert_eq!(outcome.misplaced_blocks, 0);
        assert_eq!(world.region_loads(W), 1);
        assert!(world.block_at(W, IVec3::new(-3, 64, 0)).is_some());
    }

    #[test]
    fn test_refused_placement_returns_to_origin() {
        let mut world = world_with_door();
        world.fail_placement_at(W, IVec3::new(-2, 65, 0));
        let mut animator = door_animator(true);
        animator.prepare(&mut world).expect("prepared");
        let outcome = animator.complete(&mut world);

        assert_eq!(outcome.misplaced_blocks, 1);
        assert_eq!(outcome.lost_blocks, 0);
        assert_eq!(
            world.block_at(W, IVec3::new(0, 65, 2)),
            Some(MemoryBlock::facing(1, Facing::North))
        );
        assert!(world.block_at(W, IVec3::new(-2, 65, 0)).is_none());
    }

    #[test]
    fn test_cancel_after_reorientation_restores_original_facing() {
        let mut world = world_with_door();
        let mut animator = door_animator(false);
        animator.prepare(&mut world).expect("prepared");
        // The half-way reorientation fires on tick 20.
        for _ in 0..25 {
            assert!(animator.tick(&mut world).is_none());
        }
        animator.cancel_handle().cancel();
        let outcome = animator.tick(&mut world).expect("cancelled");

        assert_eq!(outcome.misplaced_blocks, 0);
        for pos in door_cuboid().positions() {
            assert_eq!(
                world.block_at(W, pos),
                Some(MemoryBlock::facing(1, Facing::North)),
                "{pos:?}"
            );
        }
    }

    #[test]
    fn test_fallback_never_overwrites_placed_block() {
        let gate = Cuboid::new(IVec3::new(0, 60, 0), IVec3::new(0, 63, 0));
        let mut world = MemoryWorld::new();
        for (material, y) in (1..=4).zip(60..=63) {
            world.set_block(W, IVec3::new(0, y, 0), MemoryBlock::new(material));
        }
        // The block from y=62 is refused at y=64; its origin is where the
        // block from y=60 lands.
        world.fail_placement_at(W, IVec3::new(0, 64, 0));
        let req = request(
            StructureKind::Portcullis { blocks_to_move: 2 },
            gate,
            IVec3::new(0, 60, 0),
            MovementDirection::Up,
            false,
        );
        let mut animator = animator_for(skipped(req));
        animator.prepare(&mut world).expect("prepared");
        let outcome = animator.complete(&mut world);

        assert_eq!(outcome.misplaced_blocks, 1);
        assert_eq!(outcome.lost_blocks, 1);
        assert_eq!(world.block_at(W, IVec3::new(0, 62, 0)), Some(MemoryBlock::new(1)));
        assert_eq!(world.block_at(W, IVec3::new(0, 63, 0)), Some(MemoryBlock::new(2)));
        assert_eq!(world.block_at(W, IVec3::new(0, 64, 0)), None);
        assert_eq!(world.block_at(W, IVec3::new(0, 65, 0)), Some(MemoryBlock::new(4)));
        assert_eq!(world.block_count(W), 3);
    }

    #[test]
    fn test_continuous_animation_loops_until_cancelled() {
        let cloth = Cuboid::new(IVec3::new(1, 70, 0), IVec3::new(6, 72, 0));
        let mut world = MemoryWorld::new();
        world.fill(W, &cloth, MemoryBlock::new(5));
        let mut animator = animator_for(request(
            StructureKind::Flag,
            cloth,
            IVec3::new(0, 70, 0),
            MovementDirection::East,
            false,
        ));
        animator.prepare(&mut world).expect("prepared");

        let total = animator.total_ticks();
        for _ in 0..2 * total + 5 {
            assert!(animator.tick(&mut world).is_none());
        }
        assert_eq!(animator.state(), AnimatorState::Running);
        assert_eq!(animator.cycles(), 2);
        assert_eq!(animator.ticks_remaining(), total - 5);
        assert_eq!(world.entity_count(), 18);

        animator.cancel_handle().cancel();
        let outcome = animator.tick(&mut world).expect("cancelled");
        assert!(outcome.cancelled);
        assert_eq!(world.entity_count(), 0);
        for pos in cloth.positions() {
            assert_eq!(world.block_at(W, pos), Some(MemoryBlock::new(5)));
        }
    }
}
