//! Toggle entry point and tick driver.
//!
//! A toggle runs its pre-flight checks against a snapshot, claims the
//! structure, and prepares the animation under the backend lock. From then
//! on only `tick` (or a cancellation) touches the animation.

use crate::error::ToggleError;
use crate::registry::StructureRegistry;
use crate::structure::{Structure, StructureData};
use kinetic_anim::{
    ActionType, AnimationError, AnimationOutcome, AnimationRequestData, Animator,
    StructureSnapshot, ToggleCause,
};
use kinetic_core::config::EngineConfig;
use kinetic_core::error::ConfigError;
use kinetic_core::types::{ActorId, StructureId};
use kinetic_world::{check_region, WorldBackend};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Record of a finished (or cancelled) animation, for persistence layers.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletedAnimation {
    /// Structure state after the animation was committed.
    pub snapshot: StructureSnapshot,
    pub cause: ToggleCause,
    pub actor: Option<ActorId>,
    pub skipped: bool,
    pub cancelled: bool,
    pub failed_blocks: usize,
    pub misplaced_blocks: usize,
    pub lost_blocks: usize,
}

struct RunningAnimation<B: WorldBackend> {
    structure: Arc<Structure>,
    animator: Animator<B>,
}

/// Backend and in-flight animations share one lock so that preparing,
/// ticking and cancelling never interleave.
struct Core<B: WorldBackend> {
    backend: B,
    running: Vec<RunningAnimation<B>>,
}

pub struct AnimationEngine<B: WorldBackend> {
    config: EngineConfig,
    registry: StructureRegistry,
    core: Mutex<Core<B>>,
    completed: Mutex<Vec<CompletedAnimation>>,
    shutting_down: AtomicBool,
}

impl<B: WorldBackend> AnimationEngine<B> {
    /// Build an engine around `backend`. Fails if the config is out of range.
    pub fn new(config: EngineConfig, backend: B) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            registry: StructureRegistry::new(),
            core: Mutex::new(Core {
                backend,
                running: Vec::new(),
            }),
            completed: Mutex::new(Vec::new()),
            shutting_down: AtomicBool::new(false),
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn registry(&self) -> &StructureRegistry {
        &self.registry
    }

    fn lock_core(&self) -> MutexGuard<'_, Core<B>> {
        self.core.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Run `f` against the backend while no animation can advance.
    pub fn with_backend<R>(&self, f: impl FnOnce(&mut B) -> R) -> R {
        f(&mut self.lock_core().backend)
    }

    pub fn register(&self, data: StructureData) -> StructureId {
        let structure = self.registry.register(data);
        log::debug!(
            "Registered structure {} ({})",
            structure.id(),
            structure.kind().name()
        );
        structure.id()
    }

    pub fn running_count(&self) -> usize {
        self.lock_core().running.len()
    }

    pub fn is_animating(&self, id: StructureId) -> bool {
        self.lock_core()
            .running
            .iter()
            .any(|r| r.structure.id() == id)
    }

    /// Ticks left for the structure's running animation.
    pub fn ticks_remaining(&self, id: StructureId) -> Option<u32> {
        self.lock_core()
            .running
            .iter()
            .find(|r| r.structure.id() == id)
            .map(|r| r.animator.ticks_remaining())
    }

    /// Start animating a structure.
    ///
    /// With `skip_animation` the blocks are moved straight to their final
    /// positions before this returns.
    pub fn toggle(
        &self,
        id: StructureId,
        cause: ToggleCause,
        actor: Option<ActorId>,
        requested_duration: Option<f64>,
        skip_animation: bool,
        action: ActionType,
    ) -> Result<(), ToggleError> {
        if self.shutting_down.load(Ordering::Acquire) {
            return Err(ToggleError::ShuttingDown);
        }
        let structure = self
            .registry
            .get(id)
            .ok_or(ToggleError::StructureNotFound(id))?;
        if structure.is_busy() {
            return Err(ToggleError::StructureBusy(id));
        }

        let snapshot = structure.snapshot();
        if !snapshot.kind.is_perpetual() {
            let refused = match action {
                ActionType::Open => snapshot.is_open,
                ActionType::Close => !snapshot.is_open,
                ActionType::Toggle => false,
            };
            if refused {
                return Err(ToggleError::AlreadyInState {
                    structure: id,
                    open: snapshot.is_open,
                });
            }
        }

        let tick_period_ms = self.config.tick_period_ms;
        let build = |duration: f64| {
            AnimationRequestData::new(
                snapshot.clone(),
                duration,
                tick_period_ms,
                actor,
                cause,
                action,
                skip_animation,
            )
        };

        // The speed cap needs the travel distance, which needs a component.
        let sizing = build(self.config.default_duration_secs);
        let cycle_distance = snapshot
            .kind
            .create_component(&sizing)
            .map_err(|e| refusal(id, e))?
            .cycle_distance();

        let volume = snapshot.cuboid.volume();
        if volume > self.config.max_block_count {
            log::info!(
                "Structure {id} refused: {volume} blocks exceeds {}",
                self.config.max_block_count
            );
            return Err(ToggleError::AreaTooLarge {
                structure: id,
                volume,
                limit: self.config.max_block_count,
            });
        }

        let duration = self
            .config
            .resolve_duration(requested_duration, cycle_distance);
        let request = build(duration);
        let component = snapshot
            .kind
            .create_component(&request)
            .map_err(|e| refusal(id, e))?;
        let range = component.animation_range();

        let mut core = self.lock_core();
        let region = check_region(
            &mut core.backend,
            snapshot.world,
            &range,
            self.config.region_mode,
            self.config.region_cell_size,
        );
        if !region.is_ready() {
            log::info!("Structure {id} refused: region {range} unavailable");
            return Err(ToggleError::RegionUnavailable {
                structure: id,
                range,
            });
        }

        structure.try_begin(snapshot.revision)?;

        let mut animator = Animator::new(request, component, self.config.region_cell_size);
        if let Err(e) = animator.prepare(&mut core.backend) {
            structure.release();
            log::warn!("Structure {id} failed to prepare: {e}");
            return Err(refusal(id, e));
        }

        log::info!(
            "Structure {} ({}) {} by {:?}: {:.2}s, {} ticks{}",
            id,
            snapshot.kind.name(),
            if animator.request().is_opening() { "opening" } else { "closing" },
            cause,
            duration,
            animator.total_ticks(),
            if skip_animation { ", skipped" } else { "" }
        );

        if skip_animation {
            let outcome = animator.complete(&mut core.backend);
            drop(core);
            self.finish(&structure, animator.request(), outcome);
        } else {
            core.running.push(RunningAnimation {
                structure,
                animator,
            });
        }
        Ok(())
    }

    /// Advance every running animation by one tick. Returns how many are
    /// still running afterwards.
    ///
    /// Finished animations are committed before the next one ticks, so a
    /// panic part-way leaves only unfinished entries in the running list.
    pub fn tick(&self) -> usize {
        let mut core = self.lock_core();
        let Core { backend, running } = &mut *core;
        let mut i = 0;
        while i < running.len() {
            match running[i].animator.tick(backend) {
                Some(outcome) => {
                    let entry = running.swap_remove(i);
                    self.finish(&entry.structure, entry.animator.request(), outcome);
                }
                None => i += 1,
            }
        }
        running.len()
    }

    /// Ask a running animation to stop; the next tick restores its blocks.
    /// Returns false if the structure is not animating.
    pub fn cancel(&self, id: StructureId) -> bool {
        let core = self.lock_core();
        match core.running.iter().find(|r| r.structure.id() == id) {
            Some(entry) => {
                entry.animator.cancel_handle().cancel();
                log::debug!("Structure {id} cancellation requested");
                true
            }
            None => false,
        }
    }

    /// Remove a structure, restoring its blocks first if it is animating.
    pub fn delete_structure(&self, id: StructureId) -> Result<(), ToggleError> {
        let structure = self
            .registry
            .remove(id)
            .ok_or(ToggleError::StructureNotFound(id))?;

        let stopped = {
            let mut core = self.lock_core();
            let Core { backend, running } = &mut *core;
            match running.iter().position(|r| r.structure.id() == id) {
                Some(idx) => {
                    let mut entry = running.swap_remove(idx);
                    let outcome = entry.animator.cancel(backend);
                    Some((entry, outcome))
                }
                None => None,
            }
        };
        if let Some((entry, outcome)) = stopped {
            self.finish(&entry.structure, entry.animator.request(), outcome);
        }

        log::info!("Structure {id} ({}) deleted", structure.name());
        Ok(())
    }

    /// Stop everything in flight right away, restoring every structure.
    /// Returns the number of animations that were cancelled.
    pub fn cancel_all(&self) -> usize {
        let mut core = self.lock_core();
        let Core { backend, running } = &mut *core;
        let count = running.len();
        for mut entry in running.drain(..) {
            let outcome = entry.animator.cancel(backend);
            self.finish(&entry.structure, entry.animator.request(), outcome);
        }
        count
    }

    pub fn is_shutting_down(&self) -> bool {
        self.shutting_down.load(Ordering::Acquire)
    }

    /// Refuse new toggles and cancel everything in flight. Returns the number
    /// of animations that were cancelled.
    pub fn shutdown(&self) -> usize {
        self.shutting_down.store(true, Ordering::Release);
        let count = self.cancel_all();
        log::info!("Animation engine shut down, {count} animations cancelled");
        count
    }

    /// Take every completion record produced since the last call.
    pub fn drain_completed(&self) -> Vec<CompletedAnimation> {
        std::mem::take(&mut *self.completed.lock().unwrap_or_else(PoisonError::into_inner))
    }

    fn finish(
        &self,
        structure: &Structure,
        request: &AnimationRequestData,
        outcome: AnimationOutcome,
    ) {
        structure.commit(&outcome);
        let snapshot = structure.snapshot();
        if outcome.cancelled {
            log::info!("Structure {} restored after cancellation", snapshot.id);
        } else {
            log::info!(
                "Structure {} finished, now {} at {}",
                snapshot.id,
                if snapshot.is_open { "open" } else { "closed" },
                snapshot.cuboid
            );
        }
        if outcome.failed_blocks > 0 || outcome.misplaced_blocks > 0 {
            log::warn!(
                "Structure {}: {} blocks failed to move, {} could not be placed, {} lost",
                snapshot.id,
                outcome.failed_blocks,
                outcome.misplaced_blocks,
                outcome.lost_blocks
            );
        }

        self.completed
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(CompletedAnimation {
                snapshot,
                cause: request.cause(),
                actor: request.actor(),
                skipped: request.skip_animation(),
                cancelled: outcome.cancelled,
                failed_blocks: outcome.failed_blocks,
                misplaced_blocks: outcome.misplaced_blocks,
                lost_blocks: outcome.lost_blocks,
            });
    }
}

fn refusal(structure: StructureId, err: AnimationError) -> ToggleError {
    match err {
        AnimationError::InvalidOpenDirection {
            direction, reason, ..
        } => ToggleError::InvalidOpenDirection {
            structure,
            direction,
            reason,
        },
        AnimationError::DistanceTooLarge { distance, .. } => {
            ToggleError::DistanceTooLarge { structure, distance }
        }
        AnimationError::Backend(source) => ToggleError::Backend { structure, source },
        AnimationError::StepFailure { reason, .. } => ToggleError::Backend {
            structure,
            source: kinetic_world::BackendError::Host(reason),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::{IVec2, IVec3};
    use kinetic_anim::StructureKind;
    use kinetic_core::cuboid::Cuboid;
    use kinetic_core::direction::{Facing, MovementDirection};
    use kinetic_core::types::WorldId;
    use kinetic_world::cell::CellState;
    use kinetic_world::{MemoryBlock, MemoryWorld};

    const W: WorldId = WorldId(0);

    fn door_cuboid() -> Cuboid {
        Cuboid::new(IVec3::new(0, 64, 0), IVec3::new(0, 66, 3))
    }

    fn door_data(direction: MovementDirection) -> StructureData {
        StructureData {
            name: "door".into(),
            kind: StructureKind::BigDoor,
            world: W,
            cuboid: door_cuboid(),
            rotation_point: IVec3::new(0, 64, 0),
            is_open: false,
            open_direction: direction,
        }
    }

    fn setup(config: EngineConfig) -> (AnimationEngine<MemoryWorld>, StructureId) {
        let mut world = MemoryWorld::new();
        world.fill(W, &door_cuboid(), MemoryBlock::facing(1, Facing::North));
        let engine = AnimationEngine::new(config, world).expect("valid config");
        let id = engine.register(door_data(MovementDirection::Clockwise));
        (engine, id)
    }

    fn toggle(
        engine: &AnimationEngine<MemoryWorld>,
        id: StructureId,
        skip: bool,
    ) -> Result<(), ToggleError> {
        engine.toggle(id, ToggleCause::Player, Some(ActorId(7)), Some(2.0), skip, ActionType::Toggle)
    }

    fn blocks_in(engine: &AnimationEngine<MemoryWorld>, cuboid: &Cuboid) -> usize {
        engine.with_backend(|w| {
            cuboid
                .positions()
                .filter(|p| w.block_at(W, *p).is_some())
                .count()
        })
    }

    #[test]
    fn test_skip_open_close_roundtrip() {
        let (engine, id) = setup(EngineConfig::default());
        toggle(&engine, id, true).expect("opened");
        let structure = engine.registry().get(id).expect("registered");
        assert!(structure.is_open());
        assert!(!structure.is_busy());
        let opened = Cuboid::new(IVec3::new(-3, 64, 0), IVec3::new(0, 66, 0));
        assert_eq!(structure.cuboid(), opened);
        assert_eq!(blocks_in(&engine, &opened), 12);

        toggle(&engine, id, true).expect("closed");
        assert!(!structure.is_open());
        assert_eq!(structure.cuboid(), door_cuboid());
        assert_eq!(blocks_in(&engine, &door_cuboid()), 12);
        assert_eq!(engine.with_backend(|w| w.block_count(W)), 12);

        let completed = engine.drain_completed();
        assert_eq!(completed.len(), 2);
        assert!(completed.iter().all(|c| c.skipped && !c.cancelled));
        assert_eq!(completed[0].actor, Some(ActorId(7)));
    }

    #[test]
    fn test_back_to_back_toggle_is_busy() {
        let (engine, id) = setup(EngineConfig::default());
        toggle(&engine, id, false).expect("started");
        assert_eq!(toggle(&engine, id, false), Err(ToggleError::StructureBusy(id)));

        while engine.tick() > 0 {}
        let structure = engine.registry().get(id).expect("registered");
        assert!(structure.is_open());
        assert!(!structure.is_busy());
        toggle(&engine, id, false).expect("second toggle after completion");
    }

    #[test]
    fn test_runs_for_requested_ticks() {
        let (engine, id) = setup(EngineConfig::default());
        toggle(&engine, id, false).expect("started");
        assert_eq!(engine.ticks_remaining(id), Some(40));
        for _ in 0..39 {
            assert_eq!(engine.tick(), 1);
        }
        assert!(engine.is_animating(id));
        assert_eq!(engine.tick(), 0);
        assert!(!engine.is_animating(id));
        assert_eq!(engine.with_backend(|w| w.entity_count()), 0);

        let completed = engine.drain_completed();
        assert_eq!(completed.len(), 1);
        assert!(completed[0].snapshot.is_open);
        assert_eq!(completed[0].cause, ToggleCause::Player);
    }

    #[test]
    fn test_speed_cap_lengthens_animation() {
        let config = EngineConfig {
            max_block_speed: 1.0,
            ..EngineConfig::default()
        };
        let (engine, id) = setup(config);
        toggle(&engine, id, false).expect("started");
        // Tip travels 3 * pi / 2 blocks, so at least 4.71 s at 20 ticks/s.
        assert_eq!(engine.ticks_remaining(id), Some(94));
    }

    #[test]
    fn test_unloadable_region_is_refused() {
        let (engine, id) = setup(EngineConfig::default());
        engine.with_backend(|w| w.set_cell_state(W, IVec2::new(-1, 0), CellState::Unloadable));

        let result = toggle(&engine, id, false);
        assert!(matches!(result, Err(ToggleError::RegionUnavailable { .. })));
        let structure = engine.registry().get(id).expect("registered");
        assert!(!structure.is_open());
        assert!(!structure.is_busy());
        assert_eq!(blocks_in(&engine, &door_cuboid()), 12);
        assert_eq!(engine.with_backend(|w| w.entity_count()), 0);
    }

    #[test]
    fn test_verify_mode_refuses_unloaded_region() {
        let config = EngineConfig {
            region_mode: kinetic_core::config::RegionMode::VerifyLoaded,
            ..EngineConfig::default()
        };
        let (engine, id) = setup(config);
        engine.with_backend(|w| w.set_cell_state(W, IVec2::new(0, -1), CellState::Unloaded));
        assert!(matches!(
            toggle(&engine, id, false),
            Err(ToggleError::RegionUnavailable { .. })
        ));
        assert_eq!(engine.with_backend(|w| w.region_loads(W)), 0);
    }

    #[test]
    fn test_area_too_large() {
        let config = EngineConfig {
            max_block_count: 5,
            ..EngineConfig::default()
        };
        let (engine, id) = setup(config);
        assert_eq!(
            toggle(&engine, id, false),
            Err(ToggleError::AreaTooLarge {
                structure: id,
                volume: 12,
                limit: 5,
            })
        );
        assert_eq!(blocks_in(&engine, &door_cuboid()), 12);
    }

    #[test]
    fn test_invalid_direction_touches_nothing() {
        let mut world = MemoryWorld::new();
        world.fill(W, &door_cuboid(), MemoryBlock::new(1));
        let engine = AnimationEngine::new(EngineConfig::default(), world).expect("valid config");
        let id = engine.register(door_data(MovementDirection::North));

        assert!(matches!(
            toggle(&engine, id, false),
            Err(ToggleError::InvalidOpenDirection {
                direction: MovementDirection::North,
                ..
            })
        ));
        assert_eq!(blocks_in(&engine, &door_cuboid()), 12);
        assert!(!engine.registry().get(id).expect("registered").is_busy());
    }

    #[test]
    fn test_action_already_in_state() {
        let (engine, id) = setup(EngineConfig::default());
        let result = engine.toggle(id, ToggleCause::Redstone, None, None, false, ActionType::Close);
        assert_eq!(
            result,
            Err(ToggleError::AlreadyInState {
                structure: id,
                open: false
            })
        );
        engine
            .toggle(id, ToggleCause::Redstone, None, None, true, ActionType::Open)
            .expect("opened");
    }

    #[test]
    fn test_unknown_structure() {
        let (engine, _) = setup(EngineConfig::default());
        assert_eq!(
            toggle(&engine, StructureId(999), false),
            Err(ToggleError::StructureNotFound(StructureId(999)))
        );
    }

    #[test]
    fn test_cancel_restores_blocks() {
        let (engine, id) = setup(EngineConfig::default());
        toggle(&engine, id, false).expect("started");
        for _ in 0..5 {
            engine.tick();
        }
        assert!(engine.cancel(id));
        assert_eq!(engine.tick(), 0);

        let structure = engine.registry().get(id).expect("registered");
        assert!(!structure.is_open());
        assert!(!structure.is_busy());
        assert_eq!(blocks_in(&engine, &door_cuboid()), 12);
        let completed = engine.drain_completed();
        assert!(completed[0].cancelled);
        assert!(!engine.cancel(id));
    }

    #[test]
    fn test_delete_restores_blocks() {
        let (engine, id) = setup(EngineConfig::default());
        toggle(&engine, id, false).expect("started");
        engine.tick();
        engine.delete_structure(id).expect("deleted");

        assert!(engine.registry().is_empty());
        assert_eq!(engine.running_count(), 0);
        assert_eq!(blocks_in(&engine, &door_cuboid()), 12);
        assert_eq!(engine.with_backend(|w| w.entity_count()), 0);
        assert_eq!(
            engine.delete_structure(id),
            Err(ToggleError::StructureNotFound(id))
        );
    }

    #[test]
    fn test_failed_block_still_completes() {
        let (engine, id) = setup(EngineConfig::default());
        engine.with_backend(|w| {
            w.set_block(W, IVec3::new(0, 64, 3), MemoryBlock::new(13));
            w.poison_material(13);
        });
        toggle(&engine, id, false).expect("started");
        while engine.tick() > 0 {}

        let completed = engine.drain_completed();
        assert_eq!(completed[0].failed_blocks, 1);
        assert!(completed[0].snapshot.is_open);
        let landed = engine.with_backend(|w| w.block_at(W, IVec3::new(-3, 64, 0)));
        assert_eq!(landed.map(|b| b.material), Some(13));
    }

    #[test]
    fn test_shutdown_cancels_and_refuses() {
        let (engine, id) = setup(EngineConfig::default());
        toggle(&engine, id, false).expect("started");
        engine.tick();
        assert_eq!(engine.shutdown(), 1);
        assert_eq!(blocks_in(&engine, &door_cuboid()), 12);
        assert_eq!(toggle(&engine, id, false), Err(ToggleError::ShuttingDown));
    }

    fn flag_engine() -> (AnimationEngine<MemoryWorld>, StructureId, Cuboid) {
        let mut world = MemoryWorld::new();
        let cloth = Cuboid::new(IVec3::new(1, 70, 0), IVec3::new(6, 72, 0));
        world.fill(W, &cloth, MemoryBlock::new(5));
        let engine = AnimationEngine::new(EngineConfig::default(), world).expect("valid config");
        let id = engine.register(StructureData {
            name: "banner".into(),
            kind: StructureKind::Flag,
            world: W,
            cuboid: cloth,
            rotation_point: IVec3::new(0, 70, 0),
            is_open: false,
            open_direction: MovementDirection::East,
        });
        (engine, id, cloth)
    }

    #[test]
    fn test_flag_waves_until_cancelled() {
        let (engine, id, cloth) = flag_engine();
        toggle(&engine, id, false).expect("started");
        for _ in 0..100 {
            assert_eq!(engine.tick(), 1);
        }
        assert!(engine.is_animating(id));
        assert_eq!(engine.with_backend(|w| w.entity_count()), 18);
        assert!(engine.drain_completed().is_empty());
        assert_eq!(
            toggle(&engine, id, false),
            Err(ToggleError::StructureBusy(id))
        );

        assert!(engine.cancel(id));
        assert_eq!(engine.tick(), 0);
        let structure = engine.registry().get(id).expect("registered");
        assert!(!structure.is_open());
        assert!(!structure.is_busy());
        assert_eq!(structure.cuboid(), cloth);
        assert_eq!(blocks_in(&engine, &cloth), 18);
        assert!(engine.drain_completed()[0].cancelled);
    }

    #[test]
    fn test_skipped_flag_keeps_state() {
        let (engine, id, cloth) = flag_engine();
        toggle(&engine, id, true).expect("toggled");
        let structure = engine.registry().get(id).expect("registered");
        assert!(!structure.is_open());
        assert!(!structure.is_busy());
        assert_eq!(blocks_in(&engine, &cloth), 18);
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = EngineConfig {
            max_block_speed: 0.0,
            ..EngineConfig::default()
        };
        assert!(matches!(
            AnimationEngine::new(config, MemoryWorld::new()),
            Err(ConfigError::OutOfRange {
                field: "max_block_speed",
                ..
            })
        ));
    }

    #[test]
    fn test_unreachable_distance_is_refused() {
        let gate = Cuboid::new(IVec3::new(0, 60, 0), IVec3::new(2, 62, 0));
        let mut world = MemoryWorld::new();
        world.fill(W, &gate, MemoryBlock::new(3));
        let engine = AnimationEngine::new(EngineConfig::default(), world).expect("valid config");
        let id = engine.register(StructureData {
            name: "gate".into(),
            kind: StructureKind::Portcullis {
                blocks_to_move: u32::MAX,
            },
            world: W,
            cuboid: gate,
            rotation_point: IVec3::new(1, 60, 0),
            is_open: false,
            open_direction: MovementDirection::Up,
        });

        assert_eq!(
            toggle(&engine, id, false),
            Err(ToggleError::DistanceTooLarge {
                structure: id,
                distance: u32::MAX,
            })
        );
        assert_eq!(blocks_in(&engine, &gate), 9);
    }

    #[test]
    fn test_cancel_all_restores_everything() {
        let (engine, id) = setup(EngineConfig::default());
        toggle(&engine, id, false).expect("started");
        engine.tick();
        assert_eq!(engine.cancel_all(), 1);
        assert!(!engine.is_shutting_down());
        assert!(!engine.registry().get(id).expect("registered").is_busy());
        assert_eq!(blocks_in(&engine, &door_cuboid()), 12);
        toggle(&engine, id, true).expect("toggles again");
    }
}
