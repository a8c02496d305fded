use crate::kind::StructureKind;
use kinetic_core::cuboid::Cuboid;
use kinetic_core::direction::MovementDirection;
use kinetic_core::math::ticks_for_duration;
use kinetic_core::types::{ActorId, StructureId, Vector3Di, WorldId};

/// What the caller asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionType {
    Open,
    Close,
    /// Open if closed, close if open.
    Toggle,
}

/// Why the toggle happened. Carried through for logging and completion reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleCause {
    Player,
    Redstone,
    Server,
}

/// Point-in-time copy of a structure's state, taken under its read lock.
#[derive(Debug, Clone, PartialEq)]
pub struct StructureSnapshot {
    pub id: StructureId,
    pub name: String,
    pub kind: StructureKind,
    pub world: WorldId,
    pub cuboid: Cuboid,
    pub rotation_point: Vector3Di,
    pub is_open: bool,
    pub open_direction: MovementDirection,
    /// Revision of the structure when the snapshot was taken.
    pub revision: u64,
}

/// Everything one animation needs, fixed at toggle time.
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationRequestData {
    snapshot: StructureSnapshot,
    duration_secs: f64,
    tick_period_ms: u64,
    actor: Option<ActorId>,
    cause: ToggleCause,
    action: ActionType,
    skip_animation: bool,
}

impl AnimationRequestData {
    pub fn new(
        snapshot: StructureSnapshot,
        duration_secs: f64,
        tick_period_ms: u64,
        actor: Option<ActorId>,
        cause: ToggleCause,
        action: ActionType,
        skip_animation: bool,
    ) -> Self {
        Self {
            snapshot,
            duration_secs,
            tick_period_ms,
            actor,
            cause,
            action,
            skip_animation,
        }
    }

    pub fn snapshot(&self) -> &StructureSnapshot {
        &self.snapshot
    }

    pub fn duration_secs(&self) -> f64 {
        self.duration_secs
    }

    pub fn tick_period_ms(&self) -> u64 {
        self.tick_period_ms
    }

    pub fn actor(&self) -> Option<ActorId> {
        self.actor
    }

    pub fn cause(&self) -> ToggleCause {
        self.cause
    }

    pub fn action(&self) -> ActionType {
        self.action
    }

    pub fn skip_animation(&self) -> bool {
        self.skip_animation
    }

    /// Total number of ticks the animation runs for.
    pub fn tick_count(&self) -> u32 {
        ticks_for_duration(self.duration_secs, self.tick_period_ms)
    }

    /// Whether this animation moves the structure toward its open state.
    /// Perpetual archetypes always count as opening.
    pub fn is_opening(&self) -> bool {
        self.snapshot.kind.is_perpetual() || !self.snapshot.is_open
    }

    /// Open flag once the animation completes.
    pub fn target_open(&self) -> bool {
        if self.snapshot.kind.is_perpetual() {
            self.snapshot.is_open
        } else {
            !self.snapshot.is_open
        }
    }

    /// Direction this particular animation moves in: the open direction when
    /// opening, its opposite when closing.
    pub fn movement_direction(&self) -> MovementDirection {
        if self.is_opening() {
            self.snapshot.open_direction
        } else {
            self.snapshot.open_direction.opposite()
        }
    }
}
