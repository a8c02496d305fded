//! Mutable structure state behind a reader-writer lock.
//!
//! Nothing here hands out references into the guarded state: readers get
//! copies, writers go through methods that bump the revision.

use crate::error::ToggleError;
use kinetic_anim::{AnimationOutcome, StructureKind, StructureSnapshot};
use kinetic_core::cuboid::Cuboid;
use kinetic_core::direction::MovementDirection;
use kinetic_core::types::{StructureId, Vector3Di, WorldId};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Everything needed to register a structure.
#[derive(Debug, Clone, PartialEq)]
pub struct StructureData {
    pub name: String,
    pub kind: StructureKind,
    pub world: WorldId,
    pub cuboid: Cuboid,
    pub rotation_point: Vector3Di,
    pub is_open: bool,
    pub open_direction: MovementDirection,
}

#[derive(Debug)]
struct StructureState {
    data: StructureData,
    revision: u64,
}

#[derive(Debug)]
pub struct Structure {
    id: StructureId,
    state: RwLock<StructureState>,
    /// Set while an animation owns the structure's blocks.
    busy: AtomicBool,
}

impl Structure {
    pub fn new(id: StructureId, data: StructureData) -> Self {
        Self {
            id,
            state: RwLock::new(StructureState { data, revision: 0 }),
            busy: AtomicBool::new(false),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, StructureState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, StructureState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn id(&self) -> StructureId {
        self.id
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    /// By-value copy of the current state.
    pub fn snapshot(&self) -> StructureSnapshot {
        let state = self.read();
        StructureSnapshot {
            id: self.id,
            name: state.data.name.clone(),
            kind: state.data.kind,
            world: state.data.world,
            cuboid: state.data.cuboid,
            rotation_point: state.data.rotation_point,
            is_open: state.data.is_open,
            open_direction: state.data.open_direction,
            revision: state.revision,
        }
    }

    pub fn name(&self) -> String {
        self.read().data.name.clone()
    }

    pub fn kind(&self) -> StructureKind {
        self.read().data.kind
    }

    pub fn cuboid(&self) -> Cuboid {
        self.read().data.cuboid
    }

    pub fn rotation_point(&self) -> Vector3Di {
        self.read().data.rotation_point
    }

    pub fn is_open(&self) -> bool {
        self.read().data.is_open
    }

    pub fn open_direction(&self) -> MovementDirection {
        self.read().data.open_direction
    }

    pub fn revision(&self) -> u64 {
        self.read().revision
    }

    pub fn set_name(&self, name: impl Into<String>) {
        let mut state = self.write();
        state.data.name = name.into();
        state.revision += 1;
    }

    pub fn set_open_direction(&self, direction: MovementDirection) {
        let mut state = self.write();
        state.data.open_direction = direction;
        state.revision += 1;
    }

    pub fn set_rotation_point(&self, point: Vector3Di) {
        let mut state = self.write();
        state.data.rotation_point = point;
        state.revision += 1;
    }

    /// Claim the structure for an animation prepared from revision `expected`.
    pub(crate) fn try_begin(&self, expected: u64) -> Result<(), ToggleError> {
        let state = self.write();
        if state.revision != expected {
            return Err(ToggleError::StateChanged(self.id));
        }
        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map(|_| ())
            .map_err(|_| ToggleError::StructureBusy(self.id))
    }

    /// Give the structure back without changing it.
    pub(crate) fn release(&self) {
        self.busy.store(false, Ordering::Release);
    }

    /// Write the result of a finished animation and release the structure.
    pub(crate) fn commit(&self, outcome: &AnimationOutcome) {
        if !outcome.cancelled {
            let mut state = self.write();
            state.data.cuboid = outcome.cuboid;
            state.data.rotation_point = outcome.rotation_point;
            state.data.is_open = outcome.is_open;
            state.revision += 1;
        }
        self.release();
    }
}
