use kinetic_core::direction::MovementDirection;
use kinetic_core::types::{StructureId, Vector3Di};
use kinetic_world::BackendError;
use thiserror::Error;

/// Errors raised while building or running an animation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnimationError {
    #[error("structure {structure} ({kind}) cannot open {direction}: {reason}")]
    InvalidOpenDirection {
        structure: StructureId,
        kind: &'static str,
        direction: MovementDirection,
        reason: &'static str,
    },

    #[error("block at ({}, {}, {}) of structure {structure} failed to move: {reason}", origin.x, origin.y, origin.z)]
    StepFailure {
        structure: StructureId,
        origin: Vector3Di,
        reason: String,
    },

    #[error("structure {structure} cannot move {distance} blocks without leaving the world")]
    DistanceTooLarge { structure: StructureId, distance: u32 },

    #[error(transparent)]
    Backend(#[from] BackendError),
}
