use kinetic_core::cuboid::Cuboid;
use kinetic_core::direction::MovementDirection;
use kinetic_core::types::StructureId;
use kinetic_world::BackendError;
use thiserror::Error;

/// Why a toggle request was refused.
///
/// Every variant except `Backend` is raised before the world is touched;
/// `Backend` is raised after the partially prepared animation was rolled back.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ToggleError {
    #[error("structure {0} does not exist")]
    StructureNotFound(StructureId),

    #[error("structure {0} is already animating")]
    StructureBusy(StructureId),

    #[error("structure {structure} is already {}", state_word(.open))]
    AlreadyInState { structure: StructureId, open: bool },

    #[error("structure {structure} cannot move {direction}: {reason}")]
    InvalidOpenDirection {
        structure: StructureId,
        direction: MovementDirection,
        reason: &'static str,
    },

    #[error("structure {structure} has {volume} blocks, the limit is {limit}")]
    AreaTooLarge {
        structure: StructureId,
        volume: u64,
        limit: u64,
    },

    #[error("structure {structure} cannot move {distance} blocks without leaving the world")]
    DistanceTooLarge { structure: StructureId, distance: u32 },

    #[error("region {range} needed by structure {structure} is not available")]
    RegionUnavailable { structure: StructureId, range: Cuboid },

    #[error("structure {0} changed while the toggle was being prepared")]
    StateChanged(StructureId),

    #[error("backend failed while preparing structure {structure}: {source}")]
    Backend {
        structure: StructureId,
        #[source]
        source: BackendError,
    },

    #[error("the animation engine is shutting down")]
    ShuttingDown,
}

fn state_word(open: &bool) -> &'static str {
    if *open {
        "open"
    } else {
        "closed"
    }
}
