use glam::{DVec3, IVec2, IVec3};
use serde::{Deserialize, Serialize};

/// Integer block-space vector.
pub type Vector3Di = IVec3;

/// Real-valued world-space vector.
pub type Vector3Dd = DVec3;

/// Region cell coordinate in cell-space (each unit = REGION_CELL_SIZE blocks on x and z).
pub type CellCoord = IVec2;

/// Newtype for structure identifiers, unique per registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StructureId(pub u64);

impl std::fmt::Display for StructureId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Identifier of the world a structure lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct WorldId(pub u32);

/// Identifier of the player (or other actor) responsible for a toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ActorId(pub u64);
