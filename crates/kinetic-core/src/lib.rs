pub mod config;
pub mod constants;
pub mod cuboid;
pub mod direction;
pub mod error;
pub mod math;
pub mod types;

pub use config::{EngineConfig, RegionMode};
pub use cuboid::{Cuboid, DCuboid, Rectangle};
pub use direction::{BlockRotation, Facing, MovementDirection};
pub use error::{ConfigError, GeometryError};
pub use math::RoundingMode;
pub use types::{ActorId, CellCoord, StructureId, Vector3Dd, Vector3Di, WorldId};
