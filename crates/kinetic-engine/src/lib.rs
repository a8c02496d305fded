pub mod engine;
pub mod error;
pub mod registry;
pub mod structure;
pub mod ticker;

pub use engine::{AnimationEngine, CompletedAnimation};
pub use error::ToggleError;
pub use registry::StructureRegistry;
pub use structure::{Structure, StructureData};
pub use ticker::FixedTicker;
