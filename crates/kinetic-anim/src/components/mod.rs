//! Trajectory algorithms, one per structure archetype.

mod big_door;
mod drawbridge;
mod flag;
mod garage_door;
mod portcullis;
mod windmill;

pub use big_door::BigDoor;
pub use drawbridge::Drawbridge;
pub use flag::Flag;
pub use garage_door::GarageDoor;
pub use portcullis::Portcullis;
pub use windmill::Windmill;
