pub mod animator;
pub mod block;
pub mod component;
pub mod components;
pub mod error;
pub mod kind;
pub mod request;
pub mod schedule;

pub use animator::{AnimationOutcome, Animator, AnimatorState, CancelHandle};
pub use block::{AnimatedBlock, BlockMotion};
pub use component::{AnimationComponent, BlockMover};
pub use error::AnimationError;
pub use kind::StructureKind;
pub use request::{ActionType, AnimationRequestData, StructureSnapshot, ToggleCause};
pub use schedule::OneShotSchedule;
