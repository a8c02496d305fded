use kinetic_core::types::{Vector3Dd, Vector3Di};
use kinetic_world::WorldBackend;

/// Kinematic state of one animated block. Plain data so components can read
/// it while the animator applies movement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlockMotion {
    /// Block position the real block was removed from.
    pub origin: Vector3Di,
    pub start: Vector3Dd,
    pub current: Vector3Dd,
    /// Archetype-specific distance from the rotation point.
    pub radius: f64,
    /// Archetype-specific angular offset at the start of the animation.
    pub start_angle: f64,
}

impl BlockMotion {
    pub fn new(origin: Vector3Di, radius: f64, start_angle: f64) -> Self {
        let start = origin.as_dvec3();
        Self {
            origin,
            start,
            current: start,
            radius,
            start_angle,
        }
    }
}

/// A block in flight: its motion, the appearance it will be placed back with,
/// and the backend entity standing in for it.
pub struct AnimatedBlock<B: WorldBackend> {
    pub motion: BlockMotion,
    /// Appearance after every reorientation fired so far.
    pub block: B::Block,
    /// Appearance as removed from the world, restored on cancellation.
    pub original: B::Block,
    /// `None` when the animation is skipped and nothing was spawned.
    pub entity: Option<B::Entity>,
    /// Set after a movement failure; the block is not moved again.
    pub failed: bool,
}

impl<B: WorldBackend> AnimatedBlock<B> {
    pub fn new(motion: BlockMotion, block: B::Block, entity: Option<B::Entity>) -> Self {
        Self {
            motion,
            original: block.clone(),
            block,
            entity,
            failed: false,
        }
    }
}

impl<B: WorldBackend> std::fmt::Debug for AnimatedBlock<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnimatedBlock")
            .field("motion", &self.motion)
            .field("block", &self.block)
            .field("original", &self.original)
            .field("entity", &self.entity)
            .field("failed", &self.failed)
            .finish()
    }
}
