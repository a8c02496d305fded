//! The contract every archetype's trajectory algorithm implements.

use crate::block::BlockMotion;
use crate::schedule::OneShotSchedule;
use kinetic_core::cuboid::Cuboid;
use kinetic_core::types::{Vector3Dd, Vector3Di};

/// Movement primitive the animator hands to components once per tick.
pub trait BlockMover {
    fn block_count(&self) -> usize;

    /// Motion of block `idx`, or `None` if it failed earlier and is skipped.
    fn motion(&self, idx: usize) -> Option<BlockMotion>;

    /// Move block `idx` to `goal`. Failures are recorded by the mover.
    fn apply_movement(&mut self, idx: usize, goal: Vector3Dd);
}

/// One trajectory algorithm per archetype, built from a single request.
pub trait AnimationComponent: Send {
    /// Distance metric from the rotation point, recorded per block at spawn.
    fn radius(&self, pos: Vector3Di) -> f64;

    /// Angular offset of a block at spawn.
    fn start_angle(&self, _pos: Vector3Di) -> f64 {
        0.0
    }

    /// Exact block the real block lands on once the animation completes.
    fn final_position(&self, motion: &BlockMotion) -> Vector3Di;

    /// Where a block should be after `ticks_elapsed` ticks.
    fn goal_position(&self, motion: &BlockMotion, ticks_elapsed: u32, ticks_remaining: u32)
        -> Vector3Dd;

    /// Refresh per-tick state shared by all blocks (cos/sin of the current angle, ...).
    fn prepare_step(&mut self, _ticks_elapsed: u32, _ticks_remaining: u32) {}

    /// Advance every live block by one tick.
    fn execute_animation_step(
        &mut self,
        mover: &mut dyn BlockMover,
        ticks_elapsed: u32,
        ticks_remaining: u32,
    ) {
        self.prepare_step(ticks_elapsed, ticks_remaining);
        for idx in 0..mover.block_count() {
            let Some(motion) = mover.motion(idx) else {
                continue;
            };
            let goal = self.goal_position(&motion, ticks_elapsed, ticks_remaining);
            mover.apply_movement(idx, goal);
        }
    }

    /// Reorientations to apply during an animation of `total_ticks` ticks.
    fn rotation_schedule(&self, _total_ticks: u32) -> OneShotSchedule {
        OneShotSchedule::empty()
    }

    /// Cuboid the structure occupies after completion.
    fn potential_new_coordinates(&self) -> Cuboid;

    /// Rotation point after completion.
    fn new_rotation_point(&self) -> Vector3Di;

    /// Longest distance any block travels, in blocks.
    fn cycle_distance(&self) -> f64;

    /// Cuboid the whole motion stays within.
    fn animation_range(&self) -> Cuboid;

    fn is_perpetual(&self) -> bool {
        false
    }

    /// Loop forever instead of completing when the ticks run out. The
    /// animation then ends only when it is cancelled.
    fn is_continuous(&self) -> bool {
        false
    }
}

/// Fraction of the animation completed after `ticks_elapsed` ticks, in `[0, 1]`.
pub(crate) fn progress(ticks_elapsed: u32, ticks_remaining: u32) -> f64 {
    let total = ticks_elapsed + ticks_remaining;
    if total == 0 {
        1.0
    } else {
        ticks_elapsed as f64 / total as f64
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use glam::DVec3;

    /// Mover over plain motions, recording every applied goal.
    pub struct RecordingMover {
        pub motions: Vec<BlockMotion>,
        pub skipped: Vec<bool>,
    }

    impl RecordingMover {
        pub fn new(motions: Vec<BlockMotion>) -> Self {
            let skipped = vec![false; motions.len()];
            Self { motions, skipped }
        }

        /// Spawn motions for every block of the component's structure.
        pub fn for_cuboid(component: &dyn AnimationComponent, cuboid: &Cuboid) -> Self {
            let motions = cuboid
                .positions()
                .map(|p| BlockMotion::new(p, component.radius(p), component.start_angle(p)))
                .collect();
            Self::new(motions)
        }

        pub fn current(&self, origin: Vector3Di) -> DVec3 {
            self.motions
                .iter()
                .find(|m| m.origin == origin)
                .map(|m| m.current)
                .unwrap_or(DVec3::NAN)
        }
    }

    impl BlockMover for RecordingMover {
        fn block_count(&self) -> usize {
            self.motions.len()
        }

        fn motion(&self, idx: usize) -> Option<BlockMotion> {
            if self.skipped[idx] {
                None
            } else {
                self.motions.get(idx).copied()
            }
        }

        fn apply_movement(&mut self, idx: usize, goal: Vector3Dd) {
            self.motions[idx].current = goal;
        }
    }

    /// Run a whole animation of `ticks` ticks.
    pub fn run(component: &mut dyn AnimationComponent, mover: &mut RecordingMover, ticks: u32) {
        for elapsed in 1..=ticks {
            component.execute_animation_step(mover, elapsed, ticks - elapsed);
        }
    }
}
