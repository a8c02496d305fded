use crate::block::BlockMotion;
use crate::component::AnimationComponent;
use crate::error::AnimationError;
use crate::kind::check_direction;
use crate::request::AnimationRequestData;
use kinetic_core::constants::END_COMPENSATION_TICKS;
use kinetic_core::cuboid::Cuboid;
use kinetic_core::types::{Vector3Dd, Vector3Di};
use glam::{DVec3, IVec3};

/// Straight vertical translation.
///
/// Moves `blocks_to_move` blocks (the structure's height when zero) up or
/// down. During the last few ticks half a step is added to catch up with
/// rounding drift; the offset never exceeds the total distance. Distances
/// that would carry any block outside the coordinate range are refused.
pub struct Portcullis {
    cuboid: Cuboid,
    pivot: Vector3Di,
    distance: i32,
    /// Signed vertical offset in blocks.
    offset: i32,
    step: f64,
}

impl Portcullis {
    pub fn new(request: &AnimationRequestData, blocks_to_move: u32) -> Result<Self, AnimationError> {
        check_direction(request, "portcullises only move up or down")?;
        let snapshot = request.snapshot();
        let too_far = || AnimationError::DistanceTooLarge {
            structure: snapshot.id,
            distance: blocks_to_move,
        };
        let distance = if blocks_to_move == 0 {
            snapshot.cuboid.dimensions().y
        } else {
            i32::try_from(blocks_to_move).map_err(|_| too_far())?
        };
        let offset = request.movement_direction().offset().y * distance;
        let in_range = [
            snapshot.cuboid.min().y,
            snapshot.cuboid.max().y,
            snapshot.rotation_point.y,
        ]
        .iter()
        .all(|y| y.checked_add(offset).is_some());
        if !in_range {
            return Err(too_far());
        }

        Ok(Self {
            cuboid: snapshot.cuboid,
            pivot: snapshot.rotation_point,
            distance,
            offset,
            step: offset as f64 / request.tick_count() as f64,
        })
    }

    fn vertical_offset(&self, ticks_elapsed: u32, ticks_remaining: u32) -> f64 {
        let mut moved = self.step * ticks_elapsed as f64;
        if ticks_remaining < END_COMPENSATION_TICKS {
            moved += self.step / 2.0;
        }
        let total = self.offset as f64;
        if total >= 0.0 {
            moved.min(total)
        } else {
            moved.max(total)
        }
    }
}

impl AnimationComponent for Portcullis {
    fn radius(&self, pos: Vector3Di) -> f64 {
        (pos.y - self.cuboid.min().y) as f64
    }

    fn final_position(&self, motion: &BlockMotion) -> Vector3Di {
        motion.origin + IVec3::new(0, self.offset, 0)
    }

    fn goal_position(&self, motion: &BlockMotion, elapsed: u32, remaining: u32) -> Vector3Dd {
        motion.start + DVec3::new(0.0, self.vertical_offset(elapsed, remaining), 0.0)
    }

    fn potential_new_coordinates(&self) -> Cuboid {
        self.cuboid.moved(0, self.offset, 0)
    }

    fn new_rotation_point(&self) -> Vector3Di {
        self.pivot + IVec3::new(0, self.offset, 0)
    }

    fn cycle_distance(&self) -> f64 {
        self.distance as f64
    }

    fn animation_range(&self) -> Cuboid {
        self.cuboid.union(&self.potential_new_coordinates())
    }
}
