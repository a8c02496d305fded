use crate::block::BlockMotion;
use crate::component::AnimationComponent;
use crate::error::AnimationError;
use crate::kind::check_direction;
use crate::request::AnimationRequestData;
use kinetic_core::constants::{
    FLAG_AMPLITUDE_PER_BLOCK, FLAG_MAX_AMPLITUDE, FLAG_WAVE_LENGTH_FACTOR, FLAG_WAVE_SPEED,
};
use kinetic_core::cuboid::Cuboid;
use kinetic_core::types::{Vector3Dd, Vector3Di};
use glam::{DVec3, IVec3};

/// Sideways sine wave travelling away from the pole. The open direction is
/// the direction the cloth extends in from the rotation point.
pub struct Flag {
    cuboid: Cuboid,
    pivot: Vector3Di,
    along: IVec3,
    lateral: DVec3,
}

impl Flag {
    pub fn new(request: &AnimationRequestData) -> Result<Self, AnimationError> {
        check_direction(request, "flags extend toward a horizontal cardinal direction")?;
        let snapshot = request.snapshot();
        let direction = request.movement_direction();
        let lateral = if direction.is_along_z() {
            DVec3::X
        } else {
            DVec3::Z
        };
        Ok(Self {
            cuboid: snapshot.cuboid,
            pivot: snapshot.rotation_point,
            along: direction.offset(),
            lateral,
        })
    }

    fn distance_from_pole(&self, pos: Vector3Di) -> i32 {
        (pos - self.pivot).dot(self.along).abs()
    }
}

impl AnimationComponent for Flag {
    fn radius(&self, pos: Vector3Di) -> f64 {
        self.distance_from_pole(pos) as f64
    }

    fn final_position(&self, motion: &BlockMotion) -> Vector3Di {
        motion.origin
    }

    fn goal_position(&self, motion: &BlockMotion, elapsed: u32, _remaining: u32) -> Vector3Dd {
        let dist = motion.radius;
        let amplitude = (dist * FLAG_AMPLITUDE_PER_BLOCK).min(FLAG_MAX_AMPLITUDE);
        let phase = dist * FLAG_WAVE_LENGTH_FACTOR - elapsed as f64 * FLAG_WAVE_SPEED;
        motion.start + self.lateral * (amplitude * phase.sin())
    }

    fn potential_new_coordinates(&self) -> Cuboid {
        self.cuboid
    }

    fn new_rotation_point(&self) -> Vector3Di {
        self.pivot
    }

    fn cycle_distance(&self) -> f64 {
        0.0
    }

    fn animation_range(&self) -> Cuboid {
        if self.lateral.x != 0.0 {
            self.cuboid.grow(1, 0, 0)
        } else {
            self.cuboid.grow(0, 0, 1)
        }
    }

    fn is_perpetual(&self) -> bool {
        true
    }

    fn is_continuous(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::test_support::{run, RecordingMover};
    use crate::kind::StructureKind;
    use crate::request::test_support::request;
    use kinetic_core::direction::MovementDirection;

    fn cloth() -> Cuboid {
        Cuboid::new(IVec3::new(1, 70, 0), IVec3::new(8, 73, 0))
    }

    fn flag() -> Flag {
        let req = request(
            StructureKind::Flag,
            cloth(),
            IVec3::new(0, 70, 0),
            MovementDirection::East,
            false,
        );
        Flag::new(&req).expect("valid flag")
    }

    #[test]
    fn test_waves_sideways_within_amplitude() {
        let mut flag = flag();
        let mut mover = RecordingMover::for_cuboid(&flag, &cloth());
        for elapsed in 1..=40 {
            flag.execute_animation_step(&mut mover, elapsed, 40 - elapsed);
            for motion in &mover.motions {
                let delta = motion.current - motion.start;
                assert_eq!(delta.x, 0.0);
                assert_eq!(delta.y, 0.0);
                assert!(delta.z.abs() <= FLAG_MAX_AMPLITUDE + 1e-12);
            }
        }
    }

    #[test]
    fn test_amplitude_grows_away_from_pole() {
        let flag = flag();
        assert_eq!(flag.radius(IVec3::new(1, 71, 0)), 1.0);
        assert_eq!(flag.radius(IVec3::new(8, 71, 0)), 8.0);
        let near = BlockMotion::new(IVec3::new(1, 71, 0), 1.0, 0.0);
        let max_near = (0..100)
            .map(|t| (flag.goal_position(&near, t, 0) - near.start).z.abs())
            .fold(0.0, f64::max);
        assert!(max_near <= FLAG_AMPLITUDE_PER_BLOCK + 1e-12);
    }

    #[test]
    fn test_rests_in_place() {
        let mut flag = flag();
        assert!(flag.is_perpetual());
        assert_eq!(flag.cycle_distance(), 0.0);
        assert_eq!(flag.potential_new_coordinates(), cloth());
        let mut mover = RecordingMover::for_cuboid(&flag, &cloth());
        run(&mut flag, &mut mover, 40);
        for motion in &mover.motions {
            assert_eq!(flag.final_position(motion), motion.origin);
        }
        let range = flag.animation_range();
        assert_eq!(range.min().z, -1);
        assert_eq!(range.max().z, 1);
    }
}
