use super::drawbridge::{max_tilt_radius, tilt_range};
use crate::block::BlockMotion;
use crate::component::AnimationComponent;
use crate::error::AnimationError;
use crate::kind::check_direction;
use crate::request::AnimationRequestData;
use crate::schedule::OneShotSchedule;
use kinetic_core::constants::DEFAULT_QUARTER_CIRCLES;
use kinetic_core::cuboid::Cuboid;
use kinetic_core::direction::{BlockRotation, MovementDirection};
use kinetic_core::math::{rotate_tilt_cs, rotate_tilt_quarter, tilt_angle, tilt_radius};
use kinetic_core::types::{Vector3Dd, Vector3Di};
use std::f64::consts::{FRAC_PI_2, TAU};

/// Spins the sails over a horizontal axis, always toward the open direction.
///
/// One cycle turns `quarter_circles` quarters and the spin repeats until the
/// animation is cancelled. A skipped toggle lands the sails on the pose one
/// cycle ends in.
pub struct Windmill {
    cuboid: Cuboid,
    pivot: Vector3Di,
    pivot_d: Vector3Dd,
    direction: MovementDirection,
    rotation: Option<BlockRotation>,
    quarter_circles: u32,
    total_angle: f64,
    angle_step: f64,
    max_radius: f64,
    cos: f64,
    sin: f64,
}

impl Windmill {
    pub fn new(request: &AnimationRequestData, quarter_circles: u32) -> Result<Self, AnimationError> {
        check_direction(request, "windmills turn toward a horizontal cardinal direction")?;
        let snapshot = request.snapshot();
        let direction = request.movement_direction();
        let quarter_circles = if quarter_circles == 0 {
            DEFAULT_QUARTER_CIRCLES
        } else {
            quarter_circles
        };
        let total_angle = quarter_circles as f64 * FRAC_PI_2;
        let pivot_d = snapshot.rotation_point.as_dvec3();

        Ok(Self {
            cuboid: snapshot.cuboid,
            pivot: snapshot.rotation_point,
            pivot_d,
            direction,
            rotation: direction.block_rotation(),
            quarter_circles,
            total_angle,
            angle_step: total_angle / request.tick_count() as f64,
            max_radius: max_tilt_radius(&snapshot.cuboid, pivot_d, direction),
            cos: 1.0,
            sin: 0.0,
        })
    }

    fn rotate_quarters(&self, pos: Vector3Di) -> Vector3Di {
        (0..self.quarter_circles % 4).fold(pos, |p, _| {
            rotate_tilt_quarter(p, self.pivot, self.direction)
        })
    }
}

impl AnimationComponent for Windmill {
    fn radius(&self, pos: Vector3Di) -> f64 {
        tilt_radius(pos.as_dvec3(), self.pivot_d, self.direction)
    }

    fn start_angle(&self, pos: Vector3Di) -> f64 {
        tilt_angle(pos.as_dvec3(), self.pivot_d, self.direction)
    }

    fn final_position(&self, motion: &BlockMotion) -> Vector3Di {
        self.rotate_quarters(motion.origin)
    }

    fn prepare_step(&mut self, ticks_elapsed: u32, _ticks_remaining: u32) {
        let angle = (self.angle_step * ticks_elapsed as f64).rem_euclid(TAU);
        self.cos = angle.cos();
        self.sin = angle.sin();
    }

    fn goal_position(&self, motion: &BlockMotion, _elapsed: u32, _remaining: u32) -> Vector3Dd {
        rotate_tilt_cs(motion.start, self.pivot_d, self.direction, self.cos, self.sin)
    }

    fn rotation_schedule(&self, total_ticks: u32) -> OneShotSchedule {
        match self.rotation {
            Some(rotation) => {
                OneShotSchedule::per_quarter(total_ticks, self.quarter_circles, rotation)
            }
            None => OneShotSchedule::empty(),
        }
    }

    fn potential_new_coordinates(&self) -> Cuboid {
        Cuboid::new(
            self.rotate_quarters(self.cuboid.min()),
            self.rotate_quarters(self.cuboid.max()),
        )
    }

    fn new_rotation_point(&self) -> Vector3Di {
        self.pivot
    }

    fn cycle_distance(&self) -> f64 {
        self.max_radius * self.total_angle
    }

    fn animation_range(&self) -> Cuboid {
        tilt_range(&self.cuboid, self.pivot, self.direction, self.max_radius)
    }

    fn is_perpetual(&self) -> bool {
        true
    }

    fn is_continuous(&self) -> bool {
        true
    }
}
