use crate::block::BlockMotion;
use crate::component::AnimationComponent;
use crate::error::AnimationError;
use crate::kind::check_direction;
use crate::request::AnimationRequestData;
use crate::schedule::OneShotSchedule;
use kinetic_core::constants::DEFAULT_QUARTER_CIRCLES;
use kinetic_core::cuboid::{Cuboid, DCuboid};
use kinetic_core::direction::{BlockRotation, MovementDirection};
use kinetic_core::math::{
    horizontal_distance, rotate_vertical_cs, rotate_vertical_quarter, RoundingMode,
};
use kinetic_core::types::{Vector3Dd, Vector3Di};
use glam::DVec3;
use std::f64::consts::FRAC_PI_2;

/// Rotation around the vertical axis through the rotation point.
///
/// Hinged doors swing one quarter turn, opening in the open direction and
/// closing in the opposite one. Revolving doors spin `quarter_circles`
/// quarter turns in the open direction on every toggle.
pub struct BigDoor {
    cuboid: Cuboid,
    pivot: Vector3Di,
    pivot_d: Vector3Dd,
    clockwise: bool,
    quarter_turns: u32,
    total_angle: f64,
    angle_step: f64,
    rotation: Option<BlockRotation>,
    revolving: bool,
    max_radius: f64,
    cos: f64,
    sin: f64,
}

impl BigDoor {
    pub fn hinged(request: &AnimationRequestData) -> Result<Self, AnimationError> {
        Self::build(request, 1, false)
    }

    pub fn revolving(
        request: &AnimationRequestData,
        quarter_circles: u32,
    ) -> Result<Self, AnimationError> {
        let quarter_turns = if quarter_circles == 0 {
            DEFAULT_QUARTER_CIRCLES
        } else {
            quarter_circles
        };
        Self::build(request, quarter_turns, true)
    }

    fn build(
        request: &AnimationRequestData,
        quarter_turns: u32,
        revolving: bool,
    ) -> Result<Self, AnimationError> {
        check_direction(request, "rotating doors turn clockwise or counterclockwise")?;
        let snapshot = request.snapshot();
        let direction = request.movement_direction();
        let total_angle = direction.rotation_sign() * quarter_turns as f64 * FRAC_PI_2;
        let pivot = snapshot.rotation_point;
        let pivot_d = pivot.as_dvec3();
        let max_radius = snapshot
            .cuboid
            .corners()
            .iter()
            .map(|c| horizontal_distance(c.as_dvec3(), pivot_d))
            .fold(0.0, f64::max);

        Ok(Self {
            cuboid: snapshot.cuboid,
            pivot,
            pivot_d,
            clockwise: direction == MovementDirection::Clockwise,
            quarter_turns,
            total_angle,
            angle_step: total_angle / request.tick_count() as f64,
            rotation: direction.block_rotation(),
            revolving,
            max_radius,
            cos: 1.0,
            sin: 0.0,
        })
    }

    fn rotate_quarters(&self, pos: Vector3Di) -> Vector3Di {
        (0..self.quarter_turns % 4).fold(pos, |p, _| {
            rotate_vertical_quarter(p, self.pivot, self.clockwise)
        })
    }
}

impl AnimationComponent for BigDoor {
    fn radius(&self, pos: Vector3Di) -> f64 {
        horizontal_distance(pos.as_dvec3(), self.pivot_d)
    }

    fn start_angle(&self, pos: Vector3Di) -> f64 {
        let rel = pos.as_dvec3() - self.pivot_d;
        rel.z.atan2(rel.x)
    }

    fn final_position(&self, motion: &BlockMotion) -> Vector3Di {
        self.rotate_quarters(motion.origin)
    }

    fn prepare_step(&mut self, ticks_elapsed: u32, ticks_remaining: u32) {
        let angle = if ticks_remaining == 0 {
            self.total_angle
        } else {
            self.angle_step * ticks_elapsed as f64
        };
        self.cos = angle.cos();
        self.sin = angle.sin();
    }

    fn goal_position(&self, motion: &BlockMotion, _elapsed: u32, _remaining: u32) -> Vector3Dd {
        rotate_vertical_cs(motion.start, self.pivot_d, self.cos, self.sin)
    }

    fn rotation_schedule(&self, total_ticks: u32) -> OneShotSchedule {
        let Some(rotation) = self.rotation else {
            return OneShotSchedule::empty();
        };
        if self.revolving {
            OneShotSchedule::per_quarter(total_ticks, self.quarter_turns, rotation)
        } else {
            OneShotSchedule::halfway(total_ticks, rotation)
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
        self.max_radius * self.total_angle.abs()
    }

    fn animation_range(&self) -> Cuboid {
        let r = self.max_radius;
        let (min_y, max_y) = (self.cuboid.min().y as f64, self.cuboid.max().y as f64);
        let swept = DCuboid::new(
            DVec3::new(self.pivot_d.x - r, min_y, self.pivot_d.z - r),
            DVec3::new(self.pivot_d.x + r, max_y, self.pivot_d.z + r),
        );
        swept.to_cuboid(RoundingMode::Outward).union(&self.cuboid)
    }

    fn is_perpetual(&self) -> bool {
        self.revolving
    }
}
