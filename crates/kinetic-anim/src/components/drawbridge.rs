use crate::block::BlockMotion;
use crate::component::{progress, AnimationComponent};
use crate::error::AnimationError;
use crate::kind::check_direction;
use crate::request::AnimationRequestData;
use crate::schedule::OneShotSchedule;
use kinetic_core::constants::PIVOT_DISTANCE;
use kinetic_core::cuboid::Cuboid;
use kinetic_core::direction::{BlockRotation, MovementDirection};
use kinetic_core::math::{rotate_tilt_cs, rotate_tilt_quarter, tilt_angle, tilt_radius};
use kinetic_core::types::{Vector3Dd, Vector3Di};
use glam::{DVec3, IVec3};
use std::f64::consts::FRAC_PI_2;

/// Largest tilt radius of any corner of `cuboid`.
pub(crate) fn max_tilt_radius(cuboid: &Cuboid, pivot: Vector3Dd, toward: MovementDirection) -> f64 {
    cuboid
        .corners()
        .iter()
        .map(|c| tilt_radius(c.as_dvec3(), pivot, toward))
        .fold(0.0, f64::max)
}

/// Box swept by tilting `cuboid` over the axis through `pivot`: the full
/// circle of `radius` in the tilt plane, the cuboid's extent along the axis.
pub(crate) fn tilt_range(
    cuboid: &Cuboid,
    pivot: Vector3Di,
    toward: MovementDirection,
    radius: f64,
) -> Cuboid {
    let r = radius.ceil() as i32;
    let (mut min, mut max) = (cuboid.min(), cuboid.max());
    min.y = pivot.y - r;
    max.y = pivot.y + r;
    if toward.is_along_z() {
        min.z = pivot.z - r;
        max.z = pivot.z + r;
    } else {
        min.x = pivot.x - r;
        max.x = pivot.x + r;
    }
    Cuboid::new(min, max).union(cuboid)
}

/// Quarter turn over the horizontal axis through the rotation point, tipping
/// the structure toward the movement direction.
pub struct Drawbridge {
    cuboid: Cuboid,
    pivot: Vector3Di,
    pivot_d: Vector3Dd,
    direction: MovementDirection,
    rotation: Option<BlockRotation>,
    angle_step: f64,
    max_radius: f64,
    cos: f64,
    sin: f64,
}

impl Drawbridge {
    pub fn new(request: &AnimationRequestData) -> Result<Self, AnimationError> {
        check_direction(request, "drawbridges tip toward a horizontal cardinal direction")?;
        let snapshot = request.snapshot();
        let direction = request.movement_direction();
        let pivot_d = snapshot.rotation_point.as_dvec3();

        Ok(Self {
            cuboid: snapshot.cuboid,
            pivot: snapshot.rotation_point,
            pivot_d,
            direction,
            rotation: direction.block_rotation(),
            angle_step: FRAC_PI_2 / request.tick_count() as f64,
            max_radius: max_tilt_radius(&snapshot.cuboid, pivot_d, direction),
            cos: 1.0,
            sin: 0.0,
        })
    }

    /// Blocks hugging the hinge cannot follow the arc without clipping it;
    /// they drop (or rise) first and then slide.
    fn two_phase_goal(&self, motion: &BlockMotion, elapsed: u32, remaining: u32) -> Vector3Dd {
        let target = self.final_position(motion).as_dvec3();
        let t = progress(elapsed, remaining);
        if t <= 0.5 {
            let f = t * 2.0;
            DVec3::new(
                motion.start.x,
                motion.start.y + (target.y - motion.start.y) * f,
                motion.start.z,
            )
        } else {
            let f = (t - 0.5) * 2.0;
            DVec3::new(
                motion.start.x + (target.x - motion.start.x) * f,
                target.y,
                motion.start.z + (target.z - motion.start.z) * f,
            )
        }
    }
}

impl AnimationComponent for Drawbridge {
    fn radius(&self, pos: Vector3Di) -> f64 {
        tilt_radius(pos.as_dvec3(), self.pivot_d, self.direction)
    }

    fn start_angle(&self, pos: Vector3Di) -> f64 {
        tilt_angle(pos.as_dvec3(), self.pivot_d, self.direction)
    }

    fn final_position(&self, motion: &BlockMotion) -> Vector3Di {
        rotate_tilt_quarter(motion.origin, self.pivot, self.direction)
    }

    fn prepare_step(&mut self, ticks_elapsed: u32, ticks_remaining: u32) {
        let angle = if ticks_remaining == 0 {
            FRAC_PI_2
        } else {
            self.angle_step * ticks_elapsed as f64
        };
        self.cos = angle.cos();
        self.sin = angle.sin();
    }

    fn goal_position(&self, motion: &BlockMotion, elapsed: u32, remaining: u32) -> Vector3Dd {
        if motion.radius <= PIVOT_DISTANCE {
            return self.two_phase_goal(motion, elapsed, remaining);
        }
        rotate_tilt_cs(motion.start, self.pivot_d, self.direction, self.cos, self.sin)
    }

    fn rotation_schedule(&self, total_ticks: u32) -> OneShotSchedule {
        match self.rotation {
            Some(rotation) => OneShotSchedule::halfway(total_ticks, rotation),
            None => OneShotSchedule::empty(),
        }
    }

    fn potential_new_coordinates(&self) -> Cuboid {
        Cuboid::new(
            rotate_tilt_quarter(self.cuboid.min(), self.pivot, self.direction),
            rotate_tilt_quarter(self.cuboid.max(), self.pivot, self.direction),
        )
    }

    fn new_rotation_point(&self) -> Vector3Di {
        self.pivot
    }

    fn cycle_distance(&self) -> f64 {
        self.max_radius * FRAC_PI_2
    }

    fn animation_range(&self) -> Cuboid {
        tilt_range(&self.cuboid, self.pivot, self.direction, self.max_radius)
            .union(&self.potential_new_coordinates())
    }
}
