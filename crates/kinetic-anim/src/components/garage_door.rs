use crate::block::BlockMotion;
use crate::component::AnimationComponent;
use crate::error::AnimationError;
use crate::kind::{check_direction, invalid_direction};
use crate::request::AnimationRequestData;
use kinetic_core::cuboid::Cuboid;
use kinetic_core::direction::MovementDirection;
use kinetic_core::types::{Vector3Dd, Vector3Di};
use glam::{DVec3, IVec3};

/// Which leg of the rail a garage door animation travels.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Leg {
    /// Wall rises to the roof, then each panel slides along it.
    Opening { roof_y: i32 },
    /// Roof slab slides back to the wall, then each panel drops down it.
    Closing { wall: Cuboid },
}

/// Panels run on a chain: when opening, every block rises until it reaches
/// the row above the door and then slides in the open direction; closing
/// retraces the same rail. Every panel travels exactly the door's height.
pub struct GarageDoor {
    cuboid: Cuboid,
    pivot: Vector3Di,
    /// Open direction of the structure (the slide direction when opening).
    open: IVec3,
    leg: Leg,
    height: i32,
    step: f64,
}

impl GarageDoor {
    pub fn new(request: &AnimationRequestData) -> Result<Self, AnimationError> {
        check_direction(request, "garage doors slide toward a horizontal cardinal direction")?;
        let snapshot = request.snapshot();
        let open_direction = snapshot.open_direction;
        let cuboid = snapshot.cuboid;
        let dims = cuboid.dimensions();
        let thickness = if open_direction.is_along_z() { dims.z } else { dims.x };

        let (leg, height) = if request.is_opening() {
            if thickness != 1 {
                return Err(invalid_direction(
                    request,
                    "a closed garage door must be one block thick along its open direction",
                ));
            }
            (
                Leg::Opening {
                    roof_y: cuboid.max().y + 1,
                },
                dims.y,
            )
        } else {
            if dims.y != 1 {
                return Err(invalid_direction(
                    request,
                    "an open garage door must lie flat",
                ));
            }
            let wall = cuboid.face(open_direction.opposite());
            (Leg::Closing { wall }, thickness)
        };

        Ok(Self {
            cuboid,
            pivot: snapshot.rotation_point,
            open: open_direction.offset(),
            leg,
            height,
            step: height as f64 / request.tick_count() as f64,
        })
    }

    /// Distance of a roof block from the wall end of the slab.
    fn distance_from_wall(&self, wall: &Cuboid, pos: Vector3Di) -> i32 {
        (pos - wall.min()).dot(self.open).abs()
    }

    fn travelled(&self, ticks_elapsed: u32) -> f64 {
        (self.step * ticks_elapsed as f64).min(self.height as f64)
    }
}

impl AnimationComponent for GarageDoor {
    fn radius(&self, pos: Vector3Di) -> f64 {
        match self.leg {
            Leg::Opening { roof_y } => (roof_y - pos.y) as f64,
            Leg::Closing { wall } => self.distance_from_wall(&wall, pos) as f64,
        }
    }

    fn final_position(&self, motion: &BlockMotion) -> Vector3Di {
        let origin = motion.origin;
        match self.leg {
            Leg::Opening { roof_y } => {
                let r = roof_y - origin.y;
                IVec3::new(origin.x, roof_y, origin.z) + self.open * (self.height - r)
            }
            Leg::Closing { wall } => {
                let dist = self.distance_from_wall(&wall, origin);
                let mut pos = origin - self.open * dist;
                pos.y = origin.y - self.height + dist;
                pos
            }
        }
    }

    fn goal_position(&self, motion: &BlockMotion, elapsed: u32, _remaining: u32) -> Vector3Dd {
        let s = self.travelled(elapsed);
        let open = self.open.as_dvec3();
        match self.leg {
            Leg::Opening { roof_y } => {
                let risen = motion.start.y + s;
                let roof = roof_y as f64;
                if risen <= roof {
                    motion.start + DVec3::new(0.0, s, 0.0)
                } else {
                    DVec3::new(motion.start.x, roof, motion.start.z) + open * (risen - roof)
                }
            }
            Leg::Closing { wall } => {
                let dist = self.distance_from_wall(&wall, motion.origin) as f64;
                if s <= dist {
                    motion.start - open * s
                } else {
                    motion.start - open * dist - DVec3::new(0.0, s - dist, 0.0)
                }
            }
        }
    }

    fn potential_new_coordinates(&self) -> Cuboid {
        match self.leg {
            Leg::Opening { .. } => {
                let row = self.cuboid.face(MovementDirection::Up).moved(0, 1, 0);
                row.union(&row.moved_by(self.open * (self.height - 1)))
            }
            Leg::Closing { wall } => wall
                .moved(0, -self.height, 0)
                .union(&wall.moved(0, -1, 0)),
        }
    }

    fn new_rotation_point(&self) -> Vector3Di {
        self.pivot
    }

    fn cycle_distance(&self) -> f64 {
        self.height as f64
    }

    fn animation_range(&self) -> Cuboid {
        self.cuboid.union(&self.potential_new_coordinates())
    }
}
