//! Axis-aligned integer cuboids and their real-valued counterpart.
//!
//! Both bounds are inclusive block coordinates: a cuboid with `min == max`
//! holds exactly one block. Every operation returns a new value.

use crate::direction::MovementDirection;
use crate::error::GeometryError;
use crate::math::RoundingMode;
use crate::types::{Vector3Dd, Vector3Di};
use glam::{DVec3, IVec2, IVec3};

/// Axis-aligned box of blocks with `min <= max` on every axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cuboid {
    min: Vector3Di,
    max: Vector3Di,
}

/// A cuboid flattened onto the x/z plane (`y` of each corner holds z).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rectangle {
    pub min: IVec2,
    pub max: IVec2,
}

impl Cuboid {
    /// Build a cuboid from any two opposite corners.
    pub fn new(a: Vector3Di, b: Vector3Di) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    /// A single-block cuboid.
    pub fn from_block(pos: Vector3Di) -> Self {
        Self { min: pos, max: pos }
    }

    pub fn min(&self) -> Vector3Di {
        self.min
    }

    pub fn max(&self) -> Vector3Di {
        self.max
    }

    /// Number of blocks along each axis.
    pub fn dimensions(&self) -> Vector3Di {
        self.max - self.min + IVec3::ONE
    }

    /// Number of blocks contained.
    pub fn volume(&self) -> u64 {
        let d = self.dimensions();
        d.x as u64 * d.y as u64 * d.z as u64
    }

    /// Continuous center (the middle of the covered space, block centers at +0.5).
    pub fn center(&self) -> Vector3Dd {
        (self.min.as_dvec3() + self.max.as_dvec3() + DVec3::ONE) * 0.5
    }

    /// Center snapped onto the block grid (rounds toward `min`).
    pub fn center_block(&self) -> Vector3Di {
        IVec3::new(
            (self.min.x + self.max.x).div_euclid(2),
            (self.min.y + self.max.y).div_euclid(2),
            (self.min.z + self.max.z).div_euclid(2),
        )
    }

    /// All 8 corners. Degenerate cuboids repeat corners.
    pub fn corners(&self) -> [Vector3Di; 8] {
        let (a, b) = (self.min, self.max);
        [
            IVec3::new(a.x, a.y, a.z),
            IVec3::new(b.x, a.y, a.z),
            IVec3::new(a.x, b.y, a.z),
            IVec3::new(b.x, b.y, a.z),
            IVec3::new(a.x, a.y, b.z),
            IVec3::new(b.x, a.y, b.z),
            IVec3::new(a.x, b.y, b.z),
            IVec3::new(b.x, b.y, b.z),
        ]
    }

    /// Drop the vertical axis.
    pub fn as_flat_rectangle(&self) -> Rectangle {
        Rectangle {
            min: IVec2::new(self.min.x, self.min.z),
            max: IVec2::new(self.max.x, self.max.z),
        }
    }

    /// Translate by the given offsets.
    pub fn moved(&self, dx: i32, dy: i32, dz: i32) -> Self {
        let offset = IVec3::new(dx, dy, dz);
        Self {
            min: self.min + offset,
            max: self.max + offset,
        }
    }

    /// Grow (positive) or shrink (negative) symmetrically on each axis.
    /// Over-shrinking flips the bounds, which the result normalizes again.
    pub fn grow(&self, dx: i32, dy: i32, dz: i32) -> Self {
        let delta = IVec3::new(dx, dy, dz);
        Self::new(self.min - delta, self.max + delta)
    }

    /// Smallest cuboid containing both.
    pub fn union(&self, other: &Cuboid) -> Self {
        Self {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    /// The one-block-thick layer of this cuboid on the `dir` side.
    /// Rotational directions and `None` return the cuboid unchanged.
    pub fn face(&self, dir: MovementDirection) -> Self {
        let (mut min, mut max) = (self.min, self.max);
        match dir {
            MovementDirection::North => max.z = min.z,
            MovementDirection::South => min.z = max.z,
            MovementDirection::West => max.x = min.x,
            MovementDirection::East => min.x = max.x,
            MovementDirection::Down => max.y = min.y,
            MovementDirection::Up => min.y = max.y,
            MovementDirection::None
            | MovementDirection::Clockwise
            | MovementDirection::Counterclockwise => {}
        }
        Self { min, max }
    }

    /// Translate by a vector.
    pub fn moved_by(&self, offset: Vector3Di) -> Self {
        self.moved(offset.x, offset.y, offset.z)
    }

    pub fn is_pos_inside(&self, pos: Vector3Di) -> bool {
        pos.cmpge(self.min).all() && pos.cmple(self.max).all()
    }

    /// Whether `pos` lies inside this cuboid grown by `margin` on every side.
    pub fn is_in_range(&self, pos: Vector3Di, margin: i32) -> Result<bool, GeometryError> {
        if margin < 0 {
            return Err(GeometryError::InvalidArgument(format!(
                "range margin must be non-negative, got {margin}"
            )));
        }
        Ok(self.grow(margin, margin, margin).is_pos_inside(pos))
    }

    /// Iterate every block position, x fastest then z then y.
    pub fn positions(&self) -> impl Iterator<Item = Vector3Di> {
        let (min, max) = (self.min, self.max);
        (min.y..=max.y).flat_map(move |y| {
            (min.z..=max.z).flat_map(move |z| (min.x..=max.x).map(move |x| IVec3::new(x, y, z)))
        })
    }
}

impl std::fmt::Display for Cuboid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[{}, {}, {}]..[{}, {}, {}]",
            self.min.x, self.min.y, self.min.z, self.max.x, self.max.y, self.max.z
        )
    }
}

/// Real-valued cuboid, used for animated extents before they are snapped to blocks.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DCuboid {
    min: Vector3Dd,
    max: Vector3Dd,
}

impl DCuboid {
    pub fn new(a: Vector3Dd, b: Vector3Dd) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    pub fn min(&self) -> Vector3Dd {
        self.min
    }

    pub fn max(&self) -> Vector3Dd {
        self.max
    }

    /// Snap onto the block grid with the given rounding policy. Inward
    /// rounding of a sub-block box collapses onto a single block.
    pub fn to_cuboid(&self, mode: RoundingMode) -> Cuboid {
        let min = IVec3::new(
            mode.round_min(self.min.x),
            mode.round_min(self.min.y),
            mode.round_min(self.min.z),
        );
        let max = IVec3::new(
            mode.round_max(self.max.x),
            mode.round_max(self.max.y),
            mode.round_max(self.max.z),
        );
        Cuboid::new(min, max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalizes_corners() {
        let cuboid = Cuboid::new(IVec3::new(0, 0, 0), IVec3::new(10, -10, 10));
        assert_eq!(cuboid.min(), IVec3::new(0, -10, 0));
        assert_eq!(cuboid.max(), IVec3::new(10, 0, 10));
        assert_eq!(cuboid.volume(), 1331);
    }

    #[test]
    fn test_min_le_max_for_arbitrary_corners() {
        let samples = [
            (IVec3::new(5, -3, 9), IVec3::new(-5, 3, -9)),
            (IVec3::new(0, 0, 0), IVec3::new(0, 0, 0)),
            (IVec3::new(-100, 7, 2), IVec3::new(3, -70, 2)),
        ];
        for (a, b) in samples {
            let c = Cuboid::new(a, b);
            assert!(c.min().cmple(c.max()).all(), "{c}");
            let d = (a - b).abs();
            assert_eq!(
                c.volume(),
                (d.x as u64 + 1) * (d.y as u64 + 1) * (d.z as u64 + 1)
            );
        }
    }

    #[test]
    fn test_move_scenario() {
        let cuboid = Cuboid::new(IVec3::new(12, 45, 68), IVec3::new(22, 65, 88));
        let moved = cuboid.moved(1, 4, 8);
        assert_eq!(moved.min(), IVec3::new(13, 49, 76));
        assert_eq!(moved.max(), IVec3::new(23, 69, 96));
        assert_eq!(moved.moved(-1, -4, -8), cuboid);
    }

    #[test]
    fn test_grow_roundtrip() {
        let cuboid = Cuboid::new(IVec3::new(-2, 0, 4), IVec3::new(6, 3, 9));
        let grown = cuboid.grow(2, 1, 3);
        assert_eq!(grown.min(), IVec3::new(-4, -1, 1));
        assert_eq!(grown.max(), IVec3::new(8, 4, 12));
        assert_eq!(grown.grow(-2, -1, -3), cuboid);
    }

    #[test]
    fn test_overshrink_stays_normalized() {
        let cuboid = Cuboid::new(IVec3::new(0, 0, 0), IVec3::new(2, 2, 2));
        let shrunk = cuboid.grow(-3, 0, 0);
        assert!(shrunk.min().cmple(shrunk.max()).all());
        assert_eq!(shrunk.min().x, -1);
        assert_eq!(shrunk.max().x, 3);
    }

    #[test]
    fn test_inside_center_and_corners() {
        let cuboid = Cuboid::new(IVec3::new(-3, 10, 4), IVec3::new(5, 14, 8));
        assert!(cuboid.is_pos_inside(cuboid.center_block()));
        for corner in cuboid.corners() {
            assert!(cuboid.is_pos_inside(corner), "{corner:?}");
        }
        let max = cuboid.max();
        let min = cuboid.min();
        for axis in [IVec3::X, IVec3::Y, IVec3::Z] {
            assert!(!cuboid.is_pos_inside(max + axis));
            assert!(!cuboid.is_pos_inside(min - axis));
        }
    }

    #[test]
    fn test_in_range() {
        let cuboid = Cuboid::new(IVec3::new(0, 0, 0), IVec3::new(4, 4, 4));
        assert_eq!(cuboid.is_in_range(cuboid.center_block(), 0), Ok(true));
        assert_eq!(cuboid.is_in_range(IVec3::new(6, 2, 2), 1), Ok(false));
        assert_eq!(cuboid.is_in_range(IVec3::new(6, 2, 2), 2), Ok(true));
        assert!(matches!(
            cuboid.is_in_range(IVec3::ZERO, -1),
            Err(GeometryError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_centers() {
        let cuboid = Cuboid::new(IVec3::new(0, 0, 0), IVec3::new(3, 0, 2));
        assert_eq!(cuboid.center(), DVec3::new(2.0, 0.5, 1.5));
        assert_eq!(cuboid.center_block(), IVec3::new(1, 0, 1));
        let rect = cuboid.as_flat_rectangle();
        assert_eq!(rect.min, IVec2::new(0, 0));
        assert_eq!(rect.max, IVec2::new(3, 2));
    }

    #[test]
    fn test_faces() {
        let cuboid = Cuboid::new(IVec3::new(0, 0, 0), IVec3::new(3, 4, 5));
        let north = cuboid.face(MovementDirection::North);
        assert_eq!(north.min(), IVec3::new(0, 0, 0));
        assert_eq!(north.max(), IVec3::new(3, 4, 0));
        let up = cuboid.face(MovementDirection::Up);
        assert_eq!(up.min(), IVec3::new(0, 4, 0));
        assert_eq!(up.volume(), 4 * 6);
        assert_eq!(cuboid.face(MovementDirection::Clockwise), cuboid);
    }

    #[test]
    fn test_positions_cover_volume() {
        let cuboid = Cuboid::new(IVec3::new(1, 2, 3), IVec3::new(3, 3, 5));
        let positions: Vec<_> = cuboid.positions().collect();
        assert_eq!(positions.len() as u64, cuboid.volume());
        assert!(positions.iter().all(|p| cuboid.is_pos_inside(*p)));
    }

    #[test]
    fn test_dcuboid_rounding() {
        let real = DCuboid::new(DVec3::new(0.4, 1.6, -0.5), DVec3::new(3.5, 4.2, 2.7));
        let nearest = real.to_cuboid(RoundingMode::Nearest);
        assert_eq!(nearest.min(), IVec3::new(0, 2, -1));
        assert_eq!(nearest.max(), IVec3::new(4, 4, 3));
        let inward = real.to_cuboid(RoundingMode::Inward);
        assert_eq!(inward.min(), IVec3::new(1, 2, 0));
        assert_eq!(inward.max(), IVec3::new(3, 4, 2));
        let outward = real.to_cuboid(RoundingMode::Outward);
        assert_eq!(outward.min(), IVec3::new(0, 1, -1));
        assert_eq!(outward.max(), IVec3::new(4, 5, 3));
    }
}
