use glam::IVec3;
use serde::{Deserialize, Serialize};

/// Direction a structure opens in. Which values are meaningful depends on the
/// archetype (rotating doors use the rotational ones, bridges the cardinals).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum MovementDirection {
    None = 0,
    Clockwise = 1,
    Counterclockwise = 2,
    North = 3,
    East = 4,
    South = 5,
    West = 6,
    Up = 7,
    Down = 8,
}

/// The four horizontal cardinals in clockwise order starting at north.
pub const CARDINAL_DIRECTIONS: [MovementDirection; 4] = [
    MovementDirection::North,
    MovementDirection::East,
    MovementDirection::South,
    MovementDirection::West,
];

/// Rotational directions around the vertical axis.
pub const ROTATIONAL_DIRECTIONS: [MovementDirection; 2] = [
    MovementDirection::Clockwise,
    MovementDirection::Counterclockwise,
];

/// Vertical translation directions.
pub const VERTICAL_DIRECTIONS: [MovementDirection; 2] =
    [MovementDirection::Up, MovementDirection::Down];

impl MovementDirection {
    /// Unit offset for translational directions. Y-up, north = -z, east = +x.
    /// Rotational directions and `None` have a zero offset.
    pub fn offset(self) -> IVec3 {
        match self {
            MovementDirection::North => IVec3::new(0, 0, -1),
            MovementDirection::East => IVec3::new(1, 0, 0),
            MovementDirection::South => IVec3::new(0, 0, 1),
            MovementDirection::West => IVec3::new(-1, 0, 0),
            MovementDirection::Up => IVec3::new(0, 1, 0),
            MovementDirection::Down => IVec3::new(0, -1, 0),
            MovementDirection::None
            | MovementDirection::Clockwise
            | MovementDirection::Counterclockwise => IVec3::ZERO,
        }
    }

    /// The direction that undoes this one.
    pub fn opposite(self) -> Self {
        match self {
            MovementDirection::None => MovementDirection::None,
            MovementDirection::Clockwise => MovementDirection::Counterclockwise,
            MovementDirection::Counterclockwise => MovementDirection::Clockwise,
            MovementDirection::North => MovementDirection::South,
            MovementDirection::East => MovementDirection::West,
            MovementDirection::South => MovementDirection::North,
            MovementDirection::West => MovementDirection::East,
            MovementDirection::Up => MovementDirection::Down,
            MovementDirection::Down => MovementDirection::Up,
        }
    }

    pub fn is_horizontal_cardinal(self) -> bool {
        CARDINAL_DIRECTIONS.contains(&self)
    }

    pub fn is_rotational(self) -> bool {
        ROTATIONAL_DIRECTIONS.contains(&self)
    }

    pub fn is_vertical(self) -> bool {
        VERTICAL_DIRECTIONS.contains(&self)
    }

    /// True for north/south, whose motion runs along the z axis.
    pub fn is_along_z(self) -> bool {
        matches!(self, MovementDirection::North | MovementDirection::South)
    }

    /// Sign of a rotation around the vertical axis: clockwise (seen from above) is positive.
    pub fn rotation_sign(self) -> f64 {
        match self {
            MovementDirection::Clockwise => 1.0,
            MovementDirection::Counterclockwise => -1.0,
            _ => 0.0,
        }
    }

    /// The block reorientation that matches moving in this direction.
    pub fn block_rotation(self) -> Option<BlockRotation> {
        match self {
            MovementDirection::Clockwise => Some(BlockRotation::Clockwise),
            MovementDirection::Counterclockwise => Some(BlockRotation::Counterclockwise),
            MovementDirection::North => Some(BlockRotation::North),
            MovementDirection::East => Some(BlockRotation::East),
            MovementDirection::South => Some(BlockRotation::South),
            MovementDirection::West => Some(BlockRotation::West),
            MovementDirection::None | MovementDirection::Up | MovementDirection::Down => None,
        }
    }
}

impl std::fmt::Display for MovementDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{self:?}")
    }
}

/// Quarter-turn reorientation applied to a block's appearance.
///
/// `Clockwise`/`Counterclockwise` turn around the vertical axis. The cardinal
/// variants tip the block over a horizontal axis so that its top faces the
/// named direction afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BlockRotation {
    Clockwise,
    Counterclockwise,
    North,
    East,
    South,
    West,
}

/// Facing of a directional block (logs, stairs, banners).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Facing {
    #[default]
    Up,
    Down,
    North,
    East,
    South,
    West,
}

impl Facing {
    pub fn offset(self) -> IVec3 {
        match self {
            Facing::Up => IVec3::new(0, 1, 0),
            Facing::Down => IVec3::new(0, -1, 0),
            Facing::North => IVec3::new(0, 0, -1),
            Facing::East => IVec3::new(1, 0, 0),
            Facing::South => IVec3::new(0, 0, 1),
            Facing::West => IVec3::new(-1, 0, 0),
        }
    }

    fn from_offset(offset: IVec3) -> Self {
        match (offset.x, offset.y, offset.z) {
            (0, -1, 0) => Facing::Down,
            (0, 0, -1) => Facing::North,
            (1, 0, 0) => Facing::East,
            (0, 0, 1) => Facing::South,
            (-1, 0, 0) => Facing::West,
            _ => Facing::Up,
        }
    }

    /// Apply a quarter-turn reorientation.
    pub fn rotated(self, rotation: BlockRotation) -> Self {
        let v = self.offset();
        let rotated = match rotation {
            // Clockwise seen from above: north -> east -> south -> west.
            BlockRotation::Clockwise => IVec3::new(-v.z, v.y, v.x),
            BlockRotation::Counterclockwise => IVec3::new(v.z, v.y, -v.x),
            // Tipping toward north: up -> north, north -> down.
            BlockRotation::North => IVec3::new(v.x, v.z, -v.y),
            BlockRotation::South => IVec3::new(v.x, -v.z, v.y),
            BlockRotation::East => IVec3::new(v.y, -v.x, v.z),
            BlockRotation::West => IVec3::new(-v.y, v.x, v.z),
        };
        Facing::from_offset(rotated)
    }
}
