use crate::direction::MovementDirection;
use crate::types::{CellCoord, Vector3Dd, Vector3Di};
use glam::{DVec3, IVec2, IVec3};
use serde::{Deserialize, Serialize};

/// How a real coordinate is snapped onto the block grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundingMode {
    /// Round each coordinate to the nearest integer.
    Nearest,
    /// Round toward the inside of the shape (min up, max down).
    Inward,
    /// Round toward the outside of the shape (min down, max up).
    Outward,
}

impl RoundingMode {
    /// Round a lower bound.
    pub fn round_min(self, value: f64) -> i32 {
        match self {
            RoundingMode::Nearest => value.round() as i32,
            RoundingMode::Inward => value.ceil() as i32,
            RoundingMode::Outward => value.floor() as i32,
        }
    }

    /// Round an upper bound.
    pub fn round_max(self, value: f64) -> i32 {
        match self {
            RoundingMode::Nearest => value.round() as i32,
            RoundingMode::Inward => value.floor() as i32,
            RoundingMode::Outward => value.ceil() as i32,
        }
    }
}

/// Snap a real position to the nearest block.
pub fn round_to_block(pos: Vector3Dd) -> Vector3Di {
    IVec3::new(
        pos.x.round() as i32,
        pos.y.round() as i32,
        pos.z.round() as i32,
    )
}

/// Number of ticks needed to play `duration_secs` at `tick_period_ms`, never less than one.
pub fn ticks_for_duration(duration_secs: f64, tick_period_ms: u64) -> u32 {
    let ticks = (duration_secs * 1000.0 / tick_period_ms.max(1) as f64).round();
    if ticks.is_finite() && ticks >= 1.0 {
        ticks.min(u32::MAX as f64) as u32
    } else {
        1
    }
}

/// Convert a block coordinate to the region cell containing it. Only x and z
/// participate; cells are full-height columns.
pub fn block_to_cell(pos: Vector3Di, cell_size: i32) -> CellCoord {
    IVec2::new(pos.x.div_euclid(cell_size), pos.z.div_euclid(cell_size))
}

/// Horizontal (x/z) distance between two points.
pub fn horizontal_distance(a: Vector3Dd, b: Vector3Dd) -> f64 {
    let dx = a.x - b.x;
    let dz = a.z - b.z;
    (dx * dx + dz * dz).sqrt()
}

/// Rotate `pos` around the vertical axis through `pivot`.
///
/// Positive angles turn clockwise seen from above (north towards east).
/// Pass precomputed `cos`/`sin` to avoid recomputing them per block.
pub fn rotate_vertical_cs(pos: Vector3Dd, pivot: Vector3Dd, cos: f64, sin: f64) -> Vector3Dd {
    let dx = pos.x - pivot.x;
    let dz = pos.z - pivot.z;
    DVec3::new(
        pivot.x + dx * cos - dz * sin,
        pos.y,
        pivot.z + dx * sin + dz * cos,
    )
}

/// Exact quarter turn of a block position around the vertical axis through `pivot`.
pub fn rotate_vertical_quarter(pos: Vector3Di, pivot: Vector3Di, clockwise: bool) -> Vector3Di {
    let dx = pos.x - pivot.x;
    let dz = pos.z - pivot.z;
    if clockwise {
        IVec3::new(pivot.x - dz, pos.y, pivot.z + dx)
    } else {
        IVec3::new(pivot.x + dz, pos.y, pivot.z - dx)
    }
}

/// Tip `pos` over the horizontal axis through `pivot` that is perpendicular to
/// `toward`. A positive angle moves points above the pivot toward `toward`;
/// at a quarter turn "up" becomes `toward`.
///
/// `toward` must be a horizontal cardinal; other directions return `pos` unchanged.
pub fn rotate_tilt_cs(
    pos: Vector3Dd,
    pivot: Vector3Dd,
    toward: MovementDirection,
    cos: f64,
    sin: f64,
) -> Vector3Dd {
    if !toward.is_horizontal_cardinal() {
        return pos;
    }
    let h = toward.offset().as_dvec3();
    let rel = pos - pivot;
    let s = rel.dot(h);
    let y = rel.y;
    let perp = rel - h * s - DVec3::Y * y;
    let new_s = s * cos + y * sin;
    let new_y = -s * sin + y * cos;
    pivot + perp + h * new_s + DVec3::Y * new_y
}

/// Exact quarter tip of a block position toward `toward` (see [`rotate_tilt_cs`]).
pub fn rotate_tilt_quarter(pos: Vector3Di, pivot: Vector3Di, toward: MovementDirection) -> Vector3Di {
    if !toward.is_horizontal_cardinal() {
        return pos;
    }
    let h = toward.offset();
    let rel = pos - pivot;
    let s = rel.dot(h);
    let y = rel.y;
    let perp = rel - h * s - IVec3::Y * y;
    pivot + perp + h * y + IVec3::Y * (-s)
}

/// Distance from `pos` to the horizontal tilt axis through `pivot` perpendicular to `toward`.
pub fn tilt_radius(pos: Vector3Dd, pivot: Vector3Dd, toward: MovementDirection) -> f64 {
    let rel = pos - pivot;
    let s = rel.dot(toward.offset().as_dvec3());
    (s * s + rel.y * rel.y).sqrt()
}

/// Angle of `pos` in the tilt plane, measured from "up" toward `toward`.
pub fn tilt_angle(pos: Vector3Dd, pivot: Vector3Dd, toward: MovementDirection) -> f64 {
    let rel = pos - pivot;
    let s = rel.dot(toward.offset().as_dvec3());
    s.atan2(rel.y)
}
