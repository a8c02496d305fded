//! Single source of truth for shared engine constants.
//! Values that operators may want to tune live in [`crate::config::EngineConfig`];
//! these are the defaults and the fixed geometry of the animations.

/// Period of one animation tick in milliseconds (matches a 20 Hz host simulation).
pub const DEFAULT_TICK_PERIOD_MS: u64 = 50;

/// Animation duration used when a toggle does not request one, in seconds.
pub const DEFAULT_DURATION_SECS: f64 = 4.0;

/// Fastest a single animated block may travel, in blocks per second.
pub const DEFAULT_MAX_BLOCK_SPEED: f64 = 10.0;

/// Largest structure volume (in blocks) that may be toggled.
pub const DEFAULT_MAX_BLOCK_COUNT: u64 = 10_000;

/// Side length of a region cell in blocks. Cells are the unit the backend loads.
pub const REGION_CELL_SIZE: i32 = 16;

/// Blocks closer than this to a drawbridge's rotation edge move in two
/// straight phases instead of following the arc.
pub const PIVOT_DISTANCE: f64 = 1.5;

/// Number of trailing ticks during which vertical translators add half a
/// step of overshoot to close rounding gaps.
pub const END_COMPENSATION_TICKS: u32 = 5;

/// Quarter turns performed by perpetual rotators when not configured.
pub const DEFAULT_QUARTER_CIRCLES: u32 = 4;

/// Largest lateral offset of a waving flag block, in blocks.
pub const FLAG_MAX_AMPLITUDE: f64 = 0.6;

/// Lateral amplitude gained per block of distance from the flag pole.
pub const FLAG_AMPLITUDE_PER_BLOCK: f64 = 0.12;

/// Spatial frequency of the flag wave (radians per block).
pub const FLAG_WAVE_LENGTH_FACTOR: f64 = 0.6;

/// Temporal frequency of the flag wave (radians per tick).
pub const FLAG_WAVE_SPEED: f64 = 0.35;
