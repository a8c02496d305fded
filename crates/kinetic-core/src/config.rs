use crate::constants::*;
use crate::error::ConfigError;
use crate::math::ticks_for_duration;
use serde::{Deserialize, Serialize};

/// How the region coordinator treats unloaded cells before an animation starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RegionMode {
    /// Refuse to animate unless every covered cell is already loaded.
    VerifyLoaded,
    /// Load missing cells on demand; refuse only if a load fails.
    AttemptLoad,
}

/// Engine tuning loaded from `engine.ron`. Missing fields take their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Tick period in milliseconds.
    pub tick_period_ms: u64,
    /// Duration used when a toggle requests none, in seconds.
    pub default_duration_secs: f64,
    /// Speed cap for any single block (blocks/second). Animations that would
    /// exceed it are stretched.
    pub max_block_speed: f64,
    /// Largest structure volume that may be toggled.
    pub max_block_count: u64,
    /// Region cell side length in blocks.
    pub region_cell_size: i32,
    pub region_mode: RegionMode,
    /// Scales every animation duration (2.0 = twice as slow).
    pub time_multiplier: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            tick_period_ms: DEFAULT_TICK_PERIOD_MS,
            default_duration_secs: DEFAULT_DURATION_SECS,
            max_block_speed: DEFAULT_MAX_BLOCK_SPEED,
            max_block_count: DEFAULT_MAX_BLOCK_COUNT,
            region_cell_size: REGION_CELL_SIZE,
            region_mode: RegionMode::AttemptLoad,
            time_multiplier: 1.0,
        }
    }
}

impl EngineConfig {
    /// Parse and validate a config from a RON string.
    pub fn from_ron_str(ron_str: &str) -> Result<Self, ConfigError> {
        let options = ron::Options::default();
        let config: EngineConfig = options
            .from_str(ron_str)
            .map_err(|e| ConfigError::ParseError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check every field for a usable range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tick_period_ms == 0 {
            return Err(ConfigError::OutOfRange {
                field: "tick_period_ms",
                reason: "must be at least 1".into(),
            });
        }
        if !(self.default_duration_secs.is_finite() && self.default_duration_secs >= 0.0) {
            return Err(ConfigError::OutOfRange {
                field: "default_duration_secs",
                reason: format!("{} is not a non-negative duration", self.default_duration_secs),
            });
        }
        if !(self.max_block_speed.is_finite() && self.max_block_speed > 0.0) {
            return Err(ConfigError::OutOfRange {
                field: "max_block_speed",
                reason: format!("{} is not a positive speed", self.max_block_speed),
            });
        }
        if self.region_cell_size <= 0 {
            return Err(ConfigError::OutOfRange {
                field: "region_cell_size",
                reason: format!("{} is not positive", self.region_cell_size),
            });
        }
        if !(self.time_multiplier.is_finite() && self.time_multiplier > 0.0) {
            return Err(ConfigError::OutOfRange {
                field: "time_multiplier",
                reason: format!("{} is not a positive multiplier", self.time_multiplier),
            });
        }
        Ok(())
    }

    /// Resolve the duration of one animation in seconds.
    ///
    /// Starts from the requested (or default) duration, applies the time
    /// multiplier, then stretches it so that a block travelling
    /// `cycle_distance` blocks never exceeds `max_block_speed`.
    pub fn resolve_duration(&self, requested: Option<f64>, cycle_distance: f64) -> f64 {
        let base = requested
            .filter(|d| d.is_finite() && *d >= 0.0)
            .unwrap_or(self.default_duration_secs);
        let scaled = base * self.time_multiplier;
        let minimum = cycle_distance.max(0.0) / self.max_block_speed;
        if minimum > scaled {
            log::debug!(
                "Stretching animation from {scaled:.2}s to {minimum:.2}s to respect the block speed limit"
            );
        }
        scaled.max(minimum)
    }

    /// Number of ticks for a duration, never less than one.
    pub fn ticks_for(&self, duration_secs: f64) -> u32 {
        ticks_for_duration(duration_secs, self.tick_period_ms)
    }
}
