//! Drives one scene through the engine and measures it.

use std::collections::{BTreeMap, HashMap};
use std::time::Instant;

use kinetic_anim::{ActionType, ToggleCause};
use kinetic_core::config::EngineConfig;
use kinetic_core::error::ConfigError;
use kinetic_core::types::StructureId;
use kinetic_engine::{AnimationEngine, CompletedAnimation, ToggleError};
use serde::{Deserialize, Serialize};

use crate::scenes::{self, SceneConfig};

/// Wall-clock cost of the engine ticks of one scene, in milliseconds.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FrameStats {
    pub mean_ms: f64,
    pub median_ms: f64,
    pub p95_ms: f64,
    pub max_ms: f64,
}

impl FrameStats {
    /// Summarize raw frame times. An empty run yields all zeros.
    pub fn from_samples(samples: &[f64]) -> Self {
        let mut sorted = samples.to_vec();
        sorted.sort_by(f64::total_cmp);
        let Some(&max_ms) = sorted.last() else {
            return Self::default();
        };
        let n = sorted.len();
        let mid = n / 2;
        let median_ms = if n % 2 == 1 {
            sorted[mid]
        } else {
            (sorted[mid - 1] + sorted[mid]) / 2.0
        };
        // Nearest-rank percentile.
        let rank = (0.95 * n as f64).ceil() as usize;
        Self {
            mean_ms: sorted.iter().sum::<f64>() / n as f64,
            median_ms,
            p95_ms: sorted[rank.clamp(1, n) - 1],
            max_ms,
        }
    }
}

/// What one scene did and how long its ticks took.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneReport {
    pub scene: String,
    pub structures: u32,
    pub blocks: u64,
    pub ticks: u32,
    /// Animations that ran to completion.
    pub completed: u32,
    /// Mean number of ticks from toggle to completion.
    pub ticks_per_animation: f64,
    /// Animations cancelled at the end of the run, continuous ones included.
    pub cut_short: u32,
    /// Refused toggles, keyed by refusal kind.
    pub refusals: BTreeMap<String, u32>,
    pub frames: FrameStats,
}

impl SceneReport {
    pub fn refused(&self) -> u32 {
        self.refusals.values().sum()
    }
}

/// Short stable name for a refusal, used as the key of [`SceneReport::refusals`].
pub fn refusal_kind(err: &ToggleError) -> &'static str {
    match err {
        ToggleError::StructureNotFound(_) => "not-found",
        ToggleError::StructureBusy(_) => "busy",
        ToggleError::AlreadyInState { .. } => "already-in-state",
        ToggleError::InvalidOpenDirection { .. } => "invalid-direction",
        ToggleError::AreaTooLarge { .. } => "area-too-large",
        ToggleError::DistanceTooLarge { .. } => "distance-too-large",
        ToggleError::RegionUnavailable { .. } => "region-unavailable",
        ToggleError::StateChanged(_) => "state-changed",
        ToggleError::Backend { .. } => "backend",
        ToggleError::ShuttingDown => "shutting-down",
    }
}

/// Runs scenes on an in-memory world. Every idle structure is toggled again
/// on each tick, so a scene keeps the engine as busy as it can get.
pub struct SceneRunner {
    engine_config: EngineConfig,
    ticks: u32,
}

impl SceneRunner {
    pub fn new(engine_config: EngineConfig, ticks: u32) -> Self {
        Self {
            engine_config,
            ticks,
        }
    }

    pub fn run(&self, scene: &SceneConfig) -> Result<SceneReport, ConfigError> {
        let (world, structures) = scenes::build_scene(scene);
        let blocks = structures.iter().map(|s| s.cuboid.volume()).sum();
        let engine = AnimationEngine::new(self.engine_config.clone(), world)?;
        let ids: Vec<StructureId> = structures.into_iter().map(|s| engine.register(s)).collect();
        log::info!(
            "Scene '{}': {} x {}, {blocks} blocks",
            scene.name,
            ids.len(),
            scene.kind.name()
        );

        let mut tally = Tally::default();
        let mut frames = Vec::with_capacity(self.ticks as usize);
        for tick in 0..self.ticks {
            let started = Instant::now();
            for &id in &ids {
                if engine.is_animating(id) {
                    continue;
                }
                let result = engine.toggle(
                    id,
                    ToggleCause::Server,
                    None,
                    Some(scene.duration_secs),
                    false,
                    ActionType::Toggle,
                );
                match result {
                    Ok(()) => {
                        tally.toggled_at.insert(id, tick);
                    }
                    Err(e) => {
                        log::debug!("Scene '{}': {e}", scene.name);
                        *tally.refusals.entry(refusal_kind(&e).to_string()).or_default() += 1;
                    }
                }
            }
            engine.tick();
            frames.push(started.elapsed().as_secs_f64() * 1000.0);
            tally.record(tick, engine.drain_completed());
        }

        let cut_short = engine.shutdown() as u32;
        let report = SceneReport {
            scene: scene.name.to_string(),
            structures: ids.len() as u32,
            blocks,
            ticks: self.ticks,
            completed: tally.completed,
            ticks_per_animation: tally.mean_ticks(),
            cut_short,
            refusals: tally.refusals,
            frames: FrameStats::from_samples(&frames),
        };
        log::info!(
            "Scene '{}': {} completed, {} cut short, mean frame {:.3} ms",
            report.scene,
            report.completed,
            report.cut_short,
            report.frames.mean_ms
        );
        Ok(report)
    }
}

#[derive(Default)]
struct Tally {
    toggled_at: HashMap<StructureId, u32>,
    completed: u32,
    animation_ticks: u64,
    refusals: BTreeMap<String, u32>,
}

impl Tally {
    /// Count animations that finished during tick `tick` (0-based).
    fn record(&mut self, tick: u32, finished: Vec<CompletedAnimation>) {
        for done in finished.iter().filter(|c| !c.cancelled) {
            self.completed += 1;
            if let Some(start) = self.toggled_at.remove(&done.snapshot.id) {
                self.animation_ticks += u64::from(tick - start + 1);
            }
        }
    }

    fn mean_ticks(&self) -> f64 {
        if self.completed == 0 {
            0.0
        } else {
            self.animation_ticks as f64 / self.completed as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kinetic_anim::StructureKind;
    use kinetic_core::direction::MovementDirection;

    fn gate_scene(duration_secs: f64) -> SceneConfig {
        SceneConfig {
            name: "tiny-gate",
            kind: StructureKind::Portcullis { blocks_to_move: 2 },
            open_direction: MovementDirection::Up,
            copies: 2,
            width: 3,
            height: 3,
            duration_secs,
        }
    }

    #[test]
    fn test_frame_stats() {
        assert_eq!(FrameStats::from_samples(&[]), FrameStats::default());

        let samples: Vec<f64> = (1..=20).rev().map(f64::from).collect();
        let stats = FrameStats::from_samples(&samples);
        assert!((stats.mean_ms - 10.5).abs() < 1e-9);
        assert!((stats.median_ms - 10.5).abs() < 1e-9);
        assert_eq!(stats.p95_ms, 19.0);
        assert_eq!(stats.max_ms, 20.0);

        assert_eq!(FrameStats::from_samples(&[3.0, 1.0, 2.0]).median_ms, 2.0);
    }

    #[test]
    fn test_run_counts_ticks_per_animation() {
        // 0.25 s at 50 ms per tick is 5 ticks per animation.
        let runner = SceneRunner::new(EngineConfig::default(), 20);
        let report = runner.run(&gate_scene(0.25)).expect("valid config");

        assert_eq!(report.scene, "tiny-gate");
        assert_eq!(report.structures, 2);
        assert_eq!(report.blocks, 18);
        assert_eq!(report.ticks, 20);
        assert_eq!(report.refused(), 0);
        assert_eq!(report.completed, 8);
        assert_eq!(report.ticks_per_animation, 5.0);
        assert_eq!(report.cut_short, 0);
    }

    #[test]
    fn test_refusals_grouped_by_kind() {
        let config = EngineConfig {
            max_block_count: 4,
            ..EngineConfig::default()
        };
        let report = SceneRunner::new(config, 3)
            .run(&gate_scene(0.25))
            .expect("valid config");
        assert_eq!(report.completed, 0);
        assert_eq!(report.refusals.get("area-too-large"), Some(&6));
        assert_eq!(report.refused(), 6);
    }

    #[test]
    fn test_continuous_scene_is_cut_short() {
        let scene = SceneConfig {
            name: "flag",
            kind: StructureKind::Flag,
            open_direction: MovementDirection::East,
            copies: 1,
            width: 6,
            height: 3,
            duration_secs: 0.25,
        };
        let report = SceneRunner::new(EngineConfig::default(), 20)
            .run(&scene)
            .expect("valid config");
        assert_eq!(report.completed, 0);
        assert_eq!(report.cut_short, 1);
    }

    #[test]
    fn test_invalid_engine_config() {
        let config = EngineConfig {
            tick_period_ms: 0,
            ..EngineConfig::default()
        };
        assert!(SceneRunner::new(config, 1).run(&gate_scene(0.25)).is_err());
    }
}
