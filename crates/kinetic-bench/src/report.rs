//! Baseline files and the text rendered from scene reports.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::runner::SceneReport;

#[derive(Debug, Error)]
pub enum BenchError {
    #[error("cannot access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{} is not a valid baseline: {source}", path.display())]
    Format {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Scene reports saved as JSON, to compare later runs against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BaselineFile {
    pub label: String,
    pub scenes: Vec<SceneReport>,
}

impl BaselineFile {
    pub fn read(path: &Path) -> Result<Self, BenchError> {
        let text = std::fs::read_to_string(path).map_err(|source| BenchError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| BenchError::Format {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Write as pretty JSON, creating parent directories as needed.
    pub fn write(&self, path: &Path) -> Result<(), BenchError> {
        let io_err = |source| BenchError::Io {
            path: path.to_path_buf(),
            source,
        };
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir).map_err(io_err)?;
        }
        let text = serde_json::to_string_pretty(self).map_err(|source| BenchError::Format {
            path: path.to_path_buf(),
            source,
        })?;
        std::fs::write(path, text).map_err(io_err)
    }

    pub fn scene(&self, name: &str) -> Option<&SceneReport> {
        self.scenes.iter().find(|s| s.scene == name)
    }
}

/// A scene whose mean frame time grew past the allowed threshold.
#[derive(Debug, Clone, PartialEq)]
pub struct Regression {
    pub scene: String,
    pub baseline_ms: f64,
    pub current_ms: f64,
}

impl Regression {
    pub fn slowdown_pct(&self) -> f64 {
        (self.current_ms / self.baseline_ms - 1.0) * 100.0
    }
}

/// Scenes of `current` that are more than `threshold_pct` percent slower
/// than in `baseline`. Scenes missing from the baseline, or measured at
/// zero there, are not compared.
pub fn regressions(
    current: &[SceneReport],
    baseline: &BaselineFile,
    threshold_pct: f64,
) -> Vec<Regression> {
    current
        .iter()
        .filter_map(|report| {
            let before = baseline.scene(&report.scene)?;
            (before.frames.mean_ms > 0.0).then(|| Regression {
                scene: report.scene.clone(),
                baseline_ms: before.frames.mean_ms,
                current_ms: report.frames.mean_ms,
            })
        })
        .filter(|r| r.slowdown_pct() > threshold_pct)
        .collect()
}

fn refusal_summary(report: &SceneReport) -> String {
    if report.refusals.is_empty() {
        return "-".to_string();
    }
    report
        .refusals
        .iter()
        .map(|(kind, n)| format!("{kind} x{n}"))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Markdown table with one row per scene.
pub fn render_table(reports: &[SceneReport]) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "| scene | structures | blocks | completed | ticks/anim | cut short | refused | frame mean | frame p95 | frame max |"
    );
    let _ = writeln!(out, "|{}", "---|".repeat(10));
    for r in reports {
        let _ = writeln!(
            out,
            "| {} | {} | {} | {} | {:.1} | {} | {} | {:.3} ms | {:.3} ms | {:.3} ms |",
            r.scene,
            r.structures,
            r.blocks,
            r.completed,
            r.ticks_per_animation,
            r.cut_short,
            refusal_summary(r),
            r.frames.mean_ms,
            r.frames.p95_ms,
            r.frames.max_ms
        );
    }
    out
}

pub fn render_regressions(found: &[Regression], threshold_pct: f64) -> String {
    let mut out = String::new();
    if found.is_empty() {
        let _ = writeln!(out, "No scene slowed down by more than {threshold_pct}%.");
        return out;
    }
    let _ = writeln!(
        out,
        "{} scene(s) slowed down by more than {threshold_pct}%:",
        found.len()
    );
    for r in found {
        let _ = writeln!(
            out,
            "- {}: {:.3} ms -> {:.3} ms (+{:.1}%)",
            r.scene,
            r.baseline_ms,
            r.current_ms,
            r.slowdown_pct()
        );
    }
    out
}
