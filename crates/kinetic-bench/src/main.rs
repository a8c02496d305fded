use std::path::PathBuf;
use std::process::ExitCode;

use kinetic_bench::report::{self, BaselineFile};
use kinetic_bench::runner::SceneRunner;
use kinetic_bench::scenes;
use kinetic_core::config::EngineConfig;

const USAGE: &str = "\
bench-runner: time the animation engine on the standard scenes

options:
  --scene <name>       run only this scene
  --ticks <n>          ticks per scene (default 120)
  --config <file>      engine config (RON) to run with
  --save <file>        write the results as a JSON baseline
  --label <text>       label stored in the saved baseline (default \"local\")
  --baseline <file>    compare against a saved baseline
  --threshold <pct>    slowdown that counts as a regression (default 10)
  -h, --help           show this text";

#[derive(Debug, Clone, PartialEq)]
struct Options {
    scene: Option<String>,
    ticks: u32,
    config: Option<PathBuf>,
    save: Option<PathBuf>,
    label: String,
    baseline: Option<PathBuf>,
    threshold_pct: f64,
    help: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            scene: None,
            ticks: 120,
            config: None,
            save: None,
            label: "local".to_string(),
            baseline: None,
            threshold_pct: 10.0,
            help: false,
        }
    }
}

impl Options {
    /// Parse the arguments that follow the program name.
    fn parse(args: impl IntoIterator<Item = String>) -> Result<Self, String> {
        let mut opts = Options::default();
        let mut args = args.into_iter();
        while let Some(flag) = args.next() {
            let mut value = || args.next().ok_or_else(|| format!("{flag} needs a value"));
            match flag.as_str() {
                "--scene" => opts.scene = Some(value()?),
                "--ticks" => {
                    let raw = value()?;
                    opts.ticks = raw
                        .parse()
                        .map_err(|_| format!("--ticks expects a whole number, got {raw:?}"))?;
                }
                "--config" => opts.config = Some(value()?.into()),
                "--save" => opts.save = Some(value()?.into()),
                "--label" => opts.label = value()?,
                "--baseline" => opts.baseline = Some(value()?.into()),
                "--threshold" => {
                    let raw = value()?;
                    opts.threshold_pct = raw
                        .parse()
                        .ok()
                        .filter(|pct: &f64| pct.is_finite() && *pct >= 0.0)
                        .ok_or_else(|| format!("--threshold expects a percentage, got {raw:?}"))?;
                }
                "-h" | "--help" => opts.help = true,
                other => return Err(format!("unknown option {other:?}")),
            }
        }
        Ok(opts)
    }
}

/// Run the selected scenes. Returns whether any scene regressed.
fn run(opts: &Options) -> Result<bool, String> {
    let engine_config = match &opts.config {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .map_err(|e| format!("cannot read {}: {e}", path.display()))?;
            EngineConfig::from_ron_str(&text).map_err(|e| format!("{}: {e}", path.display()))?
        }
        None => EngineConfig::default(),
    };

    let selected: Vec<_> = scenes::standard_scenes()
        .into_iter()
        .filter(|s| opts.scene.as_deref().map_or(true, |name| s.name == name))
        .collect();
    if selected.is_empty() {
        return Err(format!(
            "no scene named {:?}",
            opts.scene.as_deref().unwrap_or_default()
        ));
    }

    let runner = SceneRunner::new(engine_config, opts.ticks);
    let reports = selected
        .iter()
        .map(|scene| runner.run(scene))
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| e.to_string())?;
    println!("{}", report::render_table(&reports));

    if let Some(path) = &opts.save {
        let file = BaselineFile {
            label: opts.label.clone(),
            scenes: reports.clone(),
        };
        file.write(path).map_err(|e| e.to_string())?;
        log::info!("Baseline '{}' written to {}", file.label, path.display());
    }

    let Some(path) = &opts.baseline else {
        return Ok(false);
    };
    let before = BaselineFile::read(path).map_err(|e| e.to_string())?;
    log::info!("Comparing against baseline '{}'", before.label);
    let found = report::regressions(&reports, &before, opts.threshold_pct);
    println!("{}", report::render_regressions(&found, opts.threshold_pct));
    Ok(!found.is_empty())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let opts = match Options::parse(std::env::args().skip(1)) {
        Ok(opts) => opts,
        Err(e) => {
            eprintln!("{e}\n\n{USAGE}");
            return ExitCode::from(2);
        }
    };
    if opts.help {
        println!("{USAGE}");
        return ExitCode::SUCCESS;
    }

    match run(&opts) {
        Ok(false) => ExitCode::SUCCESS,
        Ok(true) => ExitCode::FAILURE,
        Err(e) => {
            log::error!("{e}");
            ExitCode::from(2)
        }
    }
}
