use std::{
    path::{Path, PathBuf},
    process::ExitCode,
    str::FromStr,
};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tracing_subscriber::{
    filter::LevelFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt, Layer,
};
use volley_core::{BoostPadRegistry, BotSettings, ObjectKind};

mod evaluate;
mod report;
mod scenarios;

use evaluate::{evaluate, EvaluationResult};
use report::{write_report, Summary};
use scenarios::{catalog, Scenario};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Mode {
    All,
    Ball,
    Puck,
}

impl Mode {
    fn includes(&self, scenario: &Scenario) -> bool {
        match self {
            Mode::All => true,
            Mode::Ball => scenario.world.object_kind == ObjectKind::Ball,
            Mode::Puck => scenario.world.object_kind == ObjectKind::Puck,
        }
    }
}

/// Deterministic scenario harness for the team coordination logic.
#[derive(Debug, Parser)]
#[command(name = "volley-cli")]
struct Cli {
    #[clap(long, value_enum, default_value = "all")]
    mode: Mode,

    /// Write a JSON report to this path.
    #[clap(long)]
    report: Option<PathBuf>,

    /// Bot settings file. Defaults are written to it if it does not exist.
    #[clap(long, short = 'f')]
    settings_file: Option<PathBuf>,

    #[clap(long, default_value = "info")]
    log_level: String,

    /// JSON log file, or "auto" for a timestamped file under `logs/`.
    #[clap(long)]
    log_file: Option<String>,
}

fn log_file_path(arg: &str) -> PathBuf {
    if arg != "auto" {
        return PathBuf::from(arg);
    }
    let time = chrono::Local::now().format("%Y-%m-%d_%H-%M-%S").to_string();
    PathBuf::from("logs").join(format!("volley-{time}.log"))
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(err) => {
            eprintln!("Error: {:?}", err);
            ExitCode::FAILURE
        }
    }
}

/// Returns whether every selected scenario passed.
fn run(cli: Cli) -> Result<bool> {
    let log_level = tracing::Level::from_str(&cli.log_level)
        .map_err(|_| anyhow::anyhow!("Invalid log level: {}", cli.log_level))?;

    // The guard flushes the file writer when dropped
    let mut _guard = None;
    let file_layer = match cli.log_file.as_deref().map(log_file_path) {
        Some(path) => {
            let dir = path.parent().unwrap_or(Path::new("."));
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create log directory {}", dir.display()))?;
            let Some(name) = path.file_name() else {
                anyhow::bail!("Invalid log file path: {}", path.display());
            };
            let appender = tracing_appender::rolling::never(dir, name);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            _guard = Some(guard);
            Some(
                fmt::layer()
                    .json()
                    .with_ansi(false)
                    .with_writer(writer)
                    .with_filter(LevelFilter::TRACE),
            )
        }
        None => None,
    };
    let stdout_layer = fmt::layer()
        .without_time()
        .with_filter(LevelFilter::from_level(log_level));
    tracing_subscriber::registry()
        .with(stdout_layer)
        .with(file_layer)
        .try_init()
        .context("Unable to set global tracing subscriber")?;
    if let Some(path) = cli.log_file.as_deref().map(log_file_path) {
        tracing::info!("Saving logs to {}", path.display());
    }

    let settings = match &cli.settings_file {
        Some(path) => BotSettings::load_or_insert(path)?,
        None => BotSettings::default(),
    };
    tracing::debug!("Skill profile: {:?}", settings.skill());

    let pads = BoostPadRegistry::standard();
    let results = catalog()
        .iter()
        .filter(|scenario| cli.mode.includes(scenario))
        .map(|scenario| evaluate(scenario, &settings, &pads))
        .collect::<Result<Vec<EvaluationResult>>>()?;
    let summary = Summary::new(&results);

    println!(
        "Scenarios: {} | passed: {} | failed: {} | avg_double_commit_risk: {:.3}",
        summary.total, summary.passed, summary.failed, summary.average_double_commit_risk
    );
    for result in &results {
        let state = if result.passed { "PASS" } else { "FAIL" };
        println!("[{}] {}: {}", state, result.scenario_id, result.message);
    }

    if let Some(path) = &cli.report {
        write_report(path, &results)?;
        let shown = std::fs::canonicalize(path).unwrap_or_else(|_| path.clone());
        println!("Report written to {}", shown.display());
    }

    Ok(summary.failed == 0)
}
