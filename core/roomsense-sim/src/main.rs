//! roomsense-sim entrypoint.
//!
//! Loads a scenario (or falls back to a built-in demo scene), captures the
//! scripted occupant path through the live sensors, then replays the capture
//! through the selected aggregation strategy at the configured cadence,
//! logging every verdict.

use std::env;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;

use clap::{Parser, ValueEnum};
use fs_err as fs;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use roomsense_core::{AggregatorKind, ReplayEvent, ReplayRunner, SceneEngine};
use roomsense_model::RecordList;

mod scenario;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum StrategyArg {
    /// Any true message in the current record.
    Max,
    /// Majority among the messages in the current record.
    Majority,
    /// Debounced raw signal, no cache.
    Debounce,
    /// Any tracked sensor's last known state.
    MaxCached,
    /// Majority across the full tracked population.
    MajorityCached,
    /// Cached presence with a debounce window on top.
    DebounceCached,
}

impl StrategyArg {
    fn to_kind(self, duration: u32) -> AggregatorKind {
        match self {
            StrategyArg::Max => AggregatorKind::Max,
            StrategyArg::Majority => AggregatorKind::Majority,
            StrategyArg::Debounce => AggregatorKind::Debounce { duration },
            StrategyArg::MaxCached => AggregatorKind::MaxWithCache,
            StrategyArg::MajorityCached => AggregatorKind::MajorityWithCache,
            StrategyArg::DebounceCached => AggregatorKind::MaxWithCacheAndDebounce { duration },
        }
    }
}

/// Scenario-driven driver for the roomsense presence simulator.
#[derive(Debug, Parser)]
#[command(name = "roomsense-sim", version)]
struct Cli {
    /// Scenario TOML file; a built-in demo scene is used when omitted.
    #[arg(long)]
    scenario: Option<PathBuf>,

    /// Aggregation strategy for the replay run.
    #[arg(long, value_enum, default_value = "max-cached")]
    strategy: StrategyArg,

    /// Debounce window in steps, for the debouncing strategies.
    #[arg(long)]
    debounce: Option<u32>,

    /// Inter-step delay override, in milliseconds.
    #[arg(long)]
    step_delay_ms: Option<u64>,

    /// Write the captured record list as JSON to this file ("-" for stdout).
    #[arg(long)]
    dump_records: Option<PathBuf>,
}

fn main() -> ExitCode {
    init_logging();

    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(error = %err, "simulation failed");
            ExitCode::FAILURE
        }
    }
}

fn init_logging() {
    let debug_enabled = env::var("ROOMSENSE_DEBUG_LOG")
        .map(|value| matches!(value.as_str(), "1" | "true" | "TRUE" | "yes" | "YES"))
        .unwrap_or(false);
    let filter = if debug_enabled {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn run(cli: Cli) -> Result<(), String> {
    let scenario = match &cli.scenario {
        Some(path) => scenario::load(path)?,
        None => {
            info!("no scenario given, using the built-in demo scene");
            scenario::demo()
        }
    };

    let samples = scenario.samples();
    let mut engine = SceneEngine::new(scenario.scene).map_err(|err| err.to_string())?;

    let room = engine.room();
    for point in &scenario.path {
        if !room.contains(point) {
            warn!(x = point.x, y = point.y, "waypoint lies outside the room");
        }
    }
    for sensor in engine.sensors() {
        info!(
            id = sensor.id(),
            x = sensor.x(),
            y = sensor.y(),
            r = sensor.radius(),
            "sensor placed"
        );
    }

    let duration = cli.debounce.unwrap_or(engine.config().debounce_duration);
    let step_delay =
        Duration::from_millis(cli.step_delay_ms.unwrap_or(engine.config().step_delay_ms));
    let kind = cli.strategy.to_kind(duration);

    engine.begin_capture();
    for point in samples {
        engine.capture_sample(point);
    }
    let Some(index) = engine.finish_capture() else {
        return Err("scenario path produced a degenerate capture (fewer than two samples)".into());
    };

    let records = &engine.record_lists()[index];
    info!(
        records = records.len(),
        captured_at = %records.captured_at(),
        "capture committed"
    );

    if let Some(target) = &cli.dump_records {
        dump_records(records, target)?;
    }

    let replay = engine.replay(index, kind).map_err(|err| err.to_string())?;
    info!(
        strategy = kind.label(),
        delay_ms = step_delay.as_millis() as u64,
        "replay starting"
    );

    let (runner, events) =
        ReplayRunner::spawn(replay, step_delay).map_err(|err| err.to_string())?;
    for event in events {
        match event {
            ReplayEvent::Step(step) => {
                info!(
                    cursor = step.cursor,
                    verdict = step.verdict,
                    x = step.record.point.x,
                    y = step.record.point.y,
                    messages = step.record.messages.len(),
                    "replay step"
                );
            }
            ReplayEvent::Finished => {
                info!("replay finished");
                break;
            }
        }
    }
    runner.stop();

    Ok(())
}

fn dump_records(records: &RecordList, target: &Path) -> Result<(), String> {
    let json = serde_json::to_string_pretty(records)
        .map_err(|err| format!("failed to serialize record list: {}", err))?;
    if target.as_os_str() == "-" {
        println!("{}", json);
        return Ok(());
    }
    fs::write(target, json)
        .map_err(|err| format!("failed to write {}: {}", target.display(), err))?;
    info!(path = %target.display(), "record list written");
    Ok(())
}
