mod game_loop;

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing::info;

use skirmish_sim::scenario::Scenario;

use crate::game_loop::LoopOptions;

#[derive(Parser)]
#[command(name = "skirmish", about = "Headless two-team arena simulation")]
struct Args {
    /// Scenario JSON file. Without one the default arena is played.
    #[arg(short, long)]
    scenario: Option<PathBuf>,

    /// Number of ticks to simulate
    #[arg(short, long, default_value_t = 600)]
    ticks: u64,

    /// RNG seed, overriding the scenario's
    #[arg(long)]
    seed: Option<u64>,

    /// Pace ticks against the wall clock
    #[arg(long)]
    realtime: bool,

    /// Pretty-print the final snapshot
    #[arg(long)]
    pretty: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let mut scenario = match &args.scenario {
        Some(path) => {
            info!(file = %path.display(), "loading scenario");
            Scenario::load(path).with_context(|| format!("loading {}", path.display()))?
        }
        None => Scenario::default(),
    };
    if let Some(seed) = args.seed {
        scenario.config.seed = seed;
    }

    let mut engine = scenario.build_engine();
    info!(
        seed = scenario.config.seed,
        entities = engine.registry().len(),
        ticks = args.ticks,
        "simulation ready"
    );

    let snapshot = game_loop::run(
        &mut engine,
        &scenario,
        LoopOptions {
            ticks: args.ticks,
            realtime: args.realtime,
        },
    );

    let json = if args.pretty {
        serde_json::to_string_pretty(&snapshot)
    } else {
        serde_json::to_string(&snapshot)
    }
    .context("serializing final snapshot")?;
    println!("{json}");

    Ok(())
}
