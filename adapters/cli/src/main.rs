#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Headless command-line adapter that runs a Machines TD session.

mod config;
mod map_file;
mod script;

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use machines_td_core::{Command, Event, MapId, TICKS_PER_SECOND};
use machines_td_runtime::{Simulation, SimulationConfig};
use machines_td_system_pathfinding::find_routes;
use machines_td_world::query;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::{config::SessionConfig, map_file::CustomMap, script::InputScript};

/// Command-line arguments accepted by the runner.
#[derive(Debug, Parser)]
#[command(name = "machines-td", about = "Runs a headless Machines TD session")]
struct CliArgs {
    /// Starts playing this map right away instead of waiting on the menus.
    #[arg(long, value_enum)]
    map: Option<MapArg>,
    /// Number of ticks to simulate.
    #[arg(long, default_value_t = 60 * u64::from(TICKS_PER_SECOND))]
    ticks: u64,
    /// Input script replayed one frame per tick.
    #[arg(long)]
    script: Option<PathBuf>,
    /// Custom map painted into the editor region before the session starts.
    #[arg(long)]
    custom_map: Option<PathBuf>,
    /// TOML file overriding the wave settings.
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum MapArg {
    Map1,
    Map2,
    Custom,
}

impl From<MapArg> for MapId {
    fn from(value: MapArg) -> Self {
        match value {
            MapArg::Map1 => MapId::Map1,
            MapArg::Map2 => MapId::Map2,
            MapArg::Custom => MapId::Custom,
        }
    }
}

/// Entry point for the Machines TD command-line interface.
fn main() -> Result<()> {
    init_tracing();
    let args = CliArgs::parse();

    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => SimulationConfig::default(),
    };
    let script = match &args.script {
        Some(path) => load_script(path)?,
        None => InputScript::default(),
    };

    let mut simulation = Simulation::new(config);
    if let Some(path) = &args.custom_map {
        let map = load_custom_map(path)?;
        for command in map.paint_commands() {
            let _ = simulation.execute(command);
        }
        info!(path = %path.display(), "custom map loaded");
    }
    if let Some(map) = args.map {
        enter_map(&mut simulation, map.into())?;
    }

    let summary = run(&mut simulation, &script, args.ticks);
    println!("{summary}");
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}

fn load_config(path: &Path) -> Result<SimulationConfig> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {}", path.display()))?;
    let config = SessionConfig::parse(&contents)
        .with_context(|| format!("failed to load config file {}", path.display()))?;
    Ok(config.simulation())
}

fn load_script(path: &Path) -> Result<InputScript> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read input script {}", path.display()))?;
    InputScript::parse(&contents)
        .with_context(|| format!("failed to parse input script {}", path.display()))
}

fn load_custom_map(path: &Path) -> Result<CustomMap> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read custom map {}", path.display()))?;
    CustomMap::parse(&contents)
        .with_context(|| format!("failed to parse custom map {}", path.display()))
}

fn enter_map(simulation: &mut Simulation, map: MapId) -> Result<()> {
    let routes = find_routes(simulation.world(), map);
    if !routes.is_playable() {
        bail!("{map:?} has no route from a spawn to the base");
    }
    let _ = simulation.execute(Command::EnterPlaying { map, routes });
    Ok(())
}

/// Totals gathered while the session runs.
#[derive(Debug, Default)]
struct Summary {
    ticks: u64,
    kills: u32,
    leaks: u32,
    towers: u32,
    waves_cleared: u32,
}

fn run(simulation: &mut Simulation, script: &InputScript, ticks: u64) -> String {
    let mut summary = Summary::default();
    for tick in 0..ticks {
        let frame = script.frame(tick);
        for event in simulation.step(&frame) {
            match event {
                Event::EnemyKilled { .. } => summary.kills += 1,
                Event::EnemyLeaked { .. } => summary.leaks += 1,
                Event::TowerPlaced { .. } => summary.towers += 1,
                Event::WaveCompleted { .. } => summary.waves_cleared += 1,
                _ => {}
            }
        }
        summary.ticks = tick + 1;

        let outcome = query::outcome(simulation.world());
        let script_done = script.last_tick().map_or(true, |last| tick >= last);
        if outcome.is_terminal() && script_done {
            info!(?outcome, tick, "session finished");
            break;
        }
    }
    if script.last_tick().is_some_and(|last| last >= summary.ticks) {
        warn!(ticks = summary.ticks, "input script extends past the simulated ticks");
    }

    let world = simulation.world();
    let hud = query::hud(world);
    let wave = query::wave(world);
    format!(
        "ticks={} mode={:?} outcome={:?} wave={} money={} base_hp={} kills={} leaks={} towers={} waves_cleared={}",
        summary.ticks,
        hud.mode,
        hud.outcome,
        wave.number,
        hud.money,
        hud.base_hp,
        summary.kills,
        summary.leaks,
        summary.towers,
        summary.waves_cleared,
    )
}
