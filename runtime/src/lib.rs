#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Fixed-rate simulation loop wiring the world to every system.
//!
//! Each [`Simulation::step`] advances the session by exactly one tick. Systems
//! only read world views and emit commands; the world is the single place where
//! state changes.

use machines_td_core::{Command, Event, InputPoller, TowerTarget};
use machines_td_system_builder::{Builder, BuilderInput};
use machines_td_system_drones::Drones;
use machines_td_system_game_flow::GameFlow;
use machines_td_system_projectiles::Projectiles;
use machines_td_system_tower_combat::TowerCombat;
use machines_td_system_tower_targeting::TowerTargeting;
use machines_td_system_waves::{Config as WaveConfig, WaveScheduler};
use machines_td_world::{self as world, query, World};
use tracing::{debug, info};

/// Tunables applied when a simulation is created.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SimulationConfig {
    waves: WaveConfig,
}

impl SimulationConfig {
    /// Creates a configuration from the wave scheduler settings.
    #[must_use]
    pub const fn new(waves: WaveConfig) -> Self {
        Self { waves }
    }

    /// Wave scheduler settings.
    #[must_use]
    pub const fn waves(&self) -> &WaveConfig {
        &self.waves
    }
}

/// World plus the systems that drive it, advanced one tick at a time.
#[derive(Debug)]
pub struct Simulation {
    world: World,
    game_flow: GameFlow,
    builder: Builder,
    waves: WaveScheduler,
    targeting: TowerTargeting,
    combat: TowerCombat,
    drones: Drones,
    projectiles: Projectiles,
    tower_targets: Vec<TowerTarget>,
    commands: Vec<Command>,
    events: Vec<Event>,
    unseen_by_builder: Vec<Event>,
}

impl Default for Simulation {
    fn default() -> Self {
        Self::new(SimulationConfig::default())
    }
}

impl Simulation {
    /// Creates a simulation sitting on the main menu.
    #[must_use]
    pub fn new(config: SimulationConfig) -> Self {
        info!(waves = ?config.waves, "simulation created");
        Self {
            world: World::new(),
            game_flow: GameFlow::with_boss_interval(config.waves.boss_interval()),
            builder: Builder::new(),
            waves: WaveScheduler::new(config.waves),
            targeting: TowerTargeting::new(),
            combat: TowerCombat::new(),
            drones: Drones::new(),
            projectiles: Projectiles::new(),
            tower_targets: Vec::new(),
            commands: Vec::new(),
            events: Vec::new(),
            unseen_by_builder: Vec::new(),
        }
    }

    /// Read access to the simulated world for queries.
    #[must_use]
    pub const fn world(&self) -> &World {
        &self.world
    }

    /// Menu highlights tracked by the game flow.
    #[must_use]
    pub const fn game_flow(&self) -> &GameFlow {
        &self.game_flow
    }

    /// Applies a single command outside the tick loop, e.g. to load a map.
    pub fn execute(&mut self, command: Command) -> Vec<Event> {
        let mut events = Vec::new();
        world::apply(&mut self.world, command, &mut events);
        self.unseen_by_builder.extend(events.iter().cloned());
        events
    }

    /// Advances the session by one tick and returns the events it produced.
    pub fn step<P>(&mut self, input: &P) -> &[Event]
    where
        P: InputPoller + ?Sized,
    {
        self.events.clear();

        let hud = query::hud(&self.world);
        self.game_flow
            .handle(input, &hud, &self.world, &mut self.commands);
        self.flush();

        let hud = query::hud(&self.world);
        let builder_input = BuilderInput::from_poller(input, hud.cursor, hud.selected_tower);
        self.unseen_by_builder.extend(self.events.iter().cloned());
        let seen = std::mem::take(&mut self.unseen_by_builder);
        self.builder.handle(
            &seen,
            builder_input,
            |cell| query::tower_at(&self.world, cell),
            &mut self.commands,
        );
        self.flush();
        let builder_mark = self.events.len();

        self.commands.push(Command::Tick);
        self.flush();

        self.waves.schedule(
            query::game_mode(&self.world),
            query::outcome(&self.world),
            &query::wave(&self.world),
            query::routes(&self.world),
            &mut self.commands,
        );
        self.flush();

        self.commands.push(Command::AdvanceEnemies);
        self.flush();

        self.resolve_combat();

        self.commands.push(Command::PruneEntities);
        self.flush();

        self.waves.evaluate(
            query::game_mode(&self.world),
            query::outcome(&self.world),
            &query::wave(&self.world),
            &query::enemy_view(&self.world),
            query::routes(&self.world),
            &mut self.commands,
        );
        self.flush();

        self.game_flow.observe(&self.events, &mut self.commands);
        self.flush();

        self.unseen_by_builder
            .extend(self.events[builder_mark..].iter().cloned());
        debug!(
            tick = query::tick_index(&self.world),
            events = self.events.len(),
            "step complete"
        );
        &self.events
    }

    fn resolve_combat(&mut self) {
        let mode = query::game_mode(&self.world);

        let towers = query::tower_view(&self.world);
        let enemies = query::enemy_view(&self.world);
        self.targeting
            .handle(mode, &towers, &enemies, &mut self.tower_targets);
        self.combat
            .handle(mode, &towers, &self.tower_targets, &mut self.commands);
        self.flush();

        let towers = query::tower_view(&self.world);
        let enemies = query::enemy_view(&self.world);
        self.drones.handle(mode, &towers, &enemies, &mut self.commands);
        self.flush();

        let projectiles = query::projectile_view(&self.world);
        let enemies = query::enemy_view(&self.world);
        self.projectiles
            .handle(mode, &projectiles, &enemies, &mut self.commands);
        self.flush();
    }

    fn flush(&mut self) {
        for command in self.commands.drain(..) {
            world::apply(&mut self.world, command, &mut self.events);
        }
    }
}
