#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Machines TD.
//!
//! The world owns every mutable collection of a session: the tile atlas, the
//! enemy arena, towers with their drones, projectiles, the economy and the
//! wave counters. Systems never touch these directly; they submit
//! [`Command`] values through [`apply`] and observe [`Event`] values and the
//! read-only snapshots exposed by [`query`].

mod economy;
mod enemies;
mod projectiles;
mod tiles;
mod towers;

use machines_td_core::{
    sell_value, upgrade_cost, Command, EnemyId, EnemySpawn, Event, GameMode, GridPos, MapId,
    PlacementError, ProjectileTarget, Routes, SaleError, SessionOutcome, TileKind, TileSource,
    TowerId, TowerKind, UpgradeError, MAX_TOWER_LEVEL, TICKS_PER_SECOND, TILE_SIZE,
};
use tracing::{debug, info};

use economy::Economy;
use enemies::{EnemyRegistry, EnemyState};
use projectiles::ProjectileRegistry;
use tiles::TileAtlas;
use towers::TowerRegistry;

/// Wave counters mutated by wave commands.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct WaveState {
    number: u32,
    active: bool,
    timer: u32,
    rounds_done: u32,
    boss_pending: bool,
    boss_active: bool,
    infinite_mode: bool,
}

impl WaveState {
    const fn new() -> Self {
        Self {
            number: 1,
            active: false,
            timer: 0,
            rounds_done: 0,
            boss_pending: false,
            boss_active: false,
            infinite_mode: false,
        }
    }
}

/// Represents the authoritative Machines TD world state.
#[derive(Debug)]
pub struct World {
    tiles: TileAtlas,
    enemies: EnemyRegistry,
    towers: TowerRegistry,
    projectiles: ProjectileRegistry,
    economy: Economy,
    waves: WaveState,
    mode: GameMode,
    outcome: SessionOutcome,
    active_map: Option<MapId>,
    routes: Routes,
    cursor: GridPos,
    selected_tower: TowerKind,
    show_info: bool,
    editor_tile: TileKind,
    tick_index: u64,
}

impl World {
    /// Creates a new world sitting on the title screen.
    #[must_use]
    pub fn new() -> Self {
        Self {
            tiles: TileAtlas::new(),
            enemies: EnemyRegistry::new(),
            towers: TowerRegistry::new(),
            projectiles: ProjectileRegistry::new(),
            economy: Economy::new(),
            waves: WaveState::new(),
            mode: GameMode::Menu,
            outcome: SessionOutcome::Ongoing,
            active_map: None,
            routes: Routes::default(),
            cursor: GridPos::new(0, 0),
            selected_tower: TowerKind::Normal,
            show_info: false,
            editor_tile: TileKind::Path,
            tick_index: 0,
        }
    }

    fn is_simulating(&self) -> bool {
        self.mode == GameMode::Playing && !self.outcome.is_terminal()
    }

    fn set_mode(&mut self, mode: GameMode, out_events: &mut Vec<Event>) {
        if self.mode == mode {
            return;
        }
        info!(from = ?self.mode, to = ?mode, "game mode changed");
        self.mode = mode;
        out_events.push(Event::GameModeChanged { mode });
    }

    fn clear_session(&mut self) {
        self.enemies.clear();
        self.towers.clear();
        self.projectiles.clear();
        self.economy = Economy::new();
        self.waves = WaveState::new();
        self.outcome = SessionOutcome::Ongoing;
        self.active_map = None;
        self.routes = Routes::default();
    }

    fn spawn_enemy(&mut self, spawn: EnemySpawn, out_events: &mut Vec<Event>) {
        let Some(path) = self.routes.paths.get(spawn.route) else {
            debug!(route = spawn.route, "spawn ignored: unknown route");
            return;
        };
        let origin = if spawn.origin.in_bounds() {
            spawn.origin
        } else {
            path.first()
        };
        let enemy = self.enemies.insert(EnemyState {
            kind: spawn.kind,
            route: spawn.route,
            path_index: 0,
            position: origin.origin(),
            speed_tiles: spawn.speed_tiles,
            hp: spawn.hp,
            reward: spawn.reward,
            alive: true,
            rewarded: false,
        });
        out_events.push(Event::EnemySpawned {
            enemy,
            kind: spawn.kind,
        });
    }

    fn damage_enemy(&mut self, enemy: EnemyId, damage: u32, out_events: &mut Vec<Event>) {
        if let Some(reward) = self.enemies.apply_damage(enemy, damage) {
            self.economy.credit(reward);
            out_events.push(Event::EnemyKilled { enemy, reward });
        }
    }

    fn advance_enemies(&mut self, out_events: &mut Vec<Event>) {
        for id in self.enemies.ids() {
            let Some(enemy) = self.enemies.get_mut(id) else {
                continue;
            };
            if !enemy.alive {
                continue;
            }
            let Some(path) = self.routes.paths.get(enemy.route) else {
                continue;
            };

            let Some(next) = path.get(enemy.path_index + 1) else {
                enemy.alive = false;
                let base_hp = self.economy.damage_base();
                out_events.push(Event::EnemyLeaked { enemy: id, base_hp });
                if base_hp == 0 && !self.outcome.is_terminal() {
                    info!(wave = self.waves.number, "base destroyed");
                    self.outcome = SessionOutcome::Defeat;
                    out_events.push(Event::BaseDestroyed);
                }
                continue;
            };

            let target = next.origin();
            let distance = enemy.position.distance(target);
            if distance == 0.0 {
                enemy.path_index += 1;
                continue;
            }
            let step = enemy.speed_tiles * TILE_SIZE / TICKS_PER_SECOND as f32;
            if step >= distance {
                enemy.position = target;
                enemy.path_index += 1;
            } else {
                enemy.position = enemy.position.step_toward(target, step);
            }
        }
    }

    fn place_tower(
        &mut self,
        kind: TowerKind,
        cell: GridPos,
    ) -> Result<TowerId, PlacementError> {
        let map = match self.active_map {
            Some(map) if self.is_simulating() => map,
            _ => return Err(PlacementError::InvalidMode),
        };
        if !cell.in_bounds() {
            return Err(PlacementError::OutOfBounds);
        }
        if !self.tiles.kind_at(map, cell).is_buildable() {
            return Err(PlacementError::NotBuildable);
        }
        if self.towers.is_occupied(map, cell) {
            return Err(PlacementError::Occupied);
        }
        if !self.economy.try_spend(kind.purchase_cost()) {
            return Err(PlacementError::InsufficientFunds);
        }
        Ok(self.towers.insert(kind, map, cell))
    }

    fn upgrade_tower(&mut self, tower: TowerId) -> Result<u32, UpgradeError> {
        if !self.is_simulating() {
            return Err(UpgradeError::InvalidMode);
        }
        let state = self.towers.get(tower).ok_or(UpgradeError::MissingTower)?;
        if state.level >= MAX_TOWER_LEVEL {
            return Err(UpgradeError::MaxLevel);
        }
        let cost = upgrade_cost(state.level);
        if !self.economy.try_spend(cost) {
            return Err(UpgradeError::InsufficientFunds);
        }
        let state = self.towers.get_mut(tower).ok_or(UpgradeError::MissingTower)?;
        state.level += 1;
        state.stats = state.stats.upgraded(state.kind);
        state.invested += cost;
        Ok(state.level)
    }

    fn sell_tower(&mut self, tower: TowerId) -> Result<u32, SaleError> {
        if !self.is_simulating() {
            return Err(SaleError::InvalidMode);
        }
        let state = self.towers.remove(tower).ok_or(SaleError::MissingTower)?;
        let refund = sell_value(state.invested);
        self.economy.credit(refund);
        Ok(refund)
    }

    fn fire_projectiles(
        &mut self,
        tower: TowerId,
        targets: Vec<ProjectileTarget>,
        out_events: &mut Vec<Event>,
    ) {
        if !self.is_simulating() || targets.is_empty() {
            return;
        }
        let Some(state) = self.towers.get_mut(tower) else {
            return;
        };
        if state.cooldown > 0 || state.kind == TowerKind::Drone {
            return;
        }
        state.cooldown = state.stats.reload_ticks;
        let origin = state.cell.center();
        let damage = state.stats.damage;
        let splash = match state.kind {
            TowerKind::Aoe => Some(state.stats.splash_radius),
            TowerKind::Normal | TowerKind::Drone => None,
        };
        for target in targets {
            let projectile = self.projectiles.fire(origin, target, damage, splash);
            out_events.push(Event::ProjectileFired { projectile, tower });
        }
    }

    fn drone_strike(
        &mut self,
        tower: TowerId,
        target: EnemyId,
        out_events: &mut Vec<Event>,
    ) {
        let Some(state) = self.towers.get_mut(tower) else {
            return;
        };
        let damage = state.stats.drone_damage;
        let Some(drone) = state.drone.as_mut() else {
            return;
        };
        if drone.cooldown > 0 || drone.target != Some(target) {
            return;
        }
        if !self.enemies.get(target).is_some_and(|enemy| enemy.alive) {
            return;
        }
        drone.cooldown = drone.reload_ticks;
        self.damage_enemy(target, damage, out_events);
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

impl TileSource for World {
    fn tile_kind_at(&self, map: MapId, cell: GridPos) -> TileKind {
        self.tiles.kind_at(map, cell)
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::SetGameMode { mode } => world.set_mode(mode, out_events),
        Command::MoveCursor { direction } => {
            let next = world.cursor.step_clamped(direction);
            if next != world.cursor {
                world.cursor = next;
                out_events.push(Event::CursorMoved { cell: next });
            }
        }
        Command::SelectTowerKind { kind } => world.selected_tower = kind,
        Command::ToggleTowerInfo => world.show_info = !world.show_info,
        Command::SelectEditorTile { kind } => world.editor_tile = kind,
        Command::PaintTile { cell, kind } => {
            if world.active_map == Some(MapId::Custom) {
                debug!(?cell, "paint ignored while the custom map is being played");
                return;
            }
            if world.tiles.paint(cell, kind) {
                out_events.push(Event::TilePainted { cell, kind });
            }
        }
        Command::ClearCustomMap => {
            if world.active_map == Some(MapId::Custom) || !world.tiles.custom_exists() {
                return;
            }
            world.tiles.clear_custom();
            info!("custom map cleared");
            out_events.push(Event::CustomMapCleared);
        }
        Command::EnterPlaying { map, routes } => {
            if !routes.is_playable() {
                debug!(?map, "enter playing ignored: map has no route");
                return;
            }
            world.clear_session();
            info!(?map, paths = routes.paths.len(), "session started");
            world.active_map = Some(map);
            world.routes = routes;
            out_events.push(Event::SessionStarted { map });
            world.set_mode(GameMode::Playing, out_events);
        }
        Command::ResetSession => {
            world.clear_session();
            world.cursor = GridPos::new(0, 0);
            out_events.push(Event::SessionReset);
            world.set_mode(GameMode::Menu, out_events);
        }
        Command::ContinueAfterBoss { interval } => {
            if world.mode != GameMode::BossChoice {
                return;
            }
            world.waves.infinite_mode = true;
            world.waves.number = world.waves.number.saturating_add(interval.max(1));
            world.waves.active = false;
            info!(wave = world.waves.number, "continuing in infinite mode");
            world.set_mode(GameMode::Playing, out_events);
        }
        Command::Tick => {
            world.tick_index = world.tick_index.saturating_add(1);
            out_events.push(Event::TimeAdvanced {
                tick: world.tick_index,
            });
            if !world.is_simulating() {
                return;
            }
            if world.waves.active {
                world.waves.timer = world.waves.timer.saturating_add(1);
            }
            let map = world.active_map;
            for tower in world.towers.iter_mut() {
                if Some(tower.map) == map {
                    tower.cooldown = tower.cooldown.saturating_sub(1);
                }
            }
        }
        Command::StartWave { wave, boss_pending } => {
            if !world.is_simulating() {
                return;
            }
            world.enemies.clear();
            world.waves = WaveState {
                number: wave,
                active: true,
                timer: 0,
                rounds_done: 0,
                boss_pending,
                boss_active: false,
                infinite_mode: world.waves.infinite_mode,
            };
            info!(wave, boss_wave = boss_pending, "wave started");
            out_events.push(Event::WaveStarted {
                wave,
                boss_wave: boss_pending,
            });
        }
        Command::SpawnRound { spawns } => {
            if !world.is_simulating() || !world.waves.active {
                return;
            }
            world.waves.rounds_done += 1;
            for spawn in spawns {
                world.spawn_enemy(spawn, out_events);
            }
        }
        Command::ReleaseBosses { spawns } => {
            if !world.is_simulating() || !world.waves.boss_pending || spawns.is_empty() {
                return;
            }
            world.waves.boss_pending = false;
            world.waves.boss_active = true;
            let count = spawns.len() as u32;
            for spawn in spawns {
                world.spawn_enemy(spawn, out_events);
            }
            info!(wave = world.waves.number, count, "bosses released");
            out_events.push(Event::BossesReleased { count });
        }
        Command::AdvanceEnemies => {
            if world.is_simulating() {
                world.advance_enemies(out_events);
            }
        }
        Command::PlaceTower { kind, cell } => match world.place_tower(kind, cell) {
            Ok(tower) => out_events.push(Event::TowerPlaced { tower, kind, cell }),
            Err(reason) => {
                debug!(?kind, ?cell, ?reason, "tower placement rejected");
                out_events.push(Event::TowerPlacementRejected { kind, cell, reason });
            }
        },
        Command::UpgradeTower { tower } => match world.upgrade_tower(tower) {
            Ok(level) => out_events.push(Event::TowerUpgraded { tower, level }),
            Err(reason) => {
                debug!(tower = tower.get(), ?reason, "tower upgrade rejected");
                out_events.push(Event::TowerUpgradeRejected { tower, reason });
            }
        },
        Command::SellTower { tower } => match world.sell_tower(tower) {
            Ok(refund) => out_events.push(Event::TowerSold { tower, refund }),
            Err(reason) => {
                debug!(tower = tower.get(), ?reason, "tower sale rejected");
                out_events.push(Event::TowerSaleRejected { tower, reason });
            }
        },
        Command::FireProjectiles { tower, targets } => {
            world.fire_projectiles(tower, targets, out_events);
        }
        Command::SteerDrone {
            tower,
            position,
            target,
        } => {
            if !world.is_simulating() {
                return;
            }
            if let Some(drone) = world
                .towers
                .get_mut(tower)
                .and_then(|state| state.drone.as_mut())
            {
                drone.position = position;
                drone.target = target;
                if target.is_some() {
                    drone.cooldown = drone.cooldown.saturating_sub(1);
                }
            }
        }
        Command::DroneStrike { tower, target } => {
            if world.is_simulating() {
                world.drone_strike(tower, target, out_events);
            }
        }
        Command::MoveProjectile {
            projectile,
            position,
        } => {
            if let Some(state) = world.projectiles.get_mut(projectile) {
                state.position = position;
            }
        }
        Command::DetonateProjectile { projectile, hits } => {
            let Some(state) = world.projectiles.get_mut(projectile) else {
                return;
            };
            state.alive = false;
            let damage = state.damage;
            for enemy in hits {
                world.damage_enemy(enemy, damage, out_events);
            }
        }
        Command::DiscardProjectile { projectile } => {
            if let Some(state) = world.projectiles.get_mut(projectile) {
                state.alive = false;
            }
        }
        Command::PruneEntities => {
            world.enemies.prune();
            world.projectiles.prune();
        }
        Command::ClearBoss => {
            if !world.waves.boss_active {
                return;
            }
            world.waves.boss_active = false;
            info!(wave = world.waves.number, "boss cleared");
            out_events.push(Event::BossCleared {
                wave: world.waves.number,
            });
        }
        Command::CompleteWave { bonus } => {
            if !world.is_simulating() || !world.waves.active {
                return;
            }
            let cleared = world.waves.number;
            world.waves.active = false;
            world.waves.number = cleared.saturating_add(1);
            world.economy.credit(bonus);
            info!(wave = cleared, bonus, "wave completed");
            out_events.push(Event::WaveCompleted {
                wave: cleared,
                bonus,
            });
        }
        Command::DeclareVictory => {
            if world.outcome.is_terminal() {
                return;
            }
            world.outcome = SessionOutcome::Victory;
            info!(wave = world.waves.number, "session won");
            out_events.push(Event::SessionWon {
                wave: world.waves.number,
            });
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use super::World;
    use machines_td_core::{
        DroneSnapshot, EnemySnapshot, EnemyView, GameMode, GridPos, HudSnapshot, MapId,
        ProjectileSnapshot, ProjectileView, Routes, SessionOutcome, TowerId, TowerSnapshot,
        TowerView, WaveSnapshot,
    };

    /// Reports the active game mode.
    #[must_use]
    pub fn game_mode(world: &World) -> GameMode {
        world.mode
    }

    /// Reports the terminal condition of the session.
    #[must_use]
    pub fn outcome(world: &World) -> SessionOutcome {
        world.outcome
    }

    /// Number of ticks processed since the world was created.
    #[must_use]
    pub fn tick_index(world: &World) -> u64 {
        world.tick_index
    }

    /// Map being played, if any.
    #[must_use]
    pub fn active_map(world: &World) -> Option<MapId> {
        world.active_map
    }

    /// Routes discovered for the map being played.
    #[must_use]
    pub fn routes(world: &World) -> &Routes {
        &world.routes
    }

    /// Reports whether a custom map has been authored.
    #[must_use]
    pub fn custom_map_exists(world: &World) -> bool {
        world.tiles.custom_exists()
    }

    /// Cell under the shared cursor.
    #[must_use]
    pub fn cursor(world: &World) -> GridPos {
        world.cursor
    }

    /// Tower standing on the provided cell of the active map.
    #[must_use]
    pub fn tower_at(world: &World, cell: GridPos) -> Option<TowerId> {
        world
            .active_map
            .and_then(|map| world.towers.find_at(map, cell))
    }

    /// Captures the session-wide counters shown by adapters.
    #[must_use]
    pub fn hud(world: &World) -> HudSnapshot {
        HudSnapshot {
            mode: world.mode,
            outcome: world.outcome,
            money: world.economy.money(),
            base_hp: world.economy.base_hp(),
            cursor: world.cursor,
            selected_tower: world.selected_tower,
            show_info: world.show_info,
            editor_tile: world.editor_tile,
            map: world.active_map,
            custom_map_exists: world.tiles.custom_exists(),
        }
    }

    /// Captures the wave counters.
    #[must_use]
    pub fn wave(world: &World) -> WaveSnapshot {
        let waves = &world.waves;
        WaveSnapshot {
            number: waves.number,
            active: waves.active,
            timer: waves.timer,
            rounds_done: waves.rounds_done,
            boss_pending: waves.boss_pending,
            boss_active: waves.boss_active,
            infinite_mode: waves.infinite_mode,
        }
    }

    /// Captures a read-only view of the enemies in spawn order.
    #[must_use]
    pub fn enemy_view(world: &World) -> EnemyView {
        let snapshots = world
            .enemies
            .iter()
            .map(|(id, enemy)| EnemySnapshot {
                id,
                kind: enemy.kind,
                position: enemy.position,
                path_index: enemy.path_index,
                hp: enemy.hp,
                reward: enemy.reward,
                alive: enemy.alive,
            })
            .collect();
        EnemyView::from_snapshots(snapshots)
    }

    /// Captures a read-only view of the towers standing on the active map.
    #[must_use]
    pub fn tower_view(world: &World) -> TowerView {
        let snapshots = world
            .towers
            .iter()
            .filter(|tower| Some(tower.map) == world.active_map)
            .map(|tower| TowerSnapshot {
                id: tower.id,
                kind: tower.kind,
                map: tower.map,
                cell: tower.cell,
                level: tower.level,
                stats: tower.stats,
                cooldown: tower.cooldown,
                invested: tower.invested,
                drone: tower.drone.as_ref().map(|drone| DroneSnapshot {
                    position: drone.position,
                    home: drone.home,
                    speed: drone.speed,
                    cooldown: drone.cooldown,
                    target: drone.target,
                }),
            })
            .collect();
        TowerView::from_snapshots(snapshots)
    }

    /// Captures a read-only view of the projectiles in flight.
    #[must_use]
    pub fn projectile_view(world: &World) -> ProjectileView {
        let snapshots = world
            .projectiles
            .iter()
            .filter(|projectile| projectile.alive)
            .map(|projectile| ProjectileSnapshot {
                id: projectile.id,
                position: projectile.position,
                target: projectile.target,
                damage: projectile.damage,
                speed: projectile.speed,
                splash_radius: projectile.splash_radius,
            })
            .collect();
        ProjectileView::from_snapshots(snapshots)
    }
}
