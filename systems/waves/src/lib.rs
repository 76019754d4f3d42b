#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic wave scheduler responsible for spawn rounds, boss releases
//! and wave completion.

use machines_td_core::{
    Command, EnemyKind, EnemySpawn, EnemyView, GameMode, GridPos, Routes, SessionOutcome,
    WaveSnapshot, DEFAULT_BOSS_INTERVAL,
};

const DEFAULT_SPAWN_INTERVAL_TICKS: u32 = 60;
const DEFAULT_ROUNDS_PER_WAVE: u32 = 3;
const DEFAULT_MAX_WAVES: u32 = 10;
const DEFAULT_COMPLETION_BONUS: u32 = 10;

/// Configuration parameters required to construct the wave scheduler.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    spawn_interval_ticks: u32,
    rounds_per_wave: u32,
    boss_interval: u32,
    max_waves: u32,
    completion_bonus: u32,
}

impl Config {
    /// Creates a new configuration. Zero intervals are raised to one tick or wave.
    #[must_use]
    pub const fn new(
        spawn_interval_ticks: u32,
        rounds_per_wave: u32,
        boss_interval: u32,
        max_waves: u32,
        completion_bonus: u32,
    ) -> Self {
        Self {
            spawn_interval_ticks: if spawn_interval_ticks == 0 {
                1
            } else {
                spawn_interval_ticks
            },
            rounds_per_wave,
            boss_interval: if boss_interval == 0 { 1 } else { boss_interval },
            max_waves,
            completion_bonus,
        }
    }

    /// Ticks between two spawn rounds.
    #[must_use]
    pub const fn spawn_interval_ticks(&self) -> u32 {
        self.spawn_interval_ticks
    }

    /// Spawn rounds issued per wave.
    #[must_use]
    pub const fn rounds_per_wave(&self) -> u32 {
        self.rounds_per_wave
    }

    /// Every wave divisible by this value ends with bosses.
    #[must_use]
    pub const fn boss_interval(&self) -> u32 {
        self.boss_interval
    }

    /// Last wave of a session without infinite mode.
    #[must_use]
    pub const fn max_waves(&self) -> u32 {
        self.max_waves
    }

    /// Money paid when a wave is cleared.
    #[must_use]
    pub const fn completion_bonus(&self) -> u32 {
        self.completion_bonus
    }

    /// Reports whether the provided wave ends with bosses.
    #[must_use]
    pub const fn is_boss_wave(&self, wave: u32) -> bool {
        wave % self.boss_interval == 0
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(
            DEFAULT_SPAWN_INTERVAL_TICKS,
            DEFAULT_ROUNDS_PER_WAVE,
            DEFAULT_BOSS_INTERVAL,
            DEFAULT_MAX_WAVES,
            DEFAULT_COMPLETION_BONUS,
        )
    }
}

/// Progress of the current wave derived from the wave counters and live enemies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum WavePhase {
    /// No wave is running.
    Idle,
    /// Spawn rounds remain.
    Spawning,
    /// Every round spawned; enemies are still on the map.
    Draining,
    /// The map is clear and bosses wait to be released.
    BossPending,
    /// Bosses are on the map.
    BossActive,
    /// The wave is cleared.
    Complete,
}

/// Classifies the current wave.
#[must_use]
pub fn phase(config: &Config, wave: &WaveSnapshot, enemies: &EnemyView) -> WavePhase {
    if !wave.active {
        return WavePhase::Idle;
    }
    if wave.boss_active {
        return WavePhase::BossActive;
    }
    if wave.rounds_done < config.rounds_per_wave {
        return WavePhase::Spawning;
    }
    if enemies.alive_count() > 0 {
        return WavePhase::Draining;
    }
    if wave.boss_pending {
        WavePhase::BossPending
    } else {
        WavePhase::Complete
    }
}

/// Hit points, reward and speed of an enemy at the provided wave.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EnemyProfile {
    /// Starting hit points.
    pub hp: i32,
    /// Money paid on kill.
    pub reward: u32,
    /// Travel speed in tiles per second.
    pub speed_tiles: f32,
}

/// Scales an enemy of the provided kind to `wave`.
#[must_use]
pub fn enemy_profile(config: &Config, kind: EnemyKind, wave: u32) -> EnemyProfile {
    let w = i32::try_from(wave).unwrap_or(i32::MAX);
    match kind {
        EnemyKind::Basic => EnemyProfile {
            hp: w.saturating_mul(2).saturating_add(4),
            reward: wave.saturating_add(5),
            speed_tiles: 1.0,
        },
        EnemyKind::Fast => EnemyProfile {
            hp: w.saturating_mul(2).saturating_add(6),
            reward: wave.saturating_add(6),
            speed_tiles: 2.0,
        },
        EnemyKind::Boss => {
            let tier = i32::try_from(wave / config.boss_interval).unwrap_or(i32::MAX);
            EnemyProfile {
                hp: w
                    .saturating_mul(70)
                    .saturating_add(tier.saturating_mul(200))
                    .saturating_add(400),
                reward: wave.saturating_mul(15).saturating_add(150),
                speed_tiles: 0.6,
            }
        }
    }
}

/// Number of enemies each spawn point emits per round.
#[must_use]
pub const fn enemies_per_spawn(wave: u32) -> u32 {
    2 + wave.saturating_sub(1)
}

/// Number of fast enemies at the head of each spawn point's group.
#[must_use]
pub const fn fast_enemy_count(wave: u32) -> u32 {
    if wave >= 2 {
        2 + (wave - 2)
    } else {
        0
    }
}

/// Number of bosses released at the end of a boss wave.
#[must_use]
pub fn boss_count(config: &Config, wave: u32) -> u32 {
    (wave / config.boss_interval).max(1)
}

/// Pure system that turns wave counters into wave commands.
#[derive(Debug)]
pub struct WaveScheduler {
    config: Config,
}

impl WaveScheduler {
    /// Creates a new scheduler using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Configuration the scheduler was created with.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Starts an idle wave or issues the next spawn round.
    ///
    /// Runs after the tick advanced the wave timer and before enemies move.
    pub fn schedule(
        &mut self,
        mode: GameMode,
        outcome: SessionOutcome,
        wave: &WaveSnapshot,
        routes: &Routes,
        out: &mut Vec<Command>,
    ) {
        if mode != GameMode::Playing || outcome.is_terminal() {
            return;
        }

        if !wave.active {
            out.push(Command::StartWave {
                wave: wave.number,
                boss_pending: self.config.is_boss_wave(wave.number),
            });
            return;
        }

        if wave.rounds_done >= self.config.rounds_per_wave
            || wave.timer == 0
            || wave.timer % self.config.spawn_interval_ticks != 0
        {
            return;
        }

        out.push(Command::SpawnRound {
            spawns: self.spawn_round(wave.number, routes),
        });
    }

    /// Releases bosses, clears boss phases and completes waves.
    ///
    /// Runs after dead enemies were pruned.
    pub fn evaluate(
        &mut self,
        mode: GameMode,
        outcome: SessionOutcome,
        wave: &WaveSnapshot,
        enemies: &EnemyView,
        routes: &Routes,
        out: &mut Vec<Command>,
    ) {
        if mode != GameMode::Playing || outcome.is_terminal() {
            return;
        }

        match phase(&self.config, wave, enemies) {
            WavePhase::Idle | WavePhase::Spawning | WavePhase::Draining => {}
            WavePhase::BossActive => {
                if !enemies.any_alive_of(EnemyKind::Boss) {
                    out.push(Command::ClearBoss);
                }
            }
            WavePhase::BossPending => {
                let spawns = self.boss_round(wave.number, routes);
                if spawns.is_empty() {
                    self.complete(wave, out);
                } else {
                    out.push(Command::ReleaseBosses { spawns });
                }
            }
            WavePhase::Complete => self.complete(wave, out),
        }
    }

    fn complete(&self, wave: &WaveSnapshot, out: &mut Vec<Command>) {
        out.push(Command::CompleteWave {
            bonus: self.config.completion_bonus,
        });
        let next = wave.number.saturating_add(1);
        if !wave.infinite_mode && next > self.config.max_waves {
            out.push(Command::DeclareVictory);
        } else {
            out.push(Command::StartWave {
                wave: next,
                boss_pending: self.config.is_boss_wave(next),
            });
        }
    }

    fn spawn_round(&self, wave: u32, routes: &Routes) -> Vec<EnemySpawn> {
        let per_spawn = enemies_per_spawn(wave);
        let fast = fast_enemy_count(wave);
        let mut spawns = Vec::new();
        for &origin in &routes.spawns {
            let Some(route) = routes.route_for_spawn(origin) else {
                continue;
            };
            for index in 0..per_spawn {
                let kind = if index < fast {
                    EnemyKind::Fast
                } else {
                    EnemyKind::Basic
                };
                spawns.push(self.enemy(kind, wave, route, origin));
            }
        }
        spawns
    }

    fn boss_round(&self, wave: u32, routes: &Routes) -> Vec<EnemySpawn> {
        if routes.paths.is_empty() {
            return Vec::new();
        }
        (0..boss_count(&self.config, wave) as usize)
            .map(|index| {
                let route = index % routes.paths.len();
                let origin = routes.paths[route].first();
                self.enemy(EnemyKind::Boss, wave, route, origin)
            })
            .collect()
    }

    fn enemy(&self, kind: EnemyKind, wave: u32, route: usize, origin: GridPos) -> EnemySpawn {
        let profile = enemy_profile(&self.config, kind, wave);
        EnemySpawn {
            kind,
            route,
            origin,
            hp: profile.hp,
            reward: profile.reward,
            speed_tiles: profile.speed_tiles,
        }
    }
}
