#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Machines TD engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters translate polled input into
//! [`InputCommand`] values, systems turn input and world snapshots into
//! [`Command`] values describing desired mutations, the world executes those
//! commands via its `apply` entry point, and then broadcasts [`Event`] values
//! for systems to react to deterministically.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Side length of a single tile measured in world units.
pub const TILE_SIZE: f32 = 8.0;

/// Number of tiles along each edge of a map region.
pub const MAP_TILES: u32 = 16;

/// Fixed simulation rate.
pub const TICKS_PER_SECOND: u32 = 60;

/// Money available when a session starts.
pub const STARTING_MONEY: u32 = 50;

/// Base hit points available when a session starts.
pub const STARTING_BASE_HP: u32 = 10;

/// Waves between two boss waves unless configured otherwise.
pub const DEFAULT_BOSS_INTERVAL: u32 = 10;

/// Highest level a tower can be upgraded to.
pub const MAX_TOWER_LEVEL: u32 = 3;

/// Distance a projectile travels per tick, in world units.
pub const PROJECTILE_SPEED: f32 = 2.5;

/// Projectiles closer than this to their aim point detonate.
pub const PROJECTILE_IMPACT_DISTANCE: f32 = 3.0;

/// Distance a drone travels per tick, in world units.
pub const DRONE_SPEED: f32 = 1.6;

/// Ticks between two drone melee strikes.
pub const DRONE_RELOAD_TICKS: u32 = 20;

/// Drones strike targets closer than this distance.
pub const DRONE_STRIKE_RADIUS: f32 = 20.0;

/// Range shown for drone towers, which have no firing range of their own.
pub const DRONE_DISPLAY_RANGE: f32 = 25.0;

/// Offsets applied around the primary target when an AOE tower fans out.
///
/// A tower firing `n` projectiles uses the first `n` entries.
pub const AOE_SPREAD_OFFSETS: [(f32, f32); 5] =
    [(-8.0, -4.0), (-4.0, -2.0), (0.0, 0.0), (4.0, 2.0), (8.0, 4.0)];

/// Top-level mode of a game session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameMode {
    /// Title screen; the initial mode and the mode reached after a reset.
    Menu,
    /// The player chooses which map region to play.
    MapSelect,
    /// The simulation advances every tick.
    Playing,
    /// The simulation is frozen behind the pause menu.
    Paused,
    /// A boss wave was cleared and the player picks lobby or continue.
    BossChoice,
    /// The custom map region is being authored.
    MapEditor,
}

/// Terminal condition of the running session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SessionOutcome {
    /// The session accepts regular play commands.
    Ongoing,
    /// The final wave was completed without infinite mode.
    Victory,
    /// The base ran out of hit points.
    Defeat,
}

impl SessionOutcome {
    /// Reports whether the session only accepts a reset.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        !matches!(self, Self::Ongoing)
    }
}

/// Cardinal directions used for cursor movement.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Movement toward decreasing row indices.
    North,
    /// Movement toward increasing column indices.
    East,
    /// Movement toward increasing row indices.
    South,
    /// Movement toward decreasing column indices.
    West,
}

/// Named map regions stored in the tile atlas.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum MapId {
    /// First built-in map.
    Map1,
    /// Second built-in map.
    Map2,
    /// Player-authored map edited through the map editor.
    Custom,
}

impl MapId {
    /// Map regions in the order they are listed on the map-select screen.
    pub const ALL: [MapId; 3] = [MapId::Map1, MapId::Map2, MapId::Custom];

    /// Zero-based position of the map within [`MapId::ALL`].
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::Map1 => 0,
            Self::Map2 => 1,
            Self::Custom => 2,
        }
    }
}

/// Semantic role of a single grid cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TileKind {
    /// Buildable ground.
    Grass,
    /// Walkable road enemies follow.
    Path,
    /// Portal enemies emerge from.
    Spawn,
    /// Goal enemies walk toward.
    Base,
    /// Obstacle that is neither walkable nor buildable.
    Tree,
    /// Any tile the core does not recognise.
    Unknown,
}

impl TileKind {
    /// Reports whether path discovery may step onto the tile.
    #[must_use]
    pub const fn is_passable(self) -> bool {
        matches!(self, Self::Path | Self::Base)
    }

    /// Reports whether towers may be placed on the tile.
    #[must_use]
    pub const fn is_buildable(self) -> bool {
        matches!(self, Self::Grass)
    }
}

/// Integer tile coordinate local to a map region.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GridPos {
    x: u32,
    y: u32,
}

impl GridPos {
    /// Creates a new grid coordinate.
    #[must_use]
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }

    /// Zero-based column of the cell.
    #[must_use]
    pub const fn x(&self) -> u32 {
        self.x
    }

    /// Zero-based row of the cell.
    #[must_use]
    pub const fn y(&self) -> u32 {
        self.y
    }

    /// Reports whether the cell lies inside a map region.
    #[must_use]
    pub const fn in_bounds(&self) -> bool {
        self.x < MAP_TILES && self.y < MAP_TILES
    }

    /// Reports whether two cells share an edge.
    #[must_use]
    pub fn is_adjacent(self, other: GridPos) -> bool {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y) == 1
    }

    /// Returns the neighbouring cell in the provided direction, clamped to the map.
    #[must_use]
    pub fn step_clamped(self, direction: Direction) -> Self {
        let last = MAP_TILES - 1;
        match direction {
            Direction::North => Self::new(self.x, self.y.saturating_sub(1)),
            Direction::East => Self::new((self.x + 1).min(last), self.y),
            Direction::South => Self::new(self.x, (self.y + 1).min(last)),
            Direction::West => Self::new(self.x.saturating_sub(1), self.y),
        }
    }

    /// World-space position of the cell's top-left corner.
    #[must_use]
    pub fn origin(self) -> WorldPoint {
        WorldPoint::new(self.x as f32 * TILE_SIZE, self.y as f32 * TILE_SIZE)
    }

    /// World-space position of the cell's center.
    #[must_use]
    pub fn center(self) -> WorldPoint {
        self.origin().offset(TILE_SIZE / 2.0, TILE_SIZE / 2.0)
    }
}

/// Continuous position expressed in world units.
#[derive(Clone, Copy, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct WorldPoint {
    /// Horizontal coordinate.
    pub x: f32,
    /// Vertical coordinate.
    pub y: f32,
}

impl WorldPoint {
    /// Creates a new world-space point.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Returns the point translated by the provided offsets.
    #[must_use]
    pub fn offset(self, dx: f32, dy: f32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    /// Squared Euclidean distance to another point.
    #[must_use]
    pub fn distance_squared(self, other: WorldPoint) -> f32 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        dx * dx + dy * dy
    }

    /// Euclidean distance to another point.
    #[must_use]
    pub fn distance(self, other: WorldPoint) -> f32 {
        self.distance_squared(other).sqrt()
    }

    /// Moves toward `target` by at most `step`, snapping onto it when the step
    /// covers the remaining distance.
    #[must_use]
    pub fn step_toward(self, target: WorldPoint, step: f32) -> Self {
        let distance = self.distance(target);
        if distance == 0.0 || step >= distance {
            return target;
        }
        let scale = step / distance;
        self.offset((target.x - self.x) * scale, (target.y - self.y) * scale)
    }
}

/// Generational reference to an enemy stored in the world's arena.
///
/// Identifiers remain valid after the enemy is removed; looking them up simply
/// yields nothing once the slot's generation moved on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EnemyId {
    slot: u32,
    generation: u32,
}

impl EnemyId {
    /// Creates a new enemy identifier from an arena slot and its generation.
    #[must_use]
    pub const fn new(slot: u32, generation: u32) -> Self {
        Self { slot, generation }
    }

    /// Arena slot that stores the enemy.
    #[must_use]
    pub const fn slot(&self) -> u32 {
        self.slot
    }

    /// Generation of the slot when the enemy was stored.
    #[must_use]
    pub const fn generation(&self) -> u32 {
        self.generation
    }
}

/// Variants of enemies spawned by the wave scheduler.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnemyKind {
    /// Regular walker.
    Basic,
    /// Faster, tougher walker introduced in later waves.
    Fast,
    /// Boss released after the regular rounds of a boss wave.
    Boss,
}

/// Unique identifier assigned to a tower.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TowerId(u32);

impl TowerId {
    /// Creates a new tower identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the tower identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a projectile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ProjectileId(u64);

impl ProjectileId {
    /// Creates a new projectile identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the projectile identifier.
    #[must_use]
    pub const fn get(&self) -> u64 {
        self.0
    }
}

/// Types of towers that can be constructed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TowerKind {
    /// Single-target tower firing one projectile per volley.
    Normal,
    /// Splash tower firing a fan of projectiles around its target.
    Aoe,
    /// Tower that releases an autonomous melee drone.
    Drone,
}

impl TowerKind {
    /// Tower kinds in selection order (keys 1, 2, 3).
    pub const ALL: [TowerKind; 3] = [TowerKind::Normal, TowerKind::Aoe, TowerKind::Drone];

    /// Money required to construct the tower.
    #[must_use]
    pub const fn purchase_cost(self) -> u32 {
        match self {
            Self::Normal => 20,
            Self::Aoe => 35,
            Self::Drone => 50,
        }
    }
}

/// Per-kind stat block carried by every tower.
///
/// Fields a kind does not use stay at zero.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TowerStats {
    /// Damage dealt by each projectile.
    pub damage: u32,
    /// Targeting range in world units.
    pub range: f32,
    /// Ticks between volleys.
    pub reload_ticks: u32,
    /// Splash radius of AOE projectiles in world units.
    pub splash_radius: f32,
    /// Projectiles per AOE volley.
    pub projectile_count: u32,
    /// Melee damage dealt by the tower's drone.
    pub drone_damage: u32,
}

impl TowerStats {
    /// Level-one stats for the provided kind.
    #[must_use]
    pub const fn for_kind(kind: TowerKind) -> Self {
        match kind {
            TowerKind::Normal => Self {
                damage: 1,
                range: 30.0,
                reload_ticks: 30,
                splash_radius: 0.0,
                projectile_count: 1,
                drone_damage: 0,
            },
            TowerKind::Aoe => Self {
                damage: 2,
                range: 20.0,
                reload_ticks: 45,
                splash_radius: 12.0,
                projectile_count: 3,
                drone_damage: 0,
            },
            TowerKind::Drone => Self {
                damage: 0,
                range: 0.0,
                reload_ticks: 0,
                splash_radius: 0.0,
                projectile_count: 0,
                drone_damage: 2,
            },
        }
    }

    /// Stats after one upgrade step for the provided kind.
    #[must_use]
    pub fn upgraded(self, kind: TowerKind) -> Self {
        match kind {
            TowerKind::Normal => Self {
                damage: self.damage + 1,
                range: self.range + 5.0,
                reload_ticks: self.reload_ticks.saturating_sub(3).max(10),
                ..self
            },
            TowerKind::Aoe => Self {
                damage: self.damage + 1,
                range: self.range + 3.0,
                reload_ticks: self.reload_ticks.saturating_sub(5).max(10),
                splash_radius: self.splash_radius + 2.0,
                projectile_count: (self.projectile_count + 1).min(AOE_SPREAD_OFFSETS.len() as u32),
                ..self
            },
            TowerKind::Drone => Self {
                drone_damage: self.drone_damage + 1,
                ..self
            },
        }
    }

    /// Range presented to players when the tower is inspected.
    #[must_use]
    pub fn display_range(&self, kind: TowerKind) -> f32 {
        match kind {
            TowerKind::Drone => DRONE_DISPLAY_RANGE,
            TowerKind::Normal | TowerKind::Aoe => self.range,
        }
    }
}

/// Money required to upgrade a tower currently at `level`.
#[must_use]
pub const fn upgrade_cost(level: u32) -> u32 {
    level * 20
}

/// Refund granted when selling a tower that absorbed `invested` money.
#[must_use]
pub const fn sell_value(invested: u32) -> u32 {
    invested / 2
}

/// Ordered tile sequence from a spawn tile to the base tile.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "Vec<GridPos>", try_from = "Vec<GridPos>")]
pub struct Path {
    cells: Vec<GridPos>,
}

impl TryFrom<Vec<GridPos>> for Path {
    type Error = EmptyPathError;

    fn try_from(cells: Vec<GridPos>) -> Result<Self, Self::Error> {
        Self::new(cells).ok_or(EmptyPathError)
    }
}

impl From<Path> for Vec<GridPos> {
    fn from(path: Path) -> Self {
        path.cells
    }
}

/// Error returned when a path would be built from no cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EmptyPathError;

impl fmt::Display for EmptyPathError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a path needs at least one cell")
    }
}

impl std::error::Error for EmptyPathError {}

impl Path {
    /// Wraps the provided cells, returning `None` for an empty sequence.
    #[must_use]
    pub fn new(cells: Vec<GridPos>) -> Option<Self> {
        if cells.is_empty() {
            None
        } else {
            Some(Self { cells })
        }
    }

    /// Cells composing the path.
    #[must_use]
    pub fn cells(&self) -> &[GridPos] {
        &self.cells
    }

    /// Number of waypoints on the path.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Paths are never empty; provided for API symmetry with `len`.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Spawn cell the path starts from.
    #[must_use]
    pub fn first(&self) -> GridPos {
        self.cells[0]
    }

    /// Base cell the path ends at.
    #[must_use]
    pub fn last(&self) -> GridPos {
        self.cells[self.cells.len() - 1]
    }

    /// Waypoint stored at `index`, if any.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<GridPos> {
        self.cells.get(index).copied()
    }
}

/// Result of path discovery over a map region.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Routes {
    /// Paths found, one per reachable spawn, in spawn scan order.
    pub paths: Vec<Path>,
    /// Every spawn tile of the region in row-major scan order.
    pub spawns: Vec<GridPos>,
}

impl Routes {
    /// Reports whether the region can be played.
    #[must_use]
    pub fn is_playable(&self) -> bool {
        !self.paths.is_empty()
    }

    /// Index of the route an enemy emerging from `spawn` should follow.
    ///
    /// Falls back to the first path when the spawn has no route of its own.
    #[must_use]
    pub fn route_for_spawn(&self, spawn: GridPos) -> Option<usize> {
        self.paths
            .iter()
            .position(|path| path.first() == spawn)
            .or(if self.paths.is_empty() { None } else { Some(0) })
    }
}

/// Description of a single enemy the scheduler asks the world to create.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct EnemySpawn {
    /// Variant of the enemy.
    pub kind: EnemyKind,
    /// Index into the active routes.
    pub route: usize,
    /// Tile the enemy appears on; usually the first cell of its route.
    pub origin: GridPos,
    /// Starting hit points.
    pub hp: i32,
    /// Money paid when the enemy is killed.
    pub reward: u32,
    /// Travel speed in tiles per second.
    pub speed_tiles: f32,
}

/// What a projectile flies toward.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum ProjectileTarget {
    /// A live enemy whose center is tracked every tick.
    Enemy(EnemyId),
    /// A fixed point used by splash volleys.
    Point(WorldPoint),
}

/// Target assignment produced by tower targeting for a single tower.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TowerTarget {
    /// Tower that acquired the target.
    pub tower: TowerId,
    /// Enemy selected for the volley.
    pub enemy: EnemyId,
    /// Center of the tower in world units.
    pub tower_center: WorldPoint,
    /// Center of the enemy in world units.
    pub enemy_center: WorldPoint,
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Switches the session to the provided mode.
    SetGameMode {
        /// Mode the world should activate.
        mode: GameMode,
    },
    /// Moves the shared cursor by one cell.
    MoveCursor {
        /// Direction of travel, clamped to the map bounds.
        direction: Direction,
    },
    /// Chooses the tower kind constructed by subsequent builds.
    SelectTowerKind {
        /// Tower kind to select.
        kind: TowerKind,
    },
    /// Flips the tower information overlay.
    ToggleTowerInfo,
    /// Chooses the tile painted by the map editor.
    SelectEditorTile {
        /// Tile kind to paint with.
        kind: TileKind,
    },
    /// Writes a tile into the custom map region.
    PaintTile {
        /// Cell to overwrite.
        cell: GridPos,
        /// New tile kind.
        kind: TileKind,
    },
    /// Erases the custom map region back to grass.
    ClearCustomMap,
    /// Starts a session on a playable map.
    EnterPlaying {
        /// Map region to play.
        map: MapId,
        /// Routes discovered for the region; must be playable.
        routes: Routes,
    },
    /// Discards every entity and restores the lobby state.
    ResetSession,
    /// Leaves the boss choice screen for another run of waves in infinite mode.
    ContinueAfterBoss {
        /// Waves skipped ahead, normally the boss interval.
        interval: u32,
    },
    /// Advances the simulation clock by one tick.
    Tick,
    /// Begins the provided wave.
    StartWave {
        /// Wave number being started.
        wave: u32,
        /// Whether bosses follow the regular rounds of this wave.
        boss_pending: bool,
    },
    /// Issues one spawn round of regular enemies.
    SpawnRound {
        /// Enemies created by the round, in spawn order.
        spawns: Vec<EnemySpawn>,
    },
    /// Releases the bosses of a boss wave.
    ReleaseBosses {
        /// Bosses to create, in spawn order.
        spawns: Vec<EnemySpawn>,
    },
    /// Moves every enemy along its path.
    AdvanceEnemies,
    /// Requests construction of a tower at the provided cell of the active map.
    PlaceTower {
        /// Type of tower to construct.
        kind: TowerKind,
        /// Cell the tower occupies.
        cell: GridPos,
    },
    /// Requests an upgrade of an existing tower.
    UpgradeTower {
        /// Tower to upgrade.
        tower: TowerId,
    },
    /// Requests the sale of an existing tower.
    SellTower {
        /// Tower to sell.
        tower: TowerId,
    },
    /// Fires a volley of projectiles from a ready tower.
    FireProjectiles {
        /// Tower firing the volley.
        tower: TowerId,
        /// One entry per projectile.
        targets: Vec<ProjectileTarget>,
    },
    /// Moves a drone and records its current target.
    SteerDrone {
        /// Tower owning the drone.
        tower: TowerId,
        /// Drone position after the move.
        position: WorldPoint,
        /// Enemy the drone is chasing, if any.
        target: Option<EnemyId>,
    },
    /// Requests a drone melee strike against its target.
    DroneStrike {
        /// Tower owning the drone.
        tower: TowerId,
        /// Enemy being struck.
        target: EnemyId,
    },
    /// Moves a projectile to a new position.
    MoveProjectile {
        /// Projectile being moved.
        projectile: ProjectileId,
        /// Position after the move.
        position: WorldPoint,
    },
    /// Resolves a projectile impact against the listed enemies.
    DetonateProjectile {
        /// Projectile that impacted.
        projectile: ProjectileId,
        /// Enemies caught by the impact.
        hits: Vec<EnemyId>,
    },
    /// Removes a projectile whose target vanished.
    DiscardProjectile {
        /// Projectile being discarded.
        projectile: ProjectileId,
    },
    /// Removes dead enemies and spent projectiles.
    PruneEntities,
    /// Marks the active boss phase as cleared.
    ClearBoss,
    /// Closes the current wave and pays the completion bonus.
    CompleteWave {
        /// Money credited for clearing the wave.
        bonus: u32,
    },
    /// Ends the session with a victory.
    DeclareVictory,
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Index of the tick that elapsed.
        tick: u64,
    },
    /// Announces that the session entered a new mode.
    GameModeChanged {
        /// Mode that became active.
        mode: GameMode,
    },
    /// Confirms that the cursor moved.
    CursorMoved {
        /// Cell under the cursor after the move.
        cell: GridPos,
    },
    /// Confirms that a session started on a map.
    SessionStarted {
        /// Map region being played.
        map: MapId,
    },
    /// Confirms that the session was reset to the lobby.
    SessionReset,
    /// Confirms that a tile was painted into the custom map.
    TilePainted {
        /// Cell that changed.
        cell: GridPos,
        /// New tile kind.
        kind: TileKind,
    },
    /// Confirms that the custom map was erased.
    CustomMapCleared,
    /// Announces that a wave began.
    WaveStarted {
        /// Wave number.
        wave: u32,
        /// Whether bosses follow the regular rounds.
        boss_wave: bool,
    },
    /// Confirms that an enemy entered the map.
    EnemySpawned {
        /// Identifier assigned to the enemy.
        enemy: EnemyId,
        /// Variant of the enemy.
        kind: EnemyKind,
    },
    /// Reports an enemy that reached the base.
    EnemyLeaked {
        /// Enemy that leaked.
        enemy: EnemyId,
        /// Base hit points remaining.
        base_hp: u32,
    },
    /// Reports an enemy killed by towers or drones.
    EnemyKilled {
        /// Enemy that died.
        enemy: EnemyId,
        /// Money credited for the kill.
        reward: u32,
    },
    /// Announces that the bosses of a boss wave entered the map.
    BossesReleased {
        /// Number of bosses released.
        count: u32,
    },
    /// Announces that every boss of the current wave is gone.
    BossCleared {
        /// Wave the bosses belonged to.
        wave: u32,
    },
    /// Announces that a wave was cleared.
    WaveCompleted {
        /// Wave that was cleared.
        wave: u32,
        /// Money credited for clearing it.
        bonus: u32,
    },
    /// The final wave was cleared without infinite mode.
    SessionWon {
        /// Wave number reached.
        wave: u32,
    },
    /// The base ran out of hit points.
    BaseDestroyed,
    /// Confirms that a tower was constructed.
    TowerPlaced {
        /// Identifier assigned to the tower.
        tower: TowerId,
        /// Type of tower.
        kind: TowerKind,
        /// Cell the tower occupies.
        cell: GridPos,
    },
    /// Reports that a tower placement request was rejected.
    TowerPlacementRejected {
        /// Type of tower requested.
        kind: TowerKind,
        /// Cell requested.
        cell: GridPos,
        /// Specific reason the placement failed.
        reason: PlacementError,
    },
    /// Confirms that a tower gained a level.
    TowerUpgraded {
        /// Tower that was upgraded.
        tower: TowerId,
        /// Level after the upgrade.
        level: u32,
    },
    /// Reports that an upgrade request was rejected.
    TowerUpgradeRejected {
        /// Tower targeted by the request.
        tower: TowerId,
        /// Specific reason the upgrade failed.
        reason: UpgradeError,
    },
    /// Confirms that a tower was sold.
    TowerSold {
        /// Tower that was removed.
        tower: TowerId,
        /// Money refunded.
        refund: u32,
    },
    /// Reports that a sale request was rejected.
    TowerSaleRejected {
        /// Tower targeted by the request.
        tower: TowerId,
        /// Specific reason the sale failed.
        reason: SaleError,
    },
    /// Confirms that a projectile left a tower.
    ProjectileFired {
        /// Identifier assigned to the projectile.
        projectile: ProjectileId,
        /// Tower that fired it.
        tower: TowerId,
    },
}

/// Reasons a tower placement request may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlacementError {
    /// The session is not playing, so placement is disabled.
    InvalidMode,
    /// The requested cell lies outside the map.
    OutOfBounds,
    /// The requested cell is not grass.
    NotBuildable,
    /// Another tower already occupies the cell.
    Occupied,
    /// The player cannot afford the tower.
    InsufficientFunds,
}

/// Reasons a tower upgrade request may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UpgradeError {
    /// The session is not playing, so upgrades are disabled.
    InvalidMode,
    /// No tower with the provided identifier exists.
    MissingTower,
    /// The tower already reached the level cap.
    MaxLevel,
    /// The player cannot afford the upgrade.
    InsufficientFunds,
}

/// Reasons a tower sale request may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SaleError {
    /// The session is not playing, so sales are disabled.
    InvalidMode,
    /// No tower with the provided identifier exists.
    MissingTower,
}

/// Immutable representation of a single enemy used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EnemySnapshot {
    /// Generational identifier of the enemy.
    pub id: EnemyId,
    /// Variant of the enemy.
    pub kind: EnemyKind,
    /// Top-left corner of the enemy sprite in world units.
    pub position: WorldPoint,
    /// Index of the waypoint the enemy last reached.
    pub path_index: usize,
    /// Remaining hit points.
    pub hp: i32,
    /// Money paid when the enemy is killed.
    pub reward: u32,
    /// Whether the enemy still participates in the simulation.
    pub alive: bool,
}

impl EnemySnapshot {
    /// Center of the enemy in world units.
    #[must_use]
    pub fn center(&self) -> WorldPoint {
        self.position.offset(TILE_SIZE / 2.0, TILE_SIZE / 2.0)
    }
}

/// Read-only snapshot describing all enemies in registry order.
#[derive(Clone, Debug, Default)]
pub struct EnemyView {
    snapshots: Vec<EnemySnapshot>,
}

impl EnemyView {
    /// Creates a new enemy view, preserving the provided registry order.
    #[must_use]
    pub fn from_snapshots(snapshots: Vec<EnemySnapshot>) -> Self {
        Self { snapshots }
    }

    /// Iterator over the captured snapshots in registry order.
    pub fn iter(&self) -> impl Iterator<Item = &EnemySnapshot> {
        self.snapshots.iter()
    }

    /// Iterator over the snapshots of live enemies in registry order.
    pub fn iter_alive(&self) -> impl Iterator<Item = &EnemySnapshot> {
        self.snapshots.iter().filter(|snapshot| snapshot.alive)
    }

    /// Looks up a live enemy by identifier.
    #[must_use]
    pub fn get_alive(&self, id: EnemyId) -> Option<&EnemySnapshot> {
        self.iter_alive().find(|snapshot| snapshot.id == id)
    }

    /// Number of live enemies.
    #[must_use]
    pub fn alive_count(&self) -> usize {
        self.iter_alive().count()
    }

    /// Reports whether any live enemy of the provided kind remains.
    #[must_use]
    pub fn any_alive_of(&self, kind: EnemyKind) -> bool {
        self.iter_alive().any(|snapshot| snapshot.kind == kind)
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<EnemySnapshot> {
        self.snapshots
    }
}

/// Immutable representation of a drone owned by a tower.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DroneSnapshot {
    /// Current drone position.
    pub position: WorldPoint,
    /// Point the drone returns to when idle.
    pub home: WorldPoint,
    /// Travel distance per tick.
    pub speed: f32,
    /// Ticks until the next strike may land.
    pub cooldown: u32,
    /// Enemy chased during the previous tick.
    pub target: Option<EnemyId>,
}

/// Immutable representation of a single tower used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TowerSnapshot {
    /// Identifier allocated to the tower by the world.
    pub id: TowerId,
    /// Kind of tower that was constructed.
    pub kind: TowerKind,
    /// Map region the tower was built on.
    pub map: MapId,
    /// Cell the tower occupies.
    pub cell: GridPos,
    /// Current level, between 1 and [`MAX_TOWER_LEVEL`].
    pub level: u32,
    /// Current stat block.
    pub stats: TowerStats,
    /// Ticks until the tower may fire again.
    pub cooldown: u32,
    /// Money spent on construction and upgrades.
    pub invested: u32,
    /// Drone owned by the tower, for drone towers.
    pub drone: Option<DroneSnapshot>,
}

impl TowerSnapshot {
    /// Center of the tower in world units.
    #[must_use]
    pub fn center(&self) -> WorldPoint {
        self.cell.center()
    }

    /// Range presented to players when the tower is inspected.
    #[must_use]
    pub fn display_range(&self) -> f32 {
        self.stats.display_range(self.kind)
    }
}

/// Read-only snapshot describing the towers of the active map.
#[derive(Clone, Debug, Default)]
pub struct TowerView {
    snapshots: Vec<TowerSnapshot>,
}

impl TowerView {
    /// Creates a new tower view sorted by identifier.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<TowerSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured tower snapshots in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = &TowerSnapshot> {
        self.snapshots.iter()
    }

    /// Tower occupying the provided cell, if any.
    #[must_use]
    pub fn at(&self, cell: GridPos) -> Option<&TowerSnapshot> {
        self.snapshots.iter().find(|snapshot| snapshot.cell == cell)
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<TowerSnapshot> {
        self.snapshots
    }
}

/// Immutable representation of a single projectile used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProjectileSnapshot {
    /// Identifier allocated to the projectile.
    pub id: ProjectileId,
    /// Current position.
    pub position: WorldPoint,
    /// What the projectile flies toward.
    pub target: ProjectileTarget,
    /// Damage dealt on impact.
    pub damage: u32,
    /// Travel distance per tick.
    pub speed: f32,
    /// Splash radius for AOE projectiles.
    pub splash_radius: Option<f32>,
}

/// Read-only snapshot describing all live projectiles in firing order.
#[derive(Clone, Debug, Default)]
pub struct ProjectileView {
    snapshots: Vec<ProjectileSnapshot>,
}

impl ProjectileView {
    /// Creates a new projectile view, preserving firing order.
    #[must_use]
    pub fn from_snapshots(snapshots: Vec<ProjectileSnapshot>) -> Self {
        Self { snapshots }
    }

    /// Iterator over the captured projectile snapshots.
    pub fn iter(&self) -> impl Iterator<Item = &ProjectileSnapshot> {
        self.snapshots.iter()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<ProjectileSnapshot> {
        self.snapshots
    }
}

/// Read-only snapshot of the wave counters.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct WaveSnapshot {
    /// Current wave number, starting at 1.
    pub number: u32,
    /// Whether the wave is running.
    pub active: bool,
    /// Ticks elapsed since the wave started.
    pub timer: u32,
    /// Spawn rounds issued during the wave.
    pub rounds_done: u32,
    /// Bosses will be released once the regular rounds drain.
    pub boss_pending: bool,
    /// Bosses are on the map.
    pub boss_active: bool,
    /// Waves continue past the configured maximum.
    pub infinite_mode: bool,
}

/// Read-only snapshot of session-wide state presented by adapters.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct HudSnapshot {
    /// Active game mode.
    pub mode: GameMode,
    /// Terminal condition of the session.
    pub outcome: SessionOutcome,
    /// Money available.
    pub money: u32,
    /// Base hit points remaining.
    pub base_hp: u32,
    /// Cell under the cursor.
    pub cursor: GridPos,
    /// Tower kind constructed by the next build.
    pub selected_tower: TowerKind,
    /// Whether the tower information overlay is shown.
    pub show_info: bool,
    /// Tile painted by the map editor.
    pub editor_tile: TileKind,
    /// Map being played, if any.
    pub map: Option<MapId>,
    /// Whether a custom map has been authored.
    pub custom_map_exists: bool,
}

/// Read access to the tile kinds of every map region.
pub trait TileSource {
    /// Tile kind stored at `cell` of `map`; cells outside the region are
    /// reported as [`TileKind::Unknown`].
    fn tile_kind_at(&self, map: MapId, cell: GridPos) -> TileKind;
}

/// Discrete player commands polled once per tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InputCommand {
    /// Cursor or menu selection up.
    MoveUp,
    /// Cursor or menu selection down.
    MoveDown,
    /// Cursor left.
    MoveLeft,
    /// Cursor right.
    MoveRight,
    /// Chooses the tower kind to build.
    SelectTower(TowerKind),
    /// Chooses the map editor brush.
    SelectTile(TileKind),
    /// Builds a tower, or paints a tile in the editor.
    Build,
    /// Upgrades the tower under the cursor.
    Upgrade,
    /// Sells the tower under the cursor.
    Sell,
    /// Toggles the tower information overlay.
    ToggleInfo,
    /// Pauses or resumes play; leaves the editor.
    Pause,
    /// Confirms the highlighted menu entry.
    Confirm,
    /// Backs out of the current screen.
    Cancel,
    /// Opens the custom map in the editor.
    EditMap,
    /// Erases the custom map.
    DeleteMap,
}

impl InputCommand {
    /// Every command in the fixed order adapters poll them.
    pub const ALL: [InputCommand; 21] = [
        InputCommand::MoveRight,
        InputCommand::MoveLeft,
        InputCommand::MoveDown,
        InputCommand::MoveUp,
        InputCommand::SelectTower(TowerKind::Normal),
        InputCommand::SelectTower(TowerKind::Aoe),
        InputCommand::SelectTower(TowerKind::Drone),
        InputCommand::SelectTile(TileKind::Grass),
        InputCommand::SelectTile(TileKind::Tree),
        InputCommand::SelectTile(TileKind::Path),
        InputCommand::SelectTile(TileKind::Base),
        InputCommand::SelectTile(TileKind::Spawn),
        InputCommand::Build,
        InputCommand::ToggleInfo,
        InputCommand::Upgrade,
        InputCommand::Sell,
        InputCommand::Pause,
        InputCommand::Confirm,
        InputCommand::Cancel,
        InputCommand::EditMap,
        InputCommand::DeleteMap,
    ];
}

/// Edge-triggered query over the fixed command set.
pub trait InputPoller {
    /// Reports whether the command was pressed during the current frame.
    fn pressed(&self, command: InputCommand) -> bool;

    /// Commands pressed this frame in the fixed polling order.
    fn pressed_commands(&self) -> Vec<InputCommand> {
        InputCommand::ALL
            .iter()
            .copied()
            .filter(|command| self.pressed(*command))
            .collect()
    }
}

/// In-memory input snapshot for a single frame.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FrameInput {
    pressed: Vec<InputCommand>,
}

impl FrameInput {
    /// Creates a frame with no pressed commands.
    #[must_use]
    pub fn idle() -> Self {
        Self::default()
    }

    /// Creates a frame from the provided commands, ignoring duplicates.
    #[must_use]
    pub fn from_commands(commands: impl IntoIterator<Item = InputCommand>) -> Self {
        let mut pressed = Vec::new();
        for command in commands {
            if !pressed.contains(&command) {
                pressed.push(command);
            }
        }
        Self { pressed }
    }

    /// Reports whether no command was pressed.
    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.pressed.is_empty()
    }
}

impl InputPoller for FrameInput {
    fn pressed(&self, command: InputCommand) -> bool {
        self.pressed.contains(&command)
    }
}
