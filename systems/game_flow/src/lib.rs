#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Screen state machine that turns polled input into session commands.
//!
//! The world owns the active [`GameMode`]; this system only tracks the menu
//! highlights that never leave the screen they belong to. Tower purchases are
//! left to the builder system.

use machines_td_core::{
    Command, Direction, Event, GameMode, GridPos, HudSnapshot, InputCommand, InputPoller, MapId,
    TileKind, TileSource, TowerKind, DEFAULT_BOSS_INTERVAL,
};
use machines_td_system_pathfinding::find_routes;
use tracing::{info, warn};

/// Entries of the pause menu.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PauseEntry {
    /// Return to the running session.
    Resume,
    /// Abandon the session and go back to the main menu.
    ReturnToLobby,
}

/// Entries offered once a boss wave has been cleared.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BossEntry {
    /// Abandon the session and go back to the main menu.
    ReturnToLobby,
    /// Keep playing past the configured wave limit.
    Continue,
}

const EDITOR_BRUSHES: [TileKind; 5] = [
    TileKind::Grass,
    TileKind::Tree,
    TileKind::Path,
    TileKind::Base,
    TileKind::Spawn,
];

const CURSOR_MOVES: [(InputCommand, Direction); 4] = [
    (InputCommand::MoveRight, Direction::East),
    (InputCommand::MoveLeft, Direction::West),
    (InputCommand::MoveDown, Direction::South),
    (InputCommand::MoveUp, Direction::North),
];

/// Game flow system tracking menu highlights across frames.
#[derive(Debug, Clone)]
pub struct GameFlow {
    map_selection: usize,
    pause_selection: PauseEntry,
    boss_selection: BossEntry,
    boss_interval: u32,
}

impl Default for GameFlow {
    fn default() -> Self {
        Self::new()
    }
}

impl GameFlow {
    /// Creates a game flow with the first map and menu entries highlighted.
    #[must_use]
    pub const fn new() -> Self {
        Self::with_boss_interval(DEFAULT_BOSS_INTERVAL)
    }

    /// Creates a game flow that skips `boss_interval` waves when continuing
    /// after a boss.
    #[must_use]
    pub const fn with_boss_interval(boss_interval: u32) -> Self {
        Self {
            map_selection: 0,
            pause_selection: PauseEntry::Resume,
            boss_selection: BossEntry::ReturnToLobby,
            boss_interval,
        }
    }

    /// Map highlighted on the map selection screen.
    #[must_use]
    pub fn map_selection(&self) -> MapId {
        MapId::ALL[self.map_selection % MapId::ALL.len()]
    }

    /// Entry highlighted on the pause screen.
    #[must_use]
    pub const fn pause_selection(&self) -> PauseEntry {
        self.pause_selection
    }

    /// Entry highlighted on the boss choice screen.
    #[must_use]
    pub const fn boss_selection(&self) -> BossEntry {
        self.boss_selection
    }

    /// Translates the frame's input into commands for the active screen.
    pub fn handle<P, T>(
        &mut self,
        input: &P,
        hud: &HudSnapshot,
        tiles: &T,
        out: &mut Vec<Command>,
    ) where
        P: InputPoller + ?Sized,
        T: TileSource + ?Sized,
    {
        match hud.mode {
            GameMode::Menu => {
                if input.pressed(InputCommand::Confirm) {
                    out.push(Command::SetGameMode {
                        mode: GameMode::MapSelect,
                    });
                }
            }
            GameMode::MapSelect => self.map_select(input, hud, tiles, out),
            GameMode::Playing => self.playing(input, hud, out),
            GameMode::Paused => self.paused(input, out),
            GameMode::BossChoice => self.boss_choice(input, out),
            GameMode::MapEditor => editor(input, hud, out),
        }
    }

    /// Reacts to world events that change the active screen.
    pub fn observe(&mut self, events: &[Event], out: &mut Vec<Command>) {
        for event in events {
            if let Event::BossCleared { wave } = event {
                info!(wave, "offering boss choice");
                self.boss_selection = BossEntry::ReturnToLobby;
                out.push(Command::SetGameMode {
                    mode: GameMode::BossChoice,
                });
            }
        }
    }

    fn map_select<P, T>(
        &mut self,
        input: &P,
        hud: &HudSnapshot,
        tiles: &T,
        out: &mut Vec<Command>,
    ) where
        P: InputPoller + ?Sized,
        T: TileSource + ?Sized,
    {
        let count = MapId::ALL.len();
        if input.pressed(InputCommand::MoveUp) {
            self.map_selection = (self.map_selection + count - 1) % count;
        }
        if input.pressed(InputCommand::MoveDown) {
            self.map_selection = (self.map_selection + 1) % count;
        }

        if input.pressed(InputCommand::Confirm) {
            let map = self.map_selection();
            if map == MapId::Custom && !hud.custom_map_exists {
                open_editor(out);
                return;
            }
            let routes = find_routes(tiles, map);
            if routes.is_playable() {
                out.push(Command::EnterPlaying { map, routes });
                return;
            }
            if map == MapId::Custom {
                info!("custom map has no route, reopening the editor");
                open_editor(out);
                return;
            }
            warn!(?map, "map has no route from a spawn to the base");
        }

        if input.pressed(InputCommand::EditMap) {
            open_editor(out);
            return;
        }

        if input.pressed(InputCommand::DeleteMap) && hud.custom_map_exists {
            out.push(Command::ClearCustomMap);
        }

        if input.pressed(InputCommand::Cancel) {
            out.push(Command::SetGameMode {
                mode: GameMode::Menu,
            });
        }
    }

    fn playing<P>(&mut self, input: &P, hud: &HudSnapshot, out: &mut Vec<Command>)
    where
        P: InputPoller + ?Sized,
    {
        if hud.outcome.is_terminal() {
            if input.pressed(InputCommand::Confirm) {
                out.push(Command::ResetSession);
            }
            return;
        }

        if input.pressed(InputCommand::Pause) {
            self.pause_selection = PauseEntry::Resume;
            out.push(Command::SetGameMode {
                mode: GameMode::Paused,
            });
            return;
        }

        push_cursor_moves(input, out);

        for kind in TowerKind::ALL {
            if input.pressed(InputCommand::SelectTower(kind)) {
                out.push(Command::SelectTowerKind { kind });
            }
        }

        if input.pressed(InputCommand::ToggleInfo) {
            out.push(Command::ToggleTowerInfo);
        }
    }

    fn paused<P>(&mut self, input: &P, out: &mut Vec<Command>)
    where
        P: InputPoller + ?Sized,
    {
        if input.pressed(InputCommand::Pause) {
            out.push(Command::SetGameMode {
                mode: GameMode::Playing,
            });
            return;
        }

        if input.pressed(InputCommand::MoveUp) || input.pressed(InputCommand::MoveDown) {
            self.pause_selection = match self.pause_selection {
                PauseEntry::Resume => PauseEntry::ReturnToLobby,
                PauseEntry::ReturnToLobby => PauseEntry::Resume,
            };
        }

        if input.pressed(InputCommand::Confirm) {
            match self.pause_selection {
                PauseEntry::Resume => out.push(Command::SetGameMode {
                    mode: GameMode::Playing,
                }),
                PauseEntry::ReturnToLobby => out.push(Command::ResetSession),
            }
        }
    }

    fn boss_choice<P>(&mut self, input: &P, out: &mut Vec<Command>)
    where
        P: InputPoller + ?Sized,
    {
        if input.pressed(InputCommand::MoveUp) || input.pressed(InputCommand::MoveDown) {
            self.boss_selection = match self.boss_selection {
                BossEntry::ReturnToLobby => BossEntry::Continue,
                BossEntry::Continue => BossEntry::ReturnToLobby,
            };
        }

        if input.pressed(InputCommand::Confirm) {
            match self.boss_selection {
                BossEntry::ReturnToLobby => out.push(Command::ResetSession),
                BossEntry::Continue => out.push(Command::ContinueAfterBoss {
                    interval: self.boss_interval,
                }),
            }
        }
    }
}

fn editor<P>(input: &P, hud: &HudSnapshot, out: &mut Vec<Command>)
where
    P: InputPoller + ?Sized,
{
    push_cursor_moves(input, out);
    let cursor = moved_cursor(input, hud.cursor);

    let mut brush = hud.editor_tile;
    for kind in EDITOR_BRUSHES {
        if input.pressed(InputCommand::SelectTile(kind)) {
            brush = kind;
            out.push(Command::SelectEditorTile { kind });
        }
    }

    if input.pressed(InputCommand::Build) {
        out.push(Command::PaintTile {
            cell: cursor,
            kind: brush,
        });
    }

    if input.pressed(InputCommand::Pause) || input.pressed(InputCommand::Cancel) {
        out.push(Command::SetGameMode {
            mode: GameMode::MapSelect,
        });
    }
}

fn open_editor(out: &mut Vec<Command>) {
    out.push(Command::SetGameMode {
        mode: GameMode::MapEditor,
    });
}

fn push_cursor_moves<P>(input: &P, out: &mut Vec<Command>)
where
    P: InputPoller + ?Sized,
{
    for (command, direction) in CURSOR_MOVES {
        if input.pressed(command) {
            out.push(Command::MoveCursor { direction });
        }
    }
}

/// Cell the cursor reaches once this frame's moves are applied.
fn moved_cursor<P>(input: &P, cursor: GridPos) -> GridPos
where
    P: InputPoller + ?Sized,
{
    CURSOR_MOVES
        .iter()
        .filter(|(command, _)| input.pressed(*command))
        .fold(cursor, |cell, (_, direction)| cell.step_clamped(*direction))
}
