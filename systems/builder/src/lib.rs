#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure builder system responsible for emitting tower purchase, upgrade and sale commands.

use machines_td_core::{
    Command, Event, GameMode, GridPos, InputCommand, InputPoller, TowerId, TowerKind,
};

/// Input snapshot distilled from adapter-provided frame input data.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BuilderInput {
    /// Indicates whether the player requested a tower on this frame.
    pub build_action: bool,
    /// Indicates whether the player requested an upgrade on this frame.
    pub upgrade_action: bool,
    /// Indicates whether the player requested a sale on this frame.
    pub sell_action: bool,
    /// Cell currently under the cursor.
    pub cursor_cell: GridPos,
    /// Tower kind constructed by a build request.
    pub selected_kind: TowerKind,
}

impl BuilderInput {
    /// Creates a new input descriptor with explicit field values.
    #[must_use]
    pub const fn new(
        build_action: bool,
        upgrade_action: bool,
        sell_action: bool,
        cursor_cell: GridPos,
        selected_kind: TowerKind,
    ) -> Self {
        Self {
            build_action,
            upgrade_action,
            sell_action,
            cursor_cell,
            selected_kind,
        }
    }

    /// Reads the builder actions pressed on the current frame.
    #[must_use]
    pub fn from_poller<P>(input: &P, cursor_cell: GridPos, selected_kind: TowerKind) -> Self
    where
        P: InputPoller + ?Sized,
    {
        Self::new(
            input.pressed(InputCommand::Build),
            input.pressed(InputCommand::Upgrade),
            input.pressed(InputCommand::Sell),
            cursor_cell,
            selected_kind,
        )
    }
}

impl Default for BuilderInput {
    fn default() -> Self {
        Self {
            build_action: false,
            upgrade_action: false,
            sell_action: false,
            cursor_cell: GridPos::new(0, 0),
            selected_kind: TowerKind::Normal,
        }
    }
}

/// Builder system that translates cursor input into economy commands.
#[derive(Debug, Clone)]
pub struct Builder {
    mode: GameMode,
    finished: bool,
}

impl Default for Builder {
    fn default() -> Self {
        Self::new()
    }
}

impl Builder {
    /// Creates a new builder system instance.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            mode: GameMode::Menu,
            finished: false,
        }
    }

    /// Consumes world events and adapter-derived input to emit builder commands.
    ///
    /// The `tower_at` closure should mirror the semantics of the world's
    /// `query::tower_at` helper so the system can identify the hovered tower.
    pub fn handle<F>(
        &mut self,
        events: &[Event],
        input: BuilderInput,
        mut tower_at: F,
        out: &mut Vec<Command>,
    ) where
        F: FnMut(GridPos) -> Option<TowerId>,
    {
        for event in events {
            match event {
                Event::GameModeChanged { mode } => self.mode = *mode,
                Event::SessionWon { .. } | Event::BaseDestroyed => self.finished = true,
                Event::SessionStarted { .. } | Event::SessionReset => self.finished = false,
                _ => {}
            }
        }

        if self.mode != GameMode::Playing || self.finished {
            return;
        }

        if input.build_action {
            out.push(Command::PlaceTower {
                kind: input.selected_kind,
                cell: input.cursor_cell,
            });
        }

        if !input.upgrade_action && !input.sell_action {
            return;
        }

        let Some(tower) = tower_at(input.cursor_cell) else {
            return;
        };
        if input.upgrade_action {
            out.push(Command::UpgradeTower { tower });
        }
        if input.sell_action {
            out.push(Command::SellTower { tower });
        }
    }
}
