//! Scripted input replayed one frame per tick.
//!
//! Each non-empty line reads `<tick> <command> [argument]`; `#` starts a
//! comment. Several lines may share a tick and are pressed together.

use std::collections::BTreeMap;

use machines_td_core::{FrameInput, InputCommand, TileKind, TowerKind};
use thiserror::Error;

/// Input presses keyed by the tick they occur on.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct InputScript {
    frames: BTreeMap<u64, Vec<InputCommand>>,
}

impl InputScript {
    /// Parses the provided script contents.
    pub(crate) fn parse(contents: &str) -> Result<Self, ScriptError> {
        let mut frames: BTreeMap<u64, Vec<InputCommand>> = BTreeMap::new();
        for (index, raw) in contents.lines().enumerate() {
            let line = index + 1;
            let text = raw.split('#').next().unwrap_or_default().trim();
            if text.is_empty() {
                continue;
            }

            let mut words = text.split_whitespace();
            let tick_text = words.next().unwrap_or_default();
            let tick = tick_text
                .parse::<u64>()
                .map_err(|_| ScriptError::InvalidTick {
                    line,
                    value: tick_text.to_owned(),
                })?;
            let name = words.next().ok_or(ScriptError::MissingCommand { line })?;
            let command = parse_command(line, name, words.next())?;
            frames.entry(tick).or_default().push(command);
        }
        Ok(Self { frames })
    }

    /// Input pressed on the provided tick.
    pub(crate) fn frame(&self, tick: u64) -> FrameInput {
        self.frames
            .get(&tick)
            .map(|commands| FrameInput::from_commands(commands.iter().copied()))
            .unwrap_or_default()
    }

    /// Last tick carrying input, if any.
    pub(crate) fn last_tick(&self) -> Option<u64> {
        self.frames.keys().next_back().copied()
    }
}

fn parse_command(
    line: usize,
    name: &str,
    argument: Option<&str>,
) -> Result<InputCommand, ScriptError> {
    let command = match name {
        "up" => InputCommand::MoveUp,
        "down" => InputCommand::MoveDown,
        "left" => InputCommand::MoveLeft,
        "right" => InputCommand::MoveRight,
        "build" => InputCommand::Build,
        "upgrade" => InputCommand::Upgrade,
        "sell" => InputCommand::Sell,
        "info" => InputCommand::ToggleInfo,
        "pause" => InputCommand::Pause,
        "confirm" => InputCommand::Confirm,
        "cancel" => InputCommand::Cancel,
        "edit-map" => InputCommand::EditMap,
        "delete-map" => InputCommand::DeleteMap,
        "select-tower" => {
            let argument = require(line, name, argument)?;
            let kind = match argument {
                "normal" => TowerKind::Normal,
                "aoe" => TowerKind::Aoe,
                "drone" => TowerKind::Drone,
                other => return Err(unknown_argument(line, other)),
            };
            InputCommand::SelectTower(kind)
        }
        "select-tile" => {
            let argument = require(line, name, argument)?;
            let kind = match argument {
                "grass" => TileKind::Grass,
                "tree" => TileKind::Tree,
                "path" => TileKind::Path,
                "base" => TileKind::Base,
                "spawn" => TileKind::Spawn,
                other => return Err(unknown_argument(line, other)),
            };
            InputCommand::SelectTile(kind)
        }
        other => {
            return Err(ScriptError::UnknownCommand {
                line,
                command: other.to_owned(),
            })
        }
    };
    Ok(command)
}

fn require<'a>(
    line: usize,
    name: &str,
    argument: Option<&'a str>,
) -> Result<&'a str, ScriptError> {
    argument.ok_or_else(|| ScriptError::MissingArgument {
        line,
        command: name.to_owned(),
    })
}

fn unknown_argument(line: usize, argument: &str) -> ScriptError {
    ScriptError::UnknownArgument {
        line,
        argument: argument.to_owned(),
    }
}

/// Errors raised while parsing an input script.
#[derive(Debug, Error, PartialEq, Eq)]
pub(crate) enum ScriptError {
    /// The line does not start with a tick number.
    #[error("line {line}: '{value}' is not a tick number")]
    InvalidTick {
        /// One-based line number.
        line: usize,
        /// Offending text.
        value: String,
    },
    /// The tick is not followed by a command.
    #[error("line {line}: missing command after the tick")]
    MissingCommand {
        /// One-based line number.
        line: usize,
    },
    /// The command name is not recognised.
    #[error("line {line}: unknown command '{command}'")]
    UnknownCommand {
        /// One-based line number.
        line: usize,
        /// Offending command name.
        command: String,
    },
    /// The command needs an argument that was not given.
    #[error("line {line}: '{command}' needs an argument")]
    MissingArgument {
        /// One-based line number.
        line: usize,
        /// Command missing its argument.
        command: String,
    },
    /// The argument is not recognised.
    #[error("line {line}: unknown argument '{argument}'")]
    UnknownArgument {
        /// One-based line number.
        line: usize,
        /// Offending argument.
        argument: String,
    },
}
