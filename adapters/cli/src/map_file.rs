//! Text format for custom maps: sixteen rows of sixteen glyphs.

use machines_td_core::{Command, GridPos, TileKind, MAP_TILES};
use thiserror::Error;

/// Glyphs accepted in a custom map file.
const GLYPHS: [(char, TileKind); 5] = [
    ('.', TileKind::Grass),
    ('#', TileKind::Path),
    ('S', TileKind::Spawn),
    ('B', TileKind::Base),
    ('T', TileKind::Tree),
];

/// Custom map parsed from its text representation, stored row by row.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct CustomMap {
    tiles: Vec<TileKind>,
}

impl CustomMap {
    /// Parses the provided file contents. Blank trailing lines are ignored.
    pub(crate) fn parse(contents: &str) -> Result<Self, MapFileError> {
        let rows: Vec<&str> = contents
            .trim_end()
            .lines()
            .map(str::trim_end)
            .collect();
        if rows.len() != MAP_TILES as usize {
            return Err(MapFileError::RowCount { found: rows.len() });
        }

        let mut tiles = Vec::with_capacity((MAP_TILES * MAP_TILES) as usize);
        for (row, line) in rows.iter().enumerate() {
            let glyphs: Vec<char> = line.chars().collect();
            if glyphs.len() != MAP_TILES as usize {
                return Err(MapFileError::RowLength {
                    row: row + 1,
                    found: glyphs.len(),
                });
            }
            for (column, glyph) in glyphs.into_iter().enumerate() {
                let kind = tile_for_glyph(glyph).ok_or(MapFileError::UnknownGlyph {
                    row: row + 1,
                    column: column + 1,
                    glyph,
                })?;
                tiles.push(kind);
            }
        }

        Ok(Self { tiles })
    }

    /// Commands painting every cell of the map into the custom region.
    pub(crate) fn paint_commands(&self) -> impl Iterator<Item = Command> + '_ {
        self.tiles.iter().enumerate().map(|(index, &kind)| {
            let index = index as u32;
            Command::PaintTile {
                cell: GridPos::new(index % MAP_TILES, index / MAP_TILES),
                kind,
            }
        })
    }
}

fn tile_for_glyph(glyph: char) -> Option<TileKind> {
    GLYPHS
        .iter()
        .find(|(candidate, _)| *candidate == glyph)
        .map(|&(_, kind)| kind)
}

/// Errors raised while reading a custom map file.
#[derive(Debug, Error, PartialEq, Eq)]
pub(crate) enum MapFileError {
    /// The file does not contain exactly sixteen rows.
    #[error("custom map must have 16 rows, found {found}")]
    RowCount {
        /// Number of rows present.
        found: usize,
    },
    /// A row does not contain exactly sixteen glyphs.
    #[error("row {row} must have 16 tiles, found {found}")]
    RowLength {
        /// One-based row number.
        row: usize,
        /// Number of glyphs present.
        found: usize,
    },
    /// A glyph outside `. # S B T` was encountered.
    #[error("unknown tile '{glyph}' at row {row}, column {column}")]
    UnknownGlyph {
        /// One-based row number.
        row: usize,
        /// One-based column number.
        column: usize,
        /// Offending character.
        glyph: char,
    },
}
