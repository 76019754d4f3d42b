//! Tile atlas holding the three map regions.

use machines_td_core::{GridPos, MapId, TileKind, MAP_TILES};

const MAP1_LAYOUT: [&str; 16] = [
    "................",
    "S#####..........",
    ".....#..........",
    ".....#...T......",
    ".....#######....",
    "...........#....",
    "..T........#....",
    "...........#....",
    "...#########....",
    "...#............",
    "...#.......T....",
    "...######B......",
    "................",
    ".T..........T...",
    "................",
    "......T.........",
];

const MAP2_LAYOUT: [&str; 16] = [
    "S####...........",
    "....#...........",
    "....#....T......",
    "....#...........",
    "....######......",
    ".........#......",
    "T........#......",
    ".........#......",
    "S########B......",
    "................",
    "..T.........T...",
    "................",
    "......T.........",
    "................",
    ".T..........T...",
    "................",
];

/// Parses a single layout glyph into the tile it represents.
#[must_use]
pub(crate) fn tile_from_glyph(glyph: char) -> TileKind {
    match glyph {
        '.' => TileKind::Grass,
        '#' => TileKind::Path,
        'S' => TileKind::Spawn,
        'B' => TileKind::Base,
        'T' => TileKind::Tree,
        _ => TileKind::Unknown,
    }
}

/// Dense 16×16 tile storage for one map region.
#[derive(Clone, Debug)]
struct Region {
    cells: Vec<TileKind>,
}

impl Region {
    fn filled(kind: TileKind) -> Self {
        Self {
            cells: vec![kind; (MAP_TILES * MAP_TILES) as usize],
        }
    }

    fn from_layout(layout: &[&str; 16]) -> Self {
        let mut region = Self::filled(TileKind::Grass);
        for (y, row) in layout.iter().enumerate() {
            for (x, glyph) in row.chars().enumerate() {
                region.set(GridPos::new(x as u32, y as u32), tile_from_glyph(glyph));
            }
        }
        region
    }

    fn index(cell: GridPos) -> Option<usize> {
        cell.in_bounds()
            .then(|| (cell.y() * MAP_TILES + cell.x()) as usize)
    }

    fn get(&self, cell: GridPos) -> TileKind {
        Self::index(cell)
            .and_then(|index| self.cells.get(index).copied())
            .unwrap_or(TileKind::Unknown)
    }

    fn set(&mut self, cell: GridPos, kind: TileKind) {
        if let Some(slot) = Self::index(cell).and_then(|index| self.cells.get_mut(index)) {
            *slot = kind;
        }
    }
}

/// Stores the built-in regions and the player-authored custom region.
#[derive(Clone, Debug)]
pub(crate) struct TileAtlas {
    map1: Region,
    map2: Region,
    custom: Region,
    custom_exists: bool,
}

impl TileAtlas {
    /// Creates an atlas with the built-in layouts and an all-grass custom region.
    pub(crate) fn new() -> Self {
        Self {
            map1: Region::from_layout(&MAP1_LAYOUT),
            map2: Region::from_layout(&MAP2_LAYOUT),
            custom: Region::filled(TileKind::Grass),
            custom_exists: false,
        }
    }

    fn region(&self, map: MapId) -> &Region {
        match map {
            MapId::Map1 => &self.map1,
            MapId::Map2 => &self.map2,
            MapId::Custom => &self.custom,
        }
    }

    /// Tile stored at `cell` of `map`, or `Unknown` outside the region.
    pub(crate) fn kind_at(&self, map: MapId, cell: GridPos) -> TileKind {
        self.region(map).get(cell)
    }

    /// Overwrites a custom-region cell and marks the custom map as authored.
    pub(crate) fn paint(&mut self, cell: GridPos, kind: TileKind) -> bool {
        if !cell.in_bounds() {
            return false;
        }
        self.custom.set(cell, kind);
        self.custom_exists = true;
        true
    }

    /// Resets the custom region to grass.
    pub(crate) fn clear_custom(&mut self) {
        self.custom = Region::filled(TileKind::Grass);
        self.custom_exists = false;
    }

    /// Reports whether the custom region has been authored.
    pub(crate) fn custom_exists(&self) -> bool {
        self.custom_exists
    }
}
