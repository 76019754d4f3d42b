#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Route discovery over a map region.
//!
//! Every spawn tile is connected to the region's base with a depth-first
//! traversal over path tiles. The traversal explores neighbours in a fixed
//! order so identical maps always produce identical routes; it returns the
//! first route found rather than the shortest one.

use machines_td_core::{GridPos, MapId, Path, Routes, TileKind, TileSource, MAP_TILES};

/// Neighbour offsets explored by the traversal, in order.
const NEIGHBOR_OFFSETS: [(i64, i64); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];

/// Discovers the routes enemies follow on the provided map region.
///
/// Returns empty [`Routes`] when the region lacks a spawn or a base. Spawns
/// without a route still appear in [`Routes::spawns`].
#[must_use]
pub fn find_routes<T>(tiles: &T, map: MapId) -> Routes
where
    T: TileSource + ?Sized,
{
    let mut spawns = Vec::new();
    let mut goal = None;

    for y in 0..MAP_TILES {
        for x in 0..MAP_TILES {
            let cell = GridPos::new(x, y);
            match tiles.tile_kind_at(map, cell) {
                TileKind::Spawn => spawns.push(cell),
                TileKind::Base if goal.is_none() => goal = Some(cell),
                _ => {}
            }
        }
    }

    let Some(goal) = goal else {
        return Routes::default();
    };
    if spawns.is_empty() {
        return Routes::default();
    }

    let mut search = DepthFirstSearch::default();
    let paths = spawns
        .iter()
        .filter_map(|spawn| search.run(tiles, map, *spawn, goal))
        .collect();

    Routes { paths, spawns }
}

#[derive(Clone, Copy, Debug)]
struct Frame {
    cell: GridPos,
    next_neighbor: usize,
}

/// Reusable buffers for the iterative traversal.
#[derive(Debug, Default)]
struct DepthFirstSearch {
    visited: Vec<bool>,
    stack: Vec<Frame>,
}

impl DepthFirstSearch {
    fn run<T>(&mut self, tiles: &T, map: MapId, start: GridPos, goal: GridPos) -> Option<Path>
    where
        T: TileSource + ?Sized,
    {
        self.visited.clear();
        self.visited.resize((MAP_TILES * MAP_TILES) as usize, false);
        self.stack.clear();

        self.visit(start);
        self.stack.push(Frame {
            cell: start,
            next_neighbor: 0,
        });

        while let Some(frame) = self.stack.last_mut() {
            if frame.cell == goal {
                let cells = self.stack.iter().map(|frame| frame.cell).collect();
                return Path::new(cells);
            }

            let Some(&(dx, dy)) = NEIGHBOR_OFFSETS.get(frame.next_neighbor) else {
                let _ = self.stack.pop();
                continue;
            };
            frame.next_neighbor += 1;

            let Some(neighbor) = offset(frame.cell, dx, dy) else {
                continue;
            };
            if self.is_visited(neighbor) || !tiles.tile_kind_at(map, neighbor).is_passable() {
                continue;
            }

            self.visit(neighbor);
            self.stack.push(Frame {
                cell: neighbor,
                next_neighbor: 0,
            });
        }

        None
    }

    fn visit(&mut self, cell: GridPos) {
        if let Some(slot) = index(cell).and_then(|index| self.visited.get_mut(index)) {
            *slot = true;
        }
    }

    fn is_visited(&self, cell: GridPos) -> bool {
        index(cell)
            .and_then(|index| self.visited.get(index))
            .copied()
            .unwrap_or(true)
    }
}

fn index(cell: GridPos) -> Option<usize> {
    cell.in_bounds()
        .then(|| (cell.y() * MAP_TILES + cell.x()) as usize)
}

fn offset(cell: GridPos, dx: i64, dy: i64) -> Option<GridPos> {
    let x = i64::from(cell.x()) + dx;
    let y = i64::from(cell.y()) + dy;
    let bound = i64::from(MAP_TILES);
    if (0..bound).contains(&x) && (0..bound).contains(&y) {
        Some(GridPos::new(x as u32, y as u32))
    } else {
        None
    }
}
