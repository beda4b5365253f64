#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Randomised depth-first maze carving.
//!
//! The generator walks the tile grid with an explicit stack, carving a passage
//! to a uniformly chosen unvisited neighbour of the stack top and backtracking
//! when none remain. The resulting adjacency graph is a spanning tree: every
//! tile is reachable and exactly `width * height - 1` passages are opened.

use maze_runner_core::{Direction, MazeDimensions, TilePosition, WallGrid};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::debug;

/// Statistics collected while carving a maze.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CarveReport {
    /// Tile the walk started from.
    pub start: TilePosition,
    /// Number of tiles visited; always equals the tile count.
    pub visited: usize,
    /// Number of walls removed between adjacent tiles.
    pub carved: usize,
    /// Number of times the walk popped a dead end off the stack.
    pub backtracks: usize,
    /// Deepest stack observed during the walk.
    pub peak_stack_depth: usize,
}

/// Carved wall layout together with the statistics of the walk.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Carving {
    /// Wall layout of the maze.
    pub walls: WallGrid,
    /// Statistics describing how the layout was produced.
    pub report: CarveReport,
}

/// Carves a perfect maze of the requested size using `rng`.
#[must_use]
pub fn generate<R>(dimensions: MazeDimensions, rng: &mut R) -> WallGrid
where
    R: Rng + ?Sized,
{
    carve(dimensions, rng).walls
}

/// Carves a perfect maze using a ChaCha8 generator seeded from `seed`.
#[must_use]
pub fn generate_seeded(dimensions: MazeDimensions, seed: u64) -> WallGrid {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    generate(dimensions, &mut rng)
}

/// Carves a perfect maze and reports how the walk unfolded.
#[must_use]
pub fn carve<R>(dimensions: MazeDimensions, rng: &mut R) -> Carving
where
    R: Rng + ?Sized,
{
    let total = dimensions.tile_count();
    let mut walls = WallGrid::closed(dimensions);
    let mut visited = vec![false; total];

    let start = TilePosition::new(
        rng.gen_range(0..dimensions.width()),
        rng.gen_range(0..dimensions.height()),
    );
    mark_visited(&mut visited, dimensions, start);

    let mut stack = vec![start];
    let mut report = CarveReport {
        start,
        visited: 1,
        carved: 0,
        backtracks: 0,
        peak_stack_depth: 1,
    };

    while report.visited < total {
        let Some(&current) = stack.last() else {
            unreachable!(
                "carving stack emptied after visiting {} of {} tiles",
                report.visited, total
            );
        };

        match pick_unvisited(current, dimensions, &visited, rng) {
            Some(direction) => {
                let Some(next) = walls.carve(current, direction) else {
                    unreachable!("unvisited neighbour {direction:?} of {current:?} left the grid");
                };
                mark_visited(&mut visited, dimensions, next);
                report.visited += 1;
                report.carved += 1;
                stack.push(next);
                report.peak_stack_depth = report.peak_stack_depth.max(stack.len());
            }
            None => {
                let _ = stack.pop();
                report.backtracks += 1;
            }
        }
    }

    debug!(
        %dimensions,
        ?start,
        carved = report.carved,
        backtracks = report.backtracks,
        peak_stack_depth = report.peak_stack_depth,
        "carved maze"
    );

    Carving { walls, report }
}

fn pick_unvisited<R>(
    current: TilePosition,
    dimensions: MazeDimensions,
    visited: &[bool],
    rng: &mut R,
) -> Option<Direction>
where
    R: Rng + ?Sized,
{
    let mut candidates = [Direction::North; 4];
    let mut count = 0;
    for direction in Direction::ALL {
        let Some(neighbour) = current.neighbour(direction, dimensions) else {
            continue;
        };
        if !is_visited(visited, dimensions, neighbour) {
            candidates[count] = direction;
            count += 1;
        }
    }

    if count == 0 {
        None
    } else {
        Some(candidates[rng.gen_range(0..count)])
    }
}

fn is_visited(visited: &[bool], dimensions: MazeDimensions, tile: TilePosition) -> bool {
    dimensions
        .index(tile)
        .and_then(|index| visited.get(index).copied())
        .unwrap_or(true)
}

fn mark_visited(visited: &mut [bool], dimensions: MazeDimensions, tile: TilePosition) {
    if let Some(slot) = dimensions.index(tile).and_then(|index| visited.get_mut(index)) {
        *slot = true;
    }
}
