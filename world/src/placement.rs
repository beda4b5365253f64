use maze_runner_core::{MazeDimensions, TilePosition};
use rand::Rng;
use tracing::warn;

/// Chooses the agent's starting tile uniformly among all tiles.
pub(crate) fn choose_spawn<R>(dimensions: MazeDimensions, rng: &mut R) -> TilePosition
where
    R: Rng + ?Sized,
{
    TilePosition::new(
        rng.gen_range(0..dimensions.width()),
        rng.gen_range(0..dimensions.height()),
    )
}

/// Minimum axis distance an exit must exceed on both axes.
pub(crate) const fn exit_threshold(dimensions: MazeDimensions) -> u32 {
    dimensions.max_extent() / 3
}

pub(crate) fn is_valid_exit(spawn: TilePosition, candidate: TilePosition, threshold: u32) -> bool {
    let (columns, rows) = spawn.axis_distance(candidate);
    columns > threshold && rows > threshold
}

/// Chooses the exit tile for a maze whose agent starts on `spawn`.
///
/// Random draws are attempted first. When they all miss, a valid tile is
/// drawn from the full candidate list, and when no tile qualifies the tile
/// farthest from the spawn on its nearer axis is used instead.
pub(crate) fn choose_exit<R>(
    dimensions: MazeDimensions,
    spawn: TilePosition,
    attempts: u32,
    rng: &mut R,
) -> TilePosition
where
    R: Rng + ?Sized,
{
    let threshold = exit_threshold(dimensions);

    for _ in 0..attempts {
        let candidate = choose_spawn(dimensions, rng);
        if is_valid_exit(spawn, candidate, threshold) {
            return candidate;
        }
    }

    let candidates: Vec<TilePosition> = dimensions
        .positions()
        .filter(|candidate| is_valid_exit(spawn, *candidate, threshold))
        .collect();
    if !candidates.is_empty() {
        return candidates[rng.gen_range(0..candidates.len())];
    }

    let fallback = dimensions
        .positions()
        .max_by_key(|candidate| {
            let (columns, rows) = spawn.axis_distance(*candidate);
            (columns.min(rows), columns + rows)
        })
        .unwrap_or(spawn);
    warn!(
        %dimensions,
        ?spawn,
        ?fallback,
        threshold,
        "no tile satisfies the exit distance; using the farthest tile"
    );
    fallback
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn dimensions(width: u32, height: u32) -> MazeDimensions {
        MazeDimensions::new(width, height).expect("valid dimensions")
    }

    #[test]
    fn exit_exceeds_threshold_on_both_axes() {
        let mut rng = ChaCha8Rng::seed_from_u64(8);
        let maze = dimensions(9, 9);
        for _ in 0..200 {
            let spawn = choose_spawn(maze, &mut rng);
            let exit = choose_exit(maze, spawn, 1024, &mut rng);
            let (columns, rows) = spawn.axis_distance(exit);
            assert!(columns > 3 && rows > 3, "{spawn:?} -> {exit:?}");
        }
    }

    #[test]
    fn enumeration_covers_exhausted_attempts() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let spawn = TilePosition::new(0, 0);

        let exit = choose_exit(dimensions(4, 4), spawn, 1, &mut rng);

        assert!(is_valid_exit(spawn, exit, 1));
    }

    #[test]
    fn centre_of_three_by_three_falls_back_to_a_corner() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let spawn = TilePosition::new(1, 1);

        let exit = choose_exit(dimensions(3, 3), spawn, 16, &mut rng);

        assert_eq!(spawn.axis_distance(exit), (1, 1));
    }

    #[test]
    fn single_tile_maze_places_exit_on_spawn() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let spawn = TilePosition::new(0, 0);

        assert_eq!(choose_exit(dimensions(1, 1), spawn, 4, &mut rng), spawn);
    }

    #[test]
    fn corridor_exit_is_as_far_as_possible() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let spawn = TilePosition::new(1, 0);

        let exit = choose_exit(dimensions(6, 1), spawn, 4, &mut rng);

        assert_eq!(exit, TilePosition::new(5, 0));
    }
}
