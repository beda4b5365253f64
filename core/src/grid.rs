use crate::{Direction, MazeDimensions, TilePosition, WallGrid, Walls};

/// Display attribute of a tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TileMark {
    /// Untouched floor rendered with a grey shade.
    Floor {
        /// Intensity of the grey channel.
        shade: u8,
    },
    /// Floor the agent has departed from.
    Trailed,
}

/// Single maze cell. Walls are fixed at construction; only the mark changes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Tile {
    position: TilePosition,
    walls: Walls,
    mark: TileMark,
}

impl Tile {
    /// Creates a new tile.
    #[must_use]
    pub const fn new(position: TilePosition, walls: Walls, mark: TileMark) -> Self {
        Self {
            position,
            walls,
            mark,
        }
    }

    /// Location of the tile within the maze.
    #[must_use]
    pub const fn position(&self) -> TilePosition {
        self.position
    }

    /// Wall record of the tile.
    #[must_use]
    pub const fn walls(&self) -> Walls {
        self.walls
    }

    /// Current display attribute.
    #[must_use]
    pub const fn mark(&self) -> TileMark {
        self.mark
    }

    /// Reports whether the side facing `direction` is walled.
    #[must_use]
    pub fn has_wall(&self, direction: Direction) -> bool {
        self.walls.blocks(direction)
    }

    /// Reports whether the agent has departed from this tile.
    #[must_use]
    pub const fn is_trailed(&self) -> bool {
        matches!(self.mark, TileMark::Trailed)
    }
}

/// Row-major grid of tiles built from a carved wall layout.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MazeGrid {
    dimensions: MazeDimensions,
    tiles: Vec<Tile>,
}

impl MazeGrid {
    /// Builds tiles for every cell of `walls`, asking `mark_for` for the initial mark.
    #[must_use]
    pub fn from_walls<F>(walls: &WallGrid, mut mark_for: F) -> Self
    where
        F: FnMut(TilePosition) -> TileMark,
    {
        let tiles = walls
            .iter()
            .map(|(position, walls)| Tile::new(position, walls, mark_for(position)))
            .collect();
        Self {
            dimensions: walls.dimensions(),
            tiles,
        }
    }

    /// Dimensions of the grid.
    #[must_use]
    pub const fn dimensions(&self) -> MazeDimensions {
        self.dimensions
    }

    /// Tile stored at `position`, if it lies inside the grid.
    #[must_use]
    pub fn tile(&self, position: TilePosition) -> Option<&Tile> {
        self.dimensions
            .index(position)
            .and_then(|index| self.tiles.get(index))
    }

    /// Every tile in row-major order.
    #[must_use]
    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    /// Destination reached by leaving `from` toward `direction`, if no wall
    /// on either side of the shared edge blocks the passage.
    #[must_use]
    pub fn passable(&self, from: TilePosition, direction: Direction) -> Option<TilePosition> {
        let departure = self.tile(from)?;
        if departure.has_wall(direction) {
            return None;
        }
        let to = from.neighbour(direction, self.dimensions)?;
        let arrival = self.tile(to)?;
        if arrival.has_wall(direction.opposite()) {
            return None;
        }
        Some(to)
    }

    /// Marks the tile at `position` as trailed. Returns `false` when out of bounds.
    pub fn mark_trailed(&mut self, position: TilePosition) -> bool {
        let Some(index) = self.dimensions.index(position) else {
            return false;
        };
        match self.tiles.get_mut(index) {
            Some(tile) => {
                tile.mark = TileMark::Trailed;
                true
            }
            None => false,
        }
    }
}
