#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Maze Runner engine.
//!
//! This crate defines the vocabulary that connects adapters, the
//! authoritative runtime, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the runtime executes those commands via its
//! `apply` entry point, and then reports [`Event`] values describing what
//! happened. The grid types in this crate carry the wall layout produced by
//! the generator and consumed by the motion model.

mod grid;
mod timer;

use std::{fmt, str::FromStr, time::Duration};

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

pub use grid::{MazeGrid, Tile, TileMark};
pub use timer::Timer;

/// Number of interpolation steps that compose a single tile edge.
pub const STEPS_PER_TILE: u32 = 4;

/// Commands that express all permissible runtime mutations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Regenerates the maze, re-placing the agent, the exit and the camera.
    Initialise,
    /// Advances the runtime clock by the provided delta time.
    Tick {
        /// Duration of time that elapsed since the previous tick.
        dt: Duration,
    },
    /// Requests that the agent move one tile in the specified direction.
    Move {
        /// Direction of travel for the attempted move.
        direction: Direction,
    },
    /// Opens or closes the gate that accepts directional input.
    SetInputEnabled {
        /// Whether directional input should be accepted.
        enabled: bool,
    },
    /// Requests that the session replace the current maze with the next level.
    AdvanceLevel,
}

/// Events reported by the runtime after processing commands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// Announces that a fresh maze was generated and framed.
    MazeGenerated {
        /// Dimensions of the generated maze.
        dimensions: MazeDimensions,
        /// Tile the agent starts on.
        spawn: TilePosition,
        /// Tile the agent must reach.
        exit: TilePosition,
        /// Framing mode selected for the camera.
        camera: CameraMode,
    },
    /// Indicates that the runtime clock advanced.
    TimeAdvanced {
        /// Duration of time that elapsed in the tick.
        dt: Duration,
    },
    /// Reports that another whole second was added to the completion clock.
    ClockAdvanced {
        /// Whole seconds counted since the maze was generated.
        elapsed_seconds: u32,
    },
    /// Confirms that the agent began moving between two tiles.
    AgentMoveStarted {
        /// Tile the agent departed from.
        from: TilePosition,
        /// Tile the agent is moving toward.
        to: TilePosition,
        /// Step count after accepting the move.
        steps_taken: u32,
    },
    /// Reports that a move request was refused.
    AgentMoveRejected {
        /// Direction provided in the refused request.
        direction: Direction,
        /// Specific reason the move was refused.
        reason: MoveRejection,
    },
    /// Confirms that an in-flight move finished on the provided tile.
    AgentArrived {
        /// Tile the agent now rests on.
        tile: TilePosition,
    },
    /// Announces that the camera finished panning and now follows the agent.
    CameraFollowEngaged,
    /// Announces that the agent reached the exit.
    MazeCompleted {
        /// Number of accepted moves.
        steps_taken: u32,
        /// Whole seconds counted on the completion clock.
        elapsed_seconds: u32,
    },
    /// Reports that the input gate was opened or closed.
    InputGateChanged {
        /// Whether directional input is now accepted.
        enabled: bool,
    },
    /// Summarises a level that was just completed.
    LevelCompleted {
        /// One-based level number.
        level: u32,
        /// Dimensions of the completed maze.
        dimensions: MazeDimensions,
        /// Number of accepted moves.
        steps_taken: u32,
        /// Whole seconds spent on the level.
        elapsed_seconds: u32,
    },
    /// Announces that a new level replaced the previous one.
    LevelStarted {
        /// One-based level number.
        level: u32,
        /// Dimensions of the new maze.
        dimensions: MazeDimensions,
    },
}

/// Reasons a move request may be refused by the motion model.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MoveRejection {
    /// The input gate is closed.
    Disabled,
    /// The agent is still interpolating toward its previous target.
    InFlight,
    /// A wall or the maze boundary separates the agent from the destination.
    Blocked,
    /// The maze has already been completed.
    Completed,
}

/// Framing strategy used by the camera for the lifetime of a maze.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CameraMode {
    /// The whole maze fits the viewport; the camera never moves.
    Fixed,
    /// The camera travels from the exit toward the agent.
    Panning,
    /// The camera is centred on the agent every tick.
    Following,
}

/// Cardinal movement directions, listed clockwise from north.
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

impl Direction {
    /// Every direction in clockwise order starting from north.
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];

    /// Direction pointing the opposite way.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::North => Self::South,
            Self::East => Self::West,
            Self::South => Self::North,
            Self::West => Self::East,
        }
    }

    /// Wall flag guarding the side of a tile that faces this direction.
    #[must_use]
    pub const fn wall(self) -> Walls {
        match self {
            Self::North => Walls::NORTH,
            Self::East => Walls::EAST,
            Self::South => Walls::SOUTH,
            Self::West => Walls::WEST,
        }
    }

    /// Input token that selects this direction.
    #[must_use]
    pub const fn token(self) -> &'static str {
        match self {
            Self::North => "up",
            Self::East => "right",
            Self::South => "down",
            Self::West => "left",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

impl FromStr for Direction {
    type Err = InvalidDirection;

    fn from_str(token: &str) -> Result<Self, Self::Err> {
        match token.trim().to_ascii_lowercase().as_str() {
            "up" => Ok(Self::North),
            "right" => Ok(Self::East),
            "down" => Ok(Self::South),
            "left" => Ok(Self::West),
            _ => Err(InvalidDirection {
                token: token.to_owned(),
            }),
        }
    }
}

/// Error returned when a direction token is not one of `up`, `down`, `left` or `right`.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("direction must be 'up', 'down', 'left' or 'right' (received '{token}')")]
pub struct InvalidDirection {
    /// Token that failed to parse.
    pub token: String,
}

bitflags! {
    /// Wall-presence record for the four sides of a tile.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct Walls: u8 {
        /// Wall on the side facing decreasing rows.
        const NORTH = 0b0001;
        /// Wall on the side facing increasing columns.
        const EAST = 0b0010;
        /// Wall on the side facing increasing rows.
        const SOUTH = 0b0100;
        /// Wall on the side facing decreasing columns.
        const WEST = 0b1000;
    }
}

impl Walls {
    /// Builds a wall record from flags listed clockwise from north.
    #[must_use]
    pub fn from_array(sides: [bool; 4]) -> Self {
        Direction::ALL
            .into_iter()
            .zip(sides)
            .filter(|(_, present)| *present)
            .fold(Self::empty(), |walls, (direction, _)| walls | direction.wall())
    }

    /// Expands the record into flags listed clockwise from north.
    #[must_use]
    pub fn to_array(self) -> [bool; 4] {
        Direction::ALL.map(|direction| self.contains(direction.wall()))
    }

    /// Reports whether a wall guards the side facing `direction`.
    #[must_use]
    pub fn blocks(self, direction: Direction) -> bool {
        self.contains(direction.wall())
    }
}

/// Location of a single tile expressed as column and row coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TilePosition {
    column: u32,
    row: u32,
}

impl TilePosition {
    /// Creates a new tile coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the tile.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the tile.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Adjacent tile in `direction`, or `None` when it would leave the maze.
    #[must_use]
    pub fn neighbour(self, direction: Direction, dimensions: MazeDimensions) -> Option<Self> {
        let (column, row) = match direction {
            Direction::North => (Some(self.column), self.row.checked_sub(1)),
            Direction::East => (self.column.checked_add(1), Some(self.row)),
            Direction::South => (Some(self.column), self.row.checked_add(1)),
            Direction::West => (self.column.checked_sub(1), Some(self.row)),
        };
        let candidate = Self::new(column?, row?);
        dimensions.contains(candidate).then_some(candidate)
    }

    /// Distance to `other` measured separately along the column and row axes.
    #[must_use]
    pub fn axis_distance(self, other: TilePosition) -> (u32, u32) {
        (
            self.column.abs_diff(other.column),
            self.row.abs_diff(other.row),
        )
    }
}

/// Sub-tile position measured in [`STEPS_PER_TILE`] increments along each axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct StepPosition {
    column_steps: u32,
    row_steps: u32,
}

impl StepPosition {
    /// Creates a new position from raw step offsets.
    #[must_use]
    pub const fn new(column_steps: u32, row_steps: u32) -> Self {
        Self {
            column_steps,
            row_steps,
        }
    }

    /// Position aligned with the top-left corner of `tile`.
    #[must_use]
    pub const fn from_tile(tile: TilePosition) -> Self {
        Self {
            column_steps: tile.column().saturating_mul(STEPS_PER_TILE),
            row_steps: tile.row().saturating_mul(STEPS_PER_TILE),
        }
    }

    /// Number of steps offset along the column axis.
    #[must_use]
    pub const fn column_steps(&self) -> u32 {
        self.column_steps
    }

    /// Number of steps offset along the row axis.
    #[must_use]
    pub const fn row_steps(&self) -> u32 {
        self.row_steps
    }

    /// Tile the position rests on, or `None` while it sits between tiles.
    #[must_use]
    pub const fn tile(&self) -> Option<TilePosition> {
        if self.column_steps % STEPS_PER_TILE == 0 && self.row_steps % STEPS_PER_TILE == 0 {
            Some(TilePosition::new(
                self.column_steps / STEPS_PER_TILE,
                self.row_steps / STEPS_PER_TILE,
            ))
        } else {
            None
        }
    }

    /// Moves one step toward `target` on each axis independently.
    #[must_use]
    pub fn step_toward(self, target: StepPosition) -> Self {
        Self {
            column_steps: step_axis(self.column_steps, target.column_steps),
            row_steps: step_axis(self.row_steps, target.row_steps),
        }
    }

    /// Position expressed in fractional tile units.
    #[must_use]
    pub fn in_tiles(&self) -> (f32, f32) {
        (
            self.column_steps as f32 / STEPS_PER_TILE as f32,
            self.row_steps as f32 / STEPS_PER_TILE as f32,
        )
    }
}

fn step_axis(current: u32, target: u32) -> u32 {
    match current.cmp(&target) {
        std::cmp::Ordering::Less => current + 1,
        std::cmp::Ordering::Greater => current - 1,
        std::cmp::Ordering::Equal => current,
    }
}

/// Validated maze size measured in whole tiles.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "(u32, u32)", into = "(u32, u32)")]
pub struct MazeDimensions {
    width: u32,
    height: u32,
}

impl MazeDimensions {
    /// Extent used for any dimension the caller omits.
    pub const DEFAULT_EXTENT: u32 = 8;

    /// Creates a new size descriptor, rejecting empty axes.
    pub const fn new(width: u32, height: u32) -> Result<Self, DimensionError> {
        if width == 0 {
            return Err(DimensionError::ZeroWidth);
        }
        if height == 0 {
            return Err(DimensionError::ZeroHeight);
        }
        Ok(Self { width, height })
    }

    /// Creates a size descriptor where omitted axes fall back to [`Self::DEFAULT_EXTENT`].
    pub fn or_default(width: Option<u32>, height: Option<u32>) -> Result<Self, DimensionError> {
        Self::new(
            width.unwrap_or(Self::DEFAULT_EXTENT),
            height.unwrap_or(Self::DEFAULT_EXTENT),
        )
    }

    /// Number of tile columns.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Number of tile rows.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Larger of the two axes.
    #[must_use]
    pub const fn max_extent(&self) -> u32 {
        if self.width > self.height {
            self.width
        } else {
            self.height
        }
    }

    /// Total number of tiles in the maze.
    #[must_use]
    pub fn tile_count(&self) -> usize {
        let count = u64::from(self.width) * u64::from(self.height);
        usize::try_from(count).unwrap_or(usize::MAX)
    }

    /// Reports whether `tile` lies inside the maze.
    #[must_use]
    pub const fn contains(&self, tile: TilePosition) -> bool {
        tile.column() < self.width && tile.row() < self.height
    }

    /// Row-major offset of `tile`, if it lies inside the maze.
    #[must_use]
    pub fn index(&self, tile: TilePosition) -> Option<usize> {
        if !self.contains(tile) {
            return None;
        }
        let row = usize::try_from(tile.row()).ok()?;
        let column = usize::try_from(tile.column()).ok()?;
        let width = usize::try_from(self.width).ok()?;
        row.checked_mul(width)?.checked_add(column)
    }

    /// Every tile in row-major order.
    pub fn positions(&self) -> impl Iterator<Item = TilePosition> {
        let width = self.width;
        (0..self.height)
            .flat_map(move |row| (0..width).map(move |column| TilePosition::new(column, row)))
    }

    /// Dimensions grown by `increment` tiles along both axes.
    #[must_use]
    pub const fn grown(&self, increment: u32) -> Self {
        Self {
            width: self.width.saturating_add(increment),
            height: self.height.saturating_add(increment),
        }
    }
}

impl Default for MazeDimensions {
    fn default() -> Self {
        Self {
            width: Self::DEFAULT_EXTENT,
            height: Self::DEFAULT_EXTENT,
        }
    }
}

impl fmt::Display for MazeDimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

impl FromStr for MazeDimensions {
    type Err = DimensionError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let malformed = || DimensionError::Malformed(value.to_owned());
        let (width, height) = value.trim().split_once(['x', 'X']).ok_or_else(malformed)?;
        let width = width.trim().parse::<u32>().map_err(|_| malformed())?;
        let height = height.trim().parse::<u32>().map_err(|_| malformed())?;
        Self::new(width, height)
    }
}

impl TryFrom<(u32, u32)> for MazeDimensions {
    type Error = DimensionError;

    fn try_from((width, height): (u32, u32)) -> Result<Self, Self::Error> {
        Self::new(width, height)
    }
}

impl From<MazeDimensions> for (u32, u32) {
    fn from(dimensions: MazeDimensions) -> Self {
        (dimensions.width, dimensions.height)
    }
}

/// Errors raised while constructing [`MazeDimensions`].
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum DimensionError {
    /// The maze must be at least one tile wide.
    #[error("maze width must be at least one tile")]
    ZeroWidth,
    /// The maze must be at least one tile high.
    #[error("maze height must be at least one tile")]
    ZeroHeight,
    /// The textual form could not be parsed as `WIDTHxHEIGHT`.
    #[error("could not parse maze dimensions '{0}'; expected WIDTHxHEIGHT")]
    Malformed(String),
}

/// Wall layout of a maze stored in row-major order.
///
/// Carving always clears the shared side on both tiles, so a grid that is only
/// mutated through [`WallGrid::carve`] never contains one-way walls.
/// Deserialised grids are checked with [`WallGrid::validate`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "StoredWallGrid", into = "StoredWallGrid")]
pub struct WallGrid {
    dimensions: MazeDimensions,
    cells: Vec<Walls>,
}

#[derive(Serialize, Deserialize)]
struct StoredWallGrid {
    dimensions: MazeDimensions,
    cells: Vec<Walls>,
}

impl TryFrom<StoredWallGrid> for WallGrid {
    type Error = WallGridError;

    fn try_from(stored: StoredWallGrid) -> Result<Self, Self::Error> {
        let grid = Self {
            dimensions: stored.dimensions,
            cells: stored.cells,
        };
        grid.validate()?;
        Ok(grid)
    }
}

impl From<WallGrid> for StoredWallGrid {
    fn from(grid: WallGrid) -> Self {
        Self {
            dimensions: grid.dimensions,
            cells: grid.cells,
        }
    }
}

/// Inconsistencies found in a wall layout.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum WallGridError {
    /// The number of wall records does not match the dimensions.
    #[error("expected {expected} wall records, found {found}")]
    CellCount {
        /// Tile count implied by the dimensions.
        expected: usize,
        /// Wall records present.
        found: usize,
    },
    /// A tile on the edge of the maze is open toward the outside.
    #[error("tile {tile:?} is open toward the {direction} boundary")]
    OpenBoundary {
        /// Offending tile.
        tile: TilePosition,
        /// Side facing the boundary.
        direction: Direction,
    },
    /// Two neighbouring tiles disagree about their shared wall.
    #[error("wall between {tile:?} and its {direction} neighbour is one-sided")]
    OneWayWall {
        /// Tile whose record disagrees with its neighbour.
        tile: TilePosition,
        /// Side shared with the neighbour.
        direction: Direction,
    },
}

impl WallGrid {
    /// Creates a grid where every tile is enclosed on all four sides.
    #[must_use]
    pub fn closed(dimensions: MazeDimensions) -> Self {
        Self {
            dimensions,
            cells: vec![Walls::all(); dimensions.tile_count()],
        }
    }

    /// Dimensions of the grid.
    #[must_use]
    pub const fn dimensions(&self) -> MazeDimensions {
        self.dimensions
    }

    /// Wall record of `tile`, if it lies inside the grid.
    #[must_use]
    pub fn walls(&self, tile: TilePosition) -> Option<Walls> {
        self.dimensions
            .index(tile)
            .and_then(|index| self.cells.get(index).copied())
    }

    /// Removes the wall between `from` and its neighbour in `direction`.
    ///
    /// Returns the neighbour, or `None` when the neighbour lies outside the
    /// grid, in which case nothing changes.
    pub fn carve(&mut self, from: TilePosition, direction: Direction) -> Option<TilePosition> {
        let to = from.neighbour(direction, self.dimensions)?;
        let from_index = self.dimensions.index(from)?;
        let to_index = self.dimensions.index(to)?;
        if from_index >= self.cells.len() || to_index >= self.cells.len() {
            return None;
        }
        if let Some(walls) = self.cells.get_mut(from_index) {
            walls.remove(direction.wall());
        }
        if let Some(walls) = self.cells.get_mut(to_index) {
            walls.remove(direction.opposite().wall());
        }
        Some(to)
    }

    /// Checks the record count, closed boundary and mirrored shared walls.
    pub fn validate(&self) -> Result<(), WallGridError> {
        let expected = self.dimensions.tile_count();
        if self.cells.len() != expected {
            return Err(WallGridError::CellCount {
                expected,
                found: self.cells.len(),
            });
        }
        for (tile, walls) in self.iter() {
            for direction in Direction::ALL {
                match tile.neighbour(direction, self.dimensions) {
                    None if !walls.blocks(direction) => {
                        return Err(WallGridError::OpenBoundary { tile, direction });
                    }
                    None => {}
                    Some(neighbour) => {
                        let mirrored = self
                            .walls(neighbour)
                            .is_some_and(|other| other.blocks(direction.opposite()));
                        if mirrored != walls.blocks(direction) {
                            return Err(WallGridError::OneWayWall { tile, direction });
                        }
                    }
                }
            }
        }
        Ok(())
    }

    /// Reports whether the agent may pass from `from` toward `direction`.
    ///
    /// Both the departure side and the mirrored side of the destination must
    /// be open.
    #[must_use]
    pub fn is_open(&self, from: TilePosition, direction: Direction) -> bool {
        let Some(to) = from.neighbour(direction, self.dimensions) else {
            return false;
        };
        match (self.walls(from), self.walls(to)) {
            (Some(departure), Some(arrival)) => {
                !departure.blocks(direction) && !arrival.blocks(direction.opposite())
            }
            _ => false,
        }
    }

    /// Number of open passages between adjacent tiles.
    #[must_use]
    pub fn passage_count(&self) -> usize {
        self.dimensions
            .positions()
            .map(|tile| {
                [Direction::East, Direction::South]
                    .into_iter()
                    .filter(|direction| self.is_open(tile, *direction))
                    .count()
            })
            .sum()
    }

    /// Iterator over every tile and its wall record in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (TilePosition, Walls)> + '_ {
        self.dimensions.positions().zip(self.cells.iter().copied())
    }
}

/// Visible region of the maze expressed in pixel space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    /// Left edge of the viewport.
    pub x: f32,
    /// Top edge of the viewport.
    pub y: f32,
    /// Width of the viewport.
    pub width: f32,
    /// Height of the viewport.
    pub height: f32,
}

impl Viewport {
    /// Creates a new viewport descriptor.
    #[must_use]
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Reports whether the axis-aligned rectangle overlaps the viewport.
    #[must_use]
    pub fn intersects(&self, x: f32, y: f32, width: f32, height: f32) -> bool {
        x < self.x + self.width
            && x + width > self.x
            && y < self.y + self.height
            && y + height > self.y
    }
}
