#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Wall-aware motion model for the maze agent.
//!
//! The agent rests on whole tiles and travels between adjacent tiles in
//! [`STEPS_PER_TILE`](maze_runner_core::STEPS_PER_TILE) interpolation steps.
//! A move is accepted only when the agent is at rest, input is enabled and no
//! wall separates the two tiles.
//! Requests made while a move is in flight are dropped rather than queued.

use maze_runner_core::{Direction, MazeGrid, MoveRejection, StepPosition, TilePosition};
use tracing::trace;

/// Player-controlled token that walks the maze.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Agent {
    position: StepPosition,
    target: TilePosition,
    disabled: bool,
    steps_taken: u32,
}

impl Agent {
    /// Creates an agent resting on `spawn` with input enabled.
    #[must_use]
    pub const fn new(spawn: TilePosition) -> Self {
        Self {
            position: StepPosition::from_tile(spawn),
            target: spawn,
            disabled: false,
            steps_taken: 0,
        }
    }

    /// Interpolated position of the agent.
    #[must_use]
    pub const fn position(&self) -> StepPosition {
        self.position
    }

    /// Tile the agent rests on or is travelling toward.
    #[must_use]
    pub const fn target(&self) -> TilePosition {
        self.target
    }

    /// Tile the agent currently rests on, or `None` while in flight.
    #[must_use]
    pub fn resting_tile(&self) -> Option<TilePosition> {
        if self.is_at_rest() {
            Some(self.target)
        } else {
            None
        }
    }

    /// Number of accepted moves.
    #[must_use]
    pub const fn steps_taken(&self) -> u32 {
        self.steps_taken
    }

    /// Reports whether directional input is currently ignored.
    #[must_use]
    pub const fn is_disabled(&self) -> bool {
        self.disabled
    }

    /// Reports whether the agent has arrived at its target.
    #[must_use]
    pub fn is_at_rest(&self) -> bool {
        self.position == StepPosition::from_tile(self.target)
    }

    /// Opens or closes the input gate.
    pub fn set_disabled(&mut self, disabled: bool) {
        self.disabled = disabled;
    }

    /// Starts a move toward the adjacent tile in `direction`.
    ///
    /// On success the departure tile is marked as trailed, the step counter
    /// grows by one and the new target is returned.
    pub fn begin_move(
        &mut self,
        direction: Direction,
        grid: &mut MazeGrid,
    ) -> Result<TilePosition, MoveRejection> {
        if self.disabled {
            return Err(MoveRejection::Disabled);
        }
        if !self.is_at_rest() {
            return Err(MoveRejection::InFlight);
        }

        let from = self.target;
        let to = grid
            .passable(from, direction)
            .ok_or(MoveRejection::Blocked)?;

        let _ = grid.mark_trailed(from);
        self.target = to;
        self.steps_taken = self.steps_taken.saturating_add(1);
        trace!(?from, ?to, steps_taken = self.steps_taken, "agent move accepted");
        Ok(to)
    }

    /// Boolean form of [`Agent::begin_move`].
    pub fn try_move(&mut self, direction: Direction, grid: &mut MazeGrid) -> bool {
        self.begin_move(direction, grid).is_ok()
    }

    /// Moves one interpolation step toward the target.
    ///
    /// Returns the target tile on the call that completes the move. Calls made
    /// while at rest return `None`.
    pub fn advance(&mut self) -> Option<TilePosition> {
        let goal = StepPosition::from_tile(self.target);
        if self.position == goal {
            return None;
        }
        self.position = self.position.step_toward(goal);
        (self.position == goal).then_some(self.target)
    }
}
