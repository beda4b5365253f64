#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative runtime state for Maze Runner.
//!
//! A [`MazeRuntime`] owns one maze: its tiles, the agent, the exit, the camera
//! and the timers that pace animation. Adapters mutate it exclusively through
//! [`apply`] and observe it through the [`query`] module. A [`GameSession`]
//! strings runtimes together into levels of growing size.

mod config;
mod placement;
mod session;

use std::time::Duration;

use glam::Vec2;
use maze_runner_core::{
    Command, Direction, Event, MazeDimensions, MazeGrid, MoveRejection, TileMark, TilePosition,
    Timer, WallGrid, WallGridError,
};
use maze_runner_system_camera::Camera;
use maze_runner_system_generation as generation;
use maze_runner_system_movement::Agent;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info};

pub use config::{ConfigError, RuntimeConfig};
pub use session::{GameSession, LevelSummary, Progress, ProgressError};

const CLOCK_INTERVAL: Duration = Duration::from_secs(1);
const FLOOR_SHADES: std::ops::RangeInclusive<u8> = 205..=254;
const LAYOUT_SEED: u64 = 0;

/// Owns a single maze instance and advances it tick by tick.
#[derive(Debug)]
pub struct MazeRuntime {
    config: RuntimeConfig,
    dimensions: MazeDimensions,
    rng: ChaCha8Rng,
    grid: MazeGrid,
    agent: Agent,
    exit: TilePosition,
    camera: Camera,
    complete: bool,
    elapsed_seconds: u32,
    completion_timer: Timer,
    animation_timer: Timer,
    panning_timer: Timer,
}

impl MazeRuntime {
    /// Creates and initialises a runtime for a maze of the given size.
    pub fn new(
        dimensions: MazeDimensions,
        config: RuntimeConfig,
        seed: u64,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::generated(dimensions, config, seed))
    }

    /// Creates a runtime around a predetermined wall layout.
    pub fn from_layout(
        config: RuntimeConfig,
        walls: WallGrid,
        spawn: TilePosition,
        exit: TilePosition,
    ) -> Result<Self, LayoutError> {
        config.validate()?;
        walls.validate()?;
        let dimensions = walls.dimensions();
        if !dimensions.contains(spawn) {
            return Err(LayoutError::SpawnOutOfBounds { spawn, dimensions });
        }
        if !dimensions.contains(exit) {
            return Err(LayoutError::ExitOutOfBounds { exit, dimensions });
        }
        let rng = ChaCha8Rng::seed_from_u64(LAYOUT_SEED);
        Ok(Self::assemble(config, rng, &walls, spawn, exit))
    }

    /// Builds a runtime from an already validated configuration.
    pub(crate) fn generated(dimensions: MazeDimensions, config: RuntimeConfig, seed: u64) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let (walls, spawn, exit) = roll_layout(dimensions, config.exit_attempts, &mut rng);
        Self::assemble(config, rng, &walls, spawn, exit)
    }

    fn assemble(
        config: RuntimeConfig,
        mut rng: ChaCha8Rng,
        walls: &WallGrid,
        spawn: TilePosition,
        exit: TilePosition,
    ) -> Self {
        let grid = shade_tiles(walls, &mut rng);
        let camera = Camera::new(
            Vec2::new(config.viewport_width, config.viewport_height),
            config.tile_length,
        );
        let mut runtime = Self {
            dimensions: walls.dimensions(),
            rng,
            grid,
            agent: Agent::new(spawn),
            exit,
            camera,
            complete: false,
            elapsed_seconds: 0,
            completion_timer: Timer::new(),
            animation_timer: Timer::new(),
            panning_timer: Timer::new(),
            config,
        };
        runtime.frame_camera();
        runtime
    }

    /// Regenerates the maze and re-places the agent, the exit and the camera.
    ///
    /// Counters and timers restart from zero; the input gate is preserved.
    pub fn initialise(&mut self, out_events: &mut Vec<Event>) {
        let (walls, spawn, exit) =
            roll_layout(self.dimensions, self.config.exit_attempts, &mut self.rng);
        self.grid = shade_tiles(&walls, &mut self.rng);

        let disabled = self.agent.is_disabled();
        self.agent = Agent::new(spawn);
        self.agent.set_disabled(disabled);
        self.exit = exit;
        self.complete = false;
        self.elapsed_seconds = 0;
        self.completion_timer.reset();
        self.animation_timer.reset();
        self.panning_timer.reset();
        self.frame_camera();

        out_events.push(Event::MazeGenerated {
            dimensions: self.dimensions,
            spawn,
            exit,
            camera: self.camera.mode(),
        });
    }

    /// Advances timers, interpolation, the camera and completion detection.
    ///
    /// Does nothing once the maze is complete.
    pub fn update(&mut self, dt: Duration, out_events: &mut Vec<Event>) {
        if self.complete {
            return;
        }
        out_events.push(Event::TimeAdvanced { dt });

        if self.completion_timer.run(dt, CLOCK_INTERVAL) {
            self.elapsed_seconds = self.elapsed_seconds.saturating_add(1);
            out_events.push(Event::ClockAdvanced {
                elapsed_seconds: self.elapsed_seconds,
            });
        }

        if self.camera.is_panning() {
            if self.panning_timer.run(dt, self.config.panning_interval()) {
                let agent = self.agent_pixel_position();
                if self.camera.tick(agent) {
                    debug!(origin = ?self.camera.origin(), "camera reached the agent");
                    out_events.push(Event::CameraFollowEngaged);
                }
            }
        } else if self
            .animation_timer
            .run(dt, self.config.animation_interval())
        {
            if let Some(tile) = self.agent.advance() {
                out_events.push(Event::AgentArrived { tile });
            }
            let agent = self.agent_pixel_position();
            let _ = self.camera.tick(agent);
        }

        if self.agent.resting_tile() == Some(self.exit) {
            self.complete = true;
            info!(
                steps_taken = self.agent.steps_taken(),
                elapsed_seconds = self.elapsed_seconds,
                "maze completed"
            );
            out_events.push(Event::MazeCompleted {
                steps_taken: self.agent.steps_taken(),
                elapsed_seconds: self.elapsed_seconds,
            });
        }
    }

    /// Forwards a directional request to the agent.
    ///
    /// Returns `true` when the agent started moving.
    pub fn handle_directional_input(
        &mut self,
        direction: Direction,
        out_events: &mut Vec<Event>,
    ) -> bool {
        if self.complete {
            out_events.push(Event::AgentMoveRejected {
                direction,
                reason: MoveRejection::Completed,
            });
            return false;
        }

        let from = self.agent.target();
        match self.agent.begin_move(direction, &mut self.grid) {
            Ok(to) => {
                out_events.push(Event::AgentMoveStarted {
                    from,
                    to,
                    steps_taken: self.agent.steps_taken(),
                });
                true
            }
            Err(reason) => {
                out_events.push(Event::AgentMoveRejected { direction, reason });
                false
            }
        }
    }

    /// Opens or closes the gate that accepts directional input.
    pub fn set_input_enabled(&mut self, enabled: bool) {
        self.agent.set_disabled(!enabled);
    }

    fn frame_camera(&mut self) {
        let extent = Vec2::new(
            self.dimensions.width() as f32,
            self.dimensions.height() as f32,
        ) * self.config.tile_length;
        let exit = tile_origin(self.exit, self.config.tile_length);
        self.camera.initialise_framing(extent, exit);
    }

    fn agent_pixel_position(&self) -> Vec2 {
        let (column, row) = self.agent.position().in_tiles();
        Vec2::new(column, row) * self.config.tile_length
    }
}

fn roll_layout(
    dimensions: MazeDimensions,
    exit_attempts: u32,
    rng: &mut ChaCha8Rng,
) -> (WallGrid, TilePosition, TilePosition) {
    let walls = generation::generate(dimensions, rng);
    let spawn = placement::choose_spawn(dimensions, rng);
    let exit = placement::choose_exit(dimensions, spawn, exit_attempts, rng);
    debug!(%dimensions, ?spawn, ?exit, "maze laid out");
    (walls, spawn, exit)
}

fn shade_tiles(walls: &WallGrid, rng: &mut ChaCha8Rng) -> MazeGrid {
    MazeGrid::from_walls(walls, |_| TileMark::Floor {
        shade: rng.gen_range(FLOOR_SHADES),
    })
}

fn tile_origin(tile: TilePosition, tile_length: f32) -> Vec2 {
    Vec2::new(tile.column() as f32, tile.row() as f32) * tile_length
}

/// Errors reported when a predetermined layout cannot host a runtime.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum LayoutError {
    /// The configuration is invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// The wall layout is inconsistent.
    #[error(transparent)]
    Walls(#[from] WallGridError),
    /// The spawn tile lies outside the layout.
    #[error("spawn {spawn:?} lies outside the {dimensions} maze")]
    SpawnOutOfBounds {
        /// Requested spawn tile.
        spawn: TilePosition,
        /// Dimensions of the layout.
        dimensions: MazeDimensions,
    },
    /// The exit tile lies outside the layout.
    #[error("exit {exit:?} lies outside the {dimensions} maze")]
    ExitOutOfBounds {
        /// Requested exit tile.
        exit: TilePosition,
        /// Dimensions of the layout.
        dimensions: MazeDimensions,
    },
}

/// Applies the provided command to the runtime, mutating state deterministically.
///
/// [`Command::AdvanceLevel`] concerns the owning [`GameSession`] and is ignored here.
pub fn apply(runtime: &mut MazeRuntime, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::Initialise => runtime.initialise(out_events),
        Command::Tick { dt } => runtime.update(dt, out_events),
        Command::Move { direction } => {
            let _ = runtime.handle_directional_input(direction, out_events);
        }
        Command::SetInputEnabled { enabled } => {
            runtime.set_input_enabled(enabled);
            out_events.push(Event::InputGateChanged { enabled });
        }
        Command::AdvanceLevel => {}
    }
}

/// Query functions that provide read-only access to the runtime state.
pub mod query {
    use glam::Vec2;
    use maze_runner_core::{CameraMode, MazeDimensions, MazeGrid, TilePosition, Viewport};
    use maze_runner_system_movement::Agent;

    use super::{tile_origin, MazeRuntime, RuntimeConfig};

    /// Dimensions of the current maze.
    #[must_use]
    pub fn dimensions(runtime: &MazeRuntime) -> MazeDimensions {
        runtime.dimensions
    }

    /// Provides read-only access to the maze tiles.
    #[must_use]
    pub fn grid(runtime: &MazeRuntime) -> &MazeGrid {
        &runtime.grid
    }

    /// Provides read-only access to the agent.
    #[must_use]
    pub fn agent(runtime: &MazeRuntime) -> &Agent {
        &runtime.agent
    }

    /// Interpolated pixel origin of the agent.
    #[must_use]
    pub fn agent_pixel_position(runtime: &MazeRuntime) -> Vec2 {
        runtime.agent_pixel_position()
    }

    /// Exit tile of the current maze.
    #[must_use]
    pub fn exit(runtime: &MazeRuntime) -> TilePosition {
        runtime.exit
    }

    /// Pixel origin of the exit tile.
    #[must_use]
    pub fn exit_pixel_position(runtime: &MazeRuntime) -> Vec2 {
        tile_origin(runtime.exit, runtime.config.tile_length)
    }

    /// Visible region in maze pixel space.
    #[must_use]
    pub fn viewport(runtime: &MazeRuntime) -> Viewport {
        runtime.camera.viewport()
    }

    /// Current camera framing mode.
    #[must_use]
    pub fn camera_mode(runtime: &MazeRuntime) -> CameraMode {
        runtime.camera.mode()
    }

    /// Reports whether the agent has reached the exit.
    #[must_use]
    pub fn is_complete(runtime: &MazeRuntime) -> bool {
        runtime.complete
    }

    /// Number of moves the agent has made.
    #[must_use]
    pub fn steps_taken(runtime: &MazeRuntime) -> u32 {
        runtime.agent.steps_taken()
    }

    /// Whole seconds counted since the maze was generated.
    #[must_use]
    pub fn elapsed_seconds(runtime: &MazeRuntime) -> u32 {
        runtime.elapsed_seconds
    }

    /// Reports whether the agent is at rest and the camera has stopped panning.
    #[must_use]
    pub fn is_settled(runtime: &MazeRuntime) -> bool {
        runtime.agent.is_at_rest() && !runtime.camera.is_panning()
    }

    /// Configuration the runtime was built with.
    #[must_use]
    pub fn config(runtime: &MazeRuntime) -> &RuntimeConfig {
        &runtime.config
    }
}
