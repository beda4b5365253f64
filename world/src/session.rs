use std::fmt;

use maze_runner_core::{Command, DimensionError, Event, MazeDimensions};
use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::{apply, query, ConfigError, MazeRuntime, RuntimeConfig};

/// Level reached by a player, in the plain form persistence layers store.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "StoredProgress", into = "StoredProgress")]
pub struct Progress {
    level: u32,
    dimensions: MazeDimensions,
}

#[derive(Clone, Copy, Serialize, Deserialize)]
struct StoredProgress {
    level: u32,
    width: u32,
    height: u32,
}

impl Progress {
    /// Validates a stored level and maze size.
    pub fn new(level: u32, width: u32, height: u32) -> Result<Self, ProgressError> {
        if level == 0 {
            return Err(ProgressError::ZeroLevel);
        }
        Ok(Self {
            level,
            dimensions: MazeDimensions::new(width, height)?,
        })
    }

    /// One-based level number.
    #[must_use]
    pub const fn level(&self) -> u32 {
        self.level
    }

    /// Width of the level's maze.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.dimensions.width()
    }

    /// Height of the level's maze.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.dimensions.height()
    }

    /// Validated maze size of the level.
    #[must_use]
    pub const fn dimensions(&self) -> MazeDimensions {
        self.dimensions
    }
}

impl TryFrom<StoredProgress> for Progress {
    type Error = ProgressError;

    fn try_from(stored: StoredProgress) -> Result<Self, Self::Error> {
        Self::new(stored.level, stored.width, stored.height)
    }
}

impl From<Progress> for StoredProgress {
    fn from(progress: Progress) -> Self {
        Self {
            level: progress.level,
            width: progress.width(),
            height: progress.height(),
        }
    }
}

/// Errors raised while validating stored [`Progress`].
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ProgressError {
    /// Levels are numbered from one.
    #[error("level must be at least 1")]
    ZeroLevel,
    /// The stored maze size is invalid.
    #[error(transparent)]
    Dimensions(#[from] DimensionError),
}

/// Outcome of a completed level.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LevelSummary {
    /// One-based level number.
    pub level: u32,
    /// Size of the completed maze.
    pub dimensions: MazeDimensions,
    /// Number of accepted moves.
    pub steps_taken: u32,
    /// Whole seconds spent on the level.
    pub elapsed_seconds: u32,
}

impl LevelSummary {
    /// Elapsed time formatted as `MM:SS`.
    #[must_use]
    pub fn clock(&self) -> String {
        format!(
            "{:02}:{:02}",
            self.elapsed_seconds / 60,
            self.elapsed_seconds % 60
        )
    }
}

impl fmt::Display for LevelSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "level {} ({}) completed in {} with {} steps",
            self.level,
            self.dimensions,
            self.clock(),
            self.steps_taken
        )
    }
}

/// Owns the active runtime and replaces it with a larger maze after each level.
#[derive(Debug)]
pub struct GameSession {
    config: RuntimeConfig,
    rng: ChaCha8Rng,
    level: u32,
    runtime: MazeRuntime,
    input_enabled: bool,
}

impl GameSession {
    /// Starts a session at level one using the configured initial size.
    pub fn new(config: RuntimeConfig, seed: u64) -> Result<Self, ConfigError> {
        let dimensions = config.initial_dimensions()?;
        let progress = Progress {
            level: 1,
            dimensions,
        };
        Self::resume(config, progress, seed)
    }

    /// Restarts a session from stored progress.
    pub fn resume(
        config: RuntimeConfig,
        progress: Progress,
        seed: u64,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let runtime = MazeRuntime::generated(progress.dimensions, config.clone(), rng.next_u64());
        debug!(
            level = progress.level,
            dimensions = %progress.dimensions,
            "session started"
        );
        Ok(Self {
            config,
            rng,
            level: progress.level,
            runtime,
            input_enabled: true,
        })
    }

    /// Applies a command to the session.
    ///
    /// Ticks that complete the current maze emit [`Event::LevelCompleted`] and
    /// advance to the next level within the same call.
    pub fn apply(&mut self, command: Command, out_events: &mut Vec<Event>) {
        match command {
            Command::AdvanceLevel => self.advance_to_next_level(out_events),
            Command::SetInputEnabled { enabled } => {
                self.input_enabled = enabled;
                apply(&mut self.runtime, command, out_events);
            }
            Command::Tick { .. } => {
                apply(&mut self.runtime, command, out_events);
                if query::is_complete(&self.runtime) {
                    let summary = self.summary();
                    info!(%summary, "level completed");
                    out_events.push(Event::LevelCompleted {
                        level: summary.level,
                        dimensions: summary.dimensions,
                        steps_taken: summary.steps_taken,
                        elapsed_seconds: summary.elapsed_seconds,
                    });
                    self.advance_to_next_level(out_events);
                }
            }
            Command::Initialise | Command::Move { .. } => {
                apply(&mut self.runtime, command, out_events);
            }
        }
    }

    /// Replaces the runtime with a larger maze and increments the level.
    pub fn advance_to_next_level(&mut self, out_events: &mut Vec<Event>) {
        let dimensions = query::dimensions(&self.runtime).grown(self.config.growth_per_level);
        let mut runtime =
            MazeRuntime::generated(dimensions, self.config.clone(), self.rng.next_u64());
        runtime.set_input_enabled(self.input_enabled);

        self.runtime = runtime;
        self.level = self.level.saturating_add(1);
        debug!(level = self.level, %dimensions, "level started");
        out_events.push(Event::LevelStarted {
            level: self.level,
            dimensions,
        });
    }

    /// Opens or closes the input gate for this and every later level.
    pub fn set_input_enabled(&mut self, enabled: bool, out_events: &mut Vec<Event>) {
        self.apply(Command::SetInputEnabled { enabled }, out_events);
    }

    /// Current level and maze size.
    #[must_use]
    pub fn progress(&self) -> Progress {
        Progress {
            level: self.level,
            dimensions: query::dimensions(&self.runtime),
        }
    }

    /// Counters of the level in play.
    #[must_use]
    pub fn summary(&self) -> LevelSummary {
        LevelSummary {
            level: self.level,
            dimensions: query::dimensions(&self.runtime),
            steps_taken: query::steps_taken(&self.runtime),
            elapsed_seconds: query::elapsed_seconds(&self.runtime),
        }
    }

    /// One-based number of the level in play.
    #[must_use]
    pub const fn level(&self) -> u32 {
        self.level
    }

    /// Provides read-only access to the runtime of the level in play.
    #[must_use]
    pub const fn runtime(&self) -> &MazeRuntime {
        &self.runtime
    }

    /// Configuration shared by every level.
    #[must_use]
    pub const fn config(&self) -> &RuntimeConfig {
        &self.config
    }
}
