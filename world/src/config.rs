use std::time::Duration;

use maze_runner_core::{DimensionError, MazeDimensions};
use serde::{Deserialize, Serialize};

const NANOS_PER_SECOND: u64 = 1_000_000_000;

/// Tunable parameters shared by every runtime in a session.
///
/// All fields are optional when deserialised; omitted values fall back to the
/// defaults below.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RuntimeConfig {
    /// Width of the visible region in pixels.
    pub viewport_width: f32,
    /// Height of the visible region in pixels.
    pub viewport_height: f32,
    /// Edge length of a single tile in pixels.
    pub tile_length: f32,
    /// Number of update ticks per second.
    pub tick_rate_hz: u32,
    /// Milliseconds between agent interpolation steps.
    pub animation_interval_ms: u64,
    /// Milliseconds between camera panning steps.
    pub panning_interval_ms: u64,
    /// Random draws attempted before exit placement falls back to enumeration.
    pub exit_attempts: u32,
    /// Tiles added to each axis when a level is completed.
    pub growth_per_level: u32,
    /// Width of the first level.
    pub initial_width: u32,
    /// Height of the first level.
    pub initial_height: u32,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            viewport_width: 512.0,
            viewport_height: 512.0,
            tile_length: 32.0,
            tick_rate_hz: 30,
            animation_interval_ms: 10,
            panning_interval_ms: 10,
            exit_attempts: 1024,
            growth_per_level: 2,
            initial_width: 4,
            initial_height: 4,
        }
    }
}

impl RuntimeConfig {
    /// Checks every field for values the runtime cannot operate with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !is_positive(self.viewport_width) || !is_positive(self.viewport_height) {
            return Err(ConfigError::Viewport {
                width: self.viewport_width,
                height: self.viewport_height,
            });
        }
        if !is_positive(self.tile_length) {
            return Err(ConfigError::TileLength(self.tile_length));
        }
        if self.tick_rate_hz == 0 {
            return Err(ConfigError::TickRate);
        }
        if self.animation_interval_ms == 0 {
            return Err(ConfigError::Interval { name: "animation" });
        }
        if self.panning_interval_ms == 0 {
            return Err(ConfigError::Interval { name: "panning" });
        }
        if self.exit_attempts == 0 {
            return Err(ConfigError::ExitAttempts);
        }
        let _ = self.initial_dimensions()?;
        Ok(())
    }

    /// Dimensions of the first level.
    pub fn initial_dimensions(&self) -> Result<MazeDimensions, ConfigError> {
        Ok(MazeDimensions::new(self.initial_width, self.initial_height)?)
    }

    /// Simulated time covered by one tick, rounded up to the next nanosecond
    /// so that `tick_rate_hz` ticks always cover a full second.
    #[must_use]
    pub fn tick_duration(&self) -> Duration {
        Duration::from_nanos(NANOS_PER_SECOND.div_ceil(u64::from(self.tick_rate_hz.max(1))))
    }

    /// Interval between agent interpolation steps.
    #[must_use]
    pub fn animation_interval(&self) -> Duration {
        Duration::from_millis(self.animation_interval_ms)
    }

    /// Interval between camera panning steps.
    #[must_use]
    pub fn panning_interval(&self) -> Duration {
        Duration::from_millis(self.panning_interval_ms)
    }
}

fn is_positive(value: f32) -> bool {
    value.is_finite() && value > 0.0
}

/// Errors reported when a [`RuntimeConfig`] cannot drive a runtime.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum ConfigError {
    /// The viewport must have a positive, finite size.
    #[error("viewport must be positive on both axes (received {width}x{height})")]
    Viewport {
        /// Configured width.
        width: f32,
        /// Configured height.
        height: f32,
    },
    /// The tile edge must be positive and finite.
    #[error("tile length must be positive (received {0})")]
    TileLength(f32),
    /// The tick rate must be at least one tick per second.
    #[error("tick rate must be at least 1 Hz")]
    TickRate,
    /// Timer intervals must be at least one millisecond.
    #[error("{name} interval must be at least 1 ms")]
    Interval {
        /// Timer whose interval is invalid.
        name: &'static str,
    },
    /// Exit placement needs at least one random draw.
    #[error("exit placement needs at least one attempt")]
    ExitAttempts,
    /// The first level's dimensions are invalid.
    #[error("invalid initial maze dimensions: {0}")]
    InitialDimensions(#[from] DimensionError),
}
