#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Maze Runner adapters.
//!
//! Adapters pull a [`Scene`] out of the runtime state once per frame and hand
//! it to a [`RenderingBackend`]. Scenes carry pixel-space geometry only; they
//! never reach back into the runtime.

mod text;

use anyhow::Result as AnyResult;
use glam::Vec2;
use maze_runner_core::{MazeGrid, TileMark, TilePosition, Viewport, Walls};
use std::{error::Error, fmt};

pub use text::{render_scene, render_walls, TextBackend};

/// RGBA color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Creates a new color from floating point channels.
    #[must_use]
    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: 1.0,
        }
    }

    /// Creates an opaque color from hue in degrees and saturation and
    /// lightness in the range 0.0..=1.0.
    #[must_use]
    pub fn from_hsl(hue: f32, saturation: f32, lightness: f32) -> Self {
        let saturation = saturation.clamp(0.0, 1.0);
        let lightness = lightness.clamp(0.0, 1.0);
        let chroma = (1.0 - (2.0 * lightness - 1.0).abs()) * saturation;
        let sector = hue.rem_euclid(360.0) / 60.0;
        let secondary = chroma * (1.0 - (sector % 2.0 - 1.0).abs());
        let (red, green, blue) = match sector as u32 {
            0 => (chroma, secondary, 0.0),
            1 => (secondary, chroma, 0.0),
            2 => (0.0, chroma, secondary),
            3 => (0.0, secondary, chroma),
            4 => (secondary, 0.0, chroma),
            _ => (chroma, 0.0, secondary),
        };
        let offset = lightness - chroma / 2.0;
        Self::new(red + offset, green + offset, blue + offset, 1.0)
    }

    /// Opaque grey with all channels set to `shade`.
    #[must_use]
    pub const fn grey(shade: u8) -> Self {
        Self::from_rgb_u8(shade, shade, shade)
    }
}

/// Colors used for every element of a frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Palette {
    /// Clear color behind the maze.
    pub background: Color,
    /// Color of wall strokes.
    pub wall: Color,
    /// Fill of the exit tile.
    pub exit: Color,
    /// Fill of the agent.
    pub agent: Color,
    /// Fill of tiles the agent has departed from.
    pub trail: Color,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            background: Color::from_rgb_u8(0x33, 0x33, 0x33),
            wall: Color::from_rgb_u8(0x22, 0x22, 0x22),
            exit: Color::from_rgb_u8(0xff, 0x80, 0x00),
            agent: Color::from_hsl(145.0, 0.8, 0.4),
            trail: Color::from_hsl(145.0, 0.7, 0.6),
        }
    }
}

/// Render-only description of a single tile.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TilePresentation {
    /// Grid coordinate of the tile.
    pub tile: TilePosition,
    /// Top-left corner of the tile in maze pixel space.
    pub origin: Vec2,
    /// Sides that carry a wall stroke.
    pub walls: Walls,
    /// Fill color of the tile.
    pub fill: Color,
    /// Whether the agent has departed from the tile.
    pub trailed: bool,
}

/// Counters shown alongside the maze.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Hud {
    /// One-based level number.
    pub level: u32,
    /// Number of accepted moves.
    pub steps_taken: u32,
    /// Whole seconds spent on the level.
    pub elapsed_seconds: u32,
}

impl fmt::Display for Hud {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "level {} | steps {} | {:02}:{:02}",
            self.level,
            self.steps_taken,
            self.elapsed_seconds / 60,
            self.elapsed_seconds % 60
        )
    }
}

/// Scene description combining the maze tiles, the agent, the exit and the HUD.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    /// Number of tile columns.
    pub columns: u32,
    /// Number of tile rows.
    pub rows: u32,
    /// Edge length of a tile in pixels.
    pub tile_length: f32,
    /// Every tile of the maze in row-major order.
    pub tiles: Vec<TilePresentation>,
    /// Interpolated top-left corner of the agent in maze pixel space.
    pub agent: Vec2,
    /// Exit tile.
    pub exit: TilePosition,
    /// Visible region in maze pixel space.
    pub viewport: Viewport,
    /// Counters shown alongside the maze.
    pub hud: Hud,
    /// Colors used to draw the scene.
    pub palette: Palette,
}

impl Scene {
    /// Builds a scene from runtime state.
    pub fn compose(
        grid: &MazeGrid,
        agent: Vec2,
        exit: TilePosition,
        viewport: Viewport,
        tile_length: f32,
        hud: Hud,
        palette: Palette,
    ) -> Result<Self, RenderingError> {
        if !(tile_length.is_finite() && tile_length > 0.0) {
            return Err(RenderingError::InvalidTileLength { tile_length });
        }

        let tiles = grid
            .tiles()
            .iter()
            .map(|tile| {
                let position = tile.position();
                let (fill, trailed) = match tile.mark() {
                    TileMark::Floor { shade } => (Color::grey(shade), false),
                    TileMark::Trailed => (palette.trail, true),
                };
                TilePresentation {
                    tile: position,
                    origin: Vec2::new(position.column() as f32, position.row() as f32)
                        * tile_length,
                    walls: tile.walls(),
                    fill,
                    trailed,
                }
            })
            .collect();

        let dimensions = grid.dimensions();
        Ok(Self {
            columns: dimensions.width(),
            rows: dimensions.height(),
            tile_length,
            tiles,
            agent,
            exit,
            viewport,
            hud,
            palette,
        })
    }

    /// Tiles that overlap the viewport.
    pub fn visible_tiles(&self) -> impl Iterator<Item = &TilePresentation> + '_ {
        self.tiles.iter().filter(move |tile| {
            self.viewport.intersects(
                tile.origin.x,
                tile.origin.y,
                self.tile_length,
                self.tile_length,
            )
        })
    }

    /// Converts a maze pixel position into viewport-relative pixels.
    #[must_use]
    pub fn to_screen(&self, world: Vec2) -> Vec2 {
        world - Vec2::new(self.viewport.x, self.viewport.y)
    }

    /// Tile nearest to the agent's interpolated position.
    #[must_use]
    pub fn agent_tile(&self) -> TilePosition {
        let tiles = (self.agent / self.tile_length).round().max(Vec2::ZERO);
        TilePosition::new(tiles.x as u32, tiles.y as u32)
    }
}

/// Presentation descriptor consumed by rendering backends.
#[derive(Clone, Debug, PartialEq)]
pub struct Presentation {
    /// Title used by the created window.
    pub window_title: String,
    /// Solid color used to clear each frame.
    pub clear_color: Color,
    /// Scene content that should be displayed.
    pub scene: Scene,
}

impl Presentation {
    /// Constructs a new presentation descriptor.
    #[must_use]
    pub fn new<T>(window_title: T, clear_color: Color, scene: Scene) -> Self
    where
        T: Into<String>,
    {
        Self {
            window_title: window_title.into(),
            clear_color,
            scene,
        }
    }
}

/// Rendering backend capable of presenting Maze Runner scenes.
pub trait RenderingBackend {
    /// Draws a single frame.
    fn present(&mut self, presentation: &Presentation) -> AnyResult<()>;
}

/// Errors that can occur when constructing rendering descriptors.
#[derive(Debug, PartialEq)]
pub enum RenderingError {
    /// Tiles must have a positive edge length.
    InvalidTileLength {
        /// Provided edge length that failed validation.
        tile_length: f32,
    },
}

impl fmt::Display for RenderingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidTileLength { tile_length } => {
                write!(f, "tile_length must be positive (received {tile_length})")
            }
        }
    }
}

impl Error for RenderingError {}
