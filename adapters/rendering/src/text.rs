use std::io::Write;

use anyhow::{Context, Result as AnyResult};
use maze_runner_core::{Direction, TilePosition, WallGrid, Walls};

use crate::{Presentation, RenderingBackend, Scene};

const AGENT_GLYPH: char = '@';
const EXIT_GLYPH: char = 'X';
const TRAIL_GLYPH: char = '.';

/// Backend that prints every frame as box-drawn text.
#[derive(Debug)]
pub struct TextBackend<W> {
    writer: W,
}

impl<W: Write> TextBackend<W> {
    /// Creates a backend that writes frames into `writer`.
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Returns the underlying writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> RenderingBackend for TextBackend<W> {
    fn present(&mut self, presentation: &Presentation) -> AnyResult<()> {
        let frame = render_scene(&presentation.scene);
        write!(
            self.writer,
            "== {} ==\n{frame}",
            presentation.window_title
        )
        .context("failed to write frame")?;
        self.writer.flush().context("failed to flush frame")
    }
}

/// Draws a scene: the full maze with its glyphs followed by the HUD line.
#[must_use]
pub fn render_scene(scene: &Scene) -> String {
    let agent = scene.agent_tile();
    let columns = scene.columns;
    let tile_at = |tile: TilePosition| {
        let index = u64::from(tile.row()) * u64::from(columns) + u64::from(tile.column());
        usize::try_from(index)
            .ok()
            .and_then(|index| scene.tiles.get(index))
    };

    let mut frame = draw(
        scene.columns,
        scene.rows,
        |tile| tile_at(tile).map_or(Walls::all(), |presentation| presentation.walls),
        |tile| {
            if tile == agent {
                AGENT_GLYPH
            } else if tile == scene.exit {
                EXIT_GLYPH
            } else if tile_at(tile).is_some_and(|presentation| presentation.trailed) {
                TRAIL_GLYPH
            } else {
                ' '
            }
        },
    );
    frame.push_str(&scene.hud.to_string());
    frame.push('\n');
    frame
}

/// Draws a bare wall layout without glyphs.
#[must_use]
pub fn render_walls(walls: &WallGrid) -> String {
    let dimensions = walls.dimensions();
    draw(
        dimensions.width(),
        dimensions.height(),
        |tile| walls.walls(tile).unwrap_or(Walls::all()),
        |_| ' ',
    )
}

fn draw<F, G>(columns: u32, rows: u32, walls_at: F, glyph_at: G) -> String
where
    F: Fn(TilePosition) -> Walls,
    G: Fn(TilePosition) -> char,
{
    let mut out = String::new();
    for row in 0..rows {
        for column in 0..columns {
            out.push('+');
            out.push_str(horizontal(walls_at(TilePosition::new(column, row)), Direction::North));
        }
        out.push_str("+\n");

        for column in 0..columns {
            let tile = TilePosition::new(column, row);
            out.push(vertical(walls_at(tile), Direction::West));
            out.push(' ');
            out.push(glyph_at(tile));
            out.push(' ');
        }
        let last = walls_at(TilePosition::new(columns.saturating_sub(1), row));
        out.push(vertical(last, Direction::East));
        out.push('\n');
    }

    let bottom = rows.saturating_sub(1);
    for column in 0..columns {
        out.push('+');
        out.push_str(horizontal(walls_at(TilePosition::new(column, bottom)), Direction::South));
    }
    out.push_str("+\n");
    out
}

fn horizontal(walls: Walls, side: Direction) -> &'static str {
    if walls.blocks(side) {
        "---"
    } else {
        "   "
    }
}

fn vertical(walls: Walls, side: Direction) -> char {
    if walls.blocks(side) {
        '|'
    } else {
        ' '
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Color, Hud, Palette};
    use glam::Vec2;
    use maze_runner_core::{MazeDimensions, MazeGrid, TileMark, Viewport};

    fn corridor() -> WallGrid {
        let dimensions = MazeDimensions::new(3, 1).expect("valid dimensions");
        let mut walls = WallGrid::closed(dimensions);
        let _ = walls.carve(TilePosition::new(0, 0), Direction::East);
        let _ = walls.carve(TilePosition::new(1, 0), Direction::East);
        walls
    }

    #[test]
    fn bare_walls_draw_as_boxes() {
        let dimensions = MazeDimensions::new(2, 2).expect("valid dimensions");
        let mut walls = WallGrid::closed(dimensions);
        let _ = walls.carve(TilePosition::new(0, 0), Direction::South);

        assert_eq!(
            render_walls(&walls),
            "+---+---+\n|   |   |\n+   +---+\n|   |   |\n+---+---+\n"
        );
    }

    #[test]
    fn scene_shows_agent_exit_trail_and_hud() {
        let mut grid = MazeGrid::from_walls(&corridor(), |_| TileMark::Floor { shade: 220 });
        let _ = grid.mark_trailed(TilePosition::new(0, 0));
        let scene = Scene::compose(
            &grid,
            Vec2::new(32.0, 0.0),
            TilePosition::new(2, 0),
            Viewport::new(0.0, 0.0, 512.0, 512.0),
            32.0,
            Hud {
                level: 1,
                steps_taken: 1,
                elapsed_seconds: 4,
            },
            Palette::default(),
        )
        .expect("valid tile length");

        assert_eq!(
            render_scene(&scene),
            "+---+---+---+\n| .   @   X |\n+---+---+---+\nlevel 1 | steps 1 | 00:04\n"
        );
    }

    #[test]
    fn backend_writes_title_and_frame() {
        let grid = MazeGrid::from_walls(&corridor(), |_| TileMark::Floor { shade: 220 });
        let scene = Scene::compose(
            &grid,
            Vec2::ZERO,
            TilePosition::new(2, 0),
            Viewport::new(0.0, 0.0, 512.0, 512.0),
            32.0,
            Hud::default(),
            Palette::default(),
        )
        .expect("valid tile length");
        let presentation = Presentation::new("Maze Runner", Color::grey(0x33), scene);
        let mut backend = TextBackend::new(Vec::new());

        backend.present(&presentation).expect("in-memory write");

        let written = String::from_utf8(backend.into_inner()).expect("utf8 output");
        assert!(written.starts_with("== Maze Runner ==\n+---+---+---+\n| @       X |\n"));
    }
}
