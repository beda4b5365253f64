#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Camera controller that frames the maze inside a fixed-size viewport.
//!
//! Mazes that fit the viewport are centred once and never move. Larger mazes
//! open on the exit, pan toward the agent one eighth of a tile per axis per
//! panning tick, and then follow the agent exactly.

use glam::Vec2;
use maze_runner_core::{CameraMode, Viewport};

/// Number of panning steps needed to cross one tile.
const PAN_STEPS_PER_TILE: f32 = 8.0;

/// Viewport tracker that centres, pans and follows.
#[derive(Clone, Debug, PartialEq)]
pub struct Camera {
    origin: Vec2,
    size: Vec2,
    tile_length: f32,
    mode: CameraMode,
}

impl Camera {
    /// Creates a fixed camera with the provided viewport size and tile edge length.
    #[must_use]
    pub fn new(size: Vec2, tile_length: f32) -> Self {
        Self {
            origin: Vec2::ZERO,
            size,
            tile_length,
            mode: CameraMode::Fixed,
        }
    }

    /// Chooses the framing for a freshly generated maze.
    ///
    /// `maze_extent` is the pixel size of the whole maze and `exit` the pixel
    /// origin of the exit tile.
    pub fn initialise_framing(&mut self, maze_extent: Vec2, exit: Vec2) {
        if maze_extent.cmple(self.size).all() {
            self.origin = maze_extent / 2.0 - self.size / 2.0;
            self.mode = CameraMode::Fixed;
        } else {
            self.origin = self.centred_on(exit);
            self.mode = CameraMode::Panning;
        }
    }

    /// Advances the camera toward the agent's pixel origin.
    ///
    /// Returns `true` on the tick that finishes panning and engages following.
    pub fn tick(&mut self, agent: Vec2) -> bool {
        let goal = self.centred_on(agent);
        match self.mode {
            CameraMode::Fixed => false,
            CameraMode::Following => {
                self.origin = goal;
                false
            }
            CameraMode::Panning => {
                let step = self.pan_step();
                self.origin = Vec2::new(
                    approach(self.origin.x, goal.x, step),
                    approach(self.origin.y, goal.y, step),
                );
                if self.origin == goal {
                    self.mode = CameraMode::Following;
                    true
                } else {
                    false
                }
            }
        }
    }

    /// Current framing mode.
    #[must_use]
    pub const fn mode(&self) -> CameraMode {
        self.mode
    }

    /// Reports whether the camera is still travelling toward the agent.
    #[must_use]
    pub fn is_panning(&self) -> bool {
        self.mode == CameraMode::Panning
    }

    /// Top-left corner of the viewport in maze pixel space.
    #[must_use]
    pub const fn origin(&self) -> Vec2 {
        self.origin
    }

    /// Distance covered per axis by one panning tick.
    #[must_use]
    pub fn pan_step(&self) -> f32 {
        self.tile_length / PAN_STEPS_PER_TILE
    }

    /// Visible region in maze pixel space.
    #[must_use]
    pub fn viewport(&self) -> Viewport {
        Viewport::new(self.origin.x, self.origin.y, self.size.x, self.size.y)
    }

    fn centred_on(&self, tile_origin: Vec2) -> Vec2 {
        tile_origin + Vec2::splat(self.tile_length / 2.0) - self.size / 2.0
    }
}

fn approach(current: f32, goal: f32, step: f32) -> f32 {
    if (goal - current).abs() <= step {
        goal
    } else if goal > current {
        current + step
    } else {
        current - step
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn camera() -> Camera {
        Camera::new(Vec2::splat(512.0), 32.0)
    }

    #[test]
    fn small_maze_is_centred_and_fixed() {
        let mut camera = camera();
        camera.initialise_framing(Vec2::splat(128.0), Vec2::new(96.0, 96.0));

        assert_eq!(camera.mode(), CameraMode::Fixed);
        assert_eq!(camera.origin(), Vec2::splat(-192.0));

        assert!(!camera.tick(Vec2::new(1000.0, 1000.0)));
        assert_eq!(camera.origin(), Vec2::splat(-192.0));
    }

    #[test]
    fn maze_exactly_filling_the_viewport_stays_fixed() {
        let mut camera = camera();
        camera.initialise_framing(Vec2::splat(512.0), Vec2::ZERO);

        assert_eq!(camera.mode(), CameraMode::Fixed);
        assert_eq!(camera.origin(), Vec2::ZERO);
    }

    #[test]
    fn large_maze_opens_on_the_exit() {
        let mut camera = camera();
        camera.initialise_framing(Vec2::new(1024.0, 320.0), Vec2::new(960.0, 288.0));

        assert!(camera.is_panning());
        assert_eq!(camera.origin(), Vec2::new(960.0 + 16.0 - 256.0, 288.0 + 16.0 - 256.0));
    }

    #[test]
    fn panning_moves_one_eighth_tile_per_axis_and_snaps() {
        let mut camera = camera();
        camera.initialise_framing(Vec2::splat(1024.0), Vec2::new(32.0, 0.0));
        let start = camera.origin();

        assert!(!camera.tick(Vec2::ZERO));
        assert_eq!(camera.origin(), start - Vec2::new(4.0, 0.0));

        let mut ticks = 1;
        while !camera.tick(Vec2::ZERO) {
            ticks += 1;
            assert!(ticks < 100, "panning must terminate");
        }
        assert_eq!(ticks + 1, 8);
        assert_eq!(camera.mode(), CameraMode::Following);
        assert_eq!(camera.origin(), Vec2::splat(16.0 - 256.0));
    }

    #[test]
    fn panning_never_overshoots() {
        let mut camera = camera();
        camera.initialise_framing(Vec2::splat(2048.0), Vec2::new(1000.0, 10.0));
        let goal = Vec2::new(3.0, 650.0) + Vec2::splat(16.0) - Vec2::splat(256.0);
        let mut previous = (camera.origin() - goal).abs();

        while camera.is_panning() {
            let _ = camera.tick(Vec2::new(3.0, 650.0));
            let distance = (camera.origin() - goal).abs();
            assert!(distance.x <= previous.x && distance.y <= previous.y);
            previous = distance;
        }
        assert_eq!(camera.origin(), goal);
    }

    #[test]
    fn following_tracks_the_agent_every_tick() {
        let mut camera = camera();
        camera.initialise_framing(Vec2::splat(1024.0), Vec2::ZERO);
        while !camera.tick(Vec2::ZERO) {}

        assert!(!camera.tick(Vec2::new(64.0, 40.0)));
        assert_eq!(camera.origin(), Vec2::new(64.0 + 16.0 - 256.0, 40.0 + 16.0 - 256.0));
    }

    #[test]
    fn reinitialising_rearms_panning() {
        let mut camera = camera();
        camera.initialise_framing(Vec2::splat(1024.0), Vec2::ZERO);
        while !camera.tick(Vec2::ZERO) {}

        camera.initialise_framing(Vec2::splat(1024.0), Vec2::splat(992.0));
        assert!(camera.is_panning());
    }
}
