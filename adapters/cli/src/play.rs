use std::io::{self, BufRead};

use anyhow::{Context, Result};
use clap::Args;
use maze_runner_core::{Command, Direction, Event, MazeDimensions};
use maze_runner_rendering::{Hud, Palette, Presentation, RenderingBackend, Scene, TextBackend};
use maze_runner_world::{query, GameSession, LevelSummary, Progress, RuntimeConfig};
use tracing::{debug, info, warn};

/// Options for a headless play session.
#[derive(Args, Debug)]
pub(crate) struct PlayArgs {
    /// Seed for the session; random when omitted.
    #[arg(long)]
    seed: Option<u64>,

    /// Level to resume from.
    #[arg(long)]
    level: Option<u32>,

    /// Maze size of the resumed level, written as WIDTHxHEIGHT.
    #[arg(long)]
    size: Option<MazeDimensions>,

    /// Direction tokens (up, down, left, right) separated by commas or spaces.
    /// Tokens are read from standard input when omitted.
    #[arg(long)]
    moves: Option<String>,

    /// Upper bound on ticks spent waiting for the maze to settle after a move.
    #[arg(long, default_value_t = 1_000)]
    max_settle_ticks: u32,
}

/// Runs a session until the direction tokens are exhausted.
pub(crate) fn run(config: RuntimeConfig, args: PlayArgs) -> Result<()> {
    let seed = args.seed.unwrap_or_else(rand::random);
    let session = match (args.level, args.size) {
        (None, None) => GameSession::new(config, seed)?,
        (level, size) => {
            let size = match size {
                Some(size) => size,
                None => config.initial_dimensions()?,
            };
            let progress = Progress::new(level.unwrap_or(1), size.width(), size.height())
                .context("invalid level or size")?;
            GameSession::resume(config, progress, seed)?
        }
    };
    info!(seed, level = session.level(), "session started");

    let mut player = Player {
        session,
        backend: TextBackend::new(io::stdout()),
        events: Vec::new(),
        max_settle_ticks: args.max_settle_ticks,
    };
    player.settle();
    player.present()?;

    match args.moves {
        Some(moves) => {
            for token in tokens(&moves) {
                player.play_token(token)?;
            }
        }
        None => {
            for line in io::stdin().lock().lines() {
                let line = line.context("failed to read direction tokens from stdin")?;
                for token in tokens(&line) {
                    player.play_token(token)?;
                }
            }
        }
    }

    let progress = player.session.progress();
    info!(
        level = progress.level(),
        steps_taken = query::steps_taken(player.session.runtime()),
        "session ended"
    );
    Ok(())
}

fn tokens(input: &str) -> impl Iterator<Item = &str> {
    input
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|token| !token.is_empty())
}

struct Player<B> {
    session: GameSession,
    backend: B,
    events: Vec<Event>,
    max_settle_ticks: u32,
}

impl<B: RenderingBackend> Player<B> {
    fn play_token(&mut self, token: &str) -> Result<()> {
        let direction: Direction = match token.parse() {
            Ok(direction) => direction,
            Err(error) => {
                warn!(%error, "ignoring input");
                return Ok(());
            }
        };

        self.session
            .apply(Command::Move { direction }, &mut self.events);
        self.settle();
        self.present()
    }

    fn settle(&mut self) {
        let dt = self.session.config().tick_duration();
        for _ in 0..self.max_settle_ticks {
            if query::is_settled(self.session.runtime()) {
                break;
            }
            self.session.apply(Command::Tick { dt }, &mut self.events);
        }
        if !query::is_settled(self.session.runtime()) {
            warn!(
                max_settle_ticks = self.max_settle_ticks,
                "maze did not settle"
            );
        }
    }

    fn present(&mut self) -> Result<()> {
        for event in self.events.drain(..) {
            debug!(?event, "runtime event");
            if let Event::LevelCompleted {
                level,
                dimensions,
                steps_taken,
                elapsed_seconds,
            } = event
            {
                let summary = LevelSummary {
                    level,
                    dimensions,
                    steps_taken,
                    elapsed_seconds,
                };
                println!("{summary}");
            }
        }

        let presentation = frame(&self.session)?;
        self.backend.present(&presentation)
    }
}

fn frame(session: &GameSession) -> Result<Presentation> {
    let runtime = session.runtime();
    let palette = Palette::default();
    let scene = Scene::compose(
        query::grid(runtime),
        query::agent_pixel_position(runtime),
        query::exit(runtime),
        query::viewport(runtime),
        session.config().tile_length,
        Hud {
            level: session.level(),
            steps_taken: query::steps_taken(runtime),
            elapsed_seconds: query::elapsed_seconds(runtime),
        },
        palette,
    )?;
    Ok(Presentation::new(
        format!("Maze Runner - level {}", session.level()),
        palette.background,
        scene,
    ))
}
