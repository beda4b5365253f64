#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that generates and plays Maze Runner mazes.

mod config;
mod play;

use std::{
    io::{self, Write},
    path::PathBuf,
};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use maze_runner_core::MazeDimensions;
use maze_runner_rendering::render_walls;
use maze_runner_system_generation::carve;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::play::PlayArgs;

/// Generates perfect mazes and plays them from the terminal.
#[derive(Parser, Debug)]
#[command(name = "maze-runner", version, about, long_about = None)]
struct Cli {
    /// TOML file overriding the runtime defaults.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log filter applied when RUST_LOG is not set.
    #[arg(long, global = true, default_value = "info")]
    log_filter: String,

    #[command(subcommand)]
    command: Mode,
}

#[derive(Subcommand, Debug)]
enum Mode {
    /// Carve a single maze and print it with its carve statistics.
    Generate {
        /// Maze size written as WIDTHxHEIGHT.
        #[arg(long, default_value = "8x8")]
        size: MazeDimensions,

        /// Seed for the carving walk; random when omitted.
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Play a session headlessly from direction tokens.
    Play(PlayArgs),
}

/// Entry point for the Maze Runner command-line interface.
fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli.log_filter)?;
    let config = config::load(cli.config.as_deref())?;

    match cli.command {
        Mode::Generate { size, seed } => generate(size, seed.unwrap_or_else(rand::random)),
        Mode::Play(args) => play::run(config, args),
    }
}

fn init_tracing(default_filter: &str) -> Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(default_filter)
            .with_context(|| format!("invalid log filter '{default_filter}'"))?,
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .compact()
        .init();
    Ok(())
}

fn generate(size: MazeDimensions, seed: u64) -> Result<()> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let carving = carve(size, &mut rng);
    let report = carving.report;
    info!(%size, seed, "maze generated");

    let mut stdout = io::stdout().lock();
    write!(stdout, "{}", render_walls(&carving.walls)).context("failed to print maze")?;
    writeln!(
        stdout,
        "size {size} | seed {seed} | start ({}, {}) | carved {} | backtracks {} | peak stack {}",
        report.start.column(),
        report.start.row(),
        report.carved,
        report.backtracks,
        report.peak_stack_depth
    )
    .context("failed to print carve report")?;
    Ok(())
}
