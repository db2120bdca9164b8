#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Headless command-line runner that plays Quiz Defence with a scripted
//! player and prints the HUD to standard output.

mod autopilot;
mod config;
mod presenter;

use std::{io, path::PathBuf};

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use quiz_defence_session::Session;
use quiz_defence_world::query;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::{autopilot::Autopilot, presenter::TextPresenter};

/// Frames between two entity summaries.
const SUMMARY_INTERVAL: u64 = 60;

/// Command-line arguments for the headless runner.
#[derive(Debug, Parser)]
#[command(name = "quiz-defence", about = "Tower defence gated by arithmetic quizzes")]
struct Args {
    /// Number of waves to play before stopping.
    #[arg(long, default_value_t = 3)]
    waves: u32,
    /// Logical ticks per frame while a wave is running.
    #[arg(long, default_value_t = 1)]
    speed: u32,
    /// Seed for quiz generation and the scripted player.
    #[arg(long)]
    seed: Option<u64>,
    /// Probability that the scripted player answers a quiz correctly.
    #[arg(long, default_value_t = 0.8, value_parser = parse_probability)]
    accuracy: f64,
    /// Upper bound on frames before the run is cut short.
    #[arg(long, default_value_t = 20_000)]
    max_frames: u64,
    /// TOML file overriding session and autopilot tunables.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Log filter used when `RUST_LOG` is unset.
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn parse_probability(text: &str) -> Result<f64, String> {
    let value: f64 = text
        .parse()
        .map_err(|error| format!("`{text}` is not a number: {error}"))?;
    if (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(format!("`{text}` is not a probability between 0 and 1"))
    }
}

fn init_tracing(level: &str) -> Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(level)
            .with_context(|| format!("invalid log level {level:?}"))?,
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init()
        .map_err(|error| anyhow!("failed to install tracing subscriber: {error}"))
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(&args.log_level)?;

    let mut config = config::load(args.config.as_deref())?;
    if let Some(seed) = args.seed {
        config.session.rng_seed = seed;
    }
    let seed = config.session.rng_seed;

    let presenter = TextPresenter::new(io::stdout().lock(), SUMMARY_INTERVAL);
    let mut session = Session::new(config.session, presenter);
    let mut pilot = Autopilot::new(&config.autopilot, args.accuracy, args.speed, seed);

    info!(waves = args.waves, seed, "starting run");
    let mut frames = 0;
    let mut ticks = 0_u64;
    while frames < args.max_frames && !session.is_game_over() {
        if query::wave_number(session.world()).get() > args.waves {
            break;
        }
        pilot.act(&mut session);
        ticks += u64::from(session.frame());
        frames += 1;
    }

    let economy = query::economy(session.world());
    info!(
        frames,
        ticks,
        waves_cleared = economy.wave.get().saturating_sub(1),
        gold = economy.gold,
        lives = economy.lives,
        experience = economy.experience,
        towers = query::tower_view(session.world()).len(),
        tier = session.difficulty().tier().get(),
        game_over = session.is_game_over(),
        "run finished"
    );

    session
        .presenter_mut()
        .finish()
        .context("failed to write HUD output")
}
