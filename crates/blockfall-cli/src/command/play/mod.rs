use std::time::Duration;

use blockfall_engine::PieceSeed;
use log::info;
use rand::Rng as _;

use crate::{command::play::app::PlayApp, tui::Tui};

mod app;

const DEFAULT_TICK_MS: u64 = 500;

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct PlayArg {
    /// Seed for the piece sequence as 32 hex digits (random if omitted)
    #[clap(long, value_name = "HEX")]
    seed: Option<PieceSeed>,
    /// Milliseconds between gravity ticks
    #[clap(long, default_value_t = DEFAULT_TICK_MS, value_parser = clap::value_parser!(u64).range(1..))]
    tick_ms: u64,
}

impl Default for PlayArg {
    fn default() -> Self {
        Self {
            seed: None,
            tick_ms: DEFAULT_TICK_MS,
        }
    }
}

pub(crate) fn run(arg: &PlayArg) -> anyhow::Result<()> {
    let PlayArg { seed, tick_ms } = arg;

    let seed = seed.unwrap_or_else(|| rand::rng().random());
    info!("starting game with seed {seed}");

    let mut app = PlayApp::new(seed, Duration::from_millis(*tick_ms));
    Tui::new().run(&mut app)?;

    let stats = app.game().stats();
    info!(
        "game finished: score {}, {} pieces",
        stats.score(),
        stats.completed_pieces()
    );
    println!("seed:   {seed}");
    println!("score:  {}", stats.score());
    println!("pieces: {}", stats.completed_pieces());

    Ok(())
}
