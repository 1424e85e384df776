use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::logging;

use self::{play::PlayArg, simulate::SimulateArg};

mod play;
mod simulate;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// Write log records to this file instead of stderr
    #[arg(long, global = true, value_name = "PATH")]
    log_file: Option<PathBuf>,
    /// What mode to run the program in
    #[command(subcommand)]
    mode: Option<Mode>,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Play in the terminal
    Play(#[clap(flatten)] PlayArg),
    /// Run a game with a random player and report the result
    Simulate(#[clap(flatten)] SimulateArg),
}

impl Mode {
    /// Default log filter, or `None` if no logger may be installed.
    fn default_log_filter(&self, has_log_file: bool) -> Option<&'static str> {
        match self {
            // Anything written to stderr would tear the terminal UI, whatever
            // `RUST_LOG` says.
            Mode::Play(_) if !has_log_file => None,
            Mode::Play(_) | Mode::Simulate(_) => Some("info"),
        }
    }
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    let log_file = args.log_file.as_deref();
    let mode = args.mode.unwrap_or(Mode::Play(PlayArg::default()));
    if let Some(filter) = mode.default_log_filter(log_file.is_some()) {
        logging::init(log_file, filter)?;
    }
    match mode {
        Mode::Play(arg) => play::run(&arg)?,
        Mode::Simulate(arg) => simulate::run(&arg)?,
    }
    Ok(())
}
