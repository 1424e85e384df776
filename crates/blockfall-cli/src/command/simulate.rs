use blockfall_engine::{Game, GameStats, PieceSeed, PieceSource, Snapshot, TickOutcome};
use log::{info, warn};
use rand::{Rng, SeedableRng as _};
use rand_pcg::Pcg32;
use serde::Serialize;

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct SimulateArg {
    /// Seed for the piece sequence as 32 hex digits (random if omitted)
    #[clap(long, value_name = "HEX")]
    seed: Option<PieceSeed>,
    /// Seed for the random player's choice of commands
    #[clap(long, default_value_t = 0)]
    player_seed: u64,
    /// Stop after this many ticks even if the game is still running
    #[clap(long, default_value_t = 10_000)]
    max_ticks: usize,
    /// Number of random commands issued between two ticks
    #[clap(long, default_value_t = 2)]
    moves_per_tick: usize,
    /// Print the result as JSON
    #[clap(long)]
    json: bool,
}

#[derive(Debug, Serialize)]
struct SimulationReport<'a> {
    seed: PieceSeed,
    ticks: usize,
    stats: &'a GameStats,
    snapshot: Snapshot,
}

pub(crate) fn run(arg: &SimulateArg) -> anyhow::Result<()> {
    let SimulateArg {
        seed,
        player_seed,
        max_ticks,
        moves_per_tick,
        json,
    } = arg;

    let seed = seed.unwrap_or_else(|| rand::rng().random());
    info!("simulating with piece seed {seed} and player seed {player_seed}");

    let mut game = Game::with_seed(seed);
    let mut player = Pcg32::seed_from_u64(*player_seed);
    let ticks = play_randomly(&mut game, &mut player, *max_ticks, *moves_per_tick);

    if game.is_game_over() {
        info!("game over after {ticks} ticks with score {}", game.score());
    } else {
        warn!("tick limit reached with the game still running");
    }

    if *json {
        let report = SimulationReport {
            seed,
            ticks,
            stats: game.stats(),
            snapshot: game.snapshot(),
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        let stats = game.stats();
        println!("seed:   {seed}");
        println!("ticks:  {ticks}");
        println!("state:  {}", game.state());
        println!("score:  {}", stats.score());
        println!("pieces: {}", stats.completed_pieces());
        print!("{}", game.board());
    }

    Ok(())
}

/// Drives `game` with uniformly chosen commands until it is over or
/// `max_ticks` ticks have run. Returns the number of ticks.
fn play_randomly<S, R>(
    game: &mut Game<S>,
    player: &mut R,
    max_ticks: usize,
    moves_per_tick: usize,
) -> usize
where
    S: PieceSource,
    R: Rng + ?Sized,
{
    let mut ticks = 0;
    while ticks < max_ticks && !game.is_game_over() {
        for _ in 0..moves_per_tick {
            match player.random_range(0..4) {
                0 => _ = game.move_left(),
                1 => _ = game.move_right(),
                2 => _ = game.rotate_clockwise(),
                _ => {}
            }
        }
        if let TickOutcome::Locked { cleared_rows } = game.tick()
            && cleared_rows > 0
        {
            info!("cleared {cleared_rows} rows at tick {ticks}");
        }
        ticks += 1;
    }
    ticks
}
