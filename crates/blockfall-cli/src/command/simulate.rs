use std::path::PathBuf;

use blockfall_engine::{
    Command, Game, GameConfig, GameState, PieceGenerator, PieceSeed, Progression,
};
use rand::{Rng, SeedableRng as _};
use rand_pcg::Pcg32;
use serde::Serialize;

use crate::{command::ConfigArg, util::Output};

/// Commands the random agent picks from between gravity ticks.
const AGENT_COMMANDS: [Command; 4] = [
    Command::MoveLeft,
    Command::MoveRight,
    Command::Rotate,
    Command::SoftDrop,
];
/// Upper bound (exclusive) on agent commands issued per gravity tick.
const MAX_COMMANDS_PER_TICK: usize = 4;

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct SimulateArg {
    #[clap(flatten)]
    pub(crate) config: ConfigArg,
    /// Seed for the piece sequence and the agent (32 hex characters); random if omitted
    #[clap(long)]
    pub(crate) seed: Option<PieceSeed>,
    /// Stop after this many pieces have locked
    #[clap(long, default_value_t = 1000)]
    pub(crate) max_pieces: usize,
    /// Output file path (stdout if omitted)
    #[clap(long)]
    pub(crate) output: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize)]
struct SimulationReport {
    seed: PieceSeed,
    config: GameConfig,
    state: GameState,
    ticks: usize,
    progression: Progression,
    board: Vec<String>,
}

pub(crate) fn run(arg: &SimulateArg) -> anyhow::Result<()> {
    let SimulateArg {
        config,
        seed,
        max_pieces,
        output,
    } = arg;

    let config = config.load()?;
    let seed = seed.unwrap_or_else(|| rand::rng().random());
    let report = simulate(config, seed, *max_pieces)?;
    Output::save_json(&report, output.clone())
}

/// Plays one game with a random agent until it is over or `max_pieces` locked.
fn simulate(
    config: GameConfig,
    seed: PieceSeed,
    max_pieces: usize,
) -> anyhow::Result<SimulationReport> {
    let mut agent = Pcg32::from_seed(*seed.as_bytes());
    // separate stream from the piece generator seeded with the same bytes
    agent.advance(1 << 32);

    let mut game = Game::with_config(config.clone(), PieceGenerator::with_seed(seed))?;
    game.start()?;

    let mut ticks = 0;
    while game.is_running() && game.progression().completed_pieces() < max_pieces {
        for _ in 0..agent.random_range(0..MAX_COMMANDS_PER_TICK) {
            let command = AGENT_COMMANDS[agent.random_range(0..AGENT_COMMANDS.len())];
            _ = game.apply(command);
        }
        let interval = game.gravity_interval();
        ticks += game.advance(interval);
    }

    Ok(SimulationReport {
        seed,
        config,
        state: game.state(),
        ticks,
        progression: game.progression().clone(),
        board: game.board().to_string().lines().map(str::to_owned).collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seed() -> PieceSeed {
        "00000000000000000000000000002a2a".parse().unwrap()
    }

    #[test]
    fn test_same_seed_same_report() {
        let first = simulate(GameConfig::default(), seed(), 200).unwrap();
        let second = simulate(GameConfig::default(), seed(), 200).unwrap();
        assert_eq!(
            serde_json::to_value(&first).unwrap(),
            serde_json::to_value(&second).unwrap()
        );
    }

    #[test]
    fn test_stops_at_piece_limit_or_game_over() {
        let report = simulate(GameConfig::default(), seed(), 25).unwrap();
        let pieces = report.progression.completed_pieces();
        match report.state {
            GameState::Running => assert_eq!(pieces, 25),
            GameState::Over => assert!(pieces <= 25),
            state => panic!("unexpected final state {state}"),
        }
        assert!(report.ticks > 0);
        assert!(report.progression.score() >= pieces * 10);
    }

    #[test]
    fn test_random_agent_tops_out_on_small_board() {
        let config = GameConfig {
            board_width: 6,
            board_height: 6,
            ..GameConfig::default()
        };
        let report = simulate(config, seed(), usize::MAX).unwrap();
        assert_eq!(report.state, GameState::Over);
        assert_eq!(report.board.len(), 6);
        assert!(report.board.iter().all(|row| row.len() == 6));
    }

    #[test]
    fn test_report_json_fields() {
        let report = simulate(GameConfig::default(), seed(), 3).unwrap();
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["seed"], "00000000000000000000000000002a2a");
        assert_eq!(json["config"]["board_width"], 10);
        assert!(json["progression"]["score"].is_u64());
        assert_eq!(json["board"].as_array().unwrap().len(), 20);
    }
}
