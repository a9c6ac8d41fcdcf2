pub use self::{core::*, engine::*};

pub mod core;
pub mod engine;

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("piece colliding at target position")]
pub struct PieceCollisionError;

/// Reason a command was rejected. Rejected commands never change the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error, derive_more::IsVariant)]
pub enum CommandError {
    #[display("piece colliding at target position")]
    PieceCollision(PieceCollisionError),
    #[display("no falling piece")]
    NoFallingPiece,
    #[display("game is {state}, not running")]
    NotRunning { state: GameState },
    #[display("cannot {command} while the game is {state}")]
    InvalidTransition { command: Command, state: GameState },
    #[display(
        "board is {actual_width}x{actual_height}, expected {expected_width}x{expected_height}"
    )]
    BoardSizeMismatch {
        expected_width: usize,
        expected_height: usize,
        actual_width: usize,
        actual_height: usize,
    },
}

impl From<PieceCollisionError> for CommandError {
    fn from(err: PieceCollisionError) -> Self {
        CommandError::PieceCollision(err)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum ConfigError {
    #[display("board width {width} is out of range {min}..={max}")]
    BoardWidth { width: usize, min: usize, max: usize },
    #[display("board height {height} is out of range {min}..={max}")]
    BoardHeight {
        height: usize,
        min: usize,
        max: usize,
    },
    #[display("minimum gravity interval must be positive")]
    ZeroMinGravity,
    #[display("minimum gravity interval {min_ms}ms exceeds initial interval {initial_ms}ms")]
    GravityRange { min_ms: u64, initial_ms: u64 },
    #[display("lines per level must be positive")]
    ZeroLinesPerLevel,
}
