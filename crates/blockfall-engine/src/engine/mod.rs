//! Game engine logic and state management.
//!
//! This module builds the rules of play on top of the core data structures:
//!
//! - [`Game`] - Complete session: board, falling piece, next piece, progression and lifecycle
//! - [`PieceController`] - Validated movement and rotation of the falling piece
//! - [`Progression`] - Score, cleared lines, level and gravity speed
//! - [`GameConfig`] - Board dimensions and progression rules
//! - [`PieceGenerator`] - Uniform random or fixed-sequence piece supply
//! - [`GravityScheduler`] - Timer abstraction driving gravity ticks
//!
//! # Game Flow
//!
//! 1. Create a [`Game`] and call [`Game::start`]
//! 2. Forward player input as [`Command`]s; rejected commands change nothing
//! 3. Call [`Game::tick`] whenever the gravity interval elapses, or feed host
//!    time to [`Game::advance`] when using the built-in [`TickTimer`]
//! 4. A piece that cannot move down locks, full rows clear and the next piece spawns
//! 5. The game is over when a new piece cannot spawn
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//!
//! use blockfall_engine::{Command, Game, GameState};
//!
//! let mut game = Game::new();
//! game.apply(Command::Start).unwrap();
//!
//! // input is ignored while paused
//! game.apply(Command::Pause).unwrap();
//! assert!(game.apply(Command::MoveLeft).is_err());
//!
//! game.apply(Command::Resume).unwrap();
//! game.advance(Duration::from_secs(3));
//! assert_eq!(game.state(), GameState::Running);
//! assert_eq!(game.falling_piece().unwrap().position().y(), 3);
//! ```

pub use self::{
    config::*, controller::*, game::*, piece_generator::*, progression::*, scheduler::*,
};

mod config;
mod controller;
mod game;
mod piece_generator;
mod progression;
mod scheduler;
