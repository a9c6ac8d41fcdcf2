use std::time::Duration;

use log::{debug, trace};
use serde::Serialize;

use super::{
    config::GameConfig,
    controller::{MoveDirection, PieceController},
    piece_generator::PieceGenerator,
    progression::{LockSummary, Progression},
    scheduler::{GravityScheduler, TickTimer},
};
use crate::{
    CommandError, ConfigError,
    core::{board::Board, piece::Piece, shape::PieceKind},
};

/// Lifecycle state of a game.
///
/// ```text
/// Idle --start--> Running --pause--> Paused --resume--> Running
/// Running --blocked spawn--> Over --start--> Running
/// any --reset--> Idle
/// ```
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    derive_more::Display,
    derive_more::IsVariant,
)]
#[serde(rename_all = "snake_case")]
pub enum GameState {
    #[default]
    #[display("idle")]
    Idle,
    #[display("running")]
    Running,
    #[display("paused")]
    Paused,
    #[display("over")]
    Over,
}

/// Player and lifecycle commands accepted by [`Game::apply`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
pub enum Command {
    #[display("start")]
    Start,
    #[display("pause")]
    Pause,
    #[display("resume")]
    Resume,
    #[display("reset")]
    Reset,
    #[display("move left")]
    MoveLeft,
    #[display("move right")]
    MoveRight,
    #[display("soft drop")]
    SoftDrop,
    #[display("rotate")]
    Rotate,
}

/// Result of one downward step, from gravity or a soft drop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum StepOutcome {
    /// The piece moved down one row.
    Moved,
    /// The piece could not move and was locked into the board.
    Locked(LockSummary),
}

/// A complete game session.
///
/// `Game` owns every piece of mutable state: the board, the falling piece and
/// its successor, the piece generator, score and level, the lifecycle state,
/// and the gravity scheduler. Hosts drive it with commands and gravity ticks;
/// nothing else mutates it.
///
/// Commands other than [`Game::reset`] never change anything when they are
/// rejected, so a host can forward raw input and ignore the errors.
///
/// # Example
///
/// ```
/// use blockfall_engine::{Game, GameConfig, PieceGenerator, PieceKind, StepOutcome};
///
/// let mut game =
///     Game::with_config(GameConfig::default(), PieceGenerator::from_sequence([PieceKind::O]))
///         .unwrap();
/// game.start().unwrap();
///
/// for _ in 0..18 {
///     assert_eq!(game.tick(), Ok(StepOutcome::Moved));
/// }
/// let outcome = game.tick().unwrap();
/// assert!(outcome.is_locked());
/// assert_eq!(game.score(), 10);
/// ```
#[derive(Debug, Clone)]
pub struct Game<S = TickTimer> {
    config: GameConfig,
    board: Board,
    controller: PieceController,
    next_kind: Option<PieceKind>,
    generator: PieceGenerator,
    progression: Progression,
    state: GameState,
    scheduler: S,
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

impl Game {
    /// Creates an idle game with the standard rules and a random generator.
    #[must_use]
    pub fn new() -> Self {
        Self::from_parts(GameConfig::default(), PieceGenerator::new(), TickTimer::new())
    }

    /// Creates an idle game driven by a [`TickTimer`].
    pub fn with_config(config: GameConfig, generator: PieceGenerator) -> Result<Self, ConfigError> {
        Self::with_scheduler(config, generator, TickTimer::new())
    }

    /// Feeds host time into the gravity timer and runs every tick that
    /// became due. Returns the number of ticks run.
    pub fn advance(&mut self, elapsed: Duration) -> usize {
        self.scheduler.advance(elapsed);
        let mut ticks = 0;
        while self.scheduler.take_due_tick() {
            if self.tick().is_err() {
                break;
            }
            ticks += 1;
        }
        ticks
    }
}

impl<S> Game<S>
where
    S: GravityScheduler,
{
    /// Creates an idle game that arms `scheduler` for gravity.
    pub fn with_scheduler(
        config: GameConfig,
        generator: PieceGenerator,
        scheduler: S,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::from_parts(config, generator, scheduler))
    }

    fn from_parts(config: GameConfig, generator: PieceGenerator, scheduler: S) -> Self {
        Self {
            board: Board::new(config.board_width, config.board_height),
            controller: PieceController::new(),
            next_kind: None,
            generator,
            progression: Progression::new(&config),
            state: GameState::Idle,
            scheduler,
            config,
        }
    }

    #[must_use]
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Settled cells only.
    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Settled cells with the falling piece drawn in. Cells of the piece
    /// above the board are not shown.
    #[must_use]
    pub fn display_board(&self) -> Board {
        let mut board = self.board.clone();
        if let Some(piece) = self.controller.falling_piece() {
            board.place(piece.kind(), piece.shape(), piece.position());
        }
        board
    }

    #[must_use]
    pub fn falling_piece(&self) -> Option<&Piece> {
        self.controller.falling_piece()
    }

    /// Kind of the piece that will spawn after the current one locks.
    #[must_use]
    pub fn next_piece(&self) -> Option<PieceKind> {
        self.next_kind
    }

    #[must_use]
    pub fn progression(&self) -> &Progression {
        &self.progression
    }

    #[must_use]
    pub fn score(&self) -> usize {
        self.progression.score()
    }

    #[must_use]
    pub fn cleared_lines(&self) -> usize {
        self.progression.total_cleared_lines()
    }

    #[must_use]
    pub fn level(&self) -> usize {
        self.progression.level()
    }

    #[must_use]
    pub fn gravity_interval(&self) -> Duration {
        self.progression.gravity_interval()
    }

    #[must_use]
    pub fn state(&self) -> GameState {
        self.state
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.state.is_running()
    }

    #[must_use]
    pub fn is_over(&self) -> bool {
        self.state.is_over()
    }

    #[must_use]
    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    /// Starts a new game on an empty board. Valid when idle or over.
    pub fn start(&mut self) -> Result<(), CommandError> {
        self.ensure_startable(Command::Start)?;
        self.board.clear();
        self.begin();
        Ok(())
    }

    /// Starts a new game on a prepared board. Valid when idle or over.
    ///
    /// The board must match the configured dimensions.
    pub fn start_with_board(&mut self, board: Board) -> Result<(), CommandError> {
        self.ensure_startable(Command::Start)?;
        if board.width() != self.config.board_width || board.height() != self.config.board_height
        {
            return Err(CommandError::BoardSizeMismatch {
                expected_width: self.config.board_width,
                expected_height: self.config.board_height,
                actual_width: board.width(),
                actual_height: board.height(),
            });
        }
        self.board = board;
        self.begin();
        Ok(())
    }

    pub fn pause(&mut self) -> Result<(), CommandError> {
        if !self.state.is_running() {
            return Err(self.invalid_transition(Command::Pause));
        }
        self.state = GameState::Paused;
        self.scheduler.disarm();
        debug!("game paused");
        Ok(())
    }

    pub fn resume(&mut self) -> Result<(), CommandError> {
        if !self.state.is_paused() {
            return Err(self.invalid_transition(Command::Resume));
        }
        self.state = GameState::Running;
        self.scheduler.arm(self.progression.gravity_interval());
        debug!("game resumed");
        Ok(())
    }

    /// Abandons the current game from any state and returns to idle.
    pub fn reset(&mut self) {
        self.scheduler.disarm();
        self.board.clear();
        self.controller.clear();
        self.next_kind = None;
        self.progression.reset();
        self.state = GameState::Idle;
        debug!("game reset");
    }

    pub fn move_left(&mut self) -> Result<(), CommandError> {
        self.ensure_running()?;
        self.controller.try_move(MoveDirection::Left, &self.board)
    }

    pub fn move_right(&mut self) -> Result<(), CommandError> {
        self.ensure_running()?;
        self.controller.try_move(MoveDirection::Right, &self.board)
    }

    /// Rotates the falling piece clockwise in place, without wall kicks.
    pub fn rotate(&mut self) -> Result<(), CommandError> {
        self.ensure_running()?;
        self.controller.try_rotate(&self.board)
    }

    /// Moves the falling piece down one row, locking it if it cannot move.
    pub fn soft_drop(&mut self) -> Result<StepOutcome, CommandError> {
        self.step()
    }

    /// Applies one gravity step. Same as [`Self::soft_drop`].
    pub fn tick(&mut self) -> Result<StepOutcome, CommandError> {
        self.step()
    }

    /// Dispatches `command`, returning the lock summary when a soft drop
    /// locked the piece.
    pub fn apply(&mut self, command: Command) -> Result<Option<LockSummary>, CommandError> {
        match command {
            Command::Start => self.start()?,
            Command::Pause => self.pause()?,
            Command::Resume => self.resume()?,
            Command::Reset => self.reset(),
            Command::MoveLeft => self.move_left()?,
            Command::MoveRight => self.move_right()?,
            Command::Rotate => self.rotate()?,
            Command::SoftDrop => {
                return match self.soft_drop()? {
                    StepOutcome::Moved => Ok(None),
                    StepOutcome::Locked(summary) => Ok(Some(summary)),
                };
            }
        }
        Ok(None)
    }

    fn begin(&mut self) {
        self.progression.reset();
        self.controller.clear();
        let first = self.generator.next_kind();
        self.next_kind = Some(self.generator.next_kind());

        if self.controller.spawn(first, &self.board).is_err() {
            self.next_kind = Some(first);
            self.end();
            return;
        }
        self.state = GameState::Running;
        self.scheduler.arm(self.progression.gravity_interval());
        debug!(
            "game started on {}x{} board",
            self.board.width(),
            self.board.height()
        );
    }

    fn step(&mut self) -> Result<StepOutcome, CommandError> {
        self.ensure_running()?;
        match self.controller.try_move(MoveDirection::Down, &self.board) {
            Ok(()) => Ok(StepOutcome::Moved),
            Err(CommandError::PieceCollision(_)) => self.lock().map(StepOutcome::Locked),
            Err(err) => Err(err),
        }
    }

    fn lock(&mut self) -> Result<LockSummary, CommandError> {
        let piece = self.controller.take().ok_or(CommandError::NoFallingPiece)?;
        self.board
            .place(piece.kind(), piece.shape(), piece.position());
        let cleared_lines = self.board.clear_full_lines();

        let previous_level = self.progression.level();
        let mut summary = self.progression.record_lock(cleared_lines);
        trace!(
            "locked {} at ({}, {}), cleared {cleared_lines} lines, +{} points",
            piece.kind(),
            piece.position().x(),
            piece.position().y(),
            summary.points,
        );
        if summary.level != previous_level {
            debug!("level {} reached", summary.level);
        }

        let kind = self
            .next_kind
            .unwrap_or_else(|| self.generator.next_kind());
        if self.controller.spawn(kind, &self.board).is_err() {
            summary.topped_out = true;
            self.next_kind = Some(kind);
            self.end();
            return Ok(summary);
        }
        self.next_kind = Some(self.generator.next_kind());
        if summary.speed_changed {
            self.scheduler.arm(self.progression.gravity_interval());
        }
        Ok(summary)
    }

    fn end(&mut self) {
        self.state = GameState::Over;
        self.scheduler.disarm();
        debug!(
            "game over: score {}, {} lines, level {}",
            self.progression.score(),
            self.progression.total_cleared_lines(),
            self.progression.level()
        );
    }

    fn ensure_running(&self) -> Result<(), CommandError> {
        if self.state.is_running() {
            Ok(())
        } else {
            Err(CommandError::NotRunning { state: self.state })
        }
    }

    fn ensure_startable(&self, command: Command) -> Result<(), CommandError> {
        match self.state {
            GameState::Idle | GameState::Over => Ok(()),
            GameState::Running | GameState::Paused => Err(self.invalid_transition(command)),
        }
    }

    fn invalid_transition(&self, command: Command) -> CommandError {
        CommandError::InvalidTransition {
            command,
            state: self.state,
        }
    }
}
