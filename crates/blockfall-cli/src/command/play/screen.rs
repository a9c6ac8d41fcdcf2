use std::time::Duration;

use blockfall_engine::{Command, Game, GameState};
use crossterm::event::{Event, KeyCode};
use ratatui::{
    Frame,
    layout::{Constraint, Layout},
    text::Text,
};

use crate::view::widgets::{GameDisplay, style};

#[derive(Debug)]
pub struct PlayScreen {
    game: Game,
    is_exiting: bool,
}

impl PlayScreen {
    pub fn new(game: Game) -> Self {
        Self {
            game,
            is_exiting: false,
        }
    }

    pub fn is_exiting(&self) -> bool {
        self.is_exiting
    }

    pub fn draw(&self, frame: &mut Frame<'_>) {
        let game_display = GameDisplay::new(&self.game);
        let help_text = match self.game.state() {
            GameState::Idle => "Controls: Enter (Start) | Q (Quit)",
            GameState::Running => {
                "Controls: ← → (Move) | ↓ (Soft Drop) | ↑ Space (Rotate) | P (Pause) | R (Reset) | Q (Quit)"
            }
            GameState::Paused => "Controls: P (Resume) | R (Reset) | Q (Quit)",
            GameState::Over => "Controls: Enter (Restart) | R (Reset) | Q (Quit)",
        };
        let help_text = Text::from(help_text).style(style::HELP).centered();

        let board_height = u16::try_from(self.game.config().board_height).unwrap_or(u16::MAX);
        let [main_area, help_area] = Layout::vertical([
            Constraint::Length(board_height.saturating_add(2)),
            Constraint::Length(1),
        ])
        .areas::<2>(frame.area());
        frame.render_widget(game_display, main_area);
        frame.render_widget(help_text, help_area);
    }

    pub fn handle_event(&mut self, event: &Event) {
        let Some(event) = event.as_key_event() else {
            return;
        };
        if event.code == KeyCode::Char('q') {
            self.is_exiting = true;
            return;
        }
        if let Some(command) = command_for_key(event.code, self.game.state()) {
            // rejected commands leave the game untouched
            _ = self.game.apply(command);
        }
    }

    pub fn update(&mut self, elapsed: Duration) {
        self.game.advance(elapsed);
    }
}

fn command_for_key(code: KeyCode, state: GameState) -> Option<Command> {
    let command = match code {
        KeyCode::Left => Command::MoveLeft,
        KeyCode::Right => Command::MoveRight,
        KeyCode::Down => Command::SoftDrop,
        KeyCode::Up | KeyCode::Char(' ') => Command::Rotate,
        KeyCode::Enter => Command::Start,
        KeyCode::Char('p') if state.is_paused() => Command::Resume,
        KeyCode::Char('p') => Command::Pause,
        KeyCode::Char('r') => Command::Reset,
        _ => return None,
    };
    Some(command)
}
