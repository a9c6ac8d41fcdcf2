use std::time::Duration;

use crossterm::event::Event;
use ratatui::Frame;

use crate::tui::Tui;

/// Trait for TUI applications run by [`Tui::run`].
pub trait App {
    /// Called once before the event loop starts. Use this to configure
    /// tick rate and render mode.
    fn init(&mut self, tui: &mut Tui);

    fn should_exit(&self) -> bool;

    /// Handles key input, resize and other terminal events.
    fn handle_event(&mut self, tui: &mut Tui, event: &Event);

    fn draw(&self, frame: &mut Frame);

    /// Advances application state by `elapsed`, the wall time since the
    /// previous tick.
    fn update(&mut self, tui: &mut Tui, elapsed: Duration);
}
