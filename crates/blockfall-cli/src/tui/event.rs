use std::time::Duration;

use crossterm::event::Event as CrosstermEvent;

/// Events processed by TUI applications.
#[derive(Debug, Clone, derive_more::IsVariant)]
pub(super) enum TuiEvent {
    /// Tick with the time elapsed since the previous one.
    Tick(Duration),
    Render,
    Crossterm(CrosstermEvent),
}
