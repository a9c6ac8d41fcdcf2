//! Minimal terminal application runtime.
//!
//! [`Tui`] owns the event loop and drives an [`App`]: fixed-rate ticks that
//! carry the real time elapsed since the previous tick, throttled redraws, and
//! terminal input.

mod app;
mod event;
mod event_loop;
mod runner;

pub use self::{app::App, event_loop::RenderMode, runner::Tui};
