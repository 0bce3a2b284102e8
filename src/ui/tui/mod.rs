// TUI implementation using Ratatui
// This module contains the main application loop, state management,
// and rendering functions for the terminal user interface.

pub use app::run_app;

mod app;
mod input;
pub mod render;
mod state;
