//! Awaken TUI - ratatui front-end for the consciousness console

pub mod theme;
pub mod tui;

pub use tui::run_tui;
