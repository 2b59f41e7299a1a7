//! Ratatui presentation layer: one library screen with modal add, search, and
//! delete flows layered on top.

mod app;
mod forms;
mod helpers;
mod screens;
mod terminal;

pub use app::App;
pub use terminal::run_app;
