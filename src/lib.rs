//! Core library surface for the Personal Library Manager TUI.
//!
//! The persistence layer ([`BookStore`]) is usable on its own; the `ui` module
//! is a thin terminal front end that calls one store operation per action.
pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod models;
pub mod stats;
pub mod ui;

pub use config::Config;
pub use db::BookStore;
pub use error::{StoreError, ValidationError};
pub use models::{Book, NewBook};
pub use stats::ProgressHistogram;

/// The interactive application entry point and state container.
pub use ui::{run_app, App};
