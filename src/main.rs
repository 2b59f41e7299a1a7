//! Binary entry point: resolve configuration, open the library, and drive the
//! Ratatui event loop until the user exits.
use std::path::PathBuf;

use anyhow::Context;
use log::info;
use personal_library::logging::init_logging;
use personal_library::{run_app, App, BookStore, Config};

/// An optional first argument overrides `LIBRARY_DB`.
fn main() -> anyhow::Result<()> {
    let config = match std::env::args().nth(1) {
        Some(path) => Config::with_db_path(PathBuf::from(path)),
        None => Config::from_env()?,
    };
    init_logging(&config.log_path)?;

    let store = BookStore::open(&config.db_path)
        .with_context(|| format!("failed to open library at {}", config.db_path.display()))?;
    let books = store.list_all().context("failed to load books")?;
    info!("loaded {} book(s)", books.len());

    let mut app = App::new(store, books);
    run_app(&mut app)
}
