use std::fs;
use std::path::Path;

use rusqlite::Connection;

use crate::error::StoreError;

/// Open (creating if necessary) the SQLite file at `path` and run the lazy
/// migration. The parent directory is created first so a fresh home directory
/// works without manual setup.
pub fn open_database(path: &Path) -> Result<Connection, StoreError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let conn = Connection::open(path)?;
    ensure_schema(&conn)?;
    Ok(conn)
}

/// In-memory database with the same schema, used by tests and throwaway runs.
pub fn open_in_memory_database() -> Result<Connection, StoreError> {
    let conn = Connection::open_in_memory()?;
    ensure_schema(&conn)?;
    Ok(conn)
}

/// Create the `books` table if it is missing. The CHECK constraints mirror
/// `NewBook::validate` so rows written by other tools cannot break the ranges
/// the UI relies on.
pub fn ensure_schema(conn: &Connection) -> Result<(), StoreError> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS books (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            title TEXT NOT NULL,
            author TEXT NOT NULL,
            publication_year INTEGER NOT NULL
                CHECK (publication_year BETWEEN 1800 AND 2100),
            genre TEXT NOT NULL,
            progress INTEGER NOT NULL DEFAULT 0
                CHECK (progress BETWEEN 0 AND 100)
        )",
        [],
    )?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS books_title ON books (title)",
        [],
    )?;

    Ok(())
}
