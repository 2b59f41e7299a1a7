use std::env;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Result};
use directories::BaseDirs;

/// Environment variable that overrides the database location.
pub const DB_ENV_VAR: &str = "LIBRARY_DB";
/// Folder name used beneath the user's home directory for application data.
const DATA_DIR_NAME: &str = ".personal-library";
/// SQLite file name stored inside the application data directory.
const DB_FILE_NAME: &str = "library.sqlite";
/// Log file written beside the database; the TUI owns the terminal.
const LOG_FILE_NAME: &str = "library.log";

/// Where the library lives on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub db_path: PathBuf,
    pub log_path: PathBuf,
}

impl Config {
    /// Resolve `LIBRARY_DB`, falling back to `~/.personal-library/library.sqlite`.
    pub fn from_env() -> Result<Self> {
        match env::var_os(DB_ENV_VAR) {
            Some(path) if !path.is_empty() => Ok(Self::with_db_path(PathBuf::from(path))),
            _ => Ok(Self::with_db_path(default_db_path()?)),
        }
    }

    /// Use an explicit database path; the log file goes next to it.
    pub fn with_db_path(db_path: PathBuf) -> Self {
        let log_path = log_path_for(&db_path);
        Self { db_path, log_path }
    }
}

fn log_path_for(db_path: &Path) -> PathBuf {
    match db_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.join(LOG_FILE_NAME),
        _ => PathBuf::from(LOG_FILE_NAME),
    }
}

/// Resolve the absolute path to the SQLite database inside the user's home.
fn default_db_path() -> Result<PathBuf> {
    let base_dirs = BaseDirs::new().ok_or_else(|| anyhow!("could not locate home directory"))?;
    Ok(base_dirs.home_dir().join(DATA_DIR_NAME).join(DB_FILE_NAME))
}
