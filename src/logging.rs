use std::fs::{self, OpenOptions};
use std::path::Path;

use anyhow::{Context, Result};
use env_logger::{Env, Target};

/// Route `log` output to `path`. Level comes from `RUST_LOG`, defaulting to
/// `info`. Writing to stderr would corrupt the alternate screen.
pub fn init_logging(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).context("failed to create log directory")?;
        }
    }

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("failed to open log file {}", path.display()))?;

    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .target(Target::Pipe(Box::new(file)))
        .try_init()
        .context("logger already initialized")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_logging_creates_log_file_and_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logs").join("library.log");

        init_logging(&path).unwrap();
        log::info!("logger ready");

        assert!(path.parent().unwrap().is_dir());
        assert!(path.is_file());
    }
}
