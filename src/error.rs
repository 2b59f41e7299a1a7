//! Typed errors for the persistence boundary. The UI converts these into
//! `anyhow::Error` and surfaces the innermost message in the footer.

/// A record that cannot be stored as-is.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("publication year {0} must be between 1800 and 2100")]
    YearOutOfRange(i64),

    #[error("progress {0}% must be between 0 and 100")]
    ProgressOutOfRange(i64),
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("{0} not found")]
    NotFound(String),

    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl StoreError {
    /// Whether the failure came from bad input rather than from storage.
    pub fn is_validation(&self) -> bool {
        matches!(self, StoreError::Validation(_))
    }
}
