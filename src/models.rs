//! Domain models that mirror the SQLite schema and get passed throughout the
//! TUI. The types stay light-weight data holders; the only behavior living here
//! is validation and the search predicate, since both the store and the forms
//! depend on the exact same rules.

use std::fmt;
use std::ops::RangeInclusive;

use crate::error::ValidationError;

/// Publication years accepted by the add form and the store.
pub const YEAR_RANGE: RangeInclusive<i64> = 1800..=2100;
/// Reading progress is a percentage.
pub const PROGRESS_RANGE: RangeInclusive<i64> = 0..=100;
/// Year pre-filled in a fresh add form.
pub const DEFAULT_YEAR: i64 = 2024;

/// A book that has not been persisted yet. The add form produces one of these
/// and [`crate::db::BookStore::add`] turns it into a [`Book`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBook {
    pub title: String,
    pub author: String,
    pub publication_year: i64,
    pub genre: String,
    /// Percent read, `0..=100`.
    pub progress: i64,
}

impl NewBook {
    /// Build a record with every text field trimmed.
    pub fn new(
        title: &str,
        author: &str,
        publication_year: i64,
        genre: &str,
        progress: i64,
    ) -> Self {
        Self {
            title: title.trim().to_string(),
            author: author.trim().to_string(),
            publication_year,
            genre: genre.trim().to_string(),
            progress,
        }
    }

    /// Check the required fields and numeric ranges. Text fields are checked
    /// first, in form order, so the reported field matches what the user sees
    /// first on screen.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.title.trim().is_empty() {
            return Err(ValidationError::MissingField("title"));
        }
        if self.author.trim().is_empty() {
            return Err(ValidationError::MissingField("author"));
        }
        if self.genre.trim().is_empty() {
            return Err(ValidationError::MissingField("genre"));
        }
        if !YEAR_RANGE.contains(&self.publication_year) {
            return Err(ValidationError::YearOutOfRange(self.publication_year));
        }
        if !PROGRESS_RANGE.contains(&self.progress) {
            return Err(ValidationError::ProgressOutOfRange(self.progress));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// A persisted book row.
pub struct Book {
    /// Primary key from the database. Never rendered, but delete flows bubble
    /// it back to the persistence layer so duplicate titles stay unambiguous.
    pub id: i64,
    pub title: String,
    pub author: String,
    pub publication_year: i64,
    pub genre: String,
    pub progress: i64,
}

impl Book {
    /// Attach a row id to a freshly inserted record.
    pub fn from_new(id: i64, book: &NewBook) -> Self {
        Self {
            id,
            title: book.title.clone(),
            author: book.author.clone(),
            publication_year: book.publication_year,
            genre: book.genre.clone(),
            progress: book.progress,
        }
    }

    /// Case-insensitive substring match against title, author, or genre. An
    /// empty query matches everything.
    pub fn matches(&self, query: &str) -> bool {
        let needle = query.to_lowercase();
        self.title.to_lowercase().contains(&needle)
            || self.author.to_lowercase().contains(&needle)
            || self.genre.to_lowercase().contains(&needle)
    }
}

impl fmt::Display for Book {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} by {}", self.title, self.author)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dune() -> NewBook {
        NewBook::new("Dune", "Frank Herbert", 1965, "Sci-Fi", 40)
    }

    #[test]
    fn new_trims_text_fields() {
        let book = NewBook::new("  Dune ", "Frank Herbert\t", 1965, " Sci-Fi", 40);
        assert_eq!(book, dune());
    }

    #[test]
    fn validate_accepts_range_edges() {
        let mut book = dune();
        book.publication_year = 1800;
        book.progress = 0;
        assert!(book.validate().is_ok());
        book.publication_year = 2100;
        book.progress = 100;
        assert!(book.validate().is_ok());
    }

    #[test]
    fn validate_reports_first_missing_field() {
        let book = NewBook::new("", "", 1965, "", 0);
        assert_eq!(book.validate(), Err(ValidationError::MissingField("title")));
        let book = NewBook::new("Dune", "   ", 1965, "", 0);
        assert_eq!(book.validate(), Err(ValidationError::MissingField("author")));
    }

    #[test]
    fn validate_rejects_out_of_range_numbers() {
        let mut book = dune();
        book.publication_year = 1799;
        assert_eq!(book.validate(), Err(ValidationError::YearOutOfRange(1799)));
        let mut book = dune();
        book.progress = 101;
        assert_eq!(book.validate(), Err(ValidationError::ProgressOutOfRange(101)));
    }

    #[test]
    fn matches_any_of_three_fields_ignoring_case() {
        let book = Book::from_new(
            1,
            &NewBook::new("Solaris", "Stanisław Lem", 1961, "Science Fiction", 10),
        );
        assert!(book.matches("sci"));
        assert!(book.matches("LEM"));
        assert!(book.matches("stanisł"));
        assert!(book.matches("olar"));
        assert!(book.matches(""));
        assert!(!book.matches("1961"));
        assert!(!book.matches("fantasy"));
    }
}
