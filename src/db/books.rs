use std::path::Path;

use log::{debug, info};
use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::error::StoreError;
use crate::models::{Book, NewBook};

use super::connection::{open_database, open_in_memory_database};

const BOOK_COLUMNS: &str = "id, title, author, publication_year, genre, progress";

/// Handle over the `books` table. The connection is owned by the handle and
/// closed when it drops, so whoever constructs the store decides its lifetime.
pub struct BookStore {
    conn: Connection,
}

impl BookStore {
    /// Open the on-disk library at `path`, creating the file and schema when
    /// needed.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        let conn = open_database(path)?;
        info!("opened library at {}", path.display());
        Ok(Self { conn })
    }

    pub fn open_in_memory() -> Result<Self, StoreError> {
        Ok(Self {
            conn: open_in_memory_database()?,
        })
    }

    /// Validate and insert a new book, returning the hydrated row so callers
    /// can update their state without re-querying. Duplicates are allowed.
    pub fn add(&self, book: &NewBook) -> Result<Book, StoreError> {
        book.validate()?;

        self.conn.execute(
            "INSERT INTO books (title, author, publication_year, genre, progress)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                book.title,
                book.author,
                book.publication_year,
                book.genre,
                book.progress
            ],
        )?;

        let id = self.conn.last_insert_rowid();
        info!("added book {id}: {} by {}", book.title, book.author);
        Ok(Book::from_new(id, book))
    }

    /// Every stored book in insertion order. Each [`Book`] carries its row id
    /// alongside the five user-facing fields so callers can target a single
    /// row with [`BookStore::delete`].
    pub fn list_all(&self) -> Result<Vec<Book>, StoreError> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT {BOOK_COLUMNS} FROM books ORDER BY id"))?;

        let books = stmt
            .query_map([], book_from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(books)
    }

    /// Books whose title, author, or genre contains `query`, ignoring case.
    /// Matching happens in Rust rather than through `LIKE` so non-ASCII case
    /// folding works and `%`/`_` in the query are taken literally.
    pub fn search(&self, query: &str) -> Result<Vec<Book>, StoreError> {
        let books: Vec<Book> = self
            .list_all()?
            .into_iter()
            .filter(|book| book.matches(query))
            .collect();
        debug!("search {query:?} matched {} book(s)", books.len());
        Ok(books)
    }

    /// Remove one book whose title equals `title` exactly. When several books
    /// share the title the earliest inserted one goes. A miss returns `None`
    /// and leaves the table untouched.
    pub fn delete_by_title(&self, title: &str) -> Result<Option<Book>, StoreError> {
        let target = self
            .conn
            .query_row(
                &format!(
                    "SELECT {BOOK_COLUMNS} FROM books WHERE title = ?1 ORDER BY id LIMIT 1"
                ),
                params![title],
                book_from_row,
            )
            .optional()?;

        match target {
            Some(book) => {
                self.delete(book.id)?;
                Ok(Some(book))
            }
            None => {
                debug!("delete by title {title:?} matched nothing");
                Ok(None)
            }
        }
    }

    /// Remove a book by row id. Unlike [`BookStore::delete_by_title`] a miss is
    /// an error, because the id always comes from a row the caller saw.
    pub fn delete(&self, id: i64) -> Result<(), StoreError> {
        let deleted = self
            .conn
            .execute("DELETE FROM books WHERE id = ?1", params![id])?;

        if deleted == 0 {
            Err(StoreError::NotFound(format!("Book {id}")))
        } else {
            info!("deleted book {id}");
            Ok(())
        }
    }

    pub fn count(&self) -> Result<usize, StoreError> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM books", [], |row| row.get(0))?;
        Ok(count as usize)
    }
}

fn book_from_row(row: &Row<'_>) -> rusqlite::Result<Book> {
    Ok(Book {
        id: row.get(0)?,
        title: row.get(1)?,
        author: row.get(2)?,
        publication_year: row.get(3)?,
        genre: row.get(4)?,
        progress: row.get(5)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationError;

    fn store_with(books: &[NewBook]) -> BookStore {
        let store = BookStore::open_in_memory().unwrap();
        for book in books {
            store.add(book).unwrap();
        }
        store
    }

    #[test]
    fn add_returns_row_with_fresh_id() {
        let store = store_with(&[]);
        let first = store
            .add(&NewBook::new("Dune", "Frank Herbert", 1965, "Sci-Fi", 40))
            .unwrap();
        let second = store
            .add(&NewBook::new("Dune", "Frank Herbert", 1965, "Sci-Fi", 40))
            .unwrap();
        assert_ne!(first.id, second.id);
        assert_eq!(store.count().unwrap(), 2);
    }

    #[test]
    fn add_rejects_invalid_record_without_writing() {
        let store = store_with(&[]);
        let err = store
            .add(&NewBook::new("Dune", "Frank Herbert", 1965, " ", 40))
            .unwrap_err();
        assert!(matches!(
            err,
            StoreError::Validation(ValidationError::MissingField("genre"))
        ));
        assert_eq!(store.count().unwrap(), 0);
    }

    #[test]
    fn search_treats_wildcards_literally() {
        let store = store_with(&[
            NewBook::new("100% Wolf", "Jayne Lyons", 2009, "Kids", 0),
            NewBook::new("Walden", "Henry David Thoreau", 1854, "Essay", 0),
        ]);
        let hits = store.search("%").unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].title, "100% Wolf");
        assert!(store.search("w_lf").unwrap().is_empty());
    }

    #[test]
    fn delete_missing_id_is_not_found() {
        let store = store_with(&[]);
        assert!(matches!(store.delete(42), Err(StoreError::NotFound(_))));
    }

    #[test]
    fn delete_by_title_removes_earliest_duplicate() {
        let store = store_with(&[
            NewBook::new("Emma", "Jane Austen", 1815, "Classic", 100),
            NewBook::new("Emma", "Alexander McCall Smith", 2014, "Retelling", 20),
        ]);
        let removed = store.delete_by_title("Emma").unwrap().unwrap();
        assert_eq!(removed.author, "Jane Austen");
        let left = store.list_all().unwrap();
        assert_eq!(left.len(), 1);
        assert_eq!(left[0].author, "Alexander McCall Smith");
    }
}
