//! Shared test harness for integration tests.

#![allow(dead_code)]

use personal_library::{BookStore, NewBook};

/// Route `log` output through the test harness so `--nocapture` shows it.
pub fn init_logger() {
    let _ = env_logger::builder()
        .filter_level(log::LevelFilter::Debug)
        .is_test(true)
        .try_init();
}

pub fn dune() -> NewBook {
    NewBook::new("Dune", "Frank Herbert", 1965, "Sci-Fi", 40)
}

/// A small mixed collection used across tests.
pub fn shelf() -> Vec<NewBook> {
    vec![
        dune(),
        NewBook::new(
            "The Left Hand of Darkness",
            "Ursula K. Le Guin",
            1969,
            "Science Fiction",
            100,
        ),
        NewBook::new("Emma", "Jane Austen", 1815, "Classic", 75),
        NewBook::new("Piranesi", "Susanna Clarke", 2020, "Fantasy", 0),
    ]
}

/// In-memory store pre-filled with `books`, in order.
pub fn store_with(books: &[NewBook]) -> BookStore {
    init_logger();
    let store = BookStore::open_in_memory().expect("open in-memory store");
    for book in books {
        store.add(book).expect("seed book");
    }
    store
}

pub fn titles(store: &BookStore) -> Vec<String> {
    store
        .list_all()
        .expect("list books")
        .into_iter()
        .map(|book| book.title)
        .collect()
}
