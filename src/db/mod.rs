//! Persistence module split across logical submodules.

mod books;
mod connection;

pub use books::BookStore;
pub use connection::{ensure_schema, open_database, open_in_memory_database};
