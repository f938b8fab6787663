//! SQLite key-value store for codementor.
//!
//! Keeps the `session` and `local` areas in one table. The `session`
//! area is emptied every time the database is opened.

mod schema;
mod store;

pub use store::SqliteKvStore;
