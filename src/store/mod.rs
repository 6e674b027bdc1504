//! Concrete [`Repository`](crate::framework::Repository) implementations.

pub mod sqlite;

pub use sqlite::SqliteRepository;
