//! Database module
//!
//! Connection and schema management for SQLite.

pub mod connection;

pub use connection::{create_pool, run_migrations};
