//! Test record storage
//!
//! A single SQLite table keyed by `test_id`. The primary key is the only
//! uniqueness guarantee; concurrent writers rely on SQLite's own locking.
//!
//! # Guarantees
//!
//! - One connection per operation, released on every exit path
//! - Inserts commit exactly once or leave no trace
//! - `created_at` is assigned here, never by the caller

mod errors;
mod gateway;
mod record;

pub use errors::{StorageError, StorageResult};
pub use gateway::TestStore;
pub use record::{NewTestRecord, TestRecord, REQUIRED_FIELDS};
