//! Storage error types

use thiserror::Error;

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Storage gateway errors
#[derive(Debug, Error)]
pub enum StorageError {
    /// A record with the same `test_id` already exists
    #[error("Duplicate test_id: {0}")]
    DuplicateKey(String),

    /// Any other SQLite failure
    #[error("{0}")]
    Failure(#[from] rusqlite::Error),

    /// The blocking task running the operation did not complete
    #[error("Storage task failed: {0}")]
    Task(String),
}

impl StorageError {
    /// Classify an insert failure, separating primary-key conflicts from
    /// every other storage failure.
    pub(crate) fn from_insert(err: rusqlite::Error, test_id: &str) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(code, _)
                if code.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_PRIMARYKEY =>
            {
                StorageError::DuplicateKey(test_id.to_string())
            }
            _ => StorageError::Failure(err),
        }
    }
}
