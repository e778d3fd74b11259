//! Test record types
//!
//! A `NewTestRecord` is what the request handler hands to the gateway once
//! every field has been validated and trimmed. `created_at` exists only on
//! the stored `TestRecord`; callers never supply it.

use serde::{Deserialize, Serialize};

/// Required string fields, in validation order
pub const REQUIRED_FIELDS: [&str; 5] = ["test_id", "patient_id", "clinic_id", "test_type", "result"];

/// A validated record awaiting insertion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTestRecord {
    pub test_id: String,
    pub patient_id: String,
    pub clinic_id: String,
    pub test_type: String,
    pub result: String,
}

/// A stored record snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestRecord {
    pub test_id: String,
    pub patient_id: String,
    pub clinic_id: String,
    pub test_type: String,
    pub result: String,
    /// RFC 3339 UTC timestamp assigned at insert time
    pub created_at: String,
}

impl TestRecord {
    /// Map a row selected in `COLUMNS` order
    pub(crate) fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            test_id: row.get(0)?,
            patient_id: row.get(1)?,
            clinic_id: row.get(2)?,
            test_type: row.get(3)?,
            result: row.get(4)?,
            created_at: row.get(5)?,
        })
    }
}
