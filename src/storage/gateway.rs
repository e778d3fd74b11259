//! Test record gateway
//!
//! Every operation opens its own SQLite connection and drops it before
//! returning. Writes run inside a transaction; a failed insert is rolled back
//! when the transaction is dropped without a commit.

use std::path::PathBuf;

use chrono::{SecondsFormat, Utc};
use rusqlite::{params, Connection};

use super::errors::{StorageError, StorageResult};
use super::record::{NewTestRecord, TestRecord};

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS tests (
    test_id TEXT PRIMARY KEY,
    patient_id TEXT NOT NULL,
    clinic_id TEXT NOT NULL,
    test_type TEXT NOT NULL,
    result TEXT NOT NULL,
    created_at TEXT NOT NULL
)
"#;

const COLUMNS: &str = "test_id, patient_id, clinic_id, test_type, result, created_at";

/// Storage gateway for the `tests` table
#[derive(Debug, Clone)]
pub struct TestStore {
    path: PathBuf,
}

impl TestStore {
    /// Create a gateway for the database file at `path`.
    ///
    /// Nothing is opened until the first operation.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn connect(&self) -> StorageResult<Connection> {
        Ok(Connection::open(&self.path)?)
    }

    /// Create the `tests` table if it does not exist.
    ///
    /// Idempotent. Runs in its own transaction.
    pub fn initialize(&self) -> StorageResult<()> {
        let mut conn = self.connect()?;
        let tx = conn.transaction()?;
        tx.execute_batch(SCHEMA)?;
        tx.commit()?;
        Ok(())
    }

    /// Insert a validated record, stamping `created_at` with the current UTC time.
    ///
    /// Returns the stored `test_id`. An existing `test_id` yields
    /// `StorageError::DuplicateKey` and leaves the stored row untouched.
    pub fn insert(&self, record: &NewTestRecord) -> StorageResult<String> {
        let mut conn = self.connect()?;
        let tx = conn.transaction()?;
        let created_at = Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true);

        tx.execute(
            r#"
            INSERT INTO tests (test_id, patient_id, clinic_id, test_type, result, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
            params![
                record.test_id,
                record.patient_id,
                record.clinic_id,
                record.test_type,
                record.result,
                created_at,
            ],
        )
        .map_err(|e| StorageError::from_insert(e, &record.test_id))?;

        tx.commit()?;
        Ok(record.test_id.clone())
    }

    /// All records for `clinic_id`, in whatever order SQLite returns them.
    pub fn query_by_clinic(&self, clinic_id: &str) -> StorageResult<Vec<TestRecord>> {
        let conn = self.connect()?;
        let mut stmt = conn.prepare(&format!("SELECT {COLUMNS} FROM tests WHERE clinic_id = ?1"))?;
        let rows = stmt
            .query_map([clinic_id], TestRecord::from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn setup_store() -> (TempDir, TestStore) {
        let tmp = TempDir::new().unwrap();
        let store = TestStore::new(tmp.path().join("tests.db"));
        store.initialize().unwrap();
        (tmp, store)
    }

    fn record(test_id: &str, clinic_id: &str) -> NewTestRecord {
        NewTestRecord {
            test_id: test_id.to_string(),
            patient_id: "P1".to_string(),
            clinic_id: clinic_id.to_string(),
            test_type: "PCR".to_string(),
            result: "negative".to_string(),
        }
    }

    #[test]
    fn test_initialize_is_idempotent() {
        let (_tmp, store) = setup_store();
        store.initialize().unwrap();
        store.initialize().unwrap();
    }

    #[test]
    fn test_insert_then_query() {
        let (_tmp, store) = setup_store();

        let id = store.insert(&record("T1", "C1")).unwrap();
        assert_eq!(id, "T1");

        let rows = store.query_by_clinic("C1").unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].test_id, "T1");
        assert_eq!(rows[0].patient_id, "P1");
        assert_eq!(rows[0].test_type, "PCR");
        assert_eq!(rows[0].result, "negative");
        assert!(rows[0].created_at.ends_with('Z'));
    }

    #[test]
    fn test_duplicate_insert_leaves_original() {
        let (_tmp, store) = setup_store();
        store.insert(&record("T1", "C1")).unwrap();
        let original = store.query_by_clinic("C1").unwrap();

        let mut second = record("T1", "C1");
        second.result = "positive".to_string();
        let err = store.insert(&second).unwrap_err();
        assert!(matches!(err, StorageError::DuplicateKey(ref id) if id == "T1"));

        let after = store.query_by_clinic("C1").unwrap();
        assert_eq!(original, after);
    }

    #[test]
    fn test_query_filters_by_clinic() {
        let (_tmp, store) = setup_store();
        store.insert(&record("T1", "C1")).unwrap();
        store.insert(&record("T2", "C2")).unwrap();
        store.insert(&record("T3", "C1")).unwrap();

        let mut ids: Vec<_> = store
            .query_by_clinic("C1")
            .unwrap()
            .into_iter()
            .map(|r| r.test_id)
            .collect();
        ids.sort();
        assert_eq!(ids, vec!["T1", "T3"]);
    }

    #[test]
    fn test_query_unknown_clinic_is_empty() {
        let (_tmp, store) = setup_store();
        assert!(store.query_by_clinic("nowhere").unwrap().is_empty());
    }

    #[test]
    fn test_query_without_schema_fails() {
        let tmp = TempDir::new().unwrap();
        let store = TestStore::new(tmp.path().join("missing.db"));
        let err = store.query_by_clinic("C1").unwrap_err();
        assert!(matches!(err, StorageError::Failure(_)));
    }

    #[test]
    fn test_initialize_fails_for_unreachable_path() {
        let tmp = TempDir::new().unwrap();
        let store = TestStore::new(tmp.path().join("no_such_dir").join("tests.db"));
        assert!(store.initialize().is_err());
    }
}
