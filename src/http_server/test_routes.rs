//! Test Record HTTP Routes
//!
//! - `POST /tests` - create a record, rejecting duplicate `test_id`
//! - `GET /tests?clinic_id=X` - list the records of one clinic
//!
//! Each request emits exactly one request log event, on every path.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, DefaultBodyLimit, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::Serialize;

use crate::observability::{LogSink, RequestLogEntry};
use crate::storage::{NewTestRecord, StorageError, TestRecord, TestStore};

use super::errors::{ApiError, ApiResult};
use super::validation::{clinic_id_param, parse_create_body, InvalidPayload};

const CREATE_ENDPOINT: &str = "POST /tests";
const LIST_ENDPOINT: &str = "GET /tests";

// ==================
// Shared State
// ==================

/// State shared across the test record handlers
pub struct TestsState {
    pub store: TestStore,
    pub sink: Arc<dyn LogSink>,
}

impl TestsState {
    pub fn new(store: TestStore, sink: Arc<dyn LogSink>) -> Self {
        Self { store, sink }
    }

    fn log(&self, entry: RequestLogEntry) {
        self.sink.emit(&entry);
    }
}

// ==================
// Response Types
// ==================

#[derive(Debug, Serialize)]
pub struct CreatedResponse {
    pub status: &'static str,
    pub test_id: String,
}

// ==================
// Routes
// ==================

/// Create test record routes
///
/// Bodies above `max_body_bytes` are answered by the handler as invalid
/// bodies, so they still get a JSON error and a log event.
pub fn test_routes(state: Arc<TestsState>, max_body_bytes: usize) -> Router {
    Router::new()
        .route("/tests", get(list_tests_handler).post(create_test_handler))
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .with_state(state)
}

/// Log entry describing a failed request
fn failure_entry(endpoint: &str, err: &ApiError, request_id: Option<&str>) -> RequestLogEntry {
    let entry = match (err, err.reason()) {
        (_, Some(reason)) => RequestLogEntry::error(endpoint, "Database operation failed")
            .with_extra("reason", reason),
        (ApiError::DuplicateKey, None) => RequestLogEntry::error(endpoint, "Duplicate test_id"),
        (err, None) => RequestLogEntry::error(endpoint, err.to_string()),
    };
    entry.with_request_id(request_id)
}

impl TestsState {
    /// Insert and log the outcome. Runs to completion on the blocking pool
    /// even if the client has gone away.
    fn create_logged(&self, record: &NewTestRecord) -> ApiResult<String> {
        match self.store.insert(record) {
            Ok(stored) => {
                self.log(
                    RequestLogEntry::success(CREATE_ENDPOINT, "Test created")
                        .with_request_id(Some(stored.as_str())),
                );
                Ok(stored)
            }
            Err(e) => {
                let err = ApiError::from(e);
                self.log(failure_entry(CREATE_ENDPOINT, &err, Some(&record.test_id)));
                Err(err)
            }
        }
    }

    /// Query and log the outcome, with the same completion guarantee.
    fn list_logged(&self, clinic_id: &str) -> ApiResult<Vec<TestRecord>> {
        match self.store.query_by_clinic(clinic_id) {
            Ok(records) => {
                self.log(
                    RequestLogEntry::success(LIST_ENDPOINT, "Fetched tests")
                        .with_request_id(Some(clinic_id))
                        .with_extra("count", records.len()),
                );
                Ok(records)
            }
            Err(e) => {
                let err = ApiError::from(e);
                self.log(failure_entry(LIST_ENDPOINT, &err, Some(clinic_id)));
                Err(err)
            }
        }
    }
}

/// Run storage work plus its log event on the blocking pool.
///
/// The task is detached from the request future, so a dropped connection
/// cannot separate a commit from its log line.
async fn run_logged<T, F>(
    state: &Arc<TestsState>,
    endpoint: &str,
    request_id: &str,
    work: F,
) -> ApiResult<T>
where
    T: Send + 'static,
    F: FnOnce(&TestsState) -> ApiResult<T> + Send + 'static,
{
    let task_state = state.clone();
    match tokio::task::spawn_blocking(move || work(task_state.as_ref())).await {
        Ok(result) => result,
        Err(e) => {
            let err = ApiError::from(StorageError::Task(e.to_string()));
            state.log(failure_entry(endpoint, &err, Some(request_id)));
            Err(err)
        }
    }
}

// ==================
// Handlers
// ==================

async fn create_test_handler(
    State(state): State<Arc<TestsState>>,
    body: Result<Bytes, BytesRejection>,
) -> ApiResult<(StatusCode, Json<CreatedResponse>)> {
    let parsed = match body {
        Ok(body) => parse_create_body(&body),
        Err(_) => Err(InvalidPayload::invalid_body()),
    };
    let record = parsed.map_err(|invalid| {
        let err = ApiError::Validation(invalid.message);
        state.log(failure_entry(CREATE_ENDPOINT, &err, invalid.test_id.as_deref()));
        err
    })?;

    let test_id = record.test_id.clone();
    let stored = run_logged(&state, CREATE_ENDPOINT, &test_id, move |s| {
        s.create_logged(&record)
    })
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(CreatedResponse {
            status: "success",
            test_id: stored,
        }),
    ))
}

async fn list_tests_handler(
    State(state): State<Arc<TestsState>>,
    query: Option<Query<Vec<(String, String)>>>,
) -> ApiResult<Json<Vec<TestRecord>>> {
    let query = query.map(|Query(q)| q).unwrap_or_default();
    let clinic_id = clinic_id_param(&query).map_err(|message| {
        let err = ApiError::Validation(message);
        state.log(failure_entry(LIST_ENDPOINT, &err, None));
        err
    })?;

    let task_clinic = clinic_id.clone();
    let records = run_logged(&state, LIST_ENDPOINT, &clinic_id, move |s| {
        s.list_logged(&task_clinic)
    })
    .await?;
    Ok(Json(records))
}
