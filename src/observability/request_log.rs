//! Per-request structured log events
//!
//! Every handled request produces exactly one `RequestLogEntry`, written as a
//! single JSON line with keys in declaration order.

use std::io::{self, Write};
use std::sync::{Arc, Mutex};

use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use serde_json::{Map, Value};

/// Request outcome as reported in the log
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogStatus {
    Success,
    Error,
}

/// One structured request log event
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RequestLogEntry {
    pub timestamp: String,
    pub endpoint: String,
    pub status: LogStatus,
    pub message: String,
    /// The `test_id` or `clinic_id` the request concerned, if known
    pub request_id: Option<String>,
    pub extra: Map<String, Value>,
}

impl RequestLogEntry {
    fn new(endpoint: &str, status: LogStatus, message: impl Into<String>) -> Self {
        Self {
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true),
            endpoint: endpoint.to_string(),
            status,
            message: message.into(),
            request_id: None,
            extra: Map::new(),
        }
    }

    pub fn success(endpoint: &str, message: impl Into<String>) -> Self {
        Self::new(endpoint, LogStatus::Success, message)
    }

    pub fn error(endpoint: &str, message: impl Into<String>) -> Self {
        Self::new(endpoint, LogStatus::Error, message)
    }

    pub fn with_request_id(mut self, request_id: Option<impl Into<String>>) -> Self {
        self.request_id = request_id.map(Into::into);
        self
    }

    pub fn with_extra(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.extra.insert(key.to_string(), value.into());
        self
    }

    /// Render as one JSON line, including the trailing newline
    pub fn to_line(&self) -> String {
        let mut line = serde_json::to_string(self).unwrap_or_else(|e| {
            format!(
                "{{\"endpoint\":{:?},\"status\":\"error\",\"message\":\"log serialization failed: {}\"}}",
                self.endpoint, e
            )
        });
        line.push('\n');
        line
    }
}

/// Destination for request log events
pub trait LogSink: Send + Sync {
    fn emit(&self, entry: &RequestLogEntry);
}

/// Writes each event as a JSON line to stdout
#[derive(Debug, Default, Clone, Copy)]
pub struct StdoutSink;

impl LogSink for StdoutSink {
    fn emit(&self, entry: &RequestLogEntry) {
        let line = entry.to_line();
        let mut out = io::stdout().lock();
        let _ = out.write_all(line.as_bytes());
        let _ = out.flush();
    }
}

/// Keeps events in memory (for testing)
#[derive(Debug, Default, Clone)]
pub struct MemorySink {
    entries: Arc<Mutex<Vec<RequestLogEntry>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// All recorded events, oldest first
    pub fn entries(&self) -> Vec<RequestLogEntry> {
        self.entries.lock().map(|e| e.clone()).unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl LogSink for MemorySink {
    fn emit(&self, entry: &RequestLogEntry) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.push(entry.clone());
        }
    }
}
