//! Observability for labtrack
//!
//! Two kinds of structured output, both one JSON line per event:
//!
//! - Request events: exactly one per handled HTTP request, delivered to a
//!   `LogSink` so tests can capture them
//! - Lifecycle events: startup, serving and shutdown, written by `Logger`
//!
//! # Usage
//!
//! ```ignore
//! use labtrack::observability::{Event, LogSink, Logger, RequestLogEntry, StdoutSink};
//!
//! Logger::info(Event::Serving, &[("addr", "127.0.0.1:5000")]);
//!
//! StdoutSink.emit(
//!     &RequestLogEntry::success("GET /tests", "Fetched tests")
//!         .with_request_id(Some("C1"))
//!         .with_extra("count", 2),
//! );
//! ```

mod events;
mod logger;
mod request_log;

pub use events::Event;
pub use logger::{Logger, Severity};
pub use request_log::{LogSink, LogStatus, MemorySink, RequestLogEntry, StdoutSink};
