//! labtrack - record and list diagnostic test results over HTTP
//!
//! A single SQLite table of test records behind two JSON endpoints:
//! create (rejecting duplicate `test_id`) and list by clinic.

pub mod cli;
pub mod http_server;
pub mod observability;
pub mod storage;
