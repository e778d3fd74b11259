//! # HTTP Server Module
//!
//! JSON-over-HTTP front end for the test record store.
//!
//! # Endpoints
//!
//! - `GET /` - Plain-text liveness message
//! - `GET /health` - Health check
//! - `POST /tests` - Create a test record
//! - `GET /tests?clinic_id=X` - List a clinic's test records

pub mod config;
pub mod errors;
pub mod health_routes;
pub mod server;
pub mod test_routes;
pub mod validation;

pub use config::{ConfigError, ServiceConfig};
pub use errors::{ApiError, ApiResult};
pub use server::HttpServer;
