//! Liveness and health routes

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, response::IntoResponse, routing::get, Json, Router};
use serde::Serialize;

use crate::observability::{LogSink, RequestLogEntry};

pub const LIVENESS_MESSAGE: &str = "Lab test API is running!";

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// `GET /` (plain text) and `GET /health` (JSON)
pub fn health_routes(sink: Arc<dyn LogSink>) -> Router {
    Router::new()
        .route("/", get(home_handler))
        .route("/health", get(health_handler))
        .with_state(sink)
}

async fn home_handler(State(sink): State<Arc<dyn LogSink>>) -> impl IntoResponse {
    sink.emit(&RequestLogEntry::success("GET /", "Liveness check"));
    (StatusCode::OK, LIVENESS_MESSAGE)
}

async fn health_handler(State(sink): State<Arc<dyn LogSink>>) -> impl IntoResponse {
    sink.emit(&RequestLogEntry::success("GET /health", "Health check"));

    let response = HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    };

    (StatusCode::OK, Json(response))
}
