//! # HTTP Server
//!
//! Construction of the service: storage is initialized first, then the router
//! is bound to the configuration. Nothing is global; tests build as many
//! independent servers as they like.

use std::sync::Arc;

use axum::http::HeaderValue;
use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

use crate::observability::{Event, LogSink, Logger, StdoutSink};
use crate::storage::{StorageResult, TestStore};

use super::config::ServiceConfig;
use super::health_routes::health_routes;
use super::test_routes::{test_routes, TestsState};

/// HTTP server for the test record service
pub struct HttpServer {
    config: ServiceConfig,
    router: Router,
}

impl HttpServer {
    /// Initialize storage at `config.db_path` and build the server,
    /// logging request events to stdout.
    ///
    /// A schema failure is returned to the caller and must stop startup.
    pub fn bootstrap(config: ServiceConfig) -> StorageResult<Self> {
        Self::bootstrap_with_sink(config, Arc::new(StdoutSink))
    }

    /// As `bootstrap`, with an explicit request log sink
    pub fn bootstrap_with_sink(config: ServiceConfig, sink: Arc<dyn LogSink>) -> StorageResult<Self> {
        let store = TestStore::new(config.db_path.clone());
        store.initialize()?;
        Ok(Self::with_store(config, store, sink))
    }

    /// Build the server around an already initialized store
    pub fn with_store(config: ServiceConfig, store: TestStore, sink: Arc<dyn LogSink>) -> Self {
        let router = Self::build_router(&config, store, sink);
        Self { config, router }
    }

    fn build_router(config: &ServiceConfig, store: TestStore, sink: Arc<dyn LogSink>) -> Router {
        let tests_state = Arc::new(TestsState::new(store, sink.clone()));

        Router::new()
            .merge(health_routes(sink))
            .merge(test_routes(tests_state, config.max_body_bytes))
            .layer(Self::cors_layer(config))
    }

    fn cors_layer(config: &ServiceConfig) -> CorsLayer {
        if config.cors_origins.is_empty() {
            return CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any);
        }

        let origins: Vec<HeaderValue> = config
            .cors_origins
            .iter()
            .filter_map(|origin| match origin.parse::<HeaderValue>() {
                Ok(value) => Some(value),
                Err(_) => {
                    Logger::warn(Event::CorsOriginIgnored, &[("origin", origin.as_str())]);
                    None
                }
            })
            .collect();

        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any)
    }

    /// Get the socket address
    pub fn socket_addr(&self) -> String {
        self.config.socket_addr()
    }

    /// Get the router (for testing)
    pub fn router(self) -> Router {
        self.router
    }

    /// Serve until Ctrl-C
    ///
    /// The host may be an IP literal or a resolvable name.
    pub async fn start(self) -> Result<(), std::io::Error> {
        let addr = self.config.socket_addr();
        let listener = TcpListener::bind(addr.as_str()).await?;
        let bound = listener.local_addr()?.to_string();
        let db_path = self.config.db_path.display().to_string();
        Logger::info(
            Event::Serving,
            &[("addr", bound.as_str()), ("db_path", db_path.as_str())],
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        Logger::info(Event::ShutdownComplete, &[]);
        Ok(())
    }
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        Logger::info(Event::ShutdownStart, &[("signal", "ctrl_c")]);
    } else {
        // No signal handler available; serve until the process is killed
        std::future::pending::<()>().await;
    }
}
