//! CLI command implementations
//!
//! Startup sequence for `serve`:
//! 1. Configuration load (flags, then environment, then defaults)
//! 2. Schema initialization; failure is fatal and nothing is served
//! 3. Listener bind and serving until Ctrl-C

use std::path::{Path, PathBuf};

use crate::http_server::config::{ENV_DB_PATH, ENV_HOST, ENV_PORT};
use crate::http_server::{HttpServer, ServiceConfig};
use crate::observability::{Event, Logger};
use crate::storage::{StorageError, TestStore};

use super::args::Command;
use super::errors::{CliError, CliResult};

/// Parse arguments and run the selected command
pub fn run() -> CliResult<()> {
    let cli = super::args::Cli::parse_args();
    run_command(cli.command)
}

/// Run the appropriate command based on CLI args
pub fn run_command(cmd: Command) -> CliResult<()> {
    match cmd {
        Command::Serve {
            host,
            port,
            db_path,
        } => serve(load_config(host, port, db_path)?),
        Command::Init { db_path } => init(&load_config(None, None, db_path)?),
    }
}

/// Build the configuration.
///
/// `HOST`, `PORT` and `DB_PATH` arrive through the flags (clap already fell
/// back to the environment); every other key is read from the environment.
fn load_config(
    host: Option<String>,
    port: Option<u16>,
    db_path: Option<PathBuf>,
) -> CliResult<ServiceConfig> {
    let config = ServiceConfig::from_lookup(|key| match key {
        ENV_HOST => host.clone(),
        ENV_PORT => port.map(|p| p.to_string()),
        ENV_DB_PATH => db_path.as_ref().map(|p| p.to_string_lossy().into_owned()),
        _ => std::env::var(key).ok(),
    })?;
    Ok(config)
}

fn log_startup_failure(err: &StorageError, db_path: &Path) {
    let reason = err.to_string();
    let db_path = db_path.display().to_string();
    Logger::fatal(
        Event::StartupFailed,
        &[("db_path", db_path.as_str()), ("reason", reason.as_str())],
    );
}

/// Create the schema and exit
pub fn init(config: &ServiceConfig) -> CliResult<()> {
    let db_path = config.db_path.display().to_string();
    Logger::info(Event::StartupBegin, &[("db_path", db_path.as_str())]);

    let store = TestStore::new(config.db_path.clone());
    store.initialize().map_err(|e| {
        log_startup_failure(&e, &config.db_path);
        CliError::from(e)
    })?;

    Logger::info(Event::SchemaReady, &[("db_path", db_path.as_str())]);
    Ok(())
}

/// Initialize storage, then serve until shutdown
pub fn serve(config: ServiceConfig) -> CliResult<()> {
    let db_path = config.db_path.clone();
    let db_path_str = db_path.display().to_string();
    let addr = config.socket_addr();
    Logger::info(
        Event::StartupBegin,
        &[("addr", addr.as_str()), ("db_path", db_path_str.as_str())],
    );

    let server = HttpServer::bootstrap(config).map_err(|e| {
        log_startup_failure(&e, &db_path);
        CliError::from(e)
    })?;
    Logger::info(Event::SchemaReady, &[("db_path", db_path_str.as_str())]);

    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| CliError::serve_failed(format!("Failed to create tokio runtime: {}", e)))?;

    rt.block_on(async {
        server
            .start()
            .await
            .map_err(|e| CliError::serve_failed(format!("HTTP server failed: {}", e)))
    })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_flags_shadow_environment() {
        let config = load_config(
            Some("0.0.0.0".to_string()),
            Some(9000),
            Some(PathBuf::from("/data/labs.db")),
        )
        .unwrap();
        assert_eq!(config.socket_addr(), "0.0.0.0:9000");
        assert_eq!(config.db_path, PathBuf::from("/data/labs.db"));
    }

    #[test]
    fn test_absent_flags_use_defaults() {
        let config = load_config(None, None, None).unwrap();
        assert_eq!(config.port, 5000);
        assert_eq!(config.db_path, PathBuf::from("tests.db"));
    }

    #[test]
    fn test_init_creates_schema() {
        let tmp = TempDir::new().unwrap();
        let config = ServiceConfig {
            db_path: tmp.path().join("tests.db"),
            ..ServiceConfig::default()
        };
        init(&config).unwrap();

        let store = TestStore::new(config.db_path.clone());
        assert!(store.query_by_clinic("C1").unwrap().is_empty());
    }

    #[test]
    fn test_init_failure_is_startup_error() {
        let tmp = TempDir::new().unwrap();
        let config = ServiceConfig {
            db_path: tmp.path().join("absent").join("tests.db"),
            ..ServiceConfig::default()
        };
        let err = init(&config).unwrap_err();
        assert_eq!(err.code_str(), "LABTRACK_STARTUP_FAILED");
    }

    #[test]
    fn test_serve_does_not_start_when_schema_fails() {
        let tmp = TempDir::new().unwrap();
        let config = ServiceConfig {
            db_path: tmp.path().join("absent").join("tests.db"),
            ..ServiceConfig::with_port(0)
        };
        let err = serve(config).unwrap_err();
        assert_eq!(err.code_str(), "LABTRACK_STARTUP_FAILED");
    }
}
