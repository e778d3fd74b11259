//! Process lifecycle events

use std::fmt;

/// Lifecycle events emitted outside request handling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// Startup begins
    StartupBegin,
    /// Table schema exists and is usable
    SchemaReady,
    /// Schema initialization failed (FATAL)
    StartupFailed,
    /// A configured CORS origin could not be parsed
    CorsOriginIgnored,
    /// Listener bound, ready for requests
    Serving,
    /// Shutdown signal received
    ShutdownStart,
    /// Server stopped
    ShutdownComplete,
}

impl Event {
    /// Returns the string representation of the event
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::StartupBegin => "STARTUP_BEGIN",
            Event::SchemaReady => "SCHEMA_READY",
            Event::StartupFailed => "STARTUP_FAILED",
            Event::CorsOriginIgnored => "CORS_ORIGIN_IGNORED",
            Event::Serving => "SERVING",
            Event::ShutdownStart => "SHUTDOWN_START",
            Event::ShutdownComplete => "SHUTDOWN_COMPLETE",
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_names_are_upper_snake() {
        let events = [
            Event::StartupBegin,
            Event::SchemaReady,
            Event::StartupFailed,
            Event::CorsOriginIgnored,
            Event::Serving,
            Event::ShutdownStart,
            Event::ShutdownComplete,
        ];

        for event in events {
            let s = event.as_str();
            assert!(!s.is_empty());
            assert!(s.chars().all(|c| c.is_uppercase() || c == '_'));
        }
    }
}
