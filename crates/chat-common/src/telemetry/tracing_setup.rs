//! Tracing and logging setup
//!
//! Configures the `tracing` subscriber with environment-based filtering.

use std::str::FromStr;

use tracing::Level;
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter, Layer, Registry,
};

use crate::config::LoggingConfig;

/// Crates whose events are shown at the configured level; everything else
/// is limited to warnings unless `RUST_LOG` says otherwise
const CACHE_TARGETS: [&str; 3] = ["chat_cache", "chat_service", "chat_common"];

/// Tracing configuration options
#[derive(Debug, Clone)]
pub struct TracingConfig {
    /// Level of the cache crates when `RUST_LOG` is not set
    pub level: Level,
    /// Enable JSON output format
    pub json: bool,
    /// Emit span open/close events, useful to follow one manager request
    pub span_events: bool,
    pub file_line: bool,
    /// Write through the test harness so output is captured per test
    pub test_writer: bool,
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self {
            level: Level::INFO,
            json: false,
            span_events: false,
            file_line: true,
            test_writer: false,
        }
    }
}

impl TracingConfig {
    #[must_use]
    pub fn development() -> Self {
        Self {
            level: Level::DEBUG,
            span_events: true,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn production() -> Self {
        Self {
            json: true,
            file_line: false,
            ..Self::default()
        }
    }

    /// Debug output routed through the libtest capture
    #[must_use]
    pub fn for_tests() -> Self {
        Self {
            level: Level::DEBUG,
            file_line: false,
            test_writer: true,
            ..Self::default()
        }
    }

    /// Derive from the loaded logging configuration
    ///
    /// An unrecognized level falls back to `INFO`.
    pub fn from_logging(logging: &LoggingConfig) -> Self {
        Self {
            level: Level::from_str(&logging.level).unwrap_or(Level::INFO),
            json: logging.json,
            ..Self::default()
        }
    }

    /// Filter used when `RUST_LOG` is absent or invalid
    fn default_directives(&self) -> String {
        let level = self.level.to_string().to_ascii_lowercase();
        CACHE_TARGETS
            .iter()
            .fold("warn".to_string(), |directives, target| {
                format!("{directives},{target}={level}")
            })
    }

    fn fmt_layer(&self) -> Box<dyn Layer<Registry> + Send + Sync> {
        let span_events = if self.span_events {
            FmtSpan::NEW | FmtSpan::CLOSE
        } else {
            FmtSpan::NONE
        };
        let layer = fmt::layer()
            .with_file(self.file_line)
            .with_line_number(self.file_line)
            .with_span_events(span_events);

        match (self.json, self.test_writer) {
            (true, true) => layer.json().with_test_writer().boxed(),
            (true, false) => layer.json().boxed(),
            (false, true) => layer.with_test_writer().boxed(),
            (false, false) => layer.boxed(),
        }
    }
}

/// Install the global subscriber
///
/// `RUST_LOG` takes precedence over the configured level. Fails when a
/// subscriber is already installed, which tests rely on to share one.
pub fn init_tracing(config: &TracingConfig) -> Result<(), TracingError> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.default_directives()));

    tracing_subscriber::registry()
        .with(config.fmt_layer())
        .with(env_filter)
        .try_init()
        .map_err(|_| TracingError::AlreadyInitialized)
}

/// Tracing initialization errors
#[derive(Debug, thiserror::Error)]
pub enum TracingError {
    #[error("Tracing subscriber already initialized")]
    AlreadyInitialized,
}
