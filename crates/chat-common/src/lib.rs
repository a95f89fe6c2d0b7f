//! # chat-common
//!
//! Shared utilities: configuration loading and telemetry.

pub mod config;
pub mod telemetry;

// Re-export commonly used types at crate root
pub use config::{
    AppSettings, ClientConfig, ConfigError, Environment, LoggingConfig, NotificationConfig,
    ReactionSettings,
};
pub use telemetry::{init_tracing, TracingConfig, TracingError};
