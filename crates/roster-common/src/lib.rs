//! # roster-common
//!
//! Shared utilities: configuration and telemetry.

pub mod config;
pub mod telemetry;

// Re-export commonly used types at crate root
pub use config::{
    AppConfig, AppSettings, ConfigError, DatabaseConfig, DiscordConfig, Environment, SyncConfig,
};
pub use telemetry::{try_init_tracing_with_config, TracingConfig, TracingError};
