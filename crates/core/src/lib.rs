//! Weather API Core Library
//!
//! Shared pieces used by the weather API service:
//! - Configuration file discovery and loading (XDG-compliant)
//! - Warehouse connection settings

mod config;
mod database;

pub use config::{find_config_file, load_config, ConfigError, ConfigSource};
pub use database::DatabaseSettings;

/// Application name used for config paths
pub const APP_NAME: &str = "weather-api";

/// Default HTTP port
pub const DEFAULT_API_PORT: u16 = 3000;

/// Default warehouse connection pool size
pub const DEFAULT_MAX_CONNECTIONS: u32 = 10;

/// Default time to wait for a pooled connection, in seconds
pub const DEFAULT_ACQUIRE_TIMEOUT_SECS: u64 = 30;
