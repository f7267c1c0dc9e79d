use anyhow::anyhow;
use clap::Parser;
use fern::{
    colors::{Color, ColoredLevelConfig},
    Dispatch,
};
use log::LevelFilter;
use std::env;
use time::{
    format_description::well_known::Iso8601, macros::format_description, macros::offset,
    OffsetDateTime, UtcOffset,
};
use weather_api_core::{
    find_config_file, load_config, ConfigSource, DatabaseSettings, DEFAULT_API_PORT,
};

use crate::SeriesOptions;

/// Offset CSV load times are shown in when nothing is configured (Vietnam time).
pub const DEFAULT_CSV_OFFSET: UtcOffset = offset!(+7);

#[derive(Parser, Clone, Debug, serde::Deserialize, Default, PartialEq, Eq)]
#[command(
    author,
    version,
    about = "Weather API - read-only REST service over the weather data warehouse"
)]
pub struct Cli {
    /// Path to config file (TOML format)
    /// Searched in order: this flag, $WEATHER_API_CONFIG, ./weather-api.toml,
    /// $XDG_CONFIG_HOME/weather-api/weather-api.toml, /etc/weather-api/weather-api.toml
    #[arg(short, long)]
    #[serde(skip)]
    pub config: Option<String>,

    /// Log level: trace, debug, info, warn, error
    #[arg(short, long, env = "WEATHER_API_LEVEL")]
    pub level: Option<String>,

    /// Host to listen on (use 0.0.0.0 for all interfaces)
    #[arg(long, env = "WEATHER_API_HOST")]
    pub host: Option<String>,

    /// Port to listen on
    #[arg(short, long, env = "PORT")]
    pub port: Option<u16>,

    /// Directory of static files served under `/`
    #[arg(short, long, env = "WEATHER_API_STATIC_DIR")]
    #[serde(alias = "public_dir")]
    pub static_dir: Option<String>,

    /// Warehouse host
    #[arg(long, env = "DB_HOST")]
    pub db_host: Option<String>,

    #[arg(long, env = "DB_PORT")]
    pub db_port: Option<u16>,

    #[arg(long, env = "DB_USER")]
    pub db_user: Option<String>,

    #[arg(long, env = "DB_PASSWORD", hide_env_values = true)]
    pub db_password: Option<String>,

    /// Warehouse schema name
    #[arg(long, env = "DB_NAME")]
    pub db_name: Option<String>,

    /// Maximum pooled warehouse connections
    #[arg(long, env = "WEATHER_API_DB_MAX_CONNECTIONS")]
    pub db_max_connections: Option<u32>,

    /// Seconds to wait for a free pooled connection
    #[arg(long, env = "WEATHER_API_DB_ACQUIRE_TIMEOUT")]
    pub db_acquire_timeout: Option<u64>,

    /// Cap on rows returned by /api/temperature and /api/export/csv
    #[arg(long, env = "WEATHER_API_SERIES_LIMIT")]
    pub series_limit: Option<u32>,

    /// Include day of week, month and year in /api/temperature rows
    #[arg(long, env = "WEATHER_API_EXTENDED_SERIES")]
    pub extended_series: Option<bool>,

    /// UTC offset CSV load times are rendered in, e.g. +07:00
    #[arg(long, env = "WEATHER_API_CSV_UTC_OFFSET")]
    pub csv_utc_offset: Option<String>,
}

impl Cli {
    /// Command line and environment values win, the config file fills the gaps.
    pub fn merge(self, file_config: Cli) -> Cli {
        Cli {
            config: self.config,
            level: self.level.or(file_config.level),
            host: self.host.or(file_config.host),
            port: self.port.or(file_config.port),
            static_dir: self.static_dir.or(file_config.static_dir),
            db_host: self.db_host.or(file_config.db_host),
            db_port: self.db_port.or(file_config.db_port),
            db_user: self.db_user.or(file_config.db_user),
            db_password: self.db_password.or(file_config.db_password),
            db_name: self.db_name.or(file_config.db_name),
            db_max_connections: self.db_max_connections.or(file_config.db_max_connections),
            db_acquire_timeout: self.db_acquire_timeout.or(file_config.db_acquire_timeout),
            series_limit: self.series_limit.or(file_config.series_limit),
            extended_series: self.extended_series.or(file_config.extended_series),
            csv_utc_offset: self.csv_utc_offset.or(file_config.csv_utc_offset),
        }
    }

    pub fn host(&self) -> String {
        self.host
            .clone()
            .unwrap_or_else(|| "127.0.0.1".to_string())
    }

    pub fn port(&self) -> u16 {
        self.port.unwrap_or(DEFAULT_API_PORT)
    }

    pub fn static_dir(&self) -> String {
        self.static_dir
            .clone()
            .unwrap_or_else(|| "./public".to_string())
    }

    pub fn database_settings(&self) -> DatabaseSettings {
        let defaults = DatabaseSettings::default();
        DatabaseSettings {
            host: self.db_host.clone().unwrap_or(defaults.host),
            port: self.db_port.unwrap_or(defaults.port),
            user: self.db_user.clone().unwrap_or(defaults.user),
            password: self.db_password.clone().unwrap_or(defaults.password),
            name: self.db_name.clone().unwrap_or(defaults.name),
            max_connections: self.db_max_connections.unwrap_or(defaults.max_connections),
            acquire_timeout_secs: self
                .db_acquire_timeout
                .unwrap_or(defaults.acquire_timeout_secs),
        }
    }

    pub fn series_options(&self) -> SeriesOptions {
        SeriesOptions {
            limit: self.series_limit,
            extended: self.extended_series.unwrap_or(false),
        }
    }

    pub fn csv_offset(&self) -> anyhow::Result<UtcOffset> {
        match self.csv_utc_offset.as_deref() {
            None => Ok(DEFAULT_CSV_OFFSET),
            Some(raw) => UtcOffset::parse(
                raw,
                format_description!("[offset_hour sign:mandatory]:[offset_minute]"),
            )
            .map_err(|e| anyhow!("invalid csv_utc_offset '{}': {}", raw, e)),
        }
    }
}

/// Load configuration from CLI args, config file, and environment.
///
/// Runs before the logger exists, so the caller logs the returned source.
pub fn get_config_info() -> (Cli, ConfigSource) {
    resolve_config(Cli::parse())
}

pub fn resolve_config(cli_args: Cli) -> (Cli, ConfigSource) {
    let source = if let Some(ref path) = cli_args.config {
        ConfigSource::Explicit(path.into())
    } else {
        find_config_file("WEATHER_API_CONFIG", "weather-api.toml")
    };

    let file_config: Cli = match load_config(&source) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("ignoring config file: {}", e);
            Cli::default()
        }
    };

    (cli_args.merge(file_config), source)
}

pub fn get_log_level(cli: &Cli) -> LevelFilter {
    let level_str = cli
        .level
        .clone()
        .or_else(|| env::var("RUST_LOG").ok())
        .unwrap_or_else(|| "info".to_string());

    match level_str.to_lowercase().as_str() {
        "trace" => LevelFilter::Trace,
        "debug" => LevelFilter::Debug,
        "info" => LevelFilter::Info,
        "warn" => LevelFilter::Warn,
        "error" => LevelFilter::Error,
        _ => LevelFilter::Info,
    }
}

pub fn setup_logger() -> Dispatch {
    let colors = ColoredLevelConfig::new()
        .trace(Color::White)
        .debug(Color::Cyan)
        .info(Color::Blue)
        .warn(Color::Yellow)
        .error(Color::Magenta);

    fern::Dispatch::new()
        .format(move |out, message, record| {
            out.finish(format_args!(
                "[{} {}] {}: {}",
                OffsetDateTime::now_utc()
                    .format(&Iso8601::DEFAULT)
                    .unwrap_or_default(),
                colors.color(record.level()),
                record.target(),
                message
            ));
        })
        .chain(std::io::stdout())
}
