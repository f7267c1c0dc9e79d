//! Configuration file discovery
//!
//! The service merges settings from several places, highest priority first:
//! 1. CLI arguments
//! 2. Environment variables
//! 3. A TOML config file (located by [`find_config_file`])
//! 4. Built-in defaults

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, trace};
use serde::de::DeserializeOwned;

use crate::APP_NAME;

/// Where the config file was found
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigSource {
    /// Path given on the command line or through the env var
    Explicit(PathBuf),
    /// File in the working directory
    CurrentDir(PathBuf),
    /// $XDG_CONFIG_HOME/weather-api/ (or ~/.config/weather-api/)
    XdgConfig(PathBuf),
    /// /etc/weather-api/
    System(PathBuf),
    /// Nothing found, built-in defaults apply
    Defaults,
}

impl ConfigSource {
    pub fn path(&self) -> Option<&Path> {
        match self {
            ConfigSource::Explicit(p)
            | ConfigSource::CurrentDir(p)
            | ConfigSource::XdgConfig(p)
            | ConfigSource::System(p) => Some(p.as_path()),
            ConfigSource::Defaults => None,
        }
    }
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.path() {
            Some(path) => write!(f, "{}", path.display()),
            None => write!(f, "(defaults)"),
        }
    }
}

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Locate the config file.
///
/// Checked in order: the path in `env_var`, `./<filename>`, the XDG config
/// home and finally `/etc/weather-api/<filename>`. The first existing file wins.
pub fn find_config_file(env_var: &str, filename: &str) -> ConfigSource {
    let explicit = env::var(env_var).ok().map(PathBuf::from);

    let candidates = [
        explicit.map(ConfigSource::Explicit),
        Some(ConfigSource::CurrentDir(PathBuf::from(filename))),
        Some(ConfigSource::XdgConfig(xdg_config_path(filename))),
        Some(ConfigSource::System(
            PathBuf::from("/etc").join(APP_NAME).join(filename),
        )),
    ];

    candidates
        .into_iter()
        .flatten()
        .find(|source| {
            let exists = source.path().is_some_and(Path::exists);
            trace!("config candidate {} exists: {}", source, exists);
            exists
        })
        .unwrap_or(ConfigSource::Defaults)
}

fn xdg_config_path(filename: &str) -> PathBuf {
    let base = match (env::var("XDG_CONFIG_HOME"), env::var("HOME")) {
        (Ok(xdg_config), _) => PathBuf::from(xdg_config),
        (Err(_), Ok(home)) => PathBuf::from(home).join(".config"),
        // won't exist, falls through to the next candidate
        (Err(_), Err(_)) => PathBuf::from(".config"),
    };
    base.join(APP_NAME).join(filename)
}

/// Parse the TOML file behind `source`, or return `T::default()` when no file was found.
pub fn load_config<T: DeserializeOwned + Default>(source: &ConfigSource) -> Result<T, ConfigError> {
    let Some(path) = source.path() else {
        return Ok(T::default());
    };

    let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    debug!("read {} bytes of config from {}", content.len(), path.display());

    toml::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
