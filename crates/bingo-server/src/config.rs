//! Configuration loading and typed config structures for the room server.
//!
//! The configuration lives in `bingo-config.yaml` in the working
//! directory (or wherever `BINGO_CONFIG` points). Every field has a
//! default, so a missing file or a partial file is fine.

use std::path::Path;

use serde::Deserialize;
use tracing::warn;

/// Default config file name, relative to the working directory.
pub const DEFAULT_CONFIG_PATH: &str = "bingo-config.yaml";

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level server configuration.
///
/// Mirrors the structure of `bingo-config.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct BingoConfig {
    /// Listener settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// Room limits.
    #[serde(default)]
    pub room: RoomConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl BingoConfig {
    /// Load configuration from `path`, falling back to defaults when the
    /// file does not exist. Environment overrides are applied either way.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if an existing file cannot be read, or
    /// [`ConfigError::Yaml`] if it is not valid YAML.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::from_file(path)
        } else {
            let mut config = Self::default();
            config.apply_env_overrides();
            Ok(config)
        }
    }

    /// Load configuration from a YAML file at the given path.
    ///
    /// Environment variables override YAML values:
    /// - `BINGO_HOST` overrides `server.host`
    /// - `BINGO_PORT` overrides `server.port`
    /// - `BINGO_HISTORY_LIMIT` overrides `room.history_limit`
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Yaml`] if the content is not valid YAML.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let mut config: Self = serde_yml::from_str(&contents)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Parse configuration from a YAML string. No environment overrides.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        Ok(serde_yml::from_str(yaml)?)
    }

    /// Apply overrides from the process environment.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Apply overrides from `lookup`. Unparseable values are skipped with
    /// a warning.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(val) = lookup("BINGO_HOST") {
            self.server.host = val;
        }
        if let Some(val) = lookup("BINGO_PORT") {
            match val.parse() {
                Ok(port) => self.server.port = port,
                Err(e) => warn!(value = val, "Ignoring BINGO_PORT: {e}"),
            }
        }
        if let Some(val) = lookup("BINGO_HISTORY_LIMIT") {
            match val.parse() {
                Ok(limit) => self.room.history_limit = Some(limit),
                Err(e) => warn!(value = val, "Ignoring BINGO_HISTORY_LIMIT: {e}"),
            }
        }
    }
}

/// Listener configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ServerConfig {
    /// The host address to bind to (e.g. `0.0.0.0`).
    #[serde(default = "default_host")]
    pub host: String,

    /// The TCP port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Room limits.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RoomConfig {
    /// Largest `boardSize` accepted from a `join`.
    #[serde(default = "default_max_board_size")]
    pub max_board_size: usize,

    /// Keep at most this many mark events, evicting the oldest.
    /// `None` keeps every event for the life of the process.
    #[serde(default)]
    pub history_limit: Option<usize>,

    /// Frames queued per connection before a slow reader is evicted.
    #[serde(default = "default_outbox_capacity")]
    pub outbox_capacity: usize,
}

impl Default for RoomConfig {
    fn default() -> Self {
        Self {
            max_board_size: default_max_board_size(),
            history_limit: None,
            outbox_capacity: default_outbox_capacity(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error). `RUST_LOG` wins.
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_host() -> String {
    String::from("0.0.0.0")
}

const fn default_port() -> u16 {
    3000
}

const fn default_max_board_size() -> usize {
    10
}

const fn default_outbox_capacity() -> usize {
    bingo_room::DEFAULT_OUTBOX_CAPACITY
}

fn default_log_level() -> String {
    String::from("info")
}
