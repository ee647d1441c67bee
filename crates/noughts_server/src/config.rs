//! Server configuration.
//!
//! Sources, lowest precedence first: built-in defaults, a TOML file,
//! environment variables, command-line flags.

use derive_getters::Getters;
use derive_more::{Display, Error};
use noughts_core::{HistoryShape, StrategyMode};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info, instrument};

/// File read when no `--config` is given, if it exists.
pub const DEFAULT_CONFIG_FILE: &str = "noughts.toml";

/// Environment variable selecting the opponent.
pub const ENV_MODE: &str = "NOUGHTS_MODE";
/// Environment variable holding the database path.
pub const ENV_DATABASE_URL: &str = "DATABASE_URL";
/// Environment variable holding the listen port.
pub const ENV_PORT: &str = "PORT";

/// Configuration of the HTTP server.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind to.
    host: String,
    /// Port to listen on.
    port: u16,
    /// SQLite database path.
    database_url: String,
    /// Opponent strategy.
    mode: StrategyMode,
    /// Which boards a turn records.
    history: HistoryShape,
    /// Seed for the random opponent.
    seed: Option<u64>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
            database_url: "noughts.db".to_string(),
            mode: StrategyMode::default(),
            history: HistoryShape::default(),
            seed: None,
        }
    }
}

/// Values given on the command line; `None` keeps the lower layer.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    /// Address to bind to.
    pub host: Option<String>,
    /// Port to listen on.
    pub port: Option<u16>,
    /// SQLite database path.
    pub database_url: Option<String>,
    /// Opponent strategy.
    pub mode: Option<StrategyMode>,
    /// Which boards a turn records.
    pub history: Option<HistoryShape>,
    /// Seed for the random opponent.
    pub seed: Option<u64>,
}

impl ServerConfig {
    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file cannot be read or parsed.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;
        Self::from_toml(&content)
    }

    /// Parses configuration from TOML text. Missing keys take defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the text is not valid configuration.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))
    }

    /// Builds the effective configuration from the file layer, the process
    /// environment and `overrides`.
    ///
    /// With `path` set the file must exist; otherwise [`DEFAULT_CONFIG_FILE`]
    /// is read only if present.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a file or environment value is invalid.
    #[instrument(skip(overrides))]
    pub fn load(path: Option<&Path>, overrides: ConfigOverrides) -> Result<Self, ConfigError> {
        let base = match path {
            Some(path) => Self::from_file(path)?,
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => Self::from_file(DEFAULT_CONFIG_FILE)?,
            None => Self::default(),
        };
        let config = base
            .apply_env_from(|key| std::env::var(key).ok())?
            .apply(overrides);
        info!(
            host = %config.host,
            port = config.port,
            database_url = %config.database_url,
            mode = %config.mode,
            history = %config.history,
            "Configuration loaded"
        );
        Ok(config)
    }

    /// Applies environment values obtained through `lookup`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a value cannot be parsed.
    pub fn apply_env_from<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(mode) = lookup(ENV_MODE) {
            self.mode = mode
                .parse()
                .map_err(|_| ConfigError::new(format!("Invalid {ENV_MODE} '{mode}'")))?;
        }
        if let Some(url) = lookup(ENV_DATABASE_URL) {
            self.database_url = url;
        }
        if let Some(port) = lookup(ENV_PORT) {
            self.port = port
                .parse()
                .map_err(|_| ConfigError::new(format!("Invalid {ENV_PORT} '{port}'")))?;
        }
        Ok(self)
    }

    /// Applies command-line values.
    pub fn apply(mut self, overrides: ConfigOverrides) -> Self {
        if let Some(host) = overrides.host {
            self.host = host;
        }
        if let Some(port) = overrides.port {
            self.port = port;
        }
        if let Some(url) = overrides.database_url {
            self.database_url = url;
        }
        if let Some(mode) = overrides.mode {
            self.mode = mode;
        }
        if let Some(history) = overrides.history {
            self.history = history;
        }
        if overrides.seed.is_some() {
            self.seed = overrides.seed;
        }
        self
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}
