//! Configuration loading and validation.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::calculate::window::MAX_LAST_N;

/// Environment variable prefix for overrides, e.g. `MATCHSTATS__SERVER__PORT`.
pub const ENV_PREFIX: &str = "MATCHSTATS";

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Failed to load config: {0}")]
    LoadError(#[from] ::config::ConfigError),

    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_cors_origin")]
    pub cors_origin: String,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_cors_origin() -> String {
    "*".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origin: default_cors_origin(),
        }
    }
}

/// Prediction defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionConfig {
    /// History size when a request gives neither `last_n` nor a cutoff
    #[serde(default = "default_last_n")]
    pub default_last_n: u32,

    /// Window mode when a request does not name one
    #[serde(default = "default_mode")]
    pub default_mode: String,
}

fn default_last_n() -> u32 {
    2000
}

fn default_mode() -> String {
    "last_n".to_string()
}

impl Default for PredictionConfig {
    fn default() -> Self {
        Self {
            default_last_n: default_last_n(),
            default_mode: default_mode(),
        }
    }
}

/// CSV import settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportConfig {
    #[serde(default = "default_csv_dir")]
    pub csv_dir: PathBuf,
}

fn default_csv_dir() -> PathBuf {
    PathBuf::from("./data/football_csv")
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            csv_dir: default_csv_dir(),
        }
    }
}

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub prediction: PredictionConfig,

    #[serde(default)]
    pub import: ImportConfig,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./data")
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            log_level: default_log_level(),
            server: ServerConfig::default(),
            prediction: PredictionConfig::default(),
            import: ImportConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: AppConfig = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Layer an optional TOML file with `MATCHSTATS__*` environment
    /// overrides. Nested keys use `__`, as in `MATCHSTATS__SERVER__PORT=9000`.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = ::config::Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(
                ::config::File::new(&path.to_string_lossy(), ::config::FileFormat::Toml)
                    .required(true),
            );
        }
        let config: AppConfig = builder
            .add_source(
                ::config::Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::ValidationError(
                "Server port must be greater than 0".to_string(),
            ));
        }

        let n = self.prediction.default_last_n;
        if n == 0 || n > MAX_LAST_N {
            return Err(ConfigError::ValidationError(format!(
                "prediction.default_last_n must be between 1 and {}, got {}",
                MAX_LAST_N, n
            )));
        }

        match self.prediction.default_mode.as_str() {
            "last_n" | "last_days" => {}
            other => {
                return Err(ConfigError::ValidationError(format!(
                    "prediction.default_mode must be one of [last_days, last_n], got '{}'",
                    other
                )))
            }
        }

        Ok(())
    }
}
