//! Configuration management for the rsfga client.
//!
//! Sources, later ones overriding earlier ones:
//! 1. Default values
//! 2. Configuration file (YAML)
//! 3. Environment variables prefixed with `RSFGA_CLIENT_`
//!
//! Nested keys use `__` as separator, e.g.
//! `RSFGA_CLIENT_CONNECTION__STORE_ID=01H...` sets `connection.store_id`.
//!
//! ```yaml
//! connection:
//!   api_url: "http://localhost:8080"
//!   store_id: "01HVMMBCMGZNT3SED4Z17ECXCA"
//!   request_timeout_secs: 10
//! write:
//!   max_tuples_per_call: 100
//!   on_duplicate_writes: ignore
//!   on_missing_deletes: error
//! retry:
//!   max_retries: 3
//! logging:
//!   level: info
//!   format: pretty
//! ```

use std::path::Path;
use std::time::Duration;

use config::{Config, ConfigError, Environment, File, FileFormat};
use rsfga_client_domain::{Batcher, ConflictPolicy, OnDuplicateWrite, OnMissingDelete};
use rsfga_client_transport::RetryPolicy;
use serde::{Deserialize, Serialize};

const ENV_PREFIX: &str = "RSFGA_CLIENT";

/// Client configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct ClientConfig {
    #[serde(default)]
    pub connection: ConnectionSettings,

    #[serde(default)]
    pub write: WriteSettings,

    #[serde(default)]
    pub retry: RetrySettings,

    #[serde(default)]
    pub logging: LoggingSettings,
}

/// Where and how to reach the service.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct ConnectionSettings {
    /// Base URL of the API
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Store every write targets (required)
    #[serde(default)]
    pub store_id: String,

    /// Authorization model pinned on every write
    #[serde(default)]
    pub authorization_model_id: Option<String>,

    /// Per-request timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

impl Default for ConnectionSettings {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            store_id: String::new(),
            authorization_model_id: None,
            request_timeout_secs: default_request_timeout(),
        }
    }
}

fn default_api_url() -> String {
    "http://localhost:8080".to_string()
}

fn default_request_timeout() -> u64 {
    10
}

/// Write transaction settings.
///
/// `max_tuples_per_call` must not exceed the service's per-request limit
/// (100 on OpenFGA).
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct WriteSettings {
    #[serde(default = "default_max_tuples_per_call")]
    pub max_tuples_per_call: usize,

    /// Default duplicate-write behavior when a call passes no policy
    #[serde(default)]
    pub on_duplicate_writes: OnDuplicateWrite,

    /// Default missing-delete behavior when a call passes no policy
    #[serde(default)]
    pub on_missing_deletes: OnMissingDelete,
}

impl Default for WriteSettings {
    fn default() -> Self {
        Self {
            max_tuples_per_call: default_max_tuples_per_call(),
            on_duplicate_writes: OnDuplicateWrite::default(),
            on_missing_deletes: OnMissingDelete::default(),
        }
    }
}

fn default_max_tuples_per_call() -> usize {
    Batcher::DEFAULT_MAX_PER_CHUNK
}

/// Retry settings for transient failures.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct RetrySettings {
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    #[serde(default = "default_min_wait_ms")]
    pub min_wait_ms: u64,

    #[serde(default = "default_max_wait_ms")]
    pub max_wait_ms: u64,
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            min_wait_ms: default_min_wait_ms(),
            max_wait_ms: default_max_wait_ms(),
        }
    }
}

fn default_max_retries() -> u32 {
    3
}

fn default_min_wait_ms() -> u64 {
    100
}

fn default_max_wait_ms() -> u64 {
    5000
}

/// Logging settings.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct LoggingSettings {
    /// Log level: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default)]
    pub format: LogFormat,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}

/// Shape of each log line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Multi-line human-readable text
    #[default]
    Pretty,
    /// One JSON object per line
    Json,
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigLoadError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] ConfigError),

    #[error("configuration file not found: {path}")]
    FileNotFound { path: String },

    #[error("invalid configuration: {message}")]
    Invalid { message: String },
}

impl ClientConfig {
    /// Default configuration targeting `store_id`.
    pub fn for_store(store_id: impl Into<String>) -> Self {
        let mut config = Self::default();
        config.connection.store_id = store_id.into();
        config
    }

    /// Load configuration from a YAML file with environment variable overrides.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigLoadError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ConfigLoadError::FileNotFound {
                path: path.display().to_string(),
            });
        }

        let config = Config::builder()
            .add_source(Config::try_from(&ClientConfig::default())?)
            .add_source(File::from(path).format(FileFormat::Yaml))
            .add_source(environment())
            .build()?;

        let client_config: ClientConfig = config.try_deserialize()?;
        client_config.validate()?;

        Ok(client_config)
    }

    /// Load configuration from defaults and environment variables only.
    pub fn from_env() -> Result<Self, ConfigLoadError> {
        let config = Config::builder()
            .add_source(Config::try_from(&ClientConfig::default())?)
            .add_source(environment())
            .build()?;

        let client_config: ClientConfig = config.try_deserialize()?;
        client_config.validate()?;

        Ok(client_config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigLoadError> {
        if self.connection.store_id.trim().is_empty() {
            return Err(ConfigLoadError::Invalid {
                message: "connection.store_id is required".to_string(),
            });
        }

        let api_url = self.connection.api_url.trim();
        if !(api_url.starts_with("http://") || api_url.starts_with("https://")) {
            return Err(ConfigLoadError::Invalid {
                message: format!(
                    "connection.api_url must start with http:// or https://, got: {}",
                    self.connection.api_url
                ),
            });
        }

        if self.connection.request_timeout_secs == 0 {
            return Err(ConfigLoadError::Invalid {
                message: "connection.request_timeout_secs must be greater than 0".to_string(),
            });
        }

        if self.write.max_tuples_per_call == 0 {
            return Err(ConfigLoadError::Invalid {
                message: "write.max_tuples_per_call must be greater than 0".to_string(),
            });
        }

        if self.retry.min_wait_ms > self.retry.max_wait_ms {
            return Err(ConfigLoadError::Invalid {
                message: format!(
                    "retry.min_wait_ms ({}) must not exceed retry.max_wait_ms ({})",
                    self.retry.min_wait_ms, self.retry.max_wait_ms
                ),
            });
        }

        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.to_lowercase().as_str()) {
            return Err(ConfigLoadError::Invalid {
                message: format!(
                    "logging.level must be one of: {:?}, got: {}",
                    valid_levels, self.logging.level
                ),
            });
        }

        Ok(())
    }

    /// Policy applied by calls that do not pass their own.
    pub fn default_policy(&self) -> ConflictPolicy {
        ConflictPolicy {
            on_duplicate_write: self.write.on_duplicate_writes,
            on_missing_delete: self.write.on_missing_deletes,
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.connection.request_timeout_secs)
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_retries: self.retry.max_retries,
            min_wait: Duration::from_millis(self.retry.min_wait_ms),
            max_wait: Duration::from_millis(self.retry.max_wait_ms),
        }
    }
}

fn environment() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("_")
        .separator("__")
}
