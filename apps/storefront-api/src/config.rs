//! # API Configuration
//!
//! Configuration management for the storefront server.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     PORTABLES_PORT=8080  (PORT is honoured too)                        │
//! │     PORTABLES_SUBMISSION_LATENCY_MS=0                                  │
//! │     PORTABLES_SESSION_IDLE_SECS=600                                    │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     $PORTABLES_CONFIG, else ./portables.toml when present              │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     0.0.0.0:5001, CORS on, 500 ms submission latency, built-in catalog │
//! │     sessions dropped after 30 idle minutes                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # portables.toml
//! [server]
//! bind_addr = "0.0.0.0"
//! port = 5001
//! cors_enabled = true
//!
//! [checkout]
//! submission_latency_ms = 500
//!
//! [sessions]
//! idle_timeout_secs = 1800
//!
//! [catalog]
//! path = "catalog.json"   # omit to use the built-in catalog
//! ```

use std::net::{IpAddr, SocketAddr};
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

/// Env var naming an explicit config file.
pub const CONFIG_PATH_ENV: &str = "PORTABLES_CONFIG";

/// Config file picked up from the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "portables.toml";

// =============================================================================
// Errors
// =============================================================================

/// Configuration loading errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    /// An environment override could not be parsed.
    #[error("Invalid value for {key}: '{value}'")]
    InvalidValue { key: String, value: String },

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

// =============================================================================
// Server Settings
// =============================================================================

/// Where and how the HTTP server listens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerSettings {
    /// Bind address (default: 0.0.0.0 for all interfaces). IPv6 such as
    /// `::` is accepted without brackets.
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Allow cross-origin requests from the storefront client.
    #[serde(default = "default_true")]
    pub cors_enabled: bool,
}

fn default_bind_addr() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5001
}

fn default_true() -> bool {
    true
}

impl Default for ServerSettings {
    fn default() -> Self {
        ServerSettings {
            bind_addr: default_bind_addr(),
            port: default_port(),
            cors_enabled: true,
        }
    }
}

impl ServerSettings {
    /// Returns the full bind address.
    pub fn socket_addr(&self) -> ConfigResult<SocketAddr> {
        let ip: IpAddr = self
            .bind_addr
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue {
                key: "server.bind_addr".to_string(),
                value: self.bind_addr.clone(),
            })?;
        Ok(SocketAddr::new(ip, self.port))
    }
}

// =============================================================================
// Checkout Settings
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutSettings {
    /// Simulated order submission latency (milliseconds).
    #[serde(default = "default_submission_latency")]
    pub submission_latency_ms: u64,
}

fn default_submission_latency() -> u64 {
    500
}

impl Default for CheckoutSettings {
    fn default() -> Self {
        CheckoutSettings {
            submission_latency_ms: default_submission_latency(),
        }
    }
}

impl CheckoutSettings {
    pub fn submission_latency(&self) -> Duration {
        Duration::from_millis(self.submission_latency_ms)
    }
}

// =============================================================================
// Session Settings
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSettings {
    /// Sessions untouched for this long are dropped (seconds).
    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_secs: u64,
}

fn default_idle_timeout() -> u64 {
    30 * 60
}

impl Default for SessionSettings {
    fn default() -> Self {
        SessionSettings {
            idle_timeout_secs: default_idle_timeout(),
        }
    }
}

impl SessionSettings {
    pub fn idle_timeout(&self) -> Duration {
        Duration::from_secs(self.idle_timeout_secs)
    }
}

// =============================================================================
// Catalog Settings
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogSettings {
    /// JSON catalog document. `None` serves the built-in catalog.
    #[serde(default)]
    pub path: Option<PathBuf>,
}

// =============================================================================
// Root Configuration
// =============================================================================

/// Complete server configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default)]
    pub server: ServerSettings,

    #[serde(default)]
    pub checkout: CheckoutSettings,

    #[serde(default)]
    pub sessions: SessionSettings,

    #[serde(default)]
    pub catalog: CatalogSettings,
}

impl ApiConfig {
    /// Loads configuration from file and process environment.
    ///
    /// ## Loading Order
    /// 1. Start with defaults
    /// 2. Override with `config_path`, `$PORTABLES_CONFIG` or `./portables.toml`
    /// 3. Override with environment variables
    /// 4. Validate
    pub fn load(config_path: Option<PathBuf>) -> ConfigResult<Self> {
        Self::load_with(config_path, |key| std::env::var(key).ok())
    }

    /// Same as [`ApiConfig::load`] with an injectable environment.
    pub fn load_with<F>(config_path: Option<PathBuf>, env: F) -> ConfigResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        let explicit = config_path.or_else(|| env(CONFIG_PATH_ENV).map(PathBuf::from));
        match explicit {
            // An explicitly named file must exist
            Some(path) => config = Self::from_file(&path)?,
            None => {
                let path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if path.exists() {
                    config = Self::from_file(&path)?;
                } else {
                    debug!(?path, "Config file not found, using defaults");
                }
            }
        }

        config.apply_env_overrides(env)?;
        config.validate()?;

        Ok(config)
    }

    /// Parses a TOML document.
    pub fn from_toml_str(contents: &str) -> ConfigResult<Self> {
        Ok(toml::from_str(contents)?)
    }

    fn from_file(path: &Path) -> ConfigResult<Self> {
        info!(?path, "Loading config from file");
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&contents)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.server.port == 0 {
            return Err(ConfigError::Invalid(
                "server.port must be greater than 0".into(),
            ));
        }

        if self.server.bind_addr.trim().is_empty() {
            return Err(ConfigError::Invalid("server.bind_addr is empty".into()));
        }

        if self.sessions.idle_timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "sessions.idle_timeout_secs must be greater than 0".into(),
            ));
        }

        Ok(())
    }

    /// Applies environment variable overrides.
    fn apply_env_overrides<F>(&mut self, env: F) -> ConfigResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(addr) = env("PORTABLES_BIND_ADDR") {
            debug!(bind_addr = %addr, "Overriding bind address from environment");
            self.server.bind_addr = addr;
        }

        // PORT is what most hosting platforms set; the prefixed name wins
        for key in ["PORT", "PORTABLES_PORT"] {
            if let Some(port) = env(key) {
                self.server.port = parse_env(key, &port)?;
                debug!(port = self.server.port, key, "Overriding port from environment");
            }
        }

        if let Some(cors) = env("PORTABLES_CORS") {
            self.server.cors_enabled = parse_bool("PORTABLES_CORS", &cors)?;
        }

        if let Some(latency) = env("PORTABLES_SUBMISSION_LATENCY_MS") {
            self.checkout.submission_latency_ms =
                parse_env("PORTABLES_SUBMISSION_LATENCY_MS", &latency)?;
        }

        if let Some(idle) = env("PORTABLES_SESSION_IDLE_SECS") {
            self.sessions.idle_timeout_secs = parse_env("PORTABLES_SESSION_IDLE_SECS", &idle)?;
        }

        if let Some(path) = env("PORTABLES_CATALOG_PATH") {
            debug!(path = %path, "Overriding catalog path from environment");
            self.catalog.path = if path.trim().is_empty() {
                None
            } else {
                Some(PathBuf::from(path))
            };
        }

        Ok(())
    }
}

fn parse_env<T: std::str::FromStr>(key: &str, value: &str) -> ConfigResult<T> {
    value.trim().parse().map_err(|_| ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
    })
}

fn parse_bool(key: &str, value: &str) -> ConfigResult<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
        }),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
