//! Configuration loading and typed config structures for Podium.
//!
//! The configuration lives in `podium-config.yaml` at the project root.
//! Every field is defaulted, so an empty file (or no file at all, see the
//! server binary) yields a working setup.

use std::path::{Path, PathBuf};

use podium_types::Locale;
use serde::Deserialize;

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

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PodiumConfig {
    /// HTTP listener settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// Display screen settings.
    #[serde(default)]
    pub display: DisplayConfig,

    /// Where the competition document lives.
    #[serde(default)]
    pub document: DocumentConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl PodiumConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// Environment variables override YAML values:
    /// - `PODIUM_DOCUMENT` overrides `document.path`
    /// - `PODIUM_HOST` overrides `server.host`
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Yaml`] if the content is not valid YAML.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse configuration from a YAML string, then apply environment
    /// overrides.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let mut config = Self::parse_without_env(yaml)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Parse configuration from a YAML string, ignoring the environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML.
    pub fn parse_without_env(yaml: &str) -> Result<Self, ConfigError> {
        // serde_yml maps an empty document to unit, not to an empty mapping.
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yml::from_str(yaml)?)
    }

    /// Apply `PODIUM_*` environment variable overrides.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("PODIUM_DOCUMENT") {
            self.document.path = PathBuf::from(val);
        }
        if let Ok(val) = std::env::var("PODIUM_HOST") {
            self.server.host = val;
        }
    }
}

/// HTTP listener configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ServerConfig {
    /// Interface to bind.
    #[serde(default = "default_host")]
    pub host: String,

    /// TCP port to bind.
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

/// Display screen configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DisplayConfig {
    /// Language of apparatus labels and status texts.
    #[serde(default)]
    pub locale: Locale,

    /// How often every stage view is pushed to screens, so countdowns
    /// stay current without operator input.
    #[serde(default = "default_refresh_interval_ms")]
    pub refresh_interval_ms: u64,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            locale: Locale::default(),
            refresh_interval_ms: default_refresh_interval_ms(),
        }
    }
}

/// Competition document location.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DocumentConfig {
    /// Path to the JSON competition document.
    #[serde(default = "default_document_path")]
    pub path: PathBuf,
}

impl Default for DocumentConfig {
    fn default() -> Self {
        Self {
            path: default_document_path(),
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
    "0.0.0.0".to_owned()
}

const fn default_port() -> u16 {
    8080
}

const fn default_refresh_interval_ms() -> u64 {
    15_000
}

fn default_document_path() -> PathBuf {
    PathBuf::from("competition.json")
}

fn default_log_level() -> String {
    "info".to_owned()
}
