//! Configuration management for mentionkit
//!
//! Settings are read from a TOML file or string and fall back to defaults
//! for every missing field. Two sections exist:
//! - `[suggestions]`: coordinator policies and the rendering edge hint
//! - `[logging]`: level and timestamp settings for [`crate::logging`]
//!
//! The `display`/`source` behaviors are code, not configuration, and are
//! supplied through [`crate::suggest::MentionOptions`].

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{ConfigError, Result};

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Suggestion coordinator configuration
    #[serde(default)]
    pub suggestions: SuggestionConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Suggestion coordinator configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuggestionConfig {
    /// Which side of the anchor the list prefers to render on
    #[serde(default = "default_edge")]
    pub edge: Edge,

    /// What happens to the shown list when the current fetch fails
    #[serde(default = "default_on_fetch_error")]
    pub on_fetch_error: FetchErrorPolicy,

    /// Whether dismissing the list also invalidates the in-flight fetch
    #[serde(default = "default_dismiss_cancels_fetch")]
    pub dismiss_cancels_fetch: bool,

    /// Give up on a fetch after this many milliseconds (unset: wait forever)
    #[serde(default)]
    pub fetch_timeout_ms: Option<u64>,
}

/// Preferred side for the suggestion list. A rendering hint only.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Edge {
    /// Render above the anchor
    Top,
    /// Render below the anchor
    Bottom,
}

/// Policy for a failed fetch whose epoch is still current
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FetchErrorPolicy {
    /// Drop the shown items; the list stays as visible as it was, but empty
    Clear,
    /// Keep showing the last successfully fetched items
    KeepLast,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: LogLevel,

    /// Enable timestamps in logs
    #[serde(default = "default_log_timestamps")]
    pub timestamps: bool,
}

/// Log level options
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

// Default value functions
fn default_edge() -> Edge {
    Edge::Bottom
}

fn default_on_fetch_error() -> FetchErrorPolicy {
    FetchErrorPolicy::Clear
}

fn default_dismiss_cancels_fetch() -> bool {
    true
}

fn default_log_level() -> LogLevel {
    LogLevel::Warn
}

fn default_log_timestamps() -> bool {
    true
}

impl Default for SuggestionConfig {
    fn default() -> Self {
        Self {
            edge: default_edge(),
            on_fetch_error: default_on_fetch_error(),
            dismiss_cancels_fetch: default_dismiss_cancels_fetch(),
            fetch_timeout_ms: None,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            timestamps: default_log_timestamps(),
        }
    }
}

impl Config {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from a file
    ///
    /// # Arguments
    /// * `path` - Path to the configuration file (TOML format)
    ///
    /// # Returns
    /// * `Result<Config>` - Loaded and validated configuration or error
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.display().to_string()).into());
        }
        let raw = fs::read_to_string(path)?;
        Self::from_toml_str(&raw)
    }

    /// Parse configuration from a TOML string
    ///
    /// Missing sections and fields take their default values.
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let config: Config = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Load the file at [`Config::default_path`], or defaults if it does not exist
    pub fn load() -> Result<Self> {
        let path = Self::default_path();
        if path.exists() {
            Self::from_file(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Get the default configuration file path
    ///
    /// # Returns
    /// * `PathBuf` - Path to default configuration file
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("mentionkit")
            .join("config.toml")
    }

    /// Serialize the configuration as TOML
    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Save configuration to a file, creating parent directories as needed
    ///
    /// # Arguments
    /// * `path` - Path where to save the configuration
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(path, self.to_toml_string()?)?;
        Ok(())
    }

    /// Validate the configuration
    ///
    /// # Returns
    /// * `Result<()>` - Ok if valid, error otherwise
    pub fn validate(&self) -> Result<()> {
        if let Some(0) = self.suggestions.fetch_timeout_ms {
            return Err(ConfigError::InvalidValue {
                field: "suggestions.fetch_timeout_ms".to_string(),
                value: "0".to_string(),
            }
            .into());
        }
        Ok(())
    }
}

impl SuggestionConfig {
    /// Get the fetch timeout as Duration, if one is configured
    pub fn fetch_timeout(&self) -> Option<Duration> {
        self.fetch_timeout_ms.map(Duration::from_millis)
    }
}

impl LogLevel {
    /// Convert to tracing::Level
    pub fn to_tracing_level(&self) -> tracing::Level {
        match self {
            LogLevel::Error => tracing::Level::ERROR,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Trace => tracing::Level::TRACE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MentionError;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.suggestions.edge, Edge::Bottom);
        assert_eq!(config.suggestions.on_fetch_error, FetchErrorPolicy::Clear);
        assert!(config.suggestions.dismiss_cancels_fetch);
        assert_eq!(config.suggestions.fetch_timeout(), None);
        assert_eq!(config.logging.level, LogLevel::Warn);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config = Config::from_toml_str(
            r#"
            [suggestions]
            edge = "top"
            on_fetch_error = "keep_last"
            fetch_timeout_ms = 1500
            "#,
        )
        .unwrap();

        assert_eq!(config.suggestions.edge, Edge::Top);
        assert_eq!(config.suggestions.on_fetch_error, FetchErrorPolicy::KeepLast);
        assert!(config.suggestions.dismiss_cancels_fetch);
        assert_eq!(
            config.suggestions.fetch_timeout(),
            Some(Duration::from_millis(1500))
        );
        assert_eq!(config.logging, LoggingConfig::default());
    }

    #[test]
    fn test_empty_toml_is_default() {
        assert_eq!(Config::from_toml_str("").unwrap(), Config::default());
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let err = Config::from_toml_str("[suggestions]\nfetch_timeout_ms = 0\n").unwrap_err();
        assert!(matches!(
            err,
            MentionError::Config(ConfigError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_unknown_edge_rejected() {
        let err = Config::from_toml_str("[suggestions]\nedge = \"left\"\n").unwrap_err();
        assert!(matches!(err, MentionError::Config(ConfigError::InvalidFormat(_))));
    }

    #[test]
    fn test_missing_file() {
        let err = Config::from_file("/definitely/not/here/mentionkit.toml").unwrap_err();
        assert!(matches!(err, MentionError::Config(ConfigError::FileNotFound(_))));
    }

    #[test]
    fn test_save_and_reload() {
        let dir = std::env::temp_dir().join(format!("mentionkit-config-{}", std::process::id()));
        let path = dir.join("config.toml");

        let mut config = Config::default();
        config.suggestions.dismiss_cancels_fetch = false;
        config.logging.level = LogLevel::Debug;
        config.save(&path).unwrap();

        let loaded = Config::from_file(&path).unwrap();
        assert_eq!(loaded, config);

        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn test_log_level_mapping() {
        assert_eq!(LogLevel::Trace.to_tracing_level(), tracing::Level::TRACE);
        assert_eq!(LogLevel::Error.to_tracing_level(), tracing::Level::ERROR);
    }
}
