//! Logging setup for hosts embedding mentionkit.
//!
//! The library itself only emits `tracing` events. Hosts that do not
//! install their own subscriber can call [`init_logging`] once at startup.

use tracing::Subscriber;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::util::SubscriberInitExt;

use crate::config::LoggingConfig;
use crate::error::{MentionError, Result};

type BoxedSubscriber = Box<dyn Subscriber + Send + Sync>;

/// Install a global fmt subscriber based on the logging configuration.
///
/// `RUST_LOG`, when set, takes precedence over the configured level.
///
/// # Returns
/// * `Result<()>` - Error if a global subscriber is already installed
pub fn init_logging(config: &LoggingConfig) -> Result<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| configured_filter(config));

    build_subscriber(config, filter)
        .try_init()
        .map_err(|e| MentionError::Generic(format!("Failed to initialize logging: {e}")))
}

fn configured_filter(config: &LoggingConfig) -> EnvFilter {
    EnvFilter::new(config.level.to_tracing_level().as_str().to_lowercase())
}

fn build_subscriber(config: &LoggingConfig, filter: EnvFilter) -> BoxedSubscriber {
    // Build subscriber with level filter
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false);

    // Configure timestamps
    if config.timestamps {
        Box::new(builder.finish())
    } else {
        Box::new(builder.without_time().finish())
    }
}

#[cfg(test)]
mod tests {
    use tracing::Level;

    use super::*;
    use crate::config::LogLevel;

    fn config(level: LogLevel, timestamps: bool) -> LoggingConfig {
        LoggingConfig { level, timestamps }
    }

    #[test]
    fn test_configured_level_filters_events() {
        let config = config(LogLevel::Warn, true);
        let subscriber = build_subscriber(&config, configured_filter(&config));

        tracing::subscriber::with_default(subscriber, || {
            assert!(tracing::enabled!(Level::ERROR));
            assert!(tracing::enabled!(Level::WARN));
            assert!(!tracing::enabled!(Level::INFO));
        });
    }

    #[test]
    fn test_debug_level_without_timestamps() {
        let config = config(LogLevel::Debug, false);
        let subscriber = build_subscriber(&config, configured_filter(&config));

        tracing::subscriber::with_default(subscriber, || {
            assert!(tracing::enabled!(Level::DEBUG));
            assert!(!tracing::enabled!(Level::TRACE));
        });
    }
}
