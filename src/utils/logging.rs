//! Logging Setup
//!
//! Builds the global `tracing` subscriber from a [`LoggingConfig`].
//!
//! `RUST_LOG` takes precedence over the configured level when set. When file
//! logging is enabled the file writer replaces the console writer; console
//! output is the fallback.

use crate::config::LoggingConfig;
use crate::error::{ProtocolError, Result};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

/// Initialize the global tracing subscriber.
///
/// # Errors
/// Fails if the log file cannot be opened or a subscriber is already set.
pub fn init_logging(config: &LoggingConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.to_string()));

    let init_result = if config.log_to_file {
        let path = config.log_file_path.as_deref().ok_or_else(|| {
            ProtocolError::ConfigError(
                "log_file_path must be specified when log_to_file is true".to_string(),
            )
        })?;
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|e| {
                ProtocolError::ConfigError(format!("Failed to open log file '{path}': {e}"))
            })?;
        let builder = fmt().with_env_filter(filter).with_writer(Arc::new(file));
        if config.json_format {
            builder.json().try_init()
        } else {
            builder.try_init()
        }
    } else {
        let builder = fmt().with_env_filter(filter);
        if config.json_format {
            builder.json().try_init()
        } else {
            builder.try_init()
        }
    };

    init_result
        .map_err(|e| ProtocolError::ConfigError(format!("Failed to initialize logging: {e}")))?;

    info!(app = %config.app_name, "Logging initialized");
    Ok(())
}
