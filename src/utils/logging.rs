//! # Logging
//!
//! Installs a global `tracing` subscriber from a [`LoggingConfig`].
//!
//! The library itself only emits events; applications call [`init_logging`]
//! once at startup. The `PERSIST_CODEC_LOG` environment variable, when set,
//! overrides the configured level with a full filter directive
//! (e.g. `persist_codec=trace`).

use crate::config::LoggingConfig;
use crate::error::{PersistError, Result};
use tracing::info;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Environment variable holding a filter directive override
pub const LOG_FILTER_ENV: &str = "PERSIST_CODEC_LOG";

/// Install the global subscriber described by `config`
///
/// # Errors
/// Returns `PersistError::Config` if a global subscriber is already installed
pub fn init_logging(config: &LoggingConfig) -> Result<()> {
    let filter = EnvFilter::try_from_env(LOG_FILTER_ENV)
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.to_string()));

    let registry = tracing_subscriber::registry().with(filter);
    let installed = if config.json_format {
        registry
            .with(fmt::layer().json().with_target(true))
            .try_init()
    } else {
        registry.with(fmt::layer().with_target(true)).try_init()
    };

    installed
        .map_err(|e| PersistError::Config(format!("Failed to install log subscriber: {e}")))?;

    info!(app = %config.app_name, level = %config.log_level, "Logging initialized");
    Ok(())
}
