//! Structured logging setup: `RUST_LOG`-driven filtering with pretty output
//! for development and JSON for production.

use anyhow::Result;
use std::env;
use tracing_subscriber::{EnvFilter, fmt};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub format: LogFormat,
    /// Default directive used when `RUST_LOG` is unset.
    pub default_filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: LogFormat::Pretty,
            default_filter: "info".to_string(),
        }
    }
}

impl LoggingConfig {
    /// Reads `ORDER_ANALYTICS_LOG_FORMAT` (pretty|json); filtering itself
    /// stays under `RUST_LOG`.
    pub fn from_env() -> Self {
        let format = match env::var("ORDER_ANALYTICS_LOG_FORMAT").as_deref() {
            Ok("json") => LogFormat::Json,
            _ => LogFormat::Pretty,
        };
        Self {
            format,
            ..Self::default()
        }
    }
}

pub fn init_logging(config: LoggingConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.default_filter.clone()));

    match config.format {
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .try_init()
                .map_err(|err| anyhow::anyhow!("failed to init logging: {err}"))?;
        }
        LogFormat::Pretty => {
            fmt()
                .with_env_filter(filter)
                .with_target(false)
                .try_init()
                .map_err(|err| anyhow::anyhow!("failed to init logging: {err}"))?;
        }
    }
    Ok(())
}
