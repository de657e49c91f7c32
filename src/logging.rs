// ABOUTME: Structured logging initialization built on tracing-subscriber
// ABOUTME: Supports json, pretty, and compact output formats via LOG_FORMAT
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Structured logging setup. Call [`init_from_config`] once at process
//! start; the `RUST_LOG` environment variable overrides the configured
//! level when set.

use crate::config::ServerConfig;
use anyhow::Result;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize the global tracing subscriber from configuration
///
/// Output format is selected by `LOG_FORMAT` (`json`, `pretty`, or
/// `compact`, defaulting to `compact`). Production deployments should
/// use `json` for log aggregation.
///
/// # Errors
///
/// Returns an error if a global subscriber has already been installed.
pub fn init_from_config(config: &ServerConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "pantry_server={level},sqlx=warn",
            level = config.log_level
        ))
    });

    let format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());

    match format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().json())
                .try_init()?;
        }
        "pretty" => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().pretty())
                .try_init()?;
        }
        _ => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().compact())
                .try_init()?;
        }
    }

    tracing::info!(environment = ?config.environment, "logging initialized");

    Ok(())
}
