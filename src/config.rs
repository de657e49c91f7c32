// ABOUTME: Environment-based configuration for deployment-specific settings
// ABOUTME: Typed log level and environment parsing with sensible defaults
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Environment-based configuration. All settings come from environment
//! variables with development defaults; a missing variable is never fatal
//! except where noted.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::env;

/// Strongly typed log level configuration
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Errors only
    Error,
    /// Warnings and errors
    Warn,
    /// Standard operational logging
    #[default]
    Info,
    /// Verbose diagnostics
    Debug,
    /// Everything
    Trace,
}

impl LogLevel {
    /// Convert to a `tracing` level
    #[must_use]
    pub fn to_tracing_level(self) -> tracing::Level {
        match self {
            Self::Error => tracing::Level::ERROR,
            Self::Warn => tracing::Level::WARN,
            Self::Info => tracing::Level::INFO,
            Self::Debug => tracing::Level::DEBUG,
            Self::Trace => tracing::Level::TRACE,
        }
    }

    /// Parse from string, falling back to `Info`
    #[must_use]
    pub fn from_str_or_default(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "error" => Self::Error,
            "warn" => Self::Warn,
            "debug" => Self::Debug,
            "trace" => Self::Trace,
            _ => Self::Info,
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Error => write!(f, "error"),
            Self::Warn => write!(f, "warn"),
            Self::Info => write!(f, "info"),
            Self::Debug => write!(f, "debug"),
            Self::Trace => write!(f, "trace"),
        }
    }
}

/// Deployment environment
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Local development
    #[default]
    Development,
    /// Production deployment
    Production,
    /// Automated testing
    Testing,
}

impl Environment {
    /// Parse from string, falling back to `Development`
    #[must_use]
    pub fn from_str_or_default(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            "testing" | "test" => Self::Testing,
            _ => Self::Development,
        }
    }

    /// Whether this is a production environment
    #[must_use]
    pub fn is_production(self) -> bool {
        matches!(self, Self::Production)
    }
}

/// Engine configuration loaded from the environment
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Database connection string
    pub database_url: String,
    /// Log verbosity
    pub log_level: LogLevel,
    /// Deployment environment
    pub environment: Environment,
}

impl ServerConfig {
    /// Load configuration from environment variables
    ///
    /// `DATABASE_URL` defaults to a local SQLite file; `LOG_LEVEL` and
    /// `ENVIRONMENT` fall back to `info` / `development`.
    ///
    /// # Errors
    ///
    /// Currently infallible; the `Result` keeps the boot path uniform for
    /// future required settings.
    pub fn from_env() -> Result<Self> {
        let database_url = env::var("DATABASE_URL")
            .unwrap_or_else(|_| "sqlite:./data/pantry.db".to_string());
        let log_level = LogLevel::from_str_or_default(
            &env::var("LOG_LEVEL").unwrap_or_default(),
        );
        let environment = Environment::from_str_or_default(
            &env::var("ENVIRONMENT").unwrap_or_default(),
        );

        Ok(Self {
            database_url,
            log_level,
            environment,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_parsing() {
        assert_eq!(LogLevel::from_str_or_default("DEBUG"), LogLevel::Debug);
        assert_eq!(LogLevel::from_str_or_default("nonsense"), LogLevel::Info);
    }

    #[test]
    fn test_environment_parsing() {
        assert_eq!(
            Environment::from_str_or_default("prod"),
            Environment::Production
        );
        assert!(!Environment::from_str_or_default("dev").is_production());
    }
}
