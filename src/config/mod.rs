//! Configuration management for Tubegate
//!
//! This module provides a layered configuration system that loads settings from:
//! 1. Default values (embedded in structs)
//! 2. TOML configuration file
//! 3. Environment variables (highest priority)
//!
//! # Environment Variables
//!
//! Configuration can be overridden using environment variables with the pattern:
//! `TUBEGATE__<section>__<key>`
//!
//! Examples:
//! - `TUBEGATE__SERVER__BIND_ADDR=0.0.0.0:9000`
//! - `TUBEGATE__RATE_LIMIT__MAX_REQUESTS=50`
//!
//! Two extra overrides are honored for deployment parity: `PORT` rebinds the
//! listen port and `NODE_ENV` selects the environment name.
//!
//! # Configuration File
//!
//! By default, the configuration is loaded from `config/tubegate.toml`.
//! This can be overridden using the `TUBEGATE_CONFIG` environment variable.

mod models;
mod sources;

pub use models::{Config, ProviderConfig, RateLimitConfig, ServerConfig};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    LoadError(#[from] config::ConfigError),
}

impl Config {
    /// Load configuration from all sources (file + environment)
    pub fn load() -> Result<Self, ConfigError> {
        Ok(sources::load()?)
    }

    /// Load configuration from a specific path
    ///
    /// Useful for testing with custom configuration files.
    pub fn load_from_path(path: std::path::PathBuf) -> Result<Self, ConfigError> {
        Ok(sources::load_from_sources(path)?)
    }
}
