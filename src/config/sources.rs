use super::models::Config;
use config::{ConfigError, Environment, File};
use std::env;
use std::path::PathBuf;

const CONFIG_ENV_VAR: &str = "TUBEGATE_CONFIG";
const DEFAULT_CONFIG_PATH: &str = "config/tubegate.toml";
const ENV_PREFIX: &str = "TUBEGATE";
const ENV_SEPARATOR: &str = "__";

/// Load configuration from multiple sources with priority:
/// 1. Defaults (embedded in structs)
/// 2. TOML file (if exists)
/// 3. Environment variables from .env file (via dotenvy)
/// 4. System environment variables (highest priority)
pub fn load() -> Result<Config, ConfigError> {
    // Load .env file if it exists (ignore errors if file doesn't exist)
    let _ = dotenvy::dotenv();

    let config_path = env::var(CONFIG_ENV_VAR)
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH));

    let mut config = load_from_sources(config_path)?;

    apply_compat_overrides(&mut config);

    Ok(config)
}

/// Overrides kept for parity with common deployment environments:
/// `PORT` rebinds the listen port and `NODE_ENV` selects the environment
/// name that gates error-detail echo.
fn apply_compat_overrides(config: &mut Config) {
    if let Ok(port) = env::var("PORT") {
        match port.parse::<u16>() {
            Ok(port) => config.server.bind_addr.set_port(port),
            Err(_) => tracing::warn!(%port, "Ignoring unparsable PORT override"),
        }
    }

    if let Ok(environment) = env::var("NODE_ENV") {
        if !environment.is_empty() {
            config.server.environment = environment;
        }
    }
}

/// Load configuration from a specific path and environment
/// Useful for testing with custom config files
pub fn load_from_sources(config_path: PathBuf) -> Result<Config, ConfigError> {
    let mut builder = config::Config::builder();

    // Start with defaults (handled by struct Default implementations)
    // Add TOML file if it exists (optional)
    if config_path.exists() {
        tracing::info!("Loading configuration from: {}", config_path.display());
        builder = builder.add_source(File::from(config_path).required(false));
    } else {
        tracing::warn!(
            "Configuration file not found at {}, using defaults and environment overrides",
            config_path.display()
        );
    }

    // Add environment variable overrides
    // TUBEGATE__SERVER__BIND_ADDR -> server.bind_addr
    builder = builder.add_source(
        Environment::with_prefix(ENV_PREFIX)
            .separator(ENV_SEPARATOR)
            .try_parsing(true),
    );

    let config = builder.build()?;
    config.try_deserialize()
}
