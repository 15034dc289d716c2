use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use std::path::Path;

use super::{types::Config, ConfigError};

/// Environment variable prefix for overrides; sections nest with `__`
/// (e.g. `WAVEBATCH_PROCESSOR__SAMPLE_RATE_HZ`).
const ENV_PREFIX: &str = "WAVEBATCH_";

/// Load configuration from file with environment variable overrides
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::FileNotFound(path.display().to_string()));
    }

    extract(Figment::new().merge(Toml::file(path)))
}

/// Load configuration, falling back to built-in defaults when the file does
/// not exist. Environment overrides apply either way.
pub fn load_config_or_default(path: &Path) -> Result<Config, ConfigError> {
    let figment = if path.exists() {
        Figment::new().merge(Toml::file(path))
    } else {
        Figment::new()
    };

    extract(figment)
}

/// Load configuration from TOML string (useful for testing)
pub fn load_config_from_str(toml_str: &str) -> Result<Config, ConfigError> {
    toml::from_str(toml_str).map_err(|e| ConfigError::ParseError(e.to_string()))
}

fn extract(figment: Figment) -> Result<Config, ConfigError> {
    figment
        .merge(Env::prefixed(ENV_PREFIX).split("__"))
        .extract()
        .map_err(|e| ConfigError::ParseError(e.to_string()))
}
