//! Configuration file loading and validation.

use crate::error::ConfigError;
use crate::types::StrandConfig;
use std::path::Path;

/// Name of the settings file looked up in a project directory.
pub const CONFIG_FILE: &str = "strand.toml";

/// Loads and validates `strand.toml` from a project directory.
///
/// A missing file is not an error: every setting has a default.
pub fn load_config(project_dir: &Path) -> Result<StrandConfig, ConfigError> {
    let config_path = project_dir.join(CONFIG_FILE);
    if !config_path.exists() {
        return Ok(StrandConfig::default());
    }
    let content = std::fs::read_to_string(&config_path).map_err(|source| ConfigError::Io {
        path: config_path.clone(),
        source,
    })?;
    load_config_from_str(&content)
}

/// Parses and validates `strand.toml` content from a string.
pub fn load_config_from_str(content: &str) -> Result<StrandConfig, ConfigError> {
    let config: StrandConfig = toml::from_str(content)?;
    validate_config(&config)?;
    Ok(config)
}

fn validate_config(config: &StrandConfig) -> Result<(), ConfigError> {
    for (key, value) in [
        ("flatten.suffix", &config.flatten.suffix),
        ("flatten.separator", &config.flatten.separator),
    ] {
        if value.is_empty() {
            return Err(ConfigError::EmptyName { key });
        }
    }
    Ok(())
}
