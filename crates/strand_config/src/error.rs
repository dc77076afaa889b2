//! Errors raised while reading `strand.toml`.

use std::path::PathBuf;

/// Why a settings file could not be used.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The file exists but could not be read.
    #[error("cannot read `{}`: {source}", path.display())]
    Io {
        /// The settings file.
        path: PathBuf,
        /// The underlying failure.
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid TOML or has unknown keys.
    #[error("malformed settings: {0}")]
    Parse(#[from] toml::de::Error),

    /// A naming setting was set to the empty string.
    #[error("`{key}` must not be empty")]
    EmptyName {
        /// Dotted key of the setting.
        key: &'static str,
    },
}
