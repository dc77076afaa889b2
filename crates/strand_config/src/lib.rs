//! Parsing and validation of `strand.toml` settings.
//!
//! This crate reads the optional settings file of a strand project and
//! produces a strongly-typed [`StrandConfig`] with defaults for every field.

#![warn(missing_docs)]

pub mod error;
pub mod loader;
pub mod types;

pub use error::ConfigError;
pub use loader::{load_config, load_config_from_str, CONFIG_FILE};
pub use types::*;
