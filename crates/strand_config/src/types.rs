//! Configuration types deserialized from `strand.toml`.

use serde::Deserialize;

/// The top-level settings parsed from `strand.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StrandConfig {
    /// Hierarchy flattening settings.
    #[serde(default)]
    pub flatten: FlattenConfig,
    /// Braid combinator settings.
    #[serde(default)]
    pub braid: BraidConfig,
}

/// Settings for the flatten transform.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FlattenConfig {
    /// Appended to the top definition's name, joined with `_`.
    #[serde(default = "default_suffix")]
    pub suffix: String,
    /// Joins instance names along a scope path to name a copied leaf.
    #[serde(default = "default_separator")]
    pub separator: String,
    /// Run the unwired-port check on the flattened definition.
    #[serde(default = "default_true")]
    pub check_wired: bool,
}

impl Default for FlattenConfig {
    fn default() -> Self {
        Self {
            suffix: default_suffix(),
            separator: default_separator(),
            check_wired: true,
        }
    }
}

/// Settings for braid combinators.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BraidConfig {
    /// Fork clock-category inputs that no bucket names.
    #[serde(default = "default_true")]
    pub fork_clocks: bool,
}

impl Default for BraidConfig {
    fn default() -> Self {
        Self { fork_clocks: true }
    }
}

fn default_suffix() -> String {
    "flattened".to_string()
}

fn default_separator() -> String {
    "_".to_string()
}

fn default_true() -> bool {
    true
}
