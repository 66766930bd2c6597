//! Tool settings models for `releasekit.toml`.
//!
//! This module defines the structure of the optional settings file that
//! tunes how strictly the resolver validates a project's configuration.

use serde::Deserialize;
use serde::Serialize;
use ts_rs::TS;

/// Represents tool settings from `releasekit.toml`.
///
/// # Example
///
/// ```toml
/// # releasekit.toml
/// strict = true
/// extra-plugins = ["semantic-release-cargo"]
/// required-env = ["CHANGELOG_FILE"]
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq, TS)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct Settings {
    /// Reject unknown options on known plugins instead of warning.
    #[serde(default)]
    pub strict: bool,

    /// Plugin names accepted in addition to the built-in registry.
    ///
    /// Options of these plugins are passed through without validation.
    #[serde(default)]
    pub extra_plugins: Vec<String>,

    /// Environment variables that must be set, even when no option
    /// references them.
    #[serde(default)]
    pub required_env: Vec<String>,
}
