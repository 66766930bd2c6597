//! Error types for configuration loading and resolution.
//!
//! Every failure is fatal: a configuration is either fully valid or rejected
//! with the first violation found.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading or resolving configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read a configuration file from disk.
    #[error("Failed to read config file at {path}: {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Failed to parse TOML configuration.
    #[error("Failed to parse TOML file at {path}: {source}")]
    TomlParse {
        path: PathBuf,
        source: toml::de::Error,
    },

    /// Failed to parse YAML configuration.
    #[error("Failed to parse YAML file at {path}: {source}")]
    YamlParse {
        path: PathBuf,
        source: serde_yaml::Error,
    },

    /// Failed to parse JSON configuration.
    #[error("Failed to parse JSON file at {path}: {source}")]
    JsonParse {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// A JavaScript or TypeScript configuration file was found.
    #[error("Cannot evaluate script configuration at {path}; convert it to YAML or JSON")]
    ScriptConfig { path: PathBuf },

    /// Invalid file-level structure (bad `extends`, wrong document type).
    #[error("Invalid configuration in {path}: {reason}")]
    InvalidConfig { path: PathBuf, reason: String },

    /// A resolution error, tagged with the file it came from.
    #[error("{path}: {source}")]
    InFile {
        path: PathBuf,
        #[source]
        source: Box<ConfigError>,
    },

    /// A top-level key has the wrong type or value.
    #[error("Invalid value for `{field}`: {reason}")]
    Schema { field: String, reason: String },

    /// A top-level key is not part of the schema.
    #[error("Unknown configuration key `{key}`")]
    UnknownKey { key: String },

    /// A branch entry is malformed.
    #[error("Invalid branch #{index} ({name}): {reason}")]
    InvalidBranch {
        index: usize,
        name: String,
        reason: String,
    },

    /// The branch list as a whole violates a constraint.
    #[error("Invalid branches: {reason}")]
    InvalidBranches { reason: String },

    /// A plugin entry is neither a name nor a `[name, options]` pair.
    #[error("Invalid plugin entry #{index}: {reason}")]
    InvalidPluginEntry { index: usize, reason: String },

    /// A plugin name is neither in the registry nor in `extra-plugins`.
    #[error("Unknown plugin `{name}`")]
    UnknownPlugin { name: String },

    /// A required plugin option is absent.
    #[error("Plugin `{plugin}` is missing required option `{option}`")]
    MissingPluginOption { plugin: String, option: String },

    /// A plugin option has the wrong shape.
    #[error("Plugin `{plugin}` has invalid option `{option}`: {reason}")]
    InvalidPluginOption {
        plugin: String,
        option: String,
        reason: String,
    },

    /// An option not declared by the plugin (strict mode only).
    #[error("Plugin `{plugin}` does not accept option `{option}`")]
    UnknownPluginOption { plugin: String, option: String },

    /// A commit-lint rule name is not recognised.
    #[error("Unknown commitlint rule `{rule}`")]
    UnknownRule { rule: String },

    /// A commit-lint rule entry is malformed.
    #[error("Invalid commitlint rule `{rule}`: {reason}")]
    InvalidRule { rule: String, reason: String },

    /// A referenced or required environment variable is not set.
    #[error("Required environment variable `{name}` is not set")]
    MissingEnv { name: String },
}

impl ConfigError {
    /// Tags this error with the file it was found in.
    pub fn in_file(self, path: impl Into<PathBuf>) -> Self {
        match self {
            // File-level errors already carry their path.
            Self::FileRead { .. }
            | Self::TomlParse { .. }
            | Self::YamlParse { .. }
            | Self::JsonParse { .. }
            | Self::InvalidConfig { .. }
            | Self::ScriptConfig { .. }
            | Self::InFile { .. } => self,
            other => Self::InFile {
                path: path.into(),
                source: Box::new(other),
            },
        }
    }

    /// The underlying error, without file context.
    pub fn root(&self) -> &ConfigError {
        match self {
            Self::InFile { source, .. } => source.root(),
            other => other,
        }
    }

    /// Top-level configuration key the error concerns, when known.
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::Schema { field, .. } => Some(field),
            Self::UnknownKey { key } => Some(key),
            Self::InvalidBranch { .. } | Self::InvalidBranches { .. } => Some("branches"),
            Self::InvalidPluginEntry { .. }
            | Self::UnknownPlugin { .. }
            | Self::MissingPluginOption { .. }
            | Self::InvalidPluginOption { .. }
            | Self::UnknownPluginOption { .. } => Some("plugins"),
            Self::UnknownRule { .. } | Self::InvalidRule { .. } => Some("rules"),
            Self::InFile { source, .. } => source.field(),
            _ => None,
        }
    }

    pub(crate) fn schema(field: &str, reason: impl Into<String>) -> Self {
        Self::Schema {
            field: field.to_string(),
            reason: reason.into(),
        }
    }
}

/// Type alias for Result with ConfigError.
pub type ConfigResult<T> = Result<T, ConfigError>;
