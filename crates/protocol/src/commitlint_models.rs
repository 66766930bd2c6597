//! Commit-lint configuration models for `.commitlintrc*` files.
//!
//! Only the configuration shape is modelled here. Evaluating commit messages
//! against the rules is left to the external linter.

use indexmap::IndexMap;
use serde::ser::SerializeSeq;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use ts_rs::TS;

/// Rule table keyed by rule name, in declaration order.
pub type RuleTable = IndexMap<String, RuleConfig>;

/// Resolved commit-lint configuration.
///
/// # Example
///
/// ```yaml
/// extends:
///   - "@commitlint/config-conventional"
/// rules:
///   header-max-length: [2, always, 100]
///   scope-case: [0]
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, TS)]
#[serde(rename_all = "camelCase")]
pub struct CommitlintConfig {
    /// Shareable configurations to extend, in declaration order.
    #[serde(default)]
    pub extends: Vec<String>,

    /// Rule table keyed by rule name.
    #[serde(default)]
    #[ts(type = "Record<string, Array<unknown>>")]
    pub rules: RuleTable,

    /// Parser preset: a package name or an inline `{parserOpts, ...}` mapping.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(type = "string | Record<string, unknown>")]
    pub parser_preset: Option<Value>,

    /// Linter plugin packages, in declaration order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub plugins: Vec<String>,

    /// Settings for the interactive commit prompt.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(type = "Record<string, unknown>")]
    pub prompt: Option<Map<String, Value>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub formatter: Option<String>,

    /// URL shown to users when a commit is rejected.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub help_url: Option<String>,

    /// Whether the linter's built-in ignore patterns (merge commits, etc.) apply.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_ignores: Option<bool>,
}

/// Severity of a rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum RuleLevel {
    Disabled = 0,
    Warning = 1,
    Error = 2,
}

impl RuleLevel {
    /// Parses the numeric level used in configuration files.
    pub fn from_number(level: u64) -> Option<Self> {
        match level {
            0 => Some(Self::Disabled),
            1 => Some(Self::Warning),
            2 => Some(Self::Error),
            _ => None,
        }
    }
}

/// Whether a rule's condition must hold or must not hold.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RuleApplicability {
    Always,
    Never,
}

/// One rule entry: `[level]`, `[level, applicable]` or `[level, applicable, value]`.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleConfig {
    pub level: RuleLevel,
    pub applicable: Option<RuleApplicability>,
    pub value: Option<Value>,
}

/// Reason a rule entry is malformed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleShapeError {
    NotAnArray,
    Arity(usize),
    Level(String),
    Applicability(String),
    MissingApplicability,
}

impl fmt::Display for RuleShapeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotAnArray => write!(f, "rule must be an array"),
            Self::Arity(len) => write!(f, "rule must have 1 to 3 elements, got {len}"),
            Self::Level(level) => write!(f, "level must be 0, 1 or 2, got {level}"),
            Self::Applicability(value) => {
                write!(f, "applicable must be \"always\" or \"never\", got {value}")
            }
            Self::MissingApplicability => {
                write!(f, "enabled rule must declare \"always\" or \"never\"")
            }
        }
    }
}

impl std::error::Error for RuleShapeError {}

impl RuleConfig {
    /// Builds a rule from its array form.
    pub fn from_value(value: &Value) -> Result<Self, RuleShapeError> {
        let parts = value.as_array().ok_or(RuleShapeError::NotAnArray)?;
        if parts.is_empty() || parts.len() > 3 {
            return Err(RuleShapeError::Arity(parts.len()));
        }

        let level = parts[0]
            .as_u64()
            .and_then(RuleLevel::from_number)
            .ok_or_else(|| RuleShapeError::Level(parts[0].to_string()))?;

        let applicable = match parts.get(1) {
            None => None,
            Some(Value::String(s)) if s == "always" => Some(RuleApplicability::Always),
            Some(Value::String(s)) if s == "never" => Some(RuleApplicability::Never),
            Some(other) => return Err(RuleShapeError::Applicability(other.to_string())),
        };

        if level != RuleLevel::Disabled && applicable.is_none() {
            return Err(RuleShapeError::MissingApplicability);
        }

        Ok(Self {
            level,
            applicable,
            value: parts.get(2).cloned(),
        })
    }
}

impl Serialize for RuleConfig {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let len = 1 + usize::from(self.applicable.is_some()) + usize::from(self.value.is_some());
        let mut seq = serializer.serialize_seq(Some(len))?;
        seq.serialize_element(&(self.level as u8))?;
        if let Some(applicable) = &self.applicable {
            seq.serialize_element(applicable)?;
        }
        if let Some(value) = &self.value {
            seq.serialize_element(value)?;
        }
        seq.end()
    }
}

impl<'de> Deserialize<'de> for RuleConfig {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Self::from_value(&value).map_err(serde::de::Error::custom)
    }
}
