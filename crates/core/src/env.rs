//! Environment variable substitution.
//!
//! String values may reference environment variables as `${NAME}`, where
//! `NAME` is an upper-case identifier (`[A-Z_][A-Z0-9_]*`). Any other
//! `${...}` sequence, such as `${nextRelease.version}` or `${version}`, is a
//! template evaluated later by the release engine and is left untouched.

use crate::config::error::{ConfigError, ConfigResult};
use serde_json::{Map, Value};
use std::collections::HashMap;

/// Variable naming the changelog file written during a release.
pub const CHANGELOG_FILE: &str = "CHANGELOG_FILE";

/// Variable naming the file that receives the computed tag name.
pub const TMP_TAG_VERSION_NAME_FILE: &str = "TMP_TAG_VERSION_NAME_FILE";

/// Source of environment variable values.
///
/// The resolver reads the environment only through this trait, so tests can
/// inject a fixed set of variables.
pub trait EnvSource {
    /// Returns the value of `name`, or `None` if unset.
    fn var(&self, name: &str) -> Option<String>;
}

/// The real process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn var(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }
}

impl EnvSource for HashMap<String, String> {
    fn var(&self, name: &str) -> Option<String> {
        self.get(name).cloned()
    }
}

/// Returns true if `name` is an environment-style identifier.
pub fn is_env_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c == '_' || c.is_ascii_uppercase() => {}
        _ => return false,
    }
    chars.all(|c| c == '_' || c.is_ascii_uppercase() || c.is_ascii_digit())
}

/// Expands `${NAME}` references in `input`.
///
/// # Errors
///
/// Returns `ConfigError::MissingEnv` for the first referenced variable that
/// is not set.
///
/// # Example
///
/// ```
/// use rk_core::env::substitute;
/// use std::collections::HashMap;
///
/// let env = HashMap::from([("CHANGELOG_FILE".to_string(), "docs/CHANGES.md".to_string())]);
/// let out = substitute("${CHANGELOG_FILE} for ${nextRelease.version}", &env).unwrap();
/// assert_eq!(out, "docs/CHANGES.md for ${nextRelease.version}");
/// ```
pub fn substitute(input: &str, env: &dyn EnvSource) -> ConfigResult<String> {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(start) = rest.find("${") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];

        let Some(end) = after.find('}') else {
            // Unterminated reference: keep verbatim.
            out.push_str(&rest[start..]);
            return Ok(out);
        };

        let name = &after[..end];
        if is_env_name(name) {
            let value = env.var(name).ok_or_else(|| ConfigError::MissingEnv {
                name: name.to_string(),
            })?;
            out.push_str(&value);
        } else {
            out.push_str(&rest[start..start + 2 + end + 1]);
        }
        rest = &after[end + 1..];
    }

    out.push_str(rest);
    Ok(out)
}

/// Expands references in every string nested inside `value`.
pub fn substitute_value(value: &Value, env: &dyn EnvSource) -> ConfigResult<Value> {
    Ok(match value {
        Value::String(s) => Value::String(substitute(s, env)?),
        Value::Array(items) => Value::Array(
            items
                .iter()
                .map(|item| substitute_value(item, env))
                .collect::<ConfigResult<_>>()?,
        ),
        Value::Object(map) => Value::Object(substitute_map(map, env)?),
        other => other.clone(),
    })
}

/// Expands references in every string value of `map`, keeping key order.
pub fn substitute_map(
    map: &Map<String, Value>,
    env: &dyn EnvSource,
) -> ConfigResult<Map<String, Value>> {
    let mut out = Map::with_capacity(map.len());
    for (key, item) in map {
        out.insert(key.clone(), substitute_value(item, env)?);
    }
    Ok(out)
}

/// Fails on the first variable in `names` that is not set.
pub fn require_all(names: &[String], env: &dyn EnvSource) -> ConfigResult<()> {
    for name in names {
        if env.var(name).is_none() {
            return Err(ConfigError::MissingEnv { name: name.clone() });
        }
    }
    Ok(())
}
