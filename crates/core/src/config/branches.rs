//! Branch pattern parsing and validation.

use crate::config::error::{ConfigError, ConfigResult};
use rk_protocol::release_models::{
    BranchKind, BranchObject, BranchSpec, Channel, FalseMarker, Prerelease,
};
use serde_json::Value;
use std::collections::HashSet;

const BRANCH_KEYS: &[&str] = &["name", "prerelease", "channel", "range"];
const GLOB_CHARS: &[char] = &['*', '?', '+', '@', '!', '(', ')', '{', '}', '[', ']', ','];

/// Parses one element of the `branches` list.
pub fn parse_branch(index: usize, value: &Value) -> ConfigResult<BranchSpec> {
    let invalid = |name: &str, reason: String| ConfigError::InvalidBranch {
        index,
        name: name.to_string(),
        reason,
    };

    let branch = match value {
        Value::String(name) => BranchSpec::Name(name.clone()),
        Value::Object(map) => {
            let name = match map.get("name") {
                Some(Value::String(name)) => name.clone(),
                Some(_) => return Err(invalid("?", "`name` must be a string".to_string())),
                None => return Err(invalid("?", "missing `name`".to_string())),
            };

            let unknown = map.keys().find(|key| !BRANCH_KEYS.iter().any(|known| known == key));
            if let Some(key) = unknown {
                return Err(invalid(&name, format!("unknown key `{key}`")));
            }

            let prerelease = match map.get("prerelease") {
                None | Some(Value::Null) => None,
                Some(Value::Bool(flag)) => Some(Prerelease::Flag(*flag)),
                Some(Value::String(id)) => Some(Prerelease::Id(id.clone())),
                Some(_) => {
                    return Err(invalid(
                        &name,
                        "`prerelease` must be a boolean or an identifier".to_string(),
                    ))
                }
            };

            let channel = match map.get("channel") {
                None | Some(Value::Null) => None,
                Some(Value::Bool(false)) => Some(Channel::Default(FalseMarker)),
                Some(Value::String(channel)) => Some(Channel::Named(channel.clone())),
                Some(_) => {
                    return Err(invalid(&name, "`channel` must be a string or false".to_string()))
                }
            };

            let range = match map.get("range") {
                None | Some(Value::Null) => None,
                Some(Value::String(range)) => Some(range.clone()),
                Some(_) => return Err(invalid(&name, "`range` must be a string".to_string())),
            };

            BranchSpec::Detailed(BranchObject {
                name,
                prerelease,
                channel,
                range,
            })
        }
        _ => {
            return Err(invalid(
                "?",
                "expected a branch name or a {name, ...} mapping".to_string(),
            ))
        }
    };

    validate_branch(&branch).map_err(|reason| invalid(branch.name(), reason))?;
    Ok(branch)
}

/// True if `name` contains glob syntax rather than a literal branch name.
pub fn is_glob(name: &str) -> bool {
    name.contains(GLOB_CHARS)
}

/// Checks a single branch: name syntax, range and prerelease identifier.
pub fn validate_branch(branch: &BranchSpec) -> Result<(), String> {
    let name = branch.name();
    validate_pattern(name)?;

    if let Some(range) = branch.range() {
        validate_range(range).map_err(|e| format!("invalid range `{range}`: {e}"))?;
    }

    if let Some(id) = branch.prerelease_id() {
        // A glob with `prerelease: true` takes its identifier from each
        // matching branch, which is only known at release time.
        let literal_id = !(is_glob(id) && id == name);
        if literal_id {
            if id.is_empty() {
                return Err("prerelease identifier is empty".to_string());
            }
            semver::Prerelease::new(id)
                .map_err(|e| format!("invalid prerelease identifier `{id}`: {e}"))?;
        }
    }

    Ok(())
}

/// Checks a version range in the release engine's range syntax.
///
/// Ranges are `||`-separated sets. A set is either a hyphen range
/// (`1.2.0 - 1.4.x`) or whitespace-separated comparators
/// (`>=1.2.0 <1.3.0`), where an operator may stand apart from its version
/// (`>= 1.2.0`). Each comparator must parse as a [`semver::VersionReq`].
pub fn validate_range(range: &str) -> Result<(), String> {
    for set in range.split("||") {
        let set = set.trim();
        if set.is_empty() {
            // An empty set matches any version.
            continue;
        }

        if let Some((low, high)) = set.split_once(" - ") {
            check_comparator(low.trim())?;
            check_comparator(high.trim())?;
            continue;
        }

        let mut pending_op = String::new();
        for token in set.split_whitespace() {
            if token.chars().all(|c| matches!(c, '<' | '>' | '=' | '~' | '^')) {
                pending_op.push_str(token);
                continue;
            }
            check_comparator(&format!("{pending_op}{token}"))?;
            pending_op.clear();
        }
        if !pending_op.is_empty() {
            return Err(format!("operator `{pending_op}` has no version"));
        }
    }
    Ok(())
}

fn check_comparator(comparator: &str) -> Result<(), String> {
    let op_len = comparator
        .find(|c: char| !matches!(c, '<' | '>' | '=' | '~' | '^'))
        .unwrap_or(comparator.len());
    let (op, version) = comparator.split_at(op_len);
    let version = version.strip_prefix('v').unwrap_or(version);

    semver::VersionReq::parse(&format!("{op}{version}"))
        .map(|_| ())
        .map_err(|e| format!("`{comparator}`: {e}"))
}

/// Checks the syntax of a branch name or glob pattern.
pub fn validate_pattern(name: &str) -> Result<(), String> {
    if name.is_empty() {
        return Err("branch name is empty".to_string());
    }
    if let Some(c) = name.chars().find(|c| c.is_whitespace() || c.is_control()) {
        return Err(format!("contains forbidden character {c:?}"));
    }
    for forbidden in ["..", "~", "^", ":", "\\", "@{", "//"] {
        if name.contains(forbidden) {
            return Err(format!("contains forbidden sequence `{forbidden}`"));
        }
    }
    if name.starts_with('-') || name.starts_with('/') {
        return Err("must not start with `-` or `/`".to_string());
    }
    if name.ends_with('/') || name.ends_with('.') || name.ends_with(".lock") {
        return Err("must not end with `/`, `.` or `.lock`".to_string());
    }

    let mut stack = Vec::new();
    for c in name.chars() {
        match c {
            '(' | '{' | '[' => stack.push(c),
            ')' | '}' | ']' => {
                let open = match c {
                    ')' => '(',
                    '}' => '{',
                    _ => '[',
                };
                if stack.pop() != Some(open) {
                    return Err(format!("unbalanced `{c}` in pattern"));
                }
            }
            _ => {}
        }
    }
    if let Some(open) = stack.pop() {
        return Err(format!("unclosed `{open}` in pattern"));
    }

    Ok(())
}

/// Checks constraints across the whole branch list.
///
/// Names must be unique, prerelease identifiers must be unique, and at least
/// one branch must produce regular releases.
pub fn validate_branch_set(branches: &[BranchSpec]) -> ConfigResult<()> {
    let invalid = |reason: String| ConfigError::InvalidBranches { reason };

    if branches.is_empty() {
        return Err(invalid("at least one branch is required".to_string()));
    }

    let mut names = HashSet::new();
    let mut prerelease_ids = HashSet::new();
    for branch in branches {
        if !names.insert(branch.name()) {
            return Err(invalid(format!("duplicate branch `{}`", branch.name())));
        }
        if let Some(id) = branch.prerelease_id() {
            if !prerelease_ids.insert(id) {
                return Err(invalid(format!("duplicate prerelease identifier `{id}`")));
            }
        }
    }

    if !branches.iter().any(|b| b.kind() == BranchKind::Release) {
        return Err(invalid("at least one release branch is required".to_string()));
    }

    Ok(())
}
