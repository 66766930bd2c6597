//! Resolution of parsed configuration documents.
//!
//! A resolver takes the raw document produced by the loader, applies
//! defaults, validates it against the schema, and returns the typed,
//! read-only structure. Resolution is deterministic: the same document and
//! environment always yield the same result.

use crate::config::branches::{parse_branch, validate_branch_set};
use crate::config::error::{ConfigError, ConfigResult};
use crate::env::{substitute, substitute_map, EnvSource};
use crate::plugins::{parse_plugin_entry, validate_plugin};
use rk_protocol::commitlint_models::{CommitlintConfig, RuleConfig, RuleTable};
use rk_protocol::release_models::{
    default_branches, default_plugins, BranchSpec, PluginEntry, ReleaseConfig, DEFAULT_PRESET,
    DEFAULT_TAG_FORMAT, VERSION_PLACEHOLDER,
};
use rk_protocol::settings_models::Settings;
use serde_json::{Map, Value};
use tracing::debug;

/// Top-level keys accepted in a release configuration.
pub const RELEASE_KEYS: &[&str] = &[
    "branches",
    "plugins",
    "preset",
    "repositoryUrl",
    "tagFormat",
    "dryRun",
    "ci",
];

/// Top-level keys accepted in a commit-lint configuration.
pub const COMMITLINT_KEYS: &[&str] = &[
    "extends",
    "rules",
    "parserPreset",
    "formatter",
    "helpUrl",
    "defaultIgnores",
    "plugins",
    "prompt",
    "ignores",
];

/// Rule names understood by the commit linter.
pub const COMMITLINT_RULES: &[&str] = &[
    "body-case",
    "body-empty",
    "body-full-stop",
    "body-leading-blank",
    "body-max-length",
    "body-max-line-length",
    "body-min-length",
    "footer-empty",
    "footer-leading-blank",
    "footer-max-length",
    "footer-max-line-length",
    "footer-min-length",
    "header-case",
    "header-full-stop",
    "header-max-length",
    "header-min-length",
    "header-trim",
    "references-empty",
    "scope-case",
    "scope-empty",
    "scope-enum",
    "scope-max-length",
    "scope-min-length",
    "signed-off-by",
    "subject-case",
    "subject-empty",
    "subject-exclamation-mark",
    "subject-full-stop",
    "subject-max-length",
    "subject-min-length",
    "trailer-exists",
    "type-case",
    "type-empty",
    "type-enum",
    "type-max-length",
    "type-min-length",
];

/// Resolves a raw release document into a [`ReleaseConfig`].
///
/// # Errors
///
/// Returns the first violation found: an unknown top-level key, a value of
/// the wrong type, a malformed branch, an unknown plugin, a missing or
/// malformed plugin option, or an unset environment variable.
///
/// # Example
///
/// ```
/// use rk_core::config::resolver::resolve_release;
/// use rk_protocol::settings_models::Settings;
/// use serde_json::json;
/// use std::collections::HashMap;
///
/// let raw = json!({"branches": ["main"], "plugins": ["@semantic-release/commit-analyzer"]});
/// let env = HashMap::<String, String>::new();
/// let config = resolve_release(&raw, &Settings::default(), &env).unwrap();
/// assert_eq!(config.preset, "angular");
/// assert_eq!(config.tag_format, "v${version}");
/// ```
pub fn resolve_release(
    raw: &Value,
    settings: &Settings,
    env: &dyn EnvSource,
) -> ConfigResult<ReleaseConfig> {
    let empty = Map::new();
    let doc = as_document(raw, &empty)?;
    reject_unknown_keys(doc, RELEASE_KEYS)?;

    let preset = match optional_string(doc, "preset")? {
        Some(preset) if preset.trim().is_empty() => {
            return Err(ConfigError::schema("preset", "must not be empty"))
        }
        Some(preset) => preset,
        None => DEFAULT_PRESET.to_string(),
    };

    let tag_format = match optional_string(doc, "tagFormat")? {
        Some(format) => substitute(&format, env)?,
        None => DEFAULT_TAG_FORMAT.to_string(),
    };
    let placeholders = tag_format.matches(VERSION_PLACEHOLDER).count();
    if placeholders != 1 {
        return Err(ConfigError::schema(
            "tagFormat",
            format!("must contain {VERSION_PLACEHOLDER} exactly once, found {placeholders}"),
        ));
    }

    let repository_url = optional_string(doc, "repositoryUrl")?
        .map(|url| substitute(&url, env))
        .transpose()?;

    let branches = resolve_branches(doc.get("branches"))?;
    let plugins = resolve_plugins(doc.get("plugins"), settings, env)?;

    debug!(
        branches = branches.len(),
        plugins = plugins.len(),
        "resolved release configuration"
    );

    Ok(ReleaseConfig {
        preset,
        branches,
        plugins,
        repository_url,
        tag_format,
        dry_run: optional_bool(doc, "dryRun")?,
        ci: optional_bool(doc, "ci")?,
    })
}

fn resolve_branches(raw: Option<&Value>) -> ConfigResult<Vec<BranchSpec>> {
    let branches = match raw {
        None | Some(Value::Null) => default_branches(),
        Some(Value::Array(items)) => items
            .iter()
            .enumerate()
            .map(|(i, item)| parse_branch(i, item))
            .collect::<ConfigResult<Vec<_>>>()?,
        // A single branch may be given without a list.
        Some(single @ (Value::String(_) | Value::Object(_))) => vec![parse_branch(0, single)?],
        Some(_) => {
            return Err(ConfigError::schema(
                "branches",
                "expected a list of branch names or mappings",
            ))
        }
    };
    validate_branch_set(&branches)?;
    Ok(branches)
}

fn resolve_plugins(
    raw: Option<&Value>,
    settings: &Settings,
    env: &dyn EnvSource,
) -> ConfigResult<Vec<PluginEntry>> {
    let items = match raw {
        None | Some(Value::Null) => return Ok(default_plugins()),
        Some(Value::Array(items)) => items,
        Some(_) => return Err(ConfigError::schema("plugins", "expected a list of plugins")),
    };

    let mut plugins = Vec::with_capacity(items.len());
    for (i, item) in items.iter().enumerate() {
        let entry = match parse_plugin_entry(i, item)? {
            PluginEntry::Configured(name, options) => {
                PluginEntry::Configured(name, substitute_map(&options, env)?)
            }
            bare => bare,
        };
        validate_plugin(&entry, settings)?;
        plugins.push(entry);
    }
    Ok(plugins)
}

/// Resolves a raw commit-lint document into a [`CommitlintConfig`].
///
/// # Errors
///
/// Returns an error for unknown top-level keys, values of the wrong type,
/// unknown rule names and malformed rule entries.
pub fn resolve_commitlint(raw: &Value) -> ConfigResult<CommitlintConfig> {
    let empty = Map::new();
    let doc = as_document(raw, &empty)?;
    reject_unknown_keys(doc, COMMITLINT_KEYS)?;

    let extends = match doc.get("extends") {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::String(name)) => vec![name.clone()],
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| {
                item.as_str().map(str::to_string).ok_or_else(|| {
                    ConfigError::schema("extends", "expected a list of config names")
                })
            })
            .collect::<ConfigResult<_>>()?,
        Some(_) => {
            return Err(ConfigError::schema(
                "extends",
                "expected a config name or a list of names",
            ))
        }
    };

    let mut rules = RuleTable::new();
    match doc.get("rules") {
        None | Some(Value::Null) => {}
        Some(Value::Object(table)) => {
            for (name, value) in table {
                if !COMMITLINT_RULES.iter().any(|known| known == name) {
                    return Err(ConfigError::UnknownRule { rule: name.clone() });
                }
                let rule = RuleConfig::from_value(value).map_err(|e| ConfigError::InvalidRule {
                    rule: name.clone(),
                    reason: e.to_string(),
                })?;
                rules.insert(name.clone(), rule);
            }
        }
        Some(_) => return Err(ConfigError::schema("rules", "expected a mapping of rules")),
    }

    let parser_preset = match doc.get("parserPreset") {
        None | Some(Value::Null) => None,
        Some(preset @ (Value::String(_) | Value::Object(_))) => Some(preset.clone()),
        Some(_) => {
            return Err(ConfigError::schema(
                "parserPreset",
                "expected a preset name or a mapping",
            ))
        }
    };

    let invalid_plugins = || ConfigError::schema("plugins", "expected a list of plugin names");
    let plugins = match doc.get("plugins") {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| item.as_str().map(str::to_string).ok_or_else(invalid_plugins))
            .collect::<ConfigResult<_>>()?,
        Some(_) => return Err(invalid_plugins()),
    };

    let prompt = match doc.get("prompt") {
        None | Some(Value::Null) => None,
        Some(Value::Object(prompt)) => Some(prompt.clone()),
        Some(_) => return Err(ConfigError::schema("prompt", "expected a mapping")),
    };

    // Ignore entries are predicates, which a data file cannot express.
    match doc.get("ignores") {
        None | Some(Value::Null) => {}
        Some(Value::Array(items)) if items.is_empty() => {}
        Some(_) => {
            return Err(ConfigError::schema(
                "ignores",
                "ignore functions can only be declared in a JavaScript configuration",
            ))
        }
    }

    debug!(
        extends = extends.len(),
        rules = rules.len(),
        "resolved commitlint configuration"
    );

    Ok(CommitlintConfig {
        extends,
        rules,
        parser_preset,
        plugins,
        prompt,
        formatter: optional_string(doc, "formatter")?,
        help_url: optional_string(doc, "helpUrl")?,
        default_ignores: optional_bool(doc, "defaultIgnores")?,
    })
}

/// Views a raw document as a mapping; an empty document is an empty mapping.
fn as_document<'a>(
    raw: &'a Value,
    empty: &'a Map<String, Value>,
) -> ConfigResult<&'a Map<String, Value>> {
    match raw {
        Value::Object(map) => Ok(map),
        Value::Null => Ok(empty),
        _ => Err(ConfigError::schema("<root>", "configuration must be a mapping")),
    }
}

fn reject_unknown_keys(doc: &Map<String, Value>, known: &[&str]) -> ConfigResult<()> {
    match doc.keys().find(|key| !known.iter().any(|k| k == key)) {
        Some(key) => Err(ConfigError::UnknownKey { key: key.clone() }),
        None => Ok(()),
    }
}

fn optional_string(doc: &Map<String, Value>, field: &str) -> ConfigResult<Option<String>> {
    match doc.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(_) => Err(ConfigError::schema(field, "expected a string")),
    }
}

fn optional_bool(doc: &Map<String, Value>, field: &str) -> ConfigResult<Option<bool>> {
    match doc.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Bool(b)) => Ok(Some(*b)),
        Some(_) => Err(ConfigError::schema(field, "expected a boolean")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rk_protocol::commitlint_models::RuleLevel;
    use serde_json::json;
    use std::collections::HashMap;

    fn no_env() -> HashMap<String, String> {
        HashMap::new()
    }

    fn sample_release() -> Value {
        json!({
            "preset": "conventionalcommits",
            "branches": ["main", {"name": "beta", "prerelease": true}],
            "plugins": [
                "@semantic-release/commit-analyzer",
                "@semantic-release/release-notes-generator",
                ["@semantic-release/changelog", {"changelogFile": "${CHANGELOG_FILE}"}],
                ["@semantic-release/exec", {
                    "prepareCmd": "echo -n v${nextRelease.version} > ${TMP_TAG_VERSION_NAME_FILE}"
                }],
                ["@semantic-release/git", {"assets": ["${CHANGELOG_FILE}", "pom.xml"]}],
                ["@semantic-release/github", {
                    "assets": [{"path": "target/*.jar"}],
                    "labels": ["release"],
                    "successComment": false
                }]
            ]
        })
    }

    fn sample_env() -> HashMap<String, String> {
        HashMap::from([
            ("CHANGELOG_FILE".to_string(), "CHANGELOG.md".to_string()),
            ("TMP_TAG_VERSION_NAME_FILE".to_string(), "/tmp/tag".to_string()),
        ])
    }

    #[test]
    fn test_resolve_release_defaults() {
        let config = resolve_release(&Value::Null, &Settings::default(), &no_env()).unwrap();
        assert_eq!(config.preset, DEFAULT_PRESET);
        assert_eq!(config.tag_format, DEFAULT_TAG_FORMAT);
        assert_eq!(config.branches, default_branches());
        assert_eq!(config.plugins, default_plugins());
        assert!(config.repository_url.is_none());
    }

    #[test]
    fn test_resolve_release_preserves_plugin_order() {
        let config =
            resolve_release(&sample_release(), &Settings::default(), &sample_env()).unwrap();
        assert_eq!(
            config.plugin_names(),
            vec![
                "@semantic-release/commit-analyzer",
                "@semantic-release/release-notes-generator",
                "@semantic-release/changelog",
                "@semantic-release/exec",
                "@semantic-release/git",
                "@semantic-release/github",
            ]
        );
    }

    #[test]
    fn test_resolve_release_keeps_duplicate_plugins() {
        let raw = json!({
            "branches": ["main"],
            "plugins": [
                ["@semantic-release/exec", {"prepareCmd": "a"}],
                ["@semantic-release/exec", {"publishCmd": "b"}]
            ]
        });
        let config = resolve_release(&raw, &Settings::default(), &no_env()).unwrap();
        assert_eq!(config.plugins.len(), 2);
    }

    #[test]
    fn test_resolve_release_substitutes_env() {
        let config =
            resolve_release(&sample_release(), &Settings::default(), &sample_env()).unwrap();
        let changelog = config.plugins[2].options().unwrap();
        assert_eq!(changelog["changelogFile"], json!("CHANGELOG.md"));

        let exec = config.plugins[3].options().unwrap();
        assert_eq!(
            exec["prepareCmd"],
            json!("echo -n v${nextRelease.version} > /tmp/tag")
        );
    }

    #[test]
    fn test_resolve_release_is_deterministic() {
        let first =
            resolve_release(&sample_release(), &Settings::default(), &sample_env()).unwrap();
        let second =
            resolve_release(&sample_release(), &Settings::default(), &sample_env()).unwrap();
        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }

    #[test]
    fn test_resolve_release_missing_env() {
        let err = resolve_release(&sample_release(), &Settings::default(), &no_env()).unwrap_err();
        assert!(matches!(err, ConfigError::MissingEnv { name } if name == "CHANGELOG_FILE"));
    }

    #[test]
    fn test_resolve_release_rejects_unknown_key() {
        let raw = json!({"branches": ["main"], "plugin": []});
        let err = resolve_release(&raw, &Settings::default(), &no_env()).unwrap_err();
        assert!(matches!(err, ConfigError::UnknownKey { key } if key == "plugin"));
    }

    #[test]
    fn test_resolve_release_rejects_missing_asset_path() {
        let raw = json!({
            "branches": ["main"],
            "plugins": [["@semantic-release/github", {"assets": [{"label": "jar"}]}]]
        });
        let err = resolve_release(&raw, &Settings::default(), &no_env()).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidPluginOption { option, .. } if option == "assets"
        ));
    }

    #[test]
    fn test_resolve_release_rejects_unknown_plugin() {
        let raw = json!({"branches": ["main"], "plugins": ["semantic-release-slack-bot"]});
        let err = resolve_release(&raw, &Settings::default(), &no_env()).unwrap_err();
        assert!(matches!(err, ConfigError::UnknownPlugin { .. }));
    }

    #[test]
    fn test_resolve_release_rejects_malformed_branch() {
        let raw = json!({"branches": ["main", "bad branch"]});
        let err = resolve_release(&raw, &Settings::default(), &no_env()).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidBranch { index: 1, .. }));
    }

    #[test]
    fn test_resolve_release_single_branch_shorthand() {
        let raw = json!({"branches": "main"});
        let config = resolve_release(&raw, &Settings::default(), &no_env()).unwrap();
        assert_eq!(config.branches, vec![BranchSpec::Name("main".to_string())]);
    }

    #[test]
    fn test_resolve_release_tag_format() {
        let raw = json!({"branches": ["main"], "tagFormat": "release-${version}"});
        let config = resolve_release(&raw, &Settings::default(), &no_env()).unwrap();
        assert_eq!(config.tag_format, "release-${version}");

        for bad in ["release", "${version}-${version}"] {
            let raw = json!({"branches": ["main"], "tagFormat": bad});
            assert!(matches!(
                resolve_release(&raw, &Settings::default(), &no_env()),
                Err(ConfigError::Schema { field, .. }) if field == "tagFormat"
            ));
        }
    }

    #[test]
    fn test_resolve_release_type_errors() {
        for raw in [
            json!({"preset": 3}),
            json!({"preset": ""}),
            json!({"dryRun": "yes"}),
            json!({"branches": 5}),
            json!({"plugins": {"a": 1}}),
            json!(["main"]),
        ] {
            assert!(
                matches!(
                    resolve_release(&raw, &Settings::default(), &no_env()),
                    Err(ConfigError::Schema { .. })
                ),
                "accepted {raw}"
            );
        }
    }

    #[test]
    fn test_resolve_commitlint() {
        let raw = json!({
            "extends": "@commitlint/config-conventional",
            "rules": {
                "header-max-length": [2, "always", 100],
                "body-max-line-length": [0]
            },
            "helpUrl": "https://example.com"
        });
        let config = resolve_commitlint(&raw).unwrap();
        assert_eq!(config.extends, vec!["@commitlint/config-conventional"]);
        assert_eq!(config.rules["header-max-length"].level, RuleLevel::Error);
        assert_eq!(config.rules["body-max-line-length"].level, RuleLevel::Disabled);
        assert_eq!(config.help_url.as_deref(), Some("https://example.com"));
    }

    #[test]
    fn test_resolve_commitlint_rejects_unknown_rule() {
        let raw = json!({"rules": {"header-max-lenght": [2, "always", 72]}});
        assert!(matches!(
            resolve_commitlint(&raw),
            Err(ConfigError::UnknownRule { rule }) if rule == "header-max-lenght"
        ));
    }

    #[test]
    fn test_resolve_commitlint_rejects_malformed_rule() {
        let raw = json!({"rules": {"type-enum": [2, "sometimes", ["feat"]]}});
        assert!(matches!(
            resolve_commitlint(&raw),
            Err(ConfigError::InvalidRule { rule, .. }) if rule == "type-enum"
        ));
    }

    #[test]
    fn test_resolve_commitlint_rejects_unknown_key() {
        let raw = json!({"extends": [], "parserOpts": {}});
        assert!(matches!(
            resolve_commitlint(&raw),
            Err(ConfigError::UnknownKey { key }) if key == "parserOpts"
        ));
    }

    #[test]
    fn test_resolve_commitlint_inline_parser_preset() {
        let raw = json!({
            "parserPreset": {"parserOpts": {"headerPattern": "^(\\w*): (.*)$"}},
            "plugins": ["commitlint-plugin-function-rules"],
            "prompt": {"settings": {"enableMultipleScopes": true}}
        });
        let config = resolve_commitlint(&raw).unwrap();
        assert_eq!(
            config.parser_preset,
            Some(json!({"parserOpts": {"headerPattern": "^(\\w*): (.*)$"}}))
        );
        assert_eq!(config.plugins, vec!["commitlint-plugin-function-rules"]);
        assert!(config.prompt.is_some());

        let named = resolve_commitlint(&json!({"parserPreset": "conventional-changelog-atom"}))
            .unwrap();
        assert_eq!(named.parser_preset, Some(json!("conventional-changelog-atom")));
    }

    #[test]
    fn test_resolve_commitlint_field_types() {
        for raw in [
            json!({"parserPreset": 3}),
            json!({"plugins": "commitlint-plugin-function-rules"}),
            json!({"plugins": [{"rules": {}}]}),
            json!({"prompt": ["x"]}),
        ] {
            assert!(
                matches!(resolve_commitlint(&raw), Err(ConfigError::Schema { .. })),
                "accepted {raw}"
            );
        }
    }

    #[test]
    fn test_resolve_commitlint_ignores() {
        assert!(resolve_commitlint(&json!({"ignores": []})).is_ok());
        assert!(matches!(
            resolve_commitlint(&json!({"ignores": ["WIP"]})),
            Err(ConfigError::Schema { field, .. }) if field == "ignores"
        ));
    }

    #[test]
    fn test_resolve_commitlint_keeps_rule_order() {
        let raw = json!({
            "rules": {
                "type-enum": [2, "always", ["feat"]],
                "body-max-line-length": [0],
                "header-max-length": [2, "always", 100]
            }
        });
        let config = resolve_commitlint(&raw).unwrap();
        let names: Vec<&String> = config.rules.keys().collect();
        assert_eq!(names, vec!["type-enum", "body-max-line-length", "header-max-length"]);
    }
}
