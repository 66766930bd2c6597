//! Configuration discovery and loading.
//!
//! This module finds the release and commit-lint configuration files of a
//! project, parses them, follows local `extends` references, and hands the
//! merged documents to the resolvers:
//! - `package.json` (`release` / `commitlint` keys)
//! - `.releaserc`, `.releaserc.json`, `.releaserc.yaml`, `.releaserc.yml`
//! - `.commitlintrc`, `.commitlintrc.json`, `.commitlintrc.yaml`,
//!   `.commitlintrc.yml`
//! - `releasekit.toml`: tool settings
//!
//! JavaScript and TypeScript configuration files are recognised but never
//! evaluated; finding one is an error.

use crate::config::error::ConfigError;
use crate::config::error::ConfigResult;
use crate::config::models::{
    Candidate, DocumentFormat, LoadedDocument, COMMITLINT_CANDIDATES, RELEASE_CANDIDATES,
    SETTINGS_FILE,
};
use crate::config::resolver::{resolve_commitlint, resolve_release};
use crate::env::{require_all, EnvSource};
use rk_protocol::resolved_models::ResolvedConfig;
use rk_protocol::settings_models::Settings;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Loads and resolves all configuration of the project at `root`.
///
/// A project without release configuration resolves to the release engine's
/// defaults. Commit-lint configuration is optional.
///
/// # Errors
///
/// Returns `ConfigError` if:
/// - A variable listed in `settings.required_env` is not set
/// - A file exists but cannot be read or parsed
/// - An `extends` reference cannot be followed
/// - Either document fails validation
/// - A script configuration file is found
///
/// A validation error names the file that supplied the offending top-level
/// key, which may be a file reached through `extends`. Errors that cannot be
/// tied to one key, such as an unset environment variable, name the file
/// discovery found.
///
/// # Example
///
/// ```rust,no_run
/// use rk_core::config::loader::{load_config, load_settings};
/// use rk_core::env::ProcessEnv;
/// use std::path::Path;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let root = Path::new(".");
/// let settings = load_settings(root)?;
/// let config = load_config(root, &settings, &ProcessEnv)?;
/// println!("{} plugins", config.release.plugins.len());
/// # Ok(())
/// # }
/// ```
pub fn load_config(
    root: &Path,
    settings: &Settings,
    env: &dyn EnvSource,
) -> ConfigResult<ResolvedConfig> {
    require_all(&settings.required_env, env)?;

    let mut sources = Vec::new();

    let release = match find_document(root, RELEASE_CANDIDATES)? {
        Some(doc) => {
            debug!(path = %doc.path.display(), "found release configuration");
            sources.push(doc.path.clone());
            let mut walk = ExtendsWalk {
                stack: vec![canonical(&doc.path)?],
                sources: &mut sources,
                origins: HashMap::new(),
            };
            let merged = walk.expand(&doc.path, doc.value)?;
            let origins = walk.origins;

            resolve_release(&merged, settings, env).map_err(|e| {
                let path = e
                    .field()
                    .and_then(|key| origins.get(key))
                    .unwrap_or(&doc.path);
                e.in_file(path)
            })?
        }
        None => {
            debug!(root = %root.display(), "no release configuration found, using defaults");
            resolve_release(&Value::Null, settings, env)?
        }
    };

    let commitlint = match find_document(root, COMMITLINT_CANDIDATES)? {
        Some(doc) => {
            debug!(path = %doc.path.display(), "found commitlint configuration");
            sources.push(doc.path.clone());
            Some(resolve_commitlint(&doc.value).map_err(|e| e.in_file(&doc.path))?)
        }
        None => None,
    };

    Ok(ResolvedConfig {
        release,
        commitlint,
        sources,
    })
}

/// Loads tool settings from `releasekit.toml`.
///
/// Returns default settings if the file does not exist.
pub fn load_settings(root: &Path) -> ConfigResult<Settings> {
    let settings_path = root.join(SETTINGS_FILE);

    if !settings_path.exists() {
        return Ok(Settings::default());
    }

    let content =
        std::fs::read_to_string(&settings_path).map_err(|source| ConfigError::FileRead {
            path: settings_path.clone(),
            source,
        })?;

    let settings: Settings =
        toml::from_str(&content).map_err(|source| ConfigError::TomlParse {
            path: settings_path,
            source,
        })?;

    Ok(settings)
}

/// Returns the first candidate document present under `root`.
pub fn find_document(
    root: &Path,
    candidates: &[Candidate],
) -> ConfigResult<Option<LoadedDocument>> {
    for candidate in candidates {
        let path = root.join(candidate.file_name);
        if !path.is_file() {
            continue;
        }

        let value = read_document(&path, candidate.format)?;
        let value = match candidate.key {
            Some(key) => match value.get(key) {
                Some(section) => section.clone(),
                None => continue,
            },
            None => value,
        };

        return Ok(Some(LoadedDocument { path, value }));
    }
    Ok(None)
}

/// Reads and parses one document. An empty YAML file is an empty document.
///
/// Script files are rejected without being read.
pub fn read_document(path: &Path, format: DocumentFormat) -> ConfigResult<Value> {
    let read = || {
        std::fs::read_to_string(path).map_err(|source| ConfigError::FileRead {
            path: path.to_path_buf(),
            source,
        })
    };

    match format {
        DocumentFormat::Script => Err(ConfigError::ScriptConfig {
            path: path.to_path_buf(),
        }),
        DocumentFormat::Yaml => {
            let content = read()?;
            if content.trim().is_empty() {
                return Ok(Value::Null);
            }
            serde_yaml::from_str(&content).map_err(|source| ConfigError::YamlParse {
                path: path.to_path_buf(),
                source,
            })
        }
        DocumentFormat::Json => {
            let content = read()?;
            serde_json::from_str(&content).map_err(|source| ConfigError::JsonParse {
                path: path.to_path_buf(),
                source,
            })
        }
    }
}

/// State threaded through an `extends` walk.
struct ExtendsWalk<'a> {
    /// Canonical paths of the documents currently being expanded.
    stack: Vec<PathBuf>,
    sources: &'a mut Vec<PathBuf>,
    /// File that supplied each top-level key of the merged document.
    origins: HashMap<String, PathBuf>,
}

impl ExtendsWalk<'_> {
    /// Replaces the `extends` key of `value` with the contents it references.
    ///
    /// References are local paths relative to the referencing file. They are
    /// merged in order, later ones overriding earlier ones key by key, and the
    /// referencing document overrides them all.
    fn expand(&mut self, path: &Path, value: Value) -> ConfigResult<Value> {
        let mut own = match value {
            Value::Object(map) => map,
            other => return Ok(other),
        };

        let mut merged = Map::new();
        if let Some(extends) = own.remove("extends") {
            for reference in references(path, extends)? {
                let expanded = self.follow(path, &reference)?;
                match expanded {
                    (Value::Object(map), _) => merged.extend(map),
                    (Value::Null, _) => {}
                    (_, target) => {
                        return Err(ConfigError::InvalidConfig {
                            path: target,
                            reason: "extended configuration must be a mapping".to_string(),
                        })
                    }
                }
            }
        }

        for key in own.keys() {
            self.origins.insert(key.clone(), path.to_path_buf());
        }
        merged.extend(own);
        Ok(Value::Object(merged))
    }

    /// Reads and expands one `extends` reference made from `path`.
    fn follow(&mut self, path: &Path, reference: &str) -> ConfigResult<(Value, PathBuf)> {
        let invalid = |reason: String| ConfigError::InvalidConfig {
            path: path.to_path_buf(),
            reason,
        };

        if !(reference.starts_with("./") || reference.starts_with("../")) {
            return Err(invalid(format!(
                "cannot resolve shareable config `{reference}`; use a relative path"
            )));
        }

        let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
        let target = base_dir.join(reference);
        let canonical_target = canonical(&target)?;
        if self.stack.contains(&canonical_target) {
            return Err(invalid(format!("circular `extends` through `{reference}`")));
        }

        debug!(from = %path.display(), to = %target.display(), "following extends");
        let document = read_document(&target, DocumentFormat::from_path(&target))?;
        self.sources.push(target.clone());

        self.stack.push(canonical_target);
        let expanded = self.expand(&target, document)?;
        self.stack.pop();

        Ok((expanded, target))
    }
}

/// Normalises an `extends` value to a list of references.
fn references(path: &Path, extends: Value) -> ConfigResult<Vec<String>> {
    let invalid = |reason: String| ConfigError::InvalidConfig {
        path: path.to_path_buf(),
        reason,
    };

    match extends {
        Value::String(reference) => Ok(vec![reference]),
        Value::Array(items) => items
            .into_iter()
            .map(|item| match item {
                Value::String(reference) => Ok(reference),
                other => Err(invalid(format!(
                    "`extends` entries must be strings, got {other}"
                ))),
            })
            .collect(),
        other => Err(invalid(format!(
            "`extends` must be a path or a list of paths, got {other}"
        ))),
    }
}

fn canonical(path: &Path) -> ConfigResult<PathBuf> {
    path.canonicalize().map_err(|source| ConfigError::FileRead {
        path: path.to_path_buf(),
        source,
    })
}
