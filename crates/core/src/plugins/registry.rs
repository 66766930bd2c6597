//! Catalogue of known plugins and their option schemas.

use serde_json::Value;

/// Shape an option value must have.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionKind {
    String,
    Bool,
    StringList,
    /// A string, or `false` to disable the feature.
    StringOrFalse,
    /// A list of strings, or `false` to disable the feature.
    StringListOrFalse,
    /// A glob string, or a list of globs, glob groups or `{path, ...}`
    /// objects. `false` disables asset handling.
    Assets,
    /// A list of objects, each carrying all of the listed keys.
    Records(&'static [&'static str]),
    Object,
    Array,
    Any,
}

impl OptionKind {
    /// Short description used in error messages and listings.
    pub fn describe(&self) -> String {
        match self {
            Self::String => "string".to_string(),
            Self::Bool => "boolean".to_string(),
            Self::StringList => "list of strings".to_string(),
            Self::StringOrFalse => "string or false".to_string(),
            Self::StringListOrFalse => "list of strings or false".to_string(),
            Self::Assets => "asset list".to_string(),
            Self::Records(keys) => format!("list of {{{}}} objects", keys.join(", ")),
            Self::Object => "object".to_string(),
            Self::Array => "array".to_string(),
            Self::Any => "any".to_string(),
        }
    }

    /// Checks `value` against this kind.
    ///
    /// Returns a human-readable reason on mismatch.
    pub fn check(&self, value: &Value) -> Result<(), String> {
        let expected = || format!("expected {}, got {}", self.describe(), type_name(value));
        match self {
            Self::Any => Ok(()),
            Self::String => value.as_str().map(|_| ()).ok_or_else(expected),
            Self::Bool => value.as_bool().map(|_| ()).ok_or_else(expected),
            Self::Object => value.as_object().map(|_| ()).ok_or_else(expected),
            Self::Array => value.as_array().map(|_| ()).ok_or_else(expected),
            Self::StringList => check_string_list(value).ok_or_else(expected),
            Self::StringOrFalse => match value {
                Value::String(_) | Value::Bool(false) => Ok(()),
                _ => Err(expected()),
            },
            Self::StringListOrFalse => match value {
                Value::Bool(false) => Ok(()),
                _ => check_string_list(value).ok_or_else(expected),
            },
            Self::Assets => check_assets(value),
            Self::Records(keys) => check_records(value, keys),
        }
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn check_string_list(value: &Value) -> Option<()> {
    value
        .as_array()?
        .iter()
        .all(Value::is_string)
        .then_some(())
}

fn check_assets(value: &Value) -> Result<(), String> {
    let items = match value {
        Value::Bool(false) => return Ok(()),
        Value::String(glob) if !glob.is_empty() => return Ok(()),
        Value::Array(items) => items,
        other => return Err(format!("expected asset list, got {}", type_name(other))),
    };

    for (i, item) in items.iter().enumerate() {
        match item {
            Value::String(glob) if !glob.is_empty() => {}
            Value::Array(group) if !group.is_empty() && group.iter().all(Value::is_string) => {}
            Value::Object(asset) => match asset.get("path") {
                Some(Value::String(path)) if !path.is_empty() => {}
                Some(Value::Array(paths))
                    if !paths.is_empty() && paths.iter().all(Value::is_string) => {}
                Some(_) => return Err(format!("asset #{i} has an invalid `path`")),
                None => return Err(format!("asset #{i} is missing required `path`")),
            },
            _ => return Err(format!("asset #{i} must be a glob or an object with a `path`")),
        }
    }
    Ok(())
}

fn check_records(value: &Value, keys: &[&str]) -> Result<(), String> {
    let items = value
        .as_array()
        .ok_or_else(|| format!("expected list of objects, got {}", type_name(value)))?;
    if items.is_empty() {
        return Err("expected at least one entry".to_string());
    }
    for (i, item) in items.iter().enumerate() {
        let record = item
            .as_object()
            .ok_or_else(|| format!("entry #{i} must be an object"))?;
        if let Some(key) = keys.iter().find(|key| !record.contains_key(**key)) {
            return Err(format!("entry #{i} is missing required `{key}`"));
        }
    }
    Ok(())
}

/// Schema of one plugin option.
#[derive(Debug, Clone, Copy)]
pub struct OptionSpec {
    pub key: &'static str,
    pub kind: OptionKind,
    pub required: bool,
}

const fn opt(key: &'static str, kind: OptionKind) -> OptionSpec {
    OptionSpec {
        key,
        kind,
        required: false,
    }
}

const fn req(key: &'static str, kind: OptionKind) -> OptionSpec {
    OptionSpec {
        key,
        kind,
        required: true,
    }
}

/// Schema of one plugin.
#[derive(Debug, Clone, Copy)]
pub struct PluginSpec {
    /// Package name as written in the `plugins` list.
    pub name: &'static str,
    pub description: &'static str,
    pub options: &'static [OptionSpec],
    /// At least one of these options must be present.
    pub requires_one_of: &'static [&'static str],
}

impl PluginSpec {
    pub fn option(&self, key: &str) -> Option<&OptionSpec> {
        self.options.iter().find(|spec| spec.key == key)
    }
}

const EXEC_COMMANDS: &[&str] = &[
    "verifyConditionsCmd",
    "analyzeCommitsCmd",
    "verifyReleaseCmd",
    "generateNotesCmd",
    "prepareCmd",
    "addChannelCmd",
    "publishCmd",
    "successCmd",
    "failCmd",
];

/// All plugins known to the resolver.
pub static REGISTRY: &[PluginSpec] = &[
    PluginSpec {
        name: "@semantic-release/commit-analyzer",
        description: "Determines the release type from commit messages",
        options: &[
            opt("preset", OptionKind::String),
            opt("config", OptionKind::String),
            opt("parserOpts", OptionKind::Object),
            opt("releaseRules", OptionKind::Any),
            opt("presetConfig", OptionKind::Object),
        ],
        requires_one_of: &[],
    },
    PluginSpec {
        name: "@semantic-release/release-notes-generator",
        description: "Generates release notes from commit messages",
        options: &[
            opt("preset", OptionKind::String),
            opt("config", OptionKind::String),
            opt("parserOpts", OptionKind::Object),
            opt("writerOpts", OptionKind::Object),
            opt("linkCompare", OptionKind::Bool),
            opt("linkReferences", OptionKind::Bool),
            opt("presetConfig", OptionKind::Object),
        ],
        requires_one_of: &[],
    },
    PluginSpec {
        name: "@semantic-release/changelog",
        description: "Writes release notes to a changelog file",
        options: &[
            opt("changelogFile", OptionKind::String),
            opt("changelogTitle", OptionKind::String),
        ],
        requires_one_of: &[],
    },
    PluginSpec {
        name: "@semantic-release/git",
        description: "Commits release assets back to the repository",
        options: &[
            opt("assets", OptionKind::Assets),
            opt("message", OptionKind::String),
        ],
        requires_one_of: &[],
    },
    PluginSpec {
        name: "@semantic-release/github",
        description: "Publishes a GitHub release and comments on issues",
        options: &[
            opt("githubUrl", OptionKind::String),
            opt("githubApiPathPrefix", OptionKind::String),
            opt("proxy", OptionKind::Any),
            opt("assets", OptionKind::Assets),
            opt("successComment", OptionKind::StringOrFalse),
            opt("failComment", OptionKind::StringOrFalse),
            opt("failTitle", OptionKind::StringOrFalse),
            opt("labels", OptionKind::StringListOrFalse),
            opt("assignees", OptionKind::StringList),
            opt("releasedLabels", OptionKind::StringListOrFalse),
            opt("addReleases", OptionKind::StringOrFalse),
            opt("draftRelease", OptionKind::Bool),
            opt("releaseNameTemplate", OptionKind::String),
            opt("releaseBodyTemplate", OptionKind::String),
            opt("discussionCategoryName", OptionKind::StringOrFalse),
        ],
        requires_one_of: &[],
    },
    PluginSpec {
        name: "@semantic-release/gitlab",
        description: "Publishes a GitLab release",
        options: &[
            opt("gitlabUrl", OptionKind::String),
            opt("gitlabApiPathPrefix", OptionKind::String),
            opt("assets", OptionKind::Assets),
            opt("milestones", OptionKind::StringList),
            opt("successComment", OptionKind::StringOrFalse),
            opt("failComment", OptionKind::StringOrFalse),
            opt("labels", OptionKind::StringListOrFalse),
            opt("assignee", OptionKind::String),
        ],
        requires_one_of: &[],
    },
    PluginSpec {
        name: "@semantic-release/npm",
        description: "Publishes to an npm registry",
        options: &[
            opt("npmPublish", OptionKind::Bool),
            opt("pkgRoot", OptionKind::String),
            opt("tarballDir", OptionKind::StringOrFalse),
        ],
        requires_one_of: &[],
    },
    PluginSpec {
        name: "@semantic-release/exec",
        description: "Runs shell commands at each release step",
        options: &[
            opt("verifyConditionsCmd", OptionKind::String),
            opt("analyzeCommitsCmd", OptionKind::String),
            opt("verifyReleaseCmd", OptionKind::String),
            opt("generateNotesCmd", OptionKind::String),
            opt("prepareCmd", OptionKind::String),
            opt("addChannelCmd", OptionKind::String),
            opt("publishCmd", OptionKind::String),
            opt("successCmd", OptionKind::String),
            opt("failCmd", OptionKind::String),
            opt("shell", OptionKind::Any),
            opt("execCwd", OptionKind::String),
        ],
        requires_one_of: EXEC_COMMANDS,
    },
    PluginSpec {
        name: "@google/semantic-release-replace-plugin",
        description: "Rewrites version strings in project files",
        options: &[
            req("replacements", OptionKind::Records(&["files", "from", "to"])),
        ],
        requires_one_of: &[],
    },
];

/// Looks up a plugin by package name.
pub fn find(name: &str) -> Option<&'static PluginSpec> {
    REGISTRY.iter().find(|spec| spec.name == name)
}
