//! Release configuration models for `.releaserc*` files.
//!
//! This module defines the resolved release configuration: the commit
//! convention preset, the branches releases are cut from, and the ordered
//! plugin pipeline handed to the release engine.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Open option payload of a plugin entry.
///
/// Key order is preserved as declared (`serde_json` is built with
/// `preserve_order`).
pub type PluginOptions = serde_json::Map<String, serde_json::Value>;

/// Preset used when the configuration does not name one.
pub const DEFAULT_PRESET: &str = "angular";

/// Tag format used when the configuration does not name one.
pub const DEFAULT_TAG_FORMAT: &str = "v${version}";

/// Placeholder that every tag format must contain exactly once.
pub const VERSION_PLACEHOLDER: &str = "${version}";

/// Fully resolved release configuration.
///
/// # Example
///
/// ```yaml
/// preset: conventionalcommits
/// branches:
///   - main
///   - name: beta
///     prerelease: true
/// plugins:
///   - "@semantic-release/commit-analyzer"
///   - - "@semantic-release/github"
///     - assets:
///         - path: "target/*.jar"
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, TS)]
#[serde(rename_all = "camelCase")]
pub struct ReleaseConfig {
    /// Commit convention preset (e.g., "angular", "conventionalcommits").
    pub preset: String,

    /// Branches releases are made from, in declaration order.
    pub branches: Vec<BranchSpec>,

    /// Plugin pipeline, in evaluation order.
    ///
    /// Order is significant: entries are never reordered or deduplicated.
    #[ts(type = "Array<string | [string, Record<string, unknown>]>")]
    pub plugins: Vec<PluginEntry>,

    /// Git repository URL, when it cannot be inferred by the engine.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repository_url: Option<String>,

    /// Git tag format; contains `${version}` exactly once.
    pub tag_format: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dry_run: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ci: Option<bool>,
}

impl ReleaseConfig {
    /// Names of all plugins, in evaluation order.
    pub fn plugin_names(&self) -> Vec<&str> {
        self.plugins.iter().map(PluginEntry::name).collect()
    }
}

/// A branch-match pattern.
///
/// A branch is either a literal name (or glob) or a detailed entry carrying
/// prerelease, channel and range settings.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, TS)]
#[serde(untagged)]
pub enum BranchSpec {
    /// Bare branch name or glob pattern, e.g. `main` or `+([0-9]).x`.
    Name(String),

    /// Branch with explicit settings.
    Detailed(BranchObject),
}

impl BranchSpec {
    /// Creates a detailed prerelease branch whose identifier is its name.
    pub fn prerelease(name: &str) -> Self {
        Self::Detailed(BranchObject {
            name: name.to_string(),
            prerelease: Some(Prerelease::Flag(true)),
            channel: None,
            range: None,
        })
    }

    /// The branch name or glob pattern.
    pub fn name(&self) -> &str {
        match self {
            Self::Name(name) => name,
            Self::Detailed(branch) => &branch.name,
        }
    }

    /// The prerelease identifier, if this is a prerelease branch.
    ///
    /// `prerelease: true` uses the branch name as identifier.
    pub fn prerelease_id(&self) -> Option<&str> {
        match self {
            Self::Name(_) => None,
            Self::Detailed(branch) => match &branch.prerelease {
                Some(Prerelease::Flag(true)) => Some(&branch.name),
                Some(Prerelease::Id(id)) => Some(id),
                Some(Prerelease::Flag(false)) | None => None,
            },
        }
    }

    /// The version range of a maintenance branch, if declared.
    pub fn range(&self) -> Option<&str> {
        match self {
            Self::Name(_) => None,
            Self::Detailed(branch) => branch.range.as_deref(),
        }
    }

    /// Classifies the branch by the kind of releases it produces.
    pub fn kind(&self) -> BranchKind {
        if self.range().is_some() || self.name().ends_with(".x") {
            BranchKind::Maintenance
        } else if self.prerelease_id().is_some() {
            BranchKind::Prerelease
        } else {
            BranchKind::Release
        }
    }
}

/// Detailed branch entry.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, TS)]
pub struct BranchObject {
    /// Branch name or glob pattern.
    pub name: String,

    /// Marks the branch as a prerelease branch.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prerelease: Option<Prerelease>,

    /// Distribution channel; `false` publishes on the default channel.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(type = "string | false")]
    pub channel: Option<Channel>,

    /// Version range released from a maintenance branch (e.g. `1.x`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range: Option<String>,
}

/// Prerelease marker of a branch: a flag or an explicit identifier.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, TS)]
#[serde(untagged)]
pub enum Prerelease {
    Flag(bool),
    Id(String),
}

/// Distribution channel of a branch.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(untagged)]
pub enum Channel {
    /// Literal `false`: release on the default channel.
    Default(FalseMarker),

    /// Named channel.
    Named(String),
}

/// Marker type that deserializes only from the literal boolean `false`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FalseMarker;

impl<'de> Deserialize<'de> for FalseMarker {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        if bool::deserialize(deserializer)? {
            Err(serde::de::Error::custom("expected false, got true"))
        } else {
            Ok(FalseMarker)
        }
    }
}

impl Serialize for FalseMarker {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_bool(false)
    }
}

/// Kind of releases a branch produces.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, TS)]
#[serde(rename_all = "lowercase")]
pub enum BranchKind {
    /// Patch/minor releases within a fixed range.
    Maintenance,
    /// Regular releases.
    Release,
    /// Prerelease versions tagged with an identifier.
    Prerelease,
}

/// One step of the plugin pipeline.
///
/// Serializes to the engine's native shape: a bare string, or a
/// two-element `[name, options]` array.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum PluginEntry {
    /// Plugin with default options.
    Bare(String),

    /// Plugin with an options payload.
    Configured(String, PluginOptions),
}

impl PluginEntry {
    /// The plugin's package name.
    pub fn name(&self) -> &str {
        match self {
            Self::Bare(name) | Self::Configured(name, _) => name,
        }
    }

    /// The options payload, if any.
    pub fn options(&self) -> Option<&PluginOptions> {
        match self {
            Self::Bare(_) => None,
            Self::Configured(_, options) => Some(options),
        }
    }
}

/// Branches the release engine assumes when none are configured.
pub fn default_branches() -> Vec<BranchSpec> {
    vec![
        BranchSpec::Name("+([0-9])?(.{+([0-9]),x}).x".to_string()),
        BranchSpec::Name("master".to_string()),
        BranchSpec::Name("main".to_string()),
        BranchSpec::Name("next".to_string()),
        BranchSpec::Name("next-major".to_string()),
        BranchSpec::prerelease("beta"),
        BranchSpec::prerelease("alpha"),
    ]
}

/// Plugins the release engine assumes when none are configured.
pub fn default_plugins() -> Vec<PluginEntry> {
    [
        "@semantic-release/commit-analyzer",
        "@semantic-release/release-notes-generator",
        "@semantic-release/npm",
        "@semantic-release/github",
    ]
    .iter()
    .map(|name| PluginEntry::Bare((*name).to_string()))
    .collect()
}
