//! Well-known configuration file locations.
//!
//! Discovery checks candidates in order and stops at the first file that
//! exists (and, for `package.json`, carries the relevant key). Script files
//! are listed so that a project configured in JavaScript is reported instead
//! of silently falling back to defaults.

use serde_json::Value;
use std::path::Path;
use std::path::PathBuf;

/// Syntax of a configuration document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    /// YAML, which also accepts JSON documents.
    Yaml,
    Json,
    /// JavaScript or TypeScript module; never evaluated.
    Script,
}

impl DocumentFormat {
    /// Picks the format from a file extension; anything unrecognised is YAML.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|s| s.to_str()) {
            Some("json") => Self::Json,
            Some("js" | "cjs" | "mjs" | "ts" | "cts") => Self::Script,
            _ => Self::Yaml,
        }
    }
}

/// A place a configuration document may live.
#[derive(Debug, Clone, Copy)]
pub struct Candidate {
    /// File name relative to the project root.
    pub file_name: &'static str,
    pub format: DocumentFormat,
    /// Key holding the configuration inside a larger document.
    pub key: Option<&'static str>,
}

const fn file(file_name: &'static str, format: DocumentFormat) -> Candidate {
    Candidate {
        file_name,
        format,
        key: None,
    }
}

/// Release configuration locations, in lookup order.
pub const RELEASE_CANDIDATES: &[Candidate] = &[
    Candidate {
        file_name: "package.json",
        format: DocumentFormat::Json,
        key: Some("release"),
    },
    file(".releaserc", DocumentFormat::Yaml),
    file(".releaserc.json", DocumentFormat::Json),
    file(".releaserc.yaml", DocumentFormat::Yaml),
    file(".releaserc.yml", DocumentFormat::Yaml),
    file(".releaserc.js", DocumentFormat::Script),
    file(".releaserc.cjs", DocumentFormat::Script),
    file(".releaserc.mjs", DocumentFormat::Script),
    file("release.config.js", DocumentFormat::Script),
    file("release.config.cjs", DocumentFormat::Script),
    file("release.config.mjs", DocumentFormat::Script),
];

/// Commit-lint configuration locations, in lookup order.
pub const COMMITLINT_CANDIDATES: &[Candidate] = &[
    Candidate {
        file_name: "package.json",
        format: DocumentFormat::Json,
        key: Some("commitlint"),
    },
    file(".commitlintrc", DocumentFormat::Yaml),
    file(".commitlintrc.json", DocumentFormat::Json),
    file(".commitlintrc.yaml", DocumentFormat::Yaml),
    file(".commitlintrc.yml", DocumentFormat::Yaml),
    file(".commitlintrc.js", DocumentFormat::Script),
    file(".commitlintrc.cjs", DocumentFormat::Script),
    file(".commitlintrc.mjs", DocumentFormat::Script),
    file(".commitlintrc.ts", DocumentFormat::Script),
    file(".commitlintrc.cts", DocumentFormat::Script),
    file("commitlint.config.js", DocumentFormat::Script),
    file("commitlint.config.cjs", DocumentFormat::Script),
    file("commitlint.config.mjs", DocumentFormat::Script),
    file("commitlint.config.ts", DocumentFormat::Script),
    file("commitlint.config.cts", DocumentFormat::Script),
];

/// Tool settings file name.
pub const SETTINGS_FILE: &str = "releasekit.toml";

/// A parsed document together with where it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedDocument {
    pub path: PathBuf,
    pub value: Value,
}
