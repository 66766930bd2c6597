//! Test fixtures for creating sample projects.

use std::collections::HashMap;
use std::path::Path;
use tempfile::TempDir;

/// Release configuration shaped like a JVM project publishing to GitHub.
pub const RELEASERC_YML: &str = r#"
extends: ./release/shared.yml
branches:
  - main
  - name: "1.x"
    range: "1.x"
    channel: "1.x"
  - name: beta
    prerelease: true
plugins:
  - "@semantic-release/commit-analyzer"
  - "@semantic-release/release-notes-generator"
  - - "@semantic-release/changelog"
    - changelogFile: "${CHANGELOG_FILE}"
  - - "@semantic-release/exec"
    - prepareCmd: "echo -n v${nextRelease.version} > ${TMP_TAG_VERSION_NAME_FILE}"
  - - "@google/semantic-release-replace-plugin"
    - replacements:
        - files: ["pom.xml"]
          from: "<version>.*</version>"
          to: "<version>${nextRelease.version}</version>"
  - - "@semantic-release/git"
    - assets: ["${CHANGELOG_FILE}", "pom.xml"]
      message: "chore(release): ${nextRelease.version} [skip ci]"
  - - "@semantic-release/github"
    - assets:
        - path: "target/*.jar"
          label: "Application jar"
"#;

/// Shared settings pulled in through `extends`.
pub const SHARED_YML: &str = r#"
preset: conventionalcommits
tagFormat: "release-${version}"
repositoryUrl: "https://github.com/acme/service.git"
"#;

pub const COMMITLINTRC_YML: &str = r#"
extends:
  - "@commitlint/config-conventional"
rules:
  type-enum: [2, always, [feat, fix, docs, chore, refactor]]
  subject-case: [0]
"#;

pub const RELEASEKIT_TOML: &str = r#"
strict = true
required-env = ["CHANGELOG_FILE", "TMP_TAG_VERSION_NAME_FILE"]
"#;

/// Create a temporary project with release, commitlint and tool settings.
///
/// Returns a TempDir that must be kept alive for the test duration.
pub fn create_test_project() -> std::io::Result<TempDir> {
    let temp_dir = tempfile::tempdir()?;
    let root = temp_dir.path();

    write_file(root, ".releaserc.yml", RELEASERC_YML)?;
    write_file(root, "release/shared.yml", SHARED_YML)?;
    write_file(root, ".commitlintrc.yml", COMMITLINTRC_YML)?;
    write_file(root, "releasekit.toml", RELEASEKIT_TOML)?;

    Ok(temp_dir)
}

/// Write `content` to `root/relative`, creating parent directories.
pub fn write_file(root: &Path, relative: &str, content: &str) -> std::io::Result<()> {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, content)
}

/// Environment with both release variables set.
pub fn release_env() -> HashMap<String, String> {
    HashMap::from([
        ("CHANGELOG_FILE".to_string(), "docs/CHANGELOG.md".to_string()),
        (
            "TMP_TAG_VERSION_NAME_FILE".to_string(),
            "/tmp/tag-version".to_string(),
        ),
    ])
}
