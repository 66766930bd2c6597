//! Integration tests for resolving a whole project directory.
//!
//! These tests exercise discovery, `extends`, settings and environment
//! substitution together through `load_config`.

mod common;

use common::*;
use rk_core::config::error::ConfigError;
use rk_core::config::loader::{load_config, load_settings};
use rk_protocol::release_models::{BranchKind, PluginEntry};
use std::collections::HashMap;

#[test]
fn test_full_project_resolves() {
    let project = create_test_project().unwrap();
    let root = project.path();

    let settings = load_settings(root).unwrap();
    assert!(settings.strict);

    let resolved = load_config(root, &settings, &release_env()).unwrap();
    let release = &resolved.release;

    assert_eq!(release.preset, "conventionalcommits");
    assert_eq!(release.tag_format, "release-${version}");
    assert_eq!(
        release.repository_url.as_deref(),
        Some("https://github.com/acme/service.git")
    );

    let kinds: Vec<BranchKind> = release.branches.iter().map(|b| b.kind()).collect();
    assert_eq!(
        kinds,
        vec![BranchKind::Release, BranchKind::Maintenance, BranchKind::Prerelease]
    );

    assert_plugin_order(
        release,
        &[
            "@semantic-release/commit-analyzer",
            "@semantic-release/release-notes-generator",
            "@semantic-release/changelog",
            "@semantic-release/exec",
            "@google/semantic-release-replace-plugin",
            "@semantic-release/git",
            "@semantic-release/github",
        ],
    );

    let commitlint = resolved.commitlint.expect("commitlint config");
    assert_eq!(commitlint.extends, vec!["@commitlint/config-conventional"]);
    assert_eq!(commitlint.rules.len(), 2);

    assert_eq!(
        resolved.sources,
        vec![
            root.join(".releaserc.yml"),
            root.join("release/shared.yml"),
            root.join(".commitlintrc.yml"),
        ]
    );
}

#[test]
fn test_env_values_substituted_and_engine_templates_kept() {
    let project = create_test_project().unwrap();
    let root = project.path();
    let settings = load_settings(root).unwrap();

    let resolved = load_config(root, &settings, &release_env()).unwrap();
    let plugins = &resolved.release.plugins;

    let changelog = plugins[2].options().unwrap();
    assert_eq!(changelog["changelogFile"], "docs/CHANGELOG.md");

    let exec = plugins[3].options().unwrap();
    assert_eq!(
        exec["prepareCmd"],
        "echo -n v${nextRelease.version} > /tmp/tag-version"
    );

    let git = plugins[5].options().unwrap();
    assert_eq!(git["assets"][0], "docs/CHANGELOG.md");
    let keys: Vec<&String> = git.keys().collect();
    assert_eq!(keys, vec!["assets", "message"]);
}

#[test]
fn test_resolution_is_deterministic() {
    let project = create_test_project().unwrap();
    let root = project.path();
    let settings = load_settings(root).unwrap();

    let first = load_config(root, &settings, &release_env()).unwrap();
    let second = load_config(root, &settings, &release_env()).unwrap();

    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}

#[test]
fn test_required_env_checked_before_reading_files() {
    let project = create_test_project().unwrap();
    let root = project.path();
    write_file(root, ".releaserc.yml", "branches: [\n").unwrap();
    let settings = load_settings(root).unwrap();

    let mut env = release_env();
    env.remove("TMP_TAG_VERSION_NAME_FILE");

    let err = expect_root_error(load_config(root, &settings, &env));
    assert!(matches!(err, ConfigError::MissingEnv { name } if name == "TMP_TAG_VERSION_NAME_FILE"));
}

#[test]
fn test_strict_settings_reject_unknown_option() {
    let project = create_test_project().unwrap();
    let root = project.path();
    write_file(
        root,
        ".releaserc.yml",
        "plugins:\n  - [\"@semantic-release/npm\", {npmPublish: false, tarballDirectory: dist}]\n",
    )
    .unwrap();
    let settings = load_settings(root).unwrap();

    let err = expect_root_error(load_config(root, &settings, &release_env()));
    assert!(matches!(
        err,
        ConfigError::UnknownPluginOption { plugin, option }
            if plugin == "@semantic-release/npm" && option == "tarballDirectory"
    ));
}

#[test]
fn test_extra_plugins_accepted() {
    let project = create_test_project().unwrap();
    let root = project.path();
    write_file(
        root,
        "releasekit.toml",
        "extra-plugins = [\"semantic-release-slack-bot\"]\n",
    )
    .unwrap();
    write_file(
        root,
        ".releaserc.yml",
        concat!(
            "plugins:\n",
            "  - \"@semantic-release/commit-analyzer\"\n",
            "  - [semantic-release-slack-bot, {notifyOnSuccess: true}]\n",
        ),
    )
    .unwrap();
    let settings = load_settings(root).unwrap();

    let resolved = load_config(root, &settings, &HashMap::new()).unwrap();
    assert_eq!(
        resolved.release.plugins[1],
        PluginEntry::Configured(
            "semantic-release-slack-bot".to_string(),
            serde_json::from_str(r#"{"notifyOnSuccess": true}"#).unwrap()
        )
    );
}

#[test]
fn test_missing_asset_path_names_file() {
    let project = create_test_project().unwrap();
    let root = project.path();
    write_file(
        root,
        ".releaserc.yml",
        "plugins:\n  - - \"@semantic-release/github\"\n    - assets:\n        - label: jar\n",
    )
    .unwrap();

    let result = load_config(root, &load_settings(root).unwrap(), &release_env());
    let message = result.as_ref().unwrap_err().to_string();
    assert!(message.contains(".releaserc.yml"), "{message}");

    let err = expect_root_error(result);
    assert!(matches!(
        err,
        ConfigError::InvalidPluginOption { option, reason, .. }
            if option == "assets" && reason.contains("missing required `path`")
    ));
}

#[test]
fn test_package_json_release_key() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    write_file(
        root,
        "package.json",
        r#"{
  "name": "service",
  "release": {
    "branches": ["trunk"],
    "plugins": ["@semantic-release/commit-analyzer", "@semantic-release/npm"]
  },
  "commitlint": {"extends": ["@commitlint/config-angular"]}
}"#,
    )
    .unwrap();

    let resolved = load_config(root, &Default::default(), &HashMap::new()).unwrap();
    assert_eq!(resolved.release.branches[0].name(), "trunk");
    assert_plugin_order(
        &resolved.release,
        &["@semantic-release/commit-analyzer", "@semantic-release/npm"],
    );
    assert_eq!(
        resolved.sources,
        vec![root.join("package.json"), root.join("package.json")]
    );
}

#[test]
fn test_unknown_commitlint_rule_rejected() {
    let project = create_test_project().unwrap();
    let root = project.path();
    write_file(root, ".commitlintrc.yml", "rules:\n  subject-lenght: [2, always, 72]\n").unwrap();

    let err = expect_root_error(load_config(
        root,
        &load_settings(root).unwrap(),
        &release_env(),
    ));
    assert!(matches!(err, ConfigError::UnknownRule { rule } if rule == "subject-lenght"));
}
