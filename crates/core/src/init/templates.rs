//! Embedded starter configuration files.
//!
//! Templates live in the workspace `templates/` directory and are compiled
//! into the binary, so `releasekit init` works without any files on disk.
//! Template names carry no leading dot; the generator maps them to their
//! dotted target names.

use rust_embed::RustEmbed;

/// Files from the workspace `templates/` directory.
///
/// `CARGO_MANIFEST_DIR` is `crates/core`, so `../../templates` is the
/// workspace root's `templates/`.
#[derive(RustEmbed)]
#[folder = "$CARGO_MANIFEST_DIR/../../templates"]
pub struct TemplateAssets;

/// Get template file content by name.
///
/// # Example
/// ```
/// use rk_core::init::templates::get_template;
///
/// let release = get_template("releaserc.yml").expect("releaserc.yml should exist");
/// assert!(release.contains("${CHANGELOG_FILE}"));
/// ```
pub fn get_template(path: &str) -> Option<String> {
    TemplateAssets::get(path).map(|file| String::from_utf8_lossy(file.data.as_ref()).to_string())
}

/// List embedded template names that start with `prefix`, sorted.
pub fn list_templates(prefix: &str) -> Vec<String> {
    let mut names: Vec<String> = TemplateAssets::iter()
        .filter(|path| path.starts_with(prefix))
        .map(|path| path.to_string())
        .collect();
    names.sort();
    names
}
