//! Writes starter configuration files into a project.

use super::error::{InitError, InitResult};
use super::templates::get_template;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Embedded template name and the file name it is written to.
const RELEASE_FILES: &[(&str, &str)] = &[
    ("releaserc.yml", ".releaserc.yml"),
    ("commitlintrc.yml", ".commitlintrc.yml"),
];

const SETTINGS_FILES: &[(&str, &str)] = &[("releasekit.toml", "releasekit.toml")];

/// Options for scaffolding a release configuration.
#[derive(Debug, Clone)]
pub struct InitOptions {
    /// Project root the files are written into.
    pub target_dir: PathBuf,
    /// Overwrite files that already exist.
    pub force: bool,
    /// Skip the `releasekit.toml` settings file.
    pub minimal: bool,
}

impl Default for InitOptions {
    fn default() -> Self {
        Self {
            target_dir: std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            force: false,
            minimal: false,
        }
    }
}

/// Generate the starter configuration files.
///
/// Creates `target_dir` if needed and writes:
/// ```text
/// .releaserc.yml
/// .commitlintrc.yml
/// releasekit.toml   (unless minimal)
/// ```
///
/// Existence is checked for every file before anything is written, so a
/// refused run leaves the directory untouched.
///
/// # Returns
/// The paths written, in the order above. Fails with `InitError::FileExists`
/// if a target exists and `force` is not set.
pub fn generate_release_structure(options: InitOptions) -> InitResult<Vec<PathBuf>> {
    let mut files: Vec<(&str, &str)> = RELEASE_FILES.to_vec();
    if !options.minimal {
        files.extend_from_slice(SETTINGS_FILES);
    }

    if !options.force {
        if let Some(existing) = files
            .iter()
            .map(|(_, target)| options.target_dir.join(target))
            .find(|path| path.exists())
        {
            return Err(InitError::FileExists(existing));
        }
    }

    fs::create_dir_all(&options.target_dir).map_err(|source| InitError::DirectoryCreate {
        path: options.target_dir.clone(),
        source,
    })?;

    files
        .iter()
        .map(|(template, target)| write_template_file(&options.target_dir, template, target))
        .collect()
}

fn write_template_file(dir: &Path, template: &str, target: &str) -> InitResult<PathBuf> {
    let content =
        get_template(template).ok_or_else(|| InitError::TemplateNotFound(template.to_string()))?;

    let target_path = dir.join(target);
    fs::write(&target_path, content).map_err(|source| InitError::FileWrite {
        path: target_path.clone(),
        source,
    })?;

    debug!(path = %target_path.display(), "wrote template");
    Ok(target_path)
}
