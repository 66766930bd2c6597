//! Subcommand implementations.

use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use colored::Colorize;
use rk_core::config::error::ConfigResult;
use rk_core::config::loader::{load_config, load_settings};
use rk_core::env::ProcessEnv;
use rk_core::init::{generate_release_structure, InitOptions};
use rk_core::plugins::REGISTRY;
use rk_protocol::release_models::BranchKind;
use rk_protocol::resolved_models::ResolvedConfig;
use std::fs;
use std::path::Path;

fn resolve(root: &Path) -> ConfigResult<ResolvedConfig> {
    let settings = load_settings(root)?;
    load_config(root, &settings, &ProcessEnv)
}

pub fn run_resolve(root: &Path, output: Option<&Path>, compact: bool) -> Result<()> {
    let config = resolve(root)?;

    let mut json = if compact {
        serde_json::to_string(&config)?
    } else {
        serde_json::to_string_pretty(&config)?
    };
    json.push('\n');

    match output {
        Some(path) => fs::write(path, json)
            .wrap_err_with(|| format!("failed to write {}", path.display()))?,
        None => print!("{json}"),
    }
    Ok(())
}

/// Prints a validation summary. Returns false if the configuration is invalid.
pub fn run_check(root: &Path) -> bool {
    let config = match resolve(root) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{} {}", "✗".red().bold(), e);
            return false;
        }
    };

    if config.sources.is_empty() {
        println!("{} no configuration files found, using defaults", "!".yellow().bold());
    }
    for source in &config.sources {
        println!("{} {}", "✓".green().bold(), source.display());
    }

    let release = &config.release;
    println!("  {} {}", "preset:".bold(), release.preset);
    println!("  {} {}", "tag format:".bold(), release.tag_format);

    println!("  {}", "branches:".bold());
    for branch in &release.branches {
        let kind = match branch.kind() {
            BranchKind::Release => "release".green(),
            BranchKind::Prerelease => "prerelease".yellow(),
            BranchKind::Maintenance => "maintenance".cyan(),
        };
        println!("    {} ({kind})", branch.name());
    }

    println!("  {}", "plugins:".bold());
    for (i, name) in release.plugin_names().iter().enumerate() {
        println!("    {}. {name}", i + 1);
    }

    if let Some(commitlint) = &config.commitlint {
        println!(
            "  {} {} rules, extends [{}]",
            "commitlint:".bold(),
            commitlint.rules.len(),
            commitlint.extends.join(", ")
        );
    }

    println!("{}", "configuration is valid".green().bold());
    true
}

pub fn run_plugins() {
    for spec in REGISTRY {
        println!("{} - {}", spec.name.bold(), spec.description.dimmed());
        for option in spec.options {
            let marker = if option.required {
                " (required)".red().to_string()
            } else {
                String::new()
            };
            println!("    {}: {}{marker}", option.key, option.kind.describe());
        }
        if !spec.requires_one_of.is_empty() {
            println!("    {} {}", "one of:".yellow(), spec.requires_one_of.join(", "));
        }
    }
}

pub fn run_init(root: &Path, force: bool, minimal: bool) -> Result<()> {
    let written = generate_release_structure(InitOptions {
        target_dir: root.to_path_buf(),
        force,
        minimal,
    })?;

    for path in written {
        println!("{} created {}", "✓".green().bold(), path.display());
    }
    Ok(())
}
