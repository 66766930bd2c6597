//! # rk-core
//!
//! Release configuration discovery, validation and resolution.
//!
//! This crate provides:
//! - Configuration loading from well-known project files
//! - Schema validation of branches, plugins and commit-lint rules
//! - Environment variable substitution in option values
//! - Generation of starter configuration files
//!
//! ## Modules
//!
//! - [`config`]: Discovery, loading and resolution
//! - [`env`]: `${NAME}` substitution from an injectable environment
//! - [`plugins`]: Plugin registry and option validation
//! - [`init`]: Starter file generation

pub mod config;
pub mod env;
pub mod init;
pub mod plugins;
