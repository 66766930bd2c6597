//! Configuration loading and resolution.
//!
//! This module discovers the release and commit-lint configuration files of
//! a project, validates them, and produces the resolved structure handed to
//! the release engine.

pub mod branches;
pub mod error;
pub mod loader;
pub mod models;
pub mod resolver;
