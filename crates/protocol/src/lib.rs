//! # rk-protocol
//!
//! Shared configuration models for releasekit.
//!
//! This crate defines the resolved, read-only structures produced by the
//! configuration resolver and consumed by the external release engine:
//! - Release configuration (preset, branches, ordered plugin pipeline)
//! - Commit-lint configuration (shared presets and rule table)
//! - Tool settings from `releasekit.toml`
//! - The aggregate document emitted by `releasekit resolve`
//!
//! ## Modules
//!
//! - [`release_models`]: Release branches and plugin entries
//! - [`commitlint_models`]: Commit-lint rules
//! - [`settings_models`]: Tool settings from `releasekit.toml`
//! - [`resolved_models`]: The aggregate output document
//!
//! ## Design Principles
//!
//! - Minimal dependencies: serde, serde_json, indexmap and ts-rs
//! - TypeScript generation: Public types derive `TS` for JS consumers
//! - Independent compilation: No dependencies on other releasekit crates

pub mod commitlint_models;
pub mod release_models;
pub mod resolved_models;
pub mod settings_models;

// Re-export all public types for convenience
pub use commitlint_models::*;
pub use release_models::*;
pub use resolved_models::*;
pub use settings_models::*;
