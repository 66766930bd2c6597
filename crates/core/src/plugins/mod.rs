//! Plugin registry and option validation.
//!
//! The registry describes the plugins the resolver understands and the
//! options each accepts; [`validate`] checks a plugin entry against it.

pub mod registry;
pub mod validate;

pub use registry::{find, OptionKind, OptionSpec, PluginSpec, REGISTRY};
pub use validate::{parse_plugin_entry, validate_plugin};
