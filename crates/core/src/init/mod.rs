//! Scaffolding for a new release configuration.
//!
//! Writes a starter `.releaserc.yml`, `.commitlintrc.yml` and, unless a
//! minimal setup is requested, a `releasekit.toml` into a project root.
//!
//! # Example
//!
//! ```no_run
//! use rk_core::init::{generate_release_structure, InitOptions};
//! use std::path::PathBuf;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let written = generate_release_structure(InitOptions {
//!     target_dir: PathBuf::from("."),
//!     force: false,
//!     minimal: false,
//! })?;
//! println!("wrote {} files", written.len());
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod generator;
pub mod templates;

pub use error::{InitError, InitResult};
pub use generator::{generate_release_structure, InitOptions};
pub use templates::{get_template, list_templates};
