//! Shared helpers for configuration integration tests.
//!
//! - Project fixtures written into temporary directories
//! - Assertions over resolved configuration and errors

pub mod assertions;
pub mod fixtures;

#[allow(unused_imports)]
pub use assertions::*;
#[allow(unused_imports)]
pub use fixtures::*;
