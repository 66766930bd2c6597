//! Custom assertion helpers.

use rk_core::config::error::{ConfigError, ConfigResult};
use rk_protocol::release_models::ReleaseConfig;

/// Assert the plugin names appear exactly in `expected` order.
pub fn assert_plugin_order(config: &ReleaseConfig, expected: &[&str]) {
    assert_eq!(config.plugin_names(), expected, "plugin order changed");
}

/// Unwrap the error of `result`, stripping any file context.
pub fn expect_root_error<T: std::fmt::Debug>(result: ConfigResult<T>) -> ConfigError {
    match result {
        Ok(value) => panic!("expected an error, got {value:?}"),
        Err(ConfigError::InFile { source, .. }) => *source,
        Err(err) => err,
    }
}
