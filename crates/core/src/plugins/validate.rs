//! Plugin entry parsing and option validation.

use crate::config::error::{ConfigError, ConfigResult};
use crate::plugins::registry;
use rk_protocol::release_models::PluginEntry;
use rk_protocol::settings_models::Settings;
use serde_json::Value;
use tracing::warn;

/// Parses one element of the `plugins` list.
///
/// Accepted shapes: `"name"`, `["name"]`, `["name", {options}]`.
pub fn parse_plugin_entry(index: usize, value: &Value) -> ConfigResult<PluginEntry> {
    let invalid = |reason: &str| ConfigError::InvalidPluginEntry {
        index,
        reason: reason.to_string(),
    };

    let entry = match value {
        Value::String(name) => PluginEntry::Bare(name.clone()),
        Value::Array(parts) if parts.len() > 2 => {
            return Err(invalid("expected at most two elements"))
        }
        Value::Array(parts) => match parts.as_slice() {
            [Value::String(name)] | [Value::String(name), Value::Null] => {
                PluginEntry::Bare(name.clone())
            }
            [Value::String(name), Value::Object(options)] => {
                PluginEntry::Configured(name.clone(), options.clone())
            }
            [Value::String(_), _] => return Err(invalid("options must be a mapping")),
            [_, ..] => return Err(invalid("first element must be the plugin name")),
            [] => return Err(invalid("empty plugin entry")),
        },
        _ => return Err(invalid("expected a name or a [name, options] pair")),
    };

    if entry.name().trim().is_empty() {
        return Err(invalid("plugin name is empty"));
    }
    Ok(entry)
}

/// Validates a plugin entry against the registry.
///
/// Plugins listed in `settings.extra_plugins` are accepted with any options.
/// Unknown options of known plugins are logged, or rejected when
/// `settings.strict` is set.
pub fn validate_plugin(entry: &PluginEntry, settings: &Settings) -> ConfigResult<()> {
    let name = entry.name();

    let Some(spec) = registry::find(name) else {
        if settings.extra_plugins.iter().any(|extra| extra == name) {
            return Ok(());
        }
        return Err(ConfigError::UnknownPlugin {
            name: name.to_string(),
        });
    };

    let empty = serde_json::Map::new();
    let options = entry.options().unwrap_or(&empty);

    if let Some(missing) = spec
        .options
        .iter()
        .find(|option| option.required && !options.contains_key(option.key))
    {
        return Err(ConfigError::MissingPluginOption {
            plugin: name.to_string(),
            option: missing.key.to_string(),
        });
    }

    if !spec.requires_one_of.is_empty()
        && !spec.requires_one_of.iter().any(|key| options.contains_key(*key))
    {
        return Err(ConfigError::MissingPluginOption {
            plugin: name.to_string(),
            option: format!("one of {}", spec.requires_one_of.join(", ")),
        });
    }

    for (key, value) in options {
        match spec.option(key) {
            Some(option) => {
                option
                    .kind
                    .check(value)
                    .map_err(|reason| ConfigError::InvalidPluginOption {
                        plugin: name.to_string(),
                        option: key.clone(),
                        reason,
                    })?;
            }
            None if settings.strict => {
                return Err(ConfigError::UnknownPluginOption {
                    plugin: name.to_string(),
                    option: key.clone(),
                });
            }
            None => warn!(plugin = name, option = %key, "ignoring unknown plugin option"),
        }
    }

    Ok(())
}
