//! Settings validation and form-style updates

use super::types::{
    AUTO_LOAD_WIDGET_CSS, AUTO_LOAD_WIDGET_JS, CACHE_DURATION_SECONDS, CSS_VARIABLE_OVERRIDES,
    DEFAULT_PLAYER_CONFIG, ENABLE_CACHE, LOG_LEVEL, LogLevel, PLUGIN_NAME, Settings,
};
use crate::merge::merge_maps;
use crate::value::{as_int, truthy};
use serde_json::{Map, Value};
use thiserror::Error;

/// A single field-level validation failure
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {message}")]
pub struct FieldError {
    /// Setting name (camelCase)
    pub field: String,
    /// Human-readable reason
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Validate settings before they are persisted.
///
/// Returns every failure at once so callers can report them together.
pub fn validate(settings: &Settings) -> Result<(), Vec<FieldError>> {
    let mut errors = Vec::new();

    if settings.cache_duration_seconds < 1 {
        errors.push(FieldError::new(
            CACHE_DURATION_SECONDS,
            format!(
                "must be at least 1 (got {})",
                settings.cache_duration_seconds
            ),
        ));
    }

    if let Some(name) = &settings.plugin_name
        && name.chars().any(char::is_control)
    {
        errors.push(FieldError::new(PLUGIN_NAME, "must not contain control characters"));
    }

    for (name, value) in &settings.css_variable_overrides {
        if value.contains(';') || value.contains('}') {
            errors.push(FieldError::new(
                format!("{CSS_VARIABLE_OVERRIDES}.{name}"),
                "must not contain ';' or '}'",
            ));
        }
    }

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}

/// Coerce `debug` to `info` when dev mode is off.
///
/// Returns `true` when the level was changed; callers decide whether the
/// correction is persisted.
pub fn downgrade_debug(settings: &mut Settings, dev_mode: bool) -> bool {
    if settings.log_level == LogLevel::Debug && !dev_mode {
        settings.log_level = LogLevel::Info;
        true
    } else {
        false
    }
}

/// Apply a posted settings form onto `settings`.
///
/// Keys for which `is_locked` returns `true` (sourced from the override
/// document) are left alone. Boolean fields use form truthiness, the player
/// config deep-merges into the current one, and every unparseable field is
/// reported rather than stopping at the first.
pub fn apply_form(
    settings: &mut Settings,
    form: &Map<String, Value>,
    is_locked: impl Fn(&str) -> bool,
) -> Result<(), Vec<FieldError>> {
    let mut errors = Vec::new();

    for (key, value) in form {
        if is_locked(key) {
            tracing::debug!("Skipping overridden setting {key}");
            continue;
        }

        match key.as_str() {
            PLUGIN_NAME => match value {
                Value::Null => settings.plugin_name = None,
                Value::String(s) => settings.plugin_name = Some(s.clone()),
                _ => errors.push(FieldError::new(key, "must be a string")),
            },
            AUTO_LOAD_WIDGET_CSS => settings.auto_load_widget_css = truthy(value),
            AUTO_LOAD_WIDGET_JS => settings.auto_load_widget_js = truthy(value),
            ENABLE_CACHE => settings.enable_cache = truthy(value),
            CACHE_DURATION_SECONDS => match as_int(value) {
                Some(seconds) if !value.is_boolean() => settings.cache_duration_seconds = seconds,
                _ => errors.push(FieldError::new(key, "must be an integer")),
            },
            LOG_LEVEL => match value.as_str().map(str::parse::<LogLevel>) {
                Some(Ok(level)) => settings.log_level = level,
                Some(Err(message)) => errors.push(FieldError::new(key, message)),
                None => errors.push(FieldError::new(key, "must be a string")),
            },
            DEFAULT_PLAYER_CONFIG => match value {
                Value::Object(posted) => merge_maps(&mut settings.default_player_config, posted),
                _ => errors.push(FieldError::new(key, "must be a mapping")),
            },
            CSS_VARIABLE_OVERRIDES => match value {
                Value::Object(posted) => {
                    for (name, css_value) in posted {
                        match css_value {
                            Value::String(s) => {
                                settings.css_variable_overrides.insert(name.clone(), s.clone());
                            }
                            Value::Null => {
                                settings.css_variable_overrides.remove(name);
                            }
                            Value::Number(n) => {
                                settings.css_variable_overrides.insert(name.clone(), n.to_string());
                            }
                            _ => errors.push(FieldError::new(
                                format!("{key}.{name}"),
                                "must be a string",
                            )),
                        }
                    }
                }
                _ => errors.push(FieldError::new(key, "must be a mapping")),
            },
            _ => errors.push(FieldError::new(key, "unknown setting")),
        }
    }

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}
