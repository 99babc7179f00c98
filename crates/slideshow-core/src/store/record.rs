//! Persisted settings record
//!
//! One logical row. The nested settings are stored as JSON *text* so the
//! record maps 1:1 onto a relational column layout.

use crate::merge::merge_maps;
use crate::settings::{LogLevel, Settings, default_player_config};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use tracing::warn;

/// Identifier of the single settings row.
pub const SETTINGS_RECORD_ID: u32 = 1;

/// The persisted settings row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsRecord {
    #[serde(default = "default_record_id")]
    pub record_id: u32,
    #[serde(default)]
    pub plugin_name: Option<String>,
    #[serde(default = "default_true", deserialize_with = "loose_bool")]
    pub auto_load_widget_css: bool,
    #[serde(default = "default_true", deserialize_with = "loose_bool")]
    pub auto_load_widget_js: bool,
    /// JSON text
    #[serde(default)]
    pub default_player_config: Option<String>,
    /// JSON text
    #[serde(default)]
    pub css_variable_overrides: Option<String>,
    #[serde(default = "default_true", deserialize_with = "loose_bool")]
    pub enable_cache: bool,
    #[serde(default = "default_cache_duration", deserialize_with = "loose_int")]
    pub cache_duration_seconds: i64,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// RFC 3339
    #[serde(default)]
    pub created_at: String,
    /// RFC 3339
    #[serde(default)]
    pub updated_at: String,
}

fn default_record_id() -> u32 {
    SETTINGS_RECORD_ID
}

fn default_true() -> bool {
    true
}

fn default_cache_duration() -> i64 {
    3600
}

fn default_log_level() -> String {
    LogLevel::default().as_str().to_string()
}

/// Accept `true`/`false`, `0`/`1` and their string forms.
fn loose_bool<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(crate::value::truthy(&value))
}

/// Accept integers and numeric strings.
fn loose_int<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    crate::value::as_int(&value)
        .ok_or_else(|| serde::de::Error::custom(format!("expected an integer, got {value}")))
}

impl SettingsRecord {
    /// Build a record from settings, encoding the nested blobs as JSON text.
    ///
    /// `player_config` and `css_vars` are passed separately so the caller can
    /// hand in already-stripped copies.
    pub fn from_parts(
        settings: &Settings,
        player_config: &Value,
        css_vars: &Value,
        created_at: String,
        updated_at: String,
    ) -> Self {
        Self {
            record_id: SETTINGS_RECORD_ID,
            plugin_name: settings.plugin_name.clone(),
            auto_load_widget_css: settings.auto_load_widget_css,
            auto_load_widget_js: settings.auto_load_widget_js,
            default_player_config: Some(player_config.to_string()),
            css_variable_overrides: Some(css_vars.to_string()),
            enable_cache: settings.enable_cache,
            cache_duration_seconds: settings.cache_duration_seconds,
            log_level: settings.log_level.as_str().to_string(),
            created_at,
            updated_at,
        }
    }

    /// Decode into settings.
    ///
    /// Never fails: malformed blobs and unknown log levels fall back to the
    /// compiled-in defaults with a warning. The stored player config is laid
    /// over the compiled-in one, so keys missing from storage keep their
    /// defaults.
    pub fn to_settings(&self) -> Settings {
        let defaults = Settings::default();

        let log_level = match self.log_level.parse::<LogLevel>() {
            Ok(level) => level,
            Err(message) => {
                warn!("Stored log level is invalid ({message}); using default");
                defaults.log_level
            }
        };

        Settings {
            plugin_name: self.plugin_name.clone(),
            auto_load_widget_css: self.auto_load_widget_css,
            auto_load_widget_js: self.auto_load_widget_js,
            enable_cache: self.enable_cache,
            cache_duration_seconds: self.cache_duration_seconds,
            log_level,
            default_player_config: decode_player_config(self.default_player_config.as_deref()),
            css_variable_overrides: decode_css_vars(self.css_variable_overrides.as_deref()),
        }
    }
}

fn decode_object(raw: Option<&str>, field: &str) -> Option<Map<String, Value>> {
    let raw = raw.map(str::trim).filter(|s| !s.is_empty())?;
    match serde_json::from_str::<Value>(raw) {
        Ok(Value::Object(map)) => Some(map),
        Ok(Value::Null) => None,
        Ok(Value::Array(items)) if items.is_empty() => Some(Map::new()),
        Ok(other) => {
            warn!("Stored {field} is not a mapping (got {other}); using defaults");
            None
        }
        Err(e) => {
            warn!("Stored {field} is not valid JSON ({e}); using defaults");
            None
        }
    }
}

fn decode_player_config(raw: Option<&str>) -> Map<String, Value> {
    let mut config = default_player_config();
    if let Some(stored) = decode_object(raw, "defaultPlayerConfig") {
        merge_maps(&mut config, &stored);
    }
    config
}

fn decode_css_vars(raw: Option<&str>) -> BTreeMap<String, String> {
    let Some(stored) = decode_object(raw, "cssVariableOverrides") else {
        return BTreeMap::new();
    };
    stored
        .into_iter()
        .filter_map(|(name, value)| match value {
            Value::String(s) => Some((name, s)),
            Value::Number(n) => Some((name, n.to_string())),
            _ => None,
        })
        .collect()
}
