//! Settings data model and compiled-in defaults

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Top-level setting names, as they appear in override documents and in the
/// persisted record.
pub const PLUGIN_NAME: &str = "pluginName";
pub const AUTO_LOAD_WIDGET_CSS: &str = "autoLoadWidgetCss";
pub const AUTO_LOAD_WIDGET_JS: &str = "autoLoadWidgetJs";
pub const ENABLE_CACHE: &str = "enableCache";
pub const CACHE_DURATION_SECONDS: &str = "cacheDurationSeconds";
pub const LOG_LEVEL: &str = "logLevel";
pub const DEFAULT_PLAYER_CONFIG: &str = "defaultPlayerConfig";
pub const CSS_VARIABLE_OVERRIDES: &str = "cssVariableOverrides";

/// Every known setting key, in declaration order.
pub const SETTING_KEYS: [&str; 8] = [
    PLUGIN_NAME,
    AUTO_LOAD_WIDGET_CSS,
    AUTO_LOAD_WIDGET_JS,
    ENABLE_CACHE,
    CACHE_DURATION_SECONDS,
    LOG_LEVEL,
    DEFAULT_PLAYER_CONFIG,
    CSS_VARIABLE_OVERRIDES,
];

/// Settings whose values are nested mappings; overrides deep-merge into these
/// instead of replacing them.
pub const NESTED_KEYS: [&str; 2] = [DEFAULT_PLAYER_CONFIG, CSS_VARIABLE_OVERRIDES];

/// Whether `key` names a known setting.
pub fn is_setting_key(key: &str) -> bool {
    SETTING_KEYS.contains(&key)
}

/// Whether `key` names a nested (deep-merged) setting.
pub fn is_nested_key(key: &str) -> bool {
    NESTED_KEYS.contains(&key)
}

/// Plugin log level
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Debug,
    Info,
    Warning,
    #[default]
    Error,
}

impl LogLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warning => "warning",
            LogLevel::Error => "error",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warning" => Ok(LogLevel::Warning),
            "error" => Ok(LogLevel::Error),
            other => Err(format!(
                "'{other}' is not one of debug, info, warning, error"
            )),
        }
    }
}

/// Plugin settings
///
/// One logical instance per deployment. Field names serialize in camelCase so
/// the same keys work in override documents, the persisted record and JSON
/// output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    /// Public-facing plugin name
    pub plugin_name: Option<String>,
    /// Inject the widget stylesheet automatically
    pub auto_load_widget_css: bool,
    /// Inject the widget script automatically
    pub auto_load_widget_js: bool,
    /// Enable output caching
    pub enable_cache: bool,
    /// Cache lifetime in seconds (must be >= 1)
    pub cache_duration_seconds: i64,
    /// Plugin log level
    pub log_level: LogLevel,
    /// Default player configuration applied to every slideshow
    pub default_player_config: Map<String, Value>,
    /// Semantic CSS variable name -> value
    pub css_variable_overrides: BTreeMap<String, String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            plugin_name: Some("Slideshow Manager".to_string()),
            auto_load_widget_css: true,
            auto_load_widget_js: true,
            enable_cache: true,
            cache_duration_seconds: 3600,
            log_level: LogLevel::Error,
            default_player_config: default_player_config(),
            css_variable_overrides: BTreeMap::new(),
        }
    }
}

impl Settings {
    /// Serialize into a JSON object keyed by setting name.
    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }

    /// Rebuild settings from a JSON object keyed by setting name.
    pub fn from_value(value: Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(value)
    }

    /// Value of one top-level setting as JSON.
    pub fn field(&self, key: &str) -> Option<Value> {
        match self.to_value() {
            Value::Object(mut map) => map.remove(key),
            _ => None,
        }
    }

    /// Effective public name, falling back to the default when unset or blank.
    pub fn display_name(&self) -> &str {
        match self.plugin_name.as_deref() {
            Some(name) if !name.trim().is_empty() => name,
            _ => "Slideshow Manager",
        }
    }
}

/// The compiled-in default player configuration.
pub fn default_player_config() -> Map<String, Value> {
    let value = json!({
        // Layout
        "slidesPerView": 1,
        "spaceBetween": 0,
        "centeredSlides": false,

        // Navigation
        "navigation": true,
        "navigationVisibility": "default",

        // Pagination
        "pagination": {
            "enabled": true,
            "clickable": true,
            "type": "bullets"
        },
        "paginationVisibility": "default",

        // Autoplay
        "autoplay": {
            "enabled": false,
            "delay": 3000,
            "disableOnInteraction": false
        },

        // Behavior
        "loop": true,
        "speed": 300,
        "effect": "slide",

        // Grid
        "grid": {
            "enabled": false,
            "rows": 1,
            "fill": "row"
        },

        // Controls
        "keyboard": {"enabled": true, "onlyInViewport": true},
        "mousewheel": {"enabled": false, "forceToAxis": true},
        "scrollbar": {"enabled": false, "draggable": true},
        "hashNavigation": {"enabled": false, "watchState": false},

        // Advanced
        "freeMode": {"enabled": false, "sticky": false},
        "lazy": {"enabled": false, "loadPrevNext": 1},
        "parallax": {"enabled": false},
        "zoom": {"enabled": false, "maxRatio": 3, "minRatio": 1},
        "virtual": {"enabled": false},
        "a11y": {"enabled": true},

        "breakpoints": [
            {"width": 0, "slidesPerView": 1, "spaceBetween": 0},
            {"width": 640, "slidesPerView": 1, "spaceBetween": 10},
            {"width": 768, "slidesPerView": 2, "spaceBetween": 20},
            {"width": 1024, "slidesPerView": 3, "spaceBetween": 30}
        ]
    });

    match value {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.plugin_name.as_deref(), Some("Slideshow Manager"));
        assert!(settings.auto_load_widget_css);
        assert!(settings.auto_load_widget_js);
        assert!(settings.enable_cache);
        assert_eq!(settings.cache_duration_seconds, 3600);
        assert_eq!(settings.log_level, LogLevel::Error);
        assert!(settings.css_variable_overrides.is_empty());
        assert_eq!(settings.default_player_config["speed"], 300);
        assert_eq!(settings.default_player_config["breakpoints"].as_array().unwrap().len(), 4);
    }

    #[test]
    fn test_settings_serialize_camel_case() {
        let value = Settings::default().to_value();
        let map = value.as_object().unwrap();
        for key in SETTING_KEYS {
            assert!(map.contains_key(key), "missing {key}");
        }
        assert_eq!(map[LOG_LEVEL], "error");
    }

    #[test]
    fn test_settings_partial_json_fills_defaults() {
        let settings: Settings =
            serde_json::from_str(r#"{"cacheDurationSeconds": 60, "logLevel": "info"}"#).unwrap();
        assert_eq!(settings.cache_duration_seconds, 60);
        assert_eq!(settings.log_level, LogLevel::Info);
        assert!(settings.enable_cache);
    }

    #[test]
    fn test_log_level_from_str() {
        assert_eq!("DEBUG".parse::<LogLevel>().unwrap(), LogLevel::Debug);
        assert_eq!(" warning ".parse::<LogLevel>().unwrap(), LogLevel::Warning);
        assert!("verbose".parse::<LogLevel>().is_err());
    }

    #[test]
    fn test_display_name_falls_back() {
        let mut settings = Settings::default();
        settings.plugin_name = Some("  ".to_string());
        assert_eq!(settings.display_name(), "Slideshow Manager");
        settings.plugin_name = Some("Carousels".to_string());
        assert_eq!(settings.display_name(), "Carousels");
    }

    #[test]
    fn test_key_classification() {
        assert!(is_setting_key("cacheDurationSeconds"));
        assert!(!is_setting_key("production"));
        assert!(is_nested_key("defaultPlayerConfig"));
        assert!(!is_nested_key("logLevel"));
    }
}
