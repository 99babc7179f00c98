//! Plugin settings
//!
//! The data model, compiled-in defaults and the validation rules applied
//! before anything is persisted.

mod types;
mod validate;

pub use types::{
    AUTO_LOAD_WIDGET_CSS, AUTO_LOAD_WIDGET_JS, CACHE_DURATION_SECONDS, CSS_VARIABLE_OVERRIDES,
    DEFAULT_PLAYER_CONFIG, ENABLE_CACHE, LOG_LEVEL, LogLevel, NESTED_KEYS, PLUGIN_NAME,
    SETTING_KEYS, Settings, default_player_config, is_nested_key, is_setting_key,
};
pub use validate::{FieldError, apply_form, downgrade_debug, validate};
