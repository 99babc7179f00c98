//! Player configuration compiler
//!
//! Turns the merged, form-shaped slideshow configuration into the nested
//! document the Swiper widget consumes. Output keys always come out in the
//! same order:
//!
//! 1. allow-listed scalars
//! 2. `navigation`, `pagination`, `autoplay` (object or `false`)
//! 3. `grid` (only when enabled)
//! 4. `breakpoints` (only when non-empty)
//! 5. optional modules (only when enabled)
//!
//! Anything else in the input is dropped.

use crate::merge::merge_maps;
use crate::value::{as_int, as_number, is_blank, truthy, truthy_opt};
use serde::Serialize;
use serde_json::{Map, Value};
use std::cmp::Ordering;
use tracing::warn;

/// Scalars copied through (with coercion) in output order.
pub const SCALAR_KEYS: [&str; 12] = [
    "slidesPerView",
    "spaceBetween",
    "loop",
    "speed",
    "effect",
    "centeredSlides",
    "direction",
    "grabCursor",
    "threshold",
    "touchRatio",
    "allowTouchMove",
    "simulateTouch",
];

/// Scalars coerced to booleans.
pub const BOOLEAN_KEYS: [&str; 5] = [
    "loop",
    "centeredSlides",
    "grabCursor",
    "allowTouchMove",
    "simulateTouch",
];

/// Optional modules copied verbatim when their `enabled` flag is truthy.
pub const MODULE_KEYS: [&str; 10] = [
    "keyboard",
    "mousewheel",
    "scrollbar",
    "hashNavigation",
    "freeMode",
    "lazy",
    "parallax",
    "zoom",
    "virtual",
    "a11y",
];

const DEFAULT_AUTOPLAY_DELAY: i64 = 3000;

/// Compiled, widget-ready configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct PlayerConfig(Map<String, Value>);

impl PlayerConfig {
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }

    /// Compact JSON, as embedded in the `data-swiper-config` attribute.
    pub fn to_json(&self) -> String {
        Value::Object(self.0.clone()).to_string()
    }
}

/// Compile `instance` laid over `defaults` into a player configuration for
/// the slideshow with DOM id `instance_id`.
pub fn compile(
    defaults: &Map<String, Value>,
    instance: &Map<String, Value>,
    instance_id: &str,
) -> PlayerConfig {
    let mut config = defaults.clone();
    merge_maps(&mut config, instance);

    let mut out = Map::new();

    for key in SCALAR_KEYS {
        let Some(value) = config.get(key).filter(|v| !is_blank(v)) else {
            continue;
        };
        let compiled = if BOOLEAN_KEYS.contains(&key) {
            Value::Bool(truthy(value))
        } else {
            match as_number(value) {
                Some(n) => Value::Number(n),
                None => value.clone(),
            }
        };
        out.insert(key.to_string(), compiled);
    }

    out.insert(
        "navigation".to_string(),
        if navigation_enabled(&config) {
            serde_json::json!({
                "nextEl": format!(".swiper-button-next-{instance_id}"),
                "prevEl": format!(".swiper-button-prev-{instance_id}"),
            })
        } else {
            Value::Bool(false)
        },
    );

    out.insert("pagination".to_string(), pagination(&config, instance_id));
    out.insert("autoplay".to_string(), autoplay(&config));

    if truthy_opt(feature(&config, "gridEnabled", "grid", "enabled")) {
        out.insert("grid".to_string(), grid(&config));
    }

    if let Some(breakpoints) = breakpoints(config.get("breakpoints")) {
        out.insert("breakpoints".to_string(), Value::Object(breakpoints));
    }

    for module in MODULE_KEYS {
        if let Some(Value::Object(settings)) = config.get(module)
            && truthy_opt(settings.get("enabled"))
        {
            out.insert(module.to_string(), Value::Object(settings.clone()));
        }
    }

    PlayerConfig(out)
}

/// Read a feature field from its flat form key, falling back to the nested
/// shape. A non-object nested value stands in for its own `enabled` flag.
fn feature<'a>(
    config: &'a Map<String, Value>,
    flat: &str,
    nested: &str,
    field: &str,
) -> Option<&'a Value> {
    if let Some(value) = config.get(flat).filter(|v| !v.is_null()) {
        return Some(value);
    }
    match config.get(nested)? {
        Value::Object(map) => map.get(field),
        other if field == "enabled" => Some(other),
        _ => None,
    }
}

fn navigation_enabled(config: &Map<String, Value>) -> bool {
    match config.get("navigation") {
        Some(Value::Object(map)) => truthy_opt(map.get("enabled")),
        other => truthy_opt(other),
    }
}

fn pagination(config: &Map<String, Value>, instance_id: &str) -> Value {
    if !truthy_opt(feature(config, "paginationEnabled", "pagination", "enabled")) {
        return Value::Bool(false);
    }

    let mut pagination = Map::new();
    pagination.insert(
        "el".to_string(),
        Value::String(format!(".swiper-pagination-{instance_id}")),
    );
    pagination.insert(
        "clickable".to_string(),
        Value::Bool(truthy_opt(feature(
            config,
            "paginationClickable",
            "pagination",
            "clickable",
        ))),
    );
    if let Some(kind) = feature(config, "paginationType", "pagination", "type")
        && truthy(kind)
    {
        pagination.insert("type".to_string(), kind.clone());
    }
    Value::Object(pagination)
}

fn autoplay(config: &Map<String, Value>) -> Value {
    if !truthy_opt(feature(config, "autoplayEnabled", "autoplay", "enabled")) {
        return Value::Bool(false);
    }

    let delay = feature(config, "autoplayDelay", "autoplay", "delay")
        .filter(|v| truthy(v))
        .and_then(as_int)
        .unwrap_or(DEFAULT_AUTOPLAY_DELAY);
    let disable_on_interaction = truthy_opt(feature(
        config,
        "autoplayDisableOnInteraction",
        "autoplay",
        "disableOnInteraction",
    ));

    serde_json::json!({
        "delay": delay,
        "disableOnInteraction": disable_on_interaction,
    })
}

fn grid(config: &Map<String, Value>) -> Value {
    let rows = feature(config, "gridRows", "grid", "rows")
        .filter(|v| truthy(v))
        .and_then(as_int)
        .unwrap_or(1);
    let fill = feature(config, "gridFill", "grid", "fill")
        .filter(|v| truthy(v))
        .and_then(Value::as_str)
        .unwrap_or("row");

    serde_json::json!({"rows": rows, "fill": fill})
}

/// Sort breakpoint entries by width and key them by the stringified width.
/// Entries without a numeric width are skipped.
fn breakpoints(raw: Option<&Value>) -> Option<Map<String, Value>> {
    let mut entries: Vec<(serde_json::Number, &Map<String, Value>)> = raw?
        .as_array()?
        .iter()
        .filter_map(Value::as_object)
        .filter_map(|entry| match entry.get("width").and_then(as_number) {
            Some(width) => Some((width, entry)),
            None => {
                warn!("Skipping breakpoint without a numeric width: {entry:?}");
                None
            }
        })
        .collect();
    if entries.is_empty() {
        return None;
    }

    entries.sort_by(|(a, _), (b, _)| {
        let (a, b) = (a.as_f64().unwrap_or(0.0), b.as_f64().unwrap_or(0.0));
        a.partial_cmp(&b).unwrap_or(Ordering::Equal)
    });

    let mut keyed = Map::new();
    for (width, entry) in entries {
        let slides_per_view = entry
            .get("slidesPerView")
            .and_then(as_number)
            .map(Value::Number)
            .unwrap_or_else(|| Value::from(1));
        let space_between = entry
            .get("spaceBetween")
            .and_then(as_int)
            .unwrap_or(0);

        keyed.insert(
            width.to_string(),
            serde_json::json!({
                "slidesPerView": slides_per_view,
                "spaceBetween": space_between,
            }),
        );
    }
    Some(keyed)
}

/// Decode a stored per-instance configuration.
///
/// Blank input is an empty configuration. Invalid JSON or a non-mapping
/// logs a warning and also yields an empty configuration, so the defaults
/// apply.
pub fn decode_instance_config(raw: Option<&str>) -> Map<String, Value> {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return Map::new();
    };
    match serde_json::from_str::<Value>(raw) {
        Ok(Value::Object(map)) => map,
        Ok(Value::Null) => Map::new(),
        Ok(Value::Array(items)) if items.is_empty() => Map::new(),
        Ok(other) => {
            warn!("Slideshow config is not a mapping (got {other}); using defaults");
            Map::new()
        }
        Err(e) => {
            warn!("Slideshow config is not valid JSON ({e}); using defaults");
            Map::new()
        }
    }
}

/// Utility classes for a navigation/pagination visibility option.
pub fn visibility_classes(visibility: &str) -> &'static str {
    match visibility {
        "hide-mobile" | "desktop-only" => "hidden md:block",
        "hide-desktop" | "mobile-only" => "block md:hidden",
        _ => "",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::default_player_config;
    use serde_json::json;

    fn map(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected an object"),
        }
    }

    #[test]
    fn test_compile_defaults() {
        let config = compile(&default_player_config(), &Map::new(), "hero");

        assert_eq!(config.get("slidesPerView"), Some(&json!(1)));
        assert_eq!(config.get("loop"), Some(&json!(true)));
        assert_eq!(config.get("effect"), Some(&json!("slide")));
        assert_eq!(
            config.get("navigation"),
            Some(&json!({"nextEl": ".swiper-button-next-hero", "prevEl": ".swiper-button-prev-hero"}))
        );
        assert_eq!(
            config.get("pagination"),
            Some(&json!({"el": ".swiper-pagination-hero", "clickable": true, "type": "bullets"}))
        );
        assert_eq!(config.get("autoplay"), Some(&json!(false)));
        assert!(config.get("grid").is_none());
        assert_eq!(config.get("keyboard"), Some(&json!({"enabled": true, "onlyInViewport": true})));
        assert_eq!(config.get("a11y"), Some(&json!({"enabled": true})));
        assert!(config.get("zoom").is_none());
        assert!(config.get("navigationVisibility").is_none());
    }

    #[test]
    fn test_compile_is_deterministic() {
        let instance = map(json!({"speed": "450", "autoplayEnabled": "1"}));
        let first = compile(&default_player_config(), &instance, "a");
        let second = compile(&default_player_config(), &instance, "a");

        assert_eq!(first.to_json(), second.to_json());
    }

    #[test]
    fn test_output_key_order() {
        let instance = map(json!({"gridEnabled": true, "zoom": {"enabled": true}}));
        let config = compile(&default_player_config(), &instance, "a");
        let keys: Vec<&str> = config.as_map().keys().map(String::as_str).collect();

        assert_eq!(
            keys,
            vec![
                "slidesPerView",
                "spaceBetween",
                "loop",
                "speed",
                "effect",
                "centeredSlides",
                "navigation",
                "pagination",
                "autoplay",
                "grid",
                "breakpoints",
                "keyboard",
                "zoom",
                "a11y"
            ]
        );
    }

    #[test]
    fn test_breakpoints_rekeyed_by_width() {
        let instance = map(json!({
            "breakpoints": [
                {"width": 768, "slidesPerView": 2, "spaceBetween": 20},
                {"width": 0, "slidesPerView": 1, "spaceBetween": 0}
            ]
        }));
        let config = compile(&Map::new(), &instance, "a");

        assert_eq!(
            config.get("breakpoints"),
            Some(&json!({
                "0": {"slidesPerView": 1, "spaceBetween": 0},
                "768": {"slidesPerView": 2, "spaceBetween": 20}
            }))
        );
        let keys: Vec<&String> = config.get("breakpoints").unwrap().as_object().unwrap().keys().collect();
        assert_eq!(keys, vec!["0", "768"]);
    }

    #[test]
    fn test_breakpoint_defaults_and_coercion() {
        let instance = map(json!({"breakpoints": [{"width": "480", "slidesPerView": "1.5"}]}));
        let config = compile(&Map::new(), &instance, "a");

        assert_eq!(
            config.get("breakpoints"),
            Some(&json!({"480": {"slidesPerView": 1.5, "spaceBetween": 0}}))
        );
    }

    #[test]
    fn test_breakpoint_without_width_is_skipped() {
        let instance = map(json!({
            "breakpoints": [
                {"width": 0, "slidesPerView": 1},
                {"width": "wide", "slidesPerView": 4},
                {"slidesPerView": 3}
            ]
        }));
        let config = compile(&Map::new(), &instance, "a");

        assert_eq!(
            config.get("breakpoints"),
            Some(&json!({"0": {"slidesPerView": 1, "spaceBetween": 0}}))
        );

        let instance = map(json!({"breakpoints": [{"width": null}]}));
        assert!(compile(&Map::new(), &instance, "a").get("breakpoints").is_none());
    }

    #[test]
    fn test_empty_breakpoints_omitted() {
        let instance = map(json!({"breakpoints": []}));
        let config = compile(&default_player_config(), &instance, "a");
        assert!(config.get("breakpoints").is_none());
    }

    #[test]
    fn test_disabled_features_use_sentinels_but_modules_are_omitted() {
        let instance = map(json!({
            "navigation": false,
            "paginationEnabled": "0",
            "autoplay": {"enabled": false},
            "keyboard": {"enabled": false},
            "a11y": {"enabled": ""}
        }));
        let config = compile(&default_player_config(), &instance, "a");

        assert_eq!(config.get("navigation"), Some(&json!(false)));
        assert_eq!(config.get("pagination"), Some(&json!(false)));
        assert_eq!(config.get("autoplay"), Some(&json!(false)));
        assert!(config.get("keyboard").is_none());
        assert!(config.get("a11y").is_none());
    }

    #[test]
    fn test_flat_form_keys_win_over_nested() {
        let instance = map(json!({
            "paginationClickable": false,
            "paginationType": "fraction",
            "autoplayEnabled": true,
            "autoplayDelay": "5000",
            "autoplayDisableOnInteraction": "1",
            "gridEnabled": "1",
            "gridRows": "2",
            "gridFill": "column"
        }));
        let config = compile(&default_player_config(), &instance, "x");

        assert_eq!(
            config.get("pagination"),
            Some(&json!({"el": ".swiper-pagination-x", "clickable": false, "type": "fraction"}))
        );
        assert_eq!(
            config.get("autoplay"),
            Some(&json!({"delay": 5000, "disableOnInteraction": true}))
        );
        assert_eq!(config.get("grid"), Some(&json!({"rows": 2, "fill": "column"})));
    }

    #[test]
    fn test_autoplay_delay_defaults() {
        let instance = map(json!({"autoplay": {"enabled": true, "delay": ""}}));
        let config = compile(&Map::new(), &instance, "x");
        assert_eq!(
            config.get("autoplay"),
            Some(&json!({"delay": 3000, "disableOnInteraction": false}))
        );
    }

    #[test]
    fn test_scalar_coercion() {
        let instance = map(json!({
            "speed": "500",
            "spaceBetween": 10.0,
            "touchRatio": "0.5",
            "direction": "vertical",
            "grabCursor": "1",
            "simulateTouch": "0",
            "threshold": "",
            "effect": null,
            "unknownKey": 1
        }));
        let config = compile(&Map::new(), &instance, "x");

        assert_eq!(config.get("speed"), Some(&json!(500)));
        assert_eq!(config.get("spaceBetween"), Some(&json!(10)));
        assert_eq!(config.get("touchRatio"), Some(&json!(0.5)));
        assert_eq!(config.get("direction"), Some(&json!("vertical")));
        assert_eq!(config.get("grabCursor"), Some(&json!(true)));
        assert_eq!(config.get("simulateTouch"), Some(&json!(false)));
        assert!(config.get("threshold").is_none());
        assert!(config.get("effect").is_none());
        assert!(config.get("unknownKey").is_none());
    }

    #[test]
    fn test_navigation_object_form() {
        let config = compile(&Map::new(), &map(json!({"navigation": {"enabled": true}})), "n");
        assert!(config.get("navigation").unwrap().is_object());

        let config = compile(&Map::new(), &map(json!({"navigation": {"enabled": "0"}})), "n");
        assert_eq!(config.get("navigation"), Some(&json!(false)));
    }

    #[test]
    fn test_decode_instance_config() {
        assert!(decode_instance_config(None).is_empty());
        assert!(decode_instance_config(Some("  ")).is_empty());
        assert!(decode_instance_config(Some("[]")).is_empty());
        assert!(decode_instance_config(Some("{broken")).is_empty());
        assert!(decode_instance_config(Some("42")).is_empty());
        assert_eq!(decode_instance_config(Some(r#"{"speed": 500}"#))["speed"], 500);
    }

    #[test]
    fn test_visibility_classes() {
        assert_eq!(visibility_classes("hide-mobile"), "hidden md:block");
        assert_eq!(visibility_classes("desktop-only"), "hidden md:block");
        assert_eq!(visibility_classes("hide-desktop"), "block md:hidden");
        assert_eq!(visibility_classes("mobile-only"), "block md:hidden");
        assert_eq!(visibility_classes("default"), "");
    }
}
