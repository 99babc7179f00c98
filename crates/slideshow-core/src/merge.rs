//! Recursive JSON merge utilities
//!
//! Precedence rules for [`deep_merge`]:
//! - object + object: merged key by key, recursively
//! - anything else: the overlay value replaces the base value outright
//!
//! Arrays are treated as scalars (replaced, never concatenated). Breakpoint
//! lists are the only arrays with structure and those are re-keyed by the
//! compiler after merging, not here.

use serde_json::{Map, Value};

/// Merge `overlay` onto `base`, overlay winning at every leaf.
pub fn deep_merge(base: &Value, overlay: &Value) -> Value {
    let mut merged = base.clone();
    merge_into(&mut merged, overlay);
    merged
}

/// In-place variant of [`deep_merge`].
pub fn merge_into(base: &mut Value, overlay: &Value) {
    match (base, overlay) {
        (Value::Object(base_map), Value::Object(overlay_map)) => {
            merge_maps(base_map, overlay_map);
        }
        (base, overlay) => *base = overlay.clone(),
    }
}

/// Merge two JSON objects key by key.
pub fn merge_maps(base: &mut Map<String, Value>, overlay: &Map<String, Value>) {
    for (key, value) in overlay {
        match base.get_mut(key) {
            Some(existing) => merge_into(existing, value),
            None => {
                base.insert(key.clone(), value.clone());
            }
        }
    }
}

/// Remove from `data` every key that is present in `overrides`.
///
/// Where both sides hold an object at the same key the removal recurses, so
/// only the overridden leaves disappear and sibling keys survive. Any other
/// shape in `overrides` removes the whole key.
pub fn strip_overridden(data: &Value, overrides: &Value) -> Value {
    let (Value::Object(data_map), Value::Object(override_map)) = (data, overrides) else {
        return data.clone();
    };

    let mut stripped = Map::new();
    for (key, value) in data_map {
        match override_map.get(key) {
            None => {
                stripped.insert(key.clone(), value.clone());
            }
            Some(override_value @ Value::Object(_)) if value.is_object() => {
                stripped.insert(key.clone(), strip_overridden(value, override_value));
            }
            Some(_) => {}
        }
    }
    Value::Object(stripped)
}

/// Whether `path` can be walked through the literal nested keys of `doc`.
///
/// An empty path is never reachable.
pub fn path_reachable(doc: &Value, path: &[&str]) -> bool {
    if path.is_empty() {
        return false;
    }
    let mut current = doc;
    for segment in path {
        match current.as_object().and_then(|map| map.get(*segment)) {
            Some(next) => current = next,
            None => return false,
        }
    }
    true
}
