//! Override document parsing and bucket resolution

use crate::merge::{merge_maps, path_reachable};
use crate::settings::is_setting_key;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Key of the bucket applied to every environment.
pub const WILDCARD_BUCKET: &str = "*";

/// Errors reading an override document
#[derive(Debug, Error)]
pub enum OverrideError {
    /// I/O error
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// TOML parsing error
    #[error("TOML parsing error in {path}: {source}")]
    Toml {
        path: PathBuf,
        source: toml::de::Error,
    },

    /// Parsed document is not a table
    #[error("Override document must be a table")]
    NotATable,
}

/// A static override document layered over the persisted settings.
///
/// Layout:
///
/// ```toml
/// cacheDurationSeconds = 60        # applies everywhere
///
/// ["*"]                            # applied first in every environment
/// logLevel = "warning"
///
/// [production]                     # applied last when SLIDESHOW_ENV=production
/// logLevel = "error"
///
/// [production.defaultPlayerConfig.autoplay]
/// enabled = true
/// ```
///
/// Any top-level key that is neither a setting nor `*` is an environment
/// bucket.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OverrideDocument {
    raw: Map<String, Value>,
}

impl OverrideDocument {
    /// A document with no overrides
    pub fn empty() -> Self {
        Self::default()
    }

    /// Wrap an already-parsed JSON value.
    pub fn from_value(value: Value) -> Result<Self, OverrideError> {
        match value {
            Value::Object(raw) => Ok(Self { raw }),
            Value::Null => Ok(Self::empty()),
            _ => Err(OverrideError::NotATable),
        }
    }

    /// Parse TOML text. `origin` is only used in error messages.
    pub fn from_toml_str(content: &str, origin: &Path) -> Result<Self, OverrideError> {
        let table: toml::Table = toml::from_str(content).map_err(|e| OverrideError::Toml {
            path: origin.to_path_buf(),
            source: e,
        })?;
        let value = serde_json::to_value(table).map_err(|_| OverrideError::NotATable)?;
        Self::from_value(value)
    }

    /// Load from a TOML file. A missing file is an empty document.
    pub fn load(path: &Path) -> Result<Self, OverrideError> {
        if !path.exists() {
            return Ok(Self::empty());
        }
        let content = std::fs::read_to_string(path).map_err(|e| OverrideError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::from_toml_str(&content, path)
    }

    /// The raw document, exactly as written
    pub fn raw(&self) -> &Map<String, Value> {
        &self.raw
    }

    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    /// Root-level setting keys, then the `*` bucket, then the named
    /// environment bucket, deep-merged in that order.
    pub fn bucket(&self, environment: Option<&str>) -> Map<String, Value> {
        let mut merged: Map<String, Value> = self
            .raw
            .iter()
            .filter(|(key, _)| is_setting_key(key))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();

        for layer in self.layers(environment).into_iter().skip(1) {
            merge_maps(&mut merged, layer);
        }

        merged
    }

    /// Whether the dot-separated `path` is reachable through the literal key
    /// structure of the document, at the root or inside the active buckets.
    ///
    /// This is structural: a key overridden with a value equal to the stored
    /// one still counts as overridden.
    pub fn is_overridden(&self, path: &str, environment: Option<&str>) -> bool {
        let segments: Vec<&str> = path.split('.').collect();
        if segments.iter().any(|s| s.is_empty()) {
            return false;
        }

        let layers = self.layers(environment);
        let (root, buckets) = (layers[0], &layers[1..]);

        if is_setting_key(segments[0]) && path_reachable_in(root, &segments) {
            return true;
        }
        buckets
            .iter()
            .any(|bucket| path_reachable_in(bucket, &segments))
    }

    /// `[root, "*" bucket?, environment bucket?]`
    fn layers(&self, environment: Option<&str>) -> Vec<&Map<String, Value>> {
        let mut layers = vec![&self.raw];
        if let Some(Value::Object(wildcard)) = self.raw.get(WILDCARD_BUCKET) {
            layers.push(wildcard);
        }
        if let Some(name) = environment
            && name != WILDCARD_BUCKET
            && !is_setting_key(name)
            && let Some(Value::Object(bucket)) = self.raw.get(name)
        {
            layers.push(bucket);
        }
        layers
    }
}

fn path_reachable_in(map: &Map<String, Value>, segments: &[&str]) -> bool {
    let Some((first, rest)) = segments.split_first() else {
        return false;
    };
    match map.get(*first) {
        Some(value) => rest.is_empty() || path_reachable(value, rest),
        None => false,
    }
}
