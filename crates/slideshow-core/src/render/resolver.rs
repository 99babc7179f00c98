//! Content resolution for image and entry slides

use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors looking up slide content
#[derive(Debug, Error)]
pub enum ResolveError {
    /// I/O error
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Catalog is not valid JSON
    #[error("JSON error in {path}: {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// Content source failed
    #[error("Content lookup failed: {message}")]
    Backend { message: String },
}

/// A resolved image
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ResolvedAsset {
    pub url: String,
    #[serde(default)]
    pub title: Option<String>,
}

/// A resolved entry
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ResolvedEntry {
    pub title: String,
}

/// Looks up the content behind image and entry references.
///
/// `Ok(None)` means the reference does not exist; the slide then renders as
/// an empty block. Errors are treated the same way by the renderer, after
/// being logged.
pub trait ContentResolver {
    fn resolve_asset(&self, reference: &str) -> Result<Option<ResolvedAsset>, ResolveError>;

    fn resolve_entry(&self, reference: &str) -> Result<Option<ResolvedEntry>, ResolveError>;
}

/// Resolves nothing. Image and entry slides render empty.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullResolver;

impl ContentResolver for NullResolver {
    fn resolve_asset(&self, _reference: &str) -> Result<Option<ResolvedAsset>, ResolveError> {
        Ok(None)
    }

    fn resolve_entry(&self, _reference: &str) -> Result<Option<ResolvedEntry>, ResolveError> {
        Ok(None)
    }
}

/// Resolver backed by a static JSON catalog:
///
/// ```json
/// {
///   "assets":  {"42": {"url": "/img/sunset.jpg", "title": "Sunset"}},
///   "entries": {"about": {"title": "About us"}}
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CatalogResolver {
    #[serde(default)]
    assets: HashMap<String, ResolvedAsset>,
    #[serde(default)]
    entries: HashMap<String, ResolvedEntry>,
}

impl CatalogResolver {
    /// Parse a catalog from JSON text
    pub fn from_json_str(content: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(content)
    }

    /// Load a catalog file
    pub fn load(path: &Path) -> Result<Self, ResolveError> {
        let content = std::fs::read_to_string(path).map_err(|e| ResolveError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::from_json_str(&content).map_err(|e| ResolveError::Json {
            path: path.to_path_buf(),
            source: e,
        })
    }

    pub fn with_asset(mut self, reference: impl Into<String>, asset: ResolvedAsset) -> Self {
        self.assets.insert(reference.into(), asset);
        self
    }

    pub fn with_entry(mut self, reference: impl Into<String>, title: impl Into<String>) -> Self {
        self.entries.insert(
            reference.into(),
            ResolvedEntry {
                title: title.into(),
            },
        );
        self
    }
}

impl ContentResolver for CatalogResolver {
    fn resolve_asset(&self, reference: &str) -> Result<Option<ResolvedAsset>, ResolveError> {
        Ok(self.assets.get(reference).cloned())
    }

    fn resolve_entry(&self, reference: &str) -> Result<Option<ResolvedEntry>, ResolveError> {
        Ok(self.entries.get(reference).cloned())
    }
}
