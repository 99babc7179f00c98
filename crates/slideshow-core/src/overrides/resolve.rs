//! Applying overrides onto stored settings

use super::document::OverrideDocument;
use crate::merge::merge_into;
use crate::settings::{Settings, is_nested_key};
use serde_json::Value;
use std::collections::BTreeSet;
use tracing::warn;

/// Settings after overrides, together with where each value came from.
#[derive(Debug, Clone, PartialEq)]
pub struct EffectiveSettings {
    /// Resolved settings (store + overrides)
    pub value: Settings,
    /// The persisted snapshot the overrides were applied to
    pub stored: Settings,
    overridden_keys: BTreeSet<String>,
    document: OverrideDocument,
    environment: Option<String>,
}

impl EffectiveSettings {
    /// Settings with no override document at all.
    pub fn from_stored(stored: Settings) -> Self {
        Self {
            value: stored.clone(),
            stored,
            overridden_keys: BTreeSet::new(),
            document: OverrideDocument::empty(),
            environment: None,
        }
    }

    /// Top-level setting keys currently sourced from the override document.
    pub fn overridden_keys(&self) -> &BTreeSet<String> {
        &self.overridden_keys
    }

    /// Whether a top-level key or dot-path is sourced from the override
    /// document.
    ///
    /// The top-level segment must be one of [`overridden_keys`](Self::overridden_keys),
    /// so an override that was skipped for its type never locks a field.
    /// Deeper segments walk the raw document; see
    /// [`OverrideDocument::is_overridden`].
    pub fn is_overridden(&self, path: &str) -> bool {
        let root = path.split('.').next().unwrap_or(path);
        if !self.overridden_keys.contains(root) {
            return false;
        }
        !path.contains('.')
            || self
                .document
                .is_overridden(path, self.environment.as_deref())
    }

    /// The override document these settings were resolved against
    pub fn document(&self) -> &OverrideDocument {
        &self.document
    }

    /// Active environment name
    pub fn environment(&self) -> Option<&str> {
        self.environment.as_deref()
    }

    /// The active override bucket as JSON (root + `*` + environment).
    pub fn override_bucket(&self) -> Value {
        Value::Object(self.document.bucket(self.environment.as_deref()))
    }
}

/// Layer the override document over `stored`.
///
/// Nested settings deep-merge; every other key is replaced. Each key that is
/// applied is recorded as overridden. A value that does not fit its setting's
/// type is skipped with a warning and not recorded.
pub fn resolve(
    stored: &Settings,
    document: &OverrideDocument,
    environment: Option<&str>,
) -> EffectiveSettings {
    let bucket = document.bucket(environment);
    let mut current = stored.to_value();
    let mut overridden_keys = BTreeSet::new();

    for (key, override_value) in &bucket {
        let mut candidate = current.clone();
        let Some(fields) = candidate.as_object_mut() else {
            break;
        };
        let Some(existing) = fields.get_mut(key) else {
            continue;
        };
        if is_nested_key(key) && existing.is_object() {
            merge_into(existing, override_value);
        } else {
            *existing = override_value.clone();
        }

        match Settings::from_value(candidate.clone()) {
            Ok(_) => {
                current = candidate;
                overridden_keys.insert(key.clone());
            }
            Err(e) => {
                warn!("Ignoring override for {key}: {e}");
            }
        }
    }

    let value = match Settings::from_value(current) {
        Ok(settings) => settings,
        Err(e) => {
            warn!("Override resolution produced invalid settings ({e}); using stored values");
            stored.clone()
        }
    };

    EffectiveSettings {
        value,
        stored: stored.clone(),
        overridden_keys,
        document: document.clone(),
        environment: environment.map(str::to_string),
    }
}
