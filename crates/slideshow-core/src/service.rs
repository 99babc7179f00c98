//! Settings service: load, resolve, cache and save
//!
//! The service owns the persistence backend and the override source and
//! hands out an immutable [`EffectiveSettings`] snapshot. The snapshot is
//! cached until [`SettingsService::invalidate`] or a successful save.

use crate::context::{Environment, Paths};
use crate::merge::strip_overridden;
use crate::overrides::{EffectiveSettings, OverrideDocument, resolve};
use crate::settings::{
    AUTO_LOAD_WIDGET_CSS, AUTO_LOAD_WIDGET_JS, CACHE_DURATION_SECONDS, CSS_VARIABLE_OVERRIDES,
    DEFAULT_PLAYER_CONFIG, ENABLE_CACHE, FieldError, LOG_LEVEL, LogLevel, PLUGIN_NAME, Settings,
    apply_form, downgrade_debug, is_nested_key, validate,
};
use crate::store::{JsonFileStore, PersistenceError, SettingsBackend, SettingsRecord};
use chrono::Utc;
use serde_json::{Map, Value};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use thiserror::Error;
use tracing::{debug, error, info, warn};

/// Why a save was rejected
#[derive(Debug, Error)]
pub enum SaveError {
    /// One or more fields failed validation; nothing was written
    #[error("Settings failed validation: {}", join_field_errors(.0))]
    Validation(Vec<FieldError>),

    /// The backend refused the write
    #[error(transparent)]
    Persistence(#[from] PersistenceError),
}

fn join_field_errors(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Where override documents come from
#[derive(Debug, Clone)]
enum OverrideSource {
    Document(OverrideDocument),
    File(PathBuf),
}

impl OverrideSource {
    fn load(&self) -> OverrideDocument {
        match self {
            OverrideSource::Document(doc) => doc.clone(),
            OverrideSource::File(path) => match OverrideDocument::load(path) {
                Ok(doc) => doc,
                Err(e) => {
                    warn!("Ignoring override file: {e}");
                    OverrideDocument::empty()
                }
            },
        }
    }
}

/// Loads, resolves and persists plugin settings.
pub struct SettingsService {
    backend: Arc<dyn SettingsBackend>,
    overrides: OverrideSource,
    environment: Environment,
    cache: Mutex<Option<Arc<EffectiveSettings>>>,
    debug_downgrade_warned: AtomicBool,
}

impl SettingsService {
    /// Service over `backend` with no overrides.
    pub fn new(backend: Arc<dyn SettingsBackend>, environment: Environment) -> Self {
        Self {
            backend,
            overrides: OverrideSource::Document(OverrideDocument::empty()),
            environment,
            cache: Mutex::new(None),
            debug_downgrade_warned: AtomicBool::new(false),
        }
    }

    /// Standard file layout: JSON record store plus TOML override file.
    pub fn from_paths(paths: &Paths, environment: Environment) -> Self {
        Self::new(
            Arc::new(JsonFileStore::new(&paths.settings_file)),
            environment,
        )
        .with_override_file(&paths.override_file)
    }

    /// Use a fixed, in-memory override document
    pub fn with_override_document(mut self, document: OverrideDocument) -> Self {
        self.overrides = OverrideSource::Document(document);
        self
    }

    /// Re-read the override document from `path` on every load
    pub fn with_override_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.overrides = OverrideSource::File(path.into());
        self
    }

    pub fn environment(&self) -> &Environment {
        &self.environment
    }

    /// Effective settings, loading them on first use.
    ///
    /// Never fails: an unreachable store or a missing row yields the
    /// compiled-in defaults.
    pub fn settings(&self) -> Arc<EffectiveSettings> {
        let mut cache = self.lock_cache();
        if let Some(effective) = cache.as_ref() {
            return Arc::clone(effective);
        }
        let effective = Arc::new(self.load());
        *cache = Some(Arc::clone(&effective));
        effective
    }

    /// Drop the cached snapshot; the next call to [`settings`](Self::settings)
    /// reloads.
    pub fn invalidate(&self) {
        *self.lock_cache() = None;
    }

    /// Invalidate and load again immediately.
    pub fn reload(&self) -> Arc<EffectiveSettings> {
        self.invalidate();
        self.settings()
    }

    /// Whether a top-level key or dot-path is sourced from the override
    /// document.
    pub fn is_overridden(&self, path: &str) -> bool {
        self.settings().is_overridden(path)
    }

    /// Validate and persist `settings`.
    ///
    /// Override-sourced values never reach storage: overridden scalar fields
    /// are written with their persisted value and overridden keys inside the
    /// nested settings are stripped. On a validation failure nothing is
    /// written.
    pub fn save(&self, settings: &Settings) -> Result<(), SaveError> {
        let mut candidate = settings.clone();
        if downgrade_debug(&mut candidate, self.environment.dev_mode) {
            debug!("Saving log level 'info' instead of 'debug' outside dev mode");
        }
        validate(&candidate).map_err(SaveError::Validation)?;

        let effective = self.settings();
        let record = self.build_record(&candidate, &effective)?;
        self.backend.write(&record)?;

        info!("Settings saved");
        self.invalidate();
        Ok(())
    }

    /// Apply a posted settings form over the current effective settings and
    /// save. Overridden scalar fields in the form are ignored.
    pub fn update(&self, form: &Map<String, Value>) -> Result<(), SaveError> {
        let effective = self.settings();
        let mut settings = effective.value.clone();
        apply_form(&mut settings, form, |key| {
            !is_nested_key(key) && effective.is_overridden(key)
        })
        .map_err(SaveError::Validation)?;
        self.save(&settings)
    }

    fn lock_cache(&self) -> MutexGuard<'_, Option<Arc<EffectiveSettings>>> {
        self.cache
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn load(&self) -> EffectiveSettings {
        let (stored, record) = match self.backend.fetch() {
            Ok(Some(record)) => (record.to_settings(), Some(record)),
            Ok(None) => {
                warn!("No stored settings found; using defaults");
                (Settings::default(), None)
            }
            Err(e) => {
                error!("Failed to load settings: {e}; using defaults");
                (Settings::default(), None)
            }
        };

        let document = self.overrides.load();
        let mut effective = resolve(&stored, &document, self.environment.name.as_deref());

        if effective.value.log_level == LogLevel::Debug && !self.environment.dev_mode {
            if effective.is_overridden(LOG_LEVEL) {
                effective.value.log_level = LogLevel::Info;
                if !self.debug_downgrade_warned.swap(true, Ordering::SeqCst) {
                    warn!(
                        "Override sets log level 'debug' outside dev mode; using 'info' for this session"
                    );
                }
            } else {
                effective.value.log_level = LogLevel::Info;
                effective.stored.log_level = LogLevel::Info;
                if let Some(record) = record {
                    self.persist_downgrade(record);
                }
            }
        }

        if let Err(errors) = validate(&effective.value) {
            for e in errors {
                warn!("Invalid setting {e}");
            }
        }

        effective
    }

    fn persist_downgrade(&self, mut record: SettingsRecord) {
        record.log_level = LogLevel::Info.as_str().to_string();
        record.updated_at = Utc::now().to_rfc3339();
        match self.backend.write(&record) {
            Ok(()) => info!("Stored log level 'debug' downgraded to 'info' outside dev mode"),
            Err(e) => warn!("Failed to persist log level downgrade: {e}"),
        }
    }

    fn build_record(
        &self,
        candidate: &Settings,
        effective: &EffectiveSettings,
    ) -> Result<SettingsRecord, PersistenceError> {
        let mut to_write = candidate.clone();
        for key in effective.overridden_keys() {
            if !is_nested_key(key) {
                restore_field(&mut to_write, &effective.stored, key);
            }
        }
        downgrade_debug(&mut to_write, self.environment.dev_mode);

        let bucket = effective.override_bucket();
        let null = Value::Null;
        let applied = |key: &str| {
            bucket
                .get(key)
                .filter(|_| effective.overridden_keys().contains(key))
                .unwrap_or(&null)
        };
        let player_config = strip_overridden(
            &Value::Object(to_write.default_player_config.clone()),
            applied(DEFAULT_PLAYER_CONFIG),
        );
        let css_vars = strip_overridden(
            &Value::Object(
                to_write
                    .css_variable_overrides
                    .iter()
                    .map(|(name, value)| (name.clone(), Value::String(value.clone())))
                    .collect(),
            ),
            applied(CSS_VARIABLE_OVERRIDES),
        );

        let now = Utc::now().to_rfc3339();
        let created_at = match self.backend.fetch()? {
            Some(existing) if !existing.created_at.is_empty() => existing.created_at,
            _ => now.clone(),
        };

        Ok(SettingsRecord::from_parts(
            &to_write,
            &player_config,
            &css_vars,
            created_at,
            now,
        ))
    }
}

/// Copy one scalar setting from `source` into `target`.
fn restore_field(target: &mut Settings, source: &Settings, key: &str) {
    match key {
        PLUGIN_NAME => target.plugin_name = source.plugin_name.clone(),
        AUTO_LOAD_WIDGET_CSS => target.auto_load_widget_css = source.auto_load_widget_css,
        AUTO_LOAD_WIDGET_JS => target.auto_load_widget_js = source.auto_load_widget_js,
        ENABLE_CACHE => target.enable_cache = source.enable_cache,
        CACHE_DURATION_SECONDS => target.cache_duration_seconds = source.cache_duration_seconds,
        LOG_LEVEL => target.log_level = source.log_level,
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use serde_json::json;

    fn stored_record(settings: &Settings) -> SettingsRecord {
        SettingsRecord::from_parts(
            settings,
            &Value::Object(settings.default_player_config.clone()),
            &json!({}),
            "2026-01-01T00:00:00+00:00".to_string(),
            "2026-01-01T00:00:00+00:00".to_string(),
        )
    }

    fn doc(value: Value) -> OverrideDocument {
        OverrideDocument::from_value(value).unwrap()
    }

    #[test]
    fn test_missing_row_yields_defaults() {
        let store = Arc::new(MemoryStore::new());
        let service = SettingsService::new(store, Environment::default());

        assert_eq!(service.settings().value, Settings::default());
    }

    #[test]
    fn test_unreachable_store_yields_defaults() {
        let store = Arc::new(MemoryStore::with_record(stored_record(&Settings {
            cache_duration_seconds: 10,
            ..Settings::default()
        })));
        store.set_unreachable(true);
        let service = SettingsService::new(store, Environment::default());

        assert_eq!(service.settings().value.cache_duration_seconds, 3600);
    }

    #[test]
    fn test_settings_are_cached_until_invalidated() {
        let store = Arc::new(MemoryStore::new());
        let service = SettingsService::new(store.clone(), Environment::default());
        let first = service.settings();

        store
            .write(&stored_record(&Settings {
                cache_duration_seconds: 99,
                ..Settings::default()
            }))
            .unwrap();
        assert!(Arc::ptr_eq(&first, &service.settings()));

        service.invalidate();
        assert_eq!(service.settings().value.cache_duration_seconds, 99);
    }

    #[test]
    fn test_override_wins_and_persisted_value_survives_save() {
        let store = Arc::new(MemoryStore::with_record(stored_record(&Settings::default())));
        let service = SettingsService::new(store.clone(), Environment::default())
            .with_override_document(doc(json!({"cacheDurationSeconds": 60})));

        let effective = service.settings();
        assert_eq!(effective.value.cache_duration_seconds, 60);
        assert!(service.is_overridden("cacheDurationSeconds"));

        let mut edited = effective.value.clone();
        edited.enable_cache = false;
        service.save(&edited).unwrap();

        let record = store.record().unwrap();
        assert_eq!(record.cache_duration_seconds, 3600);
        assert!(!record.enable_cache);
        assert_eq!(record.created_at, "2026-01-01T00:00:00+00:00");
        assert_ne!(record.updated_at, "2026-01-01T00:00:00+00:00");

        assert_eq!(service.settings().value.cache_duration_seconds, 60);

        let plain = SettingsService::new(store, Environment::default());
        assert_eq!(plain.settings().value.cache_duration_seconds, 3600);
    }

    #[test]
    fn test_save_strips_overridden_nested_keys() {
        let store = Arc::new(MemoryStore::new());
        let service = SettingsService::new(store.clone(), Environment::default())
            .with_override_document(doc(json!({
                "defaultPlayerConfig": {"pagination": {"clickable": false}, "speed": 900},
                "cssVariableOverrides": {"themeColor": "red"}
            })));

        let mut edited = service.settings().value.clone();
        edited
            .css_variable_overrides
            .insert("navigationSize".to_string(), "40px".to_string());
        service.save(&edited).unwrap();

        let record = store.record().unwrap();
        let config: Value =
            serde_json::from_str(record.default_player_config.as_deref().unwrap()).unwrap();
        assert!(config.get("speed").is_none());
        assert_eq!(config["pagination"], json!({"enabled": true, "type": "bullets"}));
        assert_eq!(config["loop"], true);

        let css: Value =
            serde_json::from_str(record.css_variable_overrides.as_deref().unwrap()).unwrap();
        assert_eq!(css, json!({"navigationSize": "40px"}));
    }

    #[test]
    fn test_invalid_save_writes_nothing() {
        let store = Arc::new(MemoryStore::new());
        let service = SettingsService::new(store.clone(), Environment::default());

        let settings = Settings {
            cache_duration_seconds: 0,
            ..Settings::default()
        };
        match service.save(&settings) {
            Err(SaveError::Validation(errors)) => {
                assert_eq!(errors[0].field, "cacheDurationSeconds");
            }
            other => panic!("expected validation error, got {other:?}"),
        }
        assert_eq!(store.write_count(), 0);
    }

    #[test]
    fn test_unreachable_store_save_is_persistence_error() {
        let store = Arc::new(MemoryStore::new());
        store.set_unreachable(true);
        let service = SettingsService::new(store, Environment::default());

        let result = service.save(&Settings::default());
        assert!(matches!(result, Err(SaveError::Persistence(_))));
    }

    #[test]
    fn test_stored_debug_is_downgraded_and_persisted_once() {
        let store = Arc::new(MemoryStore::with_record(stored_record(&Settings {
            log_level: LogLevel::Debug,
            ..Settings::default()
        })));
        let service = SettingsService::new(store.clone(), Environment::default());

        assert_eq!(service.settings().value.log_level, LogLevel::Info);
        assert_eq!(store.record().unwrap().log_level, "info");
        assert_eq!(store.write_count(), 1);

        service.reload();
        assert_eq!(store.write_count(), 1);
    }

    #[test]
    fn test_override_debug_is_transient() {
        let store = Arc::new(MemoryStore::with_record(stored_record(&Settings::default())));
        let service = SettingsService::new(store.clone(), Environment::default())
            .with_override_document(doc(json!({"logLevel": "debug"})));

        assert_eq!(service.settings().value.log_level, LogLevel::Info);
        assert_eq!(store.write_count(), 0);
        assert_eq!(store.record().unwrap().log_level, "error");
    }

    #[derive(Clone, Default)]
    struct CapturedLog(Arc<Mutex<Vec<u8>>>);

    impl std::io::Write for CapturedLog {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_override_debug_warns_once_per_session() {
        let store = Arc::new(MemoryStore::with_record(stored_record(&Settings::default())));
        let service = SettingsService::new(store.clone(), Environment::default())
            .with_override_document(doc(json!({"logLevel": "debug"})));

        let captured = CapturedLog::default();
        let writer = captured.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .finish();
        tracing::subscriber::with_default(subscriber, || {
            service.settings();
            service.reload();
            service.reload();
        });

        assert!(service.debug_downgrade_warned.load(Ordering::SeqCst));
        assert_eq!(service.settings().value.log_level, LogLevel::Info);
        assert_eq!(store.write_count(), 0);

        let output = String::from_utf8(captured.0.lock().unwrap().clone()).unwrap();
        assert_eq!(output.matches("for this session").count(), 1);
    }

    #[test]
    fn test_debug_kept_in_dev_mode() {
        let store = Arc::new(MemoryStore::new());
        let service = SettingsService::new(store, Environment::default().with_dev_mode(true))
            .with_override_document(doc(json!({"logLevel": "debug"})));

        assert_eq!(service.settings().value.log_level, LogLevel::Debug);
    }

    #[test]
    fn test_update_ignores_overridden_fields() {
        let store = Arc::new(MemoryStore::new());
        let service = SettingsService::new(store.clone(), Environment::default())
            .with_override_document(doc(json!({"logLevel": "warning"})));

        let form = json!({"logLevel": "info", "cacheDurationSeconds": "120"});
        service.update(form.as_object().unwrap()).unwrap();

        let record = store.record().unwrap();
        assert_eq!(record.cache_duration_seconds, 120);
        assert_eq!(record.log_level, "error");
        assert_eq!(service.settings().value.log_level, LogLevel::Warning);
    }

    #[test]
    fn test_ill_typed_override_leaves_field_editable() {
        let store = Arc::new(MemoryStore::with_record(stored_record(&Settings::default())));
        let service = SettingsService::new(store.clone(), Environment::default())
            .with_override_document(doc(json!({
                "cacheDurationSeconds": "soon",
                "cssVariableOverrides": {"themeColor": 7}
            })));

        assert_eq!(service.settings().value.cache_duration_seconds, 3600);
        assert!(!service.is_overridden("cacheDurationSeconds"));

        let form = json!({
            "cacheDurationSeconds": 120,
            "cssVariableOverrides": {"themeColor": "red"}
        });
        service.update(form.as_object().unwrap()).unwrap();

        let record = store.record().unwrap();
        assert_eq!(record.cache_duration_seconds, 120);
        let css: Value =
            serde_json::from_str(record.css_variable_overrides.as_deref().unwrap()).unwrap();
        assert_eq!(css, json!({"themeColor": "red"}));
        assert_eq!(service.settings().value.cache_duration_seconds, 120);
    }

    #[test]
    fn test_environment_selects_bucket() {
        let store = Arc::new(MemoryStore::new());
        let document = doc(json!({"production": {"enableCache": false}}));

        let staging = SettingsService::new(store.clone(), Environment::default().with_name("staging"))
            .with_override_document(document.clone());
        assert!(staging.settings().value.enable_cache);
        assert!(!staging.is_overridden("enableCache"));

        let production = SettingsService::new(store, Environment::default().with_name("production"))
            .with_override_document(document);
        assert!(!production.settings().value.enable_cache);
        assert!(production.is_overridden("enableCache"));
    }
}
