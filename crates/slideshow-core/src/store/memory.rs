//! In-memory settings backend

use super::SettingsBackend;
use super::error::PersistenceError;
use super::record::SettingsRecord;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

/// Settings backend held in process memory.
///
/// Used for embedding and tests; can be switched "unreachable" to exercise
/// the fallback paths.
#[derive(Debug, Default)]
pub struct MemoryStore {
    record: Mutex<Option<SettingsRecord>>,
    unreachable: AtomicBool,
    writes: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with an existing record
    pub fn with_record(record: SettingsRecord) -> Self {
        Self {
            record: Mutex::new(Some(record)),
            ..Self::default()
        }
    }

    /// Make every subsequent call fail with [`PersistenceError::Unavailable`].
    pub fn set_unreachable(&self, unreachable: bool) {
        self.unreachable.store(unreachable, Ordering::SeqCst);
    }

    /// Number of successful writes so far
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    /// Snapshot of the stored record
    pub fn record(&self) -> Option<SettingsRecord> {
        self.record.lock().ok().and_then(|guard| guard.clone())
    }

    fn check_reachable(&self) -> Result<(), PersistenceError> {
        if self.unreachable.load(Ordering::SeqCst) {
            return Err(PersistenceError::Unavailable {
                message: "memory store marked unreachable".to_string(),
            });
        }
        Ok(())
    }
}

impl SettingsBackend for MemoryStore {
    fn fetch(&self) -> Result<Option<SettingsRecord>, PersistenceError> {
        self.check_reachable()?;
        let guard = self.record.lock().map_err(|_| PersistenceError::Unavailable {
            message: "memory store lock poisoned".to_string(),
        })?;
        Ok(guard.clone())
    }

    fn write(&self, record: &SettingsRecord) -> Result<(), PersistenceError> {
        self.check_reachable()?;
        let mut guard = self.record.lock().map_err(|_| PersistenceError::Unavailable {
            message: "memory store lock poisoned".to_string(),
        })?;
        *guard = Some(record.clone());
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
