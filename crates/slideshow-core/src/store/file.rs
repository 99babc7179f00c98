//! JSON file settings backend

use super::SettingsBackend;
use super::error::PersistenceError;
use super::record::SettingsRecord;
use fs2::FileExt;
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

const LOCK_RETRIES: u32 = 5;

/// Settings stored as a single JSON record on disk.
///
/// Writes go to a sibling `.tmp` file under an advisory `.lock` and are then
/// renamed into place, so readers see either the old or the new record.
/// Concurrent writers resolve last-write-wins.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Location of the record file
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SettingsBackend for JsonFileStore {
    fn fetch(&self) -> Result<Option<SettingsRecord>, PersistenceError> {
        if !self.path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&self.path).map_err(|e| PersistenceError::Io {
            path: self.path.clone(),
            source: e,
        })?;

        if content.trim().is_empty() {
            return Ok(None);
        }

        let record = serde_json::from_str(&content).map_err(|e| PersistenceError::Json {
            path: self.path.clone(),
            source: e,
        })?;
        Ok(Some(record))
    }

    fn write(&self, record: &SettingsRecord) -> Result<(), PersistenceError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| PersistenceError::Io {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let lock_path = self.path.with_extension("lock");
        let tmp_path = self.path.with_extension("tmp");

        let _lock = acquire_lock(&lock_path, LOCK_RETRIES)?;

        let content = serde_json::to_vec_pretty(record).map_err(|e| PersistenceError::Json {
            path: tmp_path.clone(),
            source: e,
        })?;

        {
            let mut tmp_file = File::create(&tmp_path).map_err(|e| PersistenceError::Io {
                path: tmp_path.clone(),
                source: e,
            })?;
            tmp_file.write_all(&content).map_err(|e| PersistenceError::Io {
                path: tmp_path.clone(),
                source: e,
            })?;
            tmp_file.sync_all().map_err(|e| PersistenceError::Io {
                path: tmp_path.clone(),
                source: e,
            })?;
        }

        fs::rename(&tmp_path, &self.path).map_err(|e| PersistenceError::Io {
            path: self.path.clone(),
            source: e,
        })
    }
}

/// Lock guard; the lock is released when the file handle is dropped.
struct FileLock {
    file: File,
}

impl Drop for FileLock {
    fn drop(&mut self) {
        let _ = FileExt::unlock(&self.file);
    }
}

/// Acquire an exclusive lock with exponential backoff (50ms, 100ms, ...).
fn acquire_lock(path: &Path, max_retries: u32) -> Result<FileLock, PersistenceError> {
    let file = OpenOptions::new()
        .read(true)
        .write(true)
        .create(true)
        .truncate(false)
        .open(path)
        .map_err(|e| PersistenceError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

    for attempt in 0..=max_retries {
        match file.try_lock_exclusive() {
            Ok(()) => return Ok(FileLock { file }),
            Err(e) if e.raw_os_error() == fs2::lock_contended_error().raw_os_error() => {
                if attempt < max_retries {
                    let wait_ms = 50u64 * (1 << attempt);
                    std::thread::sleep(Duration::from_millis(wait_ms));
                }
            }
            Err(e) => {
                return Err(PersistenceError::Io {
                    path: path.to_path_buf(),
                    source: e,
                });
            }
        }
    }

    Err(PersistenceError::LockTimeout {
        path: path.to_path_buf(),
        retries: max_retries,
    })
}
