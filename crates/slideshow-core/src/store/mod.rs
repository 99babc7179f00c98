//! Settings persistence
//!
//! A backend stores exactly one [`SettingsRecord`]. Decoding the record into
//! [`Settings`](crate::settings::Settings) and applying overrides happens in
//! the settings service, not here.

mod error;
mod file;
mod memory;
mod record;

pub use error::PersistenceError;
pub use file::JsonFileStore;
pub use memory::MemoryStore;
pub use record::{SETTINGS_RECORD_ID, SettingsRecord};

/// Storage for the single settings record
pub trait SettingsBackend: Send + Sync {
    /// Read the record; `Ok(None)` when nothing has been stored yet.
    fn fetch(&self) -> Result<Option<SettingsRecord>, PersistenceError>;

    /// Replace the record.
    fn write(&self, record: &SettingsRecord) -> Result<(), PersistenceError>;
}
