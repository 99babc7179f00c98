//! Canonical home directory resolution
//!
//! # Precedence
//!
//! 1. `SLIDESHOW_HOME` environment variable (if set and non-empty)
//! 2. `dirs::home_dir()` platform default
//!
//! Integration tests MUST set `SLIDESHOW_HOME` so they never touch the real
//! settings file:
//!
//! ```ignore
//! let temp_dir = TempDir::new().unwrap();
//! let mut cmd = cargo::cargo_bin_cmd!("slideshow");
//! cmd.env("SLIDESHOW_HOME", temp_dir.path());
//! ```

use anyhow::{Context, Result};
use std::path::PathBuf;

/// Get the home directory used to locate settings and override files.
///
/// # Errors
///
/// Returns an error if `SLIDESHOW_HOME` is unset and the platform home
/// directory cannot be determined.
pub fn get_home_dir() -> Result<PathBuf> {
    if let Ok(home) = std::env::var("SLIDESHOW_HOME") {
        let trimmed = home.trim();
        if !trimmed.is_empty() {
            return Ok(PathBuf::from(trimmed));
        }
    }

    dirs::home_dir().context("Could not determine home directory")
}
