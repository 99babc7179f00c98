//! Runtime context: deployment environment and file layout
//!
//! The context is resolved once at startup and passed explicitly to the
//! settings service; nothing in the core reads it from global state.

use std::path::{Path, PathBuf};

/// Deployment environment the settings are resolved for.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Environment {
    /// Active environment name (selects the `[<name>]` override bucket)
    pub name: Option<String>,
    /// Development mode; gates the `debug` log level
    pub dev_mode: bool,
}

impl Environment {
    /// Create an environment with an explicit name and dev-mode flag.
    pub fn new(name: Option<String>, dev_mode: bool) -> Self {
        Self { name, dev_mode }
    }

    /// Resolve from `SLIDESHOW_ENV` and `SLIDESHOW_DEV_MODE`.
    pub fn from_env() -> Self {
        let name = std::env::var("SLIDESHOW_ENV")
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty());
        let dev_mode = std::env::var("SLIDESHOW_DEV_MODE")
            .map(|v| parse_flag(&v))
            .unwrap_or(false);
        Self { name, dev_mode }
    }

    /// Set the environment name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the dev-mode flag
    pub fn with_dev_mode(mut self, dev_mode: bool) -> Self {
        self.dev_mode = dev_mode;
        self
    }
}

fn parse_flag(raw: &str) -> bool {
    matches!(
        raw.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

/// On-disk locations of the persisted settings and the override document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paths {
    /// Persisted settings record (JSON)
    pub settings_file: PathBuf,
    /// Override document (TOML)
    pub override_file: PathBuf,
}

impl Paths {
    /// Standard layout under `<home>/.config/slideshow/`.
    pub fn from_home(home_dir: &Path) -> Self {
        let root = home_dir.join(".config/slideshow");
        Self {
            settings_file: root.join("settings.json"),
            override_file: root.join("overrides.toml"),
        }
    }
}
