//! Shared logging initialization for slideshow binaries.
//!
//! Logging starts at the `SLIDESHOW_LOG` level (default `info`) and is
//! narrowed to the configured `logLevel` once settings are loaded. An
//! explicit `SLIDESHOW_LOG` always wins over the settings.

use crate::settings::LogLevel;
use std::sync::OnceLock;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{Registry, fmt, reload};

const LOG_ENV: &str = "SLIDESHOW_LOG";

static HANDLE: OnceLock<reload::Handle<LevelFilter, Registry>> = OnceLock::new();

fn parse_level(raw: Option<&str>) -> LevelFilter {
    match raw.unwrap_or("info").trim().to_ascii_lowercase().as_str() {
        "trace" => LevelFilter::TRACE,
        "debug" => LevelFilter::DEBUG,
        "warn" | "warning" => LevelFilter::WARN,
        "error" => LevelFilter::ERROR,
        "off" => LevelFilter::OFF,
        _ => LevelFilter::INFO,
    }
}

fn settings_filter(level: LogLevel) -> LevelFilter {
    match level {
        LogLevel::Debug => LevelFilter::DEBUG,
        LogLevel::Info => LevelFilter::INFO,
        LogLevel::Warning => LevelFilter::WARN,
        LogLevel::Error => LevelFilter::ERROR,
    }
}

/// Filter for a configured level, unless the environment pins one.
fn effective_filter(env_level: Option<&str>, configured: LogLevel) -> LevelFilter {
    match env_level {
        Some(raw) if !raw.trim().is_empty() => parse_level(Some(raw)),
        _ => settings_filter(configured),
    }
}

/// Initialize process-level tracing output from `SLIDESHOW_LOG`.
///
/// Safe to call multiple times; only the first call installs the subscriber.
/// Output goes to stderr so rendered markup on stdout stays clean.
pub fn init() {
    if HANDLE.get().is_some() {
        return;
    }
    let level = parse_level(std::env::var(LOG_ENV).ok().as_deref());
    let (filter, handle) = reload::Layer::new(level);
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .try_init();
    let _ = HANDLE.set(handle);
}

/// Switch the active filter to the configured `logLevel`.
///
/// No-op before [`init`] or when `SLIDESHOW_LOG` is set.
pub fn apply_level(level: LogLevel) {
    let Some(handle) = HANDLE.get() else {
        return;
    };
    let filter = effective_filter(std::env::var(LOG_ENV).ok().as_deref(), level);
    if let Err(e) = handle.reload(filter) {
        eprintln!("Failed to apply log level {level}: {e}");
    }
}
