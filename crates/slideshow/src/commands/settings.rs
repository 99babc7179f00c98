//! Settings command implementation

use anyhow::Result;
use clap::{Args, Subcommand};
use serde_json::{Map, Value, json};
use slideshow_manager_core::EffectiveSettings;
use slideshow_manager_core::context::Paths;
use slideshow_manager_core::settings::{SETTING_KEYS, is_nested_key};

use super::error::CommandError;
use super::open_service;

/// Show or change the effective settings
#[derive(Args, Debug)]
pub struct SettingsArgs {
    #[command(subcommand)]
    action: Option<SettingsAction>,

    /// Output as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Subcommand, Debug)]
enum SettingsAction {
    /// Update persisted settings (key=value; dotted keys reach into nested settings)
    Set {
        /// Assignments such as `cacheDurationSeconds=60` or
        /// `defaultPlayerConfig.autoplay.enabled=true`
        #[arg(required = true)]
        assignments: Vec<String>,
    },
}

/// Execute the settings command
pub fn execute(args: SettingsArgs) -> Result<()> {
    match args.action {
        Some(SettingsAction::Set { assignments }) => set(&assignments),
        None => show(args.json),
    }
}

fn show(as_json: bool) -> Result<()> {
    let (service, paths) = open_service()?;
    let effective = service.settings();
    let store_exists = paths.settings_file.exists();
    let environment = service.environment();

    let values = match effective.value.to_value() {
        Value::Object(map) => map,
        _ => Map::new(),
    };

    if as_json {
        let mut settings = Map::new();
        for key in SETTING_KEYS {
            settings.insert(
                key.to_string(),
                json!({
                    "value": values.get(key).cloned().unwrap_or(Value::Null),
                    "source": source_of(&effective, key, store_exists),
                }),
            );
        }
        let output = json!({
            "settings": settings,
            "environment": environment.name,
            "devMode": environment.dev_mode,
            "files": file_status(&paths),
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!("Settings:");
    for key in SETTING_KEYS {
        let value = values.get(key).cloned().unwrap_or(Value::Null);
        let display = match &value {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        let source = source_of(&effective, key, store_exists);
        println!("  {key}: {display} (from {source})");
    }
    println!();
    let env_display = environment.name.as_deref().unwrap_or("(none)");
    let dev_mode = if environment.dev_mode { "on" } else { "off" };
    println!("Environment: {env_display} (dev mode {dev_mode})");
    println!();
    println!("Files:");
    let settings_status = if store_exists { "(found)" } else { "(not found)" };
    println!("  Settings: {} {settings_status}", paths.settings_file.display());
    let override_status = if paths.override_file.exists() {
        "(found)"
    } else {
        "(not found)"
    };
    println!("  Overrides: {} {override_status}", paths.override_file.display());

    Ok(())
}

fn set(assignments: &[String]) -> Result<()> {
    let (service, _paths) = open_service()?;
    let form = parse_assignments(assignments)?;

    for key in form.keys() {
        if !is_nested_key(key) && service.is_overridden(key) {
            println!("Skipped {key}: set by the override file");
        }
    }

    service.update(&form)?;
    println!("Settings saved");
    Ok(())
}

/// Where a setting's effective value comes from.
fn source_of(effective: &EffectiveSettings, key: &str, store_exists: bool) -> &'static str {
    let base = if store_exists { "store" } else { "default" };
    if !effective.is_overridden(key) {
        return base;
    }
    if is_nested_key(key) {
        if store_exists {
            "store + overrides"
        } else {
            "default + overrides"
        }
    } else {
        "overrides"
    }
}

fn file_status(paths: &Paths) -> Value {
    json!({
        "settings": {
            "path": paths.settings_file.display().to_string(),
            "exists": paths.settings_file.exists(),
        },
        "overrides": {
            "path": paths.override_file.display().to_string(),
            "exists": paths.override_file.exists(),
        }
    })
}

/// Turn `a.b=c` assignments into a nested form map. Values are read as JSON
/// when they parse, otherwise as plain strings.
fn parse_assignments(assignments: &[String]) -> Result<Map<String, Value>, CommandError> {
    let mut form = Map::new();
    for assignment in assignments {
        let Some((path, raw)) = assignment.split_once('=') else {
            return Err(CommandError::InvalidAssignment(assignment.clone()));
        };
        let segments: Vec<&str> = path.trim().split('.').collect();
        if segments.iter().any(|s| s.is_empty()) {
            return Err(CommandError::InvalidAssignment(assignment.clone()));
        }

        let value = serde_json::from_str::<Value>(raw.trim())
            .unwrap_or_else(|_| Value::String(raw.to_string()));
        insert_path(&mut form, &segments, value);
    }
    Ok(form)
}

fn insert_path(map: &mut Map<String, Value>, segments: &[&str], value: Value) {
    let Some((last, parents)) = segments.split_last() else {
        return;
    };
    let mut current = map;
    for segment in parents {
        let entry = current
            .entry(segment.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        if !entry.is_object() {
            *entry = Value::Object(Map::new());
        }
        let Value::Object(next) = entry else {
            return;
        };
        current = next;
    }
    current.insert(last.to_string(), value);
}
