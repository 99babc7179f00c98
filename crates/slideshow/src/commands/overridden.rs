//! Overridden command implementation

use anyhow::Result;
use clap::Args;

use super::open_service;

/// Check whether a setting path is locked by the override file
#[derive(Args, Debug)]
pub struct OverriddenArgs {
    /// Setting name or dot path (e.g. `defaultPlayerConfig.autoplay.enabled`)
    path: String,
}

/// Execute the overridden command
pub fn execute(args: OverriddenArgs) -> Result<()> {
    let (service, _paths) = open_service()?;
    println!("{}", service.is_overridden(&args.path));
    Ok(())
}
