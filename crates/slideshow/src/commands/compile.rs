//! Compile command implementation

use anyhow::Result;
use clap::Args;
use slideshow_manager_core::compile;
use slideshow_manager_core::compiler::decode_instance_config;
use std::path::PathBuf;

use super::{open_service, read_input};

/// Compile a slideshow config into a Swiper player config
#[derive(Args, Debug)]
pub struct CompileArgs {
    /// DOM id of the slideshow; scopes the control selectors
    #[arg(long)]
    id: String,

    /// Instance config (JSON object) laid over the default player config
    #[arg(long)]
    config: Option<PathBuf>,
}

/// Execute the compile command
pub fn execute(args: CompileArgs) -> Result<()> {
    let (service, _paths) = open_service()?;
    let effective = service.settings();

    let raw = match &args.config {
        Some(path) => Some(read_input(path)?),
        None => None,
    };
    let instance = decode_instance_config(raw.as_deref());

    let config = compile(&effective.value.default_player_config, &instance, &args.id);
    println!("{}", serde_json::to_string_pretty(&config)?);
    Ok(())
}
