//! CLI command dispatch and execution

use anyhow::Result;
use clap::{Parser, Subcommand};
use slideshow_manager_core::SettingsService;
use slideshow_manager_core::context::{Environment, Paths};
use slideshow_manager_core::home::get_home_dir;
use slideshow_manager_core::logging;
use std::path::Path;

mod compile;
mod css_vars;
mod error;
mod overridden;
mod render;
mod settings;

use error::CommandError;

/// slideshow - Swiper slideshow configuration and rendering
#[derive(Parser, Debug)]
#[command(
    name = "slideshow",
    version,
    about = "Swiper slideshow configuration and rendering",
    long_about = "Inspect layered slideshow settings and compile or render Swiper slideshows"
)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Show or change the effective settings
    Settings(settings::SettingsArgs),

    /// Check whether a setting path is locked by the override file
    Overridden(overridden::OverriddenArgs),

    /// Compile a slideshow config into a Swiper player config
    Compile(compile::CompileArgs),

    /// Render slideshow markup
    Render(render::RenderArgs),

    /// Print the CSS custom properties for the configured overrides
    CssVars,
}

impl Cli {
    /// Execute the CLI command
    pub fn execute(self) -> Result<()> {
        match self.command {
            Commands::Settings(args) => settings::execute(args),
            Commands::Overridden(args) => overridden::execute(args),
            Commands::Compile(args) => compile::execute(args),
            Commands::Render(args) => render::execute(args),
            Commands::CssVars => css_vars::execute(),
        }
    }
}

/// Settings service over the standard file layout for the current home.
fn open_service() -> Result<(SettingsService, Paths)> {
    let home_dir = get_home_dir()?;
    let paths = Paths::from_home(&home_dir);
    tracing::debug!(
        "Settings file {}, override file {}",
        paths.settings_file.display(),
        paths.override_file.display()
    );
    let service = SettingsService::from_paths(&paths, Environment::from_env());
    logging::apply_level(service.settings().value.log_level);
    Ok((service, paths))
}

/// Read a user-supplied input file.
fn read_input(path: &Path) -> Result<String, CommandError> {
    if !path.exists() {
        return Err(CommandError::FileNotFound(path.display().to_string()));
    }
    Ok(std::fs::read_to_string(path)?)
}
