//! slideshow - operator CLI for slideshow-manager
//!
//! Inspects the layered settings under `~/.config/slideshow/` and turns
//! slideshow definitions into Swiper configs and markup.

use clap::Parser;

mod commands;

use commands::Cli;

fn main() {
    slideshow_manager_core::logging::init();

    let cli = Cli::parse();

    if let Err(e) = cli.execute() {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
