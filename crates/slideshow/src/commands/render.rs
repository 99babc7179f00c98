//! Render command implementation

use anyhow::Result;
use clap::Args;
use slideshow_manager_core::render::{
    CatalogResolver, ContentResolver, NullResolver, RenderOptions, asset_tags, init_script,
};
use slideshow_manager_core::{LogLevel, Slideshow};
use std::path::PathBuf;

use super::error::CommandError;
use super::{open_service, read_input};

/// Render slideshow markup
#[derive(Args, Debug)]
pub struct RenderArgs {
    /// Slideshow document: `{"slides": [...], "config": {...}}` or a bare slide list
    #[arg(long)]
    slides: PathBuf,

    /// DOM id of the slideshow container
    #[arg(long)]
    id: String,

    /// Asset/entry catalog used to resolve image and entry slides
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Prepend the widget <link>/<script> tags
    #[arg(long)]
    assets: bool,

    /// Append the initializer <script>
    #[arg(long)]
    init: bool,
}

/// Execute the render command
pub fn execute(args: RenderArgs) -> Result<()> {
    let (service, _paths) = open_service()?;
    let effective = service.settings();
    let settings = &effective.value;

    let content = read_input(&args.slides)?;
    let slideshow: Slideshow =
        serde_json::from_str(&content).map_err(|e| CommandError::InvalidJson {
            path: args.slides.display().to_string(),
            source: e,
        })?;

    let catalog = match &args.catalog {
        Some(path) => Some(CatalogResolver::load(path)?),
        None => None,
    };
    let resolver: &dyn ContentResolver = match &catalog {
        Some(catalog) => catalog,
        None => &NullResolver,
    };

    let options =
        RenderOptions::new(&args.id).with_css_vars(settings.css_variable_overrides.clone());
    let document = slideshow.render(&settings.default_player_config, &options, resolver)?;

    if args.assets {
        let tags = asset_tags(settings);
        if !tags.is_empty() {
            println!("{tags}");
        }
    }
    if !document.is_empty() {
        println!("{document}");
    }
    if args.init && !document.is_empty() {
        let debug = settings.log_level == LogLevel::Debug;
        let script = init_script(&args.id, &Default::default(), debug)?;
        println!("<script>\n{script}\n</script>");
    }

    Ok(())
}
