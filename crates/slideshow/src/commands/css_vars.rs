//! CSS variables command implementation

use anyhow::Result;
use slideshow_manager_core::css_vars::build_css_vars;

use super::open_service;

/// Execute the css-vars command
pub fn execute() -> Result<()> {
    let (service, _paths) = open_service()?;
    let effective = service.settings();
    println!("{}", build_css_vars(&effective.value.css_variable_overrides));
    Ok(())
}
