//! Widget asset tags and initializer script

use super::RenderError;
use super::templates::{self, INIT_SCRIPT};
use crate::settings::Settings;
use minijinja::context;
use serde_json::{Map, Value};

pub const SWIPER_CSS_URL: &str = "https://cdn.jsdelivr.net/npm/swiper@11/swiper-bundle.min.css";
pub const SWIPER_JS_URL: &str = "https://cdn.jsdelivr.net/npm/swiper@11/swiper-bundle.min.js";

/// `<link>`/`<script>` tags for the Swiper bundle, per the auto-load
/// settings. Empty when both are off.
pub fn asset_tags(settings: &Settings) -> String {
    let mut tags = Vec::new();
    if settings.auto_load_widget_css {
        tags.push(format!(r#"<link rel="stylesheet" href="{SWIPER_CSS_URL}">"#));
    }
    if settings.auto_load_widget_js {
        tags.push(format!(r#"<script src="{SWIPER_JS_URL}"></script>"#));
    }
    tags.join("\n")
}

/// Self-invoking initializer for the slideshow with DOM id `id`.
///
/// Reads the compiled config from `data-swiper-config`, shallow-merges
/// `overrides` on top (runtime-only options such as callbacks) and stores
/// the widget instance on the element. Runs on `DOMContentLoaded` when the
/// document is still loading.
pub fn init_script(
    id: &str,
    overrides: &Map<String, Value>,
    debug: bool,
) -> Result<String, RenderError> {
    let overrides_json = if overrides.is_empty() {
        "null".to_string()
    } else {
        script_safe(&Value::Object(overrides.clone()).to_string())
    };
    let id_literal = script_safe(&Value::String(id.to_string()).to_string());

    let script = templates::environment()?.get_template(INIT_SCRIPT)?.render(context! {
        function_suffix => function_suffix(id),
        id_literal => id_literal,
        debug => if debug { "true" } else { "false" },
        overrides => overrides_json,
    })?;
    Ok(script)
}

/// JavaScript identifier suffix for an element id: dashes and any other
/// non-identifier characters become underscores.
fn function_suffix(id: &str) -> String {
    id.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect()
}

/// Keep JSON from closing the surrounding `<script>` element.
fn script_safe(json: &str) -> String {
    json.replace("</", "<\\/")
}
