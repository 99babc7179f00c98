//! Slideshow markup rendering
//!
//! Rendering never fails because of content: an unresolvable image or entry
//! renders as an empty slide block and the lookup error is logged. Only a
//! broken template surfaces as [`RenderError`].

mod assets;
mod resolver;
mod templates;

pub use assets::{SWIPER_CSS_URL, SWIPER_JS_URL, asset_tags, init_script};
pub use resolver::{
    CatalogResolver, ContentResolver, NullResolver, ResolveError, ResolvedAsset, ResolvedEntry,
};

use crate::compiler::{compile, visibility_classes};
use crate::css_vars::build_css_vars;
use crate::merge::merge_maps;
use crate::slideshow::{Slide, SlideContent, Slideshow};
use minijinja::context;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;
use tracing::warn;

/// Errors producing markup
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Template error: {0}")]
    Template(#[from] minijinja::Error),
}

/// Per-render options
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenderOptions {
    /// DOM id of the slideshow container; scopes the control selectors
    pub id: String,
    /// Deep-merged over the slideshow's merged config for this render only
    pub overrides: Map<String, Value>,
    /// CSS variables emitted as the container's `style`
    pub css_vars: BTreeMap<String, String>,
}

impl RenderOptions {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    pub fn with_overrides(mut self, overrides: Map<String, Value>) -> Self {
        self.overrides = overrides;
        self
    }

    pub fn with_css_vars(mut self, css_vars: BTreeMap<String, String>) -> Self {
        self.css_vars = css_vars;
        self
    }
}

/// Rendered markup
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    html: String,
}

impl Document {
    pub fn as_str(&self) -> &str {
        &self.html
    }

    pub fn into_string(self) -> String {
        self.html
    }

    pub fn is_empty(&self) -> bool {
        self.html.is_empty()
    }
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.html)
    }
}

impl Slideshow {
    /// Render the slideshow container with its slides and controls.
    ///
    /// The compiled player config is embedded as `data-swiper-config`.
    /// Navigation, pagination and scrollbar placeholders are emitted only
    /// when the compiled config enables them. No slides renders nothing.
    pub fn render(
        &self,
        defaults: &Map<String, Value>,
        options: &RenderOptions,
        resolver: &dyn ContentResolver,
    ) -> Result<Document, RenderError> {
        if self.is_empty() {
            return Ok(Document::default());
        }

        let mut merged = self.merged_config(defaults);
        merge_maps(&mut merged, &options.overrides);
        let compiled = compile(&merged, &Map::new(), &options.id);

        let env = templates::environment()?;
        let slide_template = env.get_template(templates::SLIDE)?;
        let mut slides = Vec::with_capacity(self.len());
        for slide in self.slides() {
            slides.push(slide_template.render(slide_context(slide, resolver))?);
        }

        let html = env.get_template(templates::SLIDESHOW)?.render(context! {
            id => &options.id,
            style => build_css_vars(&options.css_vars),
            config => compiled.to_json(),
            slides => slides,
            navigation => compiled.get("navigation").is_some_and(Value::is_object),
            pagination => compiled.get("pagination").is_some_and(Value::is_object),
            scrollbar => compiled.get("scrollbar").is_some(),
            navigation_classes => visibility(&merged, "navigationVisibility"),
            pagination_classes => visibility(&merged, "paginationVisibility"),
        })?;

        Ok(Document { html })
    }
}

/// Render a single slide block.
pub fn render_slide(slide: &Slide, resolver: &dyn ContentResolver) -> Result<String, RenderError> {
    let env = templates::environment()?;
    Ok(env
        .get_template(templates::SLIDE)?
        .render(slide_context(slide, resolver))?)
}

fn slide_context(slide: &Slide, resolver: &dyn ContentResolver) -> minijinja::Value {
    let css_class = slide.css_class.as_deref().unwrap_or_default();

    match &slide.content {
        SlideContent::RichText(body) | SlideContent::Html(body) => context! {
            css_class => css_class,
            kind => "markup",
            body => body,
        },
        SlideContent::Image(reference) => match resolver.resolve_asset(reference) {
            Ok(Some(asset)) => context! {
                css_class => css_class,
                kind => "image",
                url => asset.url,
                alt => asset.title.unwrap_or_default(),
            },
            Ok(None) => empty_slide(css_class),
            Err(e) => {
                warn!("Failed to resolve image {reference}: {e}");
                empty_slide(css_class)
            }
        },
        SlideContent::Entry(reference) => match resolver.resolve_entry(reference) {
            Ok(Some(entry)) => context! {
                css_class => css_class,
                kind => "entry",
                title => entry.title,
            },
            Ok(None) => empty_slide(css_class),
            Err(e) => {
                warn!("Failed to resolve entry {reference}: {e}");
                empty_slide(css_class)
            }
        },
    }
}

fn empty_slide(css_class: &str) -> minijinja::Value {
    context! { css_class => css_class, kind => "empty" }
}

fn visibility(config: &Map<String, Value>, key: &str) -> &'static str {
    config
        .get(key)
        .and_then(Value::as_str)
        .map(visibility_classes)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::default_player_config;
    use serde_json::json;

    struct FailingResolver;

    impl ContentResolver for FailingResolver {
        fn resolve_asset(&self, _reference: &str) -> Result<Option<ResolvedAsset>, ResolveError> {
            Err(ResolveError::Backend {
                message: "offline".to_string(),
            })
        }

        fn resolve_entry(&self, _reference: &str) -> Result<Option<ResolvedEntry>, ResolveError> {
            Err(ResolveError::Backend {
                message: "offline".to_string(),
            })
        }
    }

    fn slideshow(slides: Vec<Slide>, config: Value) -> Slideshow {
        let mut slideshow = Slideshow::new(config.as_object().cloned().unwrap_or_default());
        slideshow.set_slides(slides);
        slideshow
    }

    #[test]
    fn test_empty_slideshow_renders_nothing() {
        let doc = Slideshow::default()
            .render(&default_player_config(), &RenderOptions::new("s"), &NullResolver)
            .unwrap();
        assert!(doc.is_empty());
        assert_eq!(doc.as_str(), "");
    }

    #[test]
    fn test_render_structure() {
        let show = slideshow(
            vec![
                Slide::new(SlideContent::RichText("<p>One</p>".to_string())).with_css_class("first"),
                Slide::new(SlideContent::Html("<em>Two</em>".to_string())).with_order(1),
            ],
            json!({}),
        );
        let html = show
            .render(&default_player_config(), &RenderOptions::new("hero"), &NullResolver)
            .unwrap()
            .into_string();

        assert!(html.starts_with(r#"<div class="swiper" id="hero" data-swiper-config=""#));
        assert!(html.contains(r#"<div class="swiper-wrapper"><div class="swiper-slide first"><p>One</p></div><div class="swiper-slide"><em>Two</em></div></div>"#));
        assert!(html.contains(r#"<div class="swiper-button-prev swiper-button-prev-hero"></div>"#));
        assert!(html.contains(r#"<div class="swiper-button-next swiper-button-next-hero"></div>"#));
        assert!(html.contains(r#"<div class="swiper-pagination swiper-pagination-hero"></div>"#));
        assert!(!html.contains("swiper-scrollbar"));
        assert!(html.ends_with("</div>"));
    }

    #[test]
    fn test_config_payload_is_escaped_compiled_config() {
        let show = slideshow(
            vec![Slide::new(SlideContent::RichText("x".to_string()))],
            json!({"speed": "450"}),
        );
        let html = show
            .render(&default_player_config(), &RenderOptions::new("s"), &NullResolver)
            .unwrap()
            .into_string();

        assert!(html.contains("&quot;speed&quot;:450"));
        assert!(!html.contains(r#""speed""#));
        assert!(!html.contains("navigationVisibility"));
    }

    #[test]
    fn test_controls_follow_config() {
        let show = slideshow(
            vec![Slide::new(SlideContent::RichText("x".to_string()))],
            json!({
                "navigation": false,
                "pagination": {"enabled": false},
                "scrollbar": {"enabled": true}
            }),
        );
        let html = show
            .render(&default_player_config(), &RenderOptions::new("s"), &NullResolver)
            .unwrap()
            .into_string();

        assert!(!html.contains("swiper-button-prev"));
        assert!(!html.contains("swiper-pagination"));
        assert!(html.contains(r#"<div class="swiper-scrollbar"></div>"#));
    }

    #[test]
    fn test_options_override_config_and_add_style() {
        let show = slideshow(
            vec![Slide::new(SlideContent::RichText("x".to_string()))],
            json!({"navigationVisibility": "hide-mobile"}),
        );
        let mut css_vars = BTreeMap::new();
        css_vars.insert("themeColor".to_string(), "red".to_string());
        let options = RenderOptions::new("s")
            .with_overrides(json!({"paginationEnabled": false}).as_object().unwrap().clone())
            .with_css_vars(css_vars);

        let html = show
            .render(&default_player_config(), &options, &NullResolver)
            .unwrap()
            .into_string();

        assert!(html.contains(r#" style="--swiper-theme-color:var(--_swiper-theme-color, red)""#));
        assert!(html.contains(r#"swiper-button-prev-s hidden md:block""#));
        assert!(!html.contains("swiper-pagination"));
    }

    #[test]
    fn test_image_and_entry_slides() {
        let catalog = CatalogResolver::default()
            .with_asset(
                "42",
                ResolvedAsset {
                    url: "sunset.jpg".to_string(),
                    title: Some("Sunset & sea".to_string()),
                },
            )
            .with_entry("about", "About <us>");

        let image = render_slide(&Slide::new(SlideContent::Image("42".to_string())), &catalog).unwrap();
        assert_eq!(
            image,
            r#"<div class="swiper-slide"><img src="sunset.jpg" alt="Sunset &amp; sea"></div>"#
        );

        let entry = render_slide(&Slide::new(SlideContent::Entry("about".to_string())), &catalog).unwrap();
        assert_eq!(entry, r#"<div class="swiper-slide"><h3>About &lt;us&gt;</h3></div>"#);
    }

    #[test]
    fn test_unresolved_content_renders_empty_block() {
        let missing = Slide::new(SlideContent::Image("404".to_string())).with_css_class("gap");
        assert_eq!(
            render_slide(&missing, &NullResolver).unwrap(),
            r#"<div class="swiper-slide gap"></div>"#
        );

        let failing = Slide::new(SlideContent::Entry("x".to_string()));
        assert_eq!(
            render_slide(&failing, &FailingResolver).unwrap(),
            r#"<div class="swiper-slide"></div>"#
        );
    }
}
