//! Slide model

use crate::value::as_int;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// What a slide shows.
///
/// Rich text and HTML carry their markup inline; images and entries carry a
/// reference that a [`ContentResolver`](crate::render::ContentResolver)
/// resolves at render time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlideContent {
    RichText(String),
    Image(String),
    Entry(String),
    Html(String),
}

impl SlideContent {
    /// Wire name of the slide type
    pub fn type_name(&self) -> &'static str {
        match self {
            SlideContent::RichText(_) => "richText",
            SlideContent::Image(_) => "image",
            SlideContent::Entry(_) => "entry",
            SlideContent::Html(_) => "html",
        }
    }

    fn payload(&self) -> &str {
        match self {
            SlideContent::RichText(s)
            | SlideContent::Image(s)
            | SlideContent::Entry(s)
            | SlideContent::Html(s) => s,
        }
    }
}

impl Default for SlideContent {
    fn default() -> Self {
        SlideContent::RichText(String::new())
    }
}

/// A single slide
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawSlide", into = "RawSlide")]
pub struct Slide {
    pub content: SlideContent,
    /// Per-slide settings (free-form)
    pub settings: Map<String, Value>,
    /// Position within the slideshow
    pub order: i64,
    /// Extra classes on the slide container
    pub css_class: Option<String>,
    pub metadata: Map<String, Value>,
}

impl Slide {
    pub fn new(content: SlideContent) -> Self {
        Self {
            content,
            ..Self::default()
        }
    }

    pub fn with_order(mut self, order: i64) -> Self {
        self.order = order;
        self
    }

    pub fn with_css_class(mut self, css_class: impl Into<String>) -> Self {
        self.css_class = Some(css_class.into());
        self
    }
}

/// Serialized slide shape: `{type, content, settings, order, cssClass, metadata}`.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawSlide {
    #[serde(rename = "type", default = "default_type")]
    kind: String,
    #[serde(default)]
    content: Value,
    #[serde(default)]
    settings: Map<String, Value>,
    #[serde(default)]
    order: Value,
    #[serde(default)]
    css_class: Option<String>,
    #[serde(default)]
    metadata: Map<String, Value>,
}

fn default_type() -> String {
    "richText".to_string()
}

impl TryFrom<RawSlide> for Slide {
    type Error = String;

    fn try_from(raw: RawSlide) -> Result<Self, Self::Error> {
        let payload = match &raw.content {
            Value::Null => String::new(),
            Value::String(s) => s.clone(),
            Value::Number(n) => n.to_string(),
            other => return Err(format!("slide content must be a string or id, got {other}")),
        };

        let content = match raw.kind.as_str() {
            "richText" => SlideContent::RichText(payload),
            "image" => SlideContent::Image(payload),
            "entry" => SlideContent::Entry(payload),
            "html" => SlideContent::Html(payload),
            other => {
                return Err(format!(
                    "unknown slide type '{other}' (expected richText, image, entry or html)"
                ));
            }
        };

        let order = match &raw.order {
            Value::Null => 0,
            value => as_int(value).ok_or_else(|| format!("slide order must be an integer, got {value}"))?,
        };

        Ok(Slide {
            content,
            settings: raw.settings,
            order,
            css_class: raw.css_class.filter(|c| !c.trim().is_empty()),
            metadata: raw.metadata,
        })
    }
}

impl From<Slide> for RawSlide {
    fn from(slide: Slide) -> Self {
        RawSlide {
            kind: slide.content.type_name().to_string(),
            content: Value::String(slide.content.payload().to_string()),
            settings: slide.settings,
            order: Value::from(slide.order),
            css_class: slide.css_class,
            metadata: slide.metadata,
        }
    }
}
