//! Slideshow aggregate
//!
//! Slides are always held sorted by `order` with dense 0-based positions;
//! every mutation re-sorts (stable, so ties keep insertion order) and
//! renumbers.

mod slide;

pub use slide::{Slide, SlideContent};

use crate::merge::merge_maps;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Ordered slides plus the per-instance configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawSlideshow")]
pub struct Slideshow {
    slides: Vec<Slide>,
    /// Instance configuration, laid over the default player config
    pub config: Map<String, Value>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawSlideshow {
    SlidesOnly(Vec<Slide>),
    Full {
        #[serde(default)]
        slides: Vec<Slide>,
        #[serde(default)]
        config: Map<String, Value>,
    },
}

impl From<RawSlideshow> for Slideshow {
    fn from(raw: RawSlideshow) -> Self {
        let (slides, config) = match raw {
            RawSlideshow::Full { slides, config } => (slides, config),
            RawSlideshow::SlidesOnly(slides) => (slides, Map::new()),
        };
        let mut slideshow = Slideshow::new(config);
        slideshow.set_slides(slides);
        slideshow
    }
}

impl Slideshow {
    pub fn new(config: Map<String, Value>) -> Self {
        Self {
            slides: Vec::new(),
            config,
        }
    }

    /// Replace all slides.
    pub fn set_slides(&mut self, slides: Vec<Slide>) {
        self.slides = slides;
        self.reorder();
    }

    /// Insert a slide at the position its `order` implies. A slide whose
    /// order ties an existing one goes after it.
    pub fn add_slide(&mut self, slide: Slide) {
        self.slides.push(slide);
        self.reorder();
    }

    /// Remove the slide at `index`, closing the gap.
    pub fn remove_slide(&mut self, index: usize) -> Option<Slide> {
        if index >= self.slides.len() {
            return None;
        }
        let removed = self.slides.remove(index);
        self.reorder();
        Some(removed)
    }

    pub fn slides(&self) -> &[Slide] {
        &self.slides
    }

    pub fn len(&self) -> usize {
        self.slides.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slides.is_empty()
    }

    /// Instance configuration deep-merged over `defaults`.
    pub fn merged_config(&self, defaults: &Map<String, Value>) -> Map<String, Value> {
        let mut merged = defaults.clone();
        merge_maps(&mut merged, &self.config);
        merged
    }

    fn reorder(&mut self) {
        self.slides.sort_by_key(|slide| slide.order);
        for (position, slide) in self.slides.iter_mut().enumerate() {
            slide.order = position as i64;
        }
    }
}
