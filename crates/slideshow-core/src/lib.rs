//! Core library for slideshow-manager
//!
//! Two engines live here:
//! - layered settings resolution: file-based overrides always win over the
//!   persisted settings, and provenance tells callers which values are locked
//! - the player config compiler: form-shaped slideshow configuration in,
//!   Swiper-ready JSON out, plus the markup that carries it
//!
//! Nothing here reads global state; a [`SettingsService`] built from an
//! explicit [`context::Environment`] is passed to whoever needs settings.

pub mod compiler;
pub mod context;
pub mod css_vars;
pub mod home;
pub mod logging;
pub mod merge;
pub mod overrides;
pub mod render;
pub mod service;
pub mod settings;
pub mod slideshow;
pub mod store;
pub mod value;

pub use compiler::{PlayerConfig, compile};
pub use overrides::{EffectiveSettings, OverrideDocument};
pub use render::{ContentResolver, Document, RenderOptions};
pub use service::{SaveError, SettingsService};
pub use settings::{LogLevel, Settings};
pub use slideshow::{Slide, SlideContent, Slideshow};
