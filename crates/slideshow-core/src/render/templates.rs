//! Markup templates

use minijinja::{AutoEscape, Environment, ErrorKind};
use std::sync::LazyLock;

pub(crate) const SLIDE: &str = "slide.html";
pub(crate) const SLIDESHOW: &str = "slideshow.html";
pub(crate) const INIT_SCRIPT: &str = "init.js";

const SLIDE_SOURCE: &str = concat!(
    r#"<div class="swiper-slide{% if css_class %} {{ css_class }}{% endif %}">"#,
    r#"{% if kind == "markup" %}{{ body|safe }}"#,
    r#"{% elif kind == "image" %}<img src="{{ url }}" alt="{{ alt }}">"#,
    r#"{% elif kind == "entry" %}<h3>{{ title }}</h3>{% endif %}"#,
    r#"</div>"#,
);

const SLIDESHOW_SOURCE: &str = concat!(
    r#"<div class="swiper" id="{{ id }}"{% if style %} style="{{ style }}"{% endif %}"#,
    r#" data-swiper-config="{{ config }}">"#,
    r#"<div class="swiper-wrapper">{% for slide in slides %}{{ slide|safe }}{% endfor %}</div>"#,
    r#"{% if navigation %}"#,
    r#"<div class="swiper-button-prev swiper-button-prev-{{ id }}{% if navigation_classes %} {{ navigation_classes }}{% endif %}"></div>"#,
    r#"<div class="swiper-button-next swiper-button-next-{{ id }}{% if navigation_classes %} {{ navigation_classes }}{% endif %}"></div>"#,
    r#"{% endif %}"#,
    r#"{% if pagination %}"#,
    r#"<div class="swiper-pagination swiper-pagination-{{ id }}{% if pagination_classes %} {{ pagination_classes }}{% endif %}"></div>"#,
    r#"{% endif %}"#,
    r#"{% if scrollbar %}<div class="swiper-scrollbar"></div>{% endif %}"#,
    r#"</div>"#,
);

const INIT_SCRIPT_SOURCE: &str = r#"(function() {
    function initSwiper_{{ function_suffix }}() {
        const sliderId = {{ id_literal }};
        const swiperEl = document.getElementById(sliderId);
        const debug = {{ debug }};

        if (swiperEl) {
            let config = JSON.parse(swiperEl.getAttribute('data-swiper-config'));

            const overrides = {{ overrides }};
            if (overrides) {
                config = Object.assign({}, config, overrides);
            }

            if (debug) {
                console.log('Initializing Swiper "' + sliderId + '" with config:', config);
            }

            const swiper = new Swiper('#' + sliderId, config);

            if (debug) {
                console.log('Swiper "' + sliderId + '" initialized:', swiper);
            }

            swiperEl.swiper = swiper;
        } else if (debug) {
            console.error('Swiper element not found: ' + sliderId);
        }
    }

    if (document.readyState === 'loading') {
        document.addEventListener('DOMContentLoaded', initSwiper_{{ function_suffix }});
    } else {
        initSwiper_{{ function_suffix }}();
    }
})();
"#;

static ENVIRONMENT: LazyLock<Result<Environment<'static>, String>> =
    LazyLock::new(|| build().map_err(|e| e.to_string()));

/// Shared template environment with every built-in template registered.
///
/// `.html` templates are HTML-escaped; the init script is emitted verbatim
/// and its inputs are JSON-encoded by the caller.
pub(crate) fn environment() -> Result<&'static Environment<'static>, minijinja::Error> {
    ENVIRONMENT
        .as_ref()
        .map_err(|detail| minijinja::Error::new(ErrorKind::InvalidOperation, detail.clone()))
}

fn build() -> Result<Environment<'static>, minijinja::Error> {
    let mut env = Environment::new();
    env.set_auto_escape_callback(|name| {
        if name.ends_with(".html") {
            AutoEscape::Html
        } else {
            AutoEscape::None
        }
    });
    env.add_template(SLIDE, SLIDE_SOURCE)?;
    env.add_template(SLIDESHOW, SLIDESHOW_SOURCE)?;
    env.add_template(INIT_SCRIPT, INIT_SCRIPT_SOURCE)?;
    Ok(env)
}
