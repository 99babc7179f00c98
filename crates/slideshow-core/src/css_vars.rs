//! Swiper CSS custom properties
//!
//! Each semantic key maps to `--swiper-<kebab>` with a private
//! `--_swiper-<kebab>` hook in front of the configured value, so page CSS
//! can still win:
//!
//! ```text
//! themeColor = "#f00"  ->  --swiper-theme-color:var(--_swiper-theme-color, #f00)
//! ```

use std::collections::BTreeMap;

/// Every supported key, in emission order.
pub const CSS_VARIABLE_KEYS: [&str; 40] = [
    // Theme
    "themeColor",
    // Navigation
    "navigationSize",
    "navigationTopOffset",
    "navigationSidesOffset",
    "navigationColor",
    "navigationInactiveColor",
    "navigationBg",
    "navigationBgHover",
    "navigationPadding",
    "navigationBorderColor",
    "navigationBorderColorHover",
    "navigationShadow",
    "navigationShadowHover",
    // Pagination
    "paginationColor",
    "paginationBulletSize",
    "paginationBulletWidth",
    "paginationBulletHeight",
    "paginationBulletInactiveColor",
    "paginationBulletInactiveOpacity",
    "paginationBulletOpacity",
    "paginationBulletHorizontalGap",
    "paginationBulletVerticalGap",
    "paginationFractionColor",
    "paginationProgressbarBgColor",
    "paginationProgressbarSize",
    "paginationLeft",
    "paginationRight",
    "paginationTop",
    "paginationBottom",
    // Scrollbar
    "scrollbarBorderRadius",
    "scrollbarTop",
    "scrollbarBottom",
    "scrollbarLeft",
    "scrollbarRight",
    "scrollbarSidesOffset",
    "scrollbarBgColor",
    "scrollbarDragBgColor",
    "scrollbarSize",
    // Thumbs
    "thumbActiveColor",
    // Slide
    "slideBgColor",
];

/// Whether `key` is one of the supported CSS variable keys.
pub fn is_css_variable_key(key: &str) -> bool {
    CSS_VARIABLE_KEYS.contains(&key)
}

/// Custom property name for a semantic key (`navigationBgHover` ->
/// `swiper-navigation-bg-hover`), without the leading dashes.
pub fn property_name(key: &str) -> String {
    let mut name = String::from("swiper");
    for c in key.chars() {
        if c.is_ascii_uppercase() {
            name.push('-');
            name.push(c.to_ascii_lowercase());
        } else {
            if name.len() == "swiper".len() {
                name.push('-');
            }
            name.push(c);
        }
    }
    name
}

/// Inline style declarations for the configured variables.
///
/// Only table keys with a non-blank value are emitted, in table order, joined
/// with `;`. Unknown keys are ignored. No variables yields an empty string.
pub fn build_css_vars(vars: &BTreeMap<String, String>) -> String {
    CSS_VARIABLE_KEYS
        .iter()
        .filter_map(|key| {
            let value = vars.get(*key)?.trim();
            if value.is_empty() {
                return None;
            }
            let name = property_name(key);
            Some(format!("--{name}:var(--_{name}, {value})"))
        })
        .collect::<Vec<_>>()
        .join(";")
}
