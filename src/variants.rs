//! Per-width variant URLs and srcset entries.
//!
//! For each configured width, the naming pattern produces the variant URL and
//! the srcset pattern wraps it into one srcset entry:
//!
//! ```text
//! images/koh-rong.jpg, widths [1440, 960, 480]
//!   naming  "{dir}{name}-{size}{ext}" → images/koh-rong-1440.jpg, ...
//!   srcset  "{url} {size}w"           → images/koh-rong-1440.jpg 1440w, ...
//! ```
//!
//! Placeholders available to the naming pattern: `{root}`, `{dir}`, `{name}`
//! (stem), `{ext}`, `{base}`, `{size}`. To the srcset pattern: `{url}`, `{size}`.
//! Anything else is left in place.

use crate::config::ImagesConfig;
use crate::naming::PathParts;
use crate::placeholder::replace_placeholders;

/// One generated width of a source image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Variant {
    pub width: u32,
    /// Naming pattern output, e.g. `images/koh-rong-960.jpg`
    pub url: String,
    /// Srcset pattern output, e.g. `images/koh-rong-960.jpg 960w`
    pub entry: String,
}

/// Format the variant URL of `parts` at `width`.
pub fn format_name(pattern: &str, parts: &PathParts, width: u32) -> String {
    let size = width.to_string();
    replace_placeholders(
        pattern,
        &[
            ("root", parts.root.as_str()),
            ("dir", parts.dir.as_str()),
            ("name", parts.stem.as_str()),
            ("ext", parts.ext.as_str()),
            ("base", parts.base.as_str()),
            ("size", size.as_str()),
        ],
    )
}

/// Generate one variant per configured width, in `widths` order.
pub fn generate_variants(src: &str, images: &ImagesConfig) -> Vec<Variant> {
    let parts = PathParts::parse(src);
    images
        .widths
        .iter()
        .map(|&width| {
            let url = format_name(&images.naming_pattern, &parts, width);
            let size = width.to_string();
            let entry = replace_placeholders(
                &images.srcset_pattern,
                &[("url", url.as_str()), ("size", size.as_str())],
            );
            Variant { width, url, entry }
        })
        .collect()
}
