//! `{name}` placeholder substitution for naming and srcset patterns.
//!
//! A placeholder is `{` followed by one or more characters other than `}`,
//! followed by `}`. Substitution is a single left-to-right pass: replacement
//! values are never re-scanned, and placeholders without a value are kept
//! verbatim (braces included) so a later build step can still resolve them.

use regex::{Captures, Regex};
use std::sync::OnceLock;

fn placeholder_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\{([^}]+)\}").expect("valid regex"))
}

/// Substitute every `{name}` whose name appears in `values`.
///
/// ```text
/// replace_placeholders("{dir}{name}-{size}{ext}", &[("dir", "images/"), ("name", "a"), ("size", "960"), ("ext", ".jpg")])
///     → "images/a-960.jpg"
/// replace_placeholders("{name}-{hash}", &[("name", "a")])
///     → "a-{hash}"
/// ```
pub fn replace_placeholders(template: &str, values: &[(&str, &str)]) -> String {
    placeholder_regex()
        .replace_all(template, |caps: &Captures| {
            let name = &caps[1];
            match values.iter().find(|(key, _)| *key == name) {
                Some((_, value)) => (*value).to_string(),
                None => caps[0].to_string(),
            }
        })
        .into_owned()
}
