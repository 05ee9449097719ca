//! Ordered element attributes with explicit precedence.
//!
//! Attribute order is part of the output contract: rendered elements list
//! computed attributes first, so two builds of the same input produce
//! byte-identical markup. [`Attributes`] keeps insertion order; overwriting
//! an existing name keeps its original position and replaces only the value.
//!
//! Values are stored unescaped and escaped once, when rendered.

use indexmap::IndexMap;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attributes(IndexMap<String, String>);

impl Attributes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite. An overwritten name keeps its position.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// `self` overlaid by `overlay`: on a name collision the overlay value wins.
    ///
    /// ```text
    /// merge({src, srcset, alt="a"}, {alt="b", class}) = {src, srcset, alt="b", class}
    /// ```
    pub fn merge(&self, overlay: &Attributes) -> Attributes {
        let mut merged = self.clone();
        for (name, value) in overlay.iter() {
            merged.insert(name, value);
        }
        merged
    }

    /// Parse a `name=value` pair as given on the command line.
    ///
    /// A bare `name` is a boolean attribute with an empty value.
    pub fn parse_pair(pair: &str) -> (String, String) {
        match pair.split_once('=') {
            Some((name, value)) => (name.trim().to_string(), value.to_string()),
            None => (pair.trim().to_string(), String::new()),
        }
    }

    /// Serialize as a start tag: `<img src="a.jpg" alt="x" />`.
    ///
    /// `self_closing` appends ` />` instead of `>`.
    pub fn to_start_tag(&self, tag: &str, self_closing: bool) -> String {
        let mut out = String::with_capacity(16 + self.0.len() * 24);
        out.push('<');
        out.push_str(tag);
        for (name, value) in self.iter() {
            out.push_str(&format!(" {}=\"{}\"", name, htmlize::escape_attribute(value)));
        }
        out.push_str(if self_closing { " />" } else { ">" });
        out
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Attributes {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut attrs = Attributes::new();
        for (name, value) in iter {
            attrs.insert(name, value);
        }
        attrs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(attrs: &Attributes) -> Vec<&str> {
        attrs.iter().map(|(k, _)| k).collect()
    }

    #[test]
    fn insertion_order_is_kept() {
        let attrs: Attributes = [("b", "1"), ("a", "2"), ("c", "3")].into_iter().collect();
        assert_eq!(names(&attrs), vec!["b", "a", "c"]);
    }

    #[test]
    fn overwrite_keeps_position() {
        let mut attrs: Attributes = [("a", "1"), ("b", "2")].into_iter().collect();
        attrs.insert("a", "3");
        assert_eq!(names(&attrs), vec!["a", "b"]);
        assert_eq!(attrs.get("a"), Some("3"));
    }

    #[test]
    fn merge_overlay_wins_and_appends_new_names() {
        let base: Attributes = [("src", "s"), ("alt", "base")].into_iter().collect();
        let overlay: Attributes = [("alt", "mine"), ("class", "wide")].into_iter().collect();
        let merged = base.merge(&overlay);
        assert_eq!(names(&merged), vec!["src", "alt", "class"]);
        assert_eq!(merged.get("alt"), Some("mine"));
        // Inputs untouched
        assert_eq!(base.get("alt"), Some("base"));
    }

    #[test]
    fn parse_pair_variants() {
        assert_eq!(
            Attributes::parse_pair("class=wide"),
            ("class".to_string(), "wide".to_string())
        );
        assert_eq!(
            Attributes::parse_pair("data-x=a=b"),
            ("data-x".to_string(), "a=b".to_string())
        );
        assert_eq!(
            Attributes::parse_pair("hidden"),
            ("hidden".to_string(), String::new())
        );
    }

    #[test]
    fn start_tag_self_closing() {
        let attrs: Attributes = [("src", "a.jpg"), ("alt", "x")].into_iter().collect();
        assert_eq!(attrs.to_start_tag("img", true), r#"<img src="a.jpg" alt="x" />"#);
    }

    #[test]
    fn start_tag_open() {
        let attrs: Attributes = [("class", "frame")].into_iter().collect();
        assert_eq!(attrs.to_start_tag("figure", false), r#"<figure class="frame">"#);
    }

    #[test]
    fn start_tag_escapes_values() {
        let attrs: Attributes = [("alt", r#"a "quoted" & <b>"#)].into_iter().collect();
        let tag = attrs.to_start_tag("img", true);
        assert!(tag.contains("&quot;quoted&quot;"));
        assert!(tag.contains("&amp;"));
        assert!(!tag.contains("<b>"));
    }
}
