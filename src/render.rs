//! Inline `<img>` rendering from a text shorthand.
//!
//! Templates and markdown extensions call the renderer directly with
//! `path` or `path|title`, without going through a document batch:
//!
//! ```text
//! images/koh-rong.jpg|A beach
//!   → <img src="images/koh-rong-960.jpg" srcset="..." sizes="..." title="A beach" alt="A beach" />
//! ```
//!
//! Attribute precedence, lowest first: computed `src`/`srcset`/`sizes`,
//! title/alt derived from the shorthand, the renderer's default attributes,
//! then attributes passed to the call.

use crate::attributes::Attributes;
use crate::descriptor::DescriptorBuilder;

#[derive(Debug, Clone)]
pub struct ImageRenderer {
    builder: DescriptorBuilder,
    defaults: Attributes,
}

impl ImageRenderer {
    pub fn new(builder: DescriptorBuilder) -> Self {
        Self::with_defaults(builder, Attributes::new())
    }

    /// A renderer adding `defaults` to every element (e.g. `loading="lazy"`).
    pub fn with_defaults(builder: DescriptorBuilder, defaults: Attributes) -> Self {
        Self { builder, defaults }
    }

    /// Render `path` or `path|title`.
    ///
    /// Only the first two `|` segments are read; an empty title is no title.
    pub fn render(&self, text: &str) -> String {
        self.render_text_with(text, &Attributes::new())
    }

    /// Render from an explicit path and attributes, which win over everything.
    pub fn render_with(&self, src: &str, attrs: &Attributes) -> String {
        self.render_element(src, None, attrs)
    }

    /// Shorthand plus explicit attributes.
    pub fn render_text_with(&self, text: &str, attrs: &Attributes) -> String {
        let mut parts = text.split('|');
        let src = parts.next().unwrap_or_default();
        let title = parts.next().filter(|t| !t.is_empty());
        self.render_element(src, title, attrs)
    }

    fn render_element(&self, src: &str, title: Option<&str>, attrs: &Attributes) -> String {
        let mut computed = self.builder.build(src).attributes();
        if let Some(title) = title {
            computed.insert("title", title);
            computed.insert("alt", title);
        }
        computed
            .merge(&self.defaults)
            .merge(attrs)
            .to_start_tag("img", true)
    }
}
