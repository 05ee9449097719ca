//! `<img>` rewriting inside rendered documents.
//!
//! Documents whose key matches the `files` glob are streamed through
//! [lol_html](https://docs.rs/lol_html); every element matching the configured
//! CSS selector is replaced by one carrying the computed responsive
//! attributes:
//!
//! ```text
//! <img src="images/koh-rong.jpg" alt="Beach" class="wide">
//!   → <img src="images/koh-rong-960.jpg" srcset="..." sizes="..." alt="Beach" class="wide" />
//! ```
//!
//! The replacement's attributes are the descriptor's `src`, `srcset` and
//! `sizes`, overlaid by the element's own attributes other than `src`: a
//! hand-written `srcset`, `sizes`, `alt` or `class` survives. Children of
//! non-void elements are kept in place.
//!
//! Elements without a usable `src` are left exactly as they are.
//!
//! A document's contents are replaced only after its whole rewrite has
//! succeeded, so a failure never leaves a half-rewritten document behind.

use crate::attributes::Attributes;
use crate::config::{ConfigError, ResponsiveConfig, RewriteConfig};
use crate::descriptor::DescriptorBuilder;
use crate::glob::FileMatcher;
use crate::pipeline::{Documents, PipelineError, Stage, StageReport};
use futures::future::BoxFuture;
use lol_html::errors::RewritingError;
use lol_html::html_content::{ContentType, Element};
use lol_html::{RewriteStrSettings, element, rewrite_str};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RewriteError {
    #[error("{document}: {source}")]
    Html {
        document: String,
        #[source]
        source: RewritingError,
    },
}

/// Output of rewriting one HTML string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rewritten {
    pub html: String,
    /// Elements replaced.
    pub images: usize,
    /// Matched elements left alone.
    pub skipped: usize,
}

/// The rewrite stage.
#[derive(Debug, Clone)]
pub struct HtmlRewriter {
    builder: DescriptorBuilder,
    files: FileMatcher,
    selector: String,
}

impl HtmlRewriter {
    pub fn new(config: &ResponsiveConfig) -> Result<Self, ConfigError> {
        let builder = DescriptorBuilder::new(&config.images)?;
        Self::from_parts(builder, &config.rewrite)
    }

    pub fn from_parts(
        builder: DescriptorBuilder,
        rewrite: &RewriteConfig,
    ) -> Result<Self, ConfigError> {
        let files = FileMatcher::new(&rewrite.files)
            .map_err(|e| ConfigError::Validation(format!("rewrite.files: {e}")))?;
        rewrite
            .selector
            .parse::<lol_html::Selector>()
            .map_err(|e| ConfigError::Validation(format!("rewrite.selector: {e}")))?;
        Ok(Self {
            builder,
            files,
            selector: rewrite.selector.clone(),
        })
    }

    /// Whether a document key is selected for rewriting.
    pub fn matches(&self, key: &str) -> bool {
        self.files.is_match(key)
    }

    /// Rewrite every matching element of an HTML string.
    pub fn rewrite_html(&self, html: &str) -> Result<Rewritten, RewritingError> {
        let mut images = 0;
        let mut skipped = 0;

        let output = rewrite_str(
            html,
            RewriteStrSettings {
                // The selector was parsed successfully in from_parts().
                element_content_handlers: vec![element!(self.selector, |el| {
                    if self.replace_element(el) {
                        images += 1;
                    } else {
                        skipped += 1;
                    }
                    Ok(())
                })],
                ..RewriteStrSettings::new()
            },
        )?;

        Ok(Rewritten {
            html: output,
            images,
            skipped,
        })
    }

    /// Returns `false` when the element has no usable `src`.
    fn replace_element(&self, el: &mut Element) -> bool {
        let tag = el.tag_name();
        let src = el
            .get_attribute("src")
            .map(|raw| htmlize::unescape_attribute(raw).into_owned())
            .filter(|src| !src.trim().is_empty());
        let Some(src) = src else {
            tracing::warn!(tag = %tag, "skipping element without src");
            return false;
        };

        // Attribute values come back exactly as written in the source, entities included.
        let original: Attributes = el
            .attributes()
            .iter()
            .filter(|attr| !attr.name().eq_ignore_ascii_case("src"))
            .map(|attr| {
                let value = htmlize::unescape_attribute(attr.value()).into_owned();
                (attr.name(), value)
            })
            .collect();

        let attrs = self.builder.build(&src).attributes().merge(&original);
        let void = !el.can_have_content();

        el.before(&attrs.to_start_tag(&tag, void), ContentType::Html);
        if !void {
            el.after(&format!("</{tag}>"), ContentType::Html);
        }
        el.remove_and_keep_content();
        true
    }

    fn rewrite_all(&self, documents: &mut Documents) -> Result<StageReport, RewriteError> {
        let mut report = StageReport::new(self.name());
        for (key, document) in documents.iter_mut() {
            if !self.matches(key) {
                continue;
            }
            let Some(contents) = document.contents.as_deref() else {
                continue;
            };
            report.documents += 1;

            let rewritten = self
                .rewrite_html(contents)
                .map_err(|source| RewriteError::Html {
                    document: key.clone(),
                    source,
                })?;
            report.images += rewritten.images;
            report.skipped += rewritten.skipped;
            if rewritten.skipped > 0 {
                tracing::warn!(
                    document = %key,
                    skipped = rewritten.skipped,
                    "matched elements without src were left unchanged"
                );
            }
            if rewritten.images > 0 {
                tracing::debug!(document = %key, images = rewritten.images, "rewrote images");
                document.contents = Some(rewritten.html);
                report.changed += 1;
            }
        }
        Ok(report)
    }
}

impl Stage for HtmlRewriter {
    fn name(&self) -> &'static str {
        "rewrite"
    }

    fn run<'a>(
        &'a self,
        documents: &'a mut Documents,
    ) -> BoxFuture<'a, Result<StageReport, PipelineError>> {
        Box::pin(async move { self.rewrite_all(documents).map_err(PipelineError::from) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::Document;
    use crate::test_helpers::*;
    use futures::executor::block_on;

    fn rewriter() -> HtmlRewriter {
        HtmlRewriter::new(&ResponsiveConfig::default()).unwrap()
    }

    fn rewrite(html: &str) -> Rewritten {
        rewriter().rewrite_html(html).unwrap()
    }

    // =========================================================================
    // rewrite_html() tests
    // =========================================================================

    #[test]
    fn plain_img_gets_responsive_attributes() {
        let out = rewrite(r#"<p><img src="images/koh-rong.jpg"></p>"#);
        assert_eq!(out.images, 1);
        assert_eq!(
            out.html,
            format!(
                r#"<p><img src="{KOH_RONG_SRC}" srcset="{KOH_RONG_SRCSET}" sizes="{KOH_RONG_SIZES}" /></p>"#
            )
        );
    }

    #[test]
    fn no_duplicate_attributes() {
        let out = rewrite(r#"<img src="images/koh-rong.jpg" alt="Beach">"#);
        assert_eq!(out.html.matches(" src=").count(), 1);
        assert_eq!(out.html.matches(" srcset=").count(), 1);
        assert_eq!(out.html.matches(" sizes=").count(), 1);
        assert_eq!(out.html.matches(" alt=").count(), 1);
    }

    #[test]
    fn original_attributes_are_kept_after_computed_ones() {
        let out = rewrite(r#"<img class="wide" src="images/koh-rong.jpg" title="T" alt="A">"#);
        assert!(out.html.starts_with(&format!(r#"<img src="{KOH_RONG_SRC}" srcset="#)));
        assert!(out.html.ends_with(r#" class="wide" title="T" alt="A" />"#));
    }

    #[test]
    fn hand_written_sizes_win_over_computed() {
        let out = rewrite(r#"<img src="images/koh-rong.jpg" sizes="50vw">"#);
        assert!(out.html.contains(r#"sizes="50vw""#));
        assert!(!out.html.contains(KOH_RONG_SIZES));
        // Position of the computed attribute is kept
        assert!(out.html.ends_with(r#"sizes="50vw" />"#));
    }

    #[test]
    fn every_matching_element_in_document_order() {
        let out = rewrite(r#"<img src="a.jpg"><span>between</span><img src="b/c.png">"#);
        assert_eq!(out.images, 2);
        let a = out.html.find("a-960.jpg").unwrap();
        let between = out.html.find("between").unwrap();
        let c = out.html.find("b/c-960.png").unwrap();
        assert!(a < between && between < c);
    }

    #[test]
    fn element_without_src_is_skipped() {
        let html = r#"<img alt="no source"><img src="  ">"#;
        let out = rewrite(html);
        assert_eq!(out.images, 0);
        assert_eq!(out.skipped, 2);
        assert_eq!(out.html, html);
    }

    #[test]
    fn surrounding_markup_is_preserved() {
        let html = "<!DOCTYPE html>\n<html><head><title>x</title></head><body><h1>Hi</h1></body></html>";
        let out = rewrite(html);
        assert_eq!(out.html, html);
    }

    #[test]
    fn entities_in_attributes_are_not_double_escaped() {
        let out = rewrite(r#"<img src="a.jpg" alt="Tom &amp; Jerry">"#);
        assert!(out.html.contains(r#"alt="Tom &amp; Jerry""#));
        assert!(!out.html.contains("&amp;amp;"));
    }

    #[test]
    fn escaped_src_is_decoded_before_naming() {
        let out = rewrite(r#"<img src="a&amp;b.jpg">"#);
        assert!(out.html.contains(r#"src="a&amp;b-960.jpg""#));
    }

    #[test]
    fn custom_selector_limits_matches() {
        let mut config = ResponsiveConfig::default();
        config.rewrite.selector = "img.responsive".to_string();
        let rewriter = HtmlRewriter::new(&config).unwrap();

        let out = rewriter
            .rewrite_html(r#"<img src="a.jpg"><img class="responsive" src="b.jpg">"#)
            .unwrap();

        assert_eq!(out.images, 1);
        assert!(out.html.starts_with(r#"<img src="a.jpg">"#));
        assert!(out.html.contains("b-960.jpg"));
    }

    #[test]
    fn non_void_element_keeps_children() {
        let mut config = ResponsiveConfig::default();
        config.rewrite.selector = "amp-img".to_string();
        let rewriter = HtmlRewriter::new(&config).unwrap();

        let out = rewriter
            .rewrite_html(r#"<amp-img src="a.jpg" layout="responsive"><noscript>x</noscript></amp-img>"#)
            .unwrap();

        assert_eq!(
            out.html,
            r#"<amp-img src="a-960.jpg" srcset="a-1440.jpg 1440w, a-960.jpg 960w, a-480.jpg 480w" sizes="(min-width: 960px) 960px, 100vw" layout="responsive"><noscript>x</noscript></amp-img>"#
        );
    }

    #[test]
    fn invalid_selector_is_a_config_error() {
        let mut config = ResponsiveConfig::default();
        config.rewrite.selector = "img[".to_string();
        assert!(matches!(
            HtmlRewriter::new(&config),
            Err(ConfigError::Validation(_))
        ));
    }

    // =========================================================================
    // Stage tests
    // =========================================================================

    #[test]
    fn stage_only_touches_matching_documents() {
        let mut docs = Documents::new();
        docs.insert(
            "index.html".to_string(),
            Document::with_contents(r#"<img src="a.jpg">"#),
        );
        docs.insert(
            "notes.txt".to_string(),
            Document::with_contents(r#"<img src="a.jpg">"#),
        );
        docs.insert("empty.html".to_string(), Document::default());

        let report = block_on(rewriter().run(&mut docs)).unwrap();

        assert_eq!(report.documents, 1);
        assert_eq!(report.changed, 1);
        assert_eq!(report.images, 1);
        assert!(docs["index.html"].contents.as_deref().unwrap().contains("srcset="));
        assert_eq!(docs["notes.txt"].contents.as_deref(), Some(r#"<img src="a.jpg">"#));
        assert_eq!(docs["empty.html"].contents, None);
    }

    #[test]
    fn stage_counts_skipped_elements() {
        let mut docs = Documents::new();
        docs.insert(
            "a.html".to_string(),
            Document::with_contents(r#"<img alt="x"><img src="a.jpg">"#),
        );

        let report = block_on(rewriter().run(&mut docs)).unwrap();

        assert_eq!(report.images, 1);
        assert_eq!(report.skipped, 1);
    }

    #[test]
    fn nested_documents_match_default_glob() {
        let r = rewriter();
        assert!(r.matches("index.html"));
        assert!(r.matches("blog/2024/post.html"));
        assert!(!r.matches("blog/post.md"));
    }
}
