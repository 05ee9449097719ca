//! Markdown rendering stage.
//!
//! Every `*.md` document with contents is rendered to HTML with pulldown-cmark
//! and moved to the same key with an `.html` extension. Metadata travels with
//! the document unchanged. Runs between the metadata and rewrite stages, so the
//! `<img>` elements markdown produces are rewritten like hand-written ones.

use crate::pipeline::{Document, Documents, PipelineError, Stage, StageReport};
use futures::future::BoxFuture;
use pulldown_cmark::{Parser, html as md_html};

pub struct MarkdownStage;

/// Render a markdown body to an HTML fragment.
pub fn render_markdown(source: &str) -> String {
    let parser = Parser::new(source);
    let mut html = String::with_capacity(source.len() * 3 / 2);
    md_html::push_html(&mut html, parser);
    html
}

/// `post.md` → `post.html`; `None` for keys that are not markdown.
fn html_key(key: &str) -> Option<String> {
    key.strip_suffix(".md").map(|stem| format!("{stem}.html"))
}

impl MarkdownStage {
    fn render_all(&self, documents: &mut Documents) -> StageReport {
        let mut report = StageReport::new(self.name());

        let markdown: Vec<(String, String)> = documents
            .iter()
            .filter(|(_, doc)| doc.contents.is_some())
            .filter_map(|(key, _)| html_key(key).map(|target| (key.clone(), target)))
            .collect();

        for (key, target) in markdown {
            let Some(Document { metadata, contents }) = documents.remove(&key) else {
                continue;
            };
            let html = render_markdown(contents.as_deref().unwrap_or_default());
            if documents.contains_key(&target) {
                tracing::warn!(source = %key, target = %target, "rendered markdown replaces existing document");
            }
            documents.insert(
                target,
                Document {
                    metadata,
                    contents: Some(html),
                },
            );
            report.documents += 1;
            report.changed += 1;
        }
        report
    }
}

impl Stage for MarkdownStage {
    fn name(&self) -> &'static str {
        "markdown"
    }

    fn run<'a>(
        &'a self,
        documents: &'a mut Documents,
    ) -> BoxFuture<'a, Result<StageReport, PipelineError>> {
        Box::pin(async move { Ok::<_, PipelineError>(self.render_all(documents)) })
    }
}
