//! Document batches and the stages that transform them.
//!
//! A build hands the whole batch of documents to a [`Pipeline`], which runs
//! its stages one after another:
//!
//! ```text
//! scan      content/  →  Documents
//! metadata  images = [...]  →  images = { name: descriptor }
//! markdown  *.md  →  *.html
//! rewrite   <img src>  →  <img src srcset sizes>
//! generate  Documents  →  dist/
//! ```
//!
//! Each stage is an asynchronous operation whose future resolves when the
//! whole batch has been processed; the next stage starts only after that.
//! Inside a stage, documents are independent: each transformation reads and
//! writes only its own document, so no state is shared between them.

use crate::config::{ConfigError, ResponsiveConfig};
use crate::descriptor::DescriptorBuilder;
use crate::markdown::MarkdownStage;
use crate::metadata::{MetadataError, MetadataMapper};
use crate::rewrite::{HtmlRewriter, RewriteError};
use futures::future::BoxFuture;
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("metadata stage failed: {0}")]
    Metadata(#[from] MetadataError),
    #[error("rewrite stage failed: {0}")]
    Rewrite(#[from] RewriteError),
}

/// One document of the batch.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Document {
    /// Front matter fields; the image list and image maps live here.
    pub metadata: Map<String, Value>,
    /// Rendered or raw document body, if the document has one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contents: Option<String>,
}

impl Document {
    pub fn with_contents(contents: impl Into<String>) -> Self {
        Self {
            metadata: Map::new(),
            contents: Some(contents.into()),
        }
    }
}

/// The batch: document key (path relative to the content root) → document.
pub type Documents = BTreeMap<String, Document>;

/// What one stage did to the batch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StageReport {
    pub stage: &'static str,
    /// Documents the stage looked at.
    pub documents: usize,
    /// Documents the stage modified.
    pub changed: usize,
    /// Images turned into descriptors.
    pub images: usize,
    /// Matched elements left alone (no usable `src`).
    pub skipped: usize,
}

impl StageReport {
    pub fn new(stage: &'static str) -> Self {
        Self {
            stage,
            ..Self::default()
        }
    }
}

impl fmt::Display for StageReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} of {} documents changed, {} images",
            self.stage, self.changed, self.documents, self.images
        )?;
        if self.skipped > 0 {
            write!(f, ", {} skipped", self.skipped)?;
        }
        Ok(())
    }
}

/// An asynchronous pass over the whole batch.
pub trait Stage: Send + Sync {
    fn name(&self) -> &'static str;

    /// Resolves once every document has been processed.
    fn run<'a>(
        &'a self,
        documents: &'a mut Documents,
    ) -> BoxFuture<'a, Result<StageReport, PipelineError>>;
}

/// Stages run in insertion order.
#[derive(Default)]
pub struct Pipeline {
    stages: Vec<Box<dyn Stage>>,
}

impl Pipeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stage(mut self, stage: impl Stage + 'static) -> Self {
        self.stages.push(Box::new(stage));
        self
    }

    /// metadata → markdown → rewrite, all sharing one descriptor builder config.
    pub fn from_config(config: &ResponsiveConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let builder = DescriptorBuilder::new(&config.images)?;
        Ok(Self::new()
            .stage(MetadataMapper::from_parts(builder.clone(), &config.metadata))
            .stage(MarkdownStage)
            .stage(HtmlRewriter::from_parts(builder, &config.rewrite)?))
    }

    pub fn stage_names(&self) -> Vec<&'static str> {
        self.stages.iter().map(|s| s.name()).collect()
    }

    /// Run every stage to completion, stopping at the first failure.
    pub async fn run(&self, documents: &mut Documents) -> Result<Vec<StageReport>, PipelineError> {
        let mut reports = Vec::with_capacity(self.stages.len());
        for stage in &self.stages {
            tracing::info!(stage = stage.name(), documents = documents.len(), "running stage");
            let report = stage.run(documents).await?;
            tracing::info!("{report}");
            reports.push(report);
        }
        Ok(reports)
    }
}
