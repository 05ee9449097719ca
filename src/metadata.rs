//! Declared image lists → image maps.
//!
//! A document declares the images it uses in its front matter:
//!
//! ```toml
//! images = ["images/koh-rong.jpg", "images/otres.jpg"]
//! ```
//!
//! The mapper folds that list into a map of [`ImageDescriptor`]s so templates
//! can look images up by name instead of recomputing srcsets themselves.
//!
//! ## Modes
//!
//! - **in-place** (default): the list itself becomes the map, keyed by base
//!   name (`images.koh-rong.jpg.srcset`).
//! - **side-map**: the list is left untouched and the map is written to
//!   `map_key`, keyed by the declared path (`image_map."images/koh-rong.jpg"`).
//!
//! When two declared paths produce the same key, the later one wins; the key
//! keeps the position of its first occurrence.
//!
//! Documents without the images key are not touched at all.

use crate::config::{ConfigError, MapMode, MetadataConfig, ResponsiveConfig};
use crate::descriptor::{DescriptorBuilder, ImageDescriptor};
use crate::naming::PathParts;
use crate::pipeline::{Document, Documents, PipelineError, Stage, StageReport};
use futures::future::BoxFuture;
use indexmap::IndexMap;
use serde_json::Value;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MetadataError {
    #[error("{document}: `{key}` must be a list of image paths")]
    InvalidImageList { document: String, key: String },
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Map key → descriptor, in declaration order.
pub type ImageMap = IndexMap<String, ImageDescriptor>;

/// The metadata stage.
#[derive(Debug, Clone)]
pub struct MetadataMapper {
    builder: DescriptorBuilder,
    images_key: String,
    mode: MapMode,
    map_key: String,
}

impl MetadataMapper {
    pub fn new(config: &ResponsiveConfig) -> Result<Self, ConfigError> {
        let builder = DescriptorBuilder::new(&config.images)?;
        Ok(Self::from_parts(builder, &config.metadata))
    }

    pub fn from_parts(builder: DescriptorBuilder, metadata: &MetadataConfig) -> Self {
        Self {
            builder,
            images_key: metadata.images_key.clone(),
            mode: metadata.mode,
            map_key: metadata.map_key.clone(),
        }
    }

    /// Fold declared paths into a map keyed according to the mode.
    pub fn image_map<S: AsRef<str>>(&self, paths: &[S]) -> ImageMap {
        paths.iter().fold(ImageMap::new(), |mut map, path| {
            let path = path.as_ref();
            let key = match self.mode {
                MapMode::InPlace => PathParts::parse(path).base,
                MapMode::SideMap => path.to_string(),
            };
            map.insert(key, self.builder.build(path));
            map
        })
    }

    /// Map one document. Returns the number of declared images, or `None`
    /// when the document has no images key.
    ///
    /// The document is only modified once its list has been read in full.
    pub fn map_document(
        &self,
        key: &str,
        document: &mut Document,
    ) -> Result<Option<usize>, MetadataError> {
        let Some(declared) = document.metadata.get(&self.images_key) else {
            return Ok(None);
        };
        let paths = declared_paths(declared).ok_or_else(|| MetadataError::InvalidImageList {
            document: key.to_string(),
            key: self.images_key.clone(),
        })?;

        let map = self.image_map(&paths);
        let count = paths.len();
        let value = serde_json::to_value(&map)?;

        let target = match self.mode {
            MapMode::InPlace => self.images_key.clone(),
            MapMode::SideMap => self.map_key.clone(),
        };
        document.metadata.insert(target, value);
        tracing::debug!(document = key, images = count, "mapped declared images");
        Ok(Some(count))
    }

    fn map_all(&self, documents: &mut Documents) -> Result<StageReport, MetadataError> {
        let mut report = StageReport::new(self.name());
        for (key, document) in documents.iter_mut() {
            report.documents += 1;
            if let Some(count) = self.map_document(key, document)? {
                report.changed += 1;
                report.images += count;
            }
        }
        Ok(report)
    }
}

impl Stage for MetadataMapper {
    fn name(&self) -> &'static str {
        "metadata"
    }

    fn run<'a>(
        &'a self,
        documents: &'a mut Documents,
    ) -> BoxFuture<'a, Result<StageReport, PipelineError>> {
        Box::pin(async move { self.map_all(documents).map_err(PipelineError::from) })
    }
}

/// The declared list as strings, or `None` if it is not a list of strings.
fn declared_paths(value: &Value) -> Option<Vec<String>> {
    value
        .as_array()?
        .iter()
        .map(|v| v.as_str().map(String::from))
        .collect()
}
