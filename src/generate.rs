//! Output writing.
//!
//! Last step of a build. Writes the transformed batch to the output directory:
//!
//! ```text
//! dist/
//! ├── manifest.json          # document key → metadata (image maps included)
//! ├── example.html           # rendered from example.md
//! ├── gallery.html
//! └── blog/
//!     └── trip.html
//! ```
//!
//! Documents without contents appear in the manifest only. The manifest is
//! pretty-printed and keys are sorted, so rebuilding unchanged content
//! produces an identical file.

use crate::pipeline::Documents;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Component, Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Document key escapes the output directory: {0}")]
    UnsafeKey(String),
}

pub const MANIFEST_FILE: &str = "manifest.json";

/// What a call to [`generate`] wrote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateSummary {
    pub written: Vec<PathBuf>,
    pub manifest: PathBuf,
}

pub fn generate(documents: &Documents, output_dir: &Path) -> Result<GenerateSummary, GenerateError> {
    fs::create_dir_all(output_dir)?;

    let mut written = Vec::new();
    for (key, document) in documents {
        let Some(contents) = &document.contents else {
            continue;
        };
        let path = output_dir.join(relative_path(key)?);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, contents)?;
        tracing::debug!(document = %key, path = %path.display(), "wrote document");
        written.push(path);
    }

    let manifest: BTreeMap<&str, &Map<String, Value>> = documents
        .iter()
        .map(|(key, doc)| (key.as_str(), &doc.metadata))
        .collect();
    let manifest_path = output_dir.join(MANIFEST_FILE);
    fs::write(&manifest_path, serde_json::to_string_pretty(&manifest)?)?;

    Ok(GenerateSummary {
        written,
        manifest: manifest_path,
    })
}

/// A document key as a path that stays inside the output directory.
fn relative_path(key: &str) -> Result<PathBuf, GenerateError> {
    let path = PathBuf::from_iter(key.split('/').filter(|s| !s.is_empty()));
    let contained = path.components().count() > 0
        && path.components().all(|c| matches!(c, Component::Normal(_)));
    if contained {
        Ok(path)
    } else {
        Err(GenerateError::UnsafeKey(key.to_string()))
    }
}
