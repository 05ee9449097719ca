//! Shared test utilities for the responsive-images test suite.
//!
//! Provides document builders, lookup helpers that panic with the available
//! keys on a miss, and the expected descriptor for the `koh-rong` fixture
//! image under the default configuration.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = setup_fixtures();
//! let docs = scan(tmp.path()).unwrap();
//!
//! let doc = find_document(&docs, "example.md");
//! assert_eq!(image_entry(doc, "images", "koh-rong.jpg")["src"], KOH_RONG_SRC);
//! ```

use serde_json::{Value, json};
use std::path::Path;
use tempfile::TempDir;

use crate::pipeline::{Document, Documents};

// =========================================================================
// Expected descriptor for images/koh-rong.jpg
// =========================================================================

pub const KOH_RONG_SRC: &str = "images/koh-rong-960.jpg";
pub const KOH_RONG_SRCSET: &str = "images/koh-rong-1440.jpg 1440w, images/koh-rong-960.jpg 960w, images/koh-rong-480.jpg 480w";
pub const KOH_RONG_SIZES: &str = "(min-width: 960px) 960px, 100vw";

// =========================================================================
// Fixture setup
// =========================================================================

/// Copy `fixtures/content/` to a temp directory and return it.
///
/// Tests get an isolated copy they can mutate without affecting other tests
/// or the source fixtures.
pub fn setup_fixtures() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let fixtures = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/content");
    copy_dir_recursive(&fixtures, tmp.path()).unwrap();
    tmp
}

fn copy_dir_recursive(src: &Path, dst: &Path) -> std::io::Result<()> {
    for entry in std::fs::read_dir(src)? {
        let entry = entry?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());

        if src_path.is_dir() {
            std::fs::create_dir_all(&dst_path)?;
            copy_dir_recursive(&src_path, &dst_path)?;
        } else {
            std::fs::copy(&src_path, &dst_path)?;
        }
    }
    Ok(())
}

// =========================================================================
// Document builders
// =========================================================================

/// A document with the given metadata object and no contents.
pub fn metadata_document(metadata: Value) -> Document {
    match metadata {
        Value::Object(metadata) => Document {
            metadata,
            contents: None,
        },
        other => panic!("metadata must be a JSON object, got {other}"),
    }
}

/// A markdown document declaring `images` with the given body.
pub fn markdown_document(images: &[&str], body: &str) -> Document {
    let mut doc = metadata_document(json!({ "images": images }));
    doc.contents = Some(body.to_string());
    doc
}

// =========================================================================
// Lookups: panic with a clear message on miss
// =========================================================================

/// Find a document by key. Panics if not found.
pub fn find_document<'a>(docs: &'a Documents, key: &str) -> &'a Document {
    docs.get(key).unwrap_or_else(|| {
        let keys: Vec<&str> = docs.keys().map(String::as_str).collect();
        panic!("document '{key}' not found. Available: {keys:?}")
    })
}

/// Entry `name` of the image map stored under `map_key`. Panics if missing.
pub fn image_entry<'a>(doc: &'a Document, map_key: &str, name: &str) -> &'a Value {
    let map = doc
        .metadata
        .get(map_key)
        .and_then(Value::as_object)
        .unwrap_or_else(|| panic!("'{map_key}' is not an image map: {:?}", doc.metadata.get(map_key)));
    map.get(name).unwrap_or_else(|| {
        let names: Vec<&str> = map.keys().map(String::as_str).collect();
        panic!("image '{name}' not found in '{map_key}'. Available: {names:?}")
    })
}
