//! Content directory scanning.
//!
//! Walks the content root and turns every document-like file into an entry of
//! the [`Documents`] batch the pipeline consumes.
//!
//! ## Directory Structure
//!
//! ```text
//! content/                      # Content root
//! ├── config.toml               # Configuration (skipped)
//! ├── example.md                # Markdown document with front matter
//! ├── gallery.html              # HTML document, contents only
//! ├── .drafts/                  # Hidden: skipped with everything inside
//! └── blog/
//!     └── trip.md               # Key: blog/trip.md
//! ```
//!
//! ## Front Matter
//!
//! A markdown file may open with a TOML block fenced by `+++` lines. Its
//! table becomes the document metadata; the rest of the file is the contents:
//!
//! ```text
//! +++
//! title = "Koh Rong"
//! images = ["images/koh-rong.jpg"]
//! +++
//! ![beach](images/koh-rong.jpg)
//! ```
//!
//! Keys are `/`-separated paths relative to the root on every platform.
//! Other files (images, stylesheets) are not documents and are ignored.

use crate::pipeline::{Document, Documents};
use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::{DirEntry, WalkDir};

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Walk error: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("Front matter in {path} is not closed with +++")]
    UnclosedFrontMatter { path: PathBuf },
    #[error("Invalid front matter in {path}: {source}")]
    FrontMatter {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

const FRONT_MATTER_FENCE: &str = "+++";

/// What kind of document a file is, by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DocumentKind {
    Markdown,
    Html,
}

fn document_kind(path: &Path) -> Option<DocumentKind> {
    let ext = path.extension()?.to_string_lossy().to_lowercase();
    match ext.as_str() {
        "md" => Some(DocumentKind::Markdown),
        "html" | "htm" => Some(DocumentKind::Html),
        _ => None,
    }
}

fn is_skipped(entry: &DirEntry) -> bool {
    if entry.depth() == 0 {
        return false;
    }
    let name = entry.file_name().to_string_lossy();
    name.starts_with('.') || name == "config.toml"
}

pub fn scan(root: &Path) -> Result<Documents, ScanError> {
    let mut documents = Documents::new();

    let walker = WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| !is_skipped(e));

    for entry in walker {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        let Some(kind) = document_kind(path) else {
            continue;
        };

        let raw = fs::read_to_string(path)?;
        let document = match kind {
            DocumentKind::Markdown => parse_markdown(path, &raw)?,
            DocumentKind::Html => Document::with_contents(raw),
        };
        let key = document_key(path.strip_prefix(root).unwrap_or(path));
        tracing::debug!(document = %key, "scanned");
        documents.insert(key, document);
    }

    Ok(documents)
}

/// `blog/trip.md` regardless of the platform separator.
fn document_key(rel: &Path) -> String {
    rel.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

fn parse_markdown(path: &Path, raw: &str) -> Result<Document, ScanError> {
    let Some((front, body)) = split_front_matter(raw) else {
        return Ok(Document::with_contents(raw));
    };
    let front = front.ok_or_else(|| ScanError::UnclosedFrontMatter {
        path: path.to_path_buf(),
    })?;

    let table: toml::Table = toml::from_str(front).map_err(|source| ScanError::FrontMatter {
        path: path.to_path_buf(),
        source,
    })?;
    let metadata = match serde_json::to_value(table)? {
        Value::Object(map) => map,
        _ => Map::new(),
    };

    Ok(Document {
        metadata,
        contents: Some(body.to_string()),
    })
}

/// Split `+++\n<toml>\n+++\n<body>`.
///
/// - `None`: the file has no front matter.
/// - `Some((None, _))`: an opening fence without a closing one.
fn split_front_matter(raw: &str) -> Option<(Option<&str>, &str)> {
    let rest = raw.strip_prefix(FRONT_MATTER_FENCE)?;
    let rest = rest
        .strip_prefix("\r\n")
        .or_else(|| rest.strip_prefix('\n'))?;

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end() == FRONT_MATTER_FENCE {
            let front = &rest[..offset];
            let body = &rest[offset + line.len()..];
            return Some((Some(front), body));
        }
        offset += line.len();
    }
    Some((None, rest))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::*;
    use serde_json::json;
    use tempfile::TempDir;

    // =========================================================================
    // Front matter tests
    // =========================================================================

    #[test]
    fn front_matter_is_split_from_body() {
        let raw = "+++\ntitle = \"x\"\n+++\nbody\n";
        assert_eq!(
            split_front_matter(raw),
            Some((Some("title = \"x\"\n"), "body\n"))
        );
    }

    #[test]
    fn no_fence_means_no_front_matter() {
        assert_eq!(split_front_matter("# Title\n"), None);
        assert_eq!(split_front_matter("+++not a fence"), None);
    }

    #[test]
    fn crlf_fences_are_accepted() {
        let raw = "+++\r\na = 1\r\n+++\r\nbody";
        assert_eq!(split_front_matter(raw), Some((Some("a = 1\r\n"), "body")));
    }

    #[test]
    fn unclosed_front_matter_is_error() {
        let result = parse_markdown(Path::new("x.md"), "+++\na = 1\nbody\n");
        assert!(matches!(result, Err(ScanError::UnclosedFrontMatter { .. })));
    }

    #[test]
    fn invalid_toml_is_error() {
        let result = parse_markdown(Path::new("x.md"), "+++\na = \n+++\n");
        assert!(matches!(result, Err(ScanError::FrontMatter { .. })));
    }

    #[test]
    fn front_matter_becomes_metadata() {
        let doc = parse_markdown(
            Path::new("x.md"),
            "+++\ntitle = \"Trip\"\nimages = [\"a.jpg\", \"b/c.png\"]\n+++\n# Hi\n",
        )
        .unwrap();
        assert_eq!(doc.metadata["title"], "Trip");
        assert_eq!(doc.metadata["images"], json!(["a.jpg", "b/c.png"]));
        assert_eq!(doc.contents.as_deref(), Some("# Hi\n"));
    }

    #[test]
    fn markdown_without_front_matter_has_empty_metadata() {
        let doc = parse_markdown(Path::new("x.md"), "# Hi\n").unwrap();
        assert!(doc.metadata.is_empty());
        assert_eq!(doc.contents.as_deref(), Some("# Hi\n"));
    }

    // =========================================================================
    // scan() tests
    // =========================================================================

    #[test]
    fn scan_finds_fixture_documents() {
        let tmp = setup_fixtures();
        let docs = scan(tmp.path()).unwrap();

        let keys: Vec<&str> = docs.keys().map(String::as_str).collect();
        assert_eq!(
            keys,
            vec!["blog/plain.md", "example.md", "gallery.html"]
        );
    }

    #[test]
    fn scan_reads_fixture_front_matter() {
        let tmp = setup_fixtures();
        let docs = scan(tmp.path()).unwrap();

        let example = find_document(&docs, "example.md");
        assert_eq!(example.metadata["images"], json!(["images/koh-rong.jpg"]));
        assert!(example
            .contents
            .as_deref()
            .unwrap()
            .contains("![Koh Rong beach](images/koh-rong.jpg)"));
    }

    #[test]
    fn html_documents_have_no_metadata() {
        let tmp = setup_fixtures();
        let docs = scan(tmp.path()).unwrap();

        let gallery = find_document(&docs, "gallery.html");
        assert!(gallery.metadata.is_empty());
        assert!(gallery.contents.as_deref().unwrap().contains("<img"));
    }

    #[test]
    fn hidden_entries_and_config_are_skipped() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join(".drafts")).unwrap();
        fs::write(tmp.path().join(".drafts/secret.md"), "x").unwrap();
        fs::write(tmp.path().join(".hidden.html"), "x").unwrap();
        fs::write(tmp.path().join("config.toml"), "").unwrap();
        fs::write(tmp.path().join("index.html"), "<p>x</p>").unwrap();

        let docs = scan(tmp.path()).unwrap();

        assert_eq!(docs.keys().collect::<Vec<_>>(), vec!["index.html"]);
    }

    #[test]
    fn non_document_files_are_ignored() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("photo.jpg"), "fake image").unwrap();
        fs::write(tmp.path().join("style.css"), "body {}").unwrap();

        let docs = scan(tmp.path()).unwrap();
        assert!(docs.is_empty());
    }

    #[test]
    fn nested_keys_use_forward_slashes() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join("a/b")).unwrap();
        fs::write(tmp.path().join("a/b/page.htm"), "x").unwrap();

        let docs = scan(tmp.path()).unwrap();
        assert!(docs.contains_key("a/b/page.htm"));
    }

    #[test]
    fn missing_root_is_error() {
        let tmp = TempDir::new().unwrap();
        let result = scan(&tmp.path().join("nope"));
        assert!(matches!(result, Err(ScanError::Walk(_))));
    }
}
