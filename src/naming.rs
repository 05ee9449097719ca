//! Path decomposition for source image paths.
//!
//! Every naming decision starts from the same split of a source path into
//! directory, base name, stem and extension. Paths are always `/`-separated,
//! POSIX-style, regardless of the host platform, because they are URLs as much
//! as they are file paths.
//!
//! ## Directory normalization
//!
//! The directory is the only part that is transformed: when non-empty it ends
//! in exactly one `/`, so a naming pattern can concatenate `{dir}{name}`
//! without caring whether the image lives at the content root:
//! - `images/koh-rong.jpg` → dir=`images/`
//! - `koh-rong.jpg` → dir=``
//! - `/koh-rong.jpg` → dir=`/`

/// Result of decomposing a path like `images/koh-rong.jpg`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathParts {
    /// `/` for absolute paths, otherwise empty
    pub root: String,
    /// Directory with a single trailing `/`, or empty (e.g. `images/`)
    pub dir: String,
    /// File name including extension (e.g. `koh-rong.jpg`)
    pub base: String,
    /// File name without extension (e.g. `koh-rong`)
    pub stem: String,
    /// Extension including the leading dot, or empty (e.g. `.jpg`)
    pub ext: String,
}

impl PathParts {
    /// Decompose a path.
    ///
    /// Handles these patterns:
    /// - `"images/koh-rong.jpg"` → dir="images/", base="koh-rong.jpg", stem="koh-rong", ext=".jpg"
    /// - `"a/b/photo.tar.gz"` → dir="a/b/", stem="photo.tar", ext=".gz"
    /// - `"README"` → dir="", stem="README", ext=""
    /// - `".hidden"` → stem=".hidden", ext=""
    /// - `"images/"` → dir="", base="images"
    pub fn parse(path: &str) -> Self {
        let trimmed = path.trim_end_matches('/');
        // A path made only of separators is the root itself.
        if trimmed.is_empty() && !path.is_empty() {
            return Self {
                root: "/".to_string(),
                dir: "/".to_string(),
                base: String::new(),
                stem: String::new(),
                ext: String::new(),
            };
        }

        let (dir, base) = match trimmed.rfind('/') {
            Some(pos) => (normalize_dir(&trimmed[..pos]), &trimmed[pos + 1..]),
            None => (String::new(), trimmed),
        };

        let (stem, ext) = match extension_start(base) {
            Some(pos) => (&base[..pos], &base[pos..]),
            None => (base, ""),
        };

        Self {
            root: if path.starts_with('/') { "/" } else { "" }.to_string(),
            dir,
            base: base.to_string(),
            stem: stem.to_string(),
            ext: ext.to_string(),
        }
    }

    /// Directory joined with the base name; parses back to the same parts.
    pub fn to_path(&self) -> String {
        format!("{}{}", self.dir, self.base)
    }
}

/// `raw` is everything before the last separator, without it.
fn normalize_dir(raw: &str) -> String {
    let dir = raw.trim_end_matches('/');
    if dir.is_empty() {
        // "/a.jpg" or "//a.jpg": the directory is the root
        "/".to_string()
    } else {
        format!("{dir}/")
    }
}

/// Byte offset of the dot starting the extension, if the base name has one.
fn extension_start(base: &str) -> Option<usize> {
    let pos = base.rfind('.')?;
    if base[..pos].chars().all(|c| c == '.') {
        return None;
    }
    Some(pos)
}
