//! Glob matching over document keys.
//!
//! Document keys are `/`-separated paths relative to the content root, matched
//! with git's wildmatch rules in path-name mode:
//!
//! | Glob | Matches |
//! |------|---------|
//! | `*` | any run of characters except `/` |
//! | `?` | one character except `/` |
//! | `**/` | zero or more whole directories |
//! | `**` | anything, separators included |
//! | `[abc]`, `[a-z]`, `[!a]` | one character except `/` from (or not from) a class |

use gix::bstr::{BString, ByteSlice};
use gix::glob::wildmatch;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GlobError {
    #[error("glob pattern is empty")]
    Empty,
}

/// A document key glob.
#[derive(Debug, Clone)]
pub struct FileMatcher {
    pattern: BString,
}

impl FileMatcher {
    pub fn new(pattern: &str) -> Result<Self, GlobError> {
        if pattern.trim().is_empty() {
            return Err(GlobError::Empty);
        }
        Ok(Self {
            pattern: pattern.into(),
        })
    }

    pub fn is_match(&self, key: &str) -> bool {
        wildmatch(
            self.pattern.as_bstr(),
            key.into(),
            wildmatch::Mode::NO_MATCH_SLASH_LITERAL,
        )
    }
}
