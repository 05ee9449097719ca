//! # Responsive Images
//!
//! Build-time responsive image metadata for static sites. Given the image paths
//! a document declares and a list of target widths, every image gets a
//! descriptor with a default `src`, a `srcset` and a `sizes` value, and `<img>`
//! elements in rendered HTML are rewritten to carry them.
//!
//! Only names and URLs are computed. Producing the resized files, and checking
//! that they exist, belongs to the image tooling that runs next to this one.
//!
//! # The Worked Example
//!
//! With the stock configuration (`widths = [1440, 960, 480]`,
//! `default_size = 960`, `naming_pattern = "{dir}{name}-{size}{ext}"`):
//!
//! ```text
//! images/koh-rong.jpg
//!   src    = images/koh-rong-960.jpg
//!   srcset = images/koh-rong-1440.jpg 1440w, images/koh-rong-960.jpg 960w, images/koh-rong-480.jpg 480w
//!   sizes  = (min-width: 960px) 960px, 100vw
//!   name   = koh-rong.jpg
//! ```
//!
//! # Architecture: Stage Pipeline
//!
//! A build runs the document batch through asynchronous stages, each of which
//! finishes the whole batch before the next starts:
//!
//! ```text
//! 1. Scan      content/  →  Documents         (files → key, metadata, contents)
//! 2. Metadata  images = [...]  →  image map   (front matter only)
//! 3. Markdown  *.md  →  *.html                (pulldown-cmark)
//! 4. Rewrite   <img src>  →  <img src srcset sizes>
//! 5. Generate  Documents  →  dist/ + manifest.json
//! ```
//!
//! The naming core (decomposition, placeholders, variants, descriptors) is
//! synchronous and pure; only the stages know about batches.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`naming`] | Splits a source path into dir, base, stem and extension |
//! | [`placeholder`] | `{name}` substitution that leaves unknown placeholders alone |
//! | [`variants`] | One URL and srcset entry per configured width |
//! | [`descriptor`] | `{src, srcset, sizes, name}` for one source image |
//! | [`attributes`] | Ordered attribute bags with explicit merge precedence |
//! | [`metadata`] | Stage: declared image lists → image maps |
//! | [`markdown`] | Stage: markdown documents → HTML documents |
//! | [`rewrite`] | Stage: `<img>` rewriting with lol_html |
//! | [`render`] | Inline `<img>` rendering from `path\|title` |
//! | [`pipeline`] | Documents, the `Stage` trait and the stage runner |
//! | [`glob`] | Document key globs (`**/*.html`) |
//! | [`scan`] | Content directory → `Documents` |
//! | [`generate`] | `Documents` → output directory and manifest |
//! | [`config`] | `config.toml` loading, merging, and validation |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Validated Once, Trusted After
//!
//! Configuration is resolved and validated before the first document is
//! touched. A `default_size` missing from `widths`, an unparsable selector or
//! a broken glob stops the build at startup. Past that point the only failures
//! are per-document ones (a malformed image list, a markup error), and they
//! name the document.
//!
//! ## Streaming Rewrites
//!
//! HTML is rewritten with [lol_html](https://docs.rs/lol_html) rather than
//! parsed into a tree. Everything outside the matched elements passes through
//! byte for byte, so a document without images comes out exactly as it went in.

pub mod attributes;
pub mod config;
pub mod descriptor;
pub mod generate;
pub mod glob;
pub mod markdown;
pub mod metadata;
pub mod naming;
pub mod output;
pub mod pipeline;
pub mod placeholder;
pub mod render;
pub mod rewrite;
pub mod scan;
pub mod variants;

#[cfg(test)]
pub(crate) mod test_helpers;
