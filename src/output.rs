//! CLI output formatting.
//!
//! # Output Format
//!
//! ## Check
//!
//! ```text
//! Config
//!     widths: 1440, 960, 480 (default 960)
//!     sizes: (min-width: 960px) 960px, 100vw
//!     mode: in-place (images)
//!     rewrite: **/*.html, img
//!
//! Documents
//! 001 blog/plain.md
//! 002 example.md (1 image)
//! 003 gallery.html
//! ```
//!
//! ## Build
//!
//! ```text
//! metadata: 1 of 3 documents changed, 1 images
//! markdown: 2 of 2 documents changed, 0 images
//! rewrite: 2 of 3 documents changed, 2 images, 1 skipped
//!
//! Wrote 3 documents → dist/
//!     manifest: dist/manifest.json
//! ```
//!
//! # Architecture
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format functions
//! are pure: no I/O, no side effects.

use crate::config::{MapMode, ResponsiveConfig};
use crate::generate::GenerateSummary;
use crate::pipeline::{Document, Documents, StageReport};
use serde_json::Value;
use std::path::Path;

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn plural(n: usize, word: &str) -> String {
    if n == 1 {
        format!("{n} {word}")
    } else {
        format!("{n} {word}s")
    }
}

/// Number of images a scanned document declares under `images_key`.
fn declared_images(document: &Document, images_key: &str) -> usize {
    match document.metadata.get(images_key) {
        Some(Value::Array(list)) => list.len(),
        Some(Value::Object(map)) => map.len(),
        _ => 0,
    }
}

fn mode_label(mode: MapMode) -> &'static str {
    match mode {
        MapMode::InPlace => "in-place",
        MapMode::SideMap => "side-map",
    }
}

// ============================================================================
// Check
// ============================================================================

pub fn format_check_output(config: &ResponsiveConfig, documents: &Documents) -> Vec<String> {
    let mut lines = Vec::new();
    let images = &config.images;

    lines.push("Config".to_string());
    let widths: Vec<String> = images.widths.iter().map(u32::to_string).collect();
    lines.push(format!(
        "{}widths: {} (default {})",
        indent(1),
        widths.join(", "),
        images.default_size
    ));
    lines.push(format!("{}sizes: {}", indent(1), images.sizes.join(", ")));
    let target = match config.metadata.mode {
        MapMode::InPlace => &config.metadata.images_key,
        MapMode::SideMap => &config.metadata.map_key,
    };
    lines.push(format!(
        "{}mode: {} ({})",
        indent(1),
        mode_label(config.metadata.mode),
        target
    ));
    lines.push(format!(
        "{}rewrite: {}, {}",
        indent(1),
        config.rewrite.files,
        config.rewrite.selector
    ));

    lines.push(String::new());
    lines.push("Documents".to_string());
    for (pos, (key, document)) in documents.iter().enumerate() {
        let count = declared_images(document, &config.metadata.images_key);
        if count > 0 {
            lines.push(format!(
                "{} {} ({})",
                format_index(pos + 1),
                key,
                plural(count, "image")
            ));
        } else {
            lines.push(format!("{} {}", format_index(pos + 1), key));
        }
    }
    if documents.is_empty() {
        lines.push(format!("{}(none)", indent(1)));
    }

    lines
}

pub fn print_check_output(config: &ResponsiveConfig, documents: &Documents) {
    for line in format_check_output(config, documents) {
        println!("{}", line);
    }
}

// ============================================================================
// Build
// ============================================================================

pub fn format_build_output(
    reports: &[StageReport],
    summary: &GenerateSummary,
    output_dir: &Path,
) -> Vec<String> {
    let mut lines: Vec<String> = reports.iter().map(StageReport::to_string).collect();
    if !lines.is_empty() {
        lines.push(String::new());
    }
    lines.push(format!(
        "Wrote {} → {}/",
        plural(summary.written.len(), "document"),
        output_dir.display()
    ));
    lines.push(format!(
        "{}manifest: {}",
        indent(1),
        summary.manifest.display()
    ));
    lines
}

pub fn print_build_output(reports: &[StageReport], summary: &GenerateSummary, output_dir: &Path) {
    for line in format_build_output(reports, summary, output_dir) {
        println!("{}", line);
    }
}
