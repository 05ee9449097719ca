//! Configuration module.
//!
//! Handles loading, validating, and merging `config.toml`. Stock defaults are
//! overridden by a user `config.toml` placed in the content root; values left
//! out keep their defaults.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [metadata]
//! images_key = "images"     # Front matter key holding the declared image paths
//! mode = "in-place"         # "in-place" or "side-map"
//! map_key = "image_map"     # Key written in side-map mode
//!
//! [images]
//! widths = [1440, 960, 480] # Variant widths, in srcset order
//! sizes = ["(min-width: 960px) 960px", "100vw"]
//! default_size = 960        # Width used for `src`; must be one of `widths`
//! naming_pattern = "{dir}{name}-{size}{ext}"
//! srcset_pattern = "{url} {size}w"
//!
//! [rewrite]
//! files = "**/*.html"       # Documents whose <img> elements are rewritten
//! selector = "img"          # CSS selector for image elements
//! ```
//!
//! Unknown keys are rejected to catch typos early. camelCase spellings
//! (`imagesKey`, `defaultSize`, ...) are accepted as aliases.

use crate::glob::FileMatcher;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
    #[error("images.default_size {size} is not one of images.widths {widths:?}")]
    DefaultSizeMissing { size: u32, widths: Vec<u32> },
}

/// Configuration loaded from `config.toml`.
///
/// All fields have defaults. Unknown keys are rejected.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ResponsiveConfig {
    /// Where declared image lists are read from and where image maps go.
    pub metadata: MetadataConfig,
    /// Variant widths, sizes and naming patterns.
    pub images: ImagesConfig,
    /// HTML rewrite selection (file glob and element selector).
    pub rewrite: RewriteConfig,
}

impl ResponsiveConfig {
    /// Validate config values are usable before any document is touched.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.images.validate()?;
        self.metadata.validate()?;
        self.rewrite.validate()?;
        Ok(())
    }
}

/// How the image map is attached to a document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MapMode {
    /// The declared-images field is replaced by the map, keyed by base name.
    #[default]
    InPlace,
    /// The declared-images field is kept; the map goes to `map_key`, keyed by full path.
    SideMap,
}

/// Metadata mapping settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MetadataConfig {
    /// Document field holding the declared list of image paths.
    #[serde(alias = "imagesKey")]
    pub images_key: String,
    /// Whether the map replaces the list or is added next to it.
    pub mode: MapMode,
    /// Field receiving the map in side-map mode.
    #[serde(alias = "mapKey")]
    pub map_key: String,
}

impl Default for MetadataConfig {
    fn default() -> Self {
        Self {
            images_key: "images".to_string(),
            mode: MapMode::InPlace,
            map_key: "image_map".to_string(),
        }
    }
}

impl MetadataConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.images_key.is_empty() {
            return Err(ConfigError::Validation(
                "metadata.images_key must not be empty".into(),
            ));
        }
        if self.mode == MapMode::SideMap {
            if self.map_key.is_empty() {
                return Err(ConfigError::Validation(
                    "metadata.map_key must not be empty in side-map mode".into(),
                ));
            }
            if self.map_key == self.images_key {
                return Err(ConfigError::Validation(
                    "metadata.map_key must differ from metadata.images_key in side-map mode"
                        .into(),
                ));
            }
        }
        Ok(())
    }
}

/// Responsive variant settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ImagesConfig {
    /// Variant widths in pixels. Iteration order is srcset order.
    #[serde(alias = "imageWidths")]
    pub widths: Vec<u32>,
    /// CSS `sizes` entries, joined with `", "`.
    #[serde(alias = "imageSizes")]
    pub sizes: Vec<String>,
    /// Width whose variant becomes the `src` fallback.
    #[serde(alias = "defaultSize")]
    pub default_size: u32,
    /// Variant URL template: `{root}`, `{dir}`, `{name}`, `{ext}`, `{base}`, `{size}`.
    #[serde(alias = "namingPattern")]
    pub naming_pattern: String,
    /// Srcset entry template: `{url}`, `{size}`.
    #[serde(alias = "srcsetPattern")]
    pub srcset_pattern: String,
}

impl Default for ImagesConfig {
    fn default() -> Self {
        Self {
            widths: vec![1440, 960, 480],
            sizes: vec!["(min-width: 960px) 960px".to_string(), "100vw".to_string()],
            default_size: 960,
            naming_pattern: "{dir}{name}-{size}{ext}".to_string(),
            srcset_pattern: "{url} {size}w".to_string(),
        }
    }
}

impl ImagesConfig {
    /// Position of `default_size` in `widths`.
    pub fn default_index(&self) -> Result<usize, ConfigError> {
        self.widths
            .iter()
            .position(|&w| w == self.default_size)
            .ok_or_else(|| ConfigError::DefaultSizeMissing {
                size: self.default_size,
                widths: self.widths.clone(),
            })
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.widths.is_empty() {
            return Err(ConfigError::Validation(
                "images.widths must not be empty".into(),
            ));
        }
        if self.widths.contains(&0) {
            return Err(ConfigError::Validation(
                "images.widths values must be non-zero".into(),
            ));
        }
        self.default_index()?;
        Ok(())
    }
}

/// HTML rewrite settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RewriteConfig {
    /// Glob over document keys selecting which documents are rewritten.
    pub files: String,
    /// CSS selector for the elements to rewrite.
    pub selector: String,
}

impl Default for RewriteConfig {
    fn default() -> Self {
        Self {
            files: "**/*.html".to_string(),
            selector: "img".to_string(),
        }
    }
}

impl RewriteConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        FileMatcher::new(&self.files)
            .map_err(|e| ConfigError::Validation(format!("rewrite.files: {e}")))?;
        self.selector
            .parse::<lol_html::Selector>()
            .map_err(|e| ConfigError::Validation(format!("rewrite.selector: {e}")))?;
        Ok(())
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// Base layer for merging user overrides on top.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(ResponsiveConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely, so a user
///   `widths` list replaces the stock list instead of extending it.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// camelCase spellings accepted in `config.toml`: (section, camelCase, snake_case).
const KEY_ALIASES: &[(&str, &str, &str)] = &[
    ("metadata", "imagesKey", "images_key"),
    ("metadata", "mapKey", "map_key"),
    ("images", "imageWidths", "widths"),
    ("images", "imageSizes", "sizes"),
    ("images", "defaultSize", "default_size"),
    ("images", "namingPattern", "naming_pattern"),
    ("images", "srcsetPattern", "srcset_pattern"),
];

/// Rename camelCase keys of a user config to their snake_case names.
///
/// Must run before [`merge_toml`]: the stock defaults carry the snake_case
/// keys, and a table holding both spellings is a duplicate field. A key
/// given in both spellings is left alone and rejected as such.
pub fn normalize_keys(mut value: toml::Value) -> toml::Value {
    if let toml::Value::Table(root) = &mut value {
        for (section, camel, snake) in KEY_ALIASES {
            let Some(toml::Value::Table(table)) = root.get_mut(*section) else {
                continue;
            };
            if table.contains_key(*snake) {
                continue;
            }
            if let Some(v) = table.remove(*camel) {
                table.insert(snake.to_string(), v);
            }
        }
    }
    value
}

/// Load a `config.toml` from a directory as a raw TOML value.
///
/// Returns `Ok(None)` if no `config.toml` exists in the directory.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = path.join("config.toml");
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<ResponsiveConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, normalize_keys(ov)),
        None => base,
    };
    let config: ResponsiveConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from `config.toml` in the given directory.
///
/// Merges user values on top of stock defaults, rejects unknown keys,
/// and validates the result.
pub fn load_config(root: &Path) -> Result<ResponsiveConfig, ConfigError> {
    let base = stock_defaults_value();
    let overlay = load_raw_config(root)?;
    resolve_config(base, overlay)
}

/// Returns a fully-commented stock `config.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Responsive Images Configuration
# ===============================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults. Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Metadata mapping
# ---------------------------------------------------------------------------
[metadata]
# Front matter key holding the list of image paths declared by a document.
images_key = "images"

# "in-place": replace the list with a map keyed by file name.
# "side-map": keep the list and add a map keyed by full path under map_key.
mode = "in-place"

# Key receiving the map in side-map mode.
map_key = "image_map"

# ---------------------------------------------------------------------------
# Responsive variants
# ---------------------------------------------------------------------------
[images]
# Variant widths in pixels. The srcset lists them in this order.
widths = [1440, 960, 480]

# Entries of the sizes attribute, joined with ", ".
sizes = ["(min-width: 960px) 960px", "100vw"]

# Width used for the src fallback. Must be one of the widths above.
default_size = 960

# Variant URL. Placeholders: {root} {dir} {name} {ext} {base} {size}.
# Unknown placeholders are kept as-is for later build steps.
naming_pattern = "{dir}{name}-{size}{ext}"

# One srcset entry. Placeholders: {url} {size}.
srcset_pattern = "{url} {size}w"

# ---------------------------------------------------------------------------
# HTML rewriting
# ---------------------------------------------------------------------------
[rewrite]
# Glob over document paths (relative to the content root).
files = "**/*.html"

# CSS selector of the elements to rewrite.
selector = "img"
"##
}
