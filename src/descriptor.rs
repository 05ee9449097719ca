//! Image descriptors: the `{src, srcset, sizes, name}` bundle for one source image.
//!
//! [`DescriptorBuilder`] is the only way to obtain an [`ImageDescriptor`]. It
//! resolves the position of `default_size` within `widths` once, at
//! construction, so a misconfigured default width fails before any document
//! is processed instead of producing descriptors without a usable `src`.

use crate::attributes::Attributes;
use crate::config::{ConfigError, ImagesConfig};
use crate::naming::PathParts;
use crate::variants::generate_variants;
use serde::{Deserialize, Serialize};

/// Computed responsive metadata for one source image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageDescriptor {
    /// Variant URL at the default width
    pub src: String,
    /// All srcset entries joined with `", "`, in width order
    pub srcset: String,
    /// Configured sizes joined with `", "`
    pub sizes: String,
    /// Base name of the source path (e.g. `koh-rong.jpg`)
    pub name: String,
}

impl ImageDescriptor {
    /// `src`, `srcset` and `sizes` as element attributes, in that order.
    pub fn attributes(&self) -> Attributes {
        let mut attrs = Attributes::new();
        attrs.insert("src", &self.src);
        attrs.insert("srcset", &self.srcset);
        attrs.insert("sizes", &self.sizes);
        attrs
    }
}

/// Builds descriptors from a validated [`ImagesConfig`].
#[derive(Debug, Clone)]
pub struct DescriptorBuilder {
    images: ImagesConfig,
    default_index: usize,
    sizes: String,
}

impl DescriptorBuilder {
    /// Fails with [`ConfigError::DefaultSizeMissing`] unless `default_size`
    /// is one of `widths`.
    pub fn new(images: &ImagesConfig) -> Result<Self, ConfigError> {
        let default_index = images.default_index()?;
        Ok(Self {
            images: images.clone(),
            default_index,
            sizes: images.sizes.join(", "),
        })
    }

    /// Build the descriptor for one source path.
    pub fn build(&self, src: &str) -> ImageDescriptor {
        let mut variants = generate_variants(src, &self.images);
        let srcset = variants
            .iter()
            .map(|v| v.entry.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        // default_index < widths.len() == variants.len(), checked in new()
        let default_src = variants.swap_remove(self.default_index).url;

        ImageDescriptor {
            src: default_src,
            srcset,
            sizes: self.sizes.clone(),
            name: PathParts::parse(src).base,
        }
    }
}
