//! Image request and response DTOs.

use serde::{Deserialize, Serialize};

use crate::domain::entities::{ImageConfig, ImageDescriptor, ImageFormat};

/// Caller-facing request for one image.
///
/// Unset options fall back to the configured defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageRequest {
    /// Source path or URL.
    pub src: String,
    /// Alternative text.
    #[serde(default)]
    pub alt: String,
    /// Target widths.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub widths: Option<Vec<u32>>,
    /// Encoder quality.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quality: Option<u32>,
    /// Defer loading.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lazy: Option<bool>,
    /// Transform service base URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cdn_url: Option<String>,
    /// Above-the-fold image.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<bool>,
}

impl ImageRequest {
    /// Creates a request with only a source and alt text.
    #[must_use]
    pub fn new(src: impl Into<String>, alt: impl Into<String>) -> Self {
        Self {
            src: src.into(),
            alt: alt.into(),
            ..Self::default()
        }
    }

    /// Sets the target widths.
    #[must_use]
    pub fn with_widths(mut self, widths: impl Into<Vec<u32>>) -> Self {
        self.widths = Some(widths.into());
        self
    }

    /// Sets the priority flag.
    #[must_use]
    pub const fn with_priority(mut self, priority: bool) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Sets the lazy flag.
    #[must_use]
    pub const fn with_lazy(mut self, lazy: bool) -> Self {
        self.lazy = Some(lazy);
        self
    }

    /// Sets the quality.
    #[must_use]
    pub const fn with_quality(mut self, quality: u32) -> Self {
        self.quality = Some(quality);
        self
    }

    /// Merges the request over `defaults` into a full configuration.
    #[must_use]
    pub fn to_config(&self, defaults: &ImageConfig) -> ImageConfig {
        ImageConfig {
            widths: self
                .widths
                .clone()
                .unwrap_or_else(|| defaults.widths.clone()),
            quality: self.quality.or(defaults.quality),
            lazy: self.lazy.unwrap_or(defaults.lazy),
            cdn_url: self.cdn_url.clone().or_else(|| defaults.cdn_url.clone()),
            priority: self.priority.unwrap_or(defaults.priority),
        }
    }
}

/// A request resolved into a descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedImage {
    /// Original source path.
    pub src: String,
    /// Alternative text.
    pub alt: String,
    /// Format the descriptor targets.
    pub format: ImageFormat,
    /// The delivery descriptor.
    #[serde(flatten)]
    pub descriptor: ImageDescriptor,
}
