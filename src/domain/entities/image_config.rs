//! Per-image delivery configuration.

use serde::{Deserialize, Serialize};

use super::descriptor::LoadingMode;

/// Quality used when none is supplied.
pub const DEFAULT_QUALITY: u32 = 85;

/// Lowest accepted quality.
pub const MIN_QUALITY: u32 = 1;

/// Highest accepted quality.
pub const MAX_QUALITY: u32 = 100;

/// Width value standing for the source's intrinsic size.
pub const NATURAL_WIDTH: u32 = 0;

/// Delivery options for a single logical image.
///
/// Values are stored as supplied; the accessors return the normalised view
/// (sorted widths, clamped quality, priority overriding lazy).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageConfig {
    /// Target widths in pixels, in any order.
    #[serde(default)]
    pub widths: Vec<u32>,

    /// Encoder quality, clamped to 1..=100 on use.
    #[serde(default)]
    pub quality: Option<u32>,

    /// Defer loading until the image nears the viewport.
    #[serde(default = "default_true")]
    pub lazy: bool,

    /// Transform service base URL prepended to the source path.
    #[serde(default)]
    pub cdn_url: Option<String>,

    /// Above-the-fold image; always loaded eagerly.
    #[serde(default)]
    pub priority: bool,
}

fn default_true() -> bool {
    true
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            widths: Vec::new(),
            quality: None,
            lazy: true,
            cdn_url: None,
            priority: false,
        }
    }
}

impl ImageConfig {
    /// Creates a configuration with the given widths and default options.
    #[must_use]
    pub fn new(widths: impl Into<Vec<u32>>) -> Self {
        Self {
            widths: widths.into(),
            ..Self::default()
        }
    }

    /// Sets the encoder quality.
    #[must_use]
    pub const fn with_quality(mut self, quality: u32) -> Self {
        self.quality = Some(quality);
        self
    }

    /// Sets the lazy flag.
    #[must_use]
    pub const fn with_lazy(mut self, lazy: bool) -> Self {
        self.lazy = lazy;
        self
    }

    /// Sets the priority flag.
    #[must_use]
    pub const fn with_priority(mut self, priority: bool) -> Self {
        self.priority = priority;
        self
    }

    /// Sets the transform service base URL.
    #[must_use]
    pub fn with_cdn_url(mut self, cdn_url: impl Into<String>) -> Self {
        self.cdn_url = Some(cdn_url.into());
        self
    }

    /// Returns the widths sorted ascending without duplicates.
    ///
    /// Zero entries are dropped. An empty result becomes the single
    /// [`NATURAL_WIDTH`] sentinel.
    #[must_use]
    pub fn normalized_widths(&self) -> Vec<u32> {
        let mut widths: Vec<u32> = self
            .widths
            .iter()
            .copied()
            .filter(|w| *w != NATURAL_WIDTH)
            .collect();
        widths.sort_unstable();
        widths.dedup();

        if widths.is_empty() {
            widths.push(NATURAL_WIDTH);
        }
        widths
    }

    /// Returns the quality clamped to the accepted range.
    #[must_use]
    pub fn effective_quality(&self) -> u32 {
        self.quality
            .unwrap_or(DEFAULT_QUALITY)
            .clamp(MIN_QUALITY, MAX_QUALITY)
    }

    /// Returns whether loading is deferred. Priority images never are.
    #[must_use]
    pub const fn is_lazy(&self) -> bool {
        self.lazy && !self.priority
    }

    /// Returns the loading mode implied by the flags.
    #[must_use]
    pub const fn loading_mode(&self) -> LoadingMode {
        if self.is_lazy() {
            LoadingMode::Lazy
        } else {
            LoadingMode::Eager
        }
    }
}
