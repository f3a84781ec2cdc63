//! Responsive source descriptor construction.
//!
//! Turns a source path, an [`ImageConfig`] and a resolved [`ImageFormat`] into
//! an [`ImageDescriptor`]. Everything here is pure: no I/O, no shared state,
//! identical inputs give identical descriptors.
//!
//! URLs address an external transform service; only the `fmt`, `w` and `q`
//! query parameters are appended. The width to `sizes` mapping is a
//! [`SizesPolicy`] so it can be tuned per deployment.

use serde::{Deserialize, Serialize};

use crate::domain::entities::{
    ImageConfig, ImageDescriptor, ImageFormat, NATURAL_WIDTH, SourceEntry,
};

/// Query parameter carrying the target format.
pub const FORMAT_PARAM: &str = "fmt";
/// Query parameter carrying the target width.
pub const WIDTH_PARAM: &str = "w";
/// Query parameter carrying the encoder quality.
pub const QUALITY_PARAM: &str = "q";

/// Breakpoint heuristic for the `sizes` attribute.
///
/// Every width but the largest becomes `(max-width: Wpx) Spx`, the largest
/// becomes a bare `Spx`, where `S = W * slot_percent / 100`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SizesPolicy {
    /// Rendered slot width as a percentage of the breakpoint width.
    #[serde(default = "default_slot_percent")]
    pub slot_percent: u32,

    /// Hint used when only the natural-size entry exists.
    #[serde(default = "default_natural_hint")]
    pub natural_hint: String,
}

fn default_slot_percent() -> u32 {
    100
}

fn default_natural_hint() -> String {
    "100vw".to_string()
}

impl Default for SizesPolicy {
    fn default() -> Self {
        Self {
            slot_percent: default_slot_percent(),
            natural_hint: default_natural_hint(),
        }
    }
}

impl SizesPolicy {
    /// Computes the `sizes` value for ascending, de-duplicated widths.
    #[must_use]
    pub fn sizes_hint(&self, widths: &[u32]) -> String {
        let constrained: Vec<u32> = widths
            .iter()
            .copied()
            .filter(|w| *w != NATURAL_WIDTH)
            .collect();

        let Some((largest, rest)) = constrained.split_last() else {
            return self.natural_hint.clone();
        };

        let mut clauses: Vec<String> = rest
            .iter()
            .map(|w| format!("(max-width: {w}px) {}px", self.slot(*w)))
            .collect();
        clauses.push(format!("{}px", self.slot(*largest)));
        clauses.join(", ")
    }

    fn slot(&self, width: u32) -> u64 {
        u64::from(width) * u64::from(self.slot_percent) / 100
    }
}

/// Builds descriptors with a fixed [`SizesPolicy`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceBuilder {
    policy: SizesPolicy,
}

impl SourceBuilder {
    /// Creates a builder using the given sizes policy.
    #[must_use]
    pub const fn new(policy: SizesPolicy) -> Self {
        Self { policy }
    }

    /// Returns the sizes policy in use.
    #[must_use]
    pub const fn policy(&self) -> &SizesPolicy {
        &self.policy
    }

    /// Builds the descriptor for `src` in `format`.
    #[must_use]
    pub fn build(&self, src: &str, config: &ImageConfig, format: ImageFormat) -> ImageDescriptor {
        let widths = config.normalized_widths();
        let quality = config.effective_quality();
        let base = resolve_base(config.cdn_url.as_deref(), src);

        let source_set: Vec<SourceEntry> = widths
            .iter()
            .map(|width| SourceEntry {
                url: transform_url(&base, format, *width, quality),
                width: *width,
            })
            .collect();

        let primary_src = source_set
            .first()
            .map_or_else(|| base.clone(), |entry| entry.url.clone());

        ImageDescriptor {
            primary_src,
            sizes_hint: self.policy.sizes_hint(&widths),
            source_set,
            loading_mode: config.loading_mode(),
        }
    }
}

/// Builds a descriptor with the default [`SizesPolicy`].
#[must_use]
pub fn build_descriptor(src: &str, config: &ImageConfig, format: ImageFormat) -> ImageDescriptor {
    SourceBuilder::default().build(src, config, format)
}

/// Joins the transform service base and the source path with a single `/`.
fn resolve_base(cdn_url: Option<&str>, src: &str) -> String {
    match cdn_url.filter(|url| !url.is_empty()) {
        Some(cdn) => format!(
            "{}/{}",
            cdn.trim_end_matches('/'),
            src.trim_start_matches('/')
        ),
        None => src.to_string(),
    }
}

/// Appends the transform parameters, keeping any existing query string.
fn transform_url(base: &str, format: ImageFormat, width: u32, quality: u32) -> String {
    let mut params = vec![format!("{FORMAT_PARAM}={format}")];
    if width != NATURAL_WIDTH {
        params.push(format!("{WIDTH_PARAM}={width}"));
    }
    params.push(format!("{QUALITY_PARAM}={quality}"));

    let joiner = if base.contains('?') { '&' } else { '?' };
    format!("{base}{joiner}{}", params.join("&"))
}
