//! Resolved delivery descriptor handed to the rendering layer.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::image_config::NATURAL_WIDTH;

/// How the rendering layer should schedule the real resource.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoadingMode {
    /// Load immediately.
    Eager,
    /// Load once the element nears the viewport.
    #[default]
    Lazy,
}

impl LoadingMode {
    /// Returns the attribute value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Eager => "eager",
            Self::Lazy => "lazy",
        }
    }

    /// Returns true for [`LoadingMode::Lazy`].
    #[must_use]
    pub const fn is_lazy(self) -> bool {
        matches!(self, Self::Lazy)
    }
}

impl fmt::Display for LoadingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One candidate resource in a source set.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourceEntry {
    /// Fully built resource URL.
    pub url: String,
    /// Target width in pixels; `0` is the natural-size entry.
    pub width: u32,
}

impl SourceEntry {
    /// Returns true if this entry carries no width constraint.
    #[must_use]
    pub const fn is_natural(&self) -> bool {
        self.width == NATURAL_WIDTH
    }
}

impl fmt::Display for SourceEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_natural() {
            f.write_str(&self.url)
        } else {
            write!(f, "{} {}w", self.url, self.width)
        }
    }
}

/// Everything the rendering layer needs for one logical image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageDescriptor {
    /// URL of the smallest entry, for runtimes without `srcset` support.
    pub primary_src: String,
    /// Candidates in ascending width order.
    pub source_set: Vec<SourceEntry>,
    /// Value for the `sizes` attribute.
    pub sizes_hint: String,
    /// Loading schedule.
    pub loading_mode: LoadingMode,
}

impl ImageDescriptor {
    /// Renders the source set as a `srcset` attribute value.
    #[must_use]
    pub fn srcset(&self) -> String {
        self.source_set
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Returns the widths carried by the source set.
    #[must_use]
    pub fn widths(&self) -> Vec<u32> {
        self.source_set.iter().map(|entry| entry.width).collect()
    }

    /// Returns true if the rendering target should be registered for lazy reveal.
    #[must_use]
    pub const fn is_lazy(&self) -> bool {
        self.loading_mode.is_lazy()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn descriptor(entries: &[(&str, u32)]) -> ImageDescriptor {
        let source_set: Vec<SourceEntry> = entries
            .iter()
            .map(|(url, width)| SourceEntry {
                url: (*url).to_string(),
                width: *width,
            })
            .collect();
        ImageDescriptor {
            primary_src: source_set[0].url.clone(),
            source_set,
            sizes_hint: "100vw".to_string(),
            loading_mode: LoadingMode::Lazy,
        }
    }

    #[test]
    fn test_srcset_lists_widths() {
        let d = descriptor(&[("a.jpg?w=320", 320), ("a.jpg?w=640", 640)]);
        assert_eq!(d.srcset(), "a.jpg?w=320 320w, a.jpg?w=640 640w");
    }

    #[test]
    fn test_srcset_natural_entry_is_bare_url() {
        let d = descriptor(&[("a.jpg?fmt=jpg&q=85", 0)]);
        assert_eq!(d.srcset(), "a.jpg?fmt=jpg&q=85");
    }

    #[test]
    fn test_serialize_camel_case() {
        let d = descriptor(&[("a.jpg", 320)]);
        let json = serde_json::to_value(&d).unwrap();

        assert_eq!(json["primarySrc"], "a.jpg");
        assert_eq!(json["sizesHint"], "100vw");
        assert_eq!(json["loadingMode"], "lazy");
        assert_eq!(json["sourceSet"][0]["width"], 320);
    }
}
