//! Image element state for lazy reveal.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::application::dto::ResolvedImage;
use crate::domain::entities::{ElementBounds, ElementKey, LoadingMode};
use crate::domain::ports::LazyElement;

/// Attributes of a rendered `<img>` element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageAttributes {
    /// Live source; `None` while a placeholder.
    pub src: Option<String>,
    /// Live source set; `None` while a placeholder.
    pub srcset: Option<String>,
    /// Deferred source.
    pub data_src: Option<String>,
    /// Deferred source set.
    pub data_srcset: Option<String>,
    /// `sizes` attribute.
    pub sizes: String,
    /// `loading` attribute.
    pub loading: LoadingMode,
    /// Alternative text.
    pub alt: String,
}

impl ImageAttributes {
    /// Returns true while the real resource is held back.
    #[must_use]
    pub const fn is_placeholder(&self) -> bool {
        self.src.is_none()
    }
}

/// A rendering target that starts as a placeholder and swaps its deferred
/// sources in when revealed.
pub struct LazyImage {
    key: ElementKey,
    bounds: Mutex<ElementBounds>,
    attributes: Mutex<ImageAttributes>,
}

impl LazyImage {
    /// Creates the element for a resolved image.
    ///
    /// Lazy descriptors start as placeholders, eager ones start live. Every
    /// element gets its own key, even when it shows the same image as another.
    #[must_use]
    pub fn new(resolved: &ResolvedImage, bounds: ElementBounds) -> Arc<Self> {
        let descriptor = &resolved.descriptor;
        let srcset = descriptor.srcset();

        let attributes = if descriptor.is_lazy() {
            ImageAttributes {
                src: None,
                srcset: None,
                data_src: Some(descriptor.primary_src.clone()),
                data_srcset: Some(srcset),
                sizes: descriptor.sizes_hint.clone(),
                loading: descriptor.loading_mode,
                alt: resolved.alt.clone(),
            }
        } else {
            ImageAttributes {
                src: Some(descriptor.primary_src.clone()),
                srcset: Some(srcset),
                data_src: None,
                data_srcset: None,
                sizes: descriptor.sizes_hint.clone(),
                loading: descriptor.loading_mode,
                alt: resolved.alt.clone(),
            }
        };

        Arc::new(Self {
            key: ElementKey::unique(),
            bounds: Mutex::new(bounds),
            attributes: Mutex::new(attributes),
        })
    }

    /// Returns a snapshot of the current attributes.
    #[must_use]
    pub fn attributes(&self) -> ImageAttributes {
        self.attributes.lock().clone()
    }

    /// Returns true once the live sources are in place.
    #[must_use]
    pub fn is_revealed(&self) -> bool {
        !self.attributes.lock().is_placeholder()
    }

    /// Moves the element, e.g. after a layout change.
    pub fn set_bounds(&self, bounds: ElementBounds) {
        *self.bounds.lock() = bounds;
    }
}

impl std::fmt::Debug for LazyImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LazyImage")
            .field("key", &self.key)
            .field("bounds", &*self.bounds.lock())
            .field("revealed", &self.is_revealed())
            .finish()
    }
}

impl LazyElement for LazyImage {
    fn key(&self) -> ElementKey {
        self.key.clone()
    }

    fn bounds(&self) -> ElementBounds {
        *self.bounds.lock()
    }

    fn reveal(&self) {
        let mut attributes = self.attributes.lock();
        if let Some(src) = attributes.data_src.take() {
            attributes.src = Some(src);
        }
        if let Some(srcset) = attributes.data_srcset.take() {
            attributes.srcset = Some(srcset);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::services::build_descriptor;
    use crate::domain::entities::{ImageConfig, ImageFormat};

    fn resolved(lazy: bool) -> ResolvedImage {
        let config = ImageConfig::new(vec![320, 640]).with_lazy(lazy);
        ResolvedImage {
            src: "/a.jpg".to_string(),
            alt: "A".to_string(),
            format: ImageFormat::Webp,
            descriptor: build_descriptor("/a.jpg", &config, ImageFormat::Webp),
        }
    }

    #[test]
    fn test_lazy_starts_as_placeholder() {
        let image = LazyImage::new(&resolved(true), ElementBounds::new(0, 100));
        let attributes = image.attributes();

        assert!(attributes.is_placeholder());
        assert_eq!(
            attributes.data_src.as_deref(),
            Some("/a.jpg?fmt=webp&w=320&q=85")
        );
        assert!(!image.is_revealed());
    }

    #[test]
    fn test_reveal_swaps_sources() {
        let image = LazyImage::new(&resolved(true), ElementBounds::new(0, 100));
        image.reveal();
        let attributes = image.attributes();

        assert_eq!(attributes.src.as_deref(), Some("/a.jpg?fmt=webp&w=320&q=85"));
        assert!(attributes.srcset.is_some());
        assert!(attributes.data_src.is_none());
        assert!(image.is_revealed());

        image.reveal();
        assert_eq!(image.attributes(), attributes);
    }

    #[test]
    fn test_eager_starts_live() {
        let image = LazyImage::new(&resolved(false), ElementBounds::new(0, 100));
        assert!(image.is_revealed());
        assert_eq!(image.attributes().loading, LoadingMode::Eager);
    }

    #[test]
    fn test_key_and_bounds() {
        let shared = resolved(true);
        let image = LazyImage::new(&shared, ElementBounds::new(0, 100));
        let twin = LazyImage::new(&shared, ElementBounds::new(0, 100));
        assert_ne!(image.key(), twin.key());

        image.set_bounds(ElementBounds::new(50, 10));
        assert_eq!(image.bounds(), ElementBounds::new(50, 10));
    }
}
