//! Image resolution use case.

use std::sync::Arc;

use tracing::debug;

use crate::application::dto::{ImageRequest, ResolvedImage};
use crate::application::services::{FormatDetector, LazyLoadManager, SourceBuilder};
use crate::domain::entities::{ImageConfig, ImageFormat, ObservationHandle};
use crate::domain::ports::LazyElement;

/// Resolves caller requests into descriptors for the rendering layer.
pub struct ResolveImageUseCase {
    detector: Arc<FormatDetector>,
    builder: SourceBuilder,
    defaults: ImageConfig,
}

impl std::fmt::Debug for ResolveImageUseCase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolveImageUseCase")
            .field("detector", &self.detector)
            .field("defaults", &self.defaults)
            .finish_non_exhaustive()
    }
}

impl ResolveImageUseCase {
    /// Creates new use case.
    #[must_use]
    pub const fn new(
        detector: Arc<FormatDetector>,
        builder: SourceBuilder,
        defaults: ImageConfig,
    ) -> Self {
        Self {
            detector,
            builder,
            defaults,
        }
    }

    /// Waits for the client format, then builds the descriptor.
    pub async fn execute(&self, request: &ImageRequest) -> ResolvedImage {
        let format = self.detector.resolve_format().await;
        self.execute_with_format(request, format)
    }

    /// Builds the descriptor for an already known format.
    #[must_use]
    pub fn execute_with_format(&self, request: &ImageRequest, format: ImageFormat) -> ResolvedImage {
        let config = request.to_config(&self.defaults);
        let descriptor = self.builder.build(&request.src, &config, format);
        debug!(
            src = %request.src,
            format = %format,
            entries = descriptor.source_set.len(),
            loading = %descriptor.loading_mode,
            "Built image descriptor"
        );

        ResolvedImage {
            src: request.src.clone(),
            alt: request.alt.clone(),
            format,
            descriptor,
        }
    }

    /// Hands the rendering target to `manager` when the image is lazy.
    ///
    /// Eager images are revealed at once and `None` is returned.
    pub fn register(
        resolved: &ResolvedImage,
        element: Arc<dyn LazyElement>,
        manager: &mut LazyLoadManager,
    ) -> Option<ObservationHandle> {
        if resolved.descriptor.is_lazy() {
            manager.observe(element)
        } else {
            element.reveal();
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::LoadingMode;
    use crate::domain::ports::mocks::MockDecodeProbe;

    fn use_case(supported: &[ImageFormat]) -> ResolveImageUseCase {
        let detector = Arc::new(FormatDetector::new(Arc::new(MockDecodeProbe::supporting(
            supported,
        ))));
        ResolveImageUseCase::new(
            detector,
            SourceBuilder::default(),
            ImageConfig::new(vec![640, 1280]).with_cdn_url("https://img.example.com"),
        )
    }

    #[tokio::test]
    async fn test_execute_uses_detected_format() {
        let resolved = use_case(&[ImageFormat::Webp])
            .execute(&ImageRequest::new("/a.jpg", "A"))
            .await;

        assert_eq!(resolved.format, ImageFormat::Webp);
        assert_eq!(
            resolved.descriptor.primary_src,
            "https://img.example.com/a.jpg?fmt=webp&w=640&q=85"
        );
        assert_eq!(resolved.descriptor.loading_mode, LoadingMode::Lazy);
        assert_eq!(resolved.alt, "A");
    }

    #[test]
    fn test_execute_with_format_respects_priority() {
        let request = ImageRequest::new("/hero.jpg", "Hero").with_priority(true);
        let resolved = use_case(&[]).execute_with_format(&request, ImageFormat::Avif);

        assert_eq!(resolved.descriptor.loading_mode, LoadingMode::Eager);
        assert_eq!(resolved.descriptor.widths(), vec![640, 1280]);
    }

    #[test]
    fn test_resolved_image_json_is_flat() {
        let resolved =
            use_case(&[]).execute_with_format(&ImageRequest::new("/a.jpg", "A"), ImageFormat::Jpg);
        let json = serde_json::to_value(&resolved).unwrap();

        assert_eq!(json["format"], "jpg");
        assert_eq!(json["loadingMode"], "lazy");
        assert!(json["sourceSet"].is_array());
    }
}
