//! Decode probe backed by the decoders compiled into the `image` crate.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use image::ImageError;
use tracing::{trace, warn};

use crate::domain::entities::ImageFormat;
use crate::domain::errors::ProbeError;
use crate::domain::ports::DecodeProbePort;

/// 1x1 AVIF image.
const AVIF_SAMPLE: &str = "AAAAIGZ0eXBhdmlmAAAAAGF2aWZtaWYxbWlhZk1BMUIAAADybWV0YQAAAAAAAAAoaGRscgAAAAAAAAAAcGljdAAAAAAAAAAAAAAAAGxpYmF2aWYAAAAADnBpdG0AAAAAAAEAAAAeaWxvYwAAAABEAAABAAEAAAABAAABGgAAAB0AAAAoaWluZgAAAAAAAQAAABppbmZlAgAAAAABAABhdjAxQ29sb3IAAAAAamlwcnAAAABLaXBjbwAAABRpc3BlAAAAAAAAAAIAAAACAAAAEHBpeGkAAAAAAwgICAAAAAxhdjFDgQ0MAAAAABNjb2xybmNseAACAAIAAYAAAAAXaXBtYQAAAAAAAAABAAEEAQKDBAAAACVtZGF0EgAKCBgANogQEAwgMg8f8D///8WfhwB8+ErK42A=";

/// 1x1 lossless `WebP` image.
const WEBP_SAMPLE: &str = "UklGRhoAAABXRUJQVlA4TA0AAAAvAAAAEAcQERGIiP4HAA==";

/// Probes decode support by decoding a tiny embedded sample per format.
#[derive(Debug, Clone)]
pub struct ImageDecodeProbe {
    samples: HashMap<ImageFormat, Arc<[u8]>>,
}

impl ImageDecodeProbe {
    /// Creates a probe with the built-in samples.
    #[must_use]
    pub fn new() -> Self {
        let mut samples: HashMap<ImageFormat, Arc<[u8]>> = HashMap::new();
        for (format, encoded) in [
            (ImageFormat::Avif, AVIF_SAMPLE),
            (ImageFormat::Webp, WEBP_SAMPLE),
        ] {
            match STANDARD.decode(encoded) {
                Ok(bytes) => {
                    samples.insert(format, Arc::from(bytes));
                }
                Err(e) => warn!(format = %format, error = %e, "Built-in probe sample is invalid"),
            }
        }
        Self { samples }
    }

    /// Creates a probe without any samples.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            samples: HashMap::new(),
        }
    }

    /// Replaces the sample used for `format`.
    #[must_use]
    pub fn with_sample(mut self, format: ImageFormat, bytes: impl Into<Vec<u8>>) -> Self {
        let bytes: Vec<u8> = bytes.into();
        self.samples.insert(format, Arc::from(bytes));
        self
    }

    const fn codec(format: ImageFormat) -> image::ImageFormat {
        match format {
            ImageFormat::Avif => image::ImageFormat::Avif,
            ImageFormat::Webp => image::ImageFormat::WebP,
            ImageFormat::Jpg => image::ImageFormat::Jpeg,
        }
    }
}

impl Default for ImageDecodeProbe {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DecodeProbePort for ImageDecodeProbe {
    async fn supports(&self, format: ImageFormat) -> Result<bool, ProbeError> {
        if format == ImageFormat::FALLBACK {
            return Ok(true);
        }

        let sample = self
            .samples
            .get(&format)
            .cloned()
            .ok_or(ProbeError::MissingSample { format })?;
        let codec = Self::codec(format);

        let decoded =
            tokio::task::spawn_blocking(move || image::load_from_memory_with_format(&sample, codec))
                .await
                .map_err(|e| ProbeError::task(format!("Decode task panicked: {e}")))?;

        match decoded {
            Ok(img) => {
                trace!(format = %format, width = img.width(), "Probe sample decoded");
                Ok(img.width() > 0 && img.height() > 0)
            }
            Err(ImageError::Unsupported(e)) => {
                trace!(format = %format, reason = %e, "No decoder for format");
                Ok(false)
            }
            Err(e) => Err(ProbeError::decode(format, e.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn encoded_webp() -> Result<Vec<u8>, Box<dyn std::error::Error>> {
        let mut buf = Vec::new();
        image::DynamicImage::new_rgba8(2, 2)
            .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::WebP)?;
        Ok(buf)
    }

    #[tokio::test]
    async fn test_fallback_always_supported() {
        let probe = ImageDecodeProbe::empty();
        assert!(matches!(probe.supports(ImageFormat::Jpg).await, Ok(true)));
    }

    #[tokio::test]
    async fn test_decodes_valid_webp_sample() -> Result<(), Box<dyn std::error::Error>> {
        let probe = ImageDecodeProbe::empty().with_sample(ImageFormat::Webp, encoded_webp()?);
        assert!(matches!(probe.supports(ImageFormat::Webp).await, Ok(true)));
        Ok(())
    }

    #[tokio::test]
    async fn test_corrupt_sample_is_error() {
        let probe = ImageDecodeProbe::empty().with_sample(ImageFormat::Webp, b"RIFF\0\0\0\0junk".to_vec());
        assert!(matches!(
            probe.supports(ImageFormat::Webp).await,
            Err(ProbeError::Decode { .. })
        ));
    }

    #[tokio::test]
    async fn test_missing_sample_is_error() {
        let probe = ImageDecodeProbe::empty();
        assert!(matches!(
            probe.supports(ImageFormat::Avif).await,
            Err(ProbeError::MissingSample { .. })
        ));
    }

    #[test]
    fn test_builtin_samples_present() {
        let probe = ImageDecodeProbe::new();
        assert!(probe.samples.contains_key(&ImageFormat::Avif));
        assert!(probe.samples.contains_key(&ImageFormat::Webp));
    }

    #[cfg(not(feature = "avif"))]
    #[tokio::test]
    async fn test_avif_not_supported_without_decoder() {
        let probe = ImageDecodeProbe::new();
        assert!(!matches!(probe.supports(ImageFormat::Avif).await, Ok(true)));
    }
}
