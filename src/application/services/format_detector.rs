//! One-shot client decode capability detection.

use std::sync::Arc;

use tokio::sync::OnceCell;
use tracing::{debug, info, warn};

use crate::domain::entities::ImageFormat;
use crate::domain::ports::DecodeProbePort;

/// Resolves the best decodable [`ImageFormat`] once and remembers it.
///
/// The first call to [`FormatDetector::resolve_format`] runs the probe; calls
/// made while that probe is in flight wait on it instead of starting another.
/// Share one detector (for example behind an `Arc`) wherever a format is
/// needed; separate detectors probe independently.
pub struct FormatDetector {
    probe: Arc<dyn DecodeProbePort>,
    resolved: OnceCell<ImageFormat>,
}

impl std::fmt::Debug for FormatDetector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FormatDetector")
            .field("resolved", &self.resolved.get())
            .finish_non_exhaustive()
    }
}

impl FormatDetector {
    /// Creates a detector backed by the given probe.
    #[must_use]
    pub fn new(probe: Arc<dyn DecodeProbePort>) -> Self {
        Self {
            probe,
            resolved: OnceCell::new(),
        }
    }

    /// Creates a detector that is already resolved and never probes.
    #[must_use]
    pub fn with_format(probe: Arc<dyn DecodeProbePort>, format: ImageFormat) -> Self {
        Self {
            probe,
            resolved: OnceCell::new_with(Some(format)),
        }
    }

    /// Returns the preferred decodable format, probing on first use.
    ///
    /// Never fails: probe errors fall through to the next format and finally
    /// to [`ImageFormat::FALLBACK`].
    pub async fn resolve_format(&self) -> ImageFormat {
        *self.resolved.get_or_init(|| self.probe_formats()).await
    }

    /// Returns the resolved format without probing.
    #[must_use]
    pub fn resolved(&self) -> Option<ImageFormat> {
        self.resolved.get().copied()
    }

    async fn probe_formats(&self) -> ImageFormat {
        for format in ImageFormat::PROBE_ORDER {
            match self.probe.supports(format).await {
                Ok(true) => {
                    info!(format = %format, "Resolved client image format");
                    return format;
                }
                Ok(false) => {
                    debug!(format = %format, "Format not decodable");
                }
                Err(e) => {
                    warn!(format = %format, error = %e, "Format probe failed");
                }
            }
        }

        info!(format = %ImageFormat::FALLBACK, "Falling back to universal image format");
        ImageFormat::FALLBACK
    }
}
