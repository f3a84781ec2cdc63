//! Decode capability probe port definition.

use async_trait::async_trait;

use crate::domain::entities::ImageFormat;
use crate::domain::errors::ProbeError;

/// Port for checking whether the running client can decode a format.
#[async_trait]
pub trait DecodeProbePort: Send + Sync {
    /// Attempts to decode a minimal sample of `format`.
    ///
    /// Returns `Ok(false)` when the format is known to be unsupported and an
    /// error when the probe itself could not run.
    async fn supports(&self, format: ImageFormat) -> Result<bool, ProbeError>;
}
