//! Decode probe error types.

use thiserror::Error;

use crate::domain::entities::ImageFormat;

/// Failure while probing decode support for a format.
///
/// Never surfaced past the format detector; it only decides whether the
/// next format in preference order is tried.
#[derive(Debug, Clone, Error)]
#[allow(missing_docs)]
pub enum ProbeError {
    #[error("no probe sample available for {format}")]
    MissingSample { format: ImageFormat },

    #[error("probe sample for {format} is malformed: {message}")]
    MalformedSample { format: ImageFormat, message: String },

    #[error("failed to decode {format} probe sample: {message}")]
    Decode { format: ImageFormat, message: String },

    #[error("probe task failed: {message}")]
    Task { message: String },
}

impl ProbeError {
    /// Creates decode error.
    #[must_use]
    pub fn decode(format: ImageFormat, message: impl Into<String>) -> Self {
        Self::Decode {
            format,
            message: message.into(),
        }
    }

    /// Creates task error.
    #[must_use]
    pub fn task(message: impl Into<String>) -> Self {
        Self::Task {
            message: message.into(),
        }
    }
}
