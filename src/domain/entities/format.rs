//! Image encoding formats the delivery pipeline can request.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Compressed image encoding, declared in preference order.
///
/// `Avif` is preferred, `Webp` next, and `Jpg` is the universal fallback that
/// every client decodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    /// AV1 image file format.
    Avif,
    /// `WebP`.
    Webp,
    /// Baseline JPEG.
    Jpg,
}

impl ImageFormat {
    /// Formats that need a decode probe, highest preference first.
    pub const PROBE_ORDER: [Self; 2] = [Self::Avif, Self::Webp];

    /// Format every client can decode.
    pub const FALLBACK: Self = Self::Jpg;

    /// Returns the value used for the `fmt` query parameter.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Avif => "avif",
            Self::Webp => "webp",
            Self::Jpg => "jpg",
        }
    }

    /// Returns the MIME type served for this format.
    #[must_use]
    pub const fn mime_type(self) -> &'static str {
        match self {
            Self::Avif => "image/avif",
            Self::Webp => "image/webp",
            Self::Jpg => "image/jpeg",
        }
    }

    /// Returns the conventional file extension.
    #[must_use]
    pub const fn extension(self) -> &'static str {
        self.as_str()
    }
}

impl fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown format name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown image format: {0}")]
pub struct UnknownFormat(pub String);

impl FromStr for ImageFormat {
    type Err = UnknownFormat;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "avif" => Ok(Self::Avif),
            "webp" => Ok(Self::Webp),
            "jpg" | "jpeg" => Ok(Self::Jpg),
            other => Err(UnknownFormat(other.to_string())),
        }
    }
}
