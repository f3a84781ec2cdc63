//! Domain layer with core entities and port definitions.

/// Entity definitions.
pub mod entities;
/// Error types.
pub mod errors;
/// Port definitions.
pub mod ports;

pub use entities::{ImageConfig, ImageDescriptor, ImageFormat, LoadingMode, SourceEntry};
pub use errors::ProbeError;
pub use ports::{DecodeProbePort, LazyElement, ProximityPlatform};
