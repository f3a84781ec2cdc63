//! Domain entity definitions.

mod descriptor;
mod element;
mod format;
mod image_config;

pub use descriptor::{ImageDescriptor, LoadingMode, SourceEntry};
pub use element::{ElementBounds, ElementKey, ObservationHandle};
pub use format::{ImageFormat, UnknownFormat};
pub use image_config::{
    DEFAULT_QUALITY, ImageConfig, MAX_QUALITY, MIN_QUALITY, NATURAL_WIDTH,
};
