//! Data transfer objects for the application layer.

mod image_dto;

pub use image_dto::{ImageRequest, ResolvedImage};
