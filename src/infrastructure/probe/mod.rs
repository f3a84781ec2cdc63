//! Client decode capability probing.

pub mod image_decode_probe;

pub use image_decode_probe::ImageDecodeProbe;
