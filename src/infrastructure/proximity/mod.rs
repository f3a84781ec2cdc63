//! Proximity-watching platforms.

pub mod viewport;

pub use viewport::{UnsupportedPlatform, Viewport, ViewportObserver, ViewportPlatform};
