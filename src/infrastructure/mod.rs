//! Infrastructure layer with platform adapters.

/// Application configuration.
pub mod config;
/// Decode capability probing.
pub mod probe;
/// Proximity-watching platforms.
pub mod proximity;

pub use config::{AppConfig, CliArgs, ConfigFile, LogLevel};
pub use probe::ImageDecodeProbe;
pub use proximity::{UnsupportedPlatform, ViewportPlatform};
