//! Application configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::application::services::{DEFAULT_ROOT_MARGIN, LazyLoadOptions, SizesPolicy};
use crate::domain::entities::{DEFAULT_QUALITY, ImageConfig};

/// Log level configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Trace level.
    Trace,
    /// Debug level.
    Debug,
    /// Info level.
    Info,
    /// Warning level.
    #[default]
    Warn,
    /// Error level.
    Error,
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Trace => write!(f, "trace"),
            Self::Debug => write!(f, "debug"),
            Self::Info => write!(f, "info"),
            Self::Warn => write!(f, "warn"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// Application configuration, read from `config.toml` and CLI overrides.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Log file path. Logs go to stderr when unset.
    #[serde(default)]
    pub log_path: Option<PathBuf>,

    /// Log verbosity level.
    #[serde(default)]
    pub log_level: LogLevel,

    /// Defaults applied to every image request.
    #[serde(default)]
    pub images: ImageDefaults,

    /// `sizes` attribute heuristic.
    #[serde(default)]
    pub sizes: SizesPolicy,

    /// Lazy reveal settings.
    #[serde(default)]
    pub lazy_load: LazyLoadConfig,
}

/// Image request defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageDefaults {
    /// Target widths when a request gives none.
    #[serde(default = "default_widths")]
    pub widths: Vec<u32>,

    /// Encoder quality.
    #[serde(default = "default_quality")]
    pub quality: u32,

    /// Defer loading by default.
    #[serde(default = "default_true")]
    pub lazy: bool,

    /// Transform service base URL.
    #[serde(default)]
    pub cdn_url: Option<String>,
}

impl Default for ImageDefaults {
    fn default() -> Self {
        Self {
            widths: default_widths(),
            quality: default_quality(),
            lazy: true,
            cdn_url: None,
        }
    }
}

impl ImageDefaults {
    /// Converts to the configuration requests are merged over.
    #[must_use]
    pub fn to_image_config(&self) -> ImageConfig {
        ImageConfig {
            widths: self.widths.clone(),
            quality: Some(self.quality),
            lazy: self.lazy,
            cdn_url: self.cdn_url.clone(),
            priority: false,
        }
    }
}

/// Lazy reveal configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LazyLoadConfig {
    /// Pixels around the viewport that count as near.
    #[serde(default = "default_root_margin")]
    pub root_margin: u32,

    /// Viewport height used by `scroll`.
    #[serde(default = "default_viewport_height")]
    pub viewport_height: u32,
}

impl Default for LazyLoadConfig {
    fn default() -> Self {
        Self {
            root_margin: DEFAULT_ROOT_MARGIN,
            viewport_height: default_viewport_height(),
        }
    }
}

impl LazyLoadConfig {
    /// Returns the manager options.
    #[must_use]
    pub const fn options(&self) -> LazyLoadOptions {
        LazyLoadOptions {
            root_margin: self.root_margin,
        }
    }
}

fn default_widths() -> Vec<u32> {
    vec![640, 768, 1024, 1280, 1536]
}

fn default_quality() -> u32 {
    DEFAULT_QUALITY
}

fn default_root_margin() -> u32 {
    DEFAULT_ROOT_MARGIN
}

fn default_viewport_height() -> u32 {
    800
}

fn default_true() -> bool {
    true
}

use super::args::CliArgs;

impl AppConfig {
    /// Merges CLI arguments into the configuration.
    pub fn merge_with_args(&mut self, args: &CliArgs) {
        if let Some(log_path) = &args.log_path {
            self.log_path = Some(log_path.clone());
        }
        if let Some(log_level) = args.log_level {
            self.log_level = log_level;
        }
        if let Some(cdn_url) = &args.cdn_url {
            self.images.cdn_url = Some(cdn_url.clone());
        }
        if let Some(root_margin) = args.root_margin {
            self.lazy_load.root_margin = root_margin;
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_path: None,
            log_level: LogLevel::default(),
            images: ImageDefaults::default(),
            sizes: SizesPolicy::default(),
            lazy_load: LazyLoadConfig::default(),
        }
    }
}
