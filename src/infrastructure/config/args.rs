use super::app_config::LogLevel;
use crate::domain::entities::ImageFormat;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(
    name = "oxipix",
    version,
    about = "Adaptive image delivery: format detection, responsive sources and lazy reveal",
    long_about = None
)]
pub struct CliArgs {
    /// Configuration file path.
    #[arg(short, long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Log file path.
    #[arg(long, value_name = "PATH", global = true)]
    pub log_path: Option<PathBuf>,

    /// Log verbosity level.
    #[arg(long, value_enum, global = true)]
    pub log_level: Option<LogLevel>,

    /// Transform service base URL.
    #[arg(long, value_name = "URL", env = "OXIPIX_CDN_URL", global = true)]
    pub cdn_url: Option<String>,

    /// Pixels around the viewport that count as near.
    #[arg(long, value_name = "PX", global = true)]
    pub root_margin: Option<u32>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Detect the best decodable image format.
    Probe,
    /// Build the delivery descriptor for one image.
    Describe(DescribeArgs),
    /// Lay images out vertically and report reveals while scrolling.
    Scroll(ScrollArgs),
}

#[derive(Debug, Args)]
pub struct DescribeArgs {
    /// Source path or URL.
    pub src: String,

    /// Alternative text.
    #[arg(long, default_value = "")]
    pub alt: String,

    /// Target width; repeat for several.
    #[arg(short = 'w', long = "width", value_name = "PX")]
    pub widths: Vec<u32>,

    /// Encoder quality (clamped to 1-100).
    #[arg(short, long)]
    pub quality: Option<u32>,

    /// Load immediately instead of lazily.
    #[arg(long)]
    pub eager: bool,

    /// Above-the-fold image; implies eager.
    #[arg(long)]
    pub priority: bool,

    /// Target format, or `auto` to probe.
    #[arg(long, value_enum, default_value_t = FormatChoice::Auto)]
    pub format: FormatChoice,

    /// Output representation.
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Json)]
    pub output: OutputFormat,
}

#[derive(Debug, Args)]
pub struct ScrollArgs {
    /// Image sources, laid out top to bottom.
    #[arg(required = true)]
    pub srcs: Vec<String>,

    /// Rendered height of each image.
    #[arg(long, default_value_t = 400)]
    pub image_height: u32,

    /// Vertical gap between images.
    #[arg(long, default_value_t = 0)]
    pub gap: u32,

    /// Viewport height, overriding the configured one.
    #[arg(long)]
    pub viewport_height: Option<u32>,

    /// Scroll offsets to visit in order; repeat for several.
    #[arg(long = "at", value_name = "OFFSET")]
    pub offsets: Vec<u32>,

    /// Simulate a platform without a proximity primitive.
    #[arg(long)]
    pub no_observer: bool,
}

/// Format selection for `describe`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum FormatChoice {
    /// Probe the client.
    #[default]
    Auto,
    /// Force AVIF.
    Avif,
    /// Force `WebP`.
    Webp,
    /// Force JPEG.
    Jpg,
}

impl FormatChoice {
    /// Returns the forced format, if any.
    #[must_use]
    pub const fn fixed(self) -> Option<ImageFormat> {
        match self {
            Self::Auto => None,
            Self::Avif => Some(ImageFormat::Avif),
            Self::Webp => Some(ImageFormat::Webp),
            Self::Jpg => Some(ImageFormat::Jpg),
        }
    }
}

/// Output representation for `describe`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Pretty-printed JSON.
    #[default]
    Json,
    /// An `<img>` tag.
    Html,
}
