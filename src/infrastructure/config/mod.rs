//! Application configuration.

pub mod app_config;
pub mod args;
pub mod storage;

pub use app_config::{AppConfig, ImageDefaults, LazyLoadConfig, LogLevel};
pub use args::{CliArgs, Command, DescribeArgs, FormatChoice, OutputFormat, ScrollArgs};
pub use storage::{ConfigError, ConfigFile};
