//! Oxipix - adaptive image delivery.
//!
//! This crate detects which compressed image encoding the client decodes,
//! builds multi-resolution source descriptors for a transform CDN, and defers
//! loading of off-screen images until they approach the viewport.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

/// Application layer containing services, use cases and DTOs.
pub mod application;
/// Domain layer containing entities, errors, and port definitions.
pub mod domain;
/// Infrastructure layer containing probe, proximity and config adapters.
pub mod infrastructure;
/// Presentation layer containing rendering targets and markup.
pub mod presentation;

/// Current version of the application.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name.
pub const NAME: &str = "oxipix";
