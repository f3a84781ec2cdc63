//! Application layer with services, use cases and DTOs.

/// Data transfer objects.
pub mod dto;
/// Core image delivery services.
pub mod services;
/// Use case implementations.
pub mod use_cases;

pub use dto::{ImageRequest, ResolvedImage};
pub use services::{FormatDetector, LazyLoadManager, SourceBuilder, build_descriptor};
pub use use_cases::ResolveImageUseCase;
