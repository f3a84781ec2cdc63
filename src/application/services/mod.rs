pub mod format_detector;
pub mod lazy_load_manager;
pub mod source_builder;

pub use format_detector::FormatDetector;
pub use lazy_load_manager::{DEFAULT_ROOT_MARGIN, LazyLoadManager, LazyLoadOptions, ManagerState};
pub use source_builder::{SizesPolicy, SourceBuilder, build_descriptor};
