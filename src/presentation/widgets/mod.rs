mod lazy_image;

pub use lazy_image::{ImageAttributes, LazyImage};
