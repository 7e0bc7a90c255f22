#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// image representation for resampling purposes.
pub mod image;

/// Error types for the image module.
pub mod error;

/// normalized RGBA pixel access.
pub mod rgba;

pub use crate::error::ImageError;
pub use crate::image::{Image, ImageSize};
pub use crate::rgba::RgbaSource;
