use thiserror::Error;
use warpkit_image::ImageError;

use super::{Region, TransformMethod};
use crate::parallel::ParallelError;

/// Errors raised while configuring or running a warp.
///
/// Configuration errors are detected before any pixel is written.
#[derive(Error, Debug, PartialEq)]
pub enum WarpError {
    /// The transform method tag or name is unknown, or the parameters do not belong to it.
    #[error("invalid transform method: {0}")]
    InvalidMethod(String),

    /// Not enough coefficients were given for the method.
    #[error("{method} expects {expected} parameters, got {actual}")]
    InvalidParameterCount {
        /// The method being configured.
        method: TransformMethod,
        /// Number of values the method needs.
        expected: usize,
        /// Number of values given.
        actual: usize,
    },

    /// A region has zero or negative width or height.
    #[error("degenerate region {0}: width and height must be > 0")]
    DegenerateRegion(Region),

    /// The filter support is negative or not finite.
    #[error("filter support must be finite and >= 0, got {0}")]
    InvalidFilterSupport(f64),

    /// An image container error.
    #[error(transparent)]
    Image(#[from] ImageError),

    /// The row executor failed.
    #[error(transparent)]
    Parallel(#[from] ParallelError),
}
