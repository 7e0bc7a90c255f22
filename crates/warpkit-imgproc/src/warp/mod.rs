//! Geometric image resampling through affine, perspective, quad and mesh warps.
//!
//! For every destination pixel the warp maps the pixel center to a continuous source
//! coordinate and blends a weighted neighborhood of source pixels:
//!
//! - Affine transformations (6 coefficients)
//! - Extents, stretching a source box over the destination
//! - Perspective transformations (8 coefficients)
//! - Quads, mapping the destination onto four source corners
//! - Meshes, a list of destination regions each mapped from its own quad
//!
//! Weights are separable and sized to the source footprint, so minification does not
//! alias. Colors are blended with premultiplied alpha.
//!
//! # Examples
//!
//! Shrinking an image to half its size:
//!
//! ```no_run
//! use warpkit_image::Image;
//! use warpkit_imgproc::filter::Filter;
//! use warpkit_imgproc::warp::{transform, TransformMethod};
//!
//! let src = Image::<u8, 4>::from_size_val([640, 480].into(), 128).unwrap();
//! let dst = transform(
//!     &src,
//!     [320, 240].into(),
//!     TransformMethod::Extent,
//!     &[0.0, 0.0, 640.0, 480.0].into(),
//!     &Filter::LANCZOS,
//!     None,
//! )
//! .unwrap();
//! ```

mod coefficients;
mod error;
mod mapping;
mod region;
mod resample;
mod transform;
mod weights;

pub use coefficients::{Coefficients, TransformMethod, TransformParams, TransformPlan};
pub use error::WarpError;
pub use mapping::{affine_transform, perspective_transform, quad_transform};
pub use region::{MeshEntry, MeshMap, Region};
pub use resample::{RegionWeights, ResampleScratch, Resampler};
pub use transform::{transform, transform_into, RegionTransformer};
pub use weights::{AxisWeights, WeightEntry, WeightTable};
