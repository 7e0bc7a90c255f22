#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// resampling filters module.
pub mod filter;

/// module containing parallelization utilities.
pub mod parallel;

/// image geometric transformations module.
pub mod warp;
