#![doc = env!("CARGO_PKG_DESCRIPTION")]

#[doc(inline)]
pub use warpkit_image as image;

#[doc(inline)]
pub use warpkit_imgproc as imgproc;
