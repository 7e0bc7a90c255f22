//! Destination to source coordinate mappings.
//!
//! All mappings take integer-valued destination pixel indices and sample at the pixel
//! center, `(x + 0.5, y + 0.5)`.

/// Affine mapping `[a0, a1, a2, a3, a4, a5]`.
#[inline]
pub fn affine_transform(x: f64, y: f64, a: &[f64; 6]) -> (f64, f64) {
    let xin = x + 0.5;
    let yin = y + 0.5;
    affine_point(xin, yin, a)
}

/// Perspective mapping `[a0, .., a7]` with a homogeneous divide.
#[inline]
pub fn perspective_transform(x: f64, y: f64, a: &[f64; 8]) -> (f64, f64) {
    let xin = x + 0.5;
    let yin = y + 0.5;
    perspective_point(xin, yin, a)
}

/// Bilinear quad mapping `[a0, .., a7]`.
#[inline]
pub fn quad_transform(x: f64, y: f64, a: &[f64; 8]) -> (f64, f64) {
    let xin = x + 0.5;
    let yin = y + 0.5;
    quad_point(xin, yin, a)
}

#[inline]
pub(crate) fn affine_point(x: f64, y: f64, a: &[f64; 6]) -> (f64, f64) {
    (a[0] * x + a[1] * y + a[2], a[3] * x + a[4] * y + a[5])
}

#[inline]
pub(crate) fn perspective_point(x: f64, y: f64, a: &[f64; 8]) -> (f64, f64) {
    let w = a[6] * x + a[7] * y + 1.0;
    (
        (a[0] * x + a[1] * y + a[2]) / w,
        (a[3] * x + a[4] * y + a[5]) / w,
    )
}

#[inline]
pub(crate) fn quad_point(x: f64, y: f64, a: &[f64; 8]) -> (f64, f64) {
    (
        a[0] + a[1] * x + a[2] * y + a[3] * x * y,
        a[4] + a[5] * x + a[6] * y + a[7] * x * y,
    )
}
