//! Normalized RGBA access to source images.
//!
//! The resampling engine reads pixels through [`RgbaSource`], so any image layout that
//! can produce straight (non-premultiplied) RGBA channels in `[0, 1]` can be warped.

use crate::{Image, ImageSize};

/// Read-only random-access pixel source with an RGBA accessor.
///
/// Channels are straight alpha and normalized to `[0, 1]`. Callers are expected to
/// query coordinates within [`RgbaSource::size`]; out-of-range queries may panic.
pub trait RgbaSource: Sync {
    /// Bounds of the source in pixels.
    fn size(&self) -> ImageSize;

    /// Normalized `[r, g, b, a]` at column `x`, row `y`.
    fn rgba(&self, x: usize, y: usize) -> [f32; 4];

    /// Write row `y` as 8-bit RGBA into `out`, which holds `size().width * 4` bytes.
    fn rgba8_row(&self, y: usize, out: &mut [u8]) {
        for (x, px) in out.chunks_exact_mut(4).enumerate() {
            let c = self.rgba(x, y);
            for (o, v) in px.iter_mut().zip(c.iter()) {
                *o = to_u8(*v);
            }
        }
    }
}

/// Convert a normalized channel value to 8 bits with rounding and saturation.
#[inline]
pub fn to_u8(v: f32) -> u8 {
    (v * 255.0).round().clamp(0.0, 255.0) as u8
}

const INV_255: f32 = 1.0 / 255.0;

impl RgbaSource for Image<u8, 4> {
    fn size(&self) -> ImageSize {
        Image::size(self)
    }

    #[inline]
    fn rgba(&self, x: usize, y: usize) -> [f32; 4] {
        let i = (y * self.width() + x) * 4;
        let p = &self.as_slice()[i..i + 4];
        [
            p[0] as f32 * INV_255,
            p[1] as f32 * INV_255,
            p[2] as f32 * INV_255,
            p[3] as f32 * INV_255,
        ]
    }

    fn rgba8_row(&self, y: usize, out: &mut [u8]) {
        out.copy_from_slice(self.row(y));
    }
}

impl RgbaSource for Image<u8, 3> {
    fn size(&self) -> ImageSize {
        Image::size(self)
    }

    #[inline]
    fn rgba(&self, x: usize, y: usize) -> [f32; 4] {
        let i = (y * self.width() + x) * 3;
        let p = &self.as_slice()[i..i + 3];
        [
            p[0] as f32 * INV_255,
            p[1] as f32 * INV_255,
            p[2] as f32 * INV_255,
            1.0,
        ]
    }

    fn rgba8_row(&self, y: usize, out: &mut [u8]) {
        for (px, rgb) in out.chunks_exact_mut(4).zip(self.row(y).chunks_exact(3)) {
            px[..3].copy_from_slice(rgb);
            px[3] = 255;
        }
    }
}

impl RgbaSource for Image<u8, 1> {
    fn size(&self) -> ImageSize {
        Image::size(self)
    }

    #[inline]
    fn rgba(&self, x: usize, y: usize) -> [f32; 4] {
        let v = self.as_slice()[y * self.width() + x] as f32 * INV_255;
        [v, v, v, 1.0]
    }

    fn rgba8_row(&self, y: usize, out: &mut [u8]) {
        for (px, &v) in out.chunks_exact_mut(4).zip(self.row(y).iter()) {
            px.copy_from_slice(&[v, v, v, 255]);
        }
    }
}

impl RgbaSource for Image<f32, 4> {
    fn size(&self) -> ImageSize {
        Image::size(self)
    }

    #[inline]
    fn rgba(&self, x: usize, y: usize) -> [f32; 4] {
        let i = (y * self.width() + x) * 4;
        let p = &self.as_slice()[i..i + 4];
        [p[0], p[1], p[2], p[3]]
    }
}

impl RgbaSource for Image<f32, 3> {
    fn size(&self) -> ImageSize {
        Image::size(self)
    }

    #[inline]
    fn rgba(&self, x: usize, y: usize) -> [f32; 4] {
        let i = (y * self.width() + x) * 3;
        let p = &self.as_slice()[i..i + 3];
        [p[0], p[1], p[2], 1.0]
    }
}
