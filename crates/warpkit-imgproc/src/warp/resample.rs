use warpkit_image::{rgba::to_u8, ImageSize, RgbaSource};

use super::{AxisWeights, Coefficients, Region, WeightEntry, WeightTable};
use crate::filter::ResampleFilter;

// tolerance when matching a mapped sample center against the precomputed one
const CENTER_EPS: f64 = 1e-6;

/// Per-worker scratch of the [`Resampler`].
///
/// Holds the weight lists of pixels whose mapped center does not line up with the
/// precomputed tables.
#[derive(Debug, Default)]
pub struct ResampleScratch {
    xw: Vec<WeightEntry>,
    yw: Vec<WeightEntry>,
}

/// Separable weight tables of a region, indexed from the clipped region origin.
#[derive(Debug, Clone)]
pub struct RegionWeights {
    /// Weights along the destination columns.
    pub x: WeightTable,
    /// Weights along the destination rows.
    pub y: WeightTable,
}

/// Produces destination pixels of one region from a source image.
///
/// The resampler only reads shared state, so a single instance is used by every
/// worker; each worker brings its own [`ResampleScratch`].
pub struct Resampler<'a, S: ?Sized, F: ?Sized> {
    src: &'a S,
    src_size: ImageSize,
    coeffs: Coefficients,
    region: Region,
    clip: Region,
    weights: Option<RegionWeights>,
    axis_aligned: bool,
    filter: &'a F,
    fill: Option<[u8; 4]>,
}

impl<'a, S, F> Resampler<'a, S, F>
where
    S: RgbaSource + ?Sized,
    F: ResampleFilter + ?Sized,
{
    /// Create a resampler for `region`, writing only the pixels inside `clip`.
    ///
    /// # Arguments
    ///
    /// * `src` - The source image.
    /// * `coeffs` - Maps region relative destination pixels to source coordinates.
    /// * `region` - The requested destination region, the origin of the mapping.
    /// * `clip` - The part of `region` inside the destination buffer.
    /// * `weights` - Precomputed tables over `clip`, `None` for a zero-support filter.
    /// * `filter` - The resampling filter.
    /// * `fill` - Color written where no source sample is available.
    pub fn new(
        src: &'a S,
        coeffs: Coefficients,
        region: Region,
        clip: Region,
        weights: Option<RegionWeights>,
        filter: &'a F,
        fill: Option<[u8; 4]>,
    ) -> Self {
        Self {
            src,
            src_size: src.size(),
            coeffs,
            region,
            clip,
            weights,
            axis_aligned: coeffs.is_axis_aligned(),
            filter,
            fill,
        }
    }

    /// Scratch sized for the tables of this resampler.
    pub fn scratch(&self) -> ResampleScratch {
        let cap = self
            .weights
            .as_ref()
            .map_or(0, |w| 2 * w.x.axis().radius().max(w.y.axis().radius()) as usize + 1);
        ResampleScratch {
            xw: Vec::with_capacity(cap),
            yw: Vec::with_capacity(cap),
        }
    }

    /// Resample the clipped columns of destination row `y`.
    ///
    /// `row` is the full destination row, 4 bytes per pixel. Pixels without a source
    /// sample get the fill color, or are left untouched when there is none.
    pub fn resample_row(&self, scratch: &mut ResampleScratch, y: usize, row: &mut [u8]) {
        for x in self.clip.cols() {
            if let Some(px) = self.sample(scratch, x, y).or(self.fill) {
                row[x * 4..x * 4 + 4].copy_from_slice(&px);
            }
        }
    }

    /// The RGBA value of destination pixel `(x, y)`, `None` when the mapped coordinate
    /// falls outside the source or the sample is fully transparent.
    pub fn sample(&self, scratch: &mut ResampleScratch, x: usize, y: usize) -> Option<[u8; 4]> {
        let (xx, yy) = self.coeffs.transform(
            (x as i64 - self.region.x0) as f64,
            (y as i64 - self.region.y0) as f64,
        );

        match &self.weights {
            None => self.nearest(xx, yy),
            Some(weights) => self.convolve(scratch, weights, x, y, xx, yy),
        }
    }

    fn nearest(&self, xx: f64, yy: f64) -> Option<[u8; 4]> {
        // closest sample to the index space center (xx - 0.5, yy - 0.5)
        let sx = xx.floor();
        let sy = yy.floor();
        if !self.in_bounds(sx, sy) {
            return None;
        }

        let c = self.src.rgba(sx as usize, sy as usize);
        Some([to_u8(c[0]), to_u8(c[1]), to_u8(c[2]), to_u8(c[3])])
    }

    fn convolve(
        &self,
        scratch: &mut ResampleScratch,
        weights: &RegionWeights,
        x: usize,
        y: usize,
        xx: f64,
        yy: f64,
    ) -> Option<[u8; 4]> {
        if !self.in_bounds(xx, yy) {
            return None;
        }

        let (ix, iy) = (x - self.clip.x0 as usize, y - self.clip.y0 as usize);
        let (cx, cy) = (xx - 0.5, yy - 0.5);

        let ResampleScratch { xw, yw } = scratch;
        let on_table = self.axis_aligned
            && (cx - weights.x.center(ix)).abs() < CENTER_EPS
            && (cy - weights.y.center(iy)).abs() < CENTER_EPS;
        let (wx, wy): (&[WeightEntry], &[WeightEntry]) = if on_table {
            (weights.x.weights(ix), weights.y.weights(iy))
        } else {
            let (scale_x, scale_y) = self.local_scale(weights, x, y);
            let support = self.filter.support();
            AxisWeights::new(scale_x, self.src_size.width, support).compute_into(
                cx,
                self.filter,
                xw,
            );
            AxisWeights::new(scale_y, self.src_size.height, support).compute_into(
                cy,
                self.filter,
                yw,
            );
            (&xw[..], &yw[..])
        };

        // premultiplied, horizontal gather per source row then vertical
        let (mut r, mut g, mut b, mut a) = (0.0f64, 0.0f64, 0.0f64, 0.0f64);
        for ey in wy {
            let (mut hr, mut hg, mut hb, mut ha) = (0.0f64, 0.0f64, 0.0f64, 0.0f64);
            for ex in wx {
                let [cr, cg, cb, ca] = self.src.rgba(ex.index, ey.index);
                let aw = ca as f64 * ex.weight;
                hr += cr as f64 * aw;
                hg += cg as f64 * aw;
                hb += cb as f64 * aw;
                ha += aw;
            }
            r += hr * ey.weight;
            g += hg * ey.weight;
            b += hb * ey.weight;
            a += ha * ey.weight;
        }

        if a == 0.0 {
            return None;
        }

        Some([
            to_u8((r / a) as f32),
            to_u8((g / a) as f32),
            to_u8((b / a) as f32),
            to_u8(a as f32),
        ])
    }

    // source samples spanned by one destination step around pixel (x, y), per axis,
    // from central differences of the mapping; the table scale where it is not finite
    fn local_scale(&self, weights: &RegionWeights, x: usize, y: usize) -> (f64, f64) {
        let dx = (x as i64 - self.region.x0) as f64;
        let dy = (y as i64 - self.region.y0) as f64;

        let (lx, ly) = self.coeffs.transform(dx - 1.0, dy);
        let (rx, ry) = self.coeffs.transform(dx + 1.0, dy);
        let (tx, ty) = self.coeffs.transform(dx, dy - 1.0);
        let (bx, by) = self.coeffs.transform(dx, dy + 1.0);

        let scale_x = 0.5 * (rx - lx).abs().max((bx - tx).abs());
        let scale_y = 0.5 * (ry - ly).abs().max((by - ty).abs());

        (
            if scale_x.is_finite() {
                scale_x
            } else {
                weights.x.axis().scale()
            },
            if scale_y.is_finite() {
                scale_y
            } else {
                weights.y.axis().scale()
            },
        )
    }

    // NaN coordinates fail every comparison and count as out of bounds
    #[inline]
    fn in_bounds(&self, sx: f64, sy: f64) -> bool {
        sx >= 0.0
            && sx < self.src_size.width as f64
            && sy >= 0.0
            && sy < self.src_size.height as f64
    }
}
