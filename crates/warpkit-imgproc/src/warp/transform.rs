use warpkit_image::{Image, ImageSize, RgbaSource};

use super::{
    Coefficients, Region, RegionWeights, Resampler, TransformMethod, TransformParams,
    TransformPlan, WarpError, WeightTable,
};
use crate::filter::ResampleFilter;
use crate::parallel::{par_for_each_row_init, with_strategy, ExecutionStrategy};

/// Warp a source image into a new destination image of size `dst_size`.
///
/// The destination starts fully transparent (all zeros); pixels without a source
/// sample get `fill` or stay transparent.
///
/// # Arguments
///
/// * `src` - The source image.
/// * `dst_size` - The size of the output image.
/// * `method` - The transform method.
/// * `params` - The method parameters: 6 affine, 4 extent, 8 perspective, 8 quad
///   (`nw, sw, se, ne`) or a mesh.
/// * `filter` - The resampling filter; a support of 0 samples the nearest pixel.
/// * `fill` - Color written where no source sample is available.
///
/// # Returns
///
/// The warped RGBA image.
///
/// # Errors
///
/// Any configuration error is returned before a pixel is written.
///
/// # Example
///
/// ```
/// use warpkit_image::Image;
/// use warpkit_imgproc::filter::Filter;
/// use warpkit_imgproc::warp::{transform, TransformMethod};
///
/// let src = Image::<u8, 4>::from_size_val([4, 4].into(), 255).unwrap();
///
/// let dst = transform(
///     &src,
///     [2, 2].into(),
///     TransformMethod::Extent,
///     &[0.0, 0.0, 4.0, 4.0].into(),
///     &Filter::LINEAR,
///     None,
/// )
/// .unwrap();
///
/// assert_eq!(dst.as_slice(), &[255; 16]);
/// ```
pub fn transform<S, F>(
    src: &S,
    dst_size: ImageSize,
    method: TransformMethod,
    params: &TransformParams,
    filter: &F,
    fill: Option<[u8; 4]>,
) -> Result<Image<u8, 4>, WarpError>
where
    S: RgbaSource + ?Sized,
    F: ResampleFilter + ?Sized,
{
    let mut dst = Image::from_size_val(dst_size, 0u8)?;
    transform_into(
        src,
        &mut dst,
        method,
        params,
        filter,
        fill,
        ExecutionStrategy::default(),
    )?;
    Ok(dst)
}

/// Warp a source image into an existing destination image.
///
/// Only the pixels covered by the transform regions are written. An empty source
/// leaves the destination unchanged.
///
/// # Arguments
///
/// * `src` - The source image.
/// * `dst` - The destination image.
/// * `method` - The transform method.
/// * `params` - The method parameters.
/// * `filter` - The resampling filter.
/// * `fill` - Color written where no source sample is available.
/// * `strategy` - How destination rows are spread over threads.
pub fn transform_into<S, F>(
    src: &S,
    dst: &mut Image<u8, 4>,
    method: TransformMethod,
    params: &TransformParams,
    filter: &F,
    fill: Option<[u8; 4]>,
    strategy: ExecutionStrategy,
) -> Result<(), WarpError>
where
    S: RgbaSource + ?Sized,
    F: ResampleFilter + ?Sized,
{
    let support = filter.support();
    if !support.is_finite() || support < 0.0 {
        return Err(WarpError::InvalidFilterSupport(support));
    }

    let plan = TransformPlan::resolve(method, params, dst.size())?;
    log::debug!(
        "{} transform into {}: {} region(s), filter support {}",
        plan.method(),
        dst.size(),
        plan.steps().len(),
        support
    );

    if src.size().is_empty() {
        log::debug!("empty source {}, nothing to do", src.size());
        return Ok(());
    }

    // a fixed pool is built once and shared by every region
    with_strategy(strategy, |strategy| {
        let transformer = RegionTransformer::new(src, filter, fill, strategy);
        plan.steps()
            .iter()
            .try_for_each(|(region, coeffs)| transformer.apply(dst, *region, coeffs))
    })??;

    Ok(())
}

/// Runs the resampler over one destination region at a time.
///
/// Regions are clipped to the destination, and their rows split across workers.
/// Successive calls on the same destination overwrite where regions overlap.
pub struct RegionTransformer<'a, S: ?Sized, F: ?Sized> {
    src: &'a S,
    filter: &'a F,
    fill: Option<[u8; 4]>,
    strategy: ExecutionStrategy,
}

impl<'a, S, F> RegionTransformer<'a, S, F>
where
    S: RgbaSource + ?Sized,
    F: ResampleFilter + ?Sized,
{
    /// Create a transformer reading from `src`.
    pub fn new(
        src: &'a S,
        filter: &'a F,
        fill: Option<[u8; 4]>,
        strategy: ExecutionStrategy,
    ) -> Self {
        Self {
            src,
            filter,
            fill,
            strategy,
        }
    }

    /// Resample `region` of `dst` through `coeffs`.
    ///
    /// The coefficients map pixels relative to the region origin. The parts of the
    /// region outside `dst` are skipped.
    pub fn apply(
        &self,
        dst: &mut Image<u8, 4>,
        region: Region,
        coeffs: &Coefficients,
    ) -> Result<(), WarpError> {
        let src_size = self.src.size();
        let clip = region.clip(dst.size());
        if clip.is_empty() || src_size.is_empty() {
            log::trace!("region {region} has nothing to write, skipped");
            return Ok(());
        }

        let stride = dst.stride();

        if clip == region && clip == Region::from(src_size) && coeffs.is_identity() {
            log::debug!("region {region} is an identity mapping, copying source rows");
            let cols = clip.cols();
            let bytes = cols.start * 4..cols.end * 4;
            par_for_each_row_init(
                dst.as_slice_mut(),
                stride,
                clip.rows(),
                self.strategy,
                || (),
                |_, y, row| self.src.rgba8_row(y, &mut row[bytes.clone()]),
            )?;
            return Ok(());
        }

        let weights = if self.filter.support() == 0.0 {
            None
        } else {
            Some(self.region_weights(region, clip, coeffs, src_size))
        };

        let resampler = Resampler::new(
            self.src,
            *coeffs,
            region,
            clip,
            weights,
            self.filter,
            self.fill,
        );

        par_for_each_row_init(
            dst.as_slice_mut(),
            stride,
            clip.rows(),
            self.strategy,
            || resampler.scratch(),
            |scratch, y, row| resampler.resample_row(scratch, y, row),
        )?;

        Ok(())
    }

    // tables over the clipped region, scaled by the source footprint of the whole region
    fn region_weights(
        &self,
        region: Region,
        clip: Region,
        coeffs: &Coefficients,
        src_size: ImageSize,
    ) -> RegionWeights {
        let (w, h) = (region.width() as f64, region.height() as f64);

        let (mut min_x, mut max_x) = (f64::INFINITY, f64::NEG_INFINITY);
        let (mut min_y, mut max_y) = (f64::INFINITY, f64::NEG_INFINITY);
        for (x, y) in [(0.0, 0.0), (w, 0.0), (0.0, h), (w, h)] {
            let (u, v) = coeffs.map_point(x, y);
            min_x = min_x.min(u);
            max_x = max_x.max(u);
            min_y = min_y.min(v);
            max_y = max_y.max(v);
        }

        let (scale_x, offset_x) = axis_footprint(min_x, max_x, w);
        let (scale_y, offset_y) = axis_footprint(min_y, max_y, h);

        // shift the tables to the first column and row that survived clipping
        let dx = (clip.x0 - region.x0) as f64;
        let dy = (clip.y0 - region.y0) as f64;

        let x = WeightTable::with_offset(
            clip.width() as usize,
            src_size.width,
            scale_x,
            offset_x + dx * scale_x,
            self.filter,
        );
        let y = WeightTable::with_offset(
            clip.height() as usize,
            src_size.height,
            scale_y,
            offset_y + dy * scale_y,
            self.filter,
        );

        log::debug!(
            "region {region}: scale ({scale_x:.4}, {scale_y:.4}), radius ({}, {})",
            x.axis().radius(),
            y.axis().radius()
        );

        RegionWeights { x, y }
    }
}

// source samples per destination sample and the source start of one axis; a
// footprint that does not map to finite coordinates falls back to unit scale
fn axis_footprint(min: f64, max: f64, extent: f64) -> (f64, f64) {
    let scale = (max - min) / extent;
    if scale.is_finite() && min.is_finite() {
        (scale, min)
    } else {
        (1.0, 0.0)
    }
}
