use std::ops::Range;

use crate::filter::ResampleFilter;

/// A source sample index and its normalized contribution.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeightEntry {
    /// Source index along the axis.
    pub index: usize,
    /// Normalized weight.
    pub weight: f64,
}

/// Footprint of a filter along one axis for a given scale.
///
/// Magnification keeps the support at one source sample; minification widens it in
/// proportion to the scale so the kernel covers every source sample a destination
/// sample spans.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisWeights {
    scale: f64,
    eff_scale: f64,
    radius: f64,
    src_len: usize,
}

impl AxisWeights {
    /// Create the footprint for `scale` source samples per destination sample.
    pub fn new(scale: f64, src_len: usize, support: f64) -> Self {
        let eff_scale = scale.max(1.0);
        Self {
            scale,
            eff_scale,
            radius: (eff_scale * support).ceil(),
            src_len,
        }
    }

    /// Source samples per destination sample.
    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// The scale the kernel is stretched by, never below 1.
    pub fn eff_scale(&self) -> f64 {
        self.eff_scale
    }

    /// Search radius in source samples.
    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Compute the weights of a sample centered at `center`, in source index space,
    /// replacing the contents of `out`.
    pub fn compute_into<F: ResampleFilter + ?Sized>(
        &self,
        center: f64,
        filter: &F,
        out: &mut Vec<WeightEntry>,
    ) {
        out.clear();
        self.push_weights(center, filter, out);
    }

    // appends the normalized weights for `center` to `out`
    fn push_weights<F: ResampleFilter + ?Sized>(
        &self,
        center: f64,
        filter: &F,
        out: &mut Vec<WeightEntry>,
    ) {
        if self.src_len == 0 || !center.is_finite() {
            return;
        }

        let last = self.src_len as i64 - 1;
        let begin = ((center - self.radius).ceil() as i64).max(0);
        let end = ((center + self.radius).floor() as i64).min(last);

        let start = out.len();
        let mut sum = 0.0;
        for u in begin..=end {
            let w = filter.kernel((u as f64 - center) / self.eff_scale);
            if w != 0.0 {
                sum += w;
                out.push(WeightEntry {
                    index: u as usize,
                    weight: w,
                });
            }
        }

        if sum != 0.0 {
            out[start..].iter_mut().for_each(|e| e.weight /= sum);
        }
    }
}

/// Precomputed convolution weights along one axis, one list per destination index.
///
/// Lists are sparse (zero weights are dropped) and each non-empty list sums to 1.
#[derive(Debug, Clone)]
pub struct WeightTable {
    axis: AxisWeights,
    offset: f64,
    entries: Vec<WeightEntry>,
    spans: Vec<Range<usize>>,
}

impl WeightTable {
    /// Build the weights for `dst_len` destination samples over `src_len` source samples.
    ///
    /// Destination index `v` is centered at `(v + 0.5) * scale - 0.5` in source index
    /// space.
    ///
    /// # Arguments
    ///
    /// * `dst_len` - Number of destination samples.
    /// * `src_len` - Number of source samples.
    /// * `scale` - Source extent divided by destination extent.
    /// * `filter` - The resampling filter.
    ///
    /// # Example
    ///
    /// ```
    /// use warpkit_imgproc::filter::Filter;
    /// use warpkit_imgproc::warp::{WeightEntry, WeightTable};
    ///
    /// let table = WeightTable::new(1, 1, 1.0, &Filter::BOX);
    /// assert_eq!(table.weights(0), &[WeightEntry { index: 0, weight: 1.0 }]);
    /// ```
    pub fn new<F: ResampleFilter + ?Sized>(
        dst_len: usize,
        src_len: usize,
        scale: f64,
        filter: &F,
    ) -> Self {
        Self::with_offset(dst_len, src_len, scale, 0.0, filter)
    }

    /// Like [`WeightTable::new`], with destination index 0 starting at source
    /// coordinate `offset` instead of 0.
    pub fn with_offset<F: ResampleFilter + ?Sized>(
        dst_len: usize,
        src_len: usize,
        scale: f64,
        offset: f64,
        filter: &F,
    ) -> Self {
        let axis = AxisWeights::new(scale, src_len, filter.support());

        let per_sample = (2.0 * axis.radius + 1.0).min(src_len as f64).max(0.0) as usize;
        let mut entries = Vec::with_capacity(dst_len * per_sample);
        let mut spans = Vec::with_capacity(dst_len);

        for v in 0..dst_len {
            let start = entries.len();
            axis.push_weights(center_of(v, scale, offset), filter, &mut entries);
            spans.push(start..entries.len());
        }

        Self {
            axis,
            offset,
            entries,
            spans,
        }
    }

    /// The weights of destination index `v`.
    ///
    /// # Panics
    ///
    /// Panics if `v >= self.len()`.
    pub fn weights(&self, v: usize) -> &[WeightEntry] {
        &self.entries[self.spans[v].clone()]
    }

    /// Center of destination index `v` in source index space.
    pub fn center(&self, v: usize) -> f64 {
        center_of(v, self.axis.scale, self.offset)
    }

    /// The footprint the table was built with.
    pub fn axis(&self) -> &AxisWeights {
        &self.axis
    }

    /// Number of destination samples.
    pub fn len(&self) -> usize {
        self.spans.len()
    }

    /// True if the table has no destination samples.
    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }

    /// Iterate over the weight lists in destination order.
    pub fn iter(&self) -> impl Iterator<Item = &[WeightEntry]> + '_ {
        self.spans.iter().map(move |s| &self.entries[s.clone()])
    }
}

#[inline]
fn center_of(v: usize, scale: f64, offset: f64) -> f64 {
    (v as f64 + 0.5) * scale + offset - 0.5
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::Filter;
    use approx::assert_relative_eq;
    use rand::Rng;

    #[test]
    fn single_sample_box() {
        let table = WeightTable::new(1, 1, 1.0, &Filter::BOX);
        assert_eq!(table.len(), 1);
        assert_eq!(
            table.weights(0),
            &[WeightEntry {
                index: 0,
                weight: 1.0
            }]
        );
    }

    #[test]
    fn unit_scale_box_drops_neighbors() {
        // neighbors sit at distance 1, outside the box support
        let table = WeightTable::new(5, 5, 1.0, &Filter::BOX);
        for (v, w) in table.iter().enumerate() {
            assert_eq!(
                w,
                &[WeightEntry {
                    index: v,
                    weight: 1.0
                }]
            );
        }
    }

    #[test]
    fn minification_widens_support() {
        // 3 source samples per destination sample
        let table = WeightTable::new(2, 6, 3.0, &Filter::BOX);
        assert_eq!(table.axis().eff_scale(), 3.0);
        assert_eq!(table.axis().radius(), 2.0);

        let w0: Vec<usize> = table.weights(0).iter().map(|e| e.index).collect();
        let w1: Vec<usize> = table.weights(1).iter().map(|e| e.index).collect();
        assert_eq!(w0, vec![0, 1, 2]);
        assert_eq!(w1, vec![3, 4, 5]);
        for e in table.weights(0) {
            assert_relative_eq!(e.weight, 1.0 / 3.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn magnification_keeps_unit_support() {
        // 2x magnification: centers at -0.25, 0.25, 0.75, 1.25
        let table = WeightTable::new(4, 2, 0.5, &Filter::BOX);
        assert_eq!(table.axis().eff_scale(), 1.0);
        let picked: Vec<usize> = table.iter().map(|w| w[0].index).collect();
        assert_eq!(picked, vec![0, 0, 1, 1]);
        assert!(table.iter().all(|w| w.len() == 1));
    }

    #[test]
    fn linear_interpolates_between_samples() {
        let table = WeightTable::new(4, 2, 0.5, &Filter::LINEAR);
        // center 0.25: indices 0 and 1 weighted 0.75 / 0.25
        let w = table.weights(1);
        assert_eq!(w.len(), 2);
        assert_eq!(w[0].index, 0);
        assert_relative_eq!(w[0].weight, 0.75, epsilon = 1e-12);
        assert_relative_eq!(w[1].weight, 0.25, epsilon = 1e-12);

        // center -0.25 clamps to the first sample and renormalizes
        assert_eq!(
            table.weights(0),
            &[WeightEntry {
                index: 0,
                weight: 1.0
            }]
        );
    }

    #[test]
    fn offset_shifts_centers() {
        let table = WeightTable::with_offset(3, 10, 1.0, 4.0, &Filter::BOX);
        assert_eq!(table.center(0), 4.0);
        let picked: Vec<usize> = table.iter().map(|w| w[0].index).collect();
        assert_eq!(picked, vec![4, 5, 6]);
    }

    #[test]
    fn far_outside_is_empty() {
        let table = WeightTable::with_offset(2, 4, 1.0, 100.0, &Filter::LANCZOS);
        assert!(table.iter().all(|w| w.is_empty()));

        let table = WeightTable::new(3, 0, 1.0, &Filter::LINEAR);
        assert_eq!(table.len(), 3);
        assert!(table.weights(2).is_empty());
    }

    #[test]
    fn compute_into_matches_table() {
        let table = WeightTable::new(7, 5, 5.0 / 7.0, &Filter::CATMULL_ROM);
        let mut scratch = vec![WeightEntry {
            index: 99,
            weight: 9.0,
        }];
        for v in 0..table.len() {
            table
                .axis()
                .compute_into(table.center(v), &Filter::CATMULL_ROM, &mut scratch);
            assert_eq!(scratch.as_slice(), table.weights(v));
        }
    }

    #[test]
    fn weights_sum_to_one() {
        let filters = [
            Filter::BOX,
            Filter::LINEAR,
            Filter::HERMITE,
            Filter::MITCHELL_NETRAVALI,
            Filter::CATMULL_ROM,
            Filter::LANCZOS,
        ];
        let mut rng = rand::rng();

        for _ in 0..50 {
            let src_len = rng.random_range(1..64);
            let dst_len = rng.random_range(1..64);
            let scale = src_len as f64 / dst_len as f64;
            let offset = rng.random_range(-2.0..2.0);

            for f in &filters {
                let table = WeightTable::with_offset(dst_len, src_len, scale, offset, f);
                for w in table.iter() {
                    let sum: f64 = w.iter().map(|e| e.weight).sum();
                    if !w.is_empty() && sum != 0.0 {
                        assert_relative_eq!(sum, 1.0, epsilon = 1e-6);
                    }
                    assert!(w.iter().all(|e| e.weight != 0.0 && e.index < src_len));
                }
            }
        }
    }
}
