use std::ops::Range;

use warpkit_image::ImageSize;

/// Axis-aligned box in destination pixel space, `[x0, x1) × [y0, y1)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Region {
    /// Left edge, inclusive.
    pub x0: i64,
    /// Top edge, inclusive.
    pub y0: i64,
    /// Right edge, exclusive.
    pub x1: i64,
    /// Bottom edge, exclusive.
    pub y1: i64,
}

impl std::fmt::Display for Region {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "({}, {}, {}, {})", self.x0, self.y0, self.x1, self.y1)
    }
}

impl From<ImageSize> for Region {
    fn from(size: ImageSize) -> Self {
        Region::new(0, 0, size.width as i64, size.height as i64)
    }
}

impl Region {
    /// Create a region from its corners.
    pub const fn new(x0: i64, y0: i64, x1: i64, y1: i64) -> Self {
        Self { x0, y0, x1, y1 }
    }

    /// Width in pixels, negative for an inverted region.
    pub fn width(&self) -> i64 {
        self.x1 - self.x0
    }

    /// Height in pixels, negative for an inverted region.
    pub fn height(&self) -> i64 {
        self.y1 - self.y0
    }

    /// True when the region covers no pixel.
    pub fn is_empty(&self) -> bool {
        self.width() <= 0 || self.height() <= 0
    }

    /// Intersect the region with `[0, width) × [0, height)`.
    ///
    /// The result may be empty but never inverted.
    pub fn clip(&self, size: ImageSize) -> Region {
        let (w, h) = (size.width as i64, size.height as i64);
        let x0 = self.x0.clamp(0, w);
        let y0 = self.y0.clamp(0, h);
        Region {
            x0,
            y0,
            x1: self.x1.clamp(x0, w),
            y1: self.y1.clamp(y0, h),
        }
    }

    /// Column range of a clipped region.
    pub(crate) fn cols(&self) -> Range<usize> {
        self.x0.max(0) as usize..self.x1.max(0) as usize
    }

    /// Row range of a clipped region.
    pub(crate) fn rows(&self) -> Range<usize> {
        self.y0.max(0) as usize..self.y1.max(0) as usize
    }
}

/// One entry of a mesh: a destination region and the source quad it samples.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeshEntry {
    /// Destination region.
    pub region: Region,
    /// Source quad corners `[nw.x, nw.y, sw.x, sw.y, se.x, se.y, ne.x, ne.y]`.
    pub quad: [f64; 8],
}

/// An ordered list of (region, quad) pairs.
///
/// Regions are expected to be disjoint but this is not checked; where they overlap,
/// the entry transformed last wins.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshMap {
    entries: Vec<MeshEntry>,
}

impl MeshMap {
    /// Create an empty mesh.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a region and the source quad it is mapped from.
    pub fn push(&mut self, region: Region, quad: [f64; 8]) {
        self.entries.push(MeshEntry { region, quad });
    }

    /// Builder form of [`MeshMap::push`].
    pub fn with(mut self, region: Region, quad: [f64; 8]) -> Self {
        self.push(region, quad);
        self
    }

    /// The entries in insertion order.
    pub fn entries(&self) -> &[MeshEntry] {
        &self.entries
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if the mesh has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(Region, [f64; 8])> for MeshMap {
    fn from_iter<I: IntoIterator<Item = (Region, [f64; 8])>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(region, quad)| MeshEntry { region, quad })
                .collect(),
        }
    }
}
