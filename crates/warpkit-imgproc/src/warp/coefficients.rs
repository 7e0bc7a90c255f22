use std::str::FromStr;

use warpkit_image::ImageSize;

use super::mapping::{
    affine_point, affine_transform, perspective_point, perspective_transform, quad_point,
    quad_transform,
};
use super::{MeshMap, Region, WarpError};

// identity detection tolerates the rounding of `w * (1 / w)` in the quad builder
const IDENTITY_EPS: f64 = 1e-9;

static IDENTITY_AFFINE: [f64; 6] = [1.0, 0.0, 0.0, 0.0, 1.0, 0.0];
static IDENTITY_PERSPECTIVE: [f64; 8] = [1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0];
static IDENTITY_QUAD: [f64; 8] = [0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0];

/// The transform methods accepted by [`crate::warp::transform`].
///
/// `Extent` and `Mesh` are conveniences: they are canonicalized into `Affine` and
/// `Quad` coefficient sets before any pixel is touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransformMethod {
    /// 2x3 affine matrix, 6 values.
    Affine,
    /// Source box `x0, y0, x1, y1` stretched over the destination, 4 values.
    Extent,
    /// Projective mapping, 8 values.
    Perspective,
    /// Source quad corners `nw, sw, se, ne`, 8 values.
    Quad,
    /// A list of destination regions, each mapped from its own source quad.
    Mesh,
}

impl TransformMethod {
    /// Number of flat parameters the method reads, `None` for mesh.
    pub fn num_params(&self) -> Option<usize> {
        match self {
            TransformMethod::Affine => Some(6),
            TransformMethod::Extent => Some(4),
            TransformMethod::Perspective | TransformMethod::Quad => Some(8),
            TransformMethod::Mesh => None,
        }
    }
}

impl std::fmt::Display for TransformMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let name = match self {
            TransformMethod::Affine => "affine",
            TransformMethod::Extent => "extent",
            TransformMethod::Perspective => "perspective",
            TransformMethod::Quad => "quad",
            TransformMethod::Mesh => "mesh",
        };
        f.write_str(name)
    }
}

impl TryFrom<u32> for TransformMethod {
    type Error = WarpError;

    /// Numeric tags: 0 affine, 1 extent, 2 perspective, 3 quad, 4 mesh.
    fn try_from(tag: u32) -> Result<Self, Self::Error> {
        match tag {
            0 => Ok(TransformMethod::Affine),
            1 => Ok(TransformMethod::Extent),
            2 => Ok(TransformMethod::Perspective),
            3 => Ok(TransformMethod::Quad),
            4 => Ok(TransformMethod::Mesh),
            _ => Err(WarpError::InvalidMethod(format!("tag {tag}"))),
        }
    }
}

impl FromStr for TransformMethod {
    type Err = WarpError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "affine" => Ok(TransformMethod::Affine),
            "extent" => Ok(TransformMethod::Extent),
            "perspective" => Ok(TransformMethod::Perspective),
            "quad" => Ok(TransformMethod::Quad),
            "mesh" => Ok(TransformMethod::Mesh),
            _ => Err(WarpError::InvalidMethod(s.to_string())),
        }
    }
}

/// User parameters of a transform.
#[derive(Debug, Clone, PartialEq)]
pub enum TransformParams {
    /// Flat coefficient or corner list for affine, extent, perspective and quad.
    Values(Vec<f64>),
    /// Regions and quads for mesh.
    Mesh(MeshMap),
}

impl From<Vec<f64>> for TransformParams {
    fn from(values: Vec<f64>) -> Self {
        TransformParams::Values(values)
    }
}

impl From<&[f64]> for TransformParams {
    fn from(values: &[f64]) -> Self {
        TransformParams::Values(values.to_vec())
    }
}

impl<const N: usize> From<[f64; N]> for TransformParams {
    fn from(values: [f64; N]) -> Self {
        TransformParams::Values(values.to_vec())
    }
}

impl From<MeshMap> for TransformParams {
    fn from(mesh: MeshMap) -> Self {
        TransformParams::Mesh(mesh)
    }
}

/// A canonical coefficient set, ready to map destination pixels to source coordinates.
///
/// Immutable once built; the variant selects the mapping.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Coefficients {
    /// `xout = a0*x + a1*y + a2`, `yout = a3*x + a4*y + a5`.
    Affine([f64; 6]),
    /// Affine numerators divided by `a6*x + a7*y + 1`.
    Perspective([f64; 8]),
    /// `xout = a0 + a1*x + a2*y + a3*x*y`, `yout = a4 + a5*x + a6*y + a7*x*y`.
    Quad([f64; 8]),
}

impl Coefficients {
    /// Take the first 6 values as an affine matrix.
    pub fn affine(values: &[f64]) -> Result<Self, WarpError> {
        Ok(Coefficients::Affine(take(TransformMethod::Affine, values)?))
    }

    /// Take the first 8 values as a perspective mapping.
    pub fn perspective(values: &[f64]) -> Result<Self, WarpError> {
        Ok(Coefficients::Perspective(take(TransformMethod::Perspective, values)?))
    }

    /// Affine coefficients stretching the source box `[x0, y0, x1, y1]` over `region`.
    pub fn from_extent(extent: &[f64], region: &Region) -> Result<Self, WarpError> {
        let [x0, y0, x1, y1] = take(TransformMethod::Extent, extent)?;
        let (w, h) = region_dims(region)?;

        let xs = (x1 - x0) / w;
        let ys = (y1 - y0) / h;

        Ok(Coefficients::Affine([xs, 0.0, x0, 0.0, ys, y0]))
    }

    /// Bilinear coefficients mapping the corners of `region` onto the source quad
    /// `[nw, sw, se, ne]`.
    ///
    /// The four corners map exactly; interior points are bilinearly interpolated.
    pub fn from_quad(corners: &[f64], region: &Region) -> Result<Self, WarpError> {
        let q: [f64; 8] = take(TransformMethod::Quad, corners)?;
        let (w, h) = region_dims(region)?;

        let (nw, sw, se, ne) = ((q[0], q[1]), (q[2], q[3]), (q[4], q[5]), (q[6], q[7]));
        let a_s = 1.0 / w;
        let a_t = 1.0 / h;

        Ok(Coefficients::Quad([
            nw.0,
            (ne.0 - nw.0) * a_s,
            (sw.0 - nw.0) * a_t,
            (se.0 - sw.0 - ne.0 + nw.0) * a_s * a_t,
            nw.1,
            (ne.1 - nw.1) * a_s,
            (sw.1 - nw.1) * a_t,
            (se.1 - sw.1 - ne.1 + nw.1) * a_s * a_t,
        ]))
    }

    /// Map the destination pixel `(x, y)`, relative to the region origin, to a
    /// continuous source coordinate. Samples at the pixel center.
    #[inline]
    pub fn transform(&self, x: f64, y: f64) -> (f64, f64) {
        match self {
            Coefficients::Affine(a) => affine_transform(x, y, a),
            Coefficients::Perspective(a) => perspective_transform(x, y, a),
            Coefficients::Quad(a) => quad_transform(x, y, a),
        }
    }

    /// Map a continuous destination point, without the half-pixel offset.
    #[inline]
    pub fn map_point(&self, x: f64, y: f64) -> (f64, f64) {
        match self {
            Coefficients::Affine(a) => affine_point(x, y, a),
            Coefficients::Perspective(a) => perspective_point(x, y, a),
            Coefficients::Quad(a) => quad_point(x, y, a),
        }
    }

    /// The canonical method of this set.
    pub fn method(&self) -> TransformMethod {
        match self {
            Coefficients::Affine(_) => TransformMethod::Affine,
            Coefficients::Perspective(_) => TransformMethod::Perspective,
            Coefficients::Quad(_) => TransformMethod::Quad,
        }
    }

    /// The coefficients as a flat slice.
    pub fn as_slice(&self) -> &[f64] {
        match self {
            Coefficients::Affine(a) => a.as_slice(),
            Coefficients::Perspective(a) | Coefficients::Quad(a) => a.as_slice(),
        }
    }

    /// True when the set maps every pixel center onto itself.
    pub fn is_identity(&self) -> bool {
        let expected = match self {
            Coefficients::Affine(_) => IDENTITY_AFFINE.as_slice(),
            Coefficients::Perspective(_) => IDENTITY_PERSPECTIVE.as_slice(),
            Coefficients::Quad(_) => IDENTITY_QUAD.as_slice(),
        };
        self.as_slice()
            .iter()
            .zip(expected)
            .all(|(a, b)| (a - b).abs() <= IDENTITY_EPS)
    }

    /// True when source x depends on destination x only, and source y on
    /// destination y only, both linearly.
    pub fn is_axis_aligned(&self) -> bool {
        let cross: &[usize] = match self {
            Coefficients::Affine(_) => &[1, 3],
            Coefficients::Perspective(_) => &[1, 3, 6, 7],
            Coefficients::Quad(_) => &[2, 3, 5, 7],
        };
        let a = self.as_slice();
        cross.iter().all(|&i| a[i].abs() <= IDENTITY_EPS)
    }
}

/// A transform resolved into canonical (region, coefficients) steps.
///
/// Built once per call, before any pixel work; the caller-visible method and
/// parameters are left untouched.
#[derive(Debug, Clone, PartialEq)]
pub struct TransformPlan {
    method: TransformMethod,
    steps: Vec<(Region, Coefficients)>,
}

impl TransformPlan {
    /// Resolve a method and its parameters for a destination of size `dst_size`.
    ///
    /// Non-mesh methods cover the whole destination; mesh produces one quad step per
    /// entry, in order.
    ///
    /// # Errors
    ///
    /// * [`WarpError::InvalidMethod`] if the parameters do not match the method.
    /// * [`WarpError::InvalidParameterCount`] if too few values are given.
    /// * [`WarpError::DegenerateRegion`] if an extent, quad or mesh region is empty.
    pub fn resolve(
        method: TransformMethod,
        params: &TransformParams,
        dst_size: ImageSize,
    ) -> Result<Self, WarpError> {
        let full = Region::from(dst_size);

        let steps = match (method, params) {
            (TransformMethod::Mesh, TransformParams::Mesh(mesh)) => mesh
                .entries()
                .iter()
                .map(|e| Ok((e.region, Coefficients::from_quad(&e.quad, &e.region)?)))
                .collect::<Result<Vec<_>, WarpError>>()?,
            (TransformMethod::Mesh, TransformParams::Values(_)) => {
                return Err(WarpError::InvalidMethod(
                    "mesh requires a list of regions and quads".to_string(),
                ));
            }
            (_, TransformParams::Mesh(_)) => {
                return Err(WarpError::InvalidMethod(format!(
                    "{method} does not accept mesh parameters"
                )));
            }
            (TransformMethod::Affine, TransformParams::Values(v)) => {
                vec![(full, Coefficients::affine(v)?)]
            }
            (TransformMethod::Extent, TransformParams::Values(v)) => {
                vec![(full, Coefficients::from_extent(v, &full)?)]
            }
            (TransformMethod::Perspective, TransformParams::Values(v)) => {
                vec![(full, Coefficients::perspective(v)?)]
            }
            (TransformMethod::Quad, TransformParams::Values(v)) => {
                vec![(full, Coefficients::from_quad(v, &full)?)]
            }
        };

        Ok(Self { method, steps })
    }

    /// The method the plan was resolved from.
    pub fn method(&self) -> TransformMethod {
        self.method
    }

    /// The canonical steps, in execution order.
    pub fn steps(&self) -> &[(Region, Coefficients)] {
        &self.steps
    }
}

fn take<const N: usize>(method: TransformMethod, values: &[f64]) -> Result<[f64; N], WarpError> {
    values
        .get(..N)
        .and_then(|v| v.try_into().ok())
        .ok_or(WarpError::InvalidParameterCount {
            method,
            expected: N,
            actual: values.len(),
        })
}

fn region_dims(region: &Region) -> Result<(f64, f64), WarpError> {
    if region.width() <= 0 || region.height() <= 0 {
        return Err(WarpError::DegenerateRegion(*region));
    }
    Ok((region.width() as f64, region.height() as f64))
}
