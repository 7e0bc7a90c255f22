//! Resampling filters.
//!
//! The warp engine only needs a kernel function and its support radius, so any type
//! implementing [`ResampleFilter`] can drive it. [`Filter`] bundles a plain function
//! pointer with its support and ships the common kernels as constants.

use std::f64::consts::PI;

/// A resampling kernel with a finite support radius.
///
/// A support of `0.0` means no convolution: the engine samples the nearest source
/// pixel directly.
pub trait ResampleFilter: Sync {
    /// Evaluate the kernel at `x`, in units of source samples.
    fn kernel(&self, x: f64) -> f64;

    /// Half-width of the non-zero region of the kernel.
    fn support(&self) -> f64;
}

/// A resampling filter backed by a function pointer.
///
/// # Example
///
/// ```
/// use warpkit_imgproc::filter::{Filter, ResampleFilter};
///
/// let triangle = Filter::new(|x| (1.0 - x.abs()).max(0.0), 1.0);
/// assert_eq!(triangle.kernel(0.5), 0.5);
/// assert_eq!(triangle.support(), Filter::LINEAR.support());
/// ```
#[derive(Clone, Copy)]
pub struct Filter {
    /// The kernel function.
    pub kernel: fn(f64) -> f64,
    /// The support radius.
    pub support: f64,
}

impl std::fmt::Debug for Filter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Filter")
            .field("support", &self.support)
            .finish_non_exhaustive()
    }
}

impl ResampleFilter for Filter {
    #[inline]
    fn kernel(&self, x: f64) -> f64 {
        (self.kernel)(x)
    }

    #[inline]
    fn support(&self) -> f64 {
        self.support
    }
}

impl<F: ResampleFilter + ?Sized> ResampleFilter for &F {
    fn kernel(&self, x: f64) -> f64 {
        (**self).kernel(x)
    }

    fn support(&self) -> f64 {
        (**self).support()
    }
}

impl Filter {
    /// Nearest neighbor sampling, no convolution.
    pub const NEAREST_NEIGHBOR: Filter = Filter {
        kernel: box_kernel,
        support: 0.0,
    };

    /// Box filter, averages the source pixels covered by the destination pixel.
    pub const BOX: Filter = Filter {
        kernel: box_kernel,
        support: 0.5,
    };

    /// Linear (triangle, tent) filter.
    pub const LINEAR: Filter = Filter {
        kernel: linear,
        support: 1.0,
    };

    /// Hermite cubic, a smooth filter without overshoot.
    pub const HERMITE: Filter = Filter {
        kernel: hermite,
        support: 1.0,
    };

    /// Mitchell-Netravali cubic with B = C = 1/3.
    pub const MITCHELL_NETRAVALI: Filter = Filter {
        kernel: mitchell_netravali,
        support: 2.0,
    };

    /// Catmull-Rom cubic (B = 0, C = 0.5), sharp and interpolating.
    pub const CATMULL_ROM: Filter = Filter {
        kernel: catmull_rom,
        support: 2.0,
    };

    /// Lanczos windowed sinc with a = 3.
    pub const LANCZOS: Filter = Filter {
        kernel: lanczos3,
        support: 3.0,
    };

    /// Create a filter from a kernel function and its support radius.
    pub const fn new(kernel: fn(f64) -> f64, support: f64) -> Self {
        Self { kernel, support }
    }

    /// Look up one of the built-in filters by name.
    ///
    /// Accepted names are `nearest`, `box`, `linear`, `hermite`, `mitchell`,
    /// `catmullrom` and `lanczos`.
    pub fn from_name(name: &str) -> Option<Filter> {
        match name.to_ascii_lowercase().as_str() {
            "nearest" | "nearest_neighbor" => Some(Filter::NEAREST_NEIGHBOR),
            "box" => Some(Filter::BOX),
            "linear" | "bilinear" | "triangle" => Some(Filter::LINEAR),
            "hermite" => Some(Filter::HERMITE),
            "mitchell" | "mitchell_netravali" => Some(Filter::MITCHELL_NETRAVALI),
            "catmullrom" | "catmull_rom" | "bicubic" => Some(Filter::CATMULL_ROM),
            "lanczos" | "lanczos3" => Some(Filter::LANCZOS),
            _ => None,
        }
    }
}

fn box_kernel(x: f64) -> f64 {
    let x = x.abs();
    if x <= 0.5 {
        1.0
    } else {
        0.0
    }
}

fn linear(x: f64) -> f64 {
    let x = x.abs();
    if x < 1.0 {
        1.0 - x
    } else {
        0.0
    }
}

fn hermite(x: f64) -> f64 {
    let x = x.abs();
    if x < 1.0 {
        (2.0 * x - 3.0) * x * x + 1.0
    } else {
        0.0
    }
}

// generic Mitchell-Netravali family, see "Reconstruction Filters in Computer Graphics"
#[inline]
fn bc_cubic(x: f64, b: f64, c: f64) -> f64 {
    let x = x.abs();
    if x < 1.0 {
        ((12.0 - 9.0 * b - 6.0 * c) * x * x * x
            + (-18.0 + 12.0 * b + 6.0 * c) * x * x
            + (6.0 - 2.0 * b))
            / 6.0
    } else if x < 2.0 {
        ((-b - 6.0 * c) * x * x * x
            + (6.0 * b + 30.0 * c) * x * x
            + (-12.0 * b - 48.0 * c) * x
            + (8.0 * b + 24.0 * c))
            / 6.0
    } else {
        0.0
    }
}

fn mitchell_netravali(x: f64) -> f64 {
    bc_cubic(x, 1.0 / 3.0, 1.0 / 3.0)
}

fn catmull_rom(x: f64) -> f64 {
    bc_cubic(x, 0.0, 0.5)
}

fn sinc(x: f64) -> f64 {
    if x == 0.0 {
        1.0
    } else {
        let pi_x = PI * x;
        pi_x.sin() / pi_x
    }
}

fn lanczos3(x: f64) -> f64 {
    if x.abs() < 3.0 {
        sinc(x) * sinc(x / 3.0)
    } else {
        0.0
    }
}
