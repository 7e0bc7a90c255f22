use rand::Rng;
use warpkit_image::Image;
use warpkit_imgproc::{
    filter::Filter,
    parallel::ExecutionStrategy,
    warp::{
        transform, transform_into, Coefficients, MeshMap, Region, TransformMethod,
        TransformParams, WarpError,
    },
};

const FILTERS: [Filter; 7] = [
    Filter::NEAREST_NEIGHBOR,
    Filter::BOX,
    Filter::LINEAR,
    Filter::HERMITE,
    Filter::MITCHELL_NETRAVALI,
    Filter::CATMULL_ROM,
    Filter::LANCZOS,
];

fn random_image(rng: &mut impl Rng, width: usize, height: usize) -> Image<u8, 4> {
    let data = (0..width * height * 4).map(|_| rng.random::<u8>()).collect();
    Image::new([width, height].into(), data).unwrap()
}

fn pixel(image: &Image<u8, 4>, x: usize, y: usize) -> [u8; 4] {
    let i = (y * image.width() + x) * 4;
    let p = &image.as_slice()[i..i + 4];
    [p[0], p[1], p[2], p[3]]
}

#[test]
fn identity_affine_is_clone_for_every_filter() -> Result<(), WarpError> {
    let mut rng = rand::rng();
    let src = random_image(&mut rng, 13, 9);

    for filter in FILTERS.iter() {
        let dst = transform(
            &src,
            src.size(),
            TransformMethod::Affine,
            &[1.0, 0.0, 0.0, 0.0, 1.0, 0.0].into(),
            filter,
            None,
        )?;
        assert_eq!(dst, src, "{filter:?}");
    }
    Ok(())
}

#[test]
fn full_extent_is_identity() -> Result<(), WarpError> {
    let mut rng = rand::rng();
    for _ in 0..5 {
        let (w, h) = (rng.random_range(1..40), rng.random_range(1..40));
        let src = random_image(&mut rng, w, h);
        let dst = transform(
            &src,
            src.size(),
            TransformMethod::Extent,
            &[0.0, 0.0, w as f64, h as f64].into(),
            &Filter::LANCZOS,
            None,
        )?;
        assert_eq!(dst, src);
    }
    Ok(())
}

#[test]
fn full_quad_is_identity() -> Result<(), WarpError> {
    let mut rng = rand::rng();
    for _ in 0..5 {
        let (w, h) = (rng.random_range(1..40), rng.random_range(1..40));
        let (wf, hf) = (w as f64, h as f64);
        let src = random_image(&mut rng, w, h);
        let dst = transform(
            &src,
            src.size(),
            TransformMethod::Quad,
            &[0.0, 0.0, 0.0, hf, wf, hf, wf, 0.0].into(),
            &Filter::CATMULL_ROM,
            None,
        )?;
        assert_eq!(dst, src, "{w}x{h}");
    }
    Ok(())
}

#[test]
fn nearest_samples_rounded_coordinate() -> Result<(), WarpError> {
    let mut rng = rand::rng();
    let src = random_image(&mut rng, 17, 11);

    for _ in 0..5 {
        let angle: f64 = rng.random_range(-0.8..0.8);
        let scale: f64 = rng.random_range(0.5..2.0);
        let (sin, cos) = angle.sin_cos();
        let params = [
            scale * cos,
            -scale * sin,
            rng.random_range(-4.0..4.0),
            scale * sin,
            scale * cos,
            rng.random_range(-4.0..4.0),
        ];

        let dst = transform(
            &src,
            [15, 12].into(),
            TransformMethod::Affine,
            &params.into(),
            &Filter::NEAREST_NEIGHBOR,
            None,
        )?;

        let coeffs = Coefficients::Affine(params);
        for y in 0..dst.height() {
            for x in 0..dst.width() {
                // the index space center (xx - 0.5, yy - 0.5) rounded half up
                let (xx, yy) = coeffs.transform(x as f64, y as f64);
                let (sx, sy) = (xx.floor(), yy.floor());
                let inside =
                    sx >= 0.0 && sy >= 0.0 && sx < src.width() as f64 && sy < src.height() as f64;
                let expected = if inside {
                    pixel(&src, sx as usize, sy as usize)
                } else {
                    [0; 4]
                };
                assert_eq!(pixel(&dst, x, y), expected, "({x}, {y})");
            }
        }
    }
    Ok(())
}

#[test]
fn solid_color_survives_every_filter() -> Result<(), WarpError> {
    let color = [37, 180, 90, 255];
    let src = Image::<u8, 4>::new([20, 16].into(), color.repeat(20 * 16))?;
    let fill = [1, 2, 3, 4];

    let methods = [
        (
            TransformMethod::Affine,
            TransformParams::from([0.9, 0.3, -2.0, -0.25, 1.2, 1.0]),
        ),
        (
            TransformMethod::Perspective,
            TransformParams::from([1.1, 0.1, 0.5, 0.05, 0.9, 0.0, 0.01, 0.005]),
        ),
        (
            TransformMethod::Quad,
            TransformParams::from([2.0, 1.0, 0.0, 15.0, 19.0, 16.0, 18.0, 3.0]),
        ),
    ];

    for filter in FILTERS.iter() {
        for (method, params) in methods.iter() {
            let dst = transform(&src, [12, 14].into(), *method, params, filter, Some(fill))?;
            for px in dst.as_slice().chunks_exact(4) {
                assert!(px == color || px == fill, "{method} {filter:?}: {px:?}");
            }
        }
    }
    Ok(())
}

#[test]
fn mesh_tiles_match_per_region_transforms() -> Result<(), WarpError> {
    let mut rng = rand::rng();
    let src = random_image(&mut rng, 24, 18);
    let size = [10, 8];

    let tiles = [
        (Region::new(0, 0, 5, 4), [0.0, 0.0, 1.0, 9.0, 13.0, 10.0, 12.0, 0.5]),
        (Region::new(5, 0, 10, 4), [12.0, 0.5, 13.0, 10.0, 24.0, 9.0, 23.0, 0.0]),
        (Region::new(0, 4, 5, 8), [1.0, 9.0, 0.0, 18.0, 12.0, 18.0, 13.0, 10.0]),
        (Region::new(5, 4, 10, 8), [13.0, 10.0, 12.0, 18.0, 24.0, 17.0, 24.0, 9.0]),
    ];
    let mesh: MeshMap = tiles.iter().copied().collect();

    for filter in [Filter::NEAREST_NEIGHBOR, Filter::LINEAR, Filter::LANCZOS] {
        let tiled = transform(
            &src,
            size.into(),
            TransformMethod::Mesh,
            &mesh.clone().into(),
            &filter,
            None,
        )?;

        let mut composite = Image::<u8, 4>::from_size_val(size.into(), 0)?;
        for (region, quad) in tiles.iter() {
            let single = MeshMap::new().with(*region, *quad);
            let mut dst = Image::<u8, 4>::from_size_val(size.into(), 0)?;
            transform_into(
                &src,
                &mut dst,
                TransformMethod::Mesh,
                &single.into(),
                &filter,
                None,
                ExecutionStrategy::Serial,
            )?;

            let stride = composite.stride();
            let bytes = region.x0 as usize * 4..region.x1 as usize * 4;
            for y in region.y0 as usize..region.y1 as usize {
                let row = y * stride;
                composite.as_slice_mut()[row + bytes.start..row + bytes.end]
                    .copy_from_slice(&dst.as_slice()[row + bytes.start..row + bytes.end]);
            }
        }

        assert_eq!(tiled, composite, "{filter:?}");
    }
    Ok(())
}

#[test]
fn downscale_averages_blocks() -> Result<(), WarpError> {
    // 2x2 blocks of opaque gray levels, averaged by the box filter
    let levels = [0u8, 100, 200, 60];
    let mut data = Vec::new();
    for y in 0..4 {
        for x in 0..4 {
            let v = levels[(y % 2) * 2 + (x % 2)];
            data.extend_from_slice(&[v, v, v, 255]);
        }
    }
    let src = Image::<u8, 4>::new([4, 4].into(), data)?;

    let dst = transform(
        &src,
        [2, 2].into(),
        TransformMethod::Extent,
        &[0.0, 0.0, 4.0, 4.0].into(),
        &Filter::BOX,
        None,
    )?;
    for px in dst.as_slice().chunks_exact(4) {
        assert_eq!(px, [90, 90, 90, 255]);
    }
    Ok(())
}
