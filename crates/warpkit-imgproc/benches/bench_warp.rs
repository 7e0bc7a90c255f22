use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use std::hint::black_box;

use warpkit_image::Image;
use warpkit_imgproc::{
    filter::Filter,
    parallel::ExecutionStrategy,
    warp::{transform_into, TransformMethod, TransformParams},
};

fn source(width: usize, height: usize) -> Image<u8, 4> {
    let data = (0..width * height * 4).map(|i| (i % 251) as u8).collect();
    Image::new([width, height].into(), data).unwrap()
}

fn bench_warp_extent(c: &mut Criterion) {
    let mut group = c.benchmark_group("WarpExtent");

    for (width, height) in [(256, 224), (512, 448), (1024, 896)].iter() {
        group.throughput(criterion::Throughput::Elements((*width * *height) as u64));

        let parameter_string = format!("{}x{}", width, height);

        let src = source(*width, *height);
        let dst_size = [*width / 2, *height / 2].into();
        let output = Image::<u8, 4>::from_size_val(dst_size, 0).unwrap();
        let params = TransformParams::from([0.0, 0.0, *width as f64, *height as f64]);

        for (name, filter) in [("linear", Filter::LINEAR), ("lanczos", Filter::LANCZOS)] {
            group.bench_with_input(
                BenchmarkId::new(name, &parameter_string),
                &(&src, &output, &params),
                |b, i| {
                    let (src, mut dst, params) = (i.0, i.1.clone(), i.2);
                    b.iter(|| {
                        transform_into(
                            black_box(src),
                            black_box(&mut dst),
                            TransformMethod::Extent,
                            black_box(params),
                            &filter,
                            None,
                            ExecutionStrategy::ParallelRows,
                        )
                    })
                },
            );
        }
    }
    group.finish();
}

fn bench_warp_affine(c: &mut Criterion) {
    let mut group = c.benchmark_group("WarpAffine");

    for (width, height) in [(256, 224), (512, 448), (1024, 896)].iter() {
        group.throughput(criterion::Throughput::Elements((*width * *height) as u64));

        let parameter_string = format!("{}x{}", width, height);

        let src = source(*width, *height);
        let output = Image::<u8, 4>::from_size_val(src.size(), 0).unwrap();

        // 30 degree rotation about the image center
        let (sin, cos) = 30f64.to_radians().sin_cos();
        let (cx, cy) = (*width as f64 / 2.0, *height as f64 / 2.0);
        let params = TransformParams::from([
            cos,
            -sin,
            cx - cos * cx + sin * cy,
            sin,
            cos,
            cy - sin * cx - cos * cy,
        ]);

        for strategy in [ExecutionStrategy::Serial, ExecutionStrategy::ParallelRows] {
            group.bench_with_input(
                BenchmarkId::new(format!("{strategy:?}"), &parameter_string),
                &(&src, &output, &params),
                |b, i| {
                    let (src, mut dst, params) = (i.0, i.1.clone(), i.2);
                    b.iter(|| {
                        transform_into(
                            black_box(src),
                            black_box(&mut dst),
                            TransformMethod::Affine,
                            black_box(params),
                            &Filter::LINEAR,
                            Some([0, 0, 0, 255]),
                            strategy,
                        )
                    })
                },
            );
        }
    }
    group.finish();
}

fn bench_warp_perspective(c: &mut Criterion) {
    let mut group = c.benchmark_group("WarpPerspective");

    for (width, height) in [(256, 224), (512, 448), (1024, 896)].iter() {
        group.throughput(criterion::Throughput::Elements((*width * *height) as u64));

        let parameter_string = format!("{}x{}", width, height);

        let src = source(*width, *height);
        let output = Image::<u8, 4>::from_size_val(src.size(), 0).unwrap();
        let params = TransformParams::from([1.0, 0.1, 0.0, 0.05, 1.0, 0.0, 2e-4, 1e-4]);

        group.bench_with_input(
            BenchmarkId::new("catmull_rom", &parameter_string),
            &(&src, &output, &params),
            |b, i| {
                let (src, mut dst, params) = (i.0, i.1.clone(), i.2);
                b.iter(|| {
                    transform_into(
                        black_box(src),
                        black_box(&mut dst),
                        TransformMethod::Perspective,
                        black_box(params),
                        &Filter::CATMULL_ROM,
                        None,
                        ExecutionStrategy::ParallelRows,
                    )
                })
            },
        );
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_warp_extent,
    bench_warp_affine,
    bench_warp_perspective
);
criterion_main!(benches);
