use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use std::hint::black_box;
use pixmap::{apply_ops, Kernel, Offset, Operation, OutputFormat, Pixel, Raster, SaveOptions};

fn create_test_image(width: u32, height: u32) -> Raster {
    Raster::from_fn(width, height, |row, col| {
        Pixel::new((col % 256) as u8, (row % 256) as u8, ((row + col) % 256) as u8)
    })
}

fn bench_convolution(c: &mut Criterion) {
    let img = create_test_image(256, 256);
    let mut group = c.benchmark_group("convolve");
    group.bench_function("sobel 256x256", |b| b.iter(|| black_box(&img).sobel()));
    for sigma in [1.0f32, 2.0] {
        group.bench_with_input(BenchmarkId::new("gaussian_blur", sigma), &sigma, |b, &s| {
            b.iter(|| black_box(&img).gaussian_blur(s))
        });
    }
    let box3 = Kernel::new(3, vec![1.0 / 9.0; 9]).unwrap();
    group.bench_function("box3 raw", |b| b.iter(|| black_box(&img).convolve(&box3)));
    group.finish();
}

fn bench_resize(c: &mut Criterion) {
    let img = create_test_image(512, 512);
    let mut group = c.benchmark_group("resize");
    for (w, h) in [(256, 256), (1024, 1024)] {
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{w}x{h}")),
            &(w, h),
            |b, &(w, h)| b.iter(|| black_box(&img).resize(w, h)),
        );
    }
    group.finish();
}

fn bench_pointwise(c: &mut Criterion) {
    let img = create_test_image(512, 512);
    c.bench_function("grayscale 512x512", |b| b.iter(|| black_box(&img).grayscale()));
    c.bench_function("gamma 512x512", |b| b.iter(|| black_box(&img).gamma_correct(2.2)));
    c.bench_function("color_replace 512x512", |b| {
        b.iter(|| black_box(&img).color_replace(Pixel::BLACK, Pixel::WHITE, 40))
    });
}

fn bench_pipeline(c: &mut Criterion) {
    let img = create_test_image(256, 256);
    let ops = vec![
        Operation::Grayscale,
        Operation::Halftone {
            r: Offset::new(2, 0),
            g: Offset::ZERO,
            b: Offset::new(0, 2),
        },
        Operation::Resize {
            width: 256,
            height: 256,
        },
    ];
    c.bench_function("halftone pipeline 256x256", |b| {
        b.iter(|| apply_ops(black_box(&img), &ops).unwrap())
    });
}

fn bench_encode(c: &mut Criterion) {
    let img = create_test_image(256, 256);
    let options = SaveOptions::default();
    let mut group = c.benchmark_group("encode");
    for format in [OutputFormat::Png, OutputFormat::Jpeg, OutputFormat::Bmp] {
        group.bench_with_input(BenchmarkId::from_parameter(format.as_str()), &format, |b, &f| {
            b.iter(|| black_box(&img).encode(f, &options).unwrap())
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_convolution,
    bench_resize,
    bench_pointwise,
    bench_pipeline,
    bench_encode
);
criterion_main!(benches);
