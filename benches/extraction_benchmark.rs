use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use sgli_point_processor::acquisition::MockRasterGenerator;
use sgli_point_processor::models::{Coordinate, RasterProduct};
use sgli_point_processor::processors::{nearest_pixel, Extractor};

fn benchmark_nearest_pixel(c: &mut Criterion) {
    let mut group = c.benchmark_group("nearest_pixel");
    let center = Coordinate::new(32.8032, 130.7075);
    let query = Coordinate::new(32.91, 130.52);

    for size in [100, 500, 1000].iter() {
        let raster = MockRasterGenerator::with_seed(1)
            .with_grid_size(*size)
            .generate(center, RasterProduct::Lst)
            .unwrap();

        group.bench_with_input(BenchmarkId::new("grid", size), &raster, |b, raster| {
            b.iter(|| nearest_pixel(black_box(raster), black_box(&query)))
        });
    }

    group.finish();
}

fn benchmark_extraction(c: &mut Criterion) {
    let center = Coordinate::new(32.8032, 130.7075);
    let raster = MockRasterGenerator::with_seed(1)
        .generate(center, RasterProduct::Lst)
        .unwrap();
    let extractor = Extractor::new();

    c.bench_function("extract_lst_100x100", |b| {
        b.iter(|| extractor.extract(black_box(&raster), black_box(&center), RasterProduct::Lst))
    });
}

fn benchmark_mock_generation(c: &mut Criterion) {
    let center = Coordinate::new(32.8032, 130.7075);
    let mut generator = MockRasterGenerator::with_seed(7);

    c.bench_function("generate_mock_ndvi_100x100", |b| {
        b.iter(|| generator.generate(black_box(center), RasterProduct::Ndvi))
    });
}

criterion_group!(
    benches,
    benchmark_nearest_pixel,
    benchmark_extraction,
    benchmark_mock_generation
);
criterion_main!(benches);
