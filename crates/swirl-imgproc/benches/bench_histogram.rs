use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::Rng;

use swirl_image::Image;
use swirl_imgproc::histogram::{
    compare_histograms, compute_histogram, normalize_histogram, HistogramComparison,
    HistogramNorm,
};

fn bench_histogram(c: &mut Criterion) {
    let mut group = c.benchmark_group("Histogram");
    let mut rng = rand::rng();

    for (width, height) in [(287, 392), (640, 480), (1920, 1080)].iter() {
        group.throughput(criterion::Throughput::Elements((*width * *height) as u64));

        let parameter_string = format!("{}x{}", width, height);

        let data = (0..width * height).map(|_| rng.random::<u8>()).collect();
        let image = Image::<u8, 1>::new([*width, *height].into(), data).unwrap();

        group.bench_with_input(
            BenchmarkId::new("compute_histogram", &parameter_string),
            &image,
            |b, i| {
                b.iter(|| {
                    let mut hist = vec![0; 256];
                    compute_histogram(black_box(i), &mut hist, 256).unwrap();
                    hist
                })
            },
        );
    }

    let a = normalize_histogram(&(0..256).collect::<Vec<_>>(), HistogramNorm::L2);
    let b = normalize_histogram(&(0..256).rev().collect::<Vec<_>>(), HistogramNorm::L2);
    group.bench_function("compare_correlation", |bench| {
        bench.iter(|| {
            compare_histograms(black_box(&a), black_box(&b), HistogramComparison::Correlation)
        })
    });

    group.finish();
}

criterion_group!(benches, bench_histogram);
criterion_main!(benches);
