use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use swirl_image::Image;
use swirl_imgproc::{
    interpolation::InterpolationMode,
    warp::{generate_swirl_map, swirl, SwirlParams},
};

fn bench_swirl(c: &mut Criterion) {
    let mut group = c.benchmark_group("Swirl");

    for (width, height) in [(256, 224), (512, 448), (1024, 896)].iter() {
        group.throughput(criterion::Throughput::Elements((*width * *height) as u64));

        let parameter_string = format!("{}x{}", width, height);

        let image_size = [*width, *height].into();
        let image = Image::<u8, 3>::new(image_size, vec![0u8; width * height * 3]).unwrap();
        let image_f32 = image.cast::<f32>().unwrap();
        let output = Image::<f32, 3>::from_size_val(image_size, 0.0).unwrap();
        let params = SwirlParams::new(5.0, *height as f32 / 3.0);

        group.bench_with_input(
            BenchmarkId::new("generate_swirl_map", &parameter_string),
            &params,
            |b, p| b.iter(|| generate_swirl_map(black_box(p), black_box(image_size))),
        );

        for mode in [InterpolationMode::Bilinear, InterpolationMode::Bicubic] {
            group.bench_with_input(
                BenchmarkId::new(format!("swirl_{mode:?}"), &parameter_string),
                &(&image_f32, &output, params),
                |b, i| {
                    let (src, mut dst, p) = (i.0, i.1.clone(), i.2);
                    b.iter(|| {
                        swirl(
                            black_box(src),
                            black_box(&mut dst),
                            black_box(&p),
                            black_box(mode),
                        )
                    })
                },
            );
        }
    }
    group.finish();
}

criterion_group!(benches, bench_swirl);
criterion_main!(benches);
