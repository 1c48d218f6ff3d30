use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;

use parallax_image::{Image, ImageSize};
use parallax_imgproc::interpolation::{grid::meshgrid_from_fn, remap, InterpolationMode};

fn bench_remap(c: &mut Criterion) {
    let mut group = c.benchmark_group("remap");

    for (width, height) in [(256usize, 224usize), (1024, 896)].iter() {
        let id = format!("{width}x{height}");

        let image = Image::<f32, 3>::from_size_val(
            ImageSize {
                width: *width,
                height: *height,
            },
            0.5,
        )
        .unwrap();

        // a gentle zoom towards the image center
        let (cx, cy) = (*width as f32 / 2.0, *height as f32 / 2.0);
        let (map_x, map_y) = meshgrid_from_fn(*width, *height, |x, y| {
            Ok((cx + (x as f32 - cx) * 0.95, cy + (y as f32 - cy) * 0.95))
        })
        .unwrap();

        let mut output = Image::<f32, 3>::from_size_val(image.size(), 0.0).unwrap();

        group.bench_function(&id, |b| {
            b.iter(|| {
                remap(
                    black_box(&image),
                    black_box(&mut output),
                    &map_x,
                    &map_y,
                    InterpolationMode::Bilinear,
                )
                .unwrap()
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_remap);
criterion_main!(benches);
