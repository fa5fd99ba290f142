//! Benchmarks for connected-component labelling and cropping

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use image::{Rgba, RgbaImage};
use wardrobe_vision::{crop_to_mask, BinaryMask};

/// A mask with two disjoint blobs, the shape merged shoe masks take
fn two_blob_mask(width: u32, height: u32) -> BinaryMask {
    let mut mask = BinaryMask::zeros((width, height));
    let mut paint = |x0: u32, y0: u32, x1: u32, y1: u32| {
        for y in y0..=y1 {
            for x in x0..=x1 {
                mask.data[(y as usize) * (width as usize) + (x as usize)] = 1;
            }
        }
    };
    paint(width / 10, height / 2, width / 4, height - height / 8);
    paint(width / 2, height / 2, width - width / 4, height - height / 10);
    mask
}

fn bench_crop_to_mask(c: &mut Criterion) {
    let mut group = c.benchmark_group("crop_to_mask");

    for size in [128_u32, 512_u32] {
        let image = RgbaImage::from_pixel(size, size, Rgba([128, 128, 128, 255]));
        let mask = two_blob_mask(size, size);

        group.bench_function(format!("two_blobs_{size}x{size}"), |b| {
            b.iter(|| crop_to_mask(black_box(&image), black_box(&mask), black_box(10)));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_crop_to_mask);
criterion_main!(benches);
