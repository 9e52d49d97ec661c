use std::io::Cursor;

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use image::{GrayImage, ImageFormat, Luma, Rgb, RgbImage};
use imageproc::drawing::draw_filled_circle_mut;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use pulmoscan::enhance::{bilateral_filter, clahe};
use pulmoscan::Analyzer;

fn noisy_gray(w: u32, h: u32, seed: u64) -> GrayImage {
    let mut rng = StdRng::seed_from_u64(seed);
    GrayImage::from_fn(w, h, |x, y| {
        let base = ((x + y) % 128) as u8;
        Luma([base.saturating_add(rng.gen_range(0..64))])
    })
}

fn synthetic_radiograph(w: u32, h: u32) -> Vec<u8> {
    let mut img = RgbImage::from_pixel(w, h, Rgb([30, 30, 30]));
    for (i, &(cx, cy)) in [(160, 200), (350, 260), (240, 380)].iter().enumerate() {
        let level = 170 + 30 * i as u8;
        draw_filled_circle_mut(&mut img, (cx, cy), 28, Rgb([level; 3]));
    }
    let mut buf = Cursor::new(Vec::new());
    img.write_to(&mut buf, ImageFormat::Png)
        .expect("png encoding of in-memory image");
    buf.into_inner()
}

fn bench_clahe(c: &mut Criterion) {
    let gray = noisy_gray(512, 512, 1);
    c.bench_function("clahe_512", |b| {
        b.iter(|| clahe(black_box(&gray), 3.0, [8, 8]))
    });
}

fn bench_bilateral(c: &mut Criterion) {
    let gray = noisy_gray(512, 512, 2);
    c.bench_function("bilateral_512_d9", |b| {
        b.iter(|| bilateral_filter(black_box(&gray), 9, 75.0, 75.0))
    });
}

fn bench_analyze(c: &mut Criterion) {
    let bytes = synthetic_radiograph(512, 512);
    let analyzer = Analyzer::new();
    c.bench_function("analyze_512", |b| {
        b.iter(|| analyzer.analyze(black_box(&bytes)).expect("decodable"))
    });
}

criterion_group!(benches, bench_clahe, bench_bilateral, bench_analyze);
criterion_main!(benches);
