//! Synthetic radiograph-like images for integration tests.

#![allow(dead_code)]

use std::io::Cursor;

use image::{ImageFormat, Rgb, RgbImage};
use imageproc::drawing::{draw_filled_circle_mut, draw_filled_rect_mut};
use imageproc::rect::Rect;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Uniform gray image.
pub fn solid(w: u32, h: u32, level: u8) -> RgbImage {
    RgbImage::from_pixel(w, h, Rgb([level; 3]))
}

/// Dark background with bright filled discs.
pub fn discs(w: u32, h: u32, centers: &[(i32, i32)], radius: i32) -> RgbImage {
    let mut img = solid(w, h, 20);
    for &c in centers {
        draw_filled_circle_mut(&mut img, c, radius, Rgb([220; 3]));
    }
    img
}

/// Dark background with random bright rectangles and per-pixel noise.
pub fn random_blobs(w: u32, h: u32, seed: u64) -> RgbImage {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut img = RgbImage::new(w, h);
    for p in img.pixels_mut() {
        let v = rng.gen_range(0..60u8);
        *p = Rgb([v; 3]);
    }
    let n = rng.gen_range(0..6);
    for _ in 0..n {
        let x = rng.gen_range(0..w as i32 - 10);
        let y = rng.gen_range(0..h as i32 - 10);
        let bw = rng.gen_range(5..(w / 3).max(6));
        let bh = rng.gen_range(5..(h / 3).max(6));
        let level = rng.gen_range(120..=255u8);
        draw_filled_rect_mut(&mut img, Rect::at(x, y).of_size(bw, bh), Rgb([level; 3]));
    }
    img
}

/// PNG bytes of an RGB image.
pub fn png_bytes(img: &RgbImage) -> Vec<u8> {
    let mut buf = Cursor::new(Vec::new());
    img.write_to(&mut buf, ImageFormat::Png)
        .expect("png encoding of in-memory image");
    buf.into_inner()
}

/// JPEG bytes of an RGB image.
pub fn jpeg_bytes(img: &RgbImage) -> Vec<u8> {
    let mut buf = Cursor::new(Vec::new());
    img.write_to(&mut buf, ImageFormat::Jpeg)
        .expect("jpeg encoding of in-memory image");
    buf.into_inner()
}
