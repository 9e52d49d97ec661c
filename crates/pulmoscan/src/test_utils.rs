//! Shared synthetic-image helpers for unit tests.

use std::io::Cursor;

use image::{GrayImage, ImageFormat, Luma, Rgb, RgbImage};
use imageproc::drawing::draw_filled_circle_mut;

/// Binary mask with one filled axis-aligned square.
pub(crate) fn filled_square_mask(w: u32, h: u32, x0: u32, y0: u32, side: u32) -> GrayImage {
    let mut mask = GrayImage::new(w, h);
    for y in y0..(y0 + side).min(h) {
        for x in x0..(x0 + side).min(w) {
            mask.put_pixel(x, y, Luma([255]));
        }
    }
    mask
}

/// Uniform background with bright filled discs at the given centers.
pub(crate) fn discs_rgb(
    w: u32,
    h: u32,
    background: u8,
    foreground: u8,
    centers: &[(i32, i32)],
    radius: i32,
) -> RgbImage {
    let mut img = RgbImage::from_pixel(w, h, Rgb([background; 3]));
    for &c in centers {
        draw_filled_circle_mut(&mut img, c, radius, Rgb([foreground; 3]));
    }
    img
}

/// Lossless PNG encoding of an RGB image.
pub(crate) fn encode_png_rgb(img: &RgbImage) -> Vec<u8> {
    let mut buf = Cursor::new(Vec::new());
    img.write_to(&mut buf, ImageFormat::Png)
        .expect("png encoding of in-memory image");
    buf.into_inner()
}
