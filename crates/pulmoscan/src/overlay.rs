//! Annotated overlay rendering.
//!
//! Surviving contours are filled into a single-channel heatmap, colourized
//! with a JET colour map, boosted, blended over the original image and
//! finally outlined.

use base64::Engine;
use image::{GrayImage, Rgb, RgbImage};
use imageproc::drawing::draw_filled_rect_mut;
use imageproc::rect::Rect;

use crate::backend::Contour;
use crate::config::OverlayConfig;
use crate::regions::fill_contour;

/// Heatmap with every contour filled at full intensity.
pub fn heatmap(width: u32, height: u32, contours: &[&Contour]) -> GrayImage {
    let mut map = GrayImage::new(width, height);
    for contour in contours {
        fill_contour(&mut map, contour, u8::MAX);
    }
    map
}

/// JET colour map entry for an 8-bit intensity (blue → cyan → yellow → red).
pub fn jet(v: u8) -> Rgb<u8> {
    let t = v as f32 / 255.0;
    let channel = |center: f32| {
        let c = (1.5 - (4.0 * t - center).abs()).clamp(0.0, 1.0);
        (c * 255.0).round() as u8
    };
    Rgb([channel(3.0), channel(2.0), channel(1.0)])
}

/// Colourize a heatmap and apply a saturating linear gain.
pub fn colorize(map: &GrayImage, gain: f32) -> RgbImage {
    let mut lut = [[0u8; 3]; 256];
    for (v, entry) in lut.iter_mut().enumerate() {
        let Rgb(rgb) = jet(v as u8);
        for (dst, src) in entry.iter_mut().zip(rgb) {
            *dst = (src as f32 * gain).abs().round().min(255.0) as u8;
        }
    }
    let (w, h) = map.dimensions();
    let mut out = RgbImage::new(w, h);
    for (dst, src) in out.pixels_mut().zip(map.pixels()) {
        *dst = Rgb(lut[src[0] as usize]);
    }
    out
}

/// Weighted per-channel blend `a·wa + b·wb`, rounded and saturated.
pub fn blend(a: &RgbImage, wa: f32, b: &RgbImage, wb: f32) -> RgbImage {
    debug_assert_eq!(a.dimensions(), b.dimensions());
    let mut out = a.clone();
    for (dst, src) in out.pixels_mut().zip(b.pixels()) {
        for (d, &s) in dst.0.iter_mut().zip(src.0.iter()) {
            *d = (*d as f32 * wa + s as f32 * wb).round().clamp(0.0, 255.0) as u8;
        }
    }
    out
}

/// Stamp a `thickness`-wide outline along each contour.
pub fn draw_outlines(img: &mut RgbImage, contours: &[&Contour], color: Rgb<u8>, thickness: u32) {
    if thickness == 0 {
        return;
    }
    let back = (thickness / 2) as i32;
    for contour in contours {
        for p in &contour.points {
            let rect = Rect::at(p[0] - back, p[1] - back).of_size(thickness, thickness);
            draw_filled_rect_mut(img, rect, color);
        }
    }
}

/// Render the full annotated overlay for `original`.
pub fn render(original: &RgbImage, contours: &[&Contour], config: &OverlayConfig) -> RgbImage {
    let (w, h) = original.dimensions();
    let colored = colorize(&heatmap(w, h, contours), config.heatmap_gain);
    let mut out = blend(original, config.image_weight, &colored, config.heatmap_weight);
    draw_outlines(
        &mut out,
        contours,
        Rgb(config.outline_rgb),
        config.outline_thickness,
    );
    out
}

/// Standard base64 text of encoded overlay bytes, for inline embedding.
pub fn to_base64(bytes: &[u8]) -> String {
    base64::engine::general_purpose::STANDARD.encode(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(x0: i32, y0: i32, side: i32) -> Contour {
        let mut pts = Vec::new();
        for x in x0..x0 + side {
            pts.push([x, y0]);
        }
        for y in y0..y0 + side {
            pts.push([x0 + side, y]);
        }
        for x in (x0 + 1..=x0 + side).rev() {
            pts.push([x, y0 + side]);
        }
        for y in (y0 + 1..=y0 + side).rev() {
            pts.push([x0, y]);
        }
        Contour::outer(pts)
    }

    #[test]
    fn jet_endpoints() {
        assert_eq!(jet(0), Rgb([0, 0, 128]));
        assert_eq!(jet(255), Rgb([128, 0, 0]));
        let mid = jet(128);
        assert!(mid[1] > 200, "mid-scale should be green-ish: {mid:?}");
    }

    #[test]
    fn gain_saturates() {
        let map = GrayImage::from_pixel(2, 2, image::Luma([0]));
        let c = colorize(&map, 1.5);
        assert_eq!(*c.get_pixel(0, 0), Rgb([0, 0, 192]));
        let c = colorize(&map, 3.0);
        assert_eq!(*c.get_pixel(0, 0), Rgb([0, 0, 255]));
    }

    #[test]
    fn blend_weights_channels() {
        let a = RgbImage::from_pixel(1, 1, Rgb([100, 200, 0]));
        let b = RgbImage::from_pixel(1, 1, Rgb([0, 100, 250]));
        let out = blend(&a, 0.6, &b, 0.4);
        assert_eq!(*out.get_pixel(0, 0), Rgb([60, 160, 100]));
    }

    #[test]
    fn heatmap_fills_contours_only() {
        let c = square(10, 10, 10);
        let map = heatmap(40, 40, &[&c]);
        assert_eq!(map.get_pixel(15, 15)[0], 255);
        assert_eq!(map.get_pixel(30, 30)[0], 0);
    }

    #[test]
    fn render_outlines_regions_and_tints_background() {
        let original = RgbImage::from_pixel(40, 40, Rgb([50, 50, 50]));
        let c = square(10, 10, 10);
        let out = render(&original, &[&c], &OverlayConfig::default());
        assert_eq!(out.dimensions(), (40, 40));
        assert_eq!(*out.get_pixel(10, 10), Rgb([255, 255, 0]));
        // Background: 0.6·50 + 0.4·jet(0)·1.5 = (30, 30, 107).
        assert_eq!(*out.get_pixel(35, 35), Rgb([30, 30, 107]));
        // Region interior: 0.6·50 + 0.4·jet(255)·1.5 = (107, 30, 30).
        assert_eq!(*out.get_pixel(15, 15), Rgb([107, 30, 30]));
    }

    #[test]
    fn base64_is_standard_alphabet() {
        assert_eq!(to_base64(&[0xFF, 0xD8, 0xFF]), "/9j/");
    }
}
