//! Edge-preserving bilateral smoothing.

use image::{GrayImage, Luma};

/// Bilateral filter over a circular window of the given diameter.
///
/// Each output pixel is the average of its neighbours weighted by
/// `exp(-r² / 2σs²) · exp(-Δ² / 2σc²)`, where `r` is the spatial distance
/// and `Δ` the intensity difference to the centre pixel. Pixels outside the
/// image replicate the nearest border pixel.
pub fn bilateral_filter(
    gray: &GrayImage,
    diameter: u32,
    sigma_color: f32,
    sigma_space: f32,
) -> GrayImage {
    let (w, h) = gray.dimensions();
    let radius = (diameter / 2) as i32;
    if w == 0 || h == 0 || radius == 0 {
        return gray.clone();
    }

    let sigma_color = if sigma_color > 0.0 { sigma_color } else { 1.0 };
    let sigma_space = if sigma_space > 0.0 { sigma_space } else { 1.0 };
    let color_coeff = -0.5 / (sigma_color * sigma_color);
    let space_coeff = -0.5 / (sigma_space * sigma_space);

    let color_weight: Vec<f32> = (0..256)
        .map(|d| ((d * d) as f32 * color_coeff).exp())
        .collect();

    let mut kernel: Vec<(i32, i32, f32)> = Vec::new();
    for dy in -radius..=radius {
        for dx in -radius..=radius {
            let r2 = (dx * dx + dy * dy) as f32;
            if r2.sqrt() > radius as f32 {
                continue;
            }
            kernel.push((dx, dy, (r2 * space_coeff).exp()));
        }
    }

    let src = gray.as_raw();
    let stride = w as usize;
    let (max_x, max_y) = (w as i32 - 1, h as i32 - 1);
    let mut out = GrayImage::new(w, h);

    for y in 0..h as i32 {
        for x in 0..w as i32 {
            let center = src[y as usize * stride + x as usize] as i32;
            let mut sum = 0.0f32;
            let mut wsum = 0.0f32;
            for &(dx, dy, ws) in &kernel {
                let sx = (x + dx).clamp(0, max_x) as usize;
                let sy = (y + dy).clamp(0, max_y) as usize;
                let v = src[sy * stride + sx] as i32;
                let wgt = ws * color_weight[(v - center).unsigned_abs() as usize];
                sum += wgt * v as f32;
                wsum += wgt;
            }
            let res = (sum / wsum).round().clamp(0.0, 255.0) as u8;
            out.put_pixel(x as u32, y as u32, Luma([res]));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uniform_image_is_fixed_point() {
        let gray = GrayImage::from_pixel(20, 20, Luma([137]));
        assert_eq!(bilateral_filter(&gray, 9, 75.0, 75.0), gray);
    }

    #[test]
    fn keeps_strong_step_edges() {
        let gray = GrayImage::from_fn(40, 10, |x, _| Luma([if x < 20 { 20 } else { 230 }]));
        let out = bilateral_filter(&gray, 9, 30.0, 75.0);
        assert!(out.get_pixel(18, 5)[0] < 40);
        assert!(out.get_pixel(21, 5)[0] > 210);
    }

    #[test]
    fn smooths_small_speckle() {
        let mut gray = GrayImage::from_pixel(21, 21, Luma([100]));
        gray.put_pixel(10, 10, Luma([130]));
        let out = bilateral_filter(&gray, 9, 75.0, 75.0);
        let v = out.get_pixel(10, 10)[0];
        assert!(v < 115, "speckle kept at {v}");
    }

    #[test]
    fn zero_diameter_is_identity() {
        let gray = GrayImage::from_fn(8, 8, |x, y| Luma([(x * 30 + y) as u8]));
        assert_eq!(bilateral_filter(&gray, 1, 75.0, 75.0), gray);
    }
}
