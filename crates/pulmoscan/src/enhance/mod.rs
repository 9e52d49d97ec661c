//! Grayscale conversion and local contrast enhancement.
//!
//! Radiograph intensity is low-contrast, so a global threshold on the raw
//! image misses subtle opacities. The enhancement stage equalizes contrast
//! per tile (CLAHE) and then smooths speckle with a bilateral filter that
//! keeps region boundaries sharp.

mod bilateral;
mod clahe;

use image::{GrayImage, RgbImage};

use crate::config::EnhanceConfig;

pub use bilateral::bilateral_filter;
pub use clahe::clahe;

/// Output of the enhancement stage.
#[derive(Debug, Clone)]
pub struct Enhanced {
    /// CLAHE output; used for per-region intensity measurements.
    pub equalized: GrayImage,
    /// Bilateral-filtered `equalized`; input to binarization.
    pub smoothed: GrayImage,
}

/// Convert an RGB raster to single-channel intensity (BT.601 luma).
pub fn to_grayscale(rgb: &RgbImage) -> GrayImage {
    let (w, h) = rgb.dimensions();
    let mut out = GrayImage::new(w, h);
    for (dst, src) in out.pixels_mut().zip(rgb.pixels()) {
        let [r, g, b] = src.0;
        // Fixed-point 0.299 / 0.587 / 0.114 with 14 fractional bits.
        let y = (r as u32 * 4899 + g as u32 * 9617 + b as u32 * 1868 + (1 << 13)) >> 14;
        dst.0[0] = y.min(255) as u8;
    }
    out
}

/// Run CLAHE followed by bilateral smoothing.
pub fn enhance(gray: &GrayImage, config: &EnhanceConfig) -> Enhanced {
    let equalized = clahe(gray, config.clip_limit, config.tile_grid);
    let smoothed = bilateral_filter(
        &equalized,
        config.bilateral_diameter,
        config.bilateral_sigma_color,
        config.bilateral_sigma_space,
    );
    Enhanced {
        equalized,
        smoothed,
    }
}
