//! Binarization of the enhanced image into a candidate-region mask.
//!
//! Two masks are OR-combined: an automatic Otsu mask that adapts to overall
//! brightness, and a fixed-level mask that still catches bright opacities
//! when Otsu classifies them as background in dark images. Closing then
//! opening merges fragmented blobs and drops isolated noise pixels.

use image::{GrayImage, Luma};

use crate::backend::MorphologyOps;
use crate::config::{MorphologyConfig, ThresholdConfig};

pub const FOREGROUND: u8 = 255;

/// Otsu level of `gray`: pixels strictly above it form the bright class.
///
/// Returns `None` when fewer than two intensity levels are populated; a
/// flat image has no meaningful two-class split and produces no Otsu
/// foreground.
pub fn otsu_level(gray: &GrayImage) -> Option<u8> {
    let mut populated = [false; 256];
    for p in gray.pixels() {
        populated[p[0] as usize] = true;
    }
    if populated.iter().filter(|&&b| b).count() < 2 {
        return None;
    }
    Some(imageproc::contrast::otsu_level(gray))
}

/// Binary mask of pixels strictly brighter than `level`.
pub fn threshold_above(gray: &GrayImage, level: u8) -> GrayImage {
    let (w, h) = gray.dimensions();
    let mut out = GrayImage::new(w, h);
    for (dst, src) in out.pixels_mut().zip(gray.pixels()) {
        if src[0] > level {
            *dst = Luma([FOREGROUND]);
        }
    }
    out
}

/// Pixel-wise OR of two masks of equal size.
pub fn mask_or(a: &GrayImage, b: &GrayImage) -> GrayImage {
    debug_assert_eq!(a.dimensions(), b.dimensions());
    let mut out = a.clone();
    for (dst, src) in out.pixels_mut().zip(b.pixels()) {
        dst[0] |= src[0];
    }
    out
}

/// Combined threshold mask before morphology.
pub fn binarize(smoothed: &GrayImage, config: &ThresholdConfig) -> GrayImage {
    let fixed = threshold_above(smoothed, config.fixed_level);
    if !config.use_otsu {
        return fixed;
    }
    match otsu_level(smoothed) {
        Some(level) => {
            tracing::debug!(otsu_level = level, "automatic threshold");
            mask_or(&threshold_above(smoothed, level), &fixed)
        }
        None => {
            tracing::debug!("flat histogram, no automatic threshold");
            fixed
        }
    }
}

/// Full segmentation: binarize, then close and open with a square kernel.
pub fn segment(
    smoothed: &GrayImage,
    threshold: &ThresholdConfig,
    morphology: &MorphologyConfig,
    ops: &dyn MorphologyOps,
) -> GrayImage {
    let mask = binarize(smoothed, threshold);
    let radius = morphology.radius();
    let closed = ops.close(&mask, radius);
    ops.open(&closed, radius)
}

/// Number of foreground pixels in a mask.
pub fn foreground_count(mask: &GrayImage) -> usize {
    mask.pixels().filter(|p| p[0] != 0).count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::ImageprocBackend;

    #[test]
    fn flat_image_has_no_otsu_level() {
        let gray = GrayImage::from_pixel(16, 16, Luma([90]));
        assert_eq!(otsu_level(&gray), None);
        let mask = binarize(&gray, &ThresholdConfig::default());
        assert_eq!(foreground_count(&mask), 0);
    }

    #[test]
    fn bright_flat_image_trips_fixed_threshold() {
        let gray = GrayImage::from_pixel(16, 16, Luma([180]));
        let mask = binarize(&gray, &ThresholdConfig::default());
        assert_eq!(foreground_count(&mask), 256);
    }

    #[test]
    fn otsu_separates_bimodal_image() {
        let gray = GrayImage::from_fn(20, 20, |x, _| Luma([if x < 10 { 30 } else { 120 }]));
        let level = otsu_level(&gray).expect("two levels");
        assert!((30..120).contains(&level));
        let mask = binarize(&gray, &ThresholdConfig::default());
        // Otsu catches the 120 half even though it is below the fixed level.
        assert_eq!(foreground_count(&mask), 200);
        assert_eq!(mask.get_pixel(15, 3)[0], FOREGROUND);
        assert_eq!(mask.get_pixel(3, 3)[0], 0);
    }

    #[test]
    fn fixed_only_mode_ignores_otsu() {
        let gray = GrayImage::from_fn(20, 20, |x, _| Luma([if x < 10 { 30 } else { 120 }]));
        let cfg = ThresholdConfig {
            use_otsu: false,
            fixed_level: 150,
        };
        assert_eq!(foreground_count(&binarize(&gray, &cfg)), 0);
    }

    #[test]
    fn segmentation_drops_speckle() {
        let mut gray = GrayImage::from_pixel(60, 60, Luma([20]));
        for y in 20..40 {
            for x in 20..40 {
                gray.put_pixel(x, y, Luma([220]));
            }
        }
        gray.put_pixel(5, 5, Luma([220]));
        let mask = segment(
            &gray,
            &ThresholdConfig::default(),
            &MorphologyConfig::default(),
            &ImageprocBackend,
        );
        assert_eq!(mask.get_pixel(5, 5)[0], 0);
        assert_eq!(mask.get_pixel(30, 30)[0], FOREGROUND);
        assert_eq!(foreground_count(&mask), 400);
    }
}
