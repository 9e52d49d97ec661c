//! Capability interfaces over the imaging primitives the pipeline needs.
//!
//! The analyzer never calls a vision library directly; it goes through
//! [`ImageCodec`], [`MorphologyOps`] and [`ContourFinder`]. The default
//! implementation, [`ImageprocBackend`], is built on the `image` and
//! `imageproc` crates. Tests plug in fakes to exercise scoring and
//! rendering independently of decoder or contour-tracing quirks.

mod imageproc_backend;

use image::{GrayImage, RgbImage};

use crate::config::LimitsConfig;
use crate::error::DecodeError;

pub use imageproc_backend::ImageprocBackend;

/// Border of a connected component in a binary mask.
///
/// Points are pixel coordinates in tracing order. The polygon is implicitly
/// closed (the last point connects back to the first).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Contour {
    /// Border pixels in tracing order.
    pub points: Vec<[i32; 2]>,
    /// `true` for the inner border of a hole, `false` for an outer border.
    pub is_hole: bool,
    /// Index of the enclosing contour in the same list, if any.
    pub parent: Option<usize>,
}

impl Contour {
    /// Outer border with no parent.
    pub fn outer(points: Vec<[i32; 2]>) -> Self {
        Self {
            points,
            is_hole: false,
            parent: None,
        }
    }

    /// Axis-aligned bounding box as `[x_min, y_min, x_max, y_max]` (inclusive).
    pub fn bounding_box(&self) -> Option<[i32; 4]> {
        let first = self.points.first()?;
        let mut bb = [first[0], first[1], first[0], first[1]];
        for p in &self.points[1..] {
            bb[0] = bb[0].min(p[0]);
            bb[1] = bb[1].min(p[1]);
            bb[2] = bb[2].max(p[0]);
            bb[3] = bb[3].max(p[1]);
        }
        Some(bb)
    }
}

/// Decoding of input bytes and encoding of the rendered overlay.
pub trait ImageCodec: Send + Sync {
    /// Decode compressed bytes into a 3-channel raster.
    ///
    /// Implementations should reject inputs outside `limits` with
    /// [`DecodeError::TooLarge`] before allocating the pixel buffer.
    fn decode(&self, bytes: &[u8], limits: &LimitsConfig) -> Result<RgbImage, DecodeError>;
    /// Encode a raster as JPEG with the given quality (1-100).
    fn encode_jpeg(&self, image: &RgbImage, quality: u8) -> Result<Vec<u8>, String>;
}

/// Binary morphology with a square structuring element.
///
/// Masks are 0 (background) / 255 (foreground). `radius` is the Chebyshev
/// radius, so `radius = 2` is a 5×5 kernel.
pub trait MorphologyOps: Send + Sync {
    /// Dilation followed by erosion.
    fn close(&self, mask: &GrayImage, radius: u8) -> GrayImage;
    /// Erosion followed by dilation.
    fn open(&self, mask: &GrayImage, radius: u8) -> GrayImage;
}

/// Border tracing over a binary mask, returning the full hierarchy.
pub trait ContourFinder: Send + Sync {
    /// All outer and hole borders of foreground components.
    fn find_contours(&self, mask: &GrayImage) -> Vec<Contour>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounding_box_spans_all_points() {
        let c = Contour::outer(vec![[3, 4], [10, 2], [7, 9], [1, 5]]);
        assert_eq!(c.bounding_box(), Some([1, 2, 10, 9]));
        assert_eq!(Contour::outer(Vec::new()).bounding_box(), None);
    }
}
