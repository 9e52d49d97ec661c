use std::io::Cursor;

use image::codecs::jpeg::JpegEncoder;
use image::{GrayImage, ImageReader, RgbImage};
use imageproc::contours::BorderType;
use imageproc::distance_transform::Norm;

use super::{Contour, ContourFinder, ImageCodec, MorphologyOps};
use crate::config::LimitsConfig;
use crate::error::DecodeError;

/// Default backend: `image` for codecs, `imageproc` for morphology and
/// Suzuki-Abe border following.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageprocBackend;

impl ImageCodec for ImageprocBackend {
    fn decode(&self, bytes: &[u8], limits: &LimitsConfig) -> Result<RgbImage, DecodeError> {
        if bytes.is_empty() {
            return Err(DecodeError::Empty);
        }
        let malformed = |e: image::ImageError| DecodeError::Malformed(e.to_string());
        let reader = || {
            ImageReader::new(Cursor::new(bytes))
                .with_guessed_format()
                .map_err(|e| DecodeError::Malformed(e.to_string()))
        };

        // Header only; nothing is allocated for pixels yet.
        let (width, height) = reader()?.into_dimensions().map_err(malformed)?;
        if width == 0 || height == 0 {
            return Err(DecodeError::ZeroSized);
        }
        if !limits.admits(width, height) {
            return Err(DecodeError::TooLarge { width, height });
        }

        let mut decoder_limits = image::Limits::default();
        decoder_limits.max_image_width = Some(limits.max_dimension);
        decoder_limits.max_image_height = Some(limits.max_dimension);
        // Widest native layout is 16-bit RGBA.
        decoder_limits.max_alloc = Some(limits.max_pixels.saturating_mul(8));

        let mut reader = reader()?;
        reader.limits(decoder_limits);
        let img = reader.decode().map_err(|e| match e {
            image::ImageError::Limits(_) => DecodeError::TooLarge { width, height },
            other => malformed(other),
        })?;
        Ok(img.to_rgb8())
    }

    fn encode_jpeg(&self, image: &RgbImage, quality: u8) -> Result<Vec<u8>, String> {
        let mut buf = Vec::new();
        let mut encoder = JpegEncoder::new_with_quality(&mut buf, quality.clamp(1, 100));
        encoder.encode_image(image).map_err(|e| e.to_string())?;
        Ok(buf)
    }
}

impl MorphologyOps for ImageprocBackend {
    fn close(&self, mask: &GrayImage, radius: u8) -> GrayImage {
        if radius == 0 {
            return mask.clone();
        }
        imageproc::morphology::close(mask, Norm::LInf, radius)
    }

    fn open(&self, mask: &GrayImage, radius: u8) -> GrayImage {
        if radius == 0 {
            return mask.clone();
        }
        imageproc::morphology::open(mask, Norm::LInf, radius)
    }
}

impl ContourFinder for ImageprocBackend {
    fn find_contours(&self, mask: &GrayImage) -> Vec<Contour> {
        imageproc::contours::find_contours::<i32>(mask)
            .into_iter()
            .map(|c| Contour {
                points: c.points.iter().map(|p| [p.x, p.y]).collect(),
                is_hole: c.border_type == BorderType::Hole,
                parent: c.parent,
            })
            .collect()
    }
}
