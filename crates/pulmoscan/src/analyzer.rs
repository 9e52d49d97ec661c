//! Pipeline orchestrator: decode → enhance → segment → regions → score →
//! render → encode.

use image::RgbImage;

use crate::backend::{ContourFinder, ImageCodec, ImageprocBackend, MorphologyOps};
use crate::config::AnalyzerConfig;
use crate::enhance::{enhance, to_grayscale};
use crate::error::{AnalysisError, DecodeError};
use crate::regions::extract_regions;
use crate::result::AnalysisResult;
use crate::{overlay, scoring, segment};

/// Radiograph region analyzer.
///
/// Holds a configuration and the imaging backends; carries no per-call
/// state, so one instance can serve concurrent callers.
///
/// # Examples
///
/// ```no_run
/// use pulmoscan::Analyzer;
///
/// let bytes = std::fs::read("chest.png").unwrap();
/// let result = Analyzer::new().analyze(&bytes).unwrap();
/// println!(
///     "score={:.2} regions={}",
///     result.tb_probability,
///     result.regions.len()
/// );
/// ```
pub struct Analyzer {
    config: AnalyzerConfig,
    codec: Box<dyn ImageCodec>,
    morphology: Box<dyn MorphologyOps>,
    contours: Box<dyn ContourFinder>,
}

impl Default for Analyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl Analyzer {
    /// Analyzer with default constants and the `imageproc` backend.
    pub fn new() -> Self {
        Self::with_config(AnalyzerConfig::default())
    }

    /// Analyzer with a custom configuration and the `imageproc` backend.
    pub fn with_config(config: AnalyzerConfig) -> Self {
        Self {
            config,
            codec: Box::new(ImageprocBackend),
            morphology: Box::new(ImageprocBackend),
            contours: Box::new(ImageprocBackend),
        }
    }

    /// Replace the image codec.
    pub fn with_codec(mut self, codec: impl ImageCodec + 'static) -> Self {
        self.codec = Box::new(codec);
        self
    }

    /// Replace the morphology backend.
    pub fn with_morphology(mut self, ops: impl MorphologyOps + 'static) -> Self {
        self.morphology = Box::new(ops);
        self
    }

    /// Replace the contour finder.
    pub fn with_contour_finder(mut self, finder: impl ContourFinder + 'static) -> Self {
        self.contours = Box::new(finder);
        self
    }

    /// Current configuration.
    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    /// Analyze encoded image bytes (JPEG, PNG, BMP).
    ///
    /// Fails with [`AnalysisError::Decode`] when the bytes are not a
    /// decodable raster; no partial result is produced in that case.
    pub fn analyze(&self, bytes: &[u8]) -> Result<AnalysisResult, AnalysisError> {
        let rgb = self.codec.decode(bytes, &self.config.limits)?;
        self.analyze_rgb(&rgb)
    }

    /// Analyze an already-decoded colour raster.
    pub fn analyze_rgb(&self, rgb: &RgbImage) -> Result<AnalysisResult, AnalysisError> {
        let (w, h) = rgb.dimensions();
        if w == 0 || h == 0 {
            return Err(DecodeError::ZeroSized.into());
        }
        if !self.config.limits.admits(w, h) {
            return Err(DecodeError::TooLarge {
                width: w,
                height: h,
            }
            .into());
        }
        let cfg = &self.config;

        let gray = to_grayscale(rgb);
        let enhanced = enhance(&gray, &cfg.enhance);
        let mask = segment::segment(
            &enhanced.smoothed,
            &cfg.threshold,
            &cfg.morphology,
            self.morphology.as_ref(),
        );
        tracing::debug!(
            width = w,
            height = h,
            foreground = segment::foreground_count(&mask),
            "segmentation done"
        );

        let contours = self.contours.find_contours(&mask);
        let extraction = extract_regions(&contours, &enhanced.equalized, &cfg.regions);
        tracing::debug!(
            contours = contours.len(),
            significant = extraction.significant.len(),
            regions = extraction.regions.len(),
            "region extraction done"
        );

        let image_area = w as f64 * h as f64;
        let breakdown = scoring::breakdown(
            &extraction.regions,
            extraction.significant_area,
            image_area,
            &cfg.scoring,
        );
        let tb_probability = scoring::tb_probability(&breakdown, &cfg.scoring);
        let confidence_score = scoring::confidence_score(tb_probability, &cfg.scoring);
        let findings = scoring::findings(tb_probability, &breakdown, &cfg.scoring);

        let annotated = overlay::render(rgb, &extraction.significant, &cfg.overlay);
        let overlay_jpeg = self
            .codec
            .encode_jpeg(&annotated, cfg.overlay.jpeg_quality)
            .map_err(AnalysisError::Encode)?;

        tracing::info!(
            "Analyzed {}x{} image: {} regions, score={:.3}, confidence={:.3}",
            w,
            h,
            breakdown.region_count,
            tb_probability,
            confidence_score,
        );

        Ok(AnalysisResult {
            tb_probability,
            confidence_score,
            findings,
            regions: extraction.regions,
            breakdown,
            image_size: [w, h],
            overlay_jpeg,
        })
    }
}

/// Analyze encoded image bytes with the default configuration.
pub fn analyze(bytes: &[u8]) -> Result<AnalysisResult, AnalysisError> {
    Analyzer::new().analyze(bytes)
}
