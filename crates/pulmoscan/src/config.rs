//! Tunable constants of the analysis pipeline.
//!
//! Every heuristic number the pipeline uses lives here, grouped per stage.
//! The defaults reproduce the reference screening behaviour; partial JSON
//! files override individual fields (`#[serde(default)]` on every section).

use std::path::Path;

use crate::error::ConfigError;

/// Local contrast enhancement (CLAHE) and edge-preserving smoothing.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct EnhanceConfig {
    /// CLAHE clip limit, relative to a flat histogram.
    pub clip_limit: f32,
    /// Number of CLAHE tiles along x and y.
    pub tile_grid: [u32; 2],
    /// Bilateral filter window diameter (pixels).
    pub bilateral_diameter: u32,
    /// Bilateral filter intensity sigma.
    pub bilateral_sigma_color: f32,
    /// Bilateral filter spatial sigma (pixels).
    pub bilateral_sigma_space: f32,
}

impl Default for EnhanceConfig {
    fn default() -> Self {
        Self {
            clip_limit: 3.0,
            tile_grid: [8, 8],
            bilateral_diameter: 9,
            bilateral_sigma_color: 75.0,
            bilateral_sigma_space: 75.0,
        }
    }
}

/// Binarization of the smoothed image.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ThresholdConfig {
    /// Include the automatic (Otsu) mask.
    pub use_otsu: bool,
    /// Fixed intensity threshold; pixels strictly above are foreground.
    pub fixed_level: u8,
}

impl Default for ThresholdConfig {
    fn default() -> Self {
        Self {
            use_otsu: true,
            fixed_level: 150,
        }
    }
}

/// Morphological cleanup of the combined mask.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct MorphologyConfig {
    /// Side length of the square structuring element (odd, pixels).
    pub kernel_size: u8,
}

impl Default for MorphologyConfig {
    fn default() -> Self {
        Self { kernel_size: 5 }
    }
}

impl MorphologyConfig {
    /// Chebyshev radius of the structuring element.
    pub fn radius(&self) -> u8 {
        self.kernel_size / 2
    }
}

/// Candidate region gating.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct RegionConfig {
    /// Contours with area at or below this value are noise.
    pub min_area_px: f64,
    /// Lower bound applied to every reported region severity.
    pub severity_floor: f64,
}

impl Default for RegionConfig {
    fn default() -> Self {
        Self {
            min_area_px: 200.0,
            severity_floor: 0.6,
        }
    }
}

/// Weights and floors of the aggregate screening score.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Gain applied to the raw significant-area ratio before capping at 1.
    pub area_gain: f64,
    /// Weight of the area term.
    pub area_weight: f64,
    /// Weight of the mean-severity term.
    pub severity_weight: f64,
    /// Weight of the region-count term.
    pub region_weight: f64,
    /// Region count at which the region term saturates.
    pub region_saturation: f64,
    /// Score floor once at least one region is found.
    pub detected_floor: f64,
    /// Score reported when no region is found.
    pub empty_score: f64,
    /// Cap on the "Multiple Lesions" finding probability.
    pub lesion_probability_cap: f64,
    /// Confidence at zero score.
    pub confidence_base: f64,
    /// Confidence gain per unit of score.
    pub confidence_gain: f64,
    /// Upper bound on confidence.
    pub confidence_cap: f64,
    /// Score above which "Severe Infiltration" is reported.
    pub severe_above: f64,
    /// Score above which "Moderate Infiltration" is reported.
    pub moderate_above: f64,
    /// Region count above which "Multiple Lesions" is reported.
    pub lesions_above: usize,
    /// Region count above which "Multiple Lesions" is tagged high.
    pub lesions_high_above: usize,
    /// Mean severity above which "Dense Opacity" is reported.
    pub dense_above: f64,
    /// Mean severity above which "Dense Opacity" is tagged high.
    pub dense_high_above: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            area_gain: 5.0,
            area_weight: 0.35,
            severity_weight: 0.35,
            region_weight: 0.30,
            region_saturation: 8.0,
            detected_floor: 0.5,
            empty_score: 0.3,
            lesion_probability_cap: 0.9,
            confidence_base: 0.7,
            confidence_gain: 0.25,
            confidence_cap: 0.95,
            severe_above: 0.7,
            moderate_above: 0.5,
            lesions_above: 3,
            lesions_high_above: 6,
            dense_above: 0.6,
            dense_high_above: 0.8,
        }
    }
}

/// Rendering of the annotated overlay.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct OverlayConfig {
    /// Weight of the original image in the blend.
    pub image_weight: f32,
    /// Weight of the coloured heatmap in the blend.
    pub heatmap_weight: f32,
    /// Linear gain applied to the coloured heatmap (no offset).
    pub heatmap_gain: f32,
    /// RGB colour of region outlines.
    pub outline_rgb: [u8; 3],
    /// Outline thickness in pixels.
    pub outline_thickness: u32,
    /// JPEG quality of the encoded overlay (1-100).
    pub jpeg_quality: u8,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            image_weight: 0.6,
            heatmap_weight: 0.4,
            heatmap_gain: 1.5,
            outline_rgb: [255, 255, 0],
            outline_thickness: 2,
            jpeg_quality: 95,
        }
    }
}

/// Input size limits, checked against the image header before pixels are decoded.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Maximum width or height in pixels.
    pub max_dimension: u32,
    /// Maximum total pixel count.
    pub max_pixels: u64,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_dimension: 65_535,
            max_pixels: 40_000_000,
        }
    }
}

impl LimitsConfig {
    /// Whether a `width × height` raster is within limits.
    pub fn admits(&self, width: u32, height: u32) -> bool {
        width <= self.max_dimension
            && height <= self.max_dimension
            && (width as u64) * (height as u64) <= self.max_pixels
    }
}

/// Full analyzer configuration.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    pub enhance: EnhanceConfig,
    pub threshold: ThresholdConfig,
    pub morphology: MorphologyConfig,
    pub regions: RegionConfig,
    pub scoring: ScoringConfig,
    pub overlay: OverlayConfig,
    pub limits: LimitsConfig,
}

impl AnalyzerConfig {
    /// Load a config from a JSON file. Missing fields keep their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self, ConfigError> {
        let data = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&data).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Pretty-printed JSON form of this config.
    pub fn to_json_pretty(&self) -> String {
        // Plain data with string keys; serialization cannot fail.
        serde_json::to_string_pretty(self).unwrap_or_default()
    }
}
