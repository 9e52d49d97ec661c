//! Heuristic chest X-ray region analyzer.
//!
//! Turns raw encoded radiograph bytes into an annotated overlay and a
//! structured finding set. The pipeline stages are:
//!
//! 1. **Decode** – bytes to an RGB raster, then BT.601 grayscale.
//! 2. **Enhance** – CLAHE (clip 3.0, 8×8 tiles) and bilateral smoothing.
//! 3. **Segment** – Otsu OR fixed-level threshold, morphological close/open.
//! 4. **Regions** – contour tracing, area gate, centroids, local intensity.
//! 5. **Score** – weighted area/severity/count score, confidence, findings.
//! 6. **Render** – JET heatmap blended over the input, outlined, JPEG-encoded.
//!
//! The resulting `tb_probability` is a linear heuristic, **not** a calibrated
//! clinical probability. It is a qualitative severity indicator for human
//! review only.
//!
//! # Public API
//! - [`analyze`] and [`Analyzer`] as entry points
//! - [`AnalyzerConfig`] for tuning every heuristic constant
//! - [`ImageCodec`], [`MorphologyOps`], [`ContourFinder`] to swap the imaging
//!   backend (the default is [`ImageprocBackend`])

mod analyzer;
pub mod backend;
mod config;
pub mod enhance;
mod error;
pub mod overlay;
pub mod regions;
mod result;
pub mod scoring;
pub mod segment;

#[cfg(test)]
pub(crate) mod test_utils;

pub use analyzer::{analyze, Analyzer};
pub use backend::{Contour, ContourFinder, ImageCodec, ImageprocBackend, MorphologyOps};
pub use config::{
    AnalyzerConfig, EnhanceConfig, LimitsConfig, MorphologyConfig, OverlayConfig, RegionConfig,
    ScoringConfig, ThresholdConfig,
};
pub use error::{AnalysisError, ConfigError, DecodeError};
pub use regions::CandidateRegion;
pub use result::AnalysisResult;
pub use scoring::{Finding, FindingLabel, ScoreBreakdown, SeverityTag};
