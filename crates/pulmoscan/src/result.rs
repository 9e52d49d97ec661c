use std::path::Path;

use crate::overlay;
use crate::regions::CandidateRegion;
use crate::scoring::{Finding, ScoreBreakdown};

/// Full analysis output for a single radiograph.
///
/// `tb_probability` is a heuristic screening score, not a calibrated
/// clinical probability, and `confidence_score` is a fixed monotonic
/// function of it rather than a statistical confidence.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct AnalysisResult {
    /// Aggregate screening score in [0.3, 1.0]; at least 0.5 when any
    /// region was found.
    pub tb_probability: f64,
    /// `min(0.95, 0.7 + 0.25 · tb_probability)`.
    pub confidence_score: f64,
    /// Qualitative findings in rule-table order. Never empty.
    pub findings: Vec<Finding>,
    /// Candidate regions in contour order. May be empty.
    pub regions: Vec<CandidateRegion>,
    /// Aggregates the score was computed from.
    pub breakdown: ScoreBreakdown,
    /// Image dimensions [width, height].
    pub image_size: [u32; 2],
    /// JPEG-encoded annotated overlay.
    #[serde(skip)]
    pub overlay_jpeg: Vec<u8>,
}

impl AnalysisResult {
    /// Overlay as standard base64 text, for inline embedding.
    pub fn overlay_base64(&self) -> String {
        overlay::to_base64(&self.overlay_jpeg)
    }

    /// Write the overlay JPEG to `path`, creating parent directories.
    pub fn write_overlay(&self, path: &Path) -> std::io::Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(path, &self.overlay_jpeg)
    }

    /// Whether any candidate region was surfaced.
    pub fn has_regions(&self) -> bool {
        !self.regions.is_empty()
    }
}
