//! Aggregate screening score, confidence and qualitative findings.
//!
//! The score is a linear heuristic over region area, intensity and count.
//! It is a qualitative severity indicator, not a calibrated probability,
//! and must never be presented as clinical ground truth.

use crate::config::ScoringConfig;
use crate::regions::CandidateRegion;

/// Qualitative finding label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum FindingLabel {
    #[serde(rename = "Severe Infiltration")]
    SevereInfiltration,
    #[serde(rename = "Moderate Infiltration")]
    ModerateInfiltration,
    #[serde(rename = "Multiple Lesions")]
    MultipleLesions,
    #[serde(rename = "Dense Opacity")]
    DenseOpacity,
    #[serde(rename = "Potential Abnormality")]
    PotentialAbnormality,
}

impl FindingLabel {
    /// Human-readable label text.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::SevereInfiltration => "Severe Infiltration",
            Self::ModerateInfiltration => "Moderate Infiltration",
            Self::MultipleLesions => "Multiple Lesions",
            Self::DenseOpacity => "Dense Opacity",
            Self::PotentialAbnormality => "Potential Abnormality",
        }
    }
}

impl std::fmt::Display for FindingLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Severity tag attached to a finding.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub enum SeverityTag {
    Low,
    Moderate,
    High,
}

impl std::fmt::Display for SeverityTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Low => "Low",
            Self::Moderate => "Moderate",
            Self::High => "High",
        })
    }
}

/// One qualitative finding with its own heuristic probability.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Finding {
    pub label: FindingLabel,
    pub probability: f64,
    pub severity: SeverityTag,
}

/// Intermediate aggregates behind the screening score.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ScoreBreakdown {
    /// Number of reported regions.
    pub region_count: usize,
    /// Sum of the areas of all contours passing the area gate.
    pub significant_area: f64,
    /// Image area in pixels.
    pub image_area: f64,
    /// `min(significant_area / image_area · area_gain, 1)`.
    pub area_ratio: f64,
    /// Mean region severity, 0 without regions.
    pub avg_severity: f64,
    /// `min(region_count / region_saturation, 1)`.
    pub region_score: f64,
    /// Weighted sum before the detection floor is applied.
    pub base_score: f64,
}

/// Compute the score aggregates for a set of regions.
pub fn breakdown(
    regions: &[CandidateRegion],
    significant_area: f64,
    image_area: f64,
    config: &ScoringConfig,
) -> ScoreBreakdown {
    let region_count = regions.len();
    let area_ratio = if image_area > 0.0 {
        (significant_area / image_area * config.area_gain).min(1.0)
    } else {
        0.0
    };
    let avg_severity = if regions.is_empty() {
        0.0
    } else {
        regions.iter().map(|r| r.severity).sum::<f64>() / region_count as f64
    };
    let region_score = (region_count as f64 / config.region_saturation).min(1.0);
    let base_score = config.area_weight * area_ratio
        + config.severity_weight * avg_severity
        + config.region_weight * region_score;

    ScoreBreakdown {
        region_count,
        significant_area,
        image_area,
        area_ratio,
        avg_severity,
        region_score,
        base_score,
    }
}

/// Final screening score: floored when regions exist, fixed otherwise.
pub fn tb_probability(b: &ScoreBreakdown, config: &ScoringConfig) -> f64 {
    if b.region_count == 0 {
        config.empty_score
    } else {
        b.base_score.max(config.detected_floor).min(1.0)
    }
}

/// Deterministic, monotonic confidence derived from the score alone.
///
/// This carries no independent uncertainty estimate.
pub fn confidence_score(tb_probability: f64, config: &ScoringConfig) -> f64 {
    (config.confidence_base + tb_probability * config.confidence_gain).min(config.confidence_cap)
}

/// Evaluate the finding rule table. The result is never empty.
pub fn findings(tb_probability: f64, b: &ScoreBreakdown, config: &ScoringConfig) -> Vec<Finding> {
    let mut out = Vec::new();

    if tb_probability > config.severe_above {
        out.push(Finding {
            label: FindingLabel::SevereInfiltration,
            probability: tb_probability,
            severity: SeverityTag::High,
        });
    } else if tb_probability > config.moderate_above {
        out.push(Finding {
            label: FindingLabel::ModerateInfiltration,
            probability: tb_probability,
            severity: SeverityTag::Moderate,
        });
    }

    if b.region_count > config.lesions_above {
        out.push(Finding {
            label: FindingLabel::MultipleLesions,
            probability: (b.region_count as f64 / config.region_saturation)
                .min(config.lesion_probability_cap),
            severity: if b.region_count > config.lesions_high_above {
                SeverityTag::High
            } else {
                SeverityTag::Moderate
            },
        });
    }

    if b.avg_severity > config.dense_above {
        out.push(Finding {
            label: FindingLabel::DenseOpacity,
            probability: b.avg_severity,
            severity: if b.avg_severity > config.dense_high_above {
                SeverityTag::High
            } else {
                SeverityTag::Moderate
            },
        });
    }

    if out.is_empty() {
        out.push(Finding {
            label: FindingLabel::PotentialAbnormality,
            probability: tb_probability,
            severity: SeverityTag::Low,
        });
    }
    out
}
