//! Quality scoring rubric
//!
//! Combines the analyzer outputs into a single 0-100 score by a fixed
//! deduction pass over a starting score of 100:
//!
//! ```text
//! Condition                    | Deduction | Issue
//! -----------------------------|-----------|---------------------------
//! integrated < -20 LUFS        |    -15    | too quiet
//! integrated > -6 LUFS         |    -15    | too loud
//! true peak > -1 dBFS          |    -20    | true peak exceeds -1 dB
//! clipping flagged             |    -25    | clipping (with percentage)
//! DC offset flagged            |    -10    | DC offset present
//! dual-mono (correlation 1.0)  |     0     | informational only
//! ```
//!
//! The thresholds and amounts are a fixed rubric; downstream consumers
//! compare scores across runs, so they must not drift.

use serde::Serialize;

use super::clipping::ClippingReport;
use super::dc_offset::DcOffsetReport;
use super::loudness::LoudnessMeasurement;
use super::stereo::StereoImageReport;

/// Loudness window considered healthy, LUFS.
pub const QUIET_LUFS: f64 = -20.0;
pub const LOUD_LUFS: f64 = -6.0;

/// True peak ceiling, dBFS.
pub const PEAK_CEILING_DB: f64 = -1.0;

/// Discrete quality tier derived from the score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Quality {
    Poor,
    Acceptable,
    Good,
    Excellent,
}

impl Quality {
    /// Tier boundaries: >=90 excellent, >=75 good, >=60 acceptable, else poor.
    pub fn from_score(score: u32) -> Self {
        if score >= 90 {
            Quality::Excellent
        } else if score >= 75 {
            Quality::Good
        } else if score >= 60 {
            Quality::Acceptable
        } else {
            Quality::Poor
        }
    }
}

impl std::fmt::Display for Quality {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Quality::Excellent => "excellent",
            Quality::Good => "good",
            Quality::Acceptable => "acceptable",
            Quality::Poor => "poor",
        };
        write!(f, "{}", s)
    }
}

/// Scored verdict with the issues that drove it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreCard {
    /// 0-100, higher is better.
    pub score: u32,
    pub quality: Quality,
    /// Human-readable descriptions of every triggered condition.
    pub issues: Vec<String>,
}

/// Run the deduction pass over the analyzer outputs.
pub fn score(
    loudness: &LoudnessMeasurement,
    clipping: &ClippingReport,
    dc: &DcOffsetReport,
    stereo: &StereoImageReport,
) -> ScoreCard {
    let mut score: i32 = 100;
    let mut issues = Vec::new();

    if loudness.integrated_lufs < QUIET_LUFS {
        score -= 15;
        issues.push(format!(
            "too quiet: integrated loudness {:.1} LUFS is below {:.0} LUFS",
            loudness.integrated_lufs, QUIET_LUFS
        ));
    } else if loudness.integrated_lufs > LOUD_LUFS {
        score -= 15;
        issues.push(format!(
            "too loud: integrated loudness {:.1} LUFS is above {:.0} LUFS",
            loudness.integrated_lufs, LOUD_LUFS
        ));
    }

    if loudness.true_peak_db > PEAK_CEILING_DB {
        score -= 20;
        issues.push(format!(
            "true peak exceeds -1 dB ({:.2} dBFS)",
            loudness.true_peak_db
        ));
    }

    if clipping.has_clipping {
        score -= 25;
        issues.push(format!(
            "clipping detected: {:.3}% of samples at or above {:.2}",
            clipping.clipping_percentage,
            super::clipping::CLIP_THRESHOLD
        ));
    }

    if dc.has_offset {
        score -= 10;
        issues.push(format!(
            "DC offset present ({:.2}% of full scale)",
            dc.offset_percentage
        ));
    }

    // Informational only: perfectly correlated stereo carries no penalty,
    // but dual-mono masters are worth knowing about.
    if stereo.is_mono && stereo.correlation == 1.0 {
        issues.push("channels are identical (mono or dual-mono source)".to_string());
    }

    let score = score.clamp(0, 100) as u32;

    ScoreCard {
        score,
        quality: Quality::from_score(score),
        issues,
    }
}
