//! Stereo imaging analysis
//!
//! Measures how similar the left and right channels are:
//!
//! ```text
//! correlation  1.0 | identical channels (mono or dual-mono)
//! correlation  0.7 | typical stereo mix
//! correlation  0.0 | fully independent channels
//! correlation -1.0 | one channel is the inverse of the other (phase flip)
//! ```
//!
//! Width and phase coherence are derived from the correlation:
//! `width = 1 - |corr|`, `coherence = (corr + 1) / 2`. A phase-flipped mix
//! (negative correlation) collapses to silence when summed to mono, which
//! is why coherence below 0.5 is worth surfacing.

use serde::Serialize;

use crate::decode::DecodedAudio;

/// Correlation above which the image is considered mono.
pub const MONO_CORRELATION: f64 = 0.95;

/// Correlation below which the image is considered unusually wide.
pub const WIDE_CORRELATION: f64 = 0.3;

/// Stereo image measurements.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StereoImageReport {
    /// Zero-lag correlation of left and right, in [-1, 1].
    pub correlation: f64,
    /// Perceived width, `1 - |correlation|`, in [0, 1].
    pub stereo_width: f64,
    /// `(correlation + 1) / 2`, in [0, 1]; below 0.5 means net phase inversion.
    pub phase_coherence: f64,
    /// True for single-channel sources or correlation > 0.95.
    pub is_mono: bool,
    /// True when correlation < 0.3.
    pub is_wide_stereo: bool,
}

impl StereoImageReport {
    /// Fixed result for single-channel input.
    fn mono() -> Self {
        Self {
            correlation: 1.0,
            stereo_width: 0.0,
            phase_coherence: 1.0,
            is_mono: true,
            is_wide_stereo: false,
        }
    }

    fn from_correlation(correlation: f64) -> Self {
        Self {
            correlation,
            stereo_width: 1.0 - correlation.abs(),
            phase_coherence: (correlation + 1.0) / 2.0,
            is_mono: correlation > MONO_CORRELATION,
            is_wide_stereo: correlation < WIDE_CORRELATION,
        }
    }
}

/// Zero-lag normalized correlation of two channels.
///
/// A silent channel makes the denominator zero; that is treated as fully
/// correlated rather than NaN, since there is no stereo information to
/// distinguish the channels by.
fn correlation(left: &[f64], right: &[f64]) -> f64 {
    let n = left.len().min(right.len());
    if n == 0 {
        return 1.0;
    }

    let mut sum_lr = 0.0;
    let mut sum_l2 = 0.0;
    let mut sum_r2 = 0.0;
    for i in 0..n {
        sum_lr += left[i] * right[i];
        sum_l2 += left[i] * left[i];
        sum_r2 += right[i] * right[i];
    }

    let denom = (sum_l2 * sum_r2).sqrt();
    if denom == 0.0 {
        return 1.0;
    }

    (sum_lr / denom).clamp(-1.0, 1.0)
}

/// Analyze the stereo image of decoded audio.
pub fn analyze(audio: &DecodedAudio) -> StereoImageReport {
    if audio.channels < 2 {
        return StereoImageReport::mono();
    }
    StereoImageReport::from_correlation(correlation(&audio.left, &audio.right))
}
