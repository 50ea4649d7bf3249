//! K-weighted loudness and true peak measurement
//!
//! Produces a LUFS-style loudness figure plus per-channel true peak levels.
//!
//! # How Loudness Measurement Works
//!
//! Human hearing is not equally sensitive at all frequencies, so loudness
//! standards first run the signal through a "K-weighting" filter that
//! emphasizes the frequencies we hear best, then measure mean-square power
//! of the weighted signal:
//!
//! ```text
//! LUFS = -0.691 + 10 * log10(mean_square)
//! ```
//!
//! Reference points on that scale:
//!
//! ```text
//! -14 LUFS | Streaming platform normalization target
//! -16 LUFS | Podcast target
//! -23 LUFS | Broadcast (EBU R128) target
//! ```
//!
//! # Approximations
//!
//! This is deliberately NOT a standards-compliant ITU-R BS.1770 meter:
//!
//! - The K-weighting here is a single three-coefficient feed-forward pass,
//!   not the standard's two-stage biquad cascade.
//! - Short-term and momentary loudness are derived from the integrated value
//!   by fixed offsets (+2 and +3 LU) instead of 3 s / 400 ms gated windows.
//! - True peak is the raw sample peak, without 4x oversampling, so
//!   inter-sample peaks are not caught.
//! - Loudness range is a placeholder constant.
//!
//! Treat the output as a mastering sanity check, not a compliance number.

use serde::Serialize;

use crate::decode::DecodedAudio;

/// K-weighting approximation coefficients (feed-forward, two delay taps).
const KW_B0: f64 = 1.53512486;
const KW_B1: f64 = -2.69169619;
const KW_B2: f64 = 1.19839281;

/// Fixed offsets standing in for windowed short-term/momentary measurement.
const SHORT_TERM_OFFSET_LU: f64 = 2.0;
const MOMENTARY_OFFSET_LU: f64 = 3.0;

/// Placeholder loudness range reported for every file.
const PLACEHOLDER_RANGE_LU: f64 = 6.0;

/// Floor used instead of -inf for silent input.
pub const SILENCE_FLOOR_DB: f64 = -96.0;

/// Loudness and peak measurements for one decoded file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoudnessMeasurement {
    /// Integrated (whole-file) loudness, LUFS-like scale.
    pub integrated_lufs: f64,
    /// Approximated short-term loudness (integrated + 2 LU).
    pub short_term_lufs: f64,
    /// Approximated momentary loudness (integrated + 3 LU).
    pub momentary_lufs: f64,
    /// Peak absolute sample value, left channel (linear, 0..1+).
    pub true_peak_left: f64,
    /// Peak absolute sample value, right channel (linear, 0..1+).
    pub true_peak_right: f64,
    /// Louder channel's peak in dBFS.
    pub true_peak_db: f64,
    /// Loudness range placeholder, LU.
    pub loudness_range_lu: f64,
}

/// Apply the K-weighting approximation to one channel.
fn k_weight(samples: &[f64]) -> Vec<f64> {
    let mut out = Vec::with_capacity(samples.len());
    let mut x1 = 0.0;
    let mut x2 = 0.0;
    for &x in samples {
        out.push(KW_B0 * x + KW_B1 * x1 + KW_B2 * x2);
        x2 = x1;
        x1 = x;
    }
    out
}

/// Convert a linear amplitude to dBFS, flooring silence at -96 dB.
pub fn to_db(value: f64) -> f64 {
    if value <= 0.0 {
        SILENCE_FLOOR_DB
    } else {
        20.0 * value.log10()
    }
}

fn peak(samples: &[f64]) -> f64 {
    samples.iter().fold(0.0f64, |max, &s| max.max(s.abs()))
}

/// Measure loudness and true peak of decoded audio.
///
/// Silent or empty input floors every level at [`SILENCE_FLOOR_DB`] rather
/// than producing -inf or NaN.
pub fn measure(audio: &DecodedAudio) -> LoudnessMeasurement {
    let weighted_left = k_weight(&audio.left);
    let weighted_right = k_weight(&audio.right);

    let total = weighted_left.len() + weighted_right.len();
    let sum_squares: f64 = weighted_left
        .iter()
        .chain(weighted_right.iter())
        .map(|&y| y * y)
        .sum();

    let mean_square = if total > 0 {
        sum_squares / total as f64
    } else {
        0.0
    };

    let integrated_lufs = if mean_square > 0.0 {
        -0.691 + 10.0 * mean_square.log10()
    } else {
        SILENCE_FLOOR_DB
    };

    let true_peak_left = peak(&audio.left);
    let true_peak_right = peak(&audio.right);
    let true_peak_db = to_db(true_peak_left.max(true_peak_right));

    LoudnessMeasurement {
        integrated_lufs,
        short_term_lufs: integrated_lufs + SHORT_TERM_OFFSET_LU,
        momentary_lufs: integrated_lufs + MOMENTARY_OFFSET_LU,
        true_peak_left,
        true_peak_right,
        true_peak_db,
        loudness_range_lu: PLACEHOLDER_RANGE_LU,
    }
}
