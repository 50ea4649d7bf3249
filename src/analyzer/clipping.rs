//! Digital clipping detection
//!
//! A sample at or very near full scale usually means the signal hit the
//! converter ceiling and got flattened. A handful of such samples is normal
//! in loud masters; a measurable percentage of them is audible distortion.
//! The detector counts samples per channel whose absolute value reaches the
//! threshold and flags the file once they exceed 0.01% of all samples.

use serde::Serialize;

use crate::decode::DecodedAudio;

/// Amplitude at which a sample counts as clipped, on a [-1, 1] scale.
pub const CLIP_THRESHOLD: f64 = 0.99;

/// Fraction of clipped samples (in percent) above which the file is flagged.
pub const CLIP_FLAG_PERCENTAGE: f64 = 0.01;

/// Clipping scan results.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClippingReport {
    /// True iff `clipping_percentage > 0.01`.
    pub has_clipping: bool,
    pub clipped_count_left: usize,
    pub clipped_count_right: usize,
    /// Clipped samples across both channels as a percentage of all samples.
    pub clipping_percentage: f64,
    /// Peak absolute sample value per channel.
    pub peak_left: f64,
    pub peak_right: f64,
}

fn scan(samples: &[f64]) -> (usize, f64) {
    let mut count = 0usize;
    let mut peak = 0.0f64;
    for &s in samples {
        let a = s.abs();
        if a >= CLIP_THRESHOLD {
            count += 1;
        }
        peak = peak.max(a);
    }
    (count, peak)
}

/// Count near-full-scale samples in both channels.
pub fn detect(audio: &DecodedAudio) -> ClippingReport {
    let (clipped_count_left, peak_left) = scan(&audio.left);
    let (clipped_count_right, peak_right) = scan(&audio.right);

    let total = audio.left.len() + audio.right.len();
    let clipping_percentage = if total > 0 {
        (clipped_count_left + clipped_count_right) as f64 / total as f64 * 100.0
    } else {
        0.0
    };

    ClippingReport {
        has_clipping: clipping_percentage > CLIP_FLAG_PERCENTAGE,
        clipped_count_left,
        clipped_count_right,
        clipping_percentage,
        peak_left,
        peak_right,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stereo(left: Vec<f64>, right: Vec<f64>) -> DecodedAudio {
        DecodedAudio::from_channels(left, right, 44100)
    }

    #[test]
    fn test_clean_signal_not_flagged() {
        // Nothing at or above 0.99
        let audio = stereo(vec![0.5, -0.7, 0.98, -0.3], vec![0.2, 0.1, -0.9, 0.0]);
        let report = detect(&audio);

        assert!(!report.has_clipping);
        assert_eq!(report.clipping_percentage, 0.0);
        assert_eq!(report.clipped_count_left, 0);
        assert_eq!(report.clipped_count_right, 0);
    }

    #[test]
    fn test_clipped_samples_counted_per_channel() {
        let audio = stereo(vec![1.0, -1.0, 0.5, 0.99], vec![0.1, 0.2, 0.3, 0.4]);
        let report = detect(&audio);

        assert_eq!(report.clipped_count_left, 3);
        assert_eq!(report.clipped_count_right, 0);
        // 3 of 8 samples = 37.5%
        assert!((report.clipping_percentage - 37.5).abs() < 1e-9);
        assert!(report.has_clipping);
    }

    #[test]
    fn test_threshold_is_inclusive() {
        let audio = stereo(vec![CLIP_THRESHOLD], vec![0.0]);
        let report = detect(&audio);

        assert_eq!(report.clipped_count_left, 1);
    }

    #[test]
    fn test_empty_input_yields_zero_counts() {
        let audio = stereo(vec![], vec![]);
        let report = detect(&audio);

        assert!(!report.has_clipping);
        assert_eq!(report.clipping_percentage, 0.0);
    }

    #[test]
    fn test_peaks_reported() {
        let audio = stereo(vec![0.5, -0.8], vec![0.2, -0.4]);
        let report = detect(&audio);

        assert!((report.peak_left - 0.8).abs() < 1e-12);
        assert!((report.peak_right - 0.4).abs() < 1e-12);
    }
}
