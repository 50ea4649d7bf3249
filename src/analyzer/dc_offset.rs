//! DC offset detection
//!
//! Audio should average to zero over time; a non-zero mean means the whole
//! waveform is shifted off center. That wastes headroom and can thump on
//! playback start/stop. The mean of each channel is measured and the file
//! flagged when the average absolute offset exceeds 1% of full scale.

use serde::Serialize;

use crate::decode::DecodedAudio;

/// Offset percentage above which the file is flagged.
pub const OFFSET_FLAG_PERCENTAGE: f64 = 1.0;

/// DC bias measurement.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DcOffsetReport {
    /// True iff `offset_percentage > 1.0`.
    pub has_offset: bool,
    /// Mean sample value, left channel.
    pub offset_left: f64,
    /// Mean sample value, right channel.
    pub offset_right: f64,
    /// Average of the absolute channel means, as a percent of full scale.
    pub offset_percentage: f64,
}

fn mean(samples: &[f64]) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }
    samples.iter().sum::<f64>() / samples.len() as f64
}

/// Measure per-channel DC bias.
pub fn detect(audio: &DecodedAudio) -> DcOffsetReport {
    let offset_left = mean(&audio.left);
    let offset_right = mean(&audio.right);
    let offset_percentage = (offset_left.abs() + offset_right.abs()) / 2.0 * 100.0;

    DcOffsetReport {
        has_offset: offset_percentage > OFFSET_FLAG_PERCENTAGE,
        offset_left,
        offset_right,
        offset_percentage,
    }
}
