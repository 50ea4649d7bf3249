//! Core analysis engine
//!
//! Fans decoded PCM out to the individual analyzers and folds their outputs
//! into a single [`QualityReport`]:
//!
//! ```text
//! encoded bytes
//!      |
//!   decode (symphonia)
//!      |
//!      +--> loudness   (K-weighted LUFS + true peak)
//!      +--> clipping   (near-full-scale sample counts)
//!      +--> dc_offset  (per-channel mean)
//!      +--> stereo     (L/R correlation, width, coherence)
//!      +--> spectral   (FFT band energy, balance label)
//!      |
//!   score (fixed deduction rubric) --> QualityReport
//! ```
//!
//! Every analyzer is a pure function over the same immutable sample buffer;
//! nothing is cached between calls and independent files can be analyzed in
//! parallel freely.

pub mod clipping;
pub mod dc_offset;
pub mod loudness;
pub mod score;
pub mod spectral;
pub mod stereo;

use std::path::Path;

use serde::Serialize;

use crate::decode::{self, DecodeError, DecodeLimits, DecodedAudio};

pub use clipping::ClippingReport;
pub use dc_offset::DcOffsetReport;
pub use loudness::LoudnessMeasurement;
pub use score::{Quality, ScoreCard};
pub use spectral::{BalanceLabel, SpectralReport};
pub use stereo::StereoImageReport;

/// Complete quality assessment of one piece of audio.
///
/// A value object: built once per analysis call, serializable as-is, never
/// mutated afterwards.
#[derive(Debug, Clone, Serialize)]
pub struct QualityReport {
    pub sample_rate: u32,
    pub channels: usize,
    pub duration_secs: f64,
    pub loudness: LoudnessMeasurement,
    pub clipping: ClippingReport,
    pub dc_offset: DcOffsetReport,
    pub stereo: StereoImageReport,
    /// `None` when spectral analysis was skipped.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spectral: Option<SpectralReport>,
    /// 0-100, higher is better.
    pub score: u32,
    pub quality: Quality,
    pub issues: Vec<String>,
}

/// Per-file result for batch runs: either a report or a terminal error.
#[derive(Debug, Clone, Serialize)]
pub struct FileResult {
    pub file_path: String,
    pub file_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report: Option<QualityReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl FileResult {
    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }

    /// Score for threshold comparisons; errored files count as 0.
    pub fn score(&self) -> u32 {
        self.report.as_ref().map(|r| r.score).unwrap_or(0)
    }
}

/// Analysis entry point with a couple of knobs.
///
/// ```no_run
/// use wavegrade::Analyzer;
///
/// let analyzer = Analyzer::new();
/// let result = analyzer.analyze("master.wav");
///
/// match result.report {
///     Some(report) => println!("{}: {}/100", report.quality, report.score),
///     None => eprintln!("failed: {}", result.error.unwrap()),
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct Analyzer {
    /// Skip the FFT pass (fastest path, no spectral section in the report).
    pub skip_spectral: bool,
    /// Cap decoding at this many seconds per file.
    pub limit_secs: Option<u64>,
}

impl Analyzer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_skip_spectral(mut self, skip: bool) -> Self {
        self.skip_spectral = skip;
        self
    }

    pub fn with_limit_secs(mut self, limit: Option<u64>) -> Self {
        self.limit_secs = limit;
        self
    }

    fn limits(&self) -> DecodeLimits {
        DecodeLimits {
            max_secs: self.limit_secs,
        }
    }

    /// Analyze already-decoded samples. Pure and infallible: silent or
    /// empty buffers degrade to floor/neutral values instead of NaN.
    pub fn analyze_samples(&self, audio: &DecodedAudio) -> QualityReport {
        let loudness = loudness::measure(audio);
        let clipping = clipping::detect(audio);
        let dc_offset = dc_offset::detect(audio);
        let stereo = stereo::analyze(audio);
        let spectral = if self.skip_spectral {
            None
        } else {
            Some(spectral::analyze(audio))
        };

        let card = score::score(&loudness, &clipping, &dc_offset, &stereo);

        QualityReport {
            sample_rate: audio.sample_rate,
            channels: audio.channels,
            duration_secs: audio.duration_secs,
            loudness,
            clipping,
            dc_offset,
            stereo,
            spectral,
            score: card.score,
            quality: card.quality,
            issues: card.issues,
        }
    }

    /// Decode encoded audio bytes and analyze them.
    pub fn analyze_bytes(&self, data: &[u8]) -> Result<QualityReport, DecodeError> {
        let audio = decode::decode_bytes(data, self.limits())?;
        Ok(self.analyze_samples(&audio))
    }

    /// Analyze a file on disk. Never panics; read or decode failures are
    /// recorded in the result's `error` field.
    pub fn analyze<P: AsRef<Path>>(&self, path: P) -> FileResult {
        let path = path.as_ref();
        let file_path = path.display().to_string();
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or(&file_path)
            .to_string();

        let data = match std::fs::read(path) {
            Ok(d) => d,
            Err(e) => {
                return FileResult {
                    file_path,
                    file_name,
                    report: None,
                    error: Some(format!("read failed: {}", e)),
                }
            }
        };

        match self.analyze_bytes(&data) {
            Ok(report) => FileResult {
                file_path,
                file_name,
                report: Some(report),
                error: None,
            },
            Err(e) => FileResult {
                file_path,
                file_name,
                report: None,
                error: Some(e.to_string()),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sine_audio(freq: f64, amplitude: f64, secs: f64, rate: u32) -> DecodedAudio {
        let n = (secs * rate as f64) as usize;
        let s: Vec<f64> = (0..n)
            .map(|i| {
                amplitude * (2.0 * std::f64::consts::PI * freq * i as f64 / rate as f64).sin()
            })
            .collect();
        DecodedAudio::from_channels(s.clone(), s, rate)
    }

    #[test]
    fn test_healthy_sine_is_not_poor() {
        // The canonical scenario: 440 Hz at 0.5 amplitude, dual mono
        let audio = sine_audio(440.0, 0.5, 5.0, 44100);
        let report = Analyzer::new().analyze_samples(&audio);

        assert!(!report.clipping.has_clipping);
        assert!(!report.dc_offset.has_offset);
        assert!((report.stereo.correlation - 1.0).abs() < 1e-9);
        assert!(report.quality > Quality::Poor, "quality = {:?}", report.quality);

        let spectral = report.spectral.expect("spectral enabled by default");
        assert!((spectral.peak_frequency_hz - 440.0).abs() < 50.0);
    }

    #[test]
    fn test_skip_spectral_omits_section() {
        let audio = sine_audio(440.0, 0.5, 1.0, 44100);
        let report = Analyzer::new()
            .with_skip_spectral(true)
            .analyze_samples(&audio);

        assert!(report.spectral.is_none());
    }

    #[test]
    fn test_silence_produces_finite_report() {
        let audio = DecodedAudio::from_channels(vec![0.0; 44100], vec![0.0; 44100], 44100);
        let report = Analyzer::new().analyze_samples(&audio);

        assert!(report.loudness.integrated_lufs.is_finite());
        assert!(!report.stereo.correlation.is_nan());
        assert!(report.score <= 100);
    }

    #[test]
    fn test_report_serializes_to_json() {
        let audio = sine_audio(440.0, 0.5, 0.5, 44100);
        let report = Analyzer::new().analyze_samples(&audio);

        let json = serde_json::to_string(&report).unwrap();
        assert!(json.contains("\"integrated_lufs\""));
        assert!(json.contains("\"quality\""));
    }

    #[test]
    fn test_missing_file_is_error_result() {
        let result = Analyzer::new().analyze("/no/such/file.wav");

        assert!(result.is_error());
        assert!(result.report.is_none());
        assert_eq!(result.score(), 0);
    }

    #[test]
    fn test_builder_knobs() {
        let a = Analyzer::new()
            .with_skip_spectral(true)
            .with_limit_secs(Some(30));

        assert!(a.skip_spectral);
        assert_eq!(a.limit_secs, Some(30));
    }
}
