//! Wavegrade - Grade the technical quality of audio files
//!
//! Wavegrade decodes an audio file (WAV, FLAC, MP3, OGG, AAC), measures a
//! handful of mastering-quality signals and condenses them into a 0-100
//! score with a quality tier and a list of concrete issues.
//!
//! # What Gets Measured
//!
//! 1. **Loudness**: K-weighted LUFS-style integrated loudness plus true
//!    peak per channel. Masters should sit in a sane loudness window and
//!    leave headroom below -1 dBFS.
//!
//! 2. **Clipping**: samples at or above 0.99 absolute amplitude. More than
//!    0.01% of them means audible flat-topping.
//!
//! 3. **DC offset**: a non-zero mean shifts the waveform off center and
//!    wastes headroom.
//!
//! 4. **Stereo image**: left/right correlation, derived width and phase
//!    coherence; catches dual-mono and phase-flipped masters.
//!
//! 5. **Spectral balance**: FFT band energy split into low/mid/high with a
//!    coarse label (bass-heavy, bright, mid-focused, balanced).
//!
//! # Quick Start
//!
//! ```no_run
//! use wavegrade::{Analyzer, Quality};
//!
//! let analyzer = Analyzer::new();
//! let result = analyzer.analyze("master.flac");
//!
//! match result.report {
//!     Some(report) => {
//!         println!("{}: {}/100", report.quality, report.score);
//!         for issue in &report.issues {
//!             println!("  - {}", issue);
//!         }
//!     }
//!     None => eprintln!("could not analyze: {:?}", result.error),
//! }
//! ```
//!
//! # Scoring System
//!
//! Files start at 100 and lose fixed amounts per detected issue:
//!
//! | Score Range | Tier | Meaning |
//! |-------------|------------|---------------------------------|
//! | 90-100 | excellent | Release-ready |
//! | 75-89 | good | Minor issues |
//! | 60-74 | acceptable | Worth a second mastering pass |
//! | 0-59 | poor | Has audible problems |
//!
//! # Modules
//!
//! - [`decode`]: symphonia-backed decoding to per-channel PCM
//! - [`analyzer`]: the measurement passes and the scoring rubric
//! - [`report`]: output formatters (JSON, CSV)

pub mod analyzer;
pub mod decode;
pub mod report;

pub use analyzer::{
    Analyzer, BalanceLabel, ClippingReport, DcOffsetReport, FileResult, LoudnessMeasurement,
    Quality, QualityReport, SpectralReport, StereoImageReport,
};
pub use decode::{decode_bytes, DecodeError, DecodeLimits, DecodedAudio};
