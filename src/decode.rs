//! Audio decoding to per-channel PCM samples
//!
//! Wraps symphonia's probe/decode loop to turn encoded container bytes
//! (WAV, FLAC, MP3, OGG, AAC) into plain `f64` sample vectors, one per
//! channel. Everything downstream operates on these vectors; nothing else
//! in the crate touches codec machinery.
//!
//! Decoding is the only step that can take unbounded time on hostile input,
//! so it accepts [`DecodeLimits`] to cap how much audio is pulled out of a
//! stream. Analysis itself is linear in the sample count.

use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::DecoderOptions;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

const FALLBACK_SAMPLE_RATE: u32 = 44100;

/// Why a buffer could not be decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// Container format not recognized by the probe.
    UnrecognizedFormat,
    /// The container has no decodable audio track.
    NoAudioTrack,
    /// No codec available for the track's parameters.
    UnsupportedCodec,
    /// The stream produced no PCM at all (every packet failed or was empty).
    EmptyStream,
}

impl std::fmt::Display for DecodeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DecodeError::UnrecognizedFormat => write!(f, "unrecognized container format"),
            DecodeError::NoAudioTrack => write!(f, "no audio track found"),
            DecodeError::UnsupportedCodec => write!(f, "unsupported codec"),
            DecodeError::EmptyStream => write!(f, "stream decoded to zero samples"),
        }
    }
}

impl std::error::Error for DecodeError {}

/// Bounds on how much audio the decode loop will produce.
#[derive(Debug, Clone, Copy, Default)]
pub struct DecodeLimits {
    /// Stop decoding after this many seconds of audio. `None` decodes the
    /// whole stream, which is what integrated loudness wants.
    pub max_secs: Option<u64>,
}

impl DecodeLimits {
    pub fn none() -> Self {
        Self { max_secs: None }
    }

    pub fn seconds(secs: u64) -> Self {
        Self {
            max_secs: Some(secs),
        }
    }
}

/// Decoded PCM audio, split into left/right channels.
///
/// Mono sources duplicate the single channel into `right` so analyzers can
/// index both sides uniformly; `channels` records the true source count and
/// is what the stereo analyzer keys its mono short-circuit on. Channels
/// beyond the first two are ignored.
#[derive(Debug, Clone)]
pub struct DecodedAudio {
    pub left: Vec<f64>,
    pub right: Vec<f64>,
    pub sample_rate: u32,
    pub channels: usize,
    pub duration_secs: f64,
}

impl DecodedAudio {
    /// Construct directly from sample vectors, mainly for tests and
    /// in-memory analysis. Mono input (empty `right`) gets the left channel
    /// mirrored, matching what the decoder does.
    pub fn from_channels(left: Vec<f64>, right: Vec<f64>, sample_rate: u32) -> Self {
        let channels = if right.is_empty() { 1 } else { 2 };
        let right = if right.is_empty() {
            left.clone()
        } else {
            right
        };
        let duration_secs = if sample_rate > 0 {
            left.len() as f64 / sample_rate as f64
        } else {
            0.0
        };
        Self {
            left,
            right,
            sample_rate,
            channels,
            duration_secs,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.left.is_empty()
    }
}

/// Decode encoded audio bytes into per-channel PCM.
///
/// The format is auto-detected; no file-extension hint is given so a
/// mislabeled file still decodes as whatever it actually is.
pub fn decode_bytes(data: &[u8], limits: DecodeLimits) -> Result<DecodedAudio, DecodeError> {
    let cursor = std::io::Cursor::new(data.to_vec());
    let mss = MediaSourceStream::new(Box::new(cursor), Default::default());

    let hint = Hint::new();
    let format_opts = FormatOptions::default();
    let metadata_opts = MetadataOptions::default();
    let decoder_opts = DecoderOptions::default();

    let probed = symphonia::default::get_probe()
        .format(&hint, mss, &format_opts, &metadata_opts)
        .map_err(|_| DecodeError::UnrecognizedFormat)?;

    let mut format = probed.format;
    let track = format.default_track().ok_or(DecodeError::NoAudioTrack)?;
    let track_id = track.id;
    let sample_rate = track
        .codec_params
        .sample_rate
        .unwrap_or(FALLBACK_SAMPLE_RATE);

    let mut decoder = symphonia::default::get_codecs()
        .make(&track.codec_params, &decoder_opts)
        .map_err(|_| DecodeError::UnsupportedCodec)?;

    let mut left = Vec::new();
    let mut right = Vec::new();
    let mut sample_buf: Option<SampleBuffer<f32>> = None;
    let mut detected_channels = 1usize;

    let max_samples = limits
        .max_secs
        .map(|s| s as usize * sample_rate as usize)
        .unwrap_or(usize::MAX);

    loop {
        let packet = match format.next_packet() {
            Ok(p) => p,
            Err(_) => break,
        };

        if packet.track_id() != track_id {
            continue;
        }

        let decoded = match decoder.decode(&packet) {
            Ok(d) => d,
            Err(_) => continue,
        };

        if sample_buf.is_none() {
            let spec = *decoded.spec();
            let duration = decoded.capacity() as u64;
            sample_buf = Some(SampleBuffer::new(duration, spec));
        }

        if let Some(ref mut buf) = sample_buf {
            let channel_count = decoded.spec().channels.count();
            detected_channels = channel_count;
            buf.copy_interleaved_ref(decoded);

            for chunk in buf.samples().chunks(channel_count) {
                let l = chunk[0] as f64;
                let r = if channel_count > 1 { chunk[1] as f64 } else { l };
                left.push(l);
                right.push(r);
            }

            if left.len() >= max_samples {
                left.truncate(max_samples);
                right.truncate(max_samples);
                break;
            }
        }
    }

    if left.is_empty() {
        return Err(DecodeError::EmptyStream);
    }

    let duration_secs = left.len() as f64 / sample_rate as f64;

    Ok(DecodedAudio {
        left,
        right,
        sample_rate,
        channels: detected_channels,
        duration_secs,
    })
}
