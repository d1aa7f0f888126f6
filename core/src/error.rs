//! Error kinds shared by the decode / mix / encode pipeline.

/// Violations of the [`AudioBuffer`](crate::AudioBuffer) invariants.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum BufferError {
    #[error("sample rate must be a positive integer")]
    ZeroSampleRate,

    #[error("audio buffer needs at least one channel")]
    NoChannels,

    #[error("channel {channel} has {found} samples, expected {expected}")]
    ChannelLengthMismatch {
        channel: usize,
        expected: usize,
        found: usize,
    },
}

/// Malformed input on the way into the pipeline.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("malformed base64 payload: {0}")]
    Base64(String),

    #[error("invalid PCM payload: {0}")]
    Pcm(String),

    #[error("could not decode audio container: {0}")]
    Container(String),

    #[error("decoded audio contains no samples")]
    Empty,

    #[error(transparent)]
    Buffer(#[from] BufferError),
}

/// A music asset could not be resolved or read.
#[derive(thiserror::Error, Debug)]
pub enum FetchError {
    #[error("unknown music track '{0}'")]
    UnknownTrack(String),

    #[error("unsupported asset locator '{0}'")]
    UnsupportedScheme(String),

    #[error("asset '{locator}' not found")]
    NotFound { locator: String },

    #[error("failed to read asset '{locator}': {source}")]
    Io {
        locator: String,
        #[source]
        source: std::io::Error,
    },
}

/// Mixing failed; callers fall back to unmixed playback/download.
#[derive(thiserror::Error, Debug)]
pub enum MixError {
    #[error("music fetch failed: {0}")]
    Fetch(#[from] FetchError),

    #[error("audio decode failed: {0}")]
    Decode(#[from] DecodeError),
}

/// Serialization refused to emit bytes that would be corrupt.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum EncodeError {
    #[error("sample {index} is not a finite number")]
    NonFiniteSample { index: usize },

    #[error("invalid WAV format: {0}")]
    InvalidFormat(String),

    #[error("PCM payload of {0} bytes does not fit in a WAV container")]
    PayloadTooLarge(usize),
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown mode '{0}'")]
pub struct UnknownModeError(pub String);
