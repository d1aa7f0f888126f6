use galileo_core::{DecodeError, EncodeError};
use presentation::PresentationError;

#[derive(thiserror::Error, Debug)]
pub enum StudioError {
    /// User input the tool cannot work with. The message is shown as-is.
    #[error("{0}")]
    InvalidInput(String),

    #[error("too many video frames: {count} (at most {max})")]
    TooManyFrames { count: usize, max: usize },

    #[error("unknown voice '{0}'")]
    UnknownVoice(String),

    #[error("music gain {0} is outside [0, {max}]", max = audio_mix::MAX_GAIN)]
    GainOutOfRange(f32),

    #[error("generation request failed: {0}")]
    Generation(String),

    #[error("the speech service returned no audio data")]
    NoAudio,

    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Encode(#[from] EncodeError),

    #[error(transparent)]
    Presentation(#[from] PresentationError),

    #[error("could not play the generated audio: {0}")]
    Playback(String),
}

impl StudioError {
    pub(crate) fn generation(err: anyhow::Error) -> Self {
        StudioError::Generation(format!("{err:#}"))
    }
}
