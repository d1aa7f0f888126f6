//! Audio Codec - byte-level conversions for generated speech
//!
//! base64 payload -> raw PCM -> float buffer -> raw PCM -> WAV container.

mod base64_codec;
mod pcm;
mod wav;

pub use base64_codec::{decode, decode_audio, encode};
pub use pcm::{
    decode_pcm16, encode_pcm16, RawAudioBytes, PCM16_DECODE_SCALE, PCM16_ENCODE_SCALE,
    SPEECH_SAMPLE_RATE,
};
pub use wav::{buffer_to_wav, write_wav, write_wav_pcm16, WavBlob, WAV_HEADER_LEN, WAV_MIME_TYPE};
