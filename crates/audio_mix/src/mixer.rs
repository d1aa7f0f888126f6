use std::sync::Arc;

use audio_codec::{decode_pcm16, RawAudioBytes, SPEECH_SAMPLE_RATE};
use galileo_core::music::locator_extension;
use galileo_core::{AudioBuffer, DecodeError, MixError, MusicTrack};

use crate::decoder::MusicDecoder;
use crate::fetch::AssetFetcher;
use crate::resample::{loop_to_length, resample_linear};

/// Largest music gain that keeps speech intelligible. Enforced by callers.
pub const MAX_GAIN: f32 = 0.5;

/// One "mix this speech with that track" action. Consumed by [`Mixer::mix`].
#[derive(Debug, Clone)]
pub struct MixRequest {
    pub speech: RawAudioBytes,
    pub track: MusicTrack,
    pub gain: f32,
}

/// Lay `music` under `speech` at `gain`.
///
/// The result is mono, at the speech rate, and exactly as long as the speech.
/// Music is downmixed, resampled to the speech rate, then looped or truncated.
pub fn mix_buffers(
    speech: &AudioBuffer,
    music: &AudioBuffer,
    gain: f32,
) -> Result<AudioBuffer, MixError> {
    if music.is_empty() {
        return Err(DecodeError::Empty.into());
    }

    let voice = speech.to_mono();
    let bed = resample_linear(&music.to_mono(), music.sample_rate(), speech.sample_rate());
    let bed = loop_to_length(&bed, voice.len());

    let mixed = voice
        .iter()
        .zip(&bed)
        .map(|(s, m)| (s + m * gain).clamp(-1.0, 1.0))
        .collect();
    Ok(speech.with_mono_samples(mixed))
}

/// Fetches, decodes and mixes music beds under generated speech.
pub struct Mixer {
    fetcher: Arc<dyn AssetFetcher>,
    decoder: Arc<dyn MusicDecoder>,
    speech_sample_rate: u32,
}

impl Mixer {
    pub fn new(fetcher: Arc<dyn AssetFetcher>, decoder: Arc<dyn MusicDecoder>) -> Self {
        Self {
            fetcher,
            decoder,
            speech_sample_rate: SPEECH_SAMPLE_RATE,
        }
    }

    pub fn with_speech_sample_rate(mut self, sample_rate: u32) -> Self {
        self.speech_sample_rate = sample_rate;
        self
    }

    pub fn speech_sample_rate(&self) -> u32 {
        self.speech_sample_rate
    }

    pub async fn mix(&self, request: MixRequest) -> Result<AudioBuffer, MixError> {
        log::debug!(
            "Mixer: mixing '{}' at gain {:.2}",
            request.track.id(),
            request.gain
        );
        self.mix_locator(&request.speech, request.track.source(), request.gain)
            .await
    }

    pub async fn mix_locator(
        &self,
        speech: &RawAudioBytes,
        locator: &str,
        gain: f32,
    ) -> Result<AudioBuffer, MixError> {
        let speech = decode_pcm16(speech, self.speech_sample_rate)?;
        let music = self.load_music(locator).await?;
        let mixed = mix_buffers(&speech, &music, gain)?;
        log::info!(
            "Mixer: {} speech samples mixed with {} music samples at {} Hz",
            mixed.len(),
            music.len(),
            music.sample_rate()
        );
        Ok(mixed)
    }

    /// Fetch and decode a music asset at its native format.
    pub async fn load_music(&self, locator: &str) -> Result<AudioBuffer, MixError> {
        let bytes = self.fetcher.fetch(locator).await?;
        Ok(self.decoder.decode(bytes, locator_extension(locator))?)
    }
}
