use std::sync::Arc;

use audio_codec::{buffer_to_wav, decode_audio, decode_pcm16, write_wav_pcm16, RawAudioBytes};
use audio_mix::{
    AssetFetcher, FsAssetFetcher, MixRequest, Mixer, MusicCatalog, MusicDecoder, SymphoniaDecoder,
    MAX_GAIN,
};
use audio_output::{AudioPlayer, CompletionCallback};
use downloads::{download_filename, DownloadRegistry};
use galileo_config::StudioSettings;
use galileo_core::generation::speech_markup;
use galileo_core::{AudioBuffer, GenerationService, MixError, ResourceHandle};

use crate::error::StudioError;

/// Whether to lay a music bed under the speech.
#[derive(Debug, Clone, PartialEq)]
pub enum MusicChoice {
    None,
    Track { id: String, gain: f32 },
}

#[derive(Debug, Clone)]
pub struct RenderRequest {
    pub speech: RawAudioBytes,
    pub voice: String,
    pub music: MusicChoice,
}

/// Where to play a rendered buffer, and who to tell when it ends.
pub struct PlaybackTarget<'a> {
    pub player: &'a mut AudioPlayer,
    pub on_complete: CompletionCallback,
}

#[derive(Debug, Clone)]
pub struct RenderOutcome {
    /// What was (or would be) played: the speech, or the speech with music.
    pub buffer: AudioBuffer,
    pub filename: String,
    pub download: ResourceHandle,
    pub wav_len: usize,
    /// Track id actually mixed in.
    pub mixed_with: Option<String>,
    /// Why mixing was skipped, when music was requested but could not be used.
    pub fallback: Option<String>,
    pub session: Option<u64>,
}

/// Turns generated speech into a playable buffer and a downloadable WAV.
pub struct SpeechStudio {
    service: Arc<dyn GenerationService>,
    mixer: Mixer,
    catalog: MusicCatalog,
    downloads: Arc<DownloadRegistry>,
    speech_sample_rate: u32,
    voices: Vec<String>,
    default_voice: String,
    download_prefix: String,
}

impl SpeechStudio {
    pub fn new(
        settings: &StudioSettings,
        service: Arc<dyn GenerationService>,
        fetcher: Arc<dyn AssetFetcher>,
        decoder: Arc<dyn MusicDecoder>,
    ) -> Self {
        Self {
            service,
            mixer: Mixer::new(fetcher, decoder).with_speech_sample_rate(settings.speech_sample_rate),
            catalog: MusicCatalog::new(settings.music.clone()),
            downloads: Arc::new(DownloadRegistry::new()),
            speech_sample_rate: settings.speech_sample_rate,
            voices: settings.voices.clone(),
            default_voice: settings.default_voice.clone(),
            download_prefix: settings.download_prefix.clone(),
        }
    }

    /// Music from `settings.assets_dir`, decoded with symphonia.
    pub fn from_settings(settings: &StudioSettings, service: Arc<dyn GenerationService>) -> Self {
        Self::new(
            settings,
            service,
            Arc::new(FsAssetFetcher::new(&settings.assets_dir)),
            Arc::new(SymphoniaDecoder::new()),
        )
    }

    pub fn service(&self) -> Arc<dyn GenerationService> {
        self.service.clone()
    }

    pub fn catalog(&self) -> &MusicCatalog {
        &self.catalog
    }

    pub fn downloads(&self) -> Arc<DownloadRegistry> {
        self.downloads.clone()
    }

    pub fn voices(&self) -> &[String] {
        &self.voices
    }

    pub fn default_voice(&self) -> &str {
        &self.default_voice
    }

    pub fn speech_sample_rate(&self) -> u32 {
        self.speech_sample_rate
    }

    /// The requested voice, or the default one. Unknown voices are refused.
    pub fn resolve_voice(&self, voice: Option<&str>) -> Result<String, StudioError> {
        match voice.map(str::trim).filter(|v| !v.is_empty()) {
            None => Ok(self.default_voice.clone()),
            Some(v) => self
                .voices
                .iter()
                .find(|known| known.eq_ignore_ascii_case(v))
                .cloned()
                .ok_or_else(|| StudioError::UnknownVoice(v.to_string())),
        }
    }

    /// Ask the service for speech and decode its base64 payload.
    pub async fn synthesize(&self, text: &str, voice: &str) -> Result<RawAudioBytes, StudioError> {
        if text.trim().is_empty() {
            return Err(StudioError::InvalidInput(
                "Please enter some text to synthesize.".to_string(),
            ));
        }
        let payload = self
            .service
            .generate_speech(&speech_markup(text), voice)
            .await
            .map_err(StudioError::generation)?
            .ok_or(StudioError::NoAudio)?;
        Ok(decode_audio(&payload)?)
    }

    /// Decode, optionally mix, optionally play, then publish the download.
    ///
    /// Music that cannot be fetched or decoded does not fail the render: the
    /// plain speech is used instead and `fallback` says why. Any error leaves the
    /// previously published download in place.
    pub async fn render(
        &self,
        request: RenderRequest,
        playback: Option<PlaybackTarget<'_>>,
    ) -> Result<RenderOutcome, StudioError> {
        let RenderRequest {
            speech,
            voice,
            music,
        } = request;
        log::info!(
            "SpeechStudio: rendering {} speech samples ({:?})",
            speech.sample_count(),
            music
        );

        let mut fallback = None;
        let mixed = match music {
            MusicChoice::None => None,
            MusicChoice::Track { id, gain } => {
                if !(0.0..=MAX_GAIN).contains(&gain) {
                    return Err(StudioError::GainOutOfRange(gain));
                }
                match self.mix(&speech, &id, gain).await {
                    Ok(buffer) => Some((id, buffer)),
                    Err(e) => {
                        log::warn!("SpeechStudio: mixing '{}' failed, using plain speech: {}", id, e);
                        fallback = Some(e.to_string());
                        None
                    }
                }
            }
        };

        let (buffer, wav, mixed_with) = match mixed {
            Some((id, buffer)) => {
                let wav = buffer_to_wav(&buffer)?;
                (buffer, wav, Some(id))
            }
            None => {
                let buffer = decode_pcm16(&speech, self.speech_sample_rate)?;
                let wav = write_wav_pcm16(&speech, self.speech_sample_rate, 1)?;
                (buffer, wav, None)
            }
        };

        let session = match playback {
            Some(PlaybackTarget {
                player,
                on_complete,
            }) => Some(
                player
                    .play(buffer.clone(), on_complete)
                    .map_err(|e| StudioError::Playback(format!("{e:#}")))?,
            ),
            None => None,
        };

        let filename = download_filename(&self.download_prefix, &voice, mixed_with.as_deref());
        let wav_len = wav.len();
        let download = self.downloads.publish(filename.clone(), wav);
        log::info!(
            "SpeechStudio: {} ready ({} samples, {:.2}s)",
            filename,
            buffer.len(),
            buffer.duration_secs()
        );

        Ok(RenderOutcome {
            buffer,
            filename,
            download,
            wav_len,
            mixed_with,
            fallback,
            session,
        })
    }

    async fn mix(&self, speech: &RawAudioBytes, id: &str, gain: f32) -> Result<AudioBuffer, MixError> {
        let track = self.catalog.get(id)?.clone();
        self.mixer
            .mix(MixRequest {
                speech: speech.clone(),
                track,
                gain,
            })
            .await
    }
}
