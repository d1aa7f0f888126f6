use std::io::Cursor;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use audio_codec::{buffer_to_wav, encode, RawAudioBytes, WAV_HEADER_LEN};
use audio_mix::{MemoryAssetFetcher, SymphoniaDecoder};
use audio_output::{AudioPlayer, NullBackend, PlaybackEnd, PlayerState};
use galileo_config::StudioSettings;
use galileo_core::{AudioBuffer, GenerationService, MusicTrack, TextRequest};
use speech_studio::{
    MusicChoice, RenderRequest, SpeechStudio, StudioError, ToolOutcome, ToolRequest, Workbench,
    MAX_VIDEO_FRAMES,
};

const SCRIPT_JSON: &str = r#"[
    {"sectionTitle": "Intro", "script": "one two", "imagePrompt": "sunrise"},
    {"sectionTitle": "Problem", "script": "three four five six", "imagePrompt": "broken kite"},
    {"sectionTitle": "Ask", "script": "seven eight", "imagePrompt": "handshake"}
]"#;

/// Canned answers; records what it was asked to speak.
#[derive(Default)]
struct FakeService {
    speech_samples: usize,
    silent: bool,
    spoken: Mutex<Vec<(String, String)>>,
    text_requests: Mutex<Vec<TextRequest>>,
}

impl FakeService {
    fn speaking(samples: usize) -> Self {
        Self {
            speech_samples: samples,
            ..Default::default()
        }
    }
}

#[async_trait]
impl GenerationService for FakeService {
    async fn generate_text(&self, request: TextRequest) -> anyhow::Result<String> {
        self.text_requests.lock().unwrap().push(request.clone());
        Ok(match request {
            TextRequest::LandingPage { topic } => format!("<h1>{topic}</h1>"),
            TextRequest::PresentationScript { .. } => SCRIPT_JSON.to_string(),
            other => format!("answer: {}", other.contents()),
        })
    }

    async fn generate_speech(&self, text: &str, voice: &str) -> anyhow::Result<Option<String>> {
        self.spoken
            .lock()
            .unwrap()
            .push((text.to_string(), voice.to_string()));
        if self.silent {
            return Ok(None);
        }
        Ok(Some(encode(&speech_pcm(self.speech_samples))))
    }

    async fn generate_image(&self, prompt: &str) -> anyhow::Result<Option<String>> {
        if prompt.contains("broken") {
            anyhow::bail!("image quota exceeded");
        }
        Ok(Some("/9j/AAAA".to_string()))
    }
}

fn speech_pcm(samples: usize) -> Vec<u8> {
    (0..samples)
        .flat_map(|i| (((i % 200) as i16 - 100) * 50).to_le_bytes())
        .collect()
}

fn settings() -> StudioSettings {
    StudioSettings {
        music: vec![MusicTrack::new("bed", "Bed", "music/bed.wav")],
        ..Default::default()
    }
}

fn music_fetcher() -> Arc<MemoryAssetFetcher> {
    let bed = AudioBuffer::mono(44_100, vec![0.1; 44_100]).unwrap();
    let wav = buffer_to_wav(&bed).unwrap();
    Arc::new(MemoryAssetFetcher::new().with_asset("music/bed.wav", wav.into_bytes()))
}

fn studio(service: FakeService) -> (SpeechStudio, Arc<FakeService>) {
    let service = Arc::new(service);
    let studio = SpeechStudio::new(
        &settings(),
        service.clone(),
        music_fetcher(),
        Arc::new(SymphoniaDecoder::new()),
    );
    (studio, service)
}

fn request(samples: usize, music: MusicChoice) -> RenderRequest {
    RenderRequest {
        speech: RawAudioBytes::new(speech_pcm(samples)),
        voice: "Kore".to_string(),
        music,
    }
}

#[tokio::test]
async fn test_direct_path_wraps_pcm_unchanged() {
    let (studio, _) = studio(FakeService::default());
    let outcome = studio
        .render(request(2_400, MusicChoice::None), None)
        .await
        .unwrap();

    assert_eq!(outcome.filename, "galileo-speech-kore.wav");
    assert_eq!(outcome.mixed_with, None);
    assert_eq!(outcome.fallback, None);
    assert_eq!(outcome.session, None);
    assert_eq!(outcome.buffer.len(), 2_400);

    let download = studio.downloads().get(outcome.download).unwrap();
    let bytes = download.blob.as_bytes();
    assert_eq!(bytes.len(), WAV_HEADER_LEN + 4_800);
    assert_eq!(&bytes[WAV_HEADER_LEN..], speech_pcm(2_400).as_slice());

    let reader = hound::WavReader::new(Cursor::new(bytes.to_vec())).unwrap();
    assert_eq!(reader.spec().sample_rate, 24_000);
    assert_eq!(reader.spec().channels, 1);
}

#[tokio::test]
async fn test_mixed_path_keeps_speech_length() {
    let (studio, _) = studio(FakeService::default());
    let outcome = studio
        .render(
            request(
                48_000,
                MusicChoice::Track {
                    id: "bed".into(),
                    gain: 0.2,
                },
            ),
            None,
        )
        .await
        .unwrap();

    assert_eq!(outcome.mixed_with.as_deref(), Some("bed"));
    assert_eq!(outcome.filename, "galileo-speech-kore-bed.wav");
    assert_eq!(outcome.buffer.len(), 48_000);
    assert_eq!(outcome.buffer.sample_rate(), 24_000);
    assert_eq!(outcome.wav_len, WAV_HEADER_LEN + 96_000);
    // first sample is -100*50 quantized, plus the bed at 0.2 gain
    let expected = -5_000.0 / 32_768.0 + 0.1 * 0.2;
    assert!((outcome.buffer.channel(0).unwrap()[0] - expected).abs() < 1e-3);
}

#[tokio::test]
async fn test_unknown_track_falls_back_to_plain_speech() {
    let (studio, _) = studio(FakeService::default());
    let outcome = studio
        .render(
            request(
                1_000,
                MusicChoice::Track {
                    id: "polka".into(),
                    gain: 0.3,
                },
            ),
            None,
        )
        .await
        .unwrap();

    assert_eq!(outcome.mixed_with, None);
    assert!(outcome.fallback.unwrap().contains("polka"));
    assert_eq!(outcome.filename, "galileo-speech-kore.wav");
    assert_eq!(outcome.wav_len, WAV_HEADER_LEN + 2_000);
}

#[tokio::test]
async fn test_rejected_render_keeps_previous_download() {
    let (studio, _) = studio(FakeService::default());
    let first = studio
        .render(request(100, MusicChoice::None), None)
        .await
        .unwrap();

    let err = studio
        .render(
            request(
                100,
                MusicChoice::Track {
                    id: "bed".into(),
                    gain: 0.8,
                },
            ),
            None,
        )
        .await
        .unwrap_err();
    assert!(matches!(err, StudioError::GainOutOfRange(g) if g == 0.8));

    let (handle, current) = studio.downloads().current().unwrap();
    assert_eq!(handle, first.download);
    assert_eq!(current.filename, "galileo-speech-kore.wav");
    assert_eq!(studio.downloads().live_count(), 1);
}

#[tokio::test]
async fn test_new_render_revokes_previous_download() {
    let (studio, _) = studio(FakeService::default());
    let first = studio
        .render(request(100, MusicChoice::None), None)
        .await
        .unwrap();
    let second = studio
        .render(request(200, MusicChoice::None), None)
        .await
        .unwrap();

    assert!(studio.downloads().get(first.download).is_none());
    assert!(studio.downloads().get(second.download).is_some());
    assert_eq!(studio.downloads().live_count(), 1);
}

#[tokio::test]
async fn test_pitch_flow_tolerates_failed_image() {
    let (studio, service) = studio(FakeService::speaking(24_000));
    let mut bench = Workbench::new(studio, AudioPlayer::new(Box::new(NullBackend::immediate())));

    let outcome = bench
        .run(ToolRequest::Pitch {
            topic: "solar kites".into(),
        })
        .await
        .unwrap();
    let ToolOutcome::Pitch(pitch) = outcome else {
        panic!("expected a pitch outcome");
    };

    assert_eq!(pitch.landing_page_html, "<h1>solar kites</h1>");
    assert_eq!(pitch.slides.len(), 3);
    assert!(pitch.slides[0].has_image());
    assert!(!pitch.slides[1].has_image());
    assert!(pitch.slides[2].has_image());

    // 8 words over one second of narration
    assert_eq!(pitch.timeline.total_secs(), 1.0);
    let t = pitch.timeline.timings();
    assert_eq!(t[0].duration_secs, 0.25);
    assert_eq!(t[1].start_secs, 0.25);
    assert_eq!(t[2].start_secs, 0.75);
    assert_eq!(pitch.slide_at(0.5).unwrap().data.section_title, "Problem");

    let spoken = service.spoken.lock().unwrap();
    assert_eq!(spoken.len(), 1);
    assert_eq!(
        spoken[0].0,
        "<speak>one two\n\nthree four five six\n\nseven eight</speak>"
    );
    assert_eq!(spoken[0].1, "Kore");

    let requests = service.text_requests.lock().unwrap();
    assert!(matches!(
        &requests[1],
        TextRequest::PresentationScript { landing_page_html } if landing_page_html == "<h1>solar kites</h1>"
    ));

    // pitches are not played through the workbench player
    assert_eq!(pitch.render.session, None);
    assert_eq!(bench.player_state(), PlayerState::Idle);
}

#[tokio::test]
async fn test_pitch_with_bad_script_fails() {
    struct NoJson;

    #[async_trait]
    impl GenerationService for NoJson {
        async fn generate_text(&self, _request: TextRequest) -> anyhow::Result<String> {
            Ok("Sorry, I cannot help with that.".into())
        }

        async fn generate_speech(&self, _text: &str, _voice: &str) -> anyhow::Result<Option<String>> {
            Ok(None)
        }

        async fn generate_image(&self, _prompt: &str) -> anyhow::Result<Option<String>> {
            Ok(None)
        }
    }

    let studio = SpeechStudio::new(
        &settings(),
        Arc::new(NoJson),
        music_fetcher(),
        Arc::new(SymphoniaDecoder::new()),
    );
    let mut bench = Workbench::new(studio, AudioPlayer::new(Box::new(NullBackend::immediate())));
    let err = bench
        .run(ToolRequest::Pitch {
            topic: "kites".into(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, StudioError::Presentation(_)));
}

#[tokio::test]
async fn test_input_validation_messages() {
    let (studio, service) = studio(FakeService::default());
    let mut bench = Workbench::new(studio, AudioPlayer::new(Box::new(NullBackend::immediate())));

    let cases = [
        (
            ToolRequest::Pitch { topic: "  ".into() },
            "Please provide a topic for your pitch.",
        ),
        (
            ToolRequest::ImageAnalysis {
                image_base64: String::new(),
                mime_type: "image/png".into(),
                prompt: "what is this?".into(),
            },
            "Please upload an image and provide a prompt.",
        ),
        (
            ToolRequest::VideoAnalysis {
                frames_base64: vec![],
                prompt: "summarize".into(),
            },
            "Please upload a video and provide a prompt.",
        ),
        (
            ToolRequest::QuickAnswer { prompt: "".into() },
            "Please enter a question.",
        ),
        (
            ToolRequest::TextToSpeech {
                text: " ".into(),
                voice: None,
                music: MusicChoice::None,
            },
            "Please enter some text to synthesize.",
        ),
    ];
    for (request, message) in cases {
        let err = bench.run(request).await.unwrap_err();
        assert_eq!(err.to_string(), message);
    }
    assert!(service.text_requests.lock().unwrap().is_empty());
    assert!(service.spoken.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_video_frame_limit() {
    let (studio, service) = studio(FakeService::default());
    let mut bench = Workbench::new(studio, AudioPlayer::new(Box::new(NullBackend::immediate())));

    let err = bench
        .run(ToolRequest::VideoAnalysis {
            frames_base64: vec!["AAAA".into(); MAX_VIDEO_FRAMES + 1],
            prompt: "summarize".into(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, StudioError::TooManyFrames { count: 31, max: 30 }));

    let out = bench
        .run(ToolRequest::VideoAnalysis {
            frames_base64: vec!["AAAA".into(); MAX_VIDEO_FRAMES],
            prompt: "summarize".into(),
        })
        .await
        .unwrap();
    let ToolOutcome::Text(answer) = out else {
        panic!("expected text");
    };
    assert!(answer.starts_with("answer: summarize"));
    assert_eq!(service.text_requests.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn test_text_to_speech_plays_and_publishes() {
    let (studio, service) = studio(FakeService::speaking(12_000));
    let mut bench = Workbench::new(studio, AudioPlayer::new(Box::new(NullBackend::immediate())));

    let out = bench
        .run(ToolRequest::TextToSpeech {
            text: "Hello kites".into(),
            voice: Some("puck".into()),
            music: MusicChoice::Track {
                id: "bed".into(),
                gain: 0.1,
            },
        })
        .await
        .unwrap();
    let ToolOutcome::Speech(render) = out else {
        panic!("expected speech");
    };

    assert_eq!(render.session, Some(1));
    assert_eq!(render.filename, "galileo-speech-puck-bed.wav");
    assert_eq!(render.buffer.len(), 12_000);
    assert_eq!(bench.last_playback_end(), Some(PlaybackEnd::Finished));
    assert_eq!(bench.player_state(), PlayerState::Idle);
    assert_eq!(service.spoken.lock().unwrap()[0].1, "Puck");
}

#[tokio::test]
async fn test_text_to_speech_errors() {
    let (studio, _) = studio(FakeService {
        silent: true,
        ..Default::default()
    });
    let mut bench = Workbench::new(studio, AudioPlayer::new(Box::new(NullBackend::immediate())));

    let err = bench
        .run(ToolRequest::TextToSpeech {
            text: "Hello".into(),
            voice: None,
            music: MusicChoice::None,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, StudioError::NoAudio));

    let err = bench
        .run(ToolRequest::TextToSpeech {
            text: "Hello".into(),
            voice: Some("Robot".into()),
            music: MusicChoice::None,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, StudioError::UnknownVoice(v) if v == "Robot"));
    assert!(bench.studio().downloads().current().is_none());
}
