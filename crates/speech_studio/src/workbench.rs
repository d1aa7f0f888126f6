use std::sync::{Arc, Mutex};

use audio_output::{AudioPlayer, PlaybackEnd, PlayerState};
use galileo_core::{AppMode, TextRequest};
use presentation::{
    generate_slide_images, narration_script, parse_slides, PresentationSlide, SlideTimeline,
};

use crate::error::StudioError;
use crate::studio::{MusicChoice, PlaybackTarget, RenderOutcome, RenderRequest, SpeechStudio};

/// Most frames a video analysis request may carry.
pub const MAX_VIDEO_FRAMES: usize = 30;

/// Voice used to narrate generated pitches.
pub const PITCH_VOICE: &str = "Kore";

/// One invocation of a studio tool.
#[derive(Debug, Clone, PartialEq)]
pub enum ToolRequest {
    Pitch {
        topic: String,
    },
    ImageAnalysis {
        image_base64: String,
        mime_type: String,
        prompt: String,
    },
    VideoAnalysis {
        frames_base64: Vec<String>,
        prompt: String,
    },
    QuickAnswer {
        prompt: String,
    },
    TextToSpeech {
        text: String,
        voice: Option<String>,
        music: MusicChoice,
    },
}

impl ToolRequest {
    pub fn mode(&self) -> AppMode {
        match self {
            ToolRequest::Pitch { .. } => AppMode::PitchGenerator,
            ToolRequest::ImageAnalysis { .. } => AppMode::ImageAnalyzer,
            ToolRequest::VideoAnalysis { .. } => AppMode::VideoAnalyzer,
            ToolRequest::QuickAnswer { .. } => AppMode::QuickAnswer,
            ToolRequest::TextToSpeech { .. } => AppMode::TextToSpeech,
        }
    }
}

#[derive(Debug, Clone)]
pub struct PitchOutcome {
    pub landing_page_html: String,
    pub slides: Vec<PresentationSlide>,
    pub timeline: SlideTimeline,
    pub render: RenderOutcome,
}

impl PitchOutcome {
    /// Slide to show `secs` into the narration.
    pub fn slide_at(&self, secs: f64) -> Option<&PresentationSlide> {
        self.timeline.slide_at(secs).and_then(|i| self.slides.get(i))
    }
}

#[derive(Debug, Clone)]
pub enum ToolOutcome {
    Pitch(Box<PitchOutcome>),
    Text(String),
    Speech(RenderOutcome),
}

/// Runs tools one at a time against a single studio and player.
pub struct Workbench {
    studio: SpeechStudio,
    player: AudioPlayer,
    last_end: Arc<Mutex<Option<PlaybackEnd>>>,
}

impl Workbench {
    pub fn new(studio: SpeechStudio, player: AudioPlayer) -> Self {
        Self {
            studio,
            player,
            last_end: Arc::new(Mutex::new(None)),
        }
    }

    pub fn studio(&self) -> &SpeechStudio {
        &self.studio
    }

    pub fn player_state(&self) -> PlayerState {
        self.player.state()
    }

    /// How the most recent playback session ended, if one has.
    pub fn last_playback_end(&self) -> Option<PlaybackEnd> {
        *self.last_end.lock().unwrap_or_else(|p| p.into_inner())
    }

    pub fn stop_playback(&mut self) -> bool {
        self.player.stop()
    }

    pub async fn run(&mut self, request: ToolRequest) -> Result<ToolOutcome, StudioError> {
        let mode = request.mode();
        log::info!("Workbench: running {}", mode.label());
        let outcome = match request {
            ToolRequest::Pitch { topic } => {
                ToolOutcome::Pitch(Box::new(self.pitch(&topic).await?))
            }
            ToolRequest::ImageAnalysis {
                image_base64,
                mime_type,
                prompt,
            } => {
                if image_base64.is_empty() || prompt.trim().is_empty() {
                    return Err(invalid("Please upload an image and provide a prompt."));
                }
                ToolOutcome::Text(
                    self.text(TextRequest::ImageAnalysis {
                        image_base64,
                        mime_type,
                        prompt,
                    })
                    .await?,
                )
            }
            ToolRequest::VideoAnalysis {
                frames_base64,
                prompt,
            } => {
                if frames_base64.is_empty() || prompt.trim().is_empty() {
                    return Err(invalid("Please upload a video and provide a prompt."));
                }
                if frames_base64.len() > MAX_VIDEO_FRAMES {
                    return Err(StudioError::TooManyFrames {
                        count: frames_base64.len(),
                        max: MAX_VIDEO_FRAMES,
                    });
                }
                ToolOutcome::Text(
                    self.text(TextRequest::VideoAnalysis {
                        frames_base64,
                        prompt,
                    })
                    .await?,
                )
            }
            ToolRequest::QuickAnswer { prompt } => {
                if prompt.trim().is_empty() {
                    return Err(invalid("Please enter a question."));
                }
                ToolOutcome::Text(self.text(TextRequest::QuickAnswer { prompt }).await?)
            }
            ToolRequest::TextToSpeech { text, voice, music } => {
                ToolOutcome::Speech(self.text_to_speech(&text, voice.as_deref(), music).await?)
            }
        };
        log::info!("Workbench: {} done", mode.label());
        Ok(outcome)
    }

    async fn text(&self, request: TextRequest) -> Result<String, StudioError> {
        self.studio
            .service()
            .generate_text(request)
            .await
            .map_err(StudioError::generation)
    }

    async fn pitch(&self, topic: &str) -> Result<PitchOutcome, StudioError> {
        if topic.trim().is_empty() {
            return Err(invalid("Please provide a topic for your pitch."));
        }
        let service = self.studio.service();

        let landing_page_html = self
            .text(TextRequest::LandingPage {
                topic: topic.to_string(),
            })
            .await?;
        let script_json = self
            .text(TextRequest::PresentationScript {
                landing_page_html: landing_page_html.clone(),
            })
            .await?;
        let slide_data = parse_slides(&script_json)?;
        log::info!("Workbench: pitch has {} slides", slide_data.len());

        let narration = narration_script(&slide_data);
        let (slides, speech) = futures::join!(
            generate_slide_images(service.as_ref(), slide_data),
            self.studio.synthesize(&narration, PITCH_VOICE)
        );

        let render = self
            .studio
            .render(
                RenderRequest {
                    speech: speech?,
                    voice: PITCH_VOICE.to_string(),
                    music: MusicChoice::None,
                },
                None,
            )
            .await?;

        let scripts: Vec<&str> = slides.iter().map(|s| s.data.script.as_str()).collect();
        let timeline = SlideTimeline::new(&scripts, render.buffer.duration_secs())?;

        Ok(PitchOutcome {
            landing_page_html,
            slides,
            timeline,
            render,
        })
    }

    async fn text_to_speech(
        &mut self,
        text: &str,
        voice: Option<&str>,
        music: MusicChoice,
    ) -> Result<RenderOutcome, StudioError> {
        let voice = self.studio.resolve_voice(voice)?;
        let speech = self.studio.synthesize(text, &voice).await?;

        let last_end = self.last_end.clone();
        let on_complete = Box::new(move |end: PlaybackEnd| {
            log::debug!("Workbench: playback ended ({:?})", end);
            *last_end.lock().unwrap_or_else(|p| p.into_inner()) = Some(end);
        });

        self.studio
            .render(
                RenderRequest {
                    speech,
                    voice,
                    music,
                },
                Some(PlaybackTarget {
                    player: &mut self.player,
                    on_complete,
                }),
            )
            .await
    }
}

fn invalid(message: &str) -> StudioError {
    StudioError::InvalidInput(message.to_string())
}
