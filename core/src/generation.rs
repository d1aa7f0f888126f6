//! Contract of the remote generation service (text, speech, images).
//!
//! The studio never talks to the network itself; a host supplies an
//! implementation of [`GenerationService`]. The request helpers below describe
//! how each request is phrased so every implementation sends the same prompts.

use async_trait::async_trait;

/// Instruction used when turning a topic into landing-page copy.
pub const LANDING_PAGE_INSTRUCTION: &str = "You are a world-class business consultant. Your task is to produce a concise, powerful, single-page website copy for the given topic, structured with simple HTML tags (<h1>, <h2>, <p>, <ul>, <li>, <strong>, <em>). The content should be persuasive, highlighting the value proposition, key features, market opportunity, and a clear call to action. It must be designed to capture an investor's interest immediately. Do not include <head>, <body>, or <html> tags.";

/// Instruction used when structuring landing-page copy into presentation slides.
pub const PITCH_SYSTEM_PROMPT: &str = r#"You are **Galileo**, a world-class business and technology consultant. Your expertise lies in distilling complex ideas into compelling, investor-ready presentations.

## YOUR TASK
You will be given a concept or topic and a piece of landing page HTML. Your goal is to produce a structured JSON output that forms the basis of a 10-minute audiovisual presentation.

## OUTPUT FORMAT
Your entire output MUST be a single JSON array. Each object in the array represents a "slide" or "section" of the presentation. The array should contain between 8 and 12 slide objects to properly fill a 10-minute presentation.

Each slide object MUST have the following three properties:
1.  **"sectionTitle"**: A concise, engaging title for this section.
2.  **"script"**: A detailed, narrative-driven script for this section, written in a conversational tone suitable for an audio presentation. The combined scripts for all slides should total approximately 1500-1600 words.
3.  **"imagePrompt"**: A visually rich, highly descriptive prompt for an image generation model describing a realistic, professional scene that represents the script.

## GUIDELINES
-   **Structure**: Introduction, Problem, Solution, Key Features, Market Opportunity, Business Model, Team, Call to Action.
-   **Content**: Base the content on the provided landing page HTML, but expand upon it significantly.
-   **JSON Validity**: Ensure the final output is a perfectly valid JSON array and nothing else.
"#;

const VIDEO_FRAMES_PREAMBLE: &str = "Here are the frames from the video:";

/// A text-producing request, one variant per tool that needs one.
#[derive(Debug, Clone, PartialEq)]
pub enum TextRequest {
    LandingPage {
        topic: String,
    },
    PresentationScript {
        landing_page_html: String,
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
}

impl TextRequest {
    /// Model the request is meant for.
    pub fn model(&self) -> &'static str {
        match self {
            TextRequest::LandingPage { .. }
            | TextRequest::PresentationScript { .. }
            | TextRequest::VideoAnalysis { .. } => "gemini-2.5-pro",
            TextRequest::ImageAnalysis { .. } => "gemini-2.5-flash",
            TextRequest::QuickAnswer { .. } => "gemini-flash-lite-latest",
        }
    }

    pub fn system_instruction(&self) -> Option<&'static str> {
        match self {
            TextRequest::LandingPage { .. } => Some(LANDING_PAGE_INSTRUCTION),
            TextRequest::PresentationScript { .. } => Some(PITCH_SYSTEM_PROMPT),
            _ => None,
        }
    }

    /// Whether the service must answer with a JSON document.
    pub fn expects_json(&self) -> bool {
        matches!(self, TextRequest::PresentationScript { .. })
    }

    /// The user-facing text part of the request.
    pub fn contents(&self) -> String {
        match self {
            TextRequest::LandingPage { topic } => {
                format!("Generate the landing page HTML for the following topic: {topic}")
            }
            TextRequest::PresentationScript { landing_page_html } => format!(
                "Based on the following landing page HTML, generate the structured presentation JSON:\n\n{landing_page_html}"
            ),
            TextRequest::ImageAnalysis { prompt, .. } | TextRequest::QuickAnswer { prompt } => {
                prompt.clone()
            }
            TextRequest::VideoAnalysis { prompt, .. } => {
                format!("{prompt}\n{VIDEO_FRAMES_PREAMBLE}")
            }
        }
    }
}

/// Wraps an image prompt the way the slide generator phrases it.
pub fn slide_image_prompt(prompt: &str) -> String {
    format!("cinematic, professional, high-resolution photograph of: {prompt}")
}

/// Wraps narration text in the speech markup the speech model expects.
pub fn speech_markup(text: &str) -> String {
    format!("<speak>{text}</speak>")
}

/// External collaborator producing text, speech and images.
///
/// Speech is returned as base64 of headerless 16-bit little-endian mono PCM at
/// 24 kHz; images as base64 JPEG. `Ok(None)` means the service answered
/// without a payload.
#[async_trait]
pub trait GenerationService: Send + Sync {
    async fn generate_text(&self, request: TextRequest) -> anyhow::Result<String>;

    /// `text` arrives already wrapped with [`speech_markup`].
    async fn generate_speech(&self, text: &str, voice: &str) -> anyhow::Result<Option<String>>;

    async fn generate_image(&self, prompt: &str) -> anyhow::Result<Option<String>>;
}
