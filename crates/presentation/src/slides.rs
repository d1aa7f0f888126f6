use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::PresentationError;

pub const SLIDE_IMAGE_MIME_TYPE: &str = "image/jpeg";

/// One section of a generated pitch, as returned by the script request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct PresentationSlideData {
    pub section_title: String,
    pub script: String,
    pub image_prompt: String,
}

/// A slide plus its illustration, once (and if) one was generated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresentationSlide {
    #[serde(flatten)]
    pub data: PresentationSlideData,
    /// Base64 JPEG. `None` keeps the placeholder.
    pub image_base64: Option<String>,
}

impl PresentationSlide {
    pub fn pending(data: PresentationSlideData) -> Self {
        Self {
            data,
            image_base64: None,
        }
    }

    pub fn has_image(&self) -> bool {
        self.image_base64.is_some()
    }

    pub fn image_data_url(&self) -> Option<String> {
        self.image_base64
            .as_ref()
            .map(|b64| format!("data:{SLIDE_IMAGE_MIME_TYPE};base64,{b64}"))
    }
}

/// Parse the JSON array of slides produced by the script request.
pub fn parse_slides(json: &str) -> Result<Vec<PresentationSlideData>, PresentationError> {
    let slides: Vec<PresentationSlideData> = serde_json::from_str(json.trim())?;
    if slides.is_empty() {
        return Err(PresentationError::NoSlides);
    }
    Ok(slides)
}

/// All slide scripts, separated by a blank line, ready for speech synthesis.
pub fn narration_script(slides: &[PresentationSlideData]) -> String {
    slides
        .iter()
        .map(|s| s.script.as_str())
        .collect::<Vec<_>>()
        .join("\n\n")
}
