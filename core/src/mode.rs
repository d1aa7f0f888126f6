use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::UnknownModeError;

/// The tools the studio offers. Closed set; dispatch is a `match`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema, Default,
)]
#[serde(rename_all = "snake_case")]
pub enum AppMode {
    #[default]
    PitchGenerator,
    ImageAnalyzer,
    VideoAnalyzer,
    QuickAnswer,
    #[serde(rename = "tts")]
    TextToSpeech,
}

impl AppMode {
    pub const ALL: [AppMode; 5] = [
        AppMode::PitchGenerator,
        AppMode::ImageAnalyzer,
        AppMode::VideoAnalyzer,
        AppMode::QuickAnswer,
        AppMode::TextToSpeech,
    ];

    /// Stable identifier used on the command line and in config.
    pub fn id(&self) -> &'static str {
        match self {
            AppMode::PitchGenerator => "pitch_generator",
            AppMode::ImageAnalyzer => "image_analyzer",
            AppMode::VideoAnalyzer => "video_analyzer",
            AppMode::QuickAnswer => "quick_answer",
            AppMode::TextToSpeech => "tts",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AppMode::PitchGenerator => "Pitch Generator",
            AppMode::ImageAnalyzer => "Image Analyzer",
            AppMode::VideoAnalyzer => "Video Analyzer",
            AppMode::QuickAnswer => "Quick Answer",
            AppMode::TextToSpeech => "Text-to-Speech",
        }
    }

    /// Whether the tool produces an audio artifact.
    pub fn produces_audio(&self) -> bool {
        matches!(self, AppMode::PitchGenerator | AppMode::TextToSpeech)
    }
}

impl fmt::Display for AppMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for AppMode {
    type Err = UnknownModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        AppMode::ALL
            .into_iter()
            .find(|m| m.id() == wanted)
            .ok_or_else(|| UnknownModeError(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_ids() {
        for mode in AppMode::ALL {
            assert_eq!(mode.id().parse::<AppMode>().unwrap(), mode);
        }
        assert_eq!(" TTS ".parse::<AppMode>().unwrap(), AppMode::TextToSpeech);
        assert!("slideshow".parse::<AppMode>().is_err());
    }

    #[test]
    fn test_serde_ids_match() {
        let json = serde_json::to_string(&AppMode::TextToSpeech).unwrap();
        assert_eq!(json, "\"tts\"");
        let json = serde_json::to_string(&AppMode::QuickAnswer).unwrap();
        assert_eq!(json, "\"quick_answer\"");
    }
}
