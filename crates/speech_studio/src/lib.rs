//! Speech Studio - the tool workbench.
//!
//! [`SpeechStudio`] turns generated speech into something playable and
//! downloadable, optionally with a music bed underneath. [`Workbench`] routes
//! each tool request (pitch, image, video, quick answer, text-to-speech) to
//! the generation service and the studio.

mod error;
mod studio;
mod workbench;

pub use error::StudioError;
pub use studio::{MusicChoice, PlaybackTarget, RenderOutcome, RenderRequest, SpeechStudio};
pub use workbench::{
    PitchOutcome, ToolOutcome, ToolRequest, Workbench, MAX_VIDEO_FRAMES, PITCH_VOICE,
};
