use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Descriptor of a bundled background-music asset.
///
/// Defined once at startup (built-in catalog or `[[music]]` config entries) and never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub struct MusicTrack {
    id: String,
    name: String,
    source: String,
}

impl MusicTrack {
    pub fn new(id: impl Into<String>, name: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            source: source.into(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Display name shown in track pickers.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Locator of the encoded asset (relative path, `file://` URL, ...).
    pub fn source(&self) -> &str {
        &self.source
    }

    /// File extension of the source, used as a container hint when decoding.
    pub fn extension(&self) -> Option<&str> {
        locator_extension(&self.source)
    }
}

/// Extension of the last path segment of a locator, if it has one.
pub fn locator_extension(locator: &str) -> Option<&str> {
    let file = locator.rsplit('/').next()?;
    let (_, ext) = file.rsplit_once('.')?;
    (!ext.is_empty()).then_some(ext)
}

/// The music beds shipped with the studio.
pub fn builtin_tracks() -> Vec<MusicTrack> {
    vec![
        MusicTrack::new("lofi-focus", "Lo-Fi Focus", "music/lofi-focus.mp3"),
        MusicTrack::new("ambient-horizon", "Ambient Horizon", "music/ambient-horizon.mp3"),
        MusicTrack::new("corporate-uplift", "Corporate Uplift", "music/corporate-uplift.mp3"),
        MusicTrack::new("cinematic-rise", "Cinematic Rise", "music/cinematic-rise.mp3"),
    ]
}
