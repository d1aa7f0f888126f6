use galileo_core::{builtin_tracks, FetchError, MusicTrack};

/// The fixed list of music beds offered to the user.
#[derive(Debug, Clone, PartialEq)]
pub struct MusicCatalog {
    tracks: Vec<MusicTrack>,
}

impl MusicCatalog {
    pub fn new(tracks: Vec<MusicTrack>) -> Self {
        Self { tracks }
    }

    pub fn builtin() -> Self {
        Self::new(builtin_tracks())
    }

    pub fn get(&self, id: &str) -> Result<&MusicTrack, FetchError> {
        self.tracks
            .iter()
            .find(|t| t.id() == id)
            .ok_or_else(|| FetchError::UnknownTrack(id.to_string()))
    }

    pub fn tracks(&self) -> &[MusicTrack] {
        &self.tracks
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }
}

impl Default for MusicCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl From<Vec<MusicTrack>> for MusicCatalog {
    fn from(tracks: Vec<MusicTrack>) -> Self {
        Self::new(tracks)
    }
}
