use galileo_core::MusicTrack;
use serde::Deserialize;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable pointing at an explicit config file.
pub const CONFIG_ENV: &str = "GALILEO_CONFIG";

const DEFAULT_PATHS: [&str; 2] = ["configs/studio.toml", "../../configs/studio.toml"];

/// Upper bound of the music-bed gain the studio accepts.
pub const MAX_MUSIC_GAIN: f32 = 0.5;

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse studio config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid studio config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct StudioSettings {
    /// Rate of the headerless PCM returned by the speech service.
    pub speech_sample_rate: u32,
    pub default_voice: String,
    pub voices: Vec<String>,
    pub default_gain: f32,
    /// Root that relative music locators resolve against.
    pub assets_dir: PathBuf,
    pub output_dir: PathBuf,
    pub download_prefix: String,
    pub music: Vec<MusicTrack>,
}

impl Default for StudioSettings {
    fn default() -> Self {
        Self {
            speech_sample_rate: default_speech_sample_rate(),
            default_voice: default_voice(),
            voices: default_voices(),
            default_gain: default_gain(),
            assets_dir: default_assets_dir(),
            output_dir: default_output_dir(),
            download_prefix: default_download_prefix(),
            music: builtin_music(),
        }
    }
}

impl StudioSettings {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.speech_sample_rate == 0 {
            return Err(ConfigError::Invalid(
                "studio.speech_sample_rate must be positive".into(),
            ));
        }
        if !(0.0..=MAX_MUSIC_GAIN).contains(&self.default_gain) {
            return Err(ConfigError::Invalid(format!(
                "studio.default_gain must be within [0, {MAX_MUSIC_GAIN}] (got {})",
                self.default_gain
            )));
        }
        if !self.voices.iter().any(|v| v == &self.default_voice) {
            return Err(ConfigError::Invalid(format!(
                "studio.default_voice '{}' is not listed in studio.voices",
                self.default_voice
            )));
        }
        if self.download_prefix.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "studio.download_prefix must not be empty".into(),
            ));
        }
        let mut seen = HashSet::new();
        for track in &self.music {
            if track.id().is_empty() || track.source().is_empty() {
                return Err(ConfigError::Invalid(
                    "music entries need a non-empty id and source".into(),
                ));
            }
            if !seen.insert(track.id()) {
                return Err(ConfigError::Invalid(format!(
                    "duplicate music track id '{}'",
                    track.id()
                )));
            }
        }
        Ok(())
    }

    pub fn track(&self, id: &str) -> Option<&MusicTrack> {
        self.music.iter().find(|t| t.id() == id)
    }
}

/// The music beds shipped with the studio.
pub fn builtin_music() -> Vec<MusicTrack> {
    galileo_core::builtin_tracks()
}

#[derive(Debug, Clone, Deserialize)]
struct StudioToml {
    #[serde(default = "default_speech_sample_rate")]
    speech_sample_rate: u32,
    #[serde(default = "default_voice")]
    default_voice: String,
    #[serde(default = "default_voices")]
    voices: Vec<String>,
    #[serde(default = "default_gain")]
    default_gain: f32,
    #[serde(default = "default_assets_dir")]
    assets_dir: PathBuf,
    #[serde(default = "default_output_dir")]
    output_dir: PathBuf,
    #[serde(default = "default_download_prefix")]
    download_prefix: String,
}

#[derive(Debug, Clone, Deserialize)]
struct MusicTrackToml {
    id: String,
    name: Option<String>,
    source: String,
}

#[derive(Debug, Clone, Deserialize)]
struct RootConfigToml {
    #[serde(default)]
    studio: Option<StudioToml>,
    #[serde(default)]
    music: Option<Vec<MusicTrackToml>>,
}

fn default_speech_sample_rate() -> u32 {
    24_000
}

fn default_voice() -> String {
    "Kore".to_string()
}

fn default_voices() -> Vec<String> {
    ["Kore", "Puck", "Charon", "Fenrir", "Zephyr"]
        .into_iter()
        .map(String::from)
        .collect()
}

fn default_gain() -> f32 {
    0.2
}

fn default_assets_dir() -> PathBuf {
    PathBuf::from("assets")
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("out")
}

fn default_download_prefix() -> String {
    "galileo-speech".to_string()
}

/// Parse and validate a `studio.toml` document.
pub fn parse_studio_settings(text: &str) -> Result<StudioSettings, ConfigError> {
    let root: RootConfigToml = toml::from_str(text)?;
    let mut settings = StudioSettings::default();
    if let Some(studio) = root.studio {
        let StudioToml {
            speech_sample_rate,
            default_voice,
            voices,
            default_gain,
            assets_dir,
            output_dir,
            download_prefix,
        } = studio;
        settings.speech_sample_rate = speech_sample_rate;
        settings.default_voice = default_voice;
        settings.voices = voices;
        settings.default_gain = default_gain;
        settings.assets_dir = assets_dir;
        settings.output_dir = output_dir;
        settings.download_prefix = download_prefix;
    }
    if let Some(music) = root.music {
        settings.music = music
            .into_iter()
            .map(|t| {
                let name = t.name.unwrap_or_else(|| t.id.clone());
                MusicTrack::new(t.id, name, t.source)
            })
            .collect();
    }
    settings.validate()?;
    Ok(settings)
}

/// Find the config text: explicit path, then `$GALILEO_CONFIG`, then the usual relative paths.
///
/// Returns `Ok(None)` when no candidate exists. An explicit path that cannot be read is an error.
pub fn read_studio_toml_text(explicit: Option<&Path>) -> Result<Option<(PathBuf, String)>, ConfigError> {
    let explicit = explicit
        .map(Path::to_path_buf)
        .or_else(|| std::env::var_os(CONFIG_ENV).map(PathBuf::from));
    if let Some(path) = explicit {
        let text = fs::read_to_string(&path).map_err(|source| ConfigError::Read {
            path: path.clone(),
            source,
        })?;
        return Ok(Some((path, text)));
    }
    for p in &DEFAULT_PATHS {
        if let Ok(text) = fs::read_to_string(p) {
            return Ok(Some((PathBuf::from(p), text)));
        }
    }
    Ok(None)
}

pub fn load_studio_settings(explicit: Option<&Path>) -> Result<StudioSettings, ConfigError> {
    match read_studio_toml_text(explicit)? {
        Some((path, text)) => {
            log::info!("Config: loading studio settings from {}", path.display());
            parse_studio_settings(&text)
        }
        None => {
            log::info!(
                "Config: no studio.toml found in {:?}, using built-in defaults",
                DEFAULT_PATHS
            );
            Ok(StudioSettings::default())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let settings = StudioSettings::default();
        settings.validate().unwrap();
        assert_eq!(settings.speech_sample_rate, 24_000);
        assert_eq!(settings.default_voice, "Kore");
        assert_eq!(settings.music.len(), 4);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let settings = parse_studio_settings(
            r#"
            [studio]
            default_gain = 0.35
            output_dir = "renders"
            "#,
        )
        .unwrap();
        assert_eq!(settings.default_gain, 0.35);
        assert_eq!(settings.output_dir, PathBuf::from("renders"));
        assert_eq!(settings.speech_sample_rate, 24_000);
        assert_eq!(settings.music, builtin_music());
    }

    #[test]
    fn test_music_entries_replace_catalog() {
        let settings = parse_studio_settings(
            r#"
            [[music]]
            id = "rain"
            source = "music/rain.ogg"

            [[music]]
            id = "piano"
            name = "Soft Piano"
            source = "file:///opt/music/piano.mp3"
            "#,
        )
        .unwrap();
        assert_eq!(settings.music.len(), 2);
        assert_eq!(settings.track("rain").unwrap().name(), "rain");
        assert_eq!(settings.track("piano").unwrap().name(), "Soft Piano");
    }

    #[test]
    fn test_rejects_out_of_range_gain_and_unknown_voice() {
        let err = parse_studio_settings("[studio]\ndefault_gain = 0.8\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));

        let err = parse_studio_settings("[studio]\ndefault_voice = \"Nobody\"\n").unwrap_err();
        assert!(err.to_string().contains("Nobody"));
    }

    #[test]
    fn test_rejects_duplicate_track_ids() {
        let err = parse_studio_settings(
            r#"
            [[music]]
            id = "a"
            source = "a.mp3"
            [[music]]
            id = "a"
            source = "b.mp3"
            "#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("duplicate"));
    }

    #[test]
    fn test_malformed_toml_is_parse_error() {
        let err = parse_studio_settings("[studio\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_explicit_missing_path_is_error() {
        let path = std::env::temp_dir().join("galileo_missing_studio.toml");
        let err = read_studio_toml_text(Some(&path)).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
