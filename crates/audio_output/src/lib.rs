pub mod backend;
mod player;

use std::sync::atomic::{AtomicU64, AtomicU8, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use log::{info, warn};

use galileo_core::{AudioBuffer, ControlSignal, DataType, ModuleSchema, Port, Signal, Sink};

pub use backend::{default_backend, BackendStream, NegotiatedFormat, NullBackend, PlaybackBackend};
pub use player::{AudioPlayer, CompletionCallback, PlaybackEnd, PlaybackNotifier, PlayerState};

const END_NONE: u8 = 0;
const END_FINISHED: u8 = 1;
const END_STOPPED: u8 = 2;

/// Counters the playback sink publishes for status displays.
#[derive(Default)]
pub struct PlaybackState {
    sessions: AtomicU64,
    peak_milli: AtomicU64,
    last_end: AtomicU8,
}

impl PlaybackState {
    pub fn sessions(&self) -> u64 {
        self.sessions.load(Ordering::Relaxed)
    }

    /// Peak level of the most recent buffer, in thousandths of full scale.
    pub fn peak_milli(&self) -> u64 {
        self.peak_milli.load(Ordering::Relaxed)
    }

    pub fn last_end(&self) -> Option<PlaybackEnd> {
        match self.last_end.load(Ordering::Acquire) {
            END_FINISHED => Some(PlaybackEnd::Finished),
            END_STOPPED => Some(PlaybackEnd::Stopped),
            _ => None,
        }
    }

    fn record_end(&self, end: PlaybackEnd) {
        let code = match end {
            PlaybackEnd::Finished => END_FINISHED,
            PlaybackEnd::Stopped => END_STOPPED,
        };
        self.last_end.store(code, Ordering::Release);
    }
}

/// Plays every `Signal::Audio` it receives, replacing whatever was playing.
///
/// `Signal::Control(StopPlayback)` stops the current session.
pub struct PlaybackSink {
    id: String,
    enabled: bool,
    player: Mutex<AudioPlayer>,
    state: Arc<PlaybackState>,
}

impl PlaybackSink {
    pub fn new(id: &str, backend: Box<dyn PlaybackBackend>) -> (Self, Arc<PlaybackState>) {
        let state = Arc::new(PlaybackState::default());
        (
            Self {
                id: id.to_string(),
                enabled: true,
                player: Mutex::new(AudioPlayer::new(backend)),
                state: state.clone(),
            },
            state,
        )
    }

    pub fn player_state(&self) -> PlayerState {
        self.player
            .lock()
            .map(|p| p.state())
            .unwrap_or(PlayerState::Idle)
    }

    fn play(&self, buffer: AudioBuffer) -> anyhow::Result<u64> {
        let peak = (buffer.peak() * 1000.0) as u64;
        self.state.peak_milli.store(peak, Ordering::Relaxed);

        let state = self.state.clone();
        let mut player = self
            .player
            .lock()
            .map_err(|_| anyhow::anyhow!("PlaybackSink: player lock poisoned"))?;
        player.stop();
        self.state.last_end.store(END_NONE, Ordering::Release);
        let session = player.play(buffer, move |end| state.record_end(end))?;
        self.state.sessions.fetch_add(1, Ordering::Relaxed);
        Ok(session)
    }
}

#[async_trait]
impl Sink for PlaybackSink {
    fn name(&self) -> &str {
        "Playback"
    }

    fn schema(&self) -> ModuleSchema {
        ModuleSchema {
            id: self.id.clone(),
            name: "Playback".to_string(),
            description: "Plays audio buffers, one at a time".to_string(),
            ports: vec![
                Port::input("audio_in", "Audio In", DataType::Audio),
                Port::input("control_in", "Control In", DataType::Control),
            ],
            settings_schema: None,
        }
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    fn render_output(&self) -> Option<String> {
        match self.player_state() {
            PlayerState::Playing { session } => Some(format!("Playing session {session}")),
            PlayerState::Idle => self.state.last_end().map(|end| format!("Idle ({end:?})")),
        }
    }

    async fn consume(&self, signal: Signal) -> anyhow::Result<Option<Signal>> {
        if !self.enabled {
            return Ok(None);
        }

        match signal {
            Signal::Audio {
                sample_rate,
                channels,
                data,
                ..
            } => {
                let buffer = AudioBuffer::from_interleaved(sample_rate, channels, &data)?;
                if buffer.is_empty() {
                    warn!("PlaybackSink: ignoring empty audio buffer");
                    return Ok(None);
                }
                self.play(buffer)?;
            }
            Signal::Control(ControlSignal::StopPlayback) | Signal::Control(ControlSignal::Shutdown) => {
                let mut player = self
                    .player
                    .lock()
                    .map_err(|_| anyhow::anyhow!("PlaybackSink: player lock poisoned"))?;
                if player.stop() {
                    info!("PlaybackSink: playback stopped on request");
                }
            }
            _ => {}
        }
        Ok(None)
    }
}
