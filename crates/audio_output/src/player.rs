use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use galileo_core::AudioBuffer;
use log::{debug, info};

use crate::backend::{BackendStream, NegotiatedFormat, PlaybackBackend};

/// Why a playback session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackEnd {
    /// The source ran out of samples.
    Finished,
    /// `stop` was called or a newer `play` replaced the session.
    Stopped,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerState {
    Idle,
    Playing { session: u64 },
}

pub type CompletionCallback = Box<dyn FnOnce(PlaybackEnd) + Send>;

const IDLE: u64 = 0;

/// Reports the end of one playback session. Only the first `finish` has any effect.
#[derive(Clone)]
pub struct PlaybackNotifier {
    session: u64,
    active: Arc<AtomicU64>,
    callback: Arc<Mutex<Option<CompletionCallback>>>,
}

impl PlaybackNotifier {
    fn new(session: u64, active: Arc<AtomicU64>, callback: CompletionCallback) -> Self {
        Self {
            session,
            active,
            callback: Arc::new(Mutex::new(Some(callback))),
        }
    }

    pub fn session(&self) -> u64 {
        self.session
    }

    /// Returns false if the session had already ended.
    pub fn finish(&self, end: PlaybackEnd) -> bool {
        let callback = self
            .callback
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .take();
        let Some(callback) = callback else {
            return false;
        };
        // a newer session may already own the slot
        let _ = self
            .active
            .compare_exchange(self.session, IDLE, Ordering::AcqRel, Ordering::Acquire);
        debug!("AudioPlayer: session {} ended ({:?})", self.session, end);
        callback(end);
        true
    }
}

struct ActivePlayback {
    session: u64,
    stream: BackendStream,
    notifier: PlaybackNotifier,
}

/// Owns the single output source. `play` always stops the previous session first.
pub struct AudioPlayer {
    backend: Box<dyn PlaybackBackend>,
    active: Arc<AtomicU64>,
    next_session: u64,
    current: Option<ActivePlayback>,
    format: Option<NegotiatedFormat>,
}

impl AudioPlayer {
    pub fn new(backend: Box<dyn PlaybackBackend>) -> Self {
        Self {
            backend,
            active: Arc::new(AtomicU64::new(IDLE)),
            next_session: 0,
            current: None,
            format: None,
        }
    }

    pub fn backend_name(&self) -> &str {
        self.backend.name()
    }

    /// Start playing `buffer`, returning the new session id.
    ///
    /// `on_complete` runs exactly once: with `Finished` when the buffer plays out,
    /// or `Stopped` when the session is stopped or replaced. If the backend fails
    /// to start, the callback is dropped without being called.
    pub fn play<F>(&mut self, buffer: AudioBuffer, on_complete: F) -> anyhow::Result<u64>
    where
        F: FnOnce(PlaybackEnd) + Send + 'static,
    {
        self.stop();

        self.next_session += 1;
        let session = self.next_session;
        let notifier = PlaybackNotifier::new(session, self.active.clone(), Box::new(on_complete));
        let samples = buffer.len();
        self.active.store(session, Ordering::Release);

        match self.backend.start(buffer, notifier.clone()) {
            Ok((stream, format)) => {
                info!(
                    "AudioPlayer: session {} started on {} ({} samples, {}Hz/{}ch)",
                    session,
                    self.backend.name(),
                    samples,
                    format.sample_rate,
                    format.channels
                );
                self.format = Some(format);
                self.current = Some(ActivePlayback {
                    session,
                    stream,
                    notifier,
                });
                Ok(session)
            }
            Err(e) => {
                let _ = self.active.compare_exchange(
                    session,
                    IDLE,
                    Ordering::AcqRel,
                    Ordering::Acquire,
                );
                Err(e)
            }
        }
    }

    /// Release the active source. Returns true if a session was still playing.
    pub fn stop(&mut self) -> bool {
        let Some(active) = self.current.take() else {
            return false;
        };
        drop(active.stream);
        let was_playing = active.notifier.finish(PlaybackEnd::Stopped);
        if was_playing {
            info!("AudioPlayer: session {} stopped", active.session);
        }
        was_playing
    }

    pub fn state(&self) -> PlayerState {
        match self.active.load(Ordering::Acquire) {
            IDLE => PlayerState::Idle,
            session => PlayerState::Playing { session },
        }
    }

    pub fn is_playing(&self) -> bool {
        self.state() != PlayerState::Idle
    }

    /// Format negotiated by the most recent session.
    pub fn format(&self) -> Option<NegotiatedFormat> {
        self.format
    }
}

impl Drop for AudioPlayer {
    fn drop(&mut self) {
        self.stop();
    }
}
