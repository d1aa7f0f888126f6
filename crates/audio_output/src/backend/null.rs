use std::sync::{mpsc, Mutex};
use std::thread;
use std::time::Duration;

use galileo_core::AudioBuffer;

use super::{BackendStream, NegotiatedFormat, PlaybackBackend};
use crate::player::{PlaybackEnd, PlaybackNotifier};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NullPacing {
    /// Report completion as soon as playback starts.
    Immediate,
    /// Report completion after the buffer's duration has elapsed.
    Realtime,
}

/// Headless backend: renders nothing, only keeps time.
#[derive(Debug, Clone)]
pub struct NullBackend {
    pacing: NullPacing,
}

impl NullBackend {
    pub fn immediate() -> Self {
        Self {
            pacing: NullPacing::Immediate,
        }
    }

    pub fn realtime() -> Self {
        Self {
            pacing: NullPacing::Realtime,
        }
    }

    pub fn pacing(&self) -> NullPacing {
        self.pacing
    }
}

struct PacingHandle {
    stop_tx: mpsc::Sender<()>,
    join: Mutex<Option<thread::JoinHandle<()>>>,
}

impl Drop for PacingHandle {
    fn drop(&mut self) {
        let _ = self.stop_tx.send(());
        if let Ok(mut guard) = self.join.lock() {
            if let Some(j) = guard.take() {
                let _ = j.join();
            }
        }
    }
}

impl PlaybackBackend for NullBackend {
    fn name(&self) -> &str {
        "null"
    }

    fn start(
        &mut self,
        buffer: AudioBuffer,
        notifier: PlaybackNotifier,
    ) -> anyhow::Result<(BackendStream, NegotiatedFormat)> {
        let format = NegotiatedFormat {
            sample_rate: buffer.sample_rate(),
            channels: buffer.channel_count() as u16,
        };

        match self.pacing {
            NullPacing::Immediate => {
                notifier.finish(PlaybackEnd::Finished);
                Ok((BackendStream::new(()), format))
            }
            NullPacing::Realtime => {
                let duration = Duration::from_secs_f64(buffer.duration_secs());
                let (stop_tx, stop_rx) = mpsc::channel::<()>();
                let join = thread::Builder::new()
                    .name("null-playback".to_string())
                    .spawn(move || {
                        if let Err(mpsc::RecvTimeoutError::Timeout) = stop_rx.recv_timeout(duration)
                        {
                            notifier.finish(PlaybackEnd::Finished);
                        }
                    })?;
                let handle = PacingHandle {
                    stop_tx,
                    join: Mutex::new(Some(join)),
                };
                Ok((BackendStream::new(handle), format))
            }
        }
    }
}
