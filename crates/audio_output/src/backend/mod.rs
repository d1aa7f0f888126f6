use galileo_core::AudioBuffer;

use crate::player::PlaybackNotifier;

#[cfg(feature = "device-output")]
mod cpal;
mod null;

#[cfg(feature = "device-output")]
pub use self::cpal::CpalBackend;
pub use null::{NullBackend, NullPacing};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NegotiatedFormat {
    pub sample_rate: u32,
    pub channels: u16,
}

/// Opaque backend stream handle; dropping this stops the stream.
pub struct BackendStream {
    _inner: Box<dyn Send + Sync>,
}

impl BackendStream {
    pub fn new<T: Send + Sync + 'static>(inner: T) -> Self {
        Self {
            _inner: Box::new(inner),
        }
    }
}

pub trait PlaybackBackend: Send {
    fn name(&self) -> &str;

    /// Start rendering `buffer`.
    ///
    /// The backend calls `notifier.finish(PlaybackEnd::Finished)` once the source
    /// runs dry. Dropping the returned stream must silence the output without
    /// reporting completion.
    fn start(
        &mut self,
        buffer: AudioBuffer,
        notifier: PlaybackNotifier,
    ) -> anyhow::Result<(BackendStream, NegotiatedFormat)>;
}

/// The sound device when built with `device-output`, a real-time null sink otherwise.
pub fn default_backend() -> anyhow::Result<Box<dyn PlaybackBackend>> {
    #[cfg(feature = "device-output")]
    {
        Ok(Box::new(CpalBackend::new("Default")))
    }

    #[cfg(not(feature = "device-output"))]
    {
        Ok(Box::new(NullBackend::realtime()))
    }
}
