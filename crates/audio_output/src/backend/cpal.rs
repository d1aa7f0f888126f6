use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use galileo_core::AudioBuffer;
use log::{error, info};

use super::{BackendStream, NegotiatedFormat, PlaybackBackend};
use crate::player::{PlaybackEnd, PlaybackNotifier};

struct SendStream {
    _stream: cpal::Stream,
}
unsafe impl Send for SendStream {}
unsafe impl Sync for SendStream {}

/// Plays through a cpal output device, converting to the device's rate and layout.
pub struct CpalBackend {
    device_id: String,
}

impl CpalBackend {
    /// `device_id` is `"Default"` or a device name as reported by cpal.
    pub fn new(device_id: &str) -> Self {
        Self {
            device_id: device_id.to_string(),
        }
    }

    pub fn devices() -> Vec<String> {
        cpal::default_host()
            .output_devices()
            .map(|devices| devices.filter_map(|d| d.name().ok()).collect())
            .unwrap_or_default()
    }
}

/// Interleave `buffer` for a device with `channels` channels at `sample_rate`.
fn layout_for_device(buffer: &AudioBuffer, sample_rate: u32, channels: u16) -> Vec<f32> {
    let planar: Vec<Vec<f32>> = buffer
        .channels()
        .iter()
        .map(|ch| audio_mix::resample_linear(ch, buffer.sample_rate(), sample_rate))
        .collect();
    let frames = planar.first().map(Vec::len).unwrap_or(0);
    let last = planar.len().saturating_sub(1);
    let mut out = Vec::with_capacity(frames * channels as usize);
    for i in 0..frames {
        for c in 0..channels as usize {
            out.push(planar[c.min(last)][i]);
        }
    }
    out
}

impl PlaybackBackend for CpalBackend {
    fn name(&self) -> &str {
        "cpal"
    }

    fn start(
        &mut self,
        buffer: AudioBuffer,
        notifier: PlaybackNotifier,
    ) -> anyhow::Result<(BackendStream, NegotiatedFormat)> {
        let host = cpal::default_host();
        let device = if self.device_id == "Default" {
            host.default_output_device()
        } else {
            host.output_devices().ok().and_then(|mut devices| {
                devices.find(|d| d.name().ok().as_deref() == Some(self.device_id.as_str()))
            })
        }
        .ok_or_else(|| anyhow::anyhow!("No output device"))?;

        let config = device.default_output_config()?;
        let sample_rate = config.sample_rate().0;
        let channels = config.channels();

        let samples = Arc::new(layout_for_device(&buffer, sample_rate, channels));
        let cursor = Arc::new(AtomicUsize::new(0));

        let err_fn = |err| error!("cpal output error: {}", err);
        let stream = match config.sample_format() {
            cpal::SampleFormat::F32 => {
                let samples = samples.clone();
                let cursor = cursor.clone();
                device.build_output_stream(
                    &config.into(),
                    move |data: &mut [f32], _| {
                        let start = cursor.fetch_add(data.len(), Ordering::Relaxed);
                        for (i, sample) in data.iter_mut().enumerate() {
                            *sample = samples.get(start + i).copied().unwrap_or(0.0);
                        }
                        if start + data.len() >= samples.len() {
                            notifier.finish(PlaybackEnd::Finished);
                        }
                    },
                    err_fn,
                    None,
                )?
            }
            _ => return Err(anyhow::anyhow!("Only F32 supported for now")),
        };

        stream.play()?;
        info!(
            "CpalBackend: playing {} samples. SR: {}, Ch: {}, Device: {}",
            samples.len(),
            sample_rate,
            channels,
            self.device_id
        );

        Ok((
            BackendStream::new(SendStream { _stream: stream }),
            NegotiatedFormat {
                sample_rate,
                channels,
            },
        ))
    }
}
