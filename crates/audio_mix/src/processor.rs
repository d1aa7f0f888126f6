use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use galileo_core::{AudioBuffer, DataType, ModuleSchema, Port, Processor, Signal};

use crate::mixer::MAX_GAIN;
use crate::resample::resample_linear;

/// Live-adjustable gain shared between the processor and whoever drives it.
pub struct MusicBedState {
    gain: AtomicU32,
}

impl MusicBedState {
    pub fn new(gain: f32) -> Arc<Self> {
        let state = Arc::new(Self {
            gain: AtomicU32::new(0),
        });
        state.set_gain(gain);
        state
    }

    pub fn gain(&self) -> f32 {
        f32::from_bits(self.gain.load(Ordering::Relaxed))
    }

    /// Stores the gain clamped to `[0, MAX_GAIN]`.
    pub fn set_gain(&self, gain: f32) {
        let gain = if gain.is_finite() {
            gain.clamp(0.0, MAX_GAIN)
        } else {
            0.0
        };
        self.gain.store(gain.to_bits(), Ordering::Relaxed);
    }
}

/// Lays a looping music bed under a stream of `Signal::Audio` chunks.
///
/// The bed is resampled lazily to whatever rate the incoming audio uses and
/// continues from where the previous chunk left off. The same bed sample is
/// added to every channel of a frame.
pub struct MusicBedProcessor {
    id: String,
    enabled: bool,
    state: Arc<MusicBedState>,
    bed: Vec<f32>,
    bed_rate: u32,
    resampled: Vec<f32>,
    resampled_rate: u32,
    cursor: usize,
}

impl MusicBedProcessor {
    pub fn new(id: &str, music: &AudioBuffer, state: Arc<MusicBedState>) -> Self {
        Self {
            id: id.to_string(),
            enabled: true,
            state,
            bed: music.to_mono(),
            bed_rate: music.sample_rate(),
            resampled: Vec::new(),
            resampled_rate: 0,
            cursor: 0,
        }
    }

    pub fn state(&self) -> Arc<MusicBedState> {
        self.state.clone()
    }

    /// Restart the bed from its first sample.
    pub fn rewind(&mut self) {
        self.cursor = 0;
    }

    fn prepare_bed(&mut self, sample_rate: u32) {
        if self.resampled_rate != sample_rate {
            self.resampled = resample_linear(&self.bed, self.bed_rate, sample_rate);
            self.resampled_rate = sample_rate;
            self.cursor = 0;
        }
    }
}

#[async_trait]
impl Processor for MusicBedProcessor {
    fn name(&self) -> &str {
        "Music Bed"
    }

    fn schema(&self) -> ModuleSchema {
        ModuleSchema {
            id: self.id.clone(),
            name: "Music Bed".to_string(),
            description: "Mixes a looping background track under audio".to_string(),
            ports: vec![
                Port::input("audio_in", "Audio In", DataType::Audio),
                Port::output("audio_out", "Audio Out", DataType::Audio),
            ],
            settings_schema: Some(serde_json::json!({
                "type": "object",
                "properties": {
                    "gain": { "type": "number", "minimum": 0.0, "maximum": MAX_GAIN }
                }
            })),
        }
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    async fn process(&mut self, signal: Signal) -> anyhow::Result<Option<Signal>> {
        let Signal::Audio {
            sample_rate,
            channels,
            timestamp_us,
            mut data,
        } = signal
        else {
            return Ok(None);
        };

        let gain = self.state.gain();
        let width = channels.max(1) as usize;
        self.prepare_bed(sample_rate);
        if self.enabled && !self.resampled.is_empty() && gain > 0.0 {
            let bed = &self.resampled;
            let mut cursor = self.cursor;
            for frame in data.chunks_mut(width) {
                let m = bed[cursor % bed.len()] * gain;
                for sample in frame {
                    *sample = (*sample + m).clamp(-1.0, 1.0);
                }
                cursor = (cursor + 1) % bed.len();
            }
            self.cursor = cursor;
        }

        Ok(Some(Signal::Audio {
            sample_rate,
            channels,
            timestamp_us,
            data,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn audio(data: Vec<f32>, channels: u16) -> Signal {
        Signal::Audio {
            sample_rate: 8000,
            channels,
            timestamp_us: 0,
            data,
        }
    }

    fn samples(signal: Option<Signal>) -> Vec<f32> {
        match signal {
            Some(Signal::Audio { data, .. }) => data,
            other => panic!("expected audio, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_bed_continues_across_chunks() {
        let bed = AudioBuffer::mono(8000, vec![0.2, 0.4, 0.6]).unwrap();
        let state = MusicBedState::new(0.5);
        let mut proc = MusicBedProcessor::new("bed", &bed, state);

        let first = samples(proc.process(audio(vec![0.0; 2], 1)).await.unwrap());
        let second = samples(proc.process(audio(vec![0.0; 3], 1)).await.unwrap());
        assert_eq!(first, vec![0.1, 0.2]);
        assert_eq!(second, vec![0.3, 0.1, 0.2]);
    }

    #[tokio::test]
    async fn test_same_bed_sample_on_every_channel() {
        let bed = AudioBuffer::mono(8000, vec![0.5]).unwrap();
        let mut proc = MusicBedProcessor::new("bed", &bed, MusicBedState::new(0.5));
        let out = samples(proc.process(audio(vec![0.0, 0.9, 0.1, -0.1], 2)).await.unwrap());
        for (got, want) in out.iter().zip([0.25, 1.0, 0.35, 0.15]) {
            assert!((got - want).abs() < 1e-6, "{got} vs {want}");
        }
    }

    #[tokio::test]
    async fn test_gain_is_clamped_and_live() {
        let bed = AudioBuffer::mono(8000, vec![1.0]).unwrap();
        let state = MusicBedState::new(2.0);
        assert_eq!(state.gain(), MAX_GAIN);

        let mut proc = MusicBedProcessor::new("bed", &bed, state.clone());
        state.set_gain(0.0);
        let out = samples(proc.process(audio(vec![0.3], 1)).await.unwrap());
        assert_eq!(out, vec![0.3]);

        state.set_gain(f32::NAN);
        assert_eq!(state.gain(), 0.0);
    }

    #[tokio::test]
    async fn test_non_audio_is_ignored() {
        let bed = AudioBuffer::mono(8000, vec![1.0]).unwrap();
        let mut proc = MusicBedProcessor::new("bed", &bed, MusicBedState::new(0.2));
        assert!(proc
            .process(Signal::Text("hello".into()))
            .await
            .unwrap()
            .is_none());
    }
}
