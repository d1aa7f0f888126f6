use crate::error::BufferError;
use crate::Signal;

/// Planar floating-point audio: one sample vector per channel, all the same length.
///
/// This is the common currency between decoding, mixing, playback and encoding.
/// Samples are expected in [-1.0, 1.0] but the buffer itself does not clamp.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioBuffer {
    sample_rate: u32,
    channels: Vec<Vec<f32>>,
}

impl AudioBuffer {
    pub fn new(sample_rate: u32, channels: Vec<Vec<f32>>) -> Result<Self, BufferError> {
        if sample_rate == 0 {
            return Err(BufferError::ZeroSampleRate);
        }
        let Some(first) = channels.first() else {
            return Err(BufferError::NoChannels);
        };
        let expected = first.len();
        if let Some((channel, found)) = channels
            .iter()
            .enumerate()
            .find(|(_, ch)| ch.len() != expected)
        {
            return Err(BufferError::ChannelLengthMismatch {
                channel,
                expected,
                found: found.len(),
            });
        }
        Ok(Self {
            sample_rate,
            channels,
        })
    }

    pub fn mono(sample_rate: u32, samples: Vec<f32>) -> Result<Self, BufferError> {
        Self::new(sample_rate, vec![samples])
    }

    /// Split interleaved frames into channels. A trailing partial frame is dropped.
    pub fn from_interleaved(
        sample_rate: u32,
        channels: u16,
        data: &[f32],
    ) -> Result<Self, BufferError> {
        let count = channels as usize;
        if count == 0 {
            return Err(BufferError::NoChannels);
        }
        let frames = data.len() / count;
        let mut planar = vec![Vec::with_capacity(frames); count];
        for frame in data.chunks_exact(count) {
            for (ch, sample) in frame.iter().enumerate() {
                planar[ch].push(*sample);
            }
        }
        Self::new(sample_rate, planar)
    }

    /// A new mono buffer at this buffer's sample rate.
    pub fn with_mono_samples(&self, samples: Vec<f32>) -> Self {
        Self {
            sample_rate: self.sample_rate,
            channels: vec![samples],
        }
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    /// Number of samples per channel.
    pub fn len(&self) -> usize {
        self.channels.first().map(Vec::len).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn channel(&self, index: usize) -> Option<&[f32]> {
        self.channels.get(index).map(Vec::as_slice)
    }

    pub fn channels(&self) -> &[Vec<f32>] {
        &self.channels
    }

    pub fn duration_secs(&self) -> f64 {
        self.len() as f64 / self.sample_rate as f64
    }

    pub fn interleaved(&self) -> Vec<f32> {
        let mut out = Vec::with_capacity(self.len() * self.channel_count());
        for i in 0..self.len() {
            for ch in &self.channels {
                out.push(ch[i]);
            }
        }
        out
    }

    /// Sample-wise average of all channels.
    pub fn to_mono(&self) -> Vec<f32> {
        if self.channels.len() == 1 {
            return self.channels[0].clone();
        }
        let scale = 1.0 / self.channels.len() as f32;
        (0..self.len())
            .map(|i| self.channels.iter().map(|ch| ch[i]).sum::<f32>() * scale)
            .collect()
    }

    pub fn into_mono(self) -> Self {
        if self.channels.len() == 1 {
            return self;
        }
        let samples = self.to_mono();
        self.with_mono_samples(samples)
    }

    /// Largest absolute sample value across all channels.
    pub fn peak(&self) -> f32 {
        self.channels
            .iter()
            .flat_map(|ch| ch.iter())
            .fold(0.0f32, |p, s| p.max(s.abs()))
    }

    pub fn to_signal(&self, timestamp_us: u64) -> Signal {
        Signal::Audio {
            sample_rate: self.sample_rate,
            channels: self.channel_count() as u16,
            timestamp_us,
            data: self.interleaved(),
        }
    }
}
