use galileo_core::{AudioBuffer, DecodeError, EncodeError};

/// Rate of the headerless speech PCM returned by the generation service.
pub const SPEECH_SAMPLE_RATE: u32 = 24_000;

/// Divisor used when reading 16-bit samples: maps i16 onto [-1.0, 1.0).
pub const PCM16_DECODE_SCALE: f32 = 32768.0;

/// Multiplier used when writing 16-bit samples.
///
/// Deliberately not equal to [`PCM16_DECODE_SCALE`]: a decode/encode round trip
/// shrinks values by 32767/32768. Output bytes are compared exactly downstream,
/// so keep both constants unless they are unified on purpose.
pub const PCM16_ENCODE_SCALE: f32 = 32767.0;

/// Interleaved 16-bit little-endian PCM without a header.
///
/// Always an even number of bytes; a trailing odd byte is dropped on construction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawAudioBytes(Vec<u8>);

impl RawAudioBytes {
    pub fn new(mut bytes: Vec<u8>) -> Self {
        if bytes.len() % 2 != 0 {
            log::debug!(
                "RawAudioBytes: dropping trailing odd byte of a {}-byte payload",
                bytes.len()
            );
            bytes.pop();
        }
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of 16-bit samples (all channels).
    pub fn sample_count(&self) -> usize {
        self.0.len() / 2
    }

    pub fn duration_secs(&self, sample_rate: u32, channels: u16) -> f64 {
        if sample_rate == 0 || channels == 0 {
            return 0.0;
        }
        self.sample_count() as f64 / (sample_rate as f64 * channels as f64)
    }
}

impl From<Vec<u8>> for RawAudioBytes {
    fn from(bytes: Vec<u8>) -> Self {
        Self::new(bytes)
    }
}

/// Interpret raw bytes as mono signed 16-bit little-endian samples.
pub fn decode_pcm16(bytes: &RawAudioBytes, sample_rate: u32) -> Result<AudioBuffer, DecodeError> {
    let samples = bytes
        .as_bytes()
        .chunks_exact(2)
        .map(|pair| i16::from_le_bytes([pair[0], pair[1]]) as f32 / PCM16_DECODE_SCALE)
        .collect();
    Ok(AudioBuffer::mono(sample_rate, samples)?)
}

/// Quantize a buffer back to interleaved 16-bit little-endian PCM.
///
/// Samples are clamped to [-1, 1] before scaling, so out-of-range input
/// saturates instead of wrapping. Non-finite samples are refused.
pub fn encode_pcm16(buffer: &AudioBuffer) -> Result<RawAudioBytes, EncodeError> {
    let interleaved = buffer.interleaved();
    let mut out = Vec::with_capacity(interleaved.len() * 2);
    for (index, sample) in interleaved.iter().enumerate() {
        if !sample.is_finite() {
            return Err(EncodeError::NonFiniteSample { index });
        }
        let value = (sample.clamp(-1.0, 1.0) * PCM16_ENCODE_SCALE).round() as i16;
        out.extend_from_slice(&value.to_le_bytes());
    }
    Ok(RawAudioBytes(out))
}
