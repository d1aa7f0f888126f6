use galileo_core::{AudioBuffer, DecodeError, EncodeError};

use crate::pcm::{encode_pcm16, RawAudioBytes};

/// Size of the canonical RIFF/WAVE header written in front of the PCM payload.
pub const WAV_HEADER_LEN: usize = 44;

pub const WAV_MIME_TYPE: &str = "audio/wav";

const PCM_FORMAT_TAG: u16 = 1;
const FMT_CHUNK_LEN: u32 = 16;

/// A self-contained WAV file: 44-byte canonical header followed by the PCM payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WavBlob {
    bytes: Vec<u8>,
    sample_rate: u32,
    channels: u16,
    bits_per_sample: u16,
}

impl WavBlob {
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// The PCM payload after the header.
    pub fn payload(&self) -> &[u8] {
        &self.bytes[WAV_HEADER_LEN..]
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn channels(&self) -> u16 {
        self.channels
    }

    pub fn bits_per_sample(&self) -> u16 {
        self.bits_per_sample
    }

    pub fn mime_type(&self) -> &'static str {
        WAV_MIME_TYPE
    }

    pub fn duration_secs(&self) -> f64 {
        let frame = self.channels as usize * (self.bits_per_sample as usize / 8);
        if frame == 0 {
            return 0.0;
        }
        (self.payload().len() / frame) as f64 / self.sample_rate as f64
    }

    /// Read back a canonical 44-byte-header PCM WAV (as produced by [`write_wav`]).
    pub fn parse(bytes: Vec<u8>) -> Result<Self, DecodeError> {
        if bytes.len() < WAV_HEADER_LEN {
            return Err(DecodeError::Container(format!(
                "WAV needs at least {WAV_HEADER_LEN} bytes, got {}",
                bytes.len()
            )));
        }
        let u16_at = |at: usize| u16::from_le_bytes([bytes[at], bytes[at + 1]]);
        let u32_at =
            |at: usize| u32::from_le_bytes([bytes[at], bytes[at + 1], bytes[at + 2], bytes[at + 3]]);

        if &bytes[0..4] != b"RIFF" || &bytes[8..12] != b"WAVE" {
            return Err(DecodeError::Container("missing RIFF/WAVE signature".into()));
        }
        if &bytes[12..16] != b"fmt " || u32_at(16) != FMT_CHUNK_LEN {
            return Err(DecodeError::Container("expected a 16-byte fmt chunk".into()));
        }
        if u16_at(20) != PCM_FORMAT_TAG {
            return Err(DecodeError::Container(format!(
                "unsupported audio format tag {}",
                u16_at(20)
            )));
        }
        if &bytes[36..40] != b"data" {
            return Err(DecodeError::Container("expected data chunk after fmt".into()));
        }
        let data_len = u32_at(40) as usize;
        if data_len != bytes.len() - WAV_HEADER_LEN || u32_at(4) as usize != 36 + data_len {
            return Err(DecodeError::Container(format!(
                "chunk sizes disagree with a {}-byte file",
                bytes.len()
            )));
        }
        let channels = u16_at(22);
        let sample_rate = u32_at(24);
        let bits_per_sample = u16_at(34);
        if channels == 0 || sample_rate == 0 || bits_per_sample == 0 {
            return Err(DecodeError::Container("zero-valued format field".into()));
        }
        Ok(Self {
            bytes,
            sample_rate,
            channels,
            bits_per_sample,
        })
    }
}

/// Wrap a PCM payload in a canonical WAV header. The payload is copied unmodified.
pub fn write_wav(
    pcm: &[u8],
    sample_rate: u32,
    num_channels: u16,
    bits_per_sample: u16,
) -> Result<WavBlob, EncodeError> {
    if sample_rate == 0 {
        return Err(EncodeError::InvalidFormat("sample rate must be positive".into()));
    }
    if num_channels == 0 {
        return Err(EncodeError::InvalidFormat("need at least one channel".into()));
    }
    if bits_per_sample == 0 || bits_per_sample % 8 != 0 {
        return Err(EncodeError::InvalidFormat(format!(
            "bits per sample must be a positive multiple of 8 (got {bits_per_sample})"
        )));
    }
    let bytes_per_sample = bits_per_sample / 8;
    let block_align = num_channels
        .checked_mul(bytes_per_sample)
        .ok_or_else(|| EncodeError::InvalidFormat("block align overflows u16".into()))?;
    let byte_rate = sample_rate
        .checked_mul(block_align as u32)
        .ok_or_else(|| EncodeError::InvalidFormat("byte rate overflows u32".into()))?;
    let data_len = u32::try_from(pcm.len())
        .ok()
        .filter(|len| len.checked_add(36).is_some())
        .ok_or(EncodeError::PayloadTooLarge(pcm.len()))?;

    let mut out = Vec::with_capacity(WAV_HEADER_LEN + pcm.len());

    // RIFF header
    out.extend_from_slice(b"RIFF");
    out.extend_from_slice(&(36 + data_len).to_le_bytes());
    out.extend_from_slice(b"WAVE");

    // fmt chunk
    out.extend_from_slice(b"fmt ");
    out.extend_from_slice(&FMT_CHUNK_LEN.to_le_bytes());
    out.extend_from_slice(&PCM_FORMAT_TAG.to_le_bytes());
    out.extend_from_slice(&num_channels.to_le_bytes());
    out.extend_from_slice(&sample_rate.to_le_bytes());
    out.extend_from_slice(&byte_rate.to_le_bytes());
    out.extend_from_slice(&block_align.to_le_bytes());
    out.extend_from_slice(&bits_per_sample.to_le_bytes());

    // data chunk
    out.extend_from_slice(b"data");
    out.extend_from_slice(&data_len.to_le_bytes());
    out.extend_from_slice(pcm);

    Ok(WavBlob {
        bytes: out,
        sample_rate,
        channels: num_channels,
        bits_per_sample,
    })
}

/// 16-bit WAV around raw speech bytes.
pub fn write_wav_pcm16(
    pcm: &RawAudioBytes,
    sample_rate: u32,
    num_channels: u16,
) -> Result<WavBlob, EncodeError> {
    write_wav(pcm.as_bytes(), sample_rate, num_channels, 16)
}

/// Re-encode a float buffer to 16-bit PCM and wrap it.
pub fn buffer_to_wav(buffer: &AudioBuffer) -> Result<WavBlob, EncodeError> {
    let pcm = encode_pcm16(buffer)?;
    write_wav_pcm16(&pcm, buffer.sample_rate(), buffer.channel_count() as u16)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_header_layout_is_canonical() {
        let pcm = [0x01, 0x02, 0x03, 0x04, 0x05, 0x06];
        let wav = write_wav(&pcm, 24_000, 1, 16).unwrap();
        let b = wav.as_bytes();

        assert_eq!(wav.len(), 44 + pcm.len());
        assert_eq!(&b[0..4], b"RIFF");
        assert_eq!(u32::from_le_bytes(b[4..8].try_into().unwrap()), 36 + 6);
        assert_eq!(&b[8..12], b"WAVE");
        assert_eq!(&b[12..16], b"fmt ");
        assert_eq!(u32::from_le_bytes(b[16..20].try_into().unwrap()), 16);
        assert_eq!(u16::from_le_bytes(b[20..22].try_into().unwrap()), 1);
        assert_eq!(u16::from_le_bytes(b[22..24].try_into().unwrap()), 1);
        assert_eq!(u32::from_le_bytes(b[24..28].try_into().unwrap()), 24_000);
        assert_eq!(u32::from_le_bytes(b[28..32].try_into().unwrap()), 48_000);
        assert_eq!(u16::from_le_bytes(b[32..34].try_into().unwrap()), 2);
        assert_eq!(u16::from_le_bytes(b[34..36].try_into().unwrap()), 16);
        assert_eq!(&b[36..40], b"data");
        assert_eq!(u32::from_le_bytes(b[40..44].try_into().unwrap()), 6);
        assert_eq!(wav.payload(), &pcm);
    }

    #[test]
    fn test_stereo_rates() {
        let wav = write_wav(&[0; 8], 44_100, 2, 16).unwrap();
        let b = wav.as_bytes();
        assert_eq!(u32::from_le_bytes(b[28..32].try_into().unwrap()), 176_400);
        assert_eq!(u16::from_le_bytes(b[32..34].try_into().unwrap()), 4);
        assert!((wav.duration_secs() - 2.0 / 44_100.0).abs() < 1e-12);
    }

    #[test]
    fn test_empty_payload() {
        let wav = write_wav(&[], 24_000, 1, 16).unwrap();
        assert_eq!(wav.len(), WAV_HEADER_LEN);
        assert!(wav.payload().is_empty());
    }

    #[test]
    fn test_rejects_invalid_format() {
        assert!(write_wav(&[0, 0], 24_000, 0, 16).is_err());
        assert!(write_wav(&[0, 0], 24_000, 1, 12).is_err());
        assert!(write_wav(&[0, 0], 0, 1, 16).is_err());
    }

    #[test]
    fn test_hound_accepts_output() {
        let samples: [i16; 5] = [0, 1000, -1000, i16::MAX, i16::MIN];
        let pcm = RawAudioBytes::new(samples.iter().flat_map(|s| s.to_le_bytes()).collect());
        let wav = write_wav_pcm16(&pcm, 24_000, 1).unwrap();

        let mut reader = hound::WavReader::new(Cursor::new(wav.as_bytes())).unwrap();
        let spec = reader.spec();
        assert_eq!(spec.sample_rate, 24_000);
        assert_eq!(spec.channels, 1);
        assert_eq!(spec.bits_per_sample, 16);
        let read: Vec<i16> = reader.samples::<i16>().map(|s| s.unwrap()).collect();
        assert_eq!(read, samples);
    }

    #[test]
    fn test_buffer_to_wav_and_parse_back() {
        let buffer = AudioBuffer::mono(24_000, vec![0.0, 0.5, -0.5]).unwrap();
        let wav = buffer_to_wav(&buffer).unwrap();
        assert_eq!(wav.len(), 44 + 6);

        let parsed = WavBlob::parse(wav.clone().into_bytes()).unwrap();
        assert_eq!(parsed, wav);
        assert_eq!(parsed.sample_rate(), 24_000);
        assert_eq!(parsed.channels(), 1);
    }

    #[test]
    fn test_parse_rejects_truncated_or_foreign() {
        assert!(WavBlob::parse(vec![0; 10]).is_err());
        let mut bytes = write_wav(&[1, 2], 8000, 1, 16).unwrap().into_bytes();
        bytes.push(0);
        assert!(WavBlob::parse(bytes.clone()).is_err());
        bytes.pop();
        bytes[0] = b'X';
        assert!(WavBlob::parse(bytes).is_err());
    }
}
