use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use galileo_core::DecodeError;

use crate::pcm::RawAudioBytes;

/// Decode standard-alphabet, padded base64. Surrounding whitespace is ignored.
pub fn decode(payload: &str) -> Result<Vec<u8>, DecodeError> {
    STANDARD
        .decode(payload.trim())
        .map_err(|e| DecodeError::Base64(e.to_string()))
}

pub fn encode(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

/// Decode a speech payload straight into PCM bytes.
pub fn decode_audio(payload: &str) -> Result<RawAudioBytes, DecodeError> {
    decode(payload).map(RawAudioBytes::new)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip_including_empty() {
        assert_eq!(encode(&[]), "");
        assert_eq!(decode("").unwrap(), Vec::<u8>::new());

        let bytes: Vec<u8> = (0..=255u8).rev().collect();
        assert_eq!(decode(&encode(&bytes)).unwrap(), bytes);
    }

    #[test]
    fn test_known_vector() {
        assert_eq!(decode("SGVsbG8=").unwrap(), b"Hello");
        assert_eq!(encode(b"Hello"), "SGVsbG8=");
        assert_eq!(decode("  SGVsbG8=\n").unwrap(), b"Hello");
    }

    #[test]
    fn test_rejects_malformed_input() {
        assert!(matches!(decode("SGV$bG8="), Err(DecodeError::Base64(_))));
        // missing padding
        assert!(matches!(decode("SGVsbG8"), Err(DecodeError::Base64(_))));
        // url-safe alphabet
        assert!(matches!(decode("-_-_"), Err(DecodeError::Base64(_))));
    }

    #[test]
    fn test_decode_audio_drops_odd_byte() {
        let raw = decode_audio(&encode(&[1, 0, 2, 0, 9])).unwrap();
        assert_eq!(raw.as_bytes(), &[1, 0, 2, 0]);
        assert_eq!(raw.sample_count(), 2);
    }
}
