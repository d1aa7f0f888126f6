use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

// ============================================================================
// DATA TYPES
// ============================================================================

/// Data types for type-safe port connections.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub enum DataType {
    /// String/text data (model answers, scripts)
    Text,
    /// Raw bytes (images, generic binary)
    Blob,
    /// Decoded PCM audio
    Audio,
    /// Named, downloadable files
    File,
    /// Control signals (stop playback, shutdown)
    Control,
    /// Accepts any data type
    Any,
}

/// Port direction - whether a port receives or emits data
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum PortDirection {
    Input,
    Output,
}

// ============================================================================
// CONTROL MESSAGES
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub enum ControlSignal {
    Shutdown,
    /// Stop and release whatever sound source is currently playing
    StopPlayback,
    /// Apply settings update
    Settings(serde_json::Value),
}

// ============================================================================
// SIGNAL
// ============================================================================

/// Envelope passed between studio modules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "type", content = "data")]
pub enum Signal {
    /// Pure text content (e.g. a quick answer or an image analysis)
    Text(String),
    /// Raw bytes (e.g. a generated JPEG)
    Blob { mime_type: String, bytes: Vec<u8> },
    /// Audio Signal (PCM), interleaved f32 samples in [-1, 1]
    Audio {
        sample_rate: u32,
        channels: u16,
        timestamp_us: u64,
        data: Vec<f32>,
    },
    /// A named file offered to the user for download
    File {
        name: String,
        mime_type: String,
        bytes: Vec<u8>,
    },
    /// A control signal for the studio
    Control(ControlSignal),
    /// Empty signal, used for heartbeat or triggers
    Pulse,
}

impl Signal {
    /// The port type this signal travels on.
    pub fn data_type(&self) -> DataType {
        match self {
            Signal::Text(_) => DataType::Text,
            Signal::Blob { .. } => DataType::Blob,
            Signal::Audio { .. } => DataType::Audio,
            Signal::File { .. } => DataType::File,
            Signal::Control(_) | Signal::Pulse => DataType::Control,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_type_mapping() {
        assert_eq!(Signal::Text("hi".into()).data_type(), DataType::Text);
        assert_eq!(Signal::Pulse.data_type(), DataType::Control);
        let file = Signal::File {
            name: "speech.wav".into(),
            mime_type: "audio/wav".into(),
            bytes: vec![],
        };
        assert_eq!(file.data_type(), DataType::File);
    }

    #[test]
    fn test_tagged_serialization() {
        let json = serde_json::to_value(Signal::Text("hello".into())).unwrap();
        assert_eq!(json["type"], "Text");
        assert_eq!(json["data"], "hello");

        let control: Signal =
            serde_json::from_str(r#"{"type":"Control","data":"StopPlayback"}"#).unwrap();
        assert_eq!(control, Signal::Control(ControlSignal::StopPlayback));
    }
}
