use async_trait::async_trait;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

pub mod audio_buffer;
pub use audio_buffer::AudioBuffer;

pub mod error;
pub use error::{BufferError, DecodeError, EncodeError, FetchError, MixError, UnknownModeError};

pub mod generation;
pub use generation::{GenerationService, TextRequest};

pub mod mode;
pub use mode::AppMode;

pub mod music;
pub use music::{builtin_tracks, MusicTrack};

pub mod resources {
    pub mod handle_pool;
}
pub use resources::handle_pool::{HandlePool, ResourceHandle};

pub type Result<T> = std::result::Result<T, anyhow::Error>;

// Re-export core types from signals
pub use galileo_signals::{ControlSignal, DataType, PortDirection, Signal};

/// A typed port on a module for connecting to other modules
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Port {
    /// Unique identifier within the module
    pub id: String,
    /// Human-readable label
    pub label: String,
    /// Type of data this port handles
    pub data_type: DataType,
    /// Whether this port receives (Input) or emits (Output) data
    pub direction: PortDirection,
}

impl Port {
    pub fn input(id: &str, label: &str, data_type: DataType) -> Self {
        Self {
            id: id.to_string(),
            label: label.to_string(),
            data_type,
            direction: PortDirection::Input,
        }
    }

    pub fn output(id: &str, label: &str, data_type: DataType) -> Self {
        Self {
            id: id.to_string(),
            label: label.to_string(),
            data_type,
            direction: PortDirection::Output,
        }
    }
}

/// Schema describing a module's capabilities and interface
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ModuleSchema {
    /// Unique module identifier
    pub id: String,
    /// Human-readable name
    pub name: String,
    /// Description of what the module does
    pub description: String,
    /// Available input/output ports
    pub ports: Vec<Port>,
    /// Optional JSON Schema for settings UI
    pub settings_schema: Option<serde_json::Value>,
}

// ============================================================================
// MODULE TRAITS
// ============================================================================

/// A Sink consumes Signals at the end of a pipeline.
///
/// Examples: the playback output, the download surface.
#[async_trait]
pub trait Sink: Send + Sync {
    /// The name of this sink
    fn name(&self) -> &str;

    /// Returns the schema describing this module's ports and capabilities
    fn schema(&self) -> ModuleSchema;

    /// Whether this module is currently enabled
    fn is_enabled(&self) -> bool {
        true
    }

    /// Enable or disable this module
    fn set_enabled(&mut self, enabled: bool);

    /// Render the current output state as a string (last saved file, etc.)
    fn render_output(&self) -> Option<String> {
        None
    }

    /// Consume a signal and optionally produce an output signal.
    ///
    /// Returns:
    /// - `Ok(Some(signal))` - Successfully processed and produced an output signal
    /// - `Ok(None)` - Successfully processed, no output to emit
    /// - `Err(e)` - Processing failed
    async fn consume(&self, signal: Signal) -> Result<Option<Signal>>;
}

/// A Processor transforms signals in flight (e.g. laying a music bed under speech).
#[async_trait]
pub trait Processor: Send + Sync {
    /// The name of this processor
    fn name(&self) -> &str;

    /// Returns the schema describing this module's ports and capabilities
    fn schema(&self) -> ModuleSchema;

    /// Whether this module is currently enabled
    fn is_enabled(&self) -> bool {
        true
    }

    /// Enable or disable this module
    fn set_enabled(&mut self, enabled: bool);

    /// Process an input signal and optionally emit an output signal
    async fn process(&mut self, signal: Signal) -> Result<Option<Signal>>;
}
