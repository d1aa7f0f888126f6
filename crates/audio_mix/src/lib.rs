//! Audio Mix - lays background music under generated speech
//!
//! speech PCM + music asset -> downmix -> linear resample -> loop/truncate -> gain + clamp.

mod catalog;
mod decoder;
mod fetch;
mod mixer;
mod processor;
pub mod resample;

pub use catalog::MusicCatalog;
pub use decoder::{MusicDecoder, SymphoniaDecoder};
pub use fetch::{AssetFetcher, FsAssetFetcher, MemoryAssetFetcher};
pub use mixer::{mix_buffers, MixRequest, Mixer, MAX_GAIN};
pub use processor::{MusicBedProcessor, MusicBedState};
pub use resample::{loop_to_length, resample_linear};
