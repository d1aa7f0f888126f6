//! Download surface: named WAV artifacts behind revocable handles.

mod naming;
mod registry;
mod sink;

pub use naming::{download_filename, sanitize};
pub use registry::{Download, DownloadRegistry};
pub use sink::DownloadSink;
