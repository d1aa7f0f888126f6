use std::sync::{Arc, Mutex};

use audio_codec::WavBlob;
use galileo_core::{HandlePool, ResourceHandle};

/// A named, downloadable WAV file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Download {
    pub filename: String,
    pub blob: WavBlob,
}

/// Holds the current downloadable artifact.
///
/// Publishing a new download revokes the previous handle, so repeated
/// generations never accumulate blobs. Revoked handles resolve to `None`
/// even if their slot has since been reused.
#[derive(Default)]
pub struct DownloadRegistry {
    pool: HandlePool<Download>,
    current: Mutex<Option<ResourceHandle>>,
}

impl DownloadRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn publish(&self, filename: impl Into<String>, blob: WavBlob) -> ResourceHandle {
        let mut current = self.current.lock().unwrap_or_else(|p| p.into_inner());
        if let Some(previous) = current.take() {
            if self.pool.release(previous) {
                log::debug!("DownloadRegistry: released superseded handle {:?}", previous);
            }
        }
        let download = Download {
            filename: filename.into(),
            blob,
        };
        log::info!(
            "DownloadRegistry: published {} ({} bytes)",
            download.filename,
            download.blob.len()
        );
        let handle = self.pool.allocate(download);
        *current = Some(handle);
        handle
    }

    pub fn get(&self, handle: ResourceHandle) -> Option<Arc<Download>> {
        self.pool.get(handle)
    }

    pub fn current(&self) -> Option<(ResourceHandle, Arc<Download>)> {
        let handle = (*self.current.lock().unwrap_or_else(|p| p.into_inner()))?;
        self.pool.get(handle).map(|d| (handle, d))
    }

    /// Release the current download, if any.
    pub fn revoke(&self) -> bool {
        let mut current = self.current.lock().unwrap_or_else(|p| p.into_inner());
        current
            .take()
            .map(|handle| self.pool.release(handle))
            .unwrap_or(false)
    }

    /// Number of blobs still held.
    pub fn live_count(&self) -> usize {
        self.pool.len()
    }
}
