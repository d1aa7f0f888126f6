use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use audio_codec::{WavBlob, WAV_MIME_TYPE};
use galileo_core::{DataType, ModuleSchema, Port, Result, Signal, Sink};

use crate::registry::DownloadRegistry;

/// Publishes incoming WAV files to the download registry.
///
/// With an output directory set, each file is also written to disk under its
/// download name. A failed write leaves the previous download in place.
pub struct DownloadSink {
    enabled: bool,
    registry: Arc<DownloadRegistry>,
    output_dir: Option<PathBuf>,
    last_saved: Mutex<Option<String>>,
}

impl DownloadSink {
    pub fn new(registry: Arc<DownloadRegistry>) -> Self {
        Self {
            enabled: true,
            registry,
            output_dir: None,
            last_saved: Mutex::new(None),
        }
    }

    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(dir.into());
        self
    }

    pub fn registry(&self) -> Arc<DownloadRegistry> {
        self.registry.clone()
    }

    fn set_last_saved(&self, msg: String) {
        *self.last_saved.lock().unwrap_or_else(|p| p.into_inner()) = Some(msg);
    }
}

#[async_trait]
impl Sink for DownloadSink {
    fn name(&self) -> &str {
        "download"
    }

    fn schema(&self) -> ModuleSchema {
        ModuleSchema {
            id: "download".to_string(),
            name: "Download".to_string(),
            description: "Exposes generated WAV files for download".to_string(),
            ports: vec![
                Port::input("file_in", "WAV File", DataType::File),
                Port::output("path_out", "Saved Path", DataType::Text),
            ],
            settings_schema: Some(serde_json::json!({
                "type": "object",
                "properties": {
                    "output_dir": {
                        "type": "string",
                        "title": "Output Directory",
                        "default": "out"
                    }
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

    fn render_output(&self) -> Option<String> {
        self.last_saved
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .clone()
    }

    async fn consume(&self, signal: Signal) -> Result<Option<Signal>> {
        if !self.enabled {
            return Ok(None);
        }

        let Signal::File {
            name,
            mime_type,
            bytes,
        } = signal
        else {
            return Ok(None);
        };
        if mime_type != WAV_MIME_TYPE {
            log::warn!("DownloadSink: ignoring {} file {}", mime_type, name);
            return Ok(None);
        }

        let blob = WavBlob::parse(bytes)?;

        let saved = match &self.output_dir {
            Some(dir) => {
                let path = dir.join(&name);
                tokio::fs::create_dir_all(dir).await?;
                tokio::fs::write(&path, blob.as_bytes()).await?;
                log::info!("DownloadSink: wrote {} bytes to {:?}", blob.len(), path);
                Some(path)
            }
            None => None,
        };

        let len = blob.len();
        self.registry.publish(name.clone(), blob);
        self.set_last_saved(format!("{name} ({len} bytes)"));

        Ok(saved.map(|p| Signal::Text(p.display().to_string())))
    }
}
