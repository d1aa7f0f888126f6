use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use galileo_core::FetchError;

/// Resolves a music locator to its encoded bytes.
#[async_trait]
pub trait AssetFetcher: Send + Sync {
    async fn fetch(&self, locator: &str) -> Result<Vec<u8>, FetchError>;
}

/// Reads assets from disk. Relative locators resolve against `root`.
///
/// Only local locators are served: plain paths and `file://` URLs. Anything with
/// another scheme (`http://`, `https://`, ...) is refused with
/// [`FetchError::UnsupportedScheme`].
#[derive(Debug, Clone)]
pub struct FsAssetFetcher {
    root: PathBuf,
}

impl FsAssetFetcher {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn resolve(&self, locator: &str) -> Result<PathBuf, FetchError> {
        if let Some(path) = locator.strip_prefix("file://") {
            return Ok(PathBuf::from(path));
        }
        if locator.contains("://") {
            return Err(FetchError::UnsupportedScheme(locator.to_string()));
        }
        Ok(self.root.join(locator))
    }
}

#[async_trait]
impl AssetFetcher for FsAssetFetcher {
    async fn fetch(&self, locator: &str) -> Result<Vec<u8>, FetchError> {
        let path = self.resolve(locator)?;
        log::debug!("FsAssetFetcher: reading {}", path.display());
        tokio::fs::read(&path).await.map_err(|source| {
            if source.kind() == ErrorKind::NotFound {
                FetchError::NotFound {
                    locator: locator.to_string(),
                }
            } else {
                FetchError::Io {
                    locator: locator.to_string(),
                    source,
                }
            }
        })
    }
}

/// Serves pre-loaded assets, keyed by locator.
#[derive(Debug, Clone, Default)]
pub struct MemoryAssetFetcher {
    assets: HashMap<String, Vec<u8>>,
}

impl MemoryAssetFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_asset(mut self, locator: impl Into<String>, bytes: Vec<u8>) -> Self {
        self.assets.insert(locator.into(), bytes);
        self
    }
}

#[async_trait]
impl AssetFetcher for MemoryAssetFetcher {
    async fn fetch(&self, locator: &str) -> Result<Vec<u8>, FetchError> {
        self.assets
            .get(locator)
            .cloned()
            .ok_or_else(|| FetchError::NotFound {
                locator: locator.to_string(),
            })
    }
}
