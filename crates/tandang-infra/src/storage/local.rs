//! Local-disk object store.
//!
//! Each object is a flat file at `{dir}/{key}`; public URLs are served from
//! `{public_base}/media/{key}`.

use std::path::PathBuf;

use async_trait::async_trait;
use tokio::fs;

use tandang_core::ports::{ObjectStore, StorageError};

pub struct LocalObjectStore {
    dir: PathBuf,
    public_base: String,
}

impl LocalObjectStore {
    /// Open the store, creating the directory if needed.
    pub async fn new(dir: PathBuf, public_base: impl Into<String>) -> Result<Self, StorageError> {
        fs::create_dir_all(&dir)
            .await
            .map_err(|e| StorageError::Write(e.to_string()))?;
        tracing::info!("Object storage directory: {}", dir.display());

        Ok(Self {
            dir,
            public_base: public_base.into().trim_end_matches('/').to_string(),
        })
    }

    /// Resolve a key to its on-disk path. Keys are single flat path
    /// segments; separators and dot-dot are rejected to keep lookups inside
    /// the storage directory.
    fn object_path(&self, key: &str) -> Result<PathBuf, StorageError> {
        if key.is_empty()
            || key.contains('/')
            || key.contains('\\')
            || key.contains("..")
            || key.starts_with('.')
        {
            return Err(StorageError::InvalidKey(key.to_string()));
        }
        Ok(self.dir.join(key))
    }
}

#[async_trait]
impl ObjectStore for LocalObjectStore {
    async fn put(&self, key: &str, bytes: &[u8]) -> Result<(), StorageError> {
        let path = self.object_path(key)?;
        fs::write(&path, bytes)
            .await
            .map_err(|e| StorageError::Write(e.to_string()))?;
        tracing::debug!(key = %key, size = bytes.len(), "Object stored");
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Vec<u8>, StorageError> {
        let path = self.object_path(key)?;
        match fs::read(&path).await {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(StorageError::NotFound),
            Err(e) => Err(StorageError::Read(e.to_string())),
        }
    }

    fn public_url(&self, key: &str) -> String {
        format!("{}/media/{}", self.public_base, key)
    }
}
