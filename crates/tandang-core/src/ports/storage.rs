//! Object store port - cover image storage.

use async_trait::async_trait;

/// Object store: keyed byte blobs with public URLs.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Write an object under the given key.
    async fn put(&self, key: &str, bytes: &[u8]) -> Result<(), StorageError>;

    /// Read an object back.
    async fn get(&self, key: &str) -> Result<Vec<u8>, StorageError>;

    /// The public URL an object is served from.
    fn public_url(&self, key: &str) -> String;
}

/// Object store errors.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Invalid object key: {0}")]
    InvalidKey(String),

    #[error("Object not found")]
    NotFound,

    #[error("Write failed: {0}")]
    Write(String),

    #[error("Read failed: {0}")]
    Read(String),
}
