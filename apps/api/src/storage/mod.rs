//! Object storage for uploaded résumés and their rendered images.

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;

pub mod s3;

pub use s3::S3FileStore;

/// A file held in memory, either received from the form or produced by conversion.
#[derive(Debug, Clone)]
pub struct UploadFile {
    pub name: String,
    pub content_type: String,
    pub bytes: Bytes,
}

impl UploadFile {
    pub fn new(name: impl Into<String>, content_type: impl Into<String>, bytes: Bytes) -> Self {
        Self {
            name: name.into(),
            content_type: content_type.into(),
            bytes,
        }
    }

    pub fn size(&self) -> usize {
        self.bytes.len()
    }
}

/// Where an uploaded file ended up.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredFile {
    pub path: String,
    pub name: String,
    pub size: usize,
    pub content_type: String,
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("upload of '{path}' failed: {message}")]
    Upload { path: String, message: String },

    #[error("download of '{path}' failed: {message}")]
    Download { path: String, message: String },
}

#[async_trait]
pub trait FileStore: Send + Sync {
    async fn upload(&self, file: &UploadFile) -> Result<StoredFile, StorageError>;

    async fn download(&self, path: &str) -> Result<Bytes, StorageError>;
}
