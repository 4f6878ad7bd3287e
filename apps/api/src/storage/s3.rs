use async_trait::async_trait;
use aws_sdk_s3::primitives::ByteStream;
use bytes::Bytes;
use tracing::info;
use uuid::Uuid;

use crate::storage::{FileStore, StorageError, StoredFile, UploadFile};

/// `FileStore` backed by an S3 bucket (MinIO locally, AWS in production).
#[derive(Clone)]
pub struct S3FileStore {
    client: aws_sdk_s3::Client,
    bucket: String,
}

impl S3FileStore {
    pub fn new(client: aws_sdk_s3::Client, bucket: String) -> Self {
        Self { client, bucket }
    }
}

/// Builds the object key for an upload. Every upload gets its own prefix so
/// same-named files never collide.
pub fn object_key(upload_id: Uuid, file_name: &str) -> String {
    let name = sanitize_file_name(file_name);
    format!("uploads/{upload_id}/{name}")
}

fn sanitize_file_name(name: &str) -> String {
    let base = name.rsplit(|c: char| c == '/' || c == '\\').next().unwrap_or(name).trim();
    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();
    if cleaned.trim_matches('.').is_empty() {
        "file".to_string()
    } else {
        cleaned
    }
}

#[async_trait]
impl FileStore for S3FileStore {
    async fn upload(&self, file: &UploadFile) -> Result<StoredFile, StorageError> {
        let key = object_key(Uuid::new_v4(), &file.name);

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(&key)
            .body(ByteStream::from(file.bytes.clone()))
            .content_type(&file.content_type)
            .send()
            .await
            .map_err(|e| StorageError::Upload {
                path: key.clone(),
                message: e.to_string(),
            })?;

        info!("Uploaded {} bytes to s3://{}/{}", file.size(), self.bucket, key);

        Ok(StoredFile {
            path: key,
            name: file.name.clone(),
            size: file.size(),
            content_type: file.content_type.clone(),
        })
    }

    async fn download(&self, path: &str) -> Result<Bytes, StorageError> {
        let download_err = |message: String| StorageError::Download {
            path: path.to_string(),
            message,
        };

        let object = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(path)
            .send()
            .await
            .map_err(|e| download_err(e.to_string()))?;

        let data = object
            .body
            .collect()
            .await
            .map_err(|e| download_err(e.to_string()))?;

        Ok(data.into_bytes())
    }
}
