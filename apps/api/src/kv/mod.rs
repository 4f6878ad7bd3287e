//! Key-value persistence for resume records.

use async_trait::async_trait;
use thiserror::Error;

pub mod redis_store;

pub use redis_store::RedisKvStore;

#[derive(Debug, Error)]
pub enum KvError {
    #[error("Redis error")]
    Redis(#[from] redis::RedisError),

    #[error("could not encode value")]
    Encode(#[from] serde_json::Error),
}

#[async_trait]
pub trait KvStore: Send + Sync {
    async fn set(&self, key: &str, value: &str) -> Result<(), KvError>;

    async fn get(&self, key: &str) -> Result<Option<String>, KvError>;
}
