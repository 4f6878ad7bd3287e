use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use redis::AsyncCommands;
use tracing::debug;

use crate::kv::{KvError, KvStore};

/// `KvStore` over a single multiplexed Redis connection, cloned per call.
#[derive(Clone)]
pub struct RedisKvStore {
    conn: MultiplexedConnection,
}

impl RedisKvStore {
    pub async fn connect(client: &redis::Client) -> Result<Self, KvError> {
        let conn = client.get_multiplexed_async_connection().await?;
        Ok(Self { conn })
    }
}

#[async_trait]
impl KvStore for RedisKvStore {
    async fn set(&self, key: &str, value: &str) -> Result<(), KvError> {
        let mut conn = self.conn.clone();
        conn.set::<_, _, ()>(key, value).await?;
        debug!("SET {key} ({} bytes)", value.len());
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<String>, KvError> {
        let mut conn = self.conn.clone();
        Ok(conn.get::<_, Option<String>>(key).await?)
    }
}
