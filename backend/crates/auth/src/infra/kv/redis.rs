//! Redis key-value backend
//!
//! Built on `ConnectionManager`, which multiplexes one connection and
//! reconnects on its own. Each operation works on a cheap clone.

use redis::AsyncCommands;
use redis::aio::ConnectionManager;

use super::{BackendError, KeyValueBackend};

#[derive(Clone)]
pub struct RedisBackend {
    conn: ConnectionManager,
}

impl RedisBackend {
    /// Open a managed connection to `url` (`redis://host:port/db`)
    pub async fn connect(url: &str) -> Result<Self, BackendError> {
        let client = redis::Client::open(url).map_err(|e| BackendError::Connection(e.to_string()))?;
        let conn = ConnectionManager::new(client)
            .await
            .map_err(|e| BackendError::Connection(e.to_string()))?;
        Ok(Self { conn })
    }
}

fn command_error(err: redis::RedisError) -> BackendError {
    if err.is_connection_dropped() || err.is_connection_refusal() || err.is_io_error() {
        BackendError::Connection(err.to_string())
    } else {
        BackendError::Command(err.to_string())
    }
}

impl KeyValueBackend for RedisBackend {
    async fn get(&self, key: &str) -> Result<Option<String>, BackendError> {
        let mut conn = self.conn.clone();
        conn.get(key).await.map_err(command_error)
    }

    async fn set(&self, key: &str, value: &str, ttl_secs: Option<u64>) -> Result<(), BackendError> {
        let mut conn = self.conn.clone();
        let result = match ttl_secs {
            Some(secs) => conn.set_ex::<_, _, ()>(key, value, secs).await,
            None => conn.set::<_, _, ()>(key, value).await,
        };
        result.map_err(command_error)
    }

    async fn delete(&self, key: &str) -> Result<(), BackendError> {
        let mut conn = self.conn.clone();
        conn.del::<_, ()>(key).await.map_err(command_error)
    }

    async fn ping(&self) -> Result<(), BackendError> {
        let mut conn = self.conn.clone();
        let _: String = redis::cmd("PING")
            .query_async(&mut conn)
            .await
            .map_err(command_error)?;
        Ok(())
    }
}

impl std::fmt::Debug for RedisBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisBackend").finish_non_exhaustive()
    }
}
