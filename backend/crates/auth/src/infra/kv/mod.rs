//! Key-Value Backends
//!
//! The narrow contract the distributed session store needs from a remote
//! store: string values under string keys, with an optional TTL.

pub mod memory;
pub mod redis;

pub use self::memory::MemoryBackend;
pub use self::redis::RedisBackend;

use thiserror::Error;

use crate::error::StoreError;

/// Key-value client failures
#[derive(Debug, Clone, Error)]
pub enum BackendError {
    #[error("Connection failed: {0}")]
    Connection(String),

    #[error("Command failed: {0}")]
    Command(String),
}

impl From<BackendError> for StoreError {
    fn from(err: BackendError) -> Self {
        StoreError::Unavailable(err.to_string())
    }
}

/// Key-value backend trait
#[trait_variant::make(KeyValueBackend: Send)]
pub trait LocalKeyValueBackend {
    /// Value under `key`, `None` when absent or expired
    async fn get(&self, key: &str) -> Result<Option<String>, BackendError>;

    /// Store `value`, expiring after `ttl_secs` when given
    async fn set(&self, key: &str, value: &str, ttl_secs: Option<u64>) -> Result<(), BackendError>;

    /// Remove `key`; absent keys are not an error
    async fn delete(&self, key: &str) -> Result<(), BackendError>;

    /// Round trip used as a startup health check
    async fn ping(&self) -> Result<(), BackendError>;
}
