//! Configured Session Store
//!
//! The session backend picked at startup. This is the one place that knows
//! every variant; everything else is written against `SessionStore`.

use std::time::Duration;

use http::HeaderMap;

use crate::application::config::{AuthConfig, SessionBackendConfig};
use crate::domain::entity::session::Session;
use crate::domain::repository::SessionStore;
use crate::error::StoreError;
use crate::infra::distributed::DistributedStore;
use crate::infra::kv::{BackendError, KeyValueBackend, MemoryBackend, RedisBackend};
use crate::infra::metrics::SessionMetrics;
use crate::infra::signed_cookie::SignedCookieStore;

/// How often the in-process backend drops expired records
pub const MEMORY_PURGE_INTERVAL: Duration = Duration::from_secs(60);

#[derive(Debug, Clone)]
pub enum ConfiguredSessionStore {
    SignedCookie(SignedCookieStore),
    Memory(DistributedStore<MemoryBackend>),
    Redis(DistributedStore<RedisBackend>),
}

impl ConfiguredSessionStore {
    /// Build the configured store and check that its backend answers.
    ///
    /// A failure here should abort startup.
    pub async fn connect(
        backend: &SessionBackendConfig,
        config: &AuthConfig,
        metrics: SessionMetrics,
    ) -> Result<Self, BackendError> {
        let store = match backend {
            SessionBackendConfig::SignedCookie => {
                Self::SignedCookie(SignedCookieStore::new(config, metrics))
            }
            SessionBackendConfig::Memory(settings) => {
                let memory = MemoryBackend::new();
                memory.spawn_purger(MEMORY_PURGE_INTERVAL);
                Self::Memory(DistributedStore::new(
                    memory,
                    "memory",
                    settings.clone(),
                    config,
                    metrics,
                ))
            }
            SessionBackendConfig::Redis { url, settings } => {
                let redis = RedisBackend::connect(url).await?;
                redis.ping().await?;
                Self::Redis(DistributedStore::new(
                    redis,
                    "redis",
                    settings.clone(),
                    config,
                    metrics,
                ))
            }
        };

        tracing::info!(backend = store.backend_name(), "Session store ready");
        Ok(store)
    }

    pub fn backend_name(&self) -> &'static str {
        match self {
            Self::SignedCookie(_) => "cookie",
            Self::Memory(_) => "memory",
            Self::Redis(_) => "redis",
        }
    }
}

impl SessionStore for ConfiguredSessionStore {
    async fn load(&self, headers: &HeaderMap) -> Session {
        match self {
            Self::SignedCookie(store) => store.load(headers).await,
            Self::Memory(store) => store.load(headers).await,
            Self::Redis(store) => store.load(headers).await,
        }
    }

    async fn save(
        &self,
        response_headers: &mut HeaderMap,
        session: &mut Session,
    ) -> Result<(), StoreError> {
        match self {
            Self::SignedCookie(store) => store.save(response_headers, session).await,
            Self::Memory(store) => store.save(response_headers, session).await,
            Self::Redis(store) => store.save(response_headers, session).await,
        }
    }
}
