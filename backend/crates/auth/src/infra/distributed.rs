//! Distributed Session Store
//!
//! The cookie carries only an opaque identity; values live in a key-value
//! backend under `<prefix><identity>` as a JSON object, with TTL = MaxAge.
//!
//! Loads never fail: a timeout, backend error, unknown identity or corrupt
//! record yields a fresh session. Saves report failures to the caller and
//! run in their own task so a dropped request cannot abort a write midway.

use std::time::Duration;

use http::HeaderMap;
use platform::cookie::{CookieConfig, append_set_cookie, extract_cookie};
use tokio::time::timeout;

use crate::application::config::{AuthConfig, DistributedSettings};
use crate::domain::entity::session::Session;
use crate::domain::repository::SessionStore;
use crate::domain::value_object::{session_id::SessionId, session_values::SessionValues};
use crate::error::StoreError;
use crate::infra::kv::KeyValueBackend;
use crate::infra::metrics::SessionMetrics;

#[derive(Debug, Clone)]
pub struct DistributedStore<B> {
    backend: B,
    backend_name: &'static str,
    settings: DistributedSettings,
    cookie: CookieConfig,
    default_max_age: Option<i64>,
    metrics: SessionMetrics,
}

/// Backend work for one save, detached from the request
enum SaveOp {
    Write {
        key: String,
        value: String,
        ttl_secs: Option<u64>,
        stale_key: Option<String>,
    },
    Delete {
        keys: Vec<String>,
    },
}

impl<B> DistributedStore<B>
where
    B: KeyValueBackend + Clone + Send + Sync + 'static,
{
    pub fn new(
        backend: B,
        backend_name: &'static str,
        settings: DistributedSettings,
        config: &AuthConfig,
        metrics: SessionMetrics,
    ) -> Self {
        Self {
            backend,
            backend_name,
            settings,
            cookie: config.cookie_config(),
            default_max_age: config.session_max_age_secs(),
            metrics,
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Backend key for a session identity
    pub fn key(&self, identity: &SessionId) -> String {
        format!("{}{}", self.settings.key_prefix, identity)
    }

    fn degrade(&self, reason: &'static str, detail: Option<&str>) -> Session {
        tracing::warn!(
            backend = self.backend_name,
            reason,
            detail,
            "Session load failed, continuing without session"
        );
        self.metrics.record_load_failure(self.backend_name, reason);
        Session::fresh(self.default_max_age)
    }

    async fn read(&self, identity: SessionId) -> Session {
        let key = self.key(&identity);

        match timeout(self.settings.timeout, self.backend.get(&key)).await {
            Err(_) => self.degrade("timeout", None),
            Ok(Err(e)) => self.degrade("unavailable", Some(&e.to_string())),
            Ok(Ok(None)) => {
                // Unknown identities are never adopted
                tracing::debug!(backend = self.backend_name, "Unknown session identity");
                Session::fresh(self.default_max_age)
            }
            Ok(Ok(Some(json))) => match SessionValues::from_json(&json) {
                Ok(values) => Session::restored(Some(identity), values, self.default_max_age),
                Err(e) => self.degrade("malformed", Some(&e.to_string())),
            },
        }
    }

    fn plan(&self, session: &mut Session) -> Result<Option<SaveOp>, StoreError> {
        if session.is_invalidated() {
            let keys: Vec<String> = [session.take_stale_identity(), session.identity().cloned()]
                .into_iter()
                .flatten()
                .map(|id| self.key(&id))
                .collect();
            return Ok((!keys.is_empty()).then_some(SaveOp::Delete { keys }));
        }

        let value = session
            .values()
            .to_json()
            .map_err(|e| StoreError::Encoding(e.to_string()))?;
        let stale_key = session.take_stale_identity().map(|id| self.key(&id));
        let key = self.key(session.ensure_identity());
        let ttl_secs = session.max_age().and_then(|age| u64::try_from(age).ok());

        Ok(Some(SaveOp::Write {
            key,
            value,
            ttl_secs,
            stale_key,
        }))
    }

    async fn persist(&self, op: SaveOp) -> Result<(), StoreError> {
        let task = tokio::spawn(run_save(
            self.backend.clone(),
            op,
            self.settings.timeout,
            self.backend_name,
        ));

        task.await
            .map_err(|e| StoreError::Unavailable(format!("session save task failed: {}", e)))?
    }

    fn write_cookie(
        &self,
        response_headers: &mut HeaderMap,
        session: &Session,
    ) -> Result<(), StoreError> {
        let set_cookie = match session.identity() {
            Some(identity) if !session.is_invalidated() => self
                .cookie
                .build_set_cookie(identity.as_str(), session.max_age()),
            _ => self.cookie.build_delete_cookie(),
        };

        append_set_cookie(response_headers, &set_cookie)
            .map_err(|e| StoreError::Encoding(e.to_string()))
    }

    async fn save_inner(
        &self,
        response_headers: &mut HeaderMap,
        session: &mut Session,
    ) -> Result<(), StoreError> {
        if let Some(op) = self.plan(session)? {
            self.persist(op).await?;
        }
        self.write_cookie(response_headers, session)
    }
}

async fn run_save<B>(
    backend: B,
    op: SaveOp,
    limit: Duration,
    backend_name: &'static str,
) -> Result<(), StoreError>
where
    B: KeyValueBackend + Sync,
{
    match op {
        SaveOp::Write {
            key,
            value,
            ttl_secs,
            stale_key,
        } => {
            bounded(limit, backend.set(&key, &value, ttl_secs)).await?;

            if let Some(stale_key) = stale_key
                && let Err(e) = bounded(limit, backend.delete(&stale_key)).await
            {
                tracing::warn!(
                    backend = backend_name,
                    error = %e,
                    "Failed to delete previous session record"
                );
            }
            Ok(())
        }
        SaveOp::Delete { keys } => {
            for key in keys {
                bounded(limit, backend.delete(&key)).await?;
            }
            Ok(())
        }
    }
}

/// Run a backend call under the store timeout
async fn bounded<F, T>(limit: Duration, call: F) -> Result<T, StoreError>
where
    F: Future<Output = Result<T, crate::infra::kv::BackendError>>,
{
    match timeout(limit, call).await {
        Ok(result) => result.map_err(StoreError::from),
        Err(_) => Err(StoreError::Timeout),
    }
}

impl<B> SessionStore for DistributedStore<B>
where
    B: KeyValueBackend + Clone + Send + Sync + 'static,
{
    async fn load(&self, headers: &HeaderMap) -> Session {
        let Some(raw) = extract_cookie(headers, &self.cookie.name).filter(|v| !v.is_empty())
        else {
            return Session::fresh(self.default_max_age);
        };

        match SessionId::parse(&raw) {
            Some(identity) => self.read(identity).await,
            None => self.degrade("malformed", None),
        }
    }

    async fn save(
        &self,
        response_headers: &mut HeaderMap,
        session: &mut Session,
    ) -> Result<(), StoreError> {
        self.save_inner(response_headers, session)
            .await
            .inspect_err(|e| {
                tracing::error!(backend = self.backend_name, error = %e, "Session save failed");
                self.metrics.record_save_failure(self.backend_name, e.reason());
            })
    }
}
