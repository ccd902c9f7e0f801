//! Signed Cookie Session Store
//!
//! Session values travel in the cookie itself:
//!
//! ```text
//! base64url(json payload) "." base64url(HMAC-SHA256(secret, base64url(json payload)))
//! payload = {"v": {<values>}, "exp": <unix seconds>}
//! ```
//!
//! The token is tamper-evident, not confidential. Anything that fails to
//! verify is treated as no session.

use chrono::Utc;
use http::HeaderMap;
use platform::cookie::{CookieConfig, append_set_cookie, extract_cookie};
use platform::crypto::{TokenSigner, from_base64url, to_base64url};
use serde::{Deserialize, Serialize};

use crate::application::config::AuthConfig;
use crate::domain::entity::session::Session;
use crate::domain::repository::SessionStore;
use crate::domain::value_object::session_values::SessionValues;
use crate::error::StoreError;
use crate::infra::metrics::SessionMetrics;

/// Largest token a browser reliably keeps
pub const MAX_TOKEN_LEN: usize = 4096;

const BACKEND: &str = "cookie";

#[derive(Debug, Serialize, Deserialize)]
struct Payload {
    v: SessionValues,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    exp: Option<i64>,
}

/// Why a presented token was not accepted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Rejection {
    Malformed,
    BadSignature,
    Expired,
}

impl Rejection {
    fn as_str(&self) -> &'static str {
        match self {
            Rejection::Malformed => "malformed",
            Rejection::BadSignature => "bad_signature",
            Rejection::Expired => "expired",
        }
    }
}

#[derive(Debug, Clone)]
pub struct SignedCookieStore {
    signer: TokenSigner,
    cookie: CookieConfig,
    default_max_age: Option<i64>,
    metrics: SessionMetrics,
}

impl SignedCookieStore {
    pub fn new(config: &AuthConfig, metrics: SessionMetrics) -> Self {
        Self {
            signer: TokenSigner::new(config.session_secret),
            cookie: config.cookie_config(),
            default_max_age: config.session_max_age_secs(),
            metrics,
        }
    }

    fn encode(&self, values: &SessionValues, max_age: Option<i64>) -> Result<String, StoreError> {
        let payload = Payload {
            v: values.clone(),
            exp: max_age.map(|age| Utc::now().timestamp().saturating_add(age)),
        };
        let json = serde_json::to_vec(&payload).map_err(|e| StoreError::Encoding(e.to_string()))?;

        let body = to_base64url(&json);
        let tag = self.signer.sign(body.as_bytes());
        let token = format!("{}.{}", body, to_base64url(&tag));

        if token.len() > MAX_TOKEN_LEN {
            return Err(StoreError::TokenTooLarge {
                len: token.len(),
                max: MAX_TOKEN_LEN,
            });
        }
        Ok(token)
    }

    fn decode(&self, token: &str, now: i64) -> Result<SessionValues, Rejection> {
        if token.len() > MAX_TOKEN_LEN {
            return Err(Rejection::Malformed);
        }
        let (body, tag) = token.split_once('.').ok_or(Rejection::Malformed)?;
        let tag = from_base64url(tag).map_err(|_| Rejection::Malformed)?;

        if !self.signer.verify(body.as_bytes(), &tag) {
            return Err(Rejection::BadSignature);
        }

        let json = from_base64url(body).map_err(|_| Rejection::Malformed)?;
        let payload: Payload = serde_json::from_slice(&json).map_err(|_| Rejection::Malformed)?;

        match payload.exp {
            Some(exp) if exp <= now => Err(Rejection::Expired),
            _ => Ok(payload.v),
        }
    }

    fn write(&self, response_headers: &mut HeaderMap, session: &Session) -> Result<(), StoreError> {
        let set_cookie = if session.is_invalidated() {
            self.cookie.build_delete_cookie()
        } else {
            let token = self.encode(session.values(), session.max_age())?;
            self.cookie.build_set_cookie(&token, session.max_age())
        };

        append_set_cookie(response_headers, &set_cookie)
            .map_err(|e| StoreError::Encoding(e.to_string()))
    }
}

impl SessionStore for SignedCookieStore {
    async fn load(&self, headers: &HeaderMap) -> Session {
        // An emptied cookie is what a deletion leaves behind
        let Some(token) = extract_cookie(headers, &self.cookie.name).filter(|t| !t.is_empty())
        else {
            return Session::fresh(self.default_max_age);
        };

        match self.decode(&token, Utc::now().timestamp()) {
            // Sliding expiry: the next save issues a full lifetime, as the distributed TTL does
            Ok(values) => Session::restored(None, values, self.default_max_age),
            Err(rejection) => {
                tracing::warn!(
                    backend = BACKEND,
                    reason = rejection.as_str(),
                    "Rejected session token"
                );
                self.metrics.record_load_failure(BACKEND, rejection.as_str());
                Session::fresh(self.default_max_age)
            }
        }
    }

    async fn save(
        &self,
        response_headers: &mut HeaderMap,
        session: &mut Session,
    ) -> Result<(), StoreError> {
        self.write(response_headers, session).inspect_err(|e| {
            tracing::error!(backend = BACKEND, error = %e, "Session save failed");
            self.metrics.record_save_failure(BACKEND, e.reason());
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_object::user_name::UserName;
    use http::HeaderValue;
    use http::header::{COOKIE, SET_COOKIE};

    fn store() -> SignedCookieStore {
        SignedCookieStore::new(&AuthConfig::development(), SessionMetrics::new().unwrap())
    }

    /// Turn the first `Set-Cookie` of a response into a request `Cookie` header
    fn cookie_from(response: &HeaderMap) -> HeaderMap {
        let set_cookie = response.get(SET_COOKIE).unwrap().to_str().unwrap();
        let pair = set_cookie.split(';').next().unwrap();
        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, HeaderValue::from_str(pair).unwrap());
        headers
    }

    fn token_from(response: &HeaderMap) -> String {
        let set_cookie = response.get(SET_COOKIE).unwrap().to_str().unwrap();
        let pair = set_cookie.split(';').next().unwrap();
        pair.split_once('=').unwrap().1.to_string()
    }

    async fn authenticated_response(store: &SignedCookieStore) -> HeaderMap {
        let mut session = store.load(&HeaderMap::new()).await;
        session.mark_authenticated(&UserName::new("alice").unwrap());
        session.values_mut().insert("visits", 3i64);

        let mut response = HeaderMap::new();
        store.save(&mut response, &mut session).await.unwrap();
        response
    }

    fn expiry_of(token: &str) -> Option<i64> {
        let body = token.split_once('.').unwrap().0;
        let payload: Payload = serde_json::from_slice(&from_base64url(body).unwrap()).unwrap();
        payload.exp
    }

    #[tokio::test]
    async fn test_resave_renews_full_lifetime() {
        let store = store();
        let mut values = SessionValues::default();
        values.insert("visits", 1i64);
        let nearly_expired = store.encode(&values, Some(5)).unwrap();

        let mut headers = HeaderMap::new();
        headers.insert(
            COOKIE,
            HeaderValue::from_str(&format!("auth_session={}", nearly_expired)).unwrap(),
        );
        let mut session = store.load(&headers).await;
        assert!(!session.is_new());
        assert_eq!(session.max_age(), Some(43_200));

        let mut response = HeaderMap::new();
        store.save(&mut response, &mut session).await.unwrap();
        let exp = expiry_of(&token_from(&response)).unwrap();
        assert!(exp >= Utc::now().timestamp() + 43_200 - 5);
    }

    #[tokio::test]
    async fn test_missing_cookie_is_fresh() {
        let store = store();
        let session = store.load(&HeaderMap::new()).await;
        assert!(session.is_new());
        assert!(session.values().is_empty());
        assert_eq!(store.metrics.load_failures(BACKEND, "malformed"), 0);
    }

    #[tokio::test]
    async fn test_round_trip() {
        let store = store();
        let response = authenticated_response(&store).await;

        let set_cookie = response.get(SET_COOKIE).unwrap().to_str().unwrap();
        assert!(set_cookie.starts_with("auth_session="));
        assert!(set_cookie.contains("HttpOnly"));
        assert!(set_cookie.contains("Max-Age=43200"));

        let session = store.load(&cookie_from(&response)).await;
        assert!(!session.is_new());
        assert!(session.is_authenticated());
        assert_eq!(session.user_name(), Some("alice"));
        assert_eq!(session.values().len(), 3);
    }

    #[tokio::test]
    async fn test_invalidated_session_expires_cookie() {
        let store = store();
        let mut session = store.load(&cookie_from(&authenticated_response(&store).await)).await;
        session.invalidate();

        let mut response = HeaderMap::new();
        store.save(&mut response, &mut session).await.unwrap();

        let set_cookie = response.get(SET_COOKIE).unwrap().to_str().unwrap();
        assert!(set_cookie.starts_with("auth_session=;"));
        assert!(set_cookie.contains("Max-Age=0"));

        let reloaded = store.load(&cookie_from(&response)).await;
        assert!(reloaded.is_new());
        assert!(reloaded.values().is_empty());
    }

    #[tokio::test]
    async fn test_every_single_byte_flip_is_rejected() {
        let store = store();
        let token = token_from(&authenticated_response(&store).await);

        for index in 0..token.len() {
            let mut bytes = token.clone().into_bytes();
            bytes[index] ^= 0x01;
            let Ok(mutated) = String::from_utf8(bytes) else {
                continue;
            };
            let Ok(value) = HeaderValue::from_str(&format!("auth_session={}", mutated)) else {
                continue;
            };
            let mut headers = HeaderMap::new();
            headers.insert(COOKIE, value);

            let session = store.load(&headers).await;
            assert!(session.is_new(), "flip at {index} was accepted");
            assert!(session.values().is_empty());
        }
    }

    #[tokio::test]
    async fn test_other_secret_is_bad_signature() {
        let store = store();
        let response = authenticated_response(&store).await;

        let other = self::store();
        let session = other.load(&cookie_from(&response)).await;
        assert!(session.is_new());
        assert_eq!(other.metrics.load_failures(BACKEND, "bad_signature"), 1);
    }

    #[tokio::test]
    async fn test_expired_token() {
        let store = store();
        let mut values = SessionValues::new();
        values.insert("authenticated", true);
        let token = store.encode(&values, Some(60)).unwrap();

        assert!(store.decode(&token, Utc::now().timestamp()).is_ok());
        assert_eq!(
            store.decode(&token, Utc::now().timestamp() + 61),
            Err(Rejection::Expired)
        );
    }

    #[tokio::test]
    async fn test_garbage_is_malformed() {
        let store = store();
        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, HeaderValue::from_static("auth_session=not-a-token"));

        assert!(store.load(&headers).await.is_new());
        assert_eq!(store.metrics.load_failures(BACKEND, "malformed"), 1);
    }

    #[tokio::test]
    async fn test_oversized_token_refused() {
        let store = store();
        let mut session = store.load(&HeaderMap::new()).await;
        session.values_mut().insert("blob", "x".repeat(MAX_TOKEN_LEN));

        let mut response = HeaderMap::new();
        let err = store.save(&mut response, &mut session).await.unwrap_err();
        assert!(matches!(err, StoreError::TokenTooLarge { .. }));
        assert!(response.get(SET_COOKIE).is_none());
        assert_eq!(store.metrics.save_failures(BACKEND, "token_too_large"), 1);
    }
}
