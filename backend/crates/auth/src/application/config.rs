//! Application Configuration
//!
//! Configuration for the Auth application layer.

use std::time::Duration;

use platform::cookie::CookieConfig;
use platform::crypto::random_bytes;
use platform::password::HashingParams;

/// Re-export SameSite from platform
pub use platform::cookie::SameSite;

/// What the middleware does with a request lacking an authenticated session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DenyAction {
    /// 401 with `X-Auth-Required: true`
    #[default]
    Unauthorized,
    /// 303 to the login path
    RedirectToLogin,
}

/// Auth application configuration
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Session cookie name
    pub session_cookie_name: String,
    /// Session secret key for HMAC signing (32 bytes)
    pub session_secret: [u8; 32],
    /// Default session lifetime; `None` means a browser-session cookie
    pub session_max_age: Option<Duration>,
    /// Whether to require Secure cookie
    pub cookie_secure: bool,
    /// SameSite policy
    pub cookie_same_site: SameSite,
    /// Login entry point, always reachable without a session
    pub login_path: String,
    /// Further paths the middleware forwards without a session
    pub public_paths: Vec<String>,
    /// Response for denied requests
    pub deny_action: DenyAction,
    /// Password pepper (optional, application-wide secret)
    pub password_pepper: Option<Vec<u8>>,
    /// Argon2id work factor for new hashes
    pub password_hashing: HashingParams,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            session_cookie_name: "auth_session".to_string(),
            session_secret: [0u8; 32],
            session_max_age: Some(Duration::from_secs(12 * 3600)), // 12 hours
            cookie_secure: true,
            cookie_same_site: SameSite::Lax,
            login_path: "/login".to_string(),
            public_paths: vec!["/logout".to_string(), "/status".to_string()],
            deny_action: DenyAction::Unauthorized,
            password_pepper: None,
            password_hashing: HashingParams::default(),
        }
    }
}

impl AuthConfig {
    /// Create config with a random session secret (for development)
    pub fn with_random_secret() -> Self {
        let mut secret = [0u8; 32];
        secret.copy_from_slice(&random_bytes(32));
        Self {
            session_secret: secret,
            ..Default::default()
        }
    }

    /// Create config for development (insecure cookie)
    pub fn development() -> Self {
        Self {
            cookie_secure: false,
            ..Self::with_random_secret()
        }
    }

    /// Default MaxAge in seconds for new sessions
    pub fn session_max_age_secs(&self) -> Option<i64> {
        self.session_max_age
            .map(|ttl| i64::try_from(ttl.as_secs()).unwrap_or(i64::MAX))
    }

    /// Whether `path` bypasses the authentication check
    pub fn is_public_path(&self, path: &str) -> bool {
        path == self.login_path || self.public_paths.iter().any(|p| p == path)
    }

    /// Cookie attributes for the session cookie
    pub fn cookie_config(&self) -> CookieConfig {
        CookieConfig {
            name: self.session_cookie_name.clone(),
            secure: self.cookie_secure,
            http_only: true,
            same_site: self.cookie_same_site,
            path: "/".to_string(),
        }
    }

    /// Get password pepper as slice
    pub fn pepper(&self) -> Option<&[u8]> {
        self.password_pepper.as_deref()
    }
}

/// Settings shared by key-value session backends
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DistributedSettings {
    /// Prepended to every session identity to form the backend key
    pub key_prefix: String,
    /// Bound on each backend round trip
    pub timeout: Duration,
}

impl Default for DistributedSettings {
    fn default() -> Self {
        Self {
            key_prefix: "session_".to_string(),
            timeout: Duration::from_millis(500),
        }
    }
}

/// Where session values live
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SessionBackendConfig {
    /// Values travel in a signed client cookie
    #[default]
    SignedCookie,
    /// Values live in process memory (single node, tests)
    Memory(DistributedSettings),
    /// Values live in Redis
    Redis {
        url: String,
        settings: DistributedSettings,
    },
}

impl SessionBackendConfig {
    pub fn name(&self) -> &'static str {
        match self {
            SessionBackendConfig::SignedCookie => "cookie",
            SessionBackendConfig::Memory(_) => "memory",
            SessionBackendConfig::Redis { .. } => "redis",
        }
    }
}
