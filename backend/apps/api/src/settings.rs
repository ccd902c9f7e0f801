//! Process Settings
//!
//! Everything the server reads from the environment, parsed once at startup.

use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, bail};
use auth::application::BootstrapUserInput;
use auth::config::{AuthConfig, DenyAction, DistributedSettings, SessionBackendConfig};
use base64::Engine;
use base64::engine::general_purpose;
use platform::password::HashingParams;

const DEFAULT_PORT: u16 = 9002;
const DEFAULT_MAX_AGE_SECS: u64 = 12 * 3600;

pub struct Settings {
    pub database_url: String,
    pub port: u16,
    pub session_backend: SessionBackendConfig,
    pub auth: AuthConfig,
    pub bootstrap_user: Option<BootstrapUserInput>,
}

impl Settings {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok(), cfg!(debug_assertions))
    }

    /// Build settings from any variable source. `development` allows a random
    /// session secret and insecure cookies.
    pub fn from_lookup<F>(lookup: F, development: bool) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL").context("DATABASE_URL must be set")?;
        let port = parse_or(&lookup, "SERVER_PORT", DEFAULT_PORT)?;

        let base = if development {
            AuthConfig::development()
        } else {
            AuthConfig::default()
        };

        let session_secret = match lookup("SESSION_SECRET") {
            Some(encoded) => decode_secret(&encoded)?,
            None if development => base.session_secret,
            None => bail!("SESSION_SECRET must be set in production"),
        };

        let max_age_secs = parse_or(&lookup, "SESSION_MAX_AGE_SECS", DEFAULT_MAX_AGE_SECS)?;
        let defaults = HashingParams::default();

        let auth = AuthConfig {
            session_secret,
            // 0 means a browser-session cookie
            session_max_age: (max_age_secs > 0).then(|| Duration::from_secs(max_age_secs)),
            cookie_secure: parse_or(&lookup, "COOKIE_SECURE", base.cookie_secure)?,
            deny_action: match lookup("AUTH_DENY_ACTION").as_deref() {
                None | Some("unauthorized") => DenyAction::Unauthorized,
                Some("redirect") => DenyAction::RedirectToLogin,
                Some(other) => bail!("AUTH_DENY_ACTION must be unauthorized or redirect, got {other}"),
            },
            password_pepper: lookup("PASSWORD_PEPPER").map(String::into_bytes),
            password_hashing: HashingParams {
                memory_kib: parse_or(&lookup, "ARGON2_MEMORY_KIB", defaults.memory_kib)?,
                iterations: parse_or(&lookup, "ARGON2_ITERATIONS", defaults.iterations)?,
                parallelism: parse_or(&lookup, "ARGON2_PARALLELISM", defaults.parallelism)?,
            },
            ..base
        };

        let distributed = DistributedSettings {
            key_prefix: lookup("SESSION_KEY_PREFIX").unwrap_or_else(|| "session_".to_string()),
            timeout: Duration::from_millis(parse_or(&lookup, "SESSION_STORE_TIMEOUT_MS", 500)?),
        };

        let session_backend = match lookup("SESSION_BACKEND").as_deref() {
            None | Some("cookie") => SessionBackendConfig::SignedCookie,
            Some("memory") => SessionBackendConfig::Memory(distributed),
            Some("redis") => SessionBackendConfig::Redis {
                url: lookup("REDIS_URL").context("REDIS_URL must be set for the redis backend")?,
                settings: distributed,
            },
            Some(other) => bail!("SESSION_BACKEND must be cookie, memory or redis, got {other}"),
        };

        let bootstrap_user = match (lookup("BOOTSTRAP_USER_NAME"), lookup("BOOTSTRAP_USER_PASSWORD")) {
            (Some(user_name), Some(password)) => Some(BootstrapUserInput {
                display_name: lookup("BOOTSTRAP_DISPLAY_NAME").unwrap_or_else(|| user_name.clone()),
                user_name,
                password,
            }),
            (None, None) => None,
            _ => bail!("BOOTSTRAP_USER_NAME and BOOTSTRAP_USER_PASSWORD must be set together"),
        };

        Ok(Self {
            database_url,
            port,
            session_backend,
            auth,
            bootstrap_user,
        })
    }
}

fn parse_or<F, T>(lookup: &F, name: &str, default: T) -> anyhow::Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(name) {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{name} has an invalid value")),
        None => Ok(default),
    }
}

fn decode_secret(encoded: &str) -> anyhow::Result<[u8; 32]> {
    let bytes = general_purpose::STANDARD
        .decode(encoded.trim())
        .context("SESSION_SECRET must be base64")?;
    bytes
        .try_into()
        .map_err(|b: Vec<u8>| anyhow::anyhow!("SESSION_SECRET must decode to 32 bytes, got {}", b.len()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_defaults_in_development() {
        let settings = Settings::from_lookup(lookup(&[("DATABASE_URL", "postgres://x")]), true).unwrap();

        assert_eq!(settings.port, 9002);
        assert_eq!(settings.session_backend, SessionBackendConfig::SignedCookie);
        assert_eq!(settings.auth.session_max_age_secs(), Some(43_200));
        assert!(!settings.auth.cookie_secure);
        assert!(settings.bootstrap_user.is_none());
    }

    #[test]
    fn test_production_requires_secret() {
        let vars = [("DATABASE_URL", "postgres://x")];
        assert!(Settings::from_lookup(lookup(&vars), false).is_err());

        let secret = general_purpose::STANDARD.encode([7u8; 32]);
        let vars = [("DATABASE_URL", "postgres://x"), ("SESSION_SECRET", secret.as_str())];
        let settings = Settings::from_lookup(lookup(&vars), false).unwrap();
        assert_eq!(settings.auth.session_secret, [7u8; 32]);
        assert!(settings.auth.cookie_secure);
    }

    #[test]
    fn test_short_secret_rejected() {
        let secret = general_purpose::STANDARD.encode([7u8; 16]);
        let vars = [("DATABASE_URL", "postgres://x"), ("SESSION_SECRET", secret.as_str())];
        assert!(Settings::from_lookup(lookup(&vars), true).is_err());
    }

    #[test]
    fn test_redis_backend() {
        let vars = [
            ("DATABASE_URL", "postgres://x"),
            ("SESSION_BACKEND", "redis"),
            ("REDIS_URL", "redis://127.0.0.1:6379"),
            ("SESSION_KEY_PREFIX", "sess:"),
            ("SESSION_STORE_TIMEOUT_MS", "250"),
        ];
        let settings = Settings::from_lookup(lookup(&vars), true).unwrap();
        assert_eq!(
            settings.session_backend,
            SessionBackendConfig::Redis {
                url: "redis://127.0.0.1:6379".to_string(),
                settings: DistributedSettings {
                    key_prefix: "sess:".to_string(),
                    timeout: Duration::from_millis(250),
                },
            }
        );

        let vars = [("DATABASE_URL", "postgres://x"), ("SESSION_BACKEND", "redis")];
        assert!(Settings::from_lookup(lookup(&vars), true).is_err());
    }

    #[test]
    fn test_invalid_values_rejected() {
        for (name, value) in [
            ("SERVER_PORT", "http"),
            ("SESSION_BACKEND", "memcached"),
            ("COOKIE_SECURE", "maybe"),
            ("AUTH_DENY_ACTION", "teapot"),
        ] {
            let vars = [("DATABASE_URL", "postgres://x"), (name, value)];
            assert!(Settings::from_lookup(lookup(&vars), true).is_err(), "{name}={value}");
        }
    }

    #[test]
    fn test_zero_max_age_is_browser_session() {
        let vars = [("DATABASE_URL", "postgres://x"), ("SESSION_MAX_AGE_SECS", "0")];
        let settings = Settings::from_lookup(lookup(&vars), true).unwrap();
        assert_eq!(settings.auth.session_max_age, None);
    }

    #[test]
    fn test_bootstrap_user_pairing() {
        let vars = [
            ("DATABASE_URL", "postgres://x"),
            ("BOOTSTRAP_USER_NAME", "admin"),
            ("BOOTSTRAP_USER_PASSWORD", "CorrectHorse42"),
        ];
        let settings = Settings::from_lookup(lookup(&vars), true).unwrap();
        let user = settings.bootstrap_user.unwrap();
        assert_eq!(user.user_name, "admin");
        assert_eq!(user.display_name, "admin");

        let vars = [("DATABASE_URL", "postgres://x"), ("BOOTSTRAP_USER_NAME", "admin")];
        assert!(Settings::from_lookup(lookup(&vars), true).is_err());
    }
}
