//! Session Authentication Module
//!
//! Clean Architecture structure:
//! - `domain/` - Session and user entities, value objects, store and repository traits
//! - `application/` - Use cases (credential verification, sign in/out, session check, bootstrap)
//! - `infra/` - Signed-cookie and distributed session stores, key-value backends, PostgreSQL
//! - `presentation/` - HTTP handlers, DTOs, router, middleware
//!
//! ## Features
//! - User name + password login against a user-record lookup
//! - Session middleware that denies unauthenticated requests before they reach a handler
//! - Pluggable session storage: HMAC-signed cookie, in-process, or Redis
//!
//! ## Security Model
//! - Passwords hashed with Argon2id, compared off the async workers
//! - Session identities are 256-bit random values, renewed at login
//! - Tampered, expired or unknown sessions are treated as absent

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;


// Re-exports for convenience
pub use application::config::{AuthConfig, DenyAction, DistributedSettings, SessionBackendConfig};
pub use error::{AuthError, AuthResult, StoreError};
pub use infra::{ConfiguredSessionStore, PgUserRepository, SessionMetrics};
pub use presentation::router::auth_router;

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

// Convenience re-exports
pub mod config {
    pub use crate::application::config::*;
}

pub mod models {
    pub use crate::domain::entity::*;
    pub use crate::domain::value_object::*;
    pub use crate::presentation::dto::*;
}

pub mod handlers {
    pub use crate::presentation::handlers::*;
}

pub mod store {
    pub use crate::domain::repository::SessionStore;
    pub use crate::infra::{
        ConfiguredSessionStore, DistributedStore, KeyValueBackend, MemoryBackend, RedisBackend,
        SignedCookieStore,
    };
}

pub mod router {
    pub use crate::presentation::router::*;
}

pub mod middleware {
    pub use crate::presentation::middleware::*;
}
