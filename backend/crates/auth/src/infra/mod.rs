//! Infrastructure Layer
//!
//! Session stores, key-value backends and user repositories.

pub mod configured;
pub mod distributed;
pub mod kv;
pub mod memory;
pub mod metrics;
pub mod postgres;
pub mod signed_cookie;

pub use configured::ConfiguredSessionStore;
pub use distributed::DistributedStore;
pub use kv::{BackendError, KeyValueBackend, MemoryBackend, RedisBackend};
pub use memory::MemoryUserRepository;
pub use metrics::SessionMetrics;
pub use postgres::PgUserRepository;
pub use signed_cookie::SignedCookieStore;
