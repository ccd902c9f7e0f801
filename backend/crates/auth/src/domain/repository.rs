//! Repository Traits
//!
//! Interfaces for user lookup and session persistence. Implementations are in
//! the infrastructure layer.

use http::HeaderMap;

use crate::domain::entity::{session::Session, user::User};
use crate::domain::value_object::user_name::UserName;
use crate::error::{AuthResult, StoreError};

/// User repository trait
#[trait_variant::make(UserRepository: Send)]
pub trait LocalUserRepository {
    /// Create a new user
    async fn create(&self, user: &User) -> AuthResult<()>;

    /// Find user by user name (exact, case-sensitive). Not found is `None`.
    async fn find_by_user_name(&self, user_name: &UserName) -> AuthResult<Option<User>>;

    /// Check if user name exists
    async fn exists_by_user_name(&self, user_name: &UserName) -> AuthResult<bool>;
}

/// Session store trait
///
/// One contract over every backend; callers never see which one is in use.
#[trait_variant::make(SessionStore: Send)]
pub trait LocalSessionStore {
    /// Reconstruct the session carried by a request.
    ///
    /// Never fails: anything unreadable or unreachable yields a fresh session,
    /// and the failure is logged and counted by the store.
    async fn load(&self, headers: &HeaderMap) -> Session;

    /// Persist the session, writing any `Set-Cookie` into `response_headers`.
    ///
    /// An invalidated session is deleted instead of written.
    async fn save(
        &self,
        response_headers: &mut HeaderMap,
        session: &mut Session,
    ) -> Result<(), StoreError>;
}
