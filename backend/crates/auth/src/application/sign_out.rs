//! Sign Out Use Case
//!
//! Destroys an authenticated session. Without one this is a no-op, so
//! signing out twice ends in the same state.

use std::sync::Arc;

use http::HeaderMap;

use crate::domain::repository::SessionStore;
use crate::error::AuthResult;

/// Sign out output
pub struct SignOutOutput {
    /// Headers to attach to the response (expired `Set-Cookie` when a session was destroyed)
    pub response_headers: HeaderMap,
    /// Whether an authenticated session was destroyed
    pub signed_out: bool,
}

/// Sign out use case
pub struct SignOutUseCase<S>
where
    S: SessionStore,
{
    store: Arc<S>,
}

impl<S> SignOutUseCase<S>
where
    S: SessionStore,
{
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    pub async fn execute(&self, request_headers: &HeaderMap) -> AuthResult<SignOutOutput> {
        let mut session = self.store.load(request_headers).await;
        let mut response_headers = HeaderMap::new();

        if !session.is_authenticated() {
            return Ok(SignOutOutput {
                response_headers,
                signed_out: false,
            });
        }

        let user_name = session.user_name().map(str::to_owned);
        session.invalidate();
        self.store.save(&mut response_headers, &mut session).await?;

        tracing::info!(user_name = ?user_name, "User signed out");

        Ok(SignOutOutput {
            response_headers,
            signed_out: true,
        })
    }
}
