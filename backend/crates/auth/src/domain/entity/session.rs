//! Session Entity
//!
//! Per-request mutable view of a session. A store produces one on load and
//! persists it only on an explicit save; nothing is written back implicitly.
//!
//! ## Expiry
//! - `max_age = None`: no expiry (browser-session cookie, no backend TTL)
//! - `max_age = Some(n)`, `n > 0`: expires after `n` seconds
//! - `max_age = Some(n)`, `n <= 0`: logically destroyed on the next save

use crate::domain::value_object::{
    auth_state::AuthState, session_id::SessionId, session_values::SessionValues,
    user_name::UserName,
};

/// Key of the flag that gates access
pub const AUTHENTICATED_KEY: &str = "authenticated";

/// Key holding the user name of an authenticated session
pub const USER_NAME_KEY: &str = "user_name";

#[derive(Debug, Clone)]
pub struct Session {
    identity: Option<SessionId>,
    stale_identity: Option<SessionId>,
    values: SessionValues,
    is_new: bool,
    max_age: Option<i64>,
}

impl Session {
    /// A session for a request that carried no valid session
    pub fn fresh(max_age: Option<i64>) -> Self {
        Self {
            identity: None,
            stale_identity: None,
            values: SessionValues::new(),
            is_new: true,
            max_age,
        }
    }

    /// A session reconstructed from the client token or the backend
    pub fn restored(identity: Option<SessionId>, values: SessionValues, max_age: Option<i64>) -> Self {
        Self {
            identity,
            stale_identity: None,
            values,
            is_new: false,
            max_age,
        }
    }

    pub fn identity(&self) -> Option<&SessionId> {
        self.identity.as_ref()
    }

    /// Return the identity, issuing one if the session has none yet
    pub fn ensure_identity(&mut self) -> &SessionId {
        self.identity.get_or_insert_with(SessionId::generate)
    }

    pub fn values(&self) -> &SessionValues {
        &self.values
    }

    pub fn values_mut(&mut self) -> &mut SessionValues {
        &mut self.values
    }

    pub fn is_new(&self) -> bool {
        self.is_new
    }

    pub fn max_age(&self) -> Option<i64> {
        self.max_age
    }

    pub fn set_max_age(&mut self, max_age: Option<i64>) {
        self.max_age = max_age;
    }

    pub fn is_authenticated(&self) -> bool {
        self.values.get_bool(AUTHENTICATED_KEY) == Some(true)
    }

    pub fn is_invalidated(&self) -> bool {
        self.max_age.is_some_and(|age| age <= 0)
    }

    pub fn user_name(&self) -> Option<&str> {
        self.values.get_text(USER_NAME_KEY)
    }

    pub fn auth_state(&self) -> AuthState {
        if self.is_authenticated() {
            AuthState::Authenticated
        } else if self.is_new {
            AuthState::NoSession
        } else {
            AuthState::Unauthenticated
        }
    }

    pub fn mark_authenticated(&mut self, user_name: &UserName) {
        self.values.insert(AUTHENTICATED_KEY, true);
        self.values.insert(USER_NAME_KEY, user_name.as_str());
    }

    /// Drop the current identity so the next save issues a new one.
    ///
    /// The old identity is remembered until the store has removed it.
    pub fn renew_identity(&mut self) {
        if let Some(old) = self.identity.take()
            && self.stale_identity.is_none()
        {
            self.stale_identity = Some(old);
        }
    }

    pub fn take_stale_identity(&mut self) -> Option<SessionId> {
        self.stale_identity.take()
    }

    /// Clear all values and mark the session for deletion on save
    pub fn invalidate(&mut self) {
        self.values.clear();
        self.max_age = Some(-1);
    }
}
