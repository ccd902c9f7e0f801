//! Authentication State
//!
//! Where a request stands, derived from its loaded session.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthState {
    /// No valid session arrived with the request
    NoSession,
    /// A session exists but has not passed credential verification
    Unauthenticated,
    /// The session carries `authenticated = true`
    Authenticated,
}

impl AuthState {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, AuthState::Authenticated)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AuthState::NoSession => "no_session",
            AuthState::Unauthenticated => "unauthenticated",
            AuthState::Authenticated => "authenticated",
        }
    }
}

impl std::fmt::Display for AuthState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
