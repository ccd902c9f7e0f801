//! Check Session Use Case
//!
//! Derives the authentication state of a request. Read-only.

use std::sync::Arc;

use http::HeaderMap;

use crate::domain::repository::SessionStore;
use crate::domain::value_object::auth_state::AuthState;

/// Session status output
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionStatusOutput {
    pub state: AuthState,
    pub user_name: Option<String>,
}

impl SessionStatusOutput {
    pub fn is_authenticated(&self) -> bool {
        self.state.is_authenticated()
    }
}

/// Check session use case
pub struct CheckSessionUseCase<S>
where
    S: SessionStore,
{
    store: Arc<S>,
}

impl<S> CheckSessionUseCase<S>
where
    S: SessionStore,
{
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    pub async fn execute(&self, request_headers: &HeaderMap) -> SessionStatusOutput {
        let session = self.store.load(request_headers).await;
        let state = session.auth_state();

        SessionStatusOutput {
            state,
            user_name: state
                .is_authenticated()
                .then(|| session.user_name().map(str::to_owned))
                .flatten(),
        }
    }
}
