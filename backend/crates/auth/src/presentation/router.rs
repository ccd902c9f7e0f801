//! Auth Router

use axum::{
    Router,
    routing::{get, post},
};

use crate::domain::repository::{SessionStore, UserRepository};
use crate::domain::services::PasswordComparator;
use crate::presentation::handlers::{self, AuthAppState};

/// Create the Auth router: login at the configured path, `/logout`, `/status`
pub fn auth_router<S, U, P>(state: AuthAppState<S, U, P>) -> Router
where
    S: SessionStore + Send + Sync + 'static,
    U: UserRepository + Send + Sync + 'static,
    P: PasswordComparator,
{
    let login_path = state.config.login_path.clone();

    Router::new()
        .route(&login_path, post(handlers::login::<S, U, P>))
        .route("/logout", post(handlers::logout::<S, U, P>))
        .route("/status", get(handlers::session_status::<S, U, P>))
        .with_state(state)
}
