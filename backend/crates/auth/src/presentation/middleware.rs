//! Auth Middleware
//!
//! Session check in front of protected routes. The decision is made before
//! the inner service is called; a denied request never reaches it.

use axum::extract::{Request, State};
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::{IntoResponse, Redirect, Response};
use std::sync::Arc;

use crate::application::CheckSessionUseCase;
use crate::application::config::{AuthConfig, DenyAction};
use crate::domain::repository::SessionStore;
use crate::domain::value_object::auth_state::AuthState;

/// Middleware state
pub struct AuthMiddlewareState<S>
where
    S: SessionStore + Send + Sync + 'static,
{
    pub store: Arc<S>,
    pub config: Arc<AuthConfig>,
}

impl<S> Clone for AuthMiddlewareState<S>
where
    S: SessionStore + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            config: Arc::clone(&self.config),
        }
    }
}

/// Authentication status stored in request extensions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthStatus {
    pub is_authenticated: bool,
    pub state: AuthState,
    pub user_name: Option<String>,
}

/// Middleware that requires an authenticated session
///
/// Use with `axum::middleware::from_fn_with_state`.
pub async fn require_session_auth<S>(
    State(state): State<AuthMiddlewareState<S>>,
    mut req: Request,
    next: Next,
) -> Response
where
    S: SessionStore + Send + Sync + 'static,
{
    if state.config.is_public_path(req.uri().path()) {
        return next.run(req).await;
    }

    let use_case = CheckSessionUseCase::new(state.store.clone());
    let status = use_case.execute(req.headers()).await;

    if !status.is_authenticated() {
        tracing::debug!(
            path = %req.uri().path(),
            state = %status.state,
            "Denied request without authenticated session"
        );
        return deny(&state.config);
    }

    req.extensions_mut().insert(AuthStatus {
        is_authenticated: true,
        state: status.state,
        user_name: status.user_name,
    });

    next.run(req).await
}

/// Middleware that checks the session but doesn't require it
pub async fn check_session_auth<S>(
    State(state): State<AuthMiddlewareState<S>>,
    mut req: Request,
    next: Next,
) -> Response
where
    S: SessionStore + Send + Sync + 'static,
{
    let use_case = CheckSessionUseCase::new(state.store.clone());
    let status = use_case.execute(req.headers()).await;

    req.extensions_mut().insert(AuthStatus {
        is_authenticated: status.is_authenticated(),
        state: status.state,
        user_name: status.user_name,
    });

    next.run(req).await
}

fn deny(config: &AuthConfig) -> Response {
    match config.deny_action {
        DenyAction::Unauthorized => {
            (StatusCode::UNAUTHORIZED, [("X-Auth-Required", "true")]).into_response()
        }
        // 303 See Other
        DenyAction::RedirectToLogin => Redirect::to(&config.login_path).into_response(),
    }
}
