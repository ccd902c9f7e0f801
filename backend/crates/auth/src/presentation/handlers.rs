//! HTTP Handlers

use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::application::{
    CheckSessionUseCase, CredentialVerifier, SignInInput, SignInUseCase, SignOutUseCase,
};
use crate::domain::repository::{SessionStore, UserRepository};
use crate::domain::services::{Argon2Comparator, PasswordComparator};
use crate::error::{AuthError, AuthResult};
use crate::presentation::dto::{LoginRequest, LoginResponse, SessionStatusResponse};
use crate::presentation::middleware::AuthMiddlewareState;

/// Shared state for auth handlers
pub struct AuthAppState<S, U, P = Argon2Comparator>
where
    S: SessionStore + Send + Sync + 'static,
    U: UserRepository + Send + Sync + 'static,
    P: PasswordComparator,
{
    pub store: Arc<S>,
    pub verifier: CredentialVerifier<U, P>,
    pub config: Arc<AuthConfig>,
}

impl<S, U> AuthAppState<S, U, Argon2Comparator>
where
    S: SessionStore + Send + Sync + 'static,
    U: UserRepository + Send + Sync + 'static,
{
    pub fn new(store: Arc<S>, user_repo: Arc<U>, config: Arc<AuthConfig>) -> Self {
        let verifier = CredentialVerifier::from_config(user_repo, &config);
        Self {
            store,
            verifier,
            config,
        }
    }
}

impl<S, U, P> AuthAppState<S, U, P>
where
    S: SessionStore + Send + Sync + 'static,
    U: UserRepository + Send + Sync + 'static,
    P: PasswordComparator,
{
    /// State for the session middleware, sharing this store and config
    pub fn middleware_state(&self) -> AuthMiddlewareState<S> {
        AuthMiddlewareState {
            store: Arc::clone(&self.store),
            config: Arc::clone(&self.config),
        }
    }
}

impl<S, U, P> Clone for AuthAppState<S, U, P>
where
    S: SessionStore + Send + Sync + 'static,
    U: UserRepository + Send + Sync + 'static,
    P: PasswordComparator,
{
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            verifier: self.verifier.clone(),
            config: Arc::clone(&self.config),
        }
    }
}

// ============================================================================
// Login
// ============================================================================

/// POST /login
///
/// The body is parsed here rather than by the `Json` extractor so that any
/// malformed payload maps to the same 400.
pub async fn login<S, U, P>(
    State(state): State<AuthAppState<S, U, P>>,
    headers: HeaderMap,
    body: Bytes,
) -> AuthResult<impl IntoResponse>
where
    S: SessionStore + Send + Sync + 'static,
    U: UserRepository + Send + Sync + 'static,
    P: PasswordComparator,
{
    let req: LoginRequest = serde_json::from_slice(&body)
        .map_err(|e| AuthError::BadRequest(format!("invalid login payload: {}", e)))?;

    let use_case = SignInUseCase::new(
        state.store.clone(),
        state.verifier.clone(),
        state.config.clone(),
    );

    let input = SignInInput {
        user_name: req.user_name,
        password: req.password,
    };

    let output = use_case.execute(&headers, input).await?;

    Ok((
        StatusCode::OK,
        output.response_headers,
        Json(LoginResponse {
            authenticated: true,
            user_name: output.user_name,
            display_name: output.display_name,
        }),
    ))
}

// ============================================================================
// Logout
// ============================================================================

/// POST /logout
pub async fn logout<S, U, P>(
    State(state): State<AuthAppState<S, U, P>>,
    headers: HeaderMap,
) -> AuthResult<impl IntoResponse>
where
    S: SessionStore + Send + Sync + 'static,
    U: UserRepository + Send + Sync + 'static,
    P: PasswordComparator,
{
    let use_case = SignOutUseCase::new(state.store.clone());
    let output = use_case.execute(&headers).await?;
    if !output.signed_out {
        tracing::debug!("Logout without an authenticated session");
    }

    Ok((StatusCode::NO_CONTENT, output.response_headers))
}

// ============================================================================
// Session Status
// ============================================================================

/// GET /status
pub async fn session_status<S, U, P>(
    State(state): State<AuthAppState<S, U, P>>,
    headers: HeaderMap,
) -> Json<SessionStatusResponse>
where
    S: SessionStore + Send + Sync + 'static,
    U: UserRepository + Send + Sync + 'static,
    P: PasswordComparator,
{
    let use_case = CheckSessionUseCase::new(state.store.clone());
    let output = use_case.execute(&headers).await;

    Json(SessionStatusResponse {
        authenticated: output.is_authenticated(),
        state: output.state,
        user_name: output.user_name,
    })
}
