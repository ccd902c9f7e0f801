//! Sign In Use Case
//!
//! Verifies credentials and marks the caller's session as authenticated.
//! A rejected attempt leaves the session alone: nothing is loaded or saved.

use std::sync::Arc;

use http::HeaderMap;

use crate::application::config::AuthConfig;
use crate::application::verify_credentials::CredentialVerifier;
use crate::domain::repository::{SessionStore, UserRepository};
use crate::domain::services::{Argon2Comparator, PasswordComparator};
use crate::error::{AuthError, AuthResult};

/// Sign in input
pub struct SignInInput {
    pub user_name: String,
    pub password: String,
}

/// Sign in output
pub struct SignInOutput {
    /// Headers to attach to the response (`Set-Cookie`)
    pub response_headers: HeaderMap,
    pub user_name: String,
    pub display_name: String,
}

/// Sign in use case
pub struct SignInUseCase<S, U, P = Argon2Comparator>
where
    S: SessionStore,
    U: UserRepository,
    P: PasswordComparator,
{
    store: Arc<S>,
    verifier: CredentialVerifier<U, P>,
    config: Arc<AuthConfig>,
}

impl<S, U, P> SignInUseCase<S, U, P>
where
    S: SessionStore,
    U: UserRepository,
    P: PasswordComparator,
{
    pub fn new(store: Arc<S>, verifier: CredentialVerifier<U, P>, config: Arc<AuthConfig>) -> Self {
        Self {
            store,
            verifier,
            config,
        }
    }

    pub async fn execute(
        &self,
        request_headers: &HeaderMap,
        input: SignInInput,
    ) -> AuthResult<SignInOutput> {
        let user = self
            .verifier
            .authenticate(&input.user_name, input.password)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        let mut session = self.store.load(request_headers).await;

        // New identity on privilege change
        session.renew_identity();
        session.mark_authenticated(&user.user_name);
        session.set_max_age(self.config.session_max_age_secs());

        let mut response_headers = HeaderMap::new();
        self.store.save(&mut response_headers, &mut session).await?;

        tracing::info!(
            user_id = %user.user_id,
            user_name = %user.user_name,
            "User signed in"
        );

        Ok(SignInOutput {
            response_headers,
            user_name: user.user_name.to_string(),
            display_name: user.display_name,
        })
    }
}
