//! Credential Verifier
//!
//! Checks a user name / password pair against the stored user record.
//!
//! Fails closed: an unknown user, a record whose name is not an exact match,
//! or a failed comparison all answer `false`, and the first two never reach
//! the hash comparison. Nothing here touches session or user state.

use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::domain::entity::user::User;
use crate::domain::repository::UserRepository;
use crate::domain::services::{Argon2Comparator, PasswordComparator};
use crate::domain::value_object::{user_name::UserName, user_password::RawPassword};
use crate::error::AuthResult;

pub struct CredentialVerifier<U, P = Argon2Comparator>
where
    U: UserRepository,
    P: PasswordComparator,
{
    user_repo: Arc<U>,
    comparator: Arc<P>,
}

impl<U> CredentialVerifier<U, Argon2Comparator>
where
    U: UserRepository,
{
    /// Argon2id verifier using the configured pepper
    pub fn from_config(user_repo: Arc<U>, config: &AuthConfig) -> Self {
        Self::new(
            user_repo,
            Arc::new(Argon2Comparator::new(config.password_pepper.clone())),
        )
    }
}

impl<U, P> CredentialVerifier<U, P>
where
    U: UserRepository,
    P: PasswordComparator,
{
    pub fn new(user_repo: Arc<U>, comparator: Arc<P>) -> Self {
        Self {
            user_repo,
            comparator,
        }
    }

    /// Return the matching user, or `None` for any credential mismatch.
    ///
    /// Repository failures are propagated.
    pub async fn authenticate(&self, user_name: &str, password: String) -> AuthResult<Option<User>> {
        let candidate = RawPassword::candidate(password);

        // A name that could never have been registered cannot match
        let Ok(user_name) = UserName::new(user_name) else {
            return Ok(None);
        };

        let Some(user) = self.user_repo.find_by_user_name(&user_name).await? else {
            tracing::debug!("Credential check for unknown user");
            return Ok(None);
        };

        if user.user_name != user_name {
            tracing::warn!("User lookup returned a non-matching record");
            return Ok(None);
        }

        let comparator = Arc::clone(&self.comparator);
        let stored = user.password_hash.clone();
        let matched =
            tokio::task::spawn_blocking(move || comparator.matches(&stored, &candidate))
                .await
                .unwrap_or_else(|e| {
                    tracing::error!(error = %e, "Password comparison task failed");
                    false
                });

        Ok(matched.then_some(user))
    }

    /// `true` only for a valid pair. Repository failures answer `false`.
    pub async fn verify(&self, user_name: &str, password: String) -> bool {
        match self.authenticate(user_name, password).await {
            Ok(user) => user.is_some(),
            Err(e) => {
                tracing::error!(error = %e, "Credential lookup failed");
                false
            }
        }
    }
}

impl<U, P> Clone for CredentialVerifier<U, P>
where
    U: UserRepository,
    P: PasswordComparator,
{
    fn clone(&self) -> Self {
        Self {
            user_repo: Arc::clone(&self.user_repo),
            comparator: Arc::clone(&self.comparator),
        }
    }
}
