//! Bootstrap User Use Case
//!
//! Creates the configured initial user if it does not exist yet. Running it
//! again is harmless.

use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::domain::entity::user::User;
use crate::domain::repository::UserRepository;
use crate::domain::value_object::{
    user_name::UserName,
    user_password::{RawPassword, UserPassword},
};
use crate::error::{AuthError, AuthResult};

/// Bootstrap input
pub struct BootstrapUserInput {
    pub user_name: String,
    pub password: String,
    pub display_name: String,
}

/// Bootstrap output
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BootstrapUserOutput {
    /// `false` when the user already existed
    pub created: bool,
}

/// Bootstrap user use case
pub struct BootstrapUserUseCase<U>
where
    U: UserRepository,
{
    user_repo: Arc<U>,
    config: Arc<AuthConfig>,
}

impl<U> BootstrapUserUseCase<U>
where
    U: UserRepository,
{
    pub fn new(user_repo: Arc<U>, config: Arc<AuthConfig>) -> Self {
        Self { user_repo, config }
    }

    pub async fn execute(&self, input: BootstrapUserInput) -> AuthResult<BootstrapUserOutput> {
        let user_name =
            UserName::new(input.user_name).map_err(|e| AuthError::BadRequest(e.to_string()))?;

        if self.user_repo.exists_by_user_name(&user_name).await? {
            tracing::debug!(user_name = %user_name, "Bootstrap user already exists");
            return Ok(BootstrapUserOutput { created: false });
        }

        let raw_password = RawPassword::new(input.password)
            .map_err(|e| AuthError::PasswordValidation(e.message().to_string()))?;
        let password_hash = UserPassword::from_raw(
            &raw_password,
            self.config.pepper(),
            &self.config.password_hashing,
        )?;

        let user = User::new(user_name, password_hash, input.display_name);

        match self.user_repo.create(&user).await {
            Ok(()) => {}
            // Another instance won the race
            Err(AuthError::UserNameTaken) => return Ok(BootstrapUserOutput { created: false }),
            Err(e) => return Err(e),
        }

        tracing::info!(
            user_id = %user.user_id,
            user_name = %user.user_name,
            "Bootstrap user created"
        );

        Ok(BootstrapUserOutput { created: true })
    }
}
