//! User Password Value Objects
//!
//! - [`RawPassword`]: clear text taken from a login body or the bootstrap
//!   settings, zeroized on drop
//! - [`UserPassword`]: the Argon2id PHC string kept on the user record

use std::fmt;

use kernel::error::app_error::{AppError, AppResult};
use platform::password::{
    ClearTextPassword, HashedPassword, HashingParams, PasswordHashError, PasswordPolicyError,
};

/// Clear-text password
pub struct RawPassword(ClearTextPassword);

impl RawPassword {
    /// Password about to be hashed for a new user record; the policy applies
    pub fn new(raw: String) -> AppResult<Self> {
        ClearTextPassword::new(raw)
            .map(Self)
            .map_err(policy_error)
    }

    /// Password presented at login
    ///
    /// A candidate that could never have been stored simply fails to verify,
    /// so no policy is applied here.
    pub fn candidate(raw: String) -> Self {
        Self(ClearTextPassword::candidate(raw))
    }

    pub(crate) fn inner(&self) -> &ClearTextPassword {
        &self.0
    }
}

fn policy_error(err: PasswordPolicyError) -> AppError {
    let action = match err {
        PasswordPolicyError::TooShort { .. } => "Please choose a longer password",
        PasswordPolicyError::TooLong { .. } => "Please choose a shorter password",
        PasswordPolicyError::EmptyOrWhitespace => "Please enter a password",
        PasswordPolicyError::InvalidCharacter => "Please remove control characters",
    };
    AppError::bad_request(err.to_string()).with_action(action)
}

impl fmt::Debug for RawPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("RawPassword([REDACTED])")
    }
}

/// Stored password hash
#[derive(Clone, PartialEq, Eq)]
pub struct UserPassword(HashedPassword);

impl UserPassword {
    pub fn from_raw(
        raw: &RawPassword,
        pepper: Option<&[u8]>,
        params: &HashingParams,
    ) -> AppResult<Self> {
        raw.inner()
            .hash(pepper, params)
            .map(Self)
            .map_err(|e: PasswordHashError| AppError::internal(e.to_string()))
    }

    /// Rebuild from the PHC string in the `users` table
    pub fn from_phc_string(phc: impl Into<String>) -> AppResult<Self> {
        HashedPassword::from_phc_string(phc)
            .map(Self)
            .map_err(|_| AppError::internal("Invalid password hash in database"))
    }

    pub fn as_phc_string(&self) -> &str {
        self.0.as_phc_string()
    }

    /// Constant-time check of `raw` against this hash
    pub fn verify(&self, raw: &RawPassword, pepper: Option<&[u8]>) -> bool {
        self.0.verify(raw.inner(), pepper)
    }
}

impl fmt::Debug for UserPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("UserPassword([HASH])")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kernel::error::kind::ErrorKind;
    use platform::password::{MAX_PASSWORD_LENGTH, MIN_PASSWORD_LENGTH};

    const FAST: HashingParams = HashingParams {
        memory_kib: 1024,
        iterations: 1,
        parallelism: 1,
    };

    #[test]
    fn test_policy_applies_to_new_passwords_only() {
        assert!(RawPassword::new("CorrectHorse42".to_string()).is_ok());

        for bad in [
            "a".repeat(MIN_PASSWORD_LENGTH - 1),
            "a".repeat(MAX_PASSWORD_LENGTH + 1),
            String::new(),
        ] {
            let err = RawPassword::new(bad).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::BadRequest);
            assert!(err.action().is_some());
        }

        // A short candidate is still accepted for comparison
        let _ = RawPassword::candidate("a".to_string());
    }

    #[test]
    fn test_stored_hash_matches_only_its_password() {
        let raw = RawPassword::new("CorrectHorse42".to_string()).unwrap();
        let stored = UserPassword::from_raw(&raw, None, &FAST).unwrap();

        assert!(stored.verify(&RawPassword::candidate("CorrectHorse42".to_string()), None));
        assert!(!stored.verify(&RawPassword::candidate("correcthorse42".to_string()), None));
        assert!(!stored.verify(&RawPassword::candidate("CorrectHorse4".to_string()), None));
        assert!(!stored.verify(&RawPassword::candidate(String::new()), None));
    }

    #[test]
    fn test_pepper_is_part_of_the_hash() {
        let raw = RawPassword::new("CorrectHorse42".to_string()).unwrap();
        let stored = UserPassword::from_raw(&raw, Some(b"pepper"), &FAST).unwrap();

        assert!(stored.verify(&raw, Some(b"pepper")));
        assert!(!stored.verify(&raw, None));
        assert!(!stored.verify(&raw, Some(b"other")));
    }

    #[test]
    fn test_reload_from_database_string() {
        let raw = RawPassword::new("CorrectHorse42".to_string()).unwrap();
        let stored = UserPassword::from_raw(&raw, None, &FAST).unwrap();

        let reloaded = UserPassword::from_phc_string(stored.as_phc_string()).unwrap();
        assert!(reloaded.verify(&raw, None));

        let err = UserPassword::from_phc_string("plain").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InternalServerError);
    }

    #[test]
    fn test_debug_never_shows_secrets() {
        let raw = RawPassword::new("CorrectHorse42".to_string()).unwrap();
        assert!(!format!("{:?}", raw).contains("Horse"));

        let stored = UserPassword::from_raw(&raw, None, &FAST).unwrap();
        assert!(!format!("{:?}", stored).contains("argon2"));
    }
}
