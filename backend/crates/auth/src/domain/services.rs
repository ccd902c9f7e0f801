//! Domain Services
//!
//! Password comparison behind a trait so the verifier does not depend on a
//! concrete hashing scheme.

use crate::domain::value_object::user_password::{RawPassword, UserPassword};

/// Compares a presented password with a stored hash.
///
/// Implementations may be slow and are called from the blocking pool.
pub trait PasswordComparator: Send + Sync + 'static {
    fn matches(&self, stored: &UserPassword, candidate: &RawPassword) -> bool;
}

/// Argon2id comparison with an optional installation pepper
#[derive(Clone, Default)]
pub struct Argon2Comparator {
    pepper: Option<Vec<u8>>,
}

impl Argon2Comparator {
    pub fn new(pepper: Option<Vec<u8>>) -> Self {
        Self { pepper }
    }
}

impl PasswordComparator for Argon2Comparator {
    fn matches(&self, stored: &UserPassword, candidate: &RawPassword) -> bool {
        stored.verify(candidate, self.pepper.as_deref())
    }
}

impl std::fmt::Debug for Argon2Comparator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Argon2Comparator")
            .field("pepper", &self.pepper.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use platform::password::HashingParams;

    const FAST: HashingParams = HashingParams {
        memory_kib: 1024,
        iterations: 1,
        parallelism: 1,
    };

    #[test]
    fn test_argon2_comparator_uses_pepper() {
        let raw = RawPassword::new("CorrectHorse42".to_string()).unwrap();
        let stored = UserPassword::from_raw(&raw, Some(b"pepper"), &FAST).unwrap();

        assert!(Argon2Comparator::new(Some(b"pepper".to_vec())).matches(&stored, &raw));
        assert!(!Argon2Comparator::default().matches(&stored, &raw));
    }
}
