//! Session Identity Value Object
//!
//! Opaque key of a server-side session: 32 bytes from the OS CSPRNG,
//! base64url encoded (43 characters, no padding).

use std::fmt;

use platform::crypto::{from_base64url, random_bytes, to_base64url};

/// Entropy of a session identity in bytes
pub const SESSION_ID_BYTES: usize = 32;

/// Encoded length of a session identity
pub const SESSION_ID_LEN: usize = 43;

#[derive(Clone, PartialEq, Eq, Hash)]
pub struct SessionId(String);

impl SessionId {
    /// Generate a fresh identity
    pub fn generate() -> Self {
        Self(to_base64url(&random_bytes(SESSION_ID_BYTES)))
    }

    /// Accept a client-presented identity if it is well formed.
    ///
    /// Well formed does not mean known: the store still has to find it.
    pub fn parse(value: &str) -> Option<Self> {
        if value.len() != SESSION_ID_LEN {
            return None;
        }
        let bytes = from_base64url(value).ok()?;
        (bytes.len() == SESSION_ID_BYTES).then(|| Self(value.to_string()))
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for SessionId {
    // Only a prefix, enough to correlate log lines
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prefix: String = self.0.chars().take(8).collect();
        write!(f, "SessionId({}…)", prefix)
    }
}
