//! User Entity
//!
//! The minimal user record needed to verify a password.

use chrono::{DateTime, Utc};

use crate::domain::value_object::{
    user_id::UserId, user_name::UserName, user_password::UserPassword,
};

#[derive(Debug, Clone)]
pub struct User {
    /// Internal UUID identifier
    pub user_id: UserId,
    /// Login handle (unique, case-sensitive)
    pub user_name: UserName,
    /// Argon2id hash, never the password itself
    pub password_hash: UserPassword,
    /// Name shown back to the user
    pub display_name: String,
    /// Created timestamp
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn new(user_name: UserName, password_hash: UserPassword, display_name: impl Into<String>) -> Self {
        Self {
            user_id: UserId::new(),
            user_name,
            password_hash,
            display_name: display_name.into(),
            created_at: Utc::now(),
        }
    }
}
