//! User Name Value Object
//!
//! ユーザー名は、ログイン時にユーザーを識別するための**ログインハンドル**。
//!
//! ## 設計方針
//! - 大文字・小文字を区別する完全一致（`Alice` と `alice` は別ユーザー）
//! - 入力値をそのまま保存・比較する（小文字化や NFKC 正規化は行わない）
//!
//! ## 不変条件
//! - 長さ: 1〜64文字
//! - 制御文字禁止
//! - 先頭・末尾の空白禁止

use derive_more::Display;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// ユーザー名の最大長（文字数）
pub const USER_NAME_MAX_LENGTH: usize = 64;

/// ユーザー名の検証エラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UserNameError {
    #[error("User name cannot be empty")]
    Empty,

    #[error("User name must be at most {max} characters (got {actual})")]
    TooLong { max: usize, actual: usize },

    #[error("User name cannot start or end with whitespace")]
    SurroundingWhitespace,

    #[error("User name contains control characters")]
    ControlCharacter,
}

/// 検証済みのユーザー名
#[derive(Debug, Clone, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
#[display("{_0}")]
#[serde(try_from = "String", into = "String")]
pub struct UserName(String);

impl UserName {
    /// 検証してユーザー名を作成
    pub fn new(value: impl Into<String>) -> Result<Self, UserNameError> {
        let value = value.into();

        if value.is_empty() {
            return Err(UserNameError::Empty);
        }

        let actual = value.chars().count();
        if actual > USER_NAME_MAX_LENGTH {
            return Err(UserNameError::TooLong {
                max: USER_NAME_MAX_LENGTH,
                actual,
            });
        }

        if value.trim() != value {
            return Err(UserNameError::SurroundingWhitespace);
        }

        if value.chars().any(char::is_control) {
            return Err(UserNameError::ControlCharacter);
        }

        Ok(Self(value))
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for UserName {
    type Error = UserNameError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<UserName> for String {
    fn from(value: UserName) -> Self {
        value.0
    }
}
