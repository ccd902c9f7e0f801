//! Auth Error Types
//!
//! This module provides auth-specific error variants that integrate
//! with the unified `kernel::error::AppError` system.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

/// Auth-specific result type alias
pub type AuthResult<T> = Result<T, AuthError>;

/// Session persistence failures, surfaced only on save
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// Backend refused or dropped the operation
    #[error("Session backend unavailable: {0}")]
    Unavailable(String),

    /// Backend did not answer within the configured timeout
    #[error("Session backend timed out")]
    Timeout,

    /// Values or headers could not be encoded
    #[error("Session encoding failed: {0}")]
    Encoding(String),

    /// Signed token exceeds what browsers keep
    #[error("Session token too large: {len} bytes (max {max})")]
    TokenTooLarge { len: usize, max: usize },
}

impl StoreError {
    /// Short label for metrics
    pub fn reason(&self) -> &'static str {
        match self {
            StoreError::Unavailable(_) => "unavailable",
            StoreError::Timeout => "timeout",
            StoreError::Encoding(_) => "encoding",
            StoreError::TokenTooLarge { .. } => "token_too_large",
        }
    }
}

/// Auth-specific error variants
#[derive(Debug, Error)]
pub enum AuthError {
    /// Request payload could not be understood
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Unknown user or wrong password (never distinguished)
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// User name already exists
    #[error("User name already exists")]
    UserNameTaken,

    /// Password rejected by the creation policy
    #[error("Password validation failed: {0}")]
    PasswordValidation(String),

    /// Session could not be persisted
    #[error("Server storage error: {0}")]
    SessionStorage(#[from] StoreError),

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AuthError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::BadRequest(_) | AuthError::PasswordValidation(_) => StatusCode::BAD_REQUEST,
            AuthError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            AuthError::UserNameTaken => StatusCode::CONFLICT,
            AuthError::SessionStorage(_) | AuthError::Database(_) | AuthError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            AuthError::BadRequest(_) | AuthError::PasswordValidation(_) => ErrorKind::BadRequest,
            AuthError::InvalidCredentials => ErrorKind::Unauthorized,
            AuthError::UserNameTaken => ErrorKind::Conflict,
            AuthError::SessionStorage(_) | AuthError::Database(_) | AuthError::Internal(_) => {
                ErrorKind::InternalServerError
            }
        }
    }

    /// Convert to AppError. Server-side details stay in the logs.
    pub fn to_app_error(&self) -> AppError {
        match self {
            AuthError::BadRequest(_) => AppError::bad_request("bad request"),
            AuthError::SessionStorage(_) => AppError::internal("server storage error")
                .with_action("Please try again later"),
            AuthError::Database(_) | AuthError::Internal(_) => {
                AppError::internal("internal server error")
            }
            _ => AppError::new(self.kind(), self.to_string()),
        }
    }

    /// Log the error with appropriate level
    fn log(&self) {
        match self {
            AuthError::SessionStorage(e) => {
                tracing::error!(error = %e, reason = e.reason(), "Session storage error");
            }
            AuthError::Database(e) => {
                tracing::error!(error = %e, "Auth database error");
            }
            AuthError::Internal(msg) => {
                tracing::error!(message = %msg, "Auth internal error");
            }
            AuthError::InvalidCredentials => {
                tracing::warn!("Invalid login attempt");
            }
            _ => {
                tracing::debug!(error = %self, "Auth error");
            }
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        self.log();
        self.to_app_error().into_response()
    }
}

impl From<AppError> for AuthError {
    fn from(err: AppError) -> Self {
        AuthError::Internal(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            AuthError::BadRequest("x".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AuthError::InvalidCredentials.status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AuthError::from(StoreError::Timeout).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_storage_error_is_distinct_from_credentials() {
        let storage = AuthError::from(StoreError::Unavailable("connection refused".into()));
        let app = storage.to_app_error();
        assert_eq!(app.kind(), ErrorKind::InternalServerError);
        assert_eq!(app.message(), "server storage error");
        assert!(!app.message().contains("refused"));

        let creds = AuthError::InvalidCredentials.to_app_error();
        assert_eq!(creds.kind(), ErrorKind::Unauthorized);
        assert_ne!(creds.message(), app.message());
    }

    #[test]
    fn test_store_error_reasons() {
        assert_eq!(StoreError::Timeout.reason(), "timeout");
        assert_eq!(
            StoreError::TokenTooLarge { len: 5000, max: 4096 }.reason(),
            "token_too_large"
        );
    }
}
